// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

//! Inverse horizontal wavelet (2/6 lifting) synthesis.
//!
//! Each call reconstructs one row of 2N samples from N lowpass and
//! N highpass coefficients. Interior columns use the two-tap
//! prediction from the neighbouring lowpass coefficients, the first
//! and last column use three-tap border filters. The arithmetic must
//! stay bit-exact with the encoder, so every shift and bias here is
//! part of the format.

use multiversion::multiversion;
use serde::{Deserialize, Serialize};

use crate::bits::{max_value, saturate_i16};

/// Convention for the final division by two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HalfRounding {
  /// Arithmetic shift, rounds toward minus infinity
  #[default]
  Truncate,
  /// Adds one before the shift
  Nearest,
}

impl HalfRounding {
  #[inline(always)]
  fn apply(self, val: i32) -> i32 {
    match self {
      Self::Truncate => val >> 1,
      Self::Nearest => (val + 1) >> 1,
    }
  }
}

/// Final step of the reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVariant {
  /// Divide the reconstructed sum by two
  Standard(HalfRounding),
  /// Divide by two, then clamp to the unsigned range of `bits`
  Limited { bits: u32, rounding: HalfRounding },
  /// Bitstream carries a prescale, shift left by `shift` instead of dividing
  Descale { shift: u32 },
}

impl Default for FilterVariant {
  fn default() -> Self {
    Self::Standard(HalfRounding::Truncate)
  }
}

impl FilterVariant {
  pub fn descale(shift: u32) -> Self {
    assert!(shift <= 1, "descale shift must be 0 or 1, got {}", shift);
    Self::Descale { shift }
  }

  pub fn limited(bits: u32, rounding: HalfRounding) -> Self {
    assert!((1..=16).contains(&bits), "invalid limit depth: {}", bits);
    Self::Limited { bits, rounding }
  }

  /// Apply the overflow clamp and the final scale step to a
  /// reconstructed sum.
  #[inline(always)]
  fn finish(self, sum: i32) -> i16 {
    let sum = saturate_i16(sum);
    match self {
      Self::Standard(rounding) => rounding.apply(sum) as i16,
      Self::Limited { bits, rounding } => rounding.apply(sum).clamp(0, max_value(bits)) as i16,
      Self::Descale { shift } => saturate_i16(sum << shift) as i16,
    }
  }
}

#[inline(always)]
fn round_div8(val: i32) -> i32 {
  (val + 4) >> 3
}

/// Reconstruct `output[0..2N)` from `lowpass[0..N)` and `highpass[0..N)`.
///
/// Panics if N < 3, if the highpass row is shorter than the lowpass row
/// or if the output can't hold 2N samples.
pub fn invert_horizontal(lowpass: &[i16], highpass: &[i16], output: &mut [i16], variant: FilterVariant) {
  let n = lowpass.len();
  assert!(n >= 3, "synthesis needs at least 3 coefficients, got {}", n);
  assert!(highpass.len() >= n, "highpass row too short: {} < {}", highpass.len(), n);
  assert!(output.len() >= 2 * n, "output row too short: {} < {}", output.len(), 2 * n);

  let l0 = lowpass[0] as i32;
  let l1 = lowpass[1] as i32;
  let l2 = lowpass[2] as i32;
  let h0 = highpass[0] as i32;
  output[0] = variant.finish(round_div8(11 * l0 - 4 * l1 + l2) + h0);
  output[1] = variant.finish(round_div8(5 * l0 + 4 * l1 - l2) - h0);

  invert_interior(lowpass, &highpass[..n], &mut output[..2 * n], variant);

  let last = lowpass[n - 1] as i32;
  let prev = lowpass[n - 2] as i32;
  let prev2 = lowpass[n - 3] as i32;
  let hl = highpass[n - 1] as i32;
  output[2 * n - 2] = variant.finish(round_div8(5 * last + 4 * prev - prev2) + hl);
  output[2 * n - 1] = variant.finish(round_div8(11 * last - 4 * prev + prev2) - hl);
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn invert_interior(lowpass: &[i16], highpass: &[i16], output: &mut [i16], variant: FilterVariant) {
  let n = lowpass.len();
  for ((out, l), h) in output[2..2 * n - 2].chunks_exact_mut(2).zip(lowpass.windows(3)).zip(highpass[1..n - 1].iter()) {
    let prev = l[0] as i32;
    let center = l[1] as i32;
    let next = l[2] as i32;
    let h = *h as i32;

    out[0] = variant.finish(round_div8(prev - next) + center + h);
    out[1] = variant.finish(round_div8(next - prev) + center - h);
  }
}
