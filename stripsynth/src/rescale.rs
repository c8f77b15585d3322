// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use multiversion::multiversion;

use crate::bits::clampbits;

/// Noise source for precision reduction.
///
/// Multiply-with-carry generator, cheap enough to run per sample.
/// Each strip owns its own instance.
#[derive(Debug, Clone)]
pub struct Dither {
  state: u32,
}

impl Dither {
  pub fn new(seed: u32) -> Self {
    // A zero state never leaves zero
    let state = if seed == 0 { 0x2545_F491 } else { seed };
    Self { state }
  }

  /// Next rounding term in `[0, 2^(shift - 1) - 1]`
  #[inline(always)]
  pub fn next(&mut self, shift: u32) -> i32 {
    debug_assert!(shift >= 1);
    let mask = (1_u32 << (shift - 1)) - 1;
    let term = (self.state >> 4) & mask;
    self.state = 15700 * (self.state & 65535) + (self.state >> 16);
    term as i32
  }
}

/// Maps reconstructed samples of `input_bits` precision to `output_bits`.
#[derive(Debug, Clone)]
pub struct Rescaler {
  input_bits: u32,
  output_bits: u32,
  dither: Option<Dither>,
}

impl Rescaler {
  pub fn new(input_bits: u32, output_bits: u32) -> Self {
    assert!((1..=16).contains(&input_bits), "invalid input depth: {}", input_bits);
    assert!((1..=16).contains(&output_bits), "invalid output depth: {}", output_bits);
    Self {
      input_bits,
      output_bits,
      dither: None,
    }
  }

  /// Enable dithering. Only takes effect when the precision is reduced
  /// by two or more bits.
  pub fn with_dither(mut self, seed: u32) -> Self {
    self.dither = Some(Dither::new(seed));
    self
  }

  /// True if this rescaler adds dither noise
  pub fn dithered(&self) -> bool {
    self.dither.is_some() && self.input_bits >= self.output_bits + 2
  }

  /// Scalar version of `rescale_row`
  #[cfg(test)]
  fn rescale(&mut self, val: i32) -> u16 {
    if self.input_bits > self.output_bits {
      let shift = self.input_bits - self.output_bits;
      let term = match self.dither.as_mut() {
        Some(dither) if shift >= 2 => dither.next(shift),
        _ => 0,
      };
      clampbits((val + term) >> shift, self.output_bits)
    } else {
      clampbits(val << (self.output_bits - self.input_bits), self.output_bits)
    }
  }

  pub fn rescale_row(&mut self, input: &[i16], output: &mut [u16]) {
    assert!(output.len() >= input.len(), "rescale output too short: {} < {}", output.len(), input.len());
    let output = &mut output[..input.len()];
    if self.input_bits > self.output_bits {
      let shift = self.input_bits - self.output_bits;
      match self.dither.as_mut() {
        Some(dither) if shift >= 2 => shift_down_dither(input, output, shift, self.output_bits, dither),
        _ => shift_down(input, output, shift, self.output_bits),
      }
    } else {
      shift_up(input, output, self.output_bits - self.input_bits, self.output_bits);
    }
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn shift_down(input: &[i16], output: &mut [u16], shift: u32, bits: u32) {
  for (o, i) in output.iter_mut().zip(input.iter()) {
    *o = clampbits((*i as i32) >> shift, bits);
  }
}

fn shift_down_dither(input: &[i16], output: &mut [u16], shift: u32, bits: u32, dither: &mut Dither) {
  for (o, i) in output.iter_mut().zip(input.iter()) {
    *o = clampbits((*i as i32 + dither.next(shift)) >> shift, bits);
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn shift_up(input: &[i16], output: &mut [u16], shift: u32, bits: u32) {
  for (o, i) in output.iter_mut().zip(input.iter()) {
    *o = clampbits((*i as i32) << shift, bits);
  }
}
