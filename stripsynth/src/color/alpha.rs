// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use serde::{Deserialize, Serialize};

use crate::bits::clampbits;

/// Alpha companding curve parameters.
///
/// The encoder compresses alpha into a smaller range with an offset
/// before the wavelet, decoding reverses it with
/// `((a - dc_offset) * gain) >> scale_bits`. The constants are fixed per
/// codec version and given at `reference_bits` precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaCompanding {
  pub dc_offset: i32,
  pub gain: i32,
  pub scale_bits: u32,
  pub reference_bits: u32,
}

impl Default for AlphaCompanding {
  fn default() -> Self {
    Self {
      dc_offset: 256,
      gain: 9400,
      scale_bits: 13,
      reference_bits: 12,
    }
  }
}

impl AlphaCompanding {
  /// DC offset scaled to `bits` precision
  pub fn dc_offset_at(&self, bits: u32) -> i32 {
    if bits >= self.reference_bits {
      self.dc_offset << (bits - self.reference_bits)
    } else {
      self.dc_offset >> (self.reference_bits - bits)
    }
  }

  #[inline(always)]
  pub fn decompand(&self, alpha: i32, bits: u32) -> u16 {
    let dc = self.dc_offset_at(bits);
    let val = ((alpha - dc) as i64 * self.gain as i64) >> self.scale_bits;
    clampbits(val.clamp(i32::MIN as i64, i32::MAX as i64) as i32, bits)
  }

  pub fn decompand_row(&self, row: &mut [u16], bits: u32) {
    for a in row.iter_mut() {
      *a = self.decompand(*a as i32, bits);
    }
  }
}
