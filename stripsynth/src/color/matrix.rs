// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use serde::{Deserialize, Serialize};

use crate::bits::clampbits;

/// Fraction bits of the fixed point coefficients
pub const MATRIX_FRAC_BITS: u32 = 13;

/// Color matrix sets, broadcast standard x RGB signal range.
///
/// CG: computer graphics RGB (full range 0..255 at 8 bits),
/// VS: video safe RGB (16..235 at 8 bits). The Y'CbCr side is
/// always video range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMatrix {
  Bt601Cg,
  Bt601Vs,
  #[default]
  Bt709Cg,
  Bt709Vs,
}

/// R'G'B' to Y'CbCr, each row `[r, g, b, offset]` at 8 bits
type ForwardRows = [[f32; 4]; 3];

/// Y'CbCr to R'G'B' as `(y_gain, y_offset, r_from_cr, g_from_cb, g_from_cr, b_from_cb)`
type InverseCoeffs = (f32, f32, f32, f32, f32, f32);

impl ColorMatrix {
  pub const ALL: [ColorMatrix; 4] = [Self::Bt601Cg, Self::Bt601Vs, Self::Bt709Cg, Self::Bt709Vs];

  pub fn name(&self) -> &'static str {
    match self {
      Self::Bt601Cg => "601cg",
      Self::Bt601Vs => "601vs",
      Self::Bt709Cg => "709cg",
      Self::Bt709Vs => "709vs",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|m| m.name().eq_ignore_ascii_case(name))
  }

  fn forward_rows(&self) -> ForwardRows {
    match self {
      Self::Bt601Cg => [[0.257, 0.504, 0.098, 16.0], [-0.148, -0.291, 0.439, 128.0], [0.439, -0.368, -0.071, 128.0]],
      Self::Bt601Vs => [[0.299, 0.587, 0.114, 0.0], [-0.172, -0.339, 0.511, 128.0], [0.511, -0.428, -0.083, 128.0]],
      Self::Bt709Cg => [[0.183, 0.614, 0.062, 16.0], [-0.101, -0.338, 0.439, 128.0], [0.439, -0.399, -0.040, 128.0]],
      Self::Bt709Vs => [[0.213, 0.715, 0.072, 0.0], [-0.117, -0.394, 0.511, 128.0], [0.511, -0.464, -0.047, 128.0]],
    }
  }

  fn inverse_coeffs(&self) -> InverseCoeffs {
    match self {
      Self::Bt601Cg => (1.164, 16.0, 1.596, 0.391, 0.813, 2.018),
      Self::Bt601Vs => (1.0, 0.0, 1.371, 0.336, 0.698, 1.732),
      Self::Bt709Cg => (1.164, 16.0, 1.793, 0.213, 0.534, 2.115),
      Self::Bt709Vs => (1.0, 0.0, 1.540, 0.183, 0.459, 1.816),
    }
  }

  /// Fixed point R'G'B' to Y'CbCr transform for `bits` deep samples
  pub fn rgb_to_ycbcr(&self, bits: u32) -> Affine3 {
    let rows = self.forward_rows();
    let scale = offset_scale(bits);
    let mut m = [[0; 3]; 3];
    let mut post = [0; 3];
    for (i, row) in rows.iter().enumerate() {
      for j in 0..3 {
        m[i][j] = to_fixed(row[j]);
      }
      // Chroma rows sum to zero, keep that after rounding so gray stays gray
      if (row[0] + row[1] + row[2]).abs() < 1.0e-6 {
        m[i][1] = -(m[i][0] + m[i][2]);
      }
      post[i] = (row[3] * scale) as i32;
    }
    Affine3 { m, pre: [0; 3], post, bits }
  }

  /// Fixed point Y'CbCr to R'G'B' transform for `bits` deep samples
  pub fn ycbcr_to_rgb(&self, bits: u32) -> Affine3 {
    let (ky, yoff, r_cr, g_cb, g_cr, b_cb) = self.inverse_coeffs();
    let scale = offset_scale(bits);
    let ky = to_fixed(ky);
    let m = [[ky, 0, to_fixed(r_cr)], [ky, -to_fixed(g_cb), -to_fixed(g_cr)], [ky, to_fixed(b_cb), 0]];
    let chroma_mid = (128.0 * scale) as i32;
    Affine3 {
      m,
      pre: [(yoff * scale) as i32, chroma_mid, chroma_mid],
      post: [0; 3],
      bits,
    }
  }
}

impl std::fmt::Display for ColorMatrix {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

fn to_fixed(val: f32) -> i32 {
  (val * (1 << MATRIX_FRAC_BITS) as f32).round() as i32
}

/// Offsets are defined at 8 bits
fn offset_scale(bits: u32) -> f32 {
  (1_u32 << bits) as f32 / 256.0
}

/// out = m * (in - pre) + post, saturated to `bits`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affine3 {
  pub m: [[i32; 3]; 3],
  pub pre: [i32; 3],
  pub post: [i32; 3],
  pub bits: u32,
}

impl Affine3 {
  #[inline(always)]
  pub fn apply(&self, pix: [i32; 3]) -> [u16; 3] {
    let round = 1_i64 << (MATRIX_FRAC_BITS - 1);
    let d = [
      (pix[0] - self.pre[0]) as i64,
      (pix[1] - self.pre[1]) as i64,
      (pix[2] - self.pre[2]) as i64,
    ];
    let mut out = [0; 3];
    for (i, row) in self.m.iter().enumerate() {
      let acc = row[0] as i64 * d[0] + row[1] as i64 * d[1] + row[2] as i64 * d[2];
      let val = ((acc + round) >> MATRIX_FRAC_BITS) as i32 + self.post[i];
      out[i] = clampbits(val, self.bits);
    }
    out
  }
}
