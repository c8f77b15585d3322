// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

mod alpha;
mod matrix;

pub use alpha::AlphaCompanding;
pub use matrix::{Affine3, ColorMatrix, MATRIX_FRAC_BITS};

use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::bits::max_value;
use crate::params::{ColorDescriptor, SourceLayout};

/// Color representation of packed output rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
  /// Rows ordered Y, Cb, Cr
  YCbCr,
  /// Rows ordered R, G, B
  Rgb,
}

/// Converts rescaled channel rows from the source layout into the color
/// representation of the target pixel format.
///
/// Works in place on three equally long rows in Y, Cb, Cr or R, G, B
/// order. Differential sources must already be rebuilt with
/// [`reconstruct_rgb_row`] at the working precision.
#[derive(Debug, Clone)]
pub struct ColorTransformer {
  source: SourceLayout,
  target: ColorSpace,
  bits: u32,
  matrix: Option<Affine3>,
  alpha: Option<AlphaCompanding>,
}

impl ColorTransformer {
  pub fn new(source: SourceLayout, target: ColorSpace, color: &ColorDescriptor, bits: u32) -> Self {
    let matrix = match (source, target) {
      (SourceLayout::Yuv422 | SourceLayout::Yuv444, ColorSpace::YCbCr) => None,
      (SourceLayout::Yuv422 | SourceLayout::Yuv444, ColorSpace::Rgb) => Some(color.matrix.ycbcr_to_rgb(bits)),
      (SourceLayout::Rgb444, ColorSpace::Rgb) => None,
      (SourceLayout::Rgb444, ColorSpace::YCbCr) => Some(color.matrix.rgb_to_ycbcr(bits)),
    };
    Self {
      source,
      target,
      bits,
      matrix,
      alpha: color.alpha,
    }
  }

  /// True if the source rows hold G, R-G, B-G
  pub fn differential(&self) -> bool {
    self.source == SourceLayout::Rgb444
  }

  /// True if 4:2:2 chroma must be upsampled before `transform_row`
  pub fn requires_full_chroma(&self) -> bool {
    self.source == SourceLayout::Yuv422 && self.target == ColorSpace::Rgb
  }

  /// True if `transform_row` leaves the rows untouched
  pub fn is_passthrough(&self) -> bool {
    self.matrix.is_none()
  }

  pub fn transform_row(&self, c0: &mut [u16], c1: &mut [u16], c2: &mut [u16]) {
    let Some(matrix) = self.matrix.as_ref() else {
      return;
    };
    assert!(c0.len() == c1.len() && c1.len() == c2.len(), "color transform needs 4:4:4 rows");
    for (p0, p1, p2) in izip!(c0.iter_mut(), c1.iter_mut(), c2.iter_mut()) {
      [*p0, *p1, *p2] = matrix.apply([*p0 as i32, *p1 as i32, *p2 as i32]);
    }
  }

  /// Decompand the alpha row, if the session carries a companding curve
  pub fn transform_alpha(&self, alpha: &mut [u16]) {
    if let Some(curve) = self.alpha.as_ref() {
      curve.decompand_row(alpha, self.bits);
    }
  }
}

/// Rebuild R'G'B' from G, (R-G) and (B-G). The difference channels are
/// stored halved around mid gray.
#[inline(always)]
pub fn reconstruct_rgb(g: i32, rg: i32, bg: i32, bits: u32) -> [i16; 3] {
  let offset = 1 << bits;
  let max = max_value(bits).min(i16::MAX as i32);
  let r = 2 * rg + g - offset;
  let b = 2 * bg + g - offset;
  [r.clamp(0, max) as i16, g.clamp(0, max) as i16, b.clamp(0, max) as i16]
}

/// Turn reconstructed G, R-G, B-G rows of `bits` precision into R, G, B
/// rows in place.
pub fn reconstruct_rgb_row(c0: &mut [i16], c1: &mut [i16], c2: &mut [i16], bits: u32) {
  assert!(c0.len() == c1.len() && c1.len() == c2.len(), "differential rows differ in length");
  for (p0, p1, p2) in izip!(c0.iter_mut(), c1.iter_mut(), c2.iter_mut()) {
    [*p0, *p1, *p2] = reconstruct_rgb(*p0 as i32, *p1 as i32, *p2 as i32, bits);
  }
}
