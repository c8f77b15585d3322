// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use itertools::izip;
use multiversion::multiversion;

use super::{ChannelRows, FormatDescriptor, PixelFormat, PixelPacker, check_rows};
use crate::bits::Endian;

/// Bit position of R, G, B and the 2 bit alpha inside a 32 bit word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WordLayout {
  r: u32,
  g: u32,
  b: u32,
  a: Option<u32>,
}

/// 10 bit RGB, one pixel per 32 bit word (RG30, AB10, AR10, R210, DPX0)
#[derive(Debug, Clone)]
pub struct Rgb10Packer {
  desc: FormatDescriptor,
  layout: WordLayout,
}

impl Rgb10Packer {
  pub fn new(format: PixelFormat) -> Self {
    let layout = match format {
      PixelFormat::Rg30 => WordLayout { r: 0, g: 10, b: 20, a: None },
      PixelFormat::Ab10 => WordLayout {
        r: 0,
        g: 10,
        b: 20,
        a: Some(30),
      },
      PixelFormat::Ar10 => WordLayout {
        r: 20,
        g: 10,
        b: 0,
        a: Some(30),
      },
      PixelFormat::R210 => WordLayout { r: 20, g: 10, b: 0, a: None },
      PixelFormat::Dpx0 => WordLayout { r: 22, g: 12, b: 2, a: None },
      _ => panic!("{} is not a 10 bit RGB format", format),
    };
    Self {
      desc: format.descriptor(),
      layout,
    }
  }
}

impl PixelPacker for Rgb10Packer {
  fn descriptor(&self) -> FormatDescriptor {
    self.desc
  }

  fn pack_row(&self, rows: &ChannelRows<'_>, out: &mut [u8]) {
    check_rows(&self.desc, rows, out);
    match (self.layout.a, rows.alpha) {
      (Some(shift), Some(alpha)) => pack_words(rows.c0, rows.c1, rows.c2, alpha, self.layout, shift, self.desc.endian, out),
      _ => {
        let alpha = match self.layout.a {
          Some(shift) => 3 << shift,
          None => 0,
        };
        pack_words_opaque(rows.c0, rows.c1, rows.c2, self.layout, alpha, self.desc.endian, out)
      }
    }
  }
}

#[inline(always)]
fn rgb_word(r: u16, g: u16, b: u16, layout: WordLayout) -> u32 {
  (r as u32 & 0x3ff) << layout.r | (g as u32 & 0x3ff) << layout.g | (b as u32 & 0x3ff) << layout.b
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
#[allow(clippy::too_many_arguments)]
fn pack_words(r: &[u16], g: &[u16], b: &[u16], a: &[u16], layout: WordLayout, alpha_shift: u32, endian: Endian, out: &mut [u8]) {
  for (o, r, g, b, a) in izip!(out.chunks_exact_mut(4), r, g, b, a) {
    let alpha = (*a as u32 >> 8) << alpha_shift;
    endian.write_u32(o, rgb_word(*r, *g, *b, layout) | alpha);
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn pack_words_opaque(r: &[u16], g: &[u16], b: &[u16], layout: WordLayout, alpha: u32, endian: Endian, out: &mut [u8]) {
  for (o, r, g, b) in izip!(out.chunks_exact_mut(4), r, g, b) {
    endian.write_u32(o, rgb_word(*r, *g, *b, layout) | alpha);
  }
}
