// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use itertools::izip;
use multiversion::multiversion;

use super::{ChannelRows, FormatDescriptor, PixelFormat, PixelPacker, check_rows};
use crate::bits::Endian;

/// 16 bit RGB words, B64A as big endian A R G B, RG48 as little endian R G B
#[derive(Debug, Clone)]
pub struct Rgb16Packer {
  desc: FormatDescriptor,
}

impl Rgb16Packer {
  pub fn new(format: PixelFormat) -> Self {
    assert!(matches!(format, PixelFormat::B64a | PixelFormat::Rg48), "{} is not a 16 bit RGB format", format);
    Self { desc: format.descriptor() }
  }
}

impl PixelPacker for Rgb16Packer {
  fn descriptor(&self) -> FormatDescriptor {
    self.desc
  }

  fn pack_row(&self, rows: &ChannelRows<'_>, out: &mut [u8]) {
    check_rows(&self.desc, rows, out);
    match self.desc.format {
      PixelFormat::B64a => {
        let opaque = self.desc.opaque();
        for (i, (o, r, g, b)) in izip!(out.chunks_exact_mut(8), rows.c0, rows.c1, rows.c2).enumerate() {
          let a = rows.alpha.map(|alpha| alpha[i]).unwrap_or(opaque);
          for (slot, val) in o.chunks_exact_mut(2).zip([a, *r, *g, *b]) {
            Endian::Big.write_u16(slot, val);
          }
        }
      }
      _ => pack_rg48(rows.c0, rows.c1, rows.c2, out),
    }
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn pack_rg48(r: &[u16], g: &[u16], b: &[u16], out: &mut [u8]) {
  for (o, r, g, b) in izip!(out.chunks_exact_mut(6), r, g, b) {
    Endian::Little.write_u16(&mut o[0..], *r);
    Endian::Little.write_u16(&mut o[2..], *g);
    Endian::Little.write_u16(&mut o[4..], *b);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn b64a_argb_big_endian() {
    crate::init_test_logger();
    let rows = ChannelRows::new(&[0x1122], &[0x3344], &[0x5566], Some(&[0x7788][..]));
    let mut out = [0; 8];
    PixelFormat::B64a.packer().pack_row(&rows, &mut out);
    assert_eq!(out, [0x77, 0x88, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);

    let opaque = ChannelRows::new(&[0x1122], &[0x3344], &[0x5566], None);
    PixelFormat::B64a.packer().pack_row(&opaque, &mut out);
    assert_eq!(out[..2], [0xFF, 0xFF]);
  }

  #[test]
  fn rg48_little_endian() {
    let rows = ChannelRows::new(&[0x1122, 1], &[0x3344, 2], &[0x5566, 3], None);
    let mut out = [0; 12];
    PixelFormat::Rg48.packer().pack_row(&rows, &mut out);
    assert_eq!(out, [0x22, 0x11, 0x44, 0x33, 0x66, 0x55, 1, 0, 2, 0, 3, 0]);
  }
}
