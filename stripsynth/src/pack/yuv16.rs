// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use byteorder::{ByteOrder, LittleEndian};
use itertools::izip;
use multiversion::multiversion;

use super::{ChannelRows, FormatDescriptor, PixelFormat, PixelPacker, check_rows};

/// 16 bit 4:2:2, YU64 interleaved as Y0 U Y1 V or YR16 as one planar
/// row Y[w] U[w/2] V[w/2]. Little endian words.
#[derive(Debug, Clone)]
pub struct Yuv16Packer {
  desc: FormatDescriptor,
  planar: bool,
}

impl Yuv16Packer {
  pub fn new(format: PixelFormat) -> Self {
    let planar = match format {
      PixelFormat::Yu64 => false,
      PixelFormat::Yr16 => true,
      _ => panic!("{} is not a 16 bit 4:2:2 format", format),
    };
    Self {
      desc: format.descriptor(),
      planar,
    }
  }
}

impl PixelPacker for Yuv16Packer {
  fn descriptor(&self) -> FormatDescriptor {
    self.desc
  }

  fn pack_row(&self, rows: &ChannelRows<'_>, out: &mut [u8]) {
    check_rows(&self.desc, rows, out);
    let width = rows.width();
    let cw = width / 2;
    if self.planar {
      let (y_out, rest) = out.split_at_mut(width * 2);
      let (u_out, rest) = rest.split_at_mut(cw * 2);
      write_plane(rows.c0, y_out);
      write_plane(&rows.c1[..cw], u_out);
      write_plane(&rows.c2[..cw], &mut rest[..cw * 2]);
    } else {
      pack_yu64(rows.c0, rows.c1, rows.c2, out);
    }
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn pack_yu64(y: &[u16], u: &[u16], v: &[u16], out: &mut [u8]) {
  for (o, y, u, v) in izip!(out.chunks_exact_mut(8), y.chunks_exact(2), u, v) {
    LittleEndian::write_u16(&mut o[0..], y[0]);
    LittleEndian::write_u16(&mut o[2..], *u);
    LittleEndian::write_u16(&mut o[4..], y[1]);
    LittleEndian::write_u16(&mut o[6..], *v);
  }
}

fn write_plane(samples: &[u16], out: &mut [u8]) {
  LittleEndian::write_u16_into(samples, out);
}

#[cfg(test)]
mod tests {
  use super::*;

  fn words(bytes: &[u8]) -> Vec<u16> {
    bytes.chunks_exact(2).map(LittleEndian::read_u16).collect()
  }

  #[test]
  fn yu64_interleave() {
    crate::init_test_logger();
    let y = [0x1000, 0x2000, 0x3000, 0x4000];
    let u = [0xA000, 0xB000];
    let v = [0xC000, 0xD000];
    let rows = ChannelRows::new(&y, &u, &v, None);
    let mut out = vec![0; 16];
    PixelFormat::Yu64.packer().pack_row(&rows, &mut out);
    assert_eq!(words(&out), [0x1000, 0xA000, 0x2000, 0xC000, 0x3000, 0xB000, 0x4000, 0xD000]);
  }

  #[test]
  fn yr16_planar_row() {
    let y = [1, 2, 3, 4];
    let u = [5, 6];
    let v = [7, 8];
    let rows = ChannelRows::new(&y, &u, &v, None);
    let mut out = vec![0; 16];
    PixelFormat::Yr16.packer().pack_row(&rows, &mut out);
    assert_eq!(words(&out), [1, 2, 3, 4, 5, 6, 7, 8]);
  }
}
