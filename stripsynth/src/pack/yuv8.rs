// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use itertools::izip;
use multiversion::multiversion;

use super::{ChannelRows, FormatDescriptor, PixelFormat, PixelPacker, check_rows};

/// 8 bit 4:2:2 byte interleave (YUYV, UYVY)
#[derive(Debug, Clone)]
pub struct Yuv422Packer {
  desc: FormatDescriptor,
  luma_first: bool,
}

impl Yuv422Packer {
  pub fn new(format: PixelFormat) -> Self {
    let luma_first = match format {
      PixelFormat::Yuyv => true,
      PixelFormat::Uyvy => false,
      _ => panic!("{} is not an 8 bit 4:2:2 format", format),
    };
    Self {
      desc: format.descriptor(),
      luma_first,
    }
  }
}

impl PixelPacker for Yuv422Packer {
  fn descriptor(&self) -> FormatDescriptor {
    self.desc
  }

  fn pack_row(&self, rows: &ChannelRows<'_>, out: &mut [u8]) {
    check_rows(&self.desc, rows, out);
    if self.luma_first {
      pack_yuyv(rows.c0, rows.c1, rows.c2, out);
    } else {
      pack_uyvy(rows.c0, rows.c1, rows.c2, out);
    }
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn pack_yuyv(y: &[u16], u: &[u16], v: &[u16], out: &mut [u8]) {
  for (o, y, u, v) in izip!(out.chunks_exact_mut(4), y.chunks_exact(2), u, v) {
    o[0] = y[0] as u8;
    o[1] = *u as u8;
    o[2] = y[1] as u8;
    o[3] = *v as u8;
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn pack_uyvy(y: &[u16], u: &[u16], v: &[u16], out: &mut [u8]) {
  for (o, y, u, v) in izip!(out.chunks_exact_mut(4), y.chunks_exact(2), u, v) {
    o[0] = *u as u8;
    o[1] = y[0] as u8;
    o[2] = *v as u8;
    o[3] = y[1] as u8;
  }
}

/// 8 bit 4:4:4 with alpha (V408 as U Y V A, AYUV as A Y U V)
#[derive(Debug, Clone)]
pub struct Yuva444Packer {
  desc: FormatDescriptor,
  /// Byte position of Y, U, V, A inside a pixel
  slots: [usize; 4],
}

impl Yuva444Packer {
  pub fn new(format: PixelFormat) -> Self {
    let slots = match format {
      PixelFormat::V408 => [1, 0, 2, 3],
      PixelFormat::Ayuv => [1, 2, 3, 0],
      _ => panic!("{} is not an 8 bit 4:4:4 alpha format", format),
    };
    Self {
      desc: format.descriptor(),
      slots,
    }
  }
}

impl PixelPacker for Yuva444Packer {
  fn descriptor(&self) -> FormatDescriptor {
    self.desc
  }

  fn pack_row(&self, rows: &ChannelRows<'_>, out: &mut [u8]) {
    check_rows(&self.desc, rows, out);
    let [sy, su, sv, sa] = self.slots;
    let opaque = self.desc.opaque();
    for (i, (o, y, u, v)) in izip!(out.chunks_exact_mut(4), rows.c0, rows.c1, rows.c2).enumerate() {
      let a = rows.alpha.map(|alpha| alpha[i]).unwrap_or(opaque);
      o[sy] = *y as u8;
      o[su] = *u as u8;
      o[sv] = *v as u8;
      o[sa] = a as u8;
    }
  }
}
