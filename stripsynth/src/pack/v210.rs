// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

//! 10 bit 4:2:2 in 32 bit little endian words. Six pixels share four
//! words, three samples per word at bit 0, 10 and 20:
//!
//! ```text
//! w0: Cb0 Y0  Cr0
//! w1: Y1  Cb1 Y2
//! w2: Cr1 Y3  Cb2
//! w3: Y4  Cr2 Y5
//! ```
//!
//! Rows are padded to a multiple of 48 pixels.

use byteorder::{ByteOrder, LittleEndian};
use multiversion::multiversion;

use super::{ChannelRows, FormatDescriptor, PixelFormat, PixelPacker, check_rows};

#[derive(Debug, Clone, Copy)]
pub struct V210Packer;

impl PixelPacker for V210Packer {
  fn descriptor(&self) -> FormatDescriptor {
    PixelFormat::V210.descriptor()
  }

  fn pack_row(&self, rows: &ChannelRows<'_>, out: &mut [u8]) {
    let desc = self.descriptor();
    check_rows(&desc, rows, out);
    let width = rows.width();
    let (data, padding) = out[..desc.row_bytes(width)].split_at_mut(width / 6 * 16);
    pack_v210(rows.c0, rows.c1, rows.c2, data);
    padding.fill(0);
  }
}

#[inline(always)]
fn word(a: u16, b: u16, c: u16) -> u32 {
  (a as u32 & 0x3ff) | (b as u32 & 0x3ff) << 10 | (c as u32 & 0x3ff) << 20
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn pack_v210(y: &[u16], u: &[u16], v: &[u16], out: &mut [u8]) {
  for (((o, y), u), v) in out.chunks_exact_mut(16).zip(y.chunks_exact(6)).zip(u.chunks_exact(3)).zip(v.chunks_exact(3)) {
    LittleEndian::write_u32(&mut o[0..], word(u[0], y[0], v[0]));
    LittleEndian::write_u32(&mut o[4..], word(y[1], u[1], y[2]));
    LittleEndian::write_u32(&mut o[8..], word(v[1], y[3], u[2]));
    LittleEndian::write_u32(&mut o[12..], word(y[4], v[2], y[5]));
  }
}
