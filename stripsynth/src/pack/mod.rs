// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

//! Pixel interchange formats and the packers producing them.
//!
//! Every packer takes rescaled and color converted channel rows at the
//! channel width of its format and writes exactly one output row.

use std::fmt::Display;
use std::str::FromStr;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::bits::{Endian, max_value};
use crate::chroma::{ChromaSampling, SubsampleFilter};
use crate::color::ColorSpace;
use crate::wavelet::HalfRounding;
use crate::{Result, SynthError};

pub mod rgb10;
pub mod rgb16;
pub mod v210;
pub mod yuv16;
pub mod yuv8;

/// Supported output formats, discriminant is the little endian FourCC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[repr(u32)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
  Yuyv = 0x5659_5559,
  Uyvy = 0x5956_5955,
  V408 = 0x3830_3476,
  Ayuv = 0x5655_5941,
  V210 = 0x3031_3276,
  Yu64 = 0x3436_5559,
  Yr16 = 0x3631_5259,
  Rg30 = 0x3033_4752,
  Ab10 = 0x3031_4241,
  Ar10 = 0x3031_5241,
  R210 = 0x3031_3272,
  Dpx0 = 0x3058_5044,
  B64a = 0x6134_3662,
  Rg48 = 0x3834_4752,
}

impl PixelFormat {
  pub const ALL: [PixelFormat; 14] = [
    Self::Yuyv,
    Self::Uyvy,
    Self::V408,
    Self::Ayuv,
    Self::V210,
    Self::Yu64,
    Self::Yr16,
    Self::Rg30,
    Self::Ab10,
    Self::Ar10,
    Self::R210,
    Self::Dpx0,
    Self::B64a,
    Self::Rg48,
  ];

  /// FourCC as written in containers
  pub fn fourcc(&self) -> &'static str {
    match self {
      Self::Yuyv => "YUYV",
      Self::Uyvy => "UYVY",
      Self::V408 => "v408",
      Self::Ayuv => "AYUV",
      Self::V210 => "v210",
      Self::Yu64 => "YU64",
      Self::Yr16 => "YR16",
      Self::Rg30 => "RG30",
      Self::Ab10 => "AB10",
      Self::Ar10 => "AR10",
      Self::R210 => "r210",
      Self::Dpx0 => "DPX0",
      Self::B64a => "b64a",
      Self::Rg48 => "RG48",
    }
  }

  /// Lookup by FourCC, case insensitive. YUY2 and 2vuy are accepted
  /// as aliases for YUYV and UYVY.
  pub fn from_fourcc(fourcc: &str) -> Result<Self> {
    let fourcc = fourcc.trim();
    if fourcc.eq_ignore_ascii_case("yuy2") {
      return Ok(Self::Yuyv);
    }
    if fourcc.eq_ignore_ascii_case("2vuy") {
      return Ok(Self::Uyvy);
    }
    Self::ALL
      .iter()
      .copied()
      .find(|f| f.fourcc().eq_ignore_ascii_case(fourcc))
      .ok_or_else(|| SynthError::UnknownFormat(fourcc.to_string()))
  }

  /// Lookup by numeric FourCC code
  pub fn from_code(code: u32) -> Result<Self> {
    Self::try_from(code).map_err(|_| SynthError::UnknownFormat(format!("0x{:08x}", code)))
  }

  pub fn code(&self) -> u32 {
    *self as u32
  }

  pub fn descriptor(&self) -> FormatDescriptor {
    use ChromaSampling::*;
    use ColorSpace::*;
    let (color, chroma, channel_bits, alpha) = match self {
      Self::Yuyv | Self::Uyvy => (YCbCr, Half, 8, false),
      Self::V408 | Self::Ayuv => (YCbCr, Full, 8, true),
      Self::V210 => (YCbCr, Half, 10, false),
      Self::Yu64 | Self::Yr16 => (YCbCr, Half, 16, false),
      Self::Rg30 | Self::R210 | Self::Dpx0 => (Rgb, Full, 10, false),
      Self::Ab10 | Self::Ar10 => (Rgb, Full, 10, true),
      Self::B64a => (Rgb, Full, 16, true),
      Self::Rg48 => (Rgb, Full, 16, false),
    };
    let subsample = match self {
      Self::Yuyv | Self::Uyvy => SubsampleFilter::Pairwise,
      _ => SubsampleFilter::CenterWeighted,
    };
    let endian = match self {
      Self::R210 | Self::Dpx0 | Self::B64a => Endian::Big,
      _ => Endian::Little,
    };
    let alignment = match (self, chroma) {
      (Self::V210, _) => 6,
      (_, Half) => 2,
      (_, Full) => 1,
    };
    FormatDescriptor {
      format: *self,
      color,
      chroma,
      channel_bits,
      alpha,
      subsample,
      half_rounding: HalfRounding::Truncate,
      endian,
      alignment,
    }
  }

  pub fn packer(&self) -> Box<dyn PixelPacker> {
    match self {
      Self::Yuyv | Self::Uyvy => Box::new(yuv8::Yuv422Packer::new(*self)),
      Self::V408 | Self::Ayuv => Box::new(yuv8::Yuva444Packer::new(*self)),
      Self::V210 => Box::new(v210::V210Packer),
      Self::Yu64 | Self::Yr16 => Box::new(yuv16::Yuv16Packer::new(*self)),
      Self::Rg30 | Self::Ab10 | Self::Ar10 | Self::R210 | Self::Dpx0 => Box::new(rgb10::Rgb10Packer::new(*self)),
      Self::B64a | Self::Rg48 => Box::new(rgb16::Rgb16Packer::new(*self)),
    }
  }
}

impl Display for PixelFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.fourcc())
  }
}

impl FromStr for PixelFormat {
  type Err = SynthError;

  fn from_str(s: &str) -> Result<Self> {
    Self::from_fourcc(s)
  }
}

/// Immutable per session description of a target format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
  pub format: PixelFormat,
  pub color: ColorSpace,
  pub chroma: ChromaSampling,
  /// Bits per channel sample the packer expects
  pub channel_bits: u32,
  pub alpha: bool,
  pub subsample: SubsampleFilter,
  pub half_rounding: HalfRounding,
  pub endian: Endian,
  /// Row width must be a multiple of this
  pub alignment: usize,
}

impl FormatDescriptor {
  /// Bytes written for one row of `width` pixels, including padding
  pub fn row_bytes(&self, width: usize) -> usize {
    match self.format {
      PixelFormat::Yuyv | PixelFormat::Uyvy => width * 2,
      PixelFormat::V210 => width.div_ceil(48) * 128,
      PixelFormat::Yu64 | PixelFormat::Yr16 => width * 4,
      PixelFormat::V408 | PixelFormat::Ayuv => width * 4,
      PixelFormat::Rg30 | PixelFormat::Ab10 | PixelFormat::Ar10 | PixelFormat::R210 | PixelFormat::Dpx0 => width * 4,
      PixelFormat::Rg48 => width * 6,
      PixelFormat::B64a => width * 8,
    }
  }

  /// Smallest output buffer holding `height` rows at `pitch`
  pub fn min_buffer_len(&self, width: usize, height: usize, pitch: usize) -> usize {
    match height {
      0 => 0,
      h => pitch * (h - 1) + self.row_bytes(width),
    }
  }

  /// Number of chroma samples per row the packer expects
  pub fn chroma_width(&self, width: usize) -> usize {
    match self.chroma {
      ChromaSampling::Full => width,
      ChromaSampling::Half => width / 2,
    }
  }

  pub fn is_aligned(&self, width: usize) -> bool {
    width % self.alignment == 0
  }

  /// Sample value written when no alpha channel is decoded
  pub fn opaque(&self) -> u16 {
    max_value(self.channel_bits) as u16
  }
}

/// Channel rows handed to a packer. Channel order is Y, Cb, Cr for
/// YCbCr formats and R, G, B for RGB formats. Chroma rows are at
/// the chroma width of the format.
#[derive(Debug, Clone, Copy)]
pub struct ChannelRows<'a> {
  pub c0: &'a [u16],
  pub c1: &'a [u16],
  pub c2: &'a [u16],
  pub alpha: Option<&'a [u16]>,
}

impl<'a> ChannelRows<'a> {
  pub fn new(c0: &'a [u16], c1: &'a [u16], c2: &'a [u16], alpha: Option<&'a [u16]>) -> Self {
    Self { c0, c1, c2, alpha }
  }

  pub fn width(&self) -> usize {
    self.c0.len()
  }
}

/// Interleaves channel rows into one output row of a pixel format
pub trait PixelPacker: Send + Sync {
  fn descriptor(&self) -> FormatDescriptor;

  /// Pack `rows` into `out`. `out` must hold at least `row_bytes(width)`.
  fn pack_row(&self, rows: &ChannelRows<'_>, out: &mut [u8]);
}

/// Panics on rows that don't match the format geometry
pub(crate) fn check_rows(desc: &FormatDescriptor, rows: &ChannelRows<'_>, out: &[u8]) {
  let width = rows.width();
  let cw = desc.chroma_width(width);
  assert!(desc.is_aligned(width), "{}: width {} not a multiple of {}", desc.format, width, desc.alignment);
  assert!(rows.c1.len() >= cw && rows.c2.len() >= cw, "{}: chroma rows shorter than {}", desc.format, cw);
  if let Some(alpha) = rows.alpha {
    assert!(alpha.len() >= width, "{}: alpha row shorter than {}", desc.format, width);
  }
  assert!(
    out.len() >= desc.row_bytes(width),
    "{}: output row too short: {} < {}",
    desc.format,
    out.len(),
    desc.row_bytes(width)
  );
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  #[test]
  fn fourcc_lookup() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    for format in PixelFormat::ALL {
      assert_eq!(PixelFormat::from_fourcc(format.fourcc())?, format);
      assert_eq!(PixelFormat::from_code(format.code())?, format);
      assert_eq!(format.code().to_le_bytes(), format.fourcc().as_bytes());
    }
    assert_eq!(PixelFormat::from_fourcc("yuy2")?, PixelFormat::Yuyv);
    assert_eq!("R210".parse::<PixelFormat>()?, PixelFormat::R210);
    Ok(())
  }

  #[test]
  fn unknown_fourcc_rejected() {
    assert!(matches!(PixelFormat::from_fourcc("NV12"), Err(SynthError::UnknownFormat(_))));
    assert!(matches!(PixelFormat::from_code(0), Err(SynthError::UnknownFormat(_))));
  }

  #[test]
  fn row_bytes_and_padding() {
    assert_eq!(PixelFormat::Yuyv.descriptor().row_bytes(16), 32);
    assert_eq!(PixelFormat::V210.descriptor().row_bytes(6), 128);
    assert_eq!(PixelFormat::V210.descriptor().row_bytes(48), 128);
    assert_eq!(PixelFormat::V210.descriptor().row_bytes(54), 256);
    assert_eq!(PixelFormat::B64a.descriptor().row_bytes(3), 24);
    assert_eq!(PixelFormat::Rg48.descriptor().row_bytes(3), 18);
    assert_eq!(PixelFormat::Yuyv.descriptor().min_buffer_len(16, 3, 40), 112);
  }

  #[test]
  fn descriptors_are_consistent() {
    for format in PixelFormat::ALL {
      let desc = format.descriptor();
      assert_eq!(desc.format, format);
      assert!([8, 10, 16].contains(&desc.channel_bits));
      if desc.color == ColorSpace::Rgb {
        assert_eq!(desc.chroma, ChromaSampling::Full, "{}", format);
      }
      assert_eq!(format.packer().descriptor(), desc);
    }
    assert_eq!(PixelFormat::V210.descriptor().alignment, 6);
    assert!(!PixelFormat::Uyvy.descriptor().is_aligned(7));
  }

  /// Constant rows at the chroma width of `format`
  pub(crate) fn constant_rows(format: PixelFormat, width: usize, y: u16, u: u16, v: u16) -> (Vec<u16>, Vec<u16>, Vec<u16>) {
    let cw = format.descriptor().chroma_width(width);
    (vec![y; width], vec![u; cw], vec![v; cw])
  }
}
