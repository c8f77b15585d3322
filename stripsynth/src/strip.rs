// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

//! Row loop over one strip: synthesis, rescale, color conversion and
//! packing for every row, plus a rayon driven frame helper.

use log::{debug, trace};
use rayon::prelude::*;

use crate::chroma::{self, ChromaSampling};
use crate::color::{self, ColorTransformer};
use crate::envparams;
use crate::pack::{ChannelRows, FormatDescriptor, PixelPacker};
use crate::params::DecodeParams;
use crate::rescale::Rescaler;
use crate::wavelet::{self, FilterVariant};
use crate::{Result, SynthError};

/// Base seed when neither the session nor the environment sets one
const DEFAULT_DITHER_SEED: u32 = 0x1234_5678;

/// Lowpass and highpass coefficients of one channel, row major with
/// `pitch` samples between rows.
#[derive(Debug, Clone, Copy)]
pub struct BandPlane<'a> {
  lowpass: &'a [i16],
  highpass: &'a [i16],
  width: usize,
  pitch: usize,
}

impl<'a> BandPlane<'a> {
  pub fn new(lowpass: &'a [i16], highpass: &'a [i16], width: usize, pitch: usize) -> Self {
    Self {
      lowpass,
      highpass,
      width,
      pitch,
    }
  }

  /// Coefficients per row
  pub fn width(&self) -> usize {
    self.width
  }

  pub fn pitch(&self) -> usize {
    self.pitch
  }

  fn row(&self, row: usize) -> (&'a [i16], &'a [i16]) {
    let start = row * self.pitch;
    (&self.lowpass[start..start + self.width], &self.highpass[start..start + self.width])
  }

  fn check(&self, channel: usize, height: usize) -> Result<()> {
    if self.pitch < self.width {
      return Err(SynthError::ContractViolation(format!(
        "channel {}: pitch {} smaller than width {}",
        channel, self.pitch, self.width
      )));
    }
    let needed = match height {
      0 => 0,
      h => self.pitch * (h - 1) + self.width,
    };
    if self.lowpass.len() < needed || self.highpass.len() < needed {
      return Err(SynthError::ContractViolation(format!(
        "channel {}: band buffers hold {}/{} coefficients, {} rows need {}",
        channel,
        self.lowpass.len(),
        self.highpass.len(),
        height,
        needed
      )));
    }
    Ok(())
  }
}

/// All channels of one strip. Plane order is Y, U, V or G, R-G, B-G,
/// optionally followed by alpha.
#[derive(Debug, Clone)]
pub struct StripInput<'a> {
  planes: Vec<BandPlane<'a>>,
  height: usize,
  first_row: usize,
}

impl<'a> StripInput<'a> {
  pub fn new(planes: Vec<BandPlane<'a>>, height: usize) -> Self {
    Self {
      planes,
      height,
      first_row: 0,
    }
  }

  /// Frame row of the first strip row, seeds the dither generators
  pub fn at_row(mut self, first_row: usize) -> Self {
    self.first_row = first_row;
    self
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn first_row(&self) -> usize {
    self.first_row
  }

  pub fn planes(&self) -> &[BandPlane<'a>] {
    &self.planes
  }

  /// Output pixels per row
  pub fn pixel_width(&self) -> usize {
    self.planes.first().map(|p| p.width * 2).unwrap_or(0)
  }
}

/// Per worker row buffers, reused across strips
#[derive(Debug, Clone)]
pub struct Scratch {
  max_width: usize,
  recon: [Vec<i16>; 4],
  channels: [Vec<u16>; 4],
  full: [Vec<u16>; 2],
  half: [Vec<u16>; 2],
}

impl Scratch {
  pub fn new(max_width: usize) -> Self {
    Self {
      max_width,
      recon: [vec![0; max_width], vec![0; max_width], vec![0; max_width], vec![0; max_width]],
      channels: [vec![0; max_width], vec![0; max_width], vec![0; max_width], vec![0; max_width]],
      full: [vec![0; max_width], vec![0; max_width]],
      half: [vec![0; max_width / 2], vec![0; max_width / 2]],
    }
  }

  pub fn max_width(&self) -> usize {
    self.max_width
  }
}

/// Decodes strips for one session. Immutable once built, share it
/// between threads.
pub struct StripDecoder {
  params: DecodeParams,
  format: FormatDescriptor,
  packer: Box<dyn PixelPacker>,
  transformer: ColorTransformer,
  variant: FilterVariant,
  output_bits: u32,
  dither_seed: Option<u32>,
}

impl StripDecoder {
  pub fn new(params: &DecodeParams) -> Result<Self> {
    params.validate()?;
    let format = params.format_descriptor();
    let precision = &params.precision;
    let output_bits = precision.output_bits_for(&format);

    let variant = match precision.descale {
      Some(shift) => FilterVariant::descale(shift),
      None if format.channel_bits == 10 && precision.internal_bits == 10 => FilterVariant::limited(10, format.half_rounding),
      None => FilterVariant::Standard(format.half_rounding),
    };

    let dither_seed = if precision.dither && !envparams::stripsynth_no_dither() {
      Some(params.dither_seed.or_else(envparams::stripsynth_dither_seed).unwrap_or(DEFAULT_DITHER_SEED))
    } else {
      None
    };

    let decoder = Self {
      params: params.clone(),
      format,
      packer: params.format.packer(),
      transformer: ColorTransformer::new(params.source, format.color, &params.color, output_bits),
      variant,
      output_bits,
      dither_seed,
    };
    debug!("Strip decoder: {}", decoder.describe());
    Ok(decoder)
  }

  pub fn format(&self) -> &FormatDescriptor {
    &self.format
  }

  pub fn params(&self) -> &DecodeParams {
    &self.params
  }

  pub fn variant(&self) -> FilterVariant {
    self.variant
  }

  /// One line summary of the session
  pub fn describe(&self) -> String {
    format!(
      "{} from {}{}, {} -> {} bits, filter {:?}, matrix {}, subsample {:?}, dither {}",
      self.format.format,
      self.params.source.name(),
      if self.params.alpha { "+alpha" } else { "" },
      self.params.precision.internal_bits,
      self.output_bits,
      self.variant,
      self.params.color.matrix,
      self.format.subsample,
      match self.dither_seed {
        Some(seed) => format!("0x{:08x}", seed),
        None => "off".to_string(),
      }
    )
  }

  /// Check a strip against the session before anything is written
  pub fn validate_strip(&self, input: &StripInput<'_>, scratch: &Scratch, output: &[u8], pitch: usize) -> Result<()> {
    let expected = self.params.channel_count();
    if input.planes.len() != expected {
      return Err(SynthError::ContractViolation(format!(
        "strip carries {} channels, session expects {}",
        input.planes.len(),
        expected
      )));
    }
    let luma = input.planes[0].width;
    let chroma = match self.params.source.chroma() {
      ChromaSampling::Full => luma,
      ChromaSampling::Half => {
        if luma % 2 != 0 {
          return Err(SynthError::ContractViolation(format!("4:2:2 luma width {} is odd", luma)));
        }
        luma / 2
      }
    };
    for (channel, plane) in input.planes.iter().enumerate() {
      let wanted = if channel == 1 || channel == 2 { chroma } else { luma };
      if plane.width != wanted {
        return Err(SynthError::ContractViolation(format!(
          "channel {} has {} coefficients per row, expected {}",
          channel, plane.width, wanted
        )));
      }
      if plane.width < 3 {
        return Err(SynthError::ContractViolation(format!(
          "channel {} has {} coefficients per row, synthesis needs at least 3",
          channel, plane.width
        )));
      }
      plane.check(channel, input.height)?;
    }

    let width = input.pixel_width();
    if !self.format.is_aligned(width) {
      return Err(SynthError::ContractViolation(format!(
        "width {} is not a multiple of {} required by {}",
        width, self.format.alignment, self.format.format
      )));
    }
    if scratch.max_width < width {
      return Err(SynthError::ContractViolation(format!(
        "scratch holds {} samples, row needs {}",
        scratch.max_width, width
      )));
    }
    let row_bytes = self.format.row_bytes(width);
    if input.height > 0 && pitch < row_bytes {
      return Err(SynthError::ContractViolation(format!("output pitch {} smaller than row size {}", pitch, row_bytes)));
    }
    let needed = self.format.min_buffer_len(width, input.height, pitch);
    if output.len() < needed {
      return Err(SynthError::ContractViolation(format!(
        "output buffer holds {} bytes, strip needs {}",
        output.len(),
        needed
      )));
    }
    Ok(())
  }

  /// Decode all rows of `input` into `output`, rows `pitch` bytes apart
  pub fn decode_strip(&self, input: &StripInput<'_>, scratch: &mut Scratch, output: &mut [u8], pitch: usize) -> Result<()> {
    self.validate_strip(input, scratch, output, pitch)?;

    let width = input.pixel_width();
    let source_cw = input.planes[1].width * 2;
    let target_cw = self.format.chroma_width(width);
    let row_bytes = self.format.row_bytes(width);
    let upsample = self.params.source.chroma() == ChromaSampling::Half
      && (self.format.chroma == ChromaSampling::Full || self.transformer.requires_full_chroma());
    let subsample = source_cw == width && self.format.chroma == ChromaSampling::Half;

    let mut rescalers = self.strip_rescalers(input);
    trace!(
      "Decoding strip at row {} with {} rows, dither {}",
      input.first_row,
      input.height,
      if rescalers.iter().any(Rescaler::dithered) { "on" } else { "off" }
    );
    let Scratch {
      recon,
      channels,
      full,
      half,
      ..
    } = scratch;

    for row in 0..input.height {
      for (plane, recon) in input.planes.iter().zip(recon.iter_mut()) {
        let (lowpass, highpass) = plane.row(row);
        wavelet::invert_horizontal(lowpass, highpass, &mut recon[..plane.width * 2], self.variant);
      }
      // R and B are rebuilt before rescaling so the halved differences keep their low bit
      if self.transformer.differential() {
        let [g, rg, bg, _] = &mut *recon;
        color::reconstruct_rgb_row(&mut g[..width], &mut rg[..width], &mut bg[..width], self.params.precision.internal_bits);
      }
      for ((plane, rescaler), (recon, samples)) in input.planes.iter().zip(rescalers.iter_mut()).zip(recon.iter().zip(channels.iter_mut())) {
        let n = plane.width * 2;
        rescaler.rescale_row(&recon[..n], &mut samples[..n]);
      }

      let [c0, c1, c2, alpha] = &mut *channels;
      let [f1, f2] = &mut *full;
      let c0 = &mut c0[..width];
      let (c1, c2) = if upsample {
        chroma::upsample_row(&c1[..source_cw], &mut f1[..width]);
        chroma::upsample_row(&c2[..source_cw], &mut f2[..width]);
        (&mut f1[..width], &mut f2[..width])
      } else {
        (&mut c1[..source_cw], &mut c2[..source_cw])
      };
      if !self.transformer.is_passthrough() {
        self.transformer.transform_row(c0, c1, c2);
      }

      let alpha = if self.params.alpha {
        let alpha = &mut alpha[..width];
        self.transformer.transform_alpha(alpha);
        Some(&*alpha)
      } else {
        None
      };

      let [h1, h2] = &mut *half;
      let (p1, p2): (&[u16], &[u16]) = if subsample {
        chroma::subsample_row(c1, &mut h1[..target_cw], self.format.subsample);
        chroma::subsample_row(c2, &mut h2[..target_cw], self.format.subsample);
        (&h1[..target_cw], &h2[..target_cw])
      } else {
        (&*c1, &*c2)
      };

      let rows = ChannelRows::new(c0, p1, p2, alpha);
      let start = row * pitch;
      self.packer.pack_row(&rows, &mut output[start..start + row_bytes]);
    }
    Ok(())
  }

  /// Fresh rescalers for one strip, dither state is strip local
  fn strip_rescalers(&self, input: &StripInput<'_>) -> Vec<Rescaler> {
    (0..input.planes.len())
      .map(|channel| {
        let rescaler = Rescaler::new(self.params.precision.internal_bits, self.output_bits);
        match self.dither_seed {
          Some(seed) => rescaler.with_dither(strip_seed(seed, input.first_row, channel)),
          None => rescaler,
        }
      })
      .collect()
  }
}

fn strip_seed(base: u32, first_row: usize, channel: usize) -> u32 {
  base ^ (first_row as u32).wrapping_mul(0x9E37_79B9) ^ (channel as u32).wrapping_mul(0x85EB_CA6B)
}

/// Decode consecutive strips of one frame in parallel. Strip `i` is
/// written at `rows_per_strip * i` rows into `output`, every strip but
/// the last must be `rows_per_strip` rows high.
pub fn decode_strips(decoder: &StripDecoder, strips: &[StripInput<'_>], rows_per_strip: usize, output: &mut [u8], pitch: usize) -> Result<()> {
  if rows_per_strip == 0 {
    return Err(SynthError::ContractViolation("rows per strip must not be zero".to_string()));
  }
  if let Some(strip) = strips.iter().rev().skip(1).find(|s| s.height != rows_per_strip) {
    return Err(SynthError::ContractViolation(format!(
      "strip at row {} has {} rows, expected {}",
      strip.first_row, strip.height, rows_per_strip
    )));
  }
  let max_width = strips.iter().map(StripInput::pixel_width).max().unwrap_or(0);
  let chunk = rows_per_strip * pitch;
  if chunk == 0 {
    return Err(SynthError::ContractViolation("output pitch must not be zero".to_string()));
  }
  let total_rows: usize = strips.iter().map(StripInput::height).sum();
  let needed = decoder.format().min_buffer_len(max_width, total_rows, pitch);
  if output.len() < needed || output.len().div_ceil(chunk) < strips.len() {
    return Err(SynthError::ContractViolation(format!(
      "frame buffer holds {} bytes, {} strips with {} rows need {}",
      output.len(),
      strips.len(),
      total_rows,
      needed
    )));
  }
  debug!("Decoding {} strips of {} rows, {} pixels wide", strips.len(), rows_per_strip, max_width);

  output
    .par_chunks_mut(chunk)
    .zip(strips.par_iter())
    .try_for_each_init(|| Scratch::new(max_width), |scratch, (out, strip)| decoder.decode_strip(strip, scratch, out, pitch))
}
