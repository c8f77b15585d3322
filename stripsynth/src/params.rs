// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use serde::{Deserialize, Serialize};

use crate::chroma::{ChromaSampling, SubsampleFilter};
use crate::color::{AlphaCompanding, ColorMatrix};
use crate::pack::{FormatDescriptor, PixelFormat};
use crate::wavelet::HalfRounding;
use crate::{Result, SynthError};

/// Channel layout of the decoded coefficient bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLayout {
  /// Y, U, V with half rate chroma
  #[default]
  Yuv422,
  /// Y, U, V at full rate
  Yuv444,
  /// G, R-G, B-G at full rate
  Rgb444,
}

impl SourceLayout {
  pub fn chroma(&self) -> ChromaSampling {
    match self {
      Self::Yuv422 => ChromaSampling::Half,
      Self::Yuv444 | Self::Rgb444 => ChromaSampling::Full,
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Self::Yuv422 => "yuv422",
      Self::Yuv444 => "yuv444",
      Self::Rgb444 => "rgb444",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    [Self::Yuv422, Self::Yuv444, Self::Rgb444].into_iter().find(|s| s.name().eq_ignore_ascii_case(name))
  }
}

/// Bit depth handling between synthesis and packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisionDescriptor {
  /// Precision of the reconstructed samples
  pub internal_bits: u32,
  /// Output sample depth. Defaults to the channel width of the format.
  pub output_bits: Option<u32>,
  pub dither: bool,
  /// Replace the final halving of the filter by this left shift (0 or 1)
  pub descale: Option<u32>,
}

impl Default for PrecisionDescriptor {
  fn default() -> Self {
    Self {
      internal_bits: 10,
      output_bits: None,
      dither: true,
      descale: None,
    }
  }
}

impl PrecisionDescriptor {
  pub fn output_bits_for(&self, format: &FormatDescriptor) -> u32 {
    self.output_bits.unwrap_or(format.channel_bits)
  }

  /// Check depths against the target format
  pub fn validate(&self, format: &FormatDescriptor) -> Result<()> {
    if !(8..=16).contains(&self.internal_bits) {
      return Err(SynthError::PrecisionMismatch(format!("internal precision of {} bits not in 8..=16", self.internal_bits)));
    }
    let output_bits = self.output_bits_for(format);
    if output_bits != format.channel_bits {
      return Err(SynthError::PrecisionMismatch(format!(
        "output depth {} doesn't match {} channel width {}",
        output_bits, format.format, format.channel_bits
      )));
    }
    if let Some(shift) = self.descale {
      if shift > 1 {
        return Err(SynthError::Config(format!("descale shift must be 0 or 1, got {}", shift)));
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorDescriptor {
  pub matrix: ColorMatrix,
  /// Companding curve for the alpha channel, none for linear alpha
  pub alpha: Option<AlphaCompanding>,
}

/// Session parameters, immutable while strips are decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeParams {
  pub format: PixelFormat,
  #[serde(default)]
  pub source: SourceLayout,
  /// Alpha channel present in the coefficient bands
  #[serde(default)]
  pub alpha: bool,
  /// Override of the format subsample filter
  #[serde(default)]
  pub subsample: Option<SubsampleFilter>,
  /// Override of the format half rounding
  #[serde(default)]
  pub half_rounding: Option<HalfRounding>,
  /// Base seed for per strip dither generators
  #[serde(default)]
  pub dither_seed: Option<u32>,
  #[serde(default)]
  pub precision: PrecisionDescriptor,
  #[serde(default)]
  pub color: ColorDescriptor,
}

impl DecodeParams {
  pub fn new(format: PixelFormat) -> Self {
    Self {
      format,
      source: SourceLayout::default(),
      alpha: false,
      precision: PrecisionDescriptor::default(),
      color: ColorDescriptor::default(),
      subsample: None,
      half_rounding: None,
      dither_seed: None,
    }
  }

  pub fn with_source(mut self, source: SourceLayout) -> Self {
    self.source = source;
    self
  }

  pub fn with_internal_bits(mut self, bits: u32) -> Self {
    self.precision.internal_bits = bits;
    self
  }

  pub fn with_matrix(mut self, matrix: ColorMatrix) -> Self {
    self.color.matrix = matrix;
    self
  }

  pub fn with_alpha(mut self, companding: Option<AlphaCompanding>) -> Self {
    self.alpha = true;
    self.color.alpha = companding;
    self
  }

  pub fn with_dither(mut self, dither: bool) -> Self {
    self.precision.dither = dither;
    self
  }

  pub fn with_descale(mut self, shift: u32) -> Self {
    self.precision.descale = Some(shift);
    self
  }

  /// Format descriptor with the session overrides applied
  pub fn format_descriptor(&self) -> FormatDescriptor {
    let mut desc = self.format.descriptor();
    if let Some(filter) = self.subsample {
      desc.subsample = filter;
    }
    if let Some(rounding) = self.half_rounding {
      desc.half_rounding = rounding;
    }
    desc
  }

  /// Number of band planes a strip must carry
  pub fn channel_count(&self) -> usize {
    if self.alpha { 4 } else { 3 }
  }

  pub fn validate(&self) -> Result<()> {
    self.precision.validate(&self.format_descriptor())
  }

  pub fn from_toml(text: &str) -> Result<Self> {
    let params: Self = toml::from_str(text)?;
    params.validate()?;
    Ok(params)
  }

  pub fn to_toml(&self) -> Result<String> {
    Ok(toml::to_string(self)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_follow_format() -> std::result::Result<(), Box<dyn std::error::Error>> {
    crate::init_test_logger();
    for format in PixelFormat::ALL {
      let params = DecodeParams::new(format);
      params.validate()?;
      assert_eq!(params.precision.output_bits_for(&params.format_descriptor()), format.descriptor().channel_bits);
    }
    Ok(())
  }

  #[test]
  fn precision_mismatch_rejected() {
    let mut params = DecodeParams::new(PixelFormat::V210);
    params.precision.output_bits = Some(8);
    assert!(matches!(params.validate(), Err(SynthError::PrecisionMismatch(_))));

    let params = DecodeParams::new(PixelFormat::Yuyv).with_internal_bits(20);
    assert!(matches!(params.validate(), Err(SynthError::PrecisionMismatch(_))));

    let params = DecodeParams::new(PixelFormat::Yuyv).with_descale(2);
    assert!(matches!(params.validate(), Err(SynthError::Config(_))));
  }

  #[test]
  fn overrides_apply() {
    let mut params = DecodeParams::new(PixelFormat::Yuyv);
    assert_eq!(params.format_descriptor().subsample, SubsampleFilter::Pairwise);
    params.subsample = Some(SubsampleFilter::CenterWeighted);
    params.half_rounding = Some(HalfRounding::Nearest);
    let desc = params.format_descriptor();
    assert_eq!(desc.subsample, SubsampleFilter::CenterWeighted);
    assert_eq!(desc.half_rounding, HalfRounding::Nearest);
  }

  #[test]
  fn load_toml() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let params = DecodeParams::from_toml(
      r#"
        format = "r210"
        source = "rgb444"
        alpha = true
        subsample = "Pairwise"

        [precision]
        internal_bits = 12
        dither = false

        [color]
        matrix = "Bt601Vs"

        [color.alpha]
        dc_offset = 256
        gain = 9400
        scale_bits = 13
        reference_bits = 12
      "#,
    )?;
    assert_eq!(params.format, PixelFormat::R210);
    assert_eq!(params.source, SourceLayout::Rgb444);
    assert_eq!(params.precision.internal_bits, 12);
    assert!(!params.precision.dither);
    assert_eq!(params.color.matrix, ColorMatrix::Bt601Vs);
    assert_eq!(params.color.alpha, Some(AlphaCompanding::default()));
    assert_eq!(params.channel_count(), 4);

    let again = DecodeParams::from_toml(&params.to_toml()?)?;
    assert_eq!(again, params);
    Ok(())
  }

  #[test]
  fn toml_errors_are_config_errors() {
    assert!(matches!(DecodeParams::from_toml("format = \"nv12\""), Err(SynthError::Config(_))));
    assert!(matches!(
      DecodeParams::from_toml("format = \"yuyv\"\n[precision]\noutput_bits = 10"),
      Err(SynthError::PrecisionMismatch(_))
    ));
  }
}
