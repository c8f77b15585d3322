//! Decode-side inverse horizontal wavelet synthesis for intermediate
//! video codecs. Given the lowpass and highpass coefficient rows of
//! every channel, this library reconstructs full resolution rows,
//! rescales them to the output bit depth, converts the color
//! representation and packs the result into a pixel interchange format.
//!
//! # Example
//! ```rust,no_run
//! use stripsynth::{BandPlane, DecodeParams, PixelFormat, Scratch, StripDecoder, StripInput};
//!
//! fn main() -> stripsynth::Result<()> {
//!   let params = DecodeParams::new(PixelFormat::Yuyv);
//!   let decoder = StripDecoder::new(&params)?;
//!
//!   // 8 coefficients per luma row, 4 per chroma row, 2 rows
//!   let (luma_low, luma_high) = (vec![400_i16; 16], vec![0_i16; 16]);
//!   let (chroma_low, chroma_high) = (vec![1024_i16; 8], vec![0_i16; 8]);
//!   let input = StripInput::new(
//!     vec![
//!       BandPlane::new(&luma_low, &luma_high, 8, 8),
//!       BandPlane::new(&chroma_low, &chroma_high, 4, 4),
//!       BandPlane::new(&chroma_low, &chroma_high, 4, 4),
//!     ],
//!     2,
//!   );
//!
//!   let pitch = decoder.format().row_bytes(16);
//!   let mut output = vec![0_u8; pitch * 2];
//!   let mut scratch = Scratch::new(16);
//!   decoder.decode_strip(&input, &mut scratch, &mut output, pitch)?;
//!   Ok(())
//! }
//! ```

#![deny(
    //missing_docs,
    //missing_debug_implementations,
    //missing_copy_implementations,
    //unsafe_code,
    unstable_features,
    //unused_import_braces,
    //unused_qualifications
  )]

pub mod bits;
pub mod chroma;
pub mod color;
pub(crate) mod envparams;
pub mod pack;
pub mod params;
pub mod rescale;
pub mod strip;
pub mod wavelet;

pub use color::{AlphaCompanding, ColorMatrix, ColorSpace, ColorTransformer};
pub use pack::{FormatDescriptor, PixelFormat, PixelPacker};
pub use params::{ColorDescriptor, DecodeParams, PrecisionDescriptor, SourceLayout};
pub use rescale::Rescaler;
pub use strip::{BandPlane, Scratch, StripDecoder, StripInput, decode_strips};
pub use wavelet::{FilterVariant, HalfRounding};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
  /// Caller handed in buffers or geometry the kernels can't work with
  #[error("Contract violation: {}", _0)]
  ContractViolation(String),

  #[error("Unknown pixel format: {}", _0)]
  UnknownFormat(String),

  /// Requested output depth doesn't fit the pixel format
  #[error("Precision mismatch: {}", _0)]
  PrecisionMismatch(String),

  #[error("Invalid configuration: {}", _0)]
  Config(String),
}

pub type Result<T> = std::result::Result<T, SynthError>;

impl From<toml::de::Error> for SynthError {
  fn from(err: toml::de::Error) -> Self {
    Self::Config(err.to_string())
  }
}

impl From<toml::ser::Error> for SynthError {
  fn from(err: toml::ser::Error) -> Self {
    Self::Config(err.to_string())
  }
}

#[cfg(test)]
pub(crate) fn init_test_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}
