// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use stripsynth::chroma::ChromaSampling;
use stripsynth::{BandPlane, DecodeParams, SourceLayout, StripInput};

/// Lowpass and highpass bands of one channel
struct ChannelBands {
  lowpass: Vec<i16>,
  highpass: Vec<i16>,
  width: usize,
}

/// Synthetic coefficient bands for a full frame: a horizontal luma
/// (or green) ramp, a vertical chroma sweep around neutral and opaque
/// alpha. Lowpass coefficients carry twice the sample level.
pub struct TestPattern {
  channels: Vec<ChannelBands>,
  height: usize,
}

impl TestPattern {
  pub fn generate(params: &DecodeParams, width: usize, height: usize, detail: i16) -> Self {
    let bits = params.precision.internal_bits;
    let max = (1_i32 << bits) - 1;
    let mid = 1_i32 << (bits - 1);
    let luma_width = width / 2;
    let chroma_width = match params.source.chroma() {
      ChromaSampling::Full => luma_width,
      ChromaSampling::Half => luma_width / 2,
    };
    let descale = params.precision.descale;
    let level = |v: i32| {
      let v = v.clamp(0, max);
      // Descaled bitstreams carry a prescale instead of the doubled level
      let coeff = match descale {
        Some(shift) => v >> shift,
        None => v * 2,
      };
      coeff.min(i16::MAX as i32) as i16
    };

    let ramp = |w: usize| -> Vec<i16> {
      (0..height)
        .flat_map(|_| (0..w).map(move |x| level(x as i32 * max / (w.max(2) - 1) as i32)))
        .collect()
    };
    let sweep = |w: usize, sign: i32| -> Vec<i16> {
      (0..height)
        .flat_map(|y| {
          let v = mid + sign * (y as i32 * mid / 2 / height.max(1) as i32);
          std::iter::repeat_n(level(v), w)
        })
        .collect()
    };
    let details = |w: usize| -> Vec<i16> {
      (0..height)
        .flat_map(|y| (0..w).map(move |x| if (x + y) % 2 == 0 { detail } else { -detail }))
        .collect()
    };

    let mut channels = Vec::with_capacity(4);
    channels.push(ChannelBands {
      lowpass: ramp(luma_width),
      highpass: details(luma_width),
      width: luma_width,
    });
    let (c1, c2) = match params.source {
      SourceLayout::Rgb444 => (vec![level(mid); chroma_width * height], vec![level(mid); chroma_width * height]),
      SourceLayout::Yuv422 | SourceLayout::Yuv444 => (sweep(chroma_width, 1), sweep(chroma_width, -1)),
    };
    for lowpass in [c1, c2] {
      channels.push(ChannelBands {
        lowpass,
        highpass: vec![0; chroma_width * height],
        width: chroma_width,
      });
    }
    if params.alpha {
      channels.push(ChannelBands {
        lowpass: vec![level(max); luma_width * height],
        highpass: vec![0; luma_width * height],
        width: luma_width,
      });
    }
    Self { channels, height }
  }

  /// Split into strips of `rows_per_strip` rows, the last one may be shorter
  pub fn strips(&self, rows_per_strip: usize) -> Vec<StripInput<'_>> {
    (0..self.height)
      .step_by(rows_per_strip)
      .map(|first| {
        let rows = rows_per_strip.min(self.height - first);
        let planes = self
          .channels
          .iter()
          .map(|c| BandPlane::new(&c.lowpass[first * c.width..], &c.highpass[first * c.width..], c.width, c.width))
          .collect();
        StripInput::new(planes, rows).at_row(first)
      })
      .collect()
  }
}
