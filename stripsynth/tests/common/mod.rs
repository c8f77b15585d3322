// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use stripsynth::{BandPlane, StripInput};

pub(crate) fn init_test_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// Coefficient bands of one channel, built by running the forward
/// lifting step over sample rows.
pub(crate) struct Bands {
  pub lowpass: Vec<i16>,
  pub highpass: Vec<i16>,
  pub width: usize,
}

impl Bands {
  /// `samples` holds `rows` rows of `2 * width` samples
  pub fn encode(samples: &[i16], rows: usize) -> Self {
    let row_len = samples.len() / rows;
    assert_eq!(row_len % 2, 0);
    let width = row_len / 2;
    let mut lowpass = Vec::with_capacity(width * rows);
    let mut highpass = Vec::with_capacity(width * rows);
    for row in samples.chunks_exact(row_len) {
      let (l, h) = forward_row(row);
      lowpass.extend(l);
      highpass.extend(h);
    }
    Self { lowpass, highpass, width }
  }

  pub fn constant(value: i16, samples_per_row: usize, rows: usize) -> Self {
    Self::encode(&vec![value; samples_per_row * rows], rows)
  }

  pub fn plane(&self) -> BandPlane<'_> {
    BandPlane::new(&self.lowpass, &self.highpass, self.width, self.width)
  }
}

pub(crate) fn strip<'a>(bands: &'a [&'a Bands], rows: usize) -> StripInput<'a> {
  StripInput::new(bands.iter().map(|b| b.plane()).collect(), rows)
}

fn round_div8(val: i32) -> i32 {
  (val + 4) >> 3
}

/// Forward horizontal lifting, exact inverse of the truncating synthesis
fn forward_row(input: &[i16]) -> (Vec<i16>, Vec<i16>) {
  let n = input.len() / 2;
  let low: Vec<i32> = input.chunks_exact(2).map(|p| p[0] as i32 + p[1] as i32).collect();
  let high = (0..n)
    .map(|c| {
      let prediction = if c == 0 {
        round_div8(11 * low[0] - 4 * low[1] + low[2])
      } else if c == n - 1 {
        round_div8(5 * low[n - 1] + 4 * low[n - 2] - low[n - 3])
      } else {
        round_div8(low[c - 1] - low[c + 1]) + low[c]
      };
      (2 * input[2 * c] as i32 - prediction) as i16
    })
    .collect();
  (low.into_iter().map(|v| v as i16).collect(), high)
}

/// Deterministic sample values in `0..=max`
pub(crate) fn samples(len: usize, seed: u32, max: u32) -> Vec<i16> {
  let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
  (0..len)
    .map(|_| {
      state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
      ((state >> 12) % (max + 1)) as i16
    })
    .collect()
}
