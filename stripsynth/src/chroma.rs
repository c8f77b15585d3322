// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

//! Horizontal chroma resampling between 4:4:4 and 4:2:2 rows.

use multiversion::multiversion;
use serde::{Deserialize, Serialize};

/// Chroma sampling of a row set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromaSampling {
  /// One chroma sample per pixel
  Full,
  /// One chroma sample per pixel pair
  Half,
}

/// Filter used to drop every second chroma sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubsampleFilter {
  /// (U0 + U1) / 2
  Pairwise,
  /// (U-1 + 2*U0 + U1) / 4, first sample replicated at row start
  #[default]
  CenterWeighted,
}

/// Reduce a full rate chroma row to half rate.
pub fn subsample_row(input: &[u16], output: &mut [u16], filter: SubsampleFilter) {
  assert!(input.len() >= 2 * output.len(), "chroma input too short: {} < {}", input.len(), 2 * output.len());
  match filter {
    SubsampleFilter::Pairwise => subsample_pairwise(input, output),
    SubsampleFilter::CenterWeighted => subsample_weighted(input, output),
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn subsample_pairwise(input: &[u16], output: &mut [u16]) {
  for (o, pair) in output.iter_mut().zip(input.chunks_exact(2)) {
    *o = ((pair[0] as u32 + pair[1] as u32 + 1) >> 1) as u16;
  }
}

#[multiversion(targets("x86_64+avx+avx2", "x86+sse", "aarch64+neon"))]
fn subsample_weighted(input: &[u16], output: &mut [u16]) {
  let mut left = input.first().copied().unwrap_or_default() as u32;
  for (o, pair) in output.iter_mut().zip(input.chunks_exact(2)) {
    let center = pair[0] as u32;
    let right = pair[1] as u32;
    *o = ((left + 2 * center + right + 2) >> 2) as u16;
    left = right;
  }
}

/// Expand a half rate chroma row to full rate. Even positions take
/// the sample, odd positions the average of both neighbours, the last
/// one is replicated.
pub fn upsample_row(input: &[u16], output: &mut [u16]) {
  assert!(output.len() <= 2 * input.len(), "chroma output too long: {} > {}", output.len(), 2 * input.len());
  for (k, pair) in output.chunks_mut(2).enumerate() {
    let cur = input[k] as u32;
    let next = input.get(k + 1).copied().map(u32::from).unwrap_or(cur);
    pair[0] = cur as u16;
    if pair.len() == 2 {
      pair[1] = ((cur + next + 1) >> 1) as u16;
    }
  }
}
