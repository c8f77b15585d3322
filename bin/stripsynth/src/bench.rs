// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use std::time::{Duration, Instant};

use clap::ArgMatches;
use log::debug;
use stripsynth::{StripDecoder, decode_strips};

use crate::app::{decode_params, geometry};
use crate::pattern::TestPattern;

/// Decode the same synthetic frame `loops` times and report the mean
pub fn bench(options: &ArgMatches) -> anyhow::Result<()> {
  let params = decode_params(options)?;
  let (width, height, rows_per_strip) = geometry(options)?;
  let loops = options.get_one::<u32>("loops").copied().unwrap_or(50);
  let detail = options.get_one::<i16>("detail").copied().unwrap_or(0);

  let decoder = StripDecoder::new(&params)?;
  let pattern = TestPattern::generate(&params, width, height, detail);
  let strips = pattern.strips(rows_per_strip);
  let pitch = decoder.format().row_bytes(width);
  let mut frame = vec![0_u8; pitch * height];

  let mut total = Duration::ZERO;
  for run in 0..loops {
    let start = Instant::now();
    decode_strips(&decoder, &strips, rows_per_strip, &mut frame, pitch)?;
    let elapsed = start.elapsed();
    debug!("Run {}: {:?}", run, elapsed);
    total += elapsed;
  }

  let mean = total / loops;
  println!("{}", decoder.describe());
  println!(
    "{}x{} in strips of {} rows: {:.3} ms per frame ({:.1} fps) over {} runs",
    width,
    height,
    rows_per_strip,
    mean.as_secs_f64() * 1000.0,
    1.0 / mean.as_secs_f64().max(f64::EPSILON),
    loops
  );
  Ok(())
}
