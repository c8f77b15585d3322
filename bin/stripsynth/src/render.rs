// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;
use stripsynth::{StripDecoder, decode_strips};

use crate::app::{decode_params, geometry};
use crate::pattern::TestPattern;
use crate::{AppError, Result};

/// Decode a synthetic pattern and write the packed frame to disk
pub fn render(options: &ArgMatches) -> anyhow::Result<()> {
  Ok(render_frame(options)?)
}

fn render_frame(options: &ArgMatches) -> Result<()> {
  let output = options
    .get_one::<PathBuf>("OUTPUT")
    .ok_or_else(|| AppError::InvalidCmdSwitch("OUTPUT is required".to_string()))?;
  if output.exists() && !options.get_flag("override") {
    return Err(AppError::AlreadyExists(output.clone()));
  }

  let params = decode_params(options)?;
  let (width, height, rows_per_strip) = geometry(options)?;
  let detail = options.get_one::<i16>("detail").copied().unwrap_or(0);

  let decoder = StripDecoder::new(&params)?;
  info!("Rendering {}x{}: {}", width, height, decoder.describe());

  let pattern = TestPattern::generate(&params, width, height, detail);
  let strips = pattern.strips(rows_per_strip);
  let pitch = decoder.format().row_bytes(width);
  let mut frame = vec![0_u8; pitch * height];
  decode_strips(&decoder, &strips, rows_per_strip, &mut frame, pitch)?;

  std::fs::write(output, &frame)?;
  println!(
    "{}: {}x{} {}, {} bytes per row, {} bytes",
    output.display(),
    width,
    height,
    params.format,
    pitch,
    frame.len()
  );
  Ok(())
}
