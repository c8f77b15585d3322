// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, crate_version, value_parser};
use log::debug;
use stripsynth::{ColorMatrix, DecodeParams, PixelFormat, SourceLayout};

use crate::{AppError, Result};

pub fn create_app() -> Command {
  debug!("Creating CLAP app configuration");
  Command::new("stripsynth")
    .version(crate_version!())
    .author("Daniel V. <daniel@chaospixel.com>")
    .about("Wavelet strip synthesis into pixel interchange formats")
    .subcommand_required(true)
    .arg_required_else_help(true)
    .arg(
      Arg::new("debug")
        .short('d')
        .action(ArgAction::Count)
        .global(true)
        .help("Sets the level of debugging information"),
    )
    .subcommand(
      Command::new("formats").about("List supported pixel formats").arg(
        Arg::new("markdown")
          .long("markdown")
          .action(ArgAction::SetTrue)
          .help("Print as markdown table"),
      ),
    )
    .subcommand(
      session_args(Command::new("render").about("Decode a synthetic test pattern and write the packed frame"))
        .arg(
          Arg::new("override")
            .short('f')
            .long("override")
            .action(ArgAction::SetTrue)
            .help("Override existing files"),
        )
        .arg(
          Arg::new("OUTPUT")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Output file for the packed frame"),
        ),
    )
    .subcommand(
      session_args(Command::new("bench").about("Decode a synthetic frame repeatedly and print timings")).arg(
        Arg::new("loops")
          .short('n')
          .long("loops")
          .default_value("50")
          .value_parser(value_parser!(u32).range(1..))
          .help("Number of decode runs"),
      ),
    )
}

/// Session and frame geometry switches shared by render and bench
fn session_args(cmd: Command) -> Command {
  cmd
    .arg(
      Arg::new("config")
        .short('c')
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML file with decode parameters, switches below override it"),
    )
    .arg(
      Arg::new("format")
        .long("format")
        .value_parser(|s: &str| PixelFormat::from_fourcc(s).map_err(|e| e.to_string()))
        .help("Target pixel format FourCC [default: YUYV]"),
    )
    .arg(
      Arg::new("source")
        .long("source")
        .value_parser(|s: &str| SourceLayout::from_name(s).ok_or(format!("unknown source layout '{}'", s)))
        .help("Source layout: yuv422, yuv444 or rgb444"),
    )
    .arg(
      Arg::new("matrix")
        .long("matrix")
        .value_parser(|s: &str| ColorMatrix::from_name(s).ok_or(format!("unknown color matrix '{}'", s)))
        .help("Color matrix: 601cg, 601vs, 709cg or 709vs"),
    )
    .arg(
      Arg::new("bits")
        .long("bits")
        .value_parser(value_parser!(u32).range(8..=16))
        .help("Internal precision of the reconstructed samples"),
    )
    .arg(
      Arg::new("descale")
        .long("descale")
        .value_parser(value_parser!(u32).range(0..=1))
        .help("Undo an encoder prescale with this left shift instead of halving"),
    )
    .arg(Arg::new("alpha").long("alpha").action(ArgAction::SetTrue).help("Decode a companded alpha channel"))
    .arg(Arg::new("no_dither").long("no-dither").action(ArgAction::SetTrue).help("Disable dithering"))
    .arg(
      Arg::new("width")
        .long("width")
        .default_value("1920")
        .value_parser(value_parser!(usize))
        .help("Frame width in pixels"),
    )
    .arg(
      Arg::new("height")
        .long("height")
        .default_value("1080")
        .value_parser(value_parser!(usize))
        .help("Frame height in pixels"),
    )
    .arg(
      Arg::new("rows_per_strip")
        .long("rows-per-strip")
        .default_value("16")
        .value_parser(value_parser!(usize))
        .help("Rows decoded per strip"),
    )
    .arg(
      Arg::new("detail")
        .long("detail")
        .default_value("0")
        .value_parser(value_parser!(i16))
        .help("Amplitude of highpass detail added to the pattern"),
    )
}

/// Build the session parameters from config file and switches
pub fn decode_params(options: &ArgMatches) -> Result<DecodeParams> {
  let mut params = match options.get_one::<PathBuf>("config") {
    Some(path) => {
      debug!("Loading decode parameters from {}", path.display());
      DecodeParams::from_toml(&std::fs::read_to_string(path)?)?
    }
    None => DecodeParams::new(PixelFormat::Yuyv),
  };
  if let Some(format) = options.get_one::<PixelFormat>("format") {
    params.format = *format;
  }
  if let Some(source) = options.get_one::<SourceLayout>("source") {
    params.source = *source;
  }
  if let Some(matrix) = options.get_one::<ColorMatrix>("matrix") {
    params.color.matrix = *matrix;
  }
  if let Some(bits) = options.get_one::<u32>("bits") {
    params.precision.internal_bits = *bits;
  }
  if let Some(shift) = options.get_one::<u32>("descale") {
    params.precision.descale = Some(*shift);
  }
  if options.get_flag("alpha") {
    params = params.with_alpha(Some(Default::default()));
  }
  if options.get_flag("no_dither") {
    params.precision.dither = false;
  }
  params.validate()?;
  Ok(params)
}

/// Frame width, height and strip height
pub fn geometry(options: &ArgMatches) -> Result<(usize, usize, usize)> {
  let get = |name: &str| {
    options
      .get_one::<usize>(name)
      .copied()
      .ok_or_else(|| AppError::InvalidCmdSwitch(format!("missing {}", name)))
  };
  let (width, height, rows_per_strip) = (get("width")?, get("height")?, get("rows_per_strip")?);
  if width == 0 || height == 0 || rows_per_strip == 0 {
    return Err(AppError::InvalidCmdSwitch("width, height and rows per strip must be positive".to_string()));
  }
  Ok((width, height, rows_per_strip))
}
