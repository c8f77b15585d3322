// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

mod app;
mod bench;
mod formats;
mod pattern;
mod render;

use fern::colors::{Color, ColoredLevelConfig};
use thiserror::Error;

/// Main entry function
///
/// We initialize the fern logger here, create a Clap command line
/// parser and dispatch to the subcommand.
fn main() -> anyhow::Result<()> {
  let app = app::create_app();
  let matches = app.try_get_matches().unwrap_or_else(|e| e.exit());

  let colors = ColoredLevelConfig::new().debug(Color::Magenta);
  fern::Dispatch::new()
    .chain(std::io::stderr())
    .level({
      match matches.get_count("debug") {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
      }
    })
    .format(move |out, message, record| {
      out.finish(format_args!(
        "[{:6}][{}] {} ({}:{})",
        colors.color(record.level()),
        record.target(),
        message,
        record.file().unwrap_or("<undefined>"),
        record.line().unwrap_or(0)
      ))
    })
    .apply()?;

  match matches.subcommand() {
    Some(("formats", sc)) => formats::formats(sc),
    Some(("render", sc)) => render::render(sc),
    Some(("bench", sc)) => bench::bench(sc),
    _ => Err(AppError::InvalidCmdSwitch("unknown subcommand".to_string()).into()),
  }
}

#[derive(Error, Debug)]
pub enum AppError {
  #[error("Invalid arguments: {}", _0)]
  InvalidCmdSwitch(String),
  #[error("I/O error: {}", _0)]
  Io(#[from] std::io::Error),
  #[error("Already exists: {}", _0.display())]
  AlreadyExists(std::path::PathBuf),
  #[error("Decoder failed: {}", _0)]
  DecoderFailed(#[from] stripsynth::SynthError),
}

pub type Result<T> = std::result::Result<T, AppError>;
