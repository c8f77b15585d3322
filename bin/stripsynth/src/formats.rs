// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use clap::ArgMatches;
use itertools::Itertools;
use stripsynth::PixelFormat;
use stripsynth::chroma::ChromaSampling;

/// Print list of supported pixel formats
pub fn formats(options: &ArgMatches) -> anyhow::Result<()> {
  let rows = PixelFormat::ALL.iter().map(|format| {
    let desc = format.descriptor();
    [
      format.fourcc().to_string(),
      format!("0x{:08x}", format.code()),
      format!("{:?}", desc.color),
      match desc.chroma {
        ChromaSampling::Full => "4:4:4".to_string(),
        ChromaSampling::Half => "4:2:2".to_string(),
      },
      desc.channel_bits.to_string(),
      if desc.alpha { "yes" } else { "no" }.to_string(),
      format!("{:?}", desc.endian),
      desc.row_bytes(48).to_string(),
    ]
  });
  let header = ["FourCC", "Code", "Color", "Chroma", "Bits", "Alpha", "Endian", "Bytes/48px"];

  if options.get_flag("markdown") {
    println!("# Supported pixel formats\n");
    println!("| {} |", header.iter().join(" | "));
    println!("|{}|", header.iter().map(|_| "---").join("|"));
    for row in rows {
      println!("| {} |", row.iter().join(" | "));
    }
  } else {
    println!("{}", header.iter().map(|h| format!("{:<11}", h)).join(""));
    println!("{:-<88}", "");
    for row in rows {
      println!("{}", row.iter().map(|c| format!("{:<11}", c)).join(""));
    }
  }
  Ok(())
}
