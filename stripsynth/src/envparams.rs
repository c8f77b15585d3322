// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use log::warn;

/// Base seed for the strip dither generators
pub(crate) fn stripsynth_dither_seed() -> Option<u32> {
  let parsed = std::env::var("STRIPSYNTH_DITHER_SEED").map(|val| {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
      Some(hex) => u32::from_str_radix(hex, 16),
      None => val.parse::<u32>(),
    }
  });
  match parsed {
    Ok(Ok(value)) => Some(value),
    Ok(Err(_)) => {
      warn!("Invalid value for STRIPSYNTH_DITHER_SEED");
      None
    }
    Err(_) => None,
  }
}

/// Force plain shifting on precision reduction
pub(crate) fn stripsynth_no_dither() -> bool {
  match std::env::var("STRIPSYNTH_NO_DITHER").map(|val| val.parse::<u32>()) {
    Ok(Ok(value)) => value == 1,
    Ok(Err(_)) => {
      warn!("Invalid value for STRIPSYNTH_NO_DITHER");
      false
    }
    Err(_) => false,
  }
}
