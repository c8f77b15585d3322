// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use stripsynth::{
  AlphaCompanding, ColorMatrix, DecodeParams, HalfRounding, PixelFormat, Scratch, SourceLayout, StripDecoder, SynthError, decode_strips,
};

mod common;

use common::{Bands, init_test_logger, samples, strip};

type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn decode(params: &DecodeParams, bands: &[&Bands], width: usize, rows: usize) -> std::result::Result<Vec<u8>, SynthError> {
  let decoder = StripDecoder::new(params)?;
  let pitch = decoder.format().row_bytes(width);
  let mut output = vec![0; pitch * rows];
  decoder.decode_strip(&strip(bands, rows), &mut Scratch::new(width), &mut output, pitch)?;
  Ok(output)
}

#[test]
fn v210_reconstructs_samples_exactly() -> TestResult {
  init_test_logger();
  let (width, rows) = (24, 3);
  let y = samples(width * rows, 1, 1023);
  let u = samples(width / 2 * rows, 2, 1023);
  let v = samples(width / 2 * rows, 3, 1023);
  let bands = [Bands::encode(&y, rows), Bands::encode(&u, rows), Bands::encode(&v, rows)];

  let output = decode(&DecodeParams::new(PixelFormat::V210), &[&bands[0], &bands[1], &bands[2]], width, rows)?;

  for (row, packed) in output.chunks_exact(128).enumerate() {
    let words: Vec<u32> = packed.chunks_exact(4).map(LittleEndian::read_u32).collect();
    let field = |w: usize, pos: u32| ((words[w] >> (pos * 10)) & 0x3ff) as i16;
    for group in 0..width / 6 {
      let w = group * 4;
      let ys = [field(w, 1), field(w + 1, 0), field(w + 1, 2), field(w + 2, 1), field(w + 3, 0), field(w + 3, 2)];
      let us = [field(w, 0), field(w + 1, 1), field(w + 2, 2)];
      let vs = [field(w, 2), field(w + 2, 0), field(w + 3, 1)];
      let py = row * width + group * 6;
      let pc = row * width / 2 + group * 3;
      assert_eq!(ys[..], y[py..py + 6]);
      assert_eq!(us[..], u[pc..pc + 3]);
      assert_eq!(vs[..], v[pc..pc + 3]);
    }
  }
  Ok(())
}

#[test]
fn yu64_scales_to_full_range() -> TestResult {
  init_test_logger();
  let (width, rows) = (12, 2);
  let y = samples(width * rows, 9, 1023);
  let c = samples(width / 2 * rows, 10, 1023);
  let bands = [Bands::encode(&y, rows), Bands::encode(&c, rows)];

  let output = decode(&DecodeParams::new(PixelFormat::Yu64), &[&bands[0], &bands[1], &bands[1]], width, rows)?;
  let words: Vec<u16> = output.chunks_exact(2).map(LittleEndian::read_u16).collect();
  for (i, pair) in words.chunks_exact(4).enumerate() {
    assert_eq!(pair[0], (y[2 * i] as u16) << 6);
    assert_eq!(pair[1], (c[i] as u16) << 6);
    assert_eq!(pair[2], (y[2 * i + 1] as u16) << 6);
    assert_eq!(pair[3], (c[i] as u16) << 6);
  }
  Ok(())
}

#[test]
fn constant_gray_yuyv_and_uyvy() -> TestResult {
  init_test_logger();
  let luma = Bands::constant(128, 16, 1);
  let chroma = Bands::constant(128, 8, 1);
  for format in [PixelFormat::Yuyv, PixelFormat::Uyvy] {
    let params = DecodeParams::new(format).with_internal_bits(8);
    let output = decode(&params, &[&luma, &chroma, &chroma], 16, 1)?;
    assert_eq!(output, vec![128; 32], "{}", format);
  }
  Ok(())
}

#[test]
fn full_chroma_source_is_subsampled() -> TestResult {
  init_test_logger();
  let luma = Bands::constant(100, 12, 2);
  let chroma = Bands::constant(60, 12, 2);
  for filter in [stripsynth::chroma::SubsampleFilter::Pairwise, stripsynth::chroma::SubsampleFilter::CenterWeighted] {
    let mut params = DecodeParams::new(PixelFormat::Yuyv).with_source(SourceLayout::Yuv444).with_internal_bits(8);
    params.subsample = Some(filter);
    let output = decode(&params, &[&luma, &chroma, &chroma], 12, 2)?;
    assert!(output.chunks_exact(4).all(|px| px == [100, 60, 100, 60]), "{:?}", filter);
  }
  Ok(())
}

#[test]
fn differential_rgb_gray_to_rg48() -> TestResult {
  init_test_logger();
  let (width, rows) = (10, 2);
  let g = samples(width * rows, 4, 4095);
  let green = Bands::encode(&g, rows);
  let mid = Bands::constant(2048, width, rows);
  let params = DecodeParams::new(PixelFormat::Rg48).with_source(SourceLayout::Rgb444).with_internal_bits(12);

  let output = decode(&params, &[&green, &mid, &mid], width, rows)?;
  let words: Vec<u16> = output.chunks_exact(2).map(LittleEndian::read_u16).collect();
  for (px, rgb) in words.chunks_exact(3).enumerate() {
    let expected = (g[px] as u16) << 4;
    assert_eq!(rgb, [expected; 3]);
  }
  Ok(())
}

#[test]
fn differential_rgb_keeps_low_bits_in_rg30() -> TestResult {
  init_test_logger();
  let (width, rows) = (12, 2);
  let g = samples(width * rows, 21, 4095);
  let rg = samples(width * rows, 22, 4095);
  let bg = samples(width * rows, 23, 4095);
  let bands = [Bands::encode(&g, rows), Bands::encode(&rg, rows), Bands::encode(&bg, rows)];
  let params = DecodeParams::new(PixelFormat::Rg30)
    .with_source(SourceLayout::Rgb444)
    .with_internal_bits(12)
    .with_dither(false);

  let output = decode(&params, &[&bands[0], &bands[1], &bands[2]], width, rows)?;
  let rebuild = |d: i16, g: i16| ((2 * d as i32 + g as i32 - 4096).clamp(0, 4095) >> 2) as u32;
  for (px, word) in output.chunks_exact(4).map(LittleEndian::read_u32).enumerate() {
    let expected = rebuild(rg[px], g[px]) | (g[px] as u32 >> 2) << 10 | rebuild(bg[px], g[px]) << 20;
    assert_eq!(word, expected, "pixel {}", px);
  }

  // R = 2 * 2051 + 3 - 4096 = 9, two bits down that is 2
  let green = Bands::constant(3, width, 1);
  let red = Bands::constant(2051, width, 1);
  let blue = Bands::constant(2048, width, 1);
  let output = decode(&params, &[&green, &red, &blue], width, 1)?;
  assert!(output.chunks_exact(4).all(|w| LittleEndian::read_u32(w) == 2));
  Ok(())
}

#[test]
fn nearest_half_rounding_reaches_pixels() -> TestResult {
  init_test_logger();
  // odd lowpass sums land between two sample values
  let luma = Bands {
    lowpass: vec![201; 8],
    highpass: vec![0; 8],
    width: 8,
  };
  let chroma = Bands::constant(128, 8, 1);
  let mut params = DecodeParams::new(PixelFormat::Yuyv).with_internal_bits(8);

  let truncated = decode(&params, &[&luma, &chroma, &chroma], 16, 1)?;
  assert_eq!(truncated, [100_u8, 128, 100, 128].repeat(8));

  params.half_rounding = Some(HalfRounding::Nearest);
  let nearest = decode(&params, &[&luma, &chroma, &chroma], 16, 1)?;
  assert_eq!(nearest, [101_u8, 128, 101, 128].repeat(8));
  Ok(())
}

#[test]
fn decoded_alpha_in_ar10_and_b64a() -> TestResult {
  init_test_logger();
  let width = 8;
  let green = Bands::constant(400, width, 1);
  let mid = Bands::constant(512, width, 1);
  let a = [1023_i16, 0, 512, 300, 768, 256, 1023, 0];
  let alpha = Bands::encode(&a, 1);
  let planes = [&green, &mid, &mid, &alpha];

  let params = DecodeParams::new(PixelFormat::Ar10).with_source(SourceLayout::Rgb444).with_alpha(None);
  let output = decode(&params, &planes, width, 1)?;
  let gray = 400 << 20 | 400 << 10 | 400;
  for (px, word) in output.chunks_exact(4).map(LittleEndian::read_u32).enumerate() {
    assert_eq!(word, (a[px] as u32 >> 8) << 30 | gray, "pixel {}", px);
  }

  let params = DecodeParams::new(PixelFormat::B64a).with_source(SourceLayout::Rgb444).with_alpha(None);
  let output = decode(&params, &planes, width, 1)?;
  for (px, argb) in output.chunks_exact(8).enumerate() {
    let words: Vec<u16> = argb.chunks_exact(2).map(BigEndian::read_u16).collect();
    assert_eq!(words, [(a[px] as u16) << 6, 400 << 6, 400 << 6, 400 << 6], "pixel {}", px);
  }
  Ok(())
}

#[test]
fn yuv422_to_rg30_gray() -> TestResult {
  init_test_logger();
  let luma = Bands::constant(512, 12, 1);
  let chroma = Bands::constant(512, 6, 1);
  let params = DecodeParams::new(PixelFormat::Rg30).with_matrix(ColorMatrix::Bt709Vs);
  let output = decode(&params, &[&luma, &chroma, &chroma], 12, 1)?;
  let gray = 512 | 512 << 10 | 512 << 20;
  assert!(output.chunks_exact(4).all(|w| LittleEndian::read_u32(w) == gray));
  Ok(())
}

#[test]
fn companded_alpha_in_ayuv() -> TestResult {
  init_test_logger();
  let curve = AlphaCompanding::default();
  let dc = curve.dc_offset_at(8) as i16;
  let luma = Bands::constant(50, 8, 1);
  let chroma = Bands::constant(128, 8, 1);
  let alpha = Bands::encode(&[dc, dc, 255, 255, dc, 255, 200, dc], 1);
  let params = DecodeParams::new(PixelFormat::Ayuv)
    .with_source(SourceLayout::Yuv444)
    .with_internal_bits(8)
    .with_alpha(Some(curve));

  let output = decode(&params, &[&luma, &chroma, &chroma, &alpha], 8, 1)?;
  let alphas: Vec<u8> = output.chunks_exact(4).map(|px| px[0]).collect();
  let decompanded = curve.decompand(200, 8) as u8;
  assert_eq!(alphas, [0, 0, 255, 255, 0, 255, decompanded, 0]);
  assert!(output.chunks_exact(4).all(|px| px[1..] == [50, 128, 128]));
  Ok(())
}

#[test]
fn session_from_toml() -> TestResult {
  init_test_logger();
  let params = DecodeParams::from_toml(
    r#"
      format = "UYVY"
      dither_seed = 42

      [precision]
      internal_bits = 8
    "#,
  );
  // FourCC names in configs are lowercase
  assert!(matches!(params, Err(SynthError::Config(_))));

  let params = DecodeParams::from_toml("format = \"uyvy\"\ndither_seed = 42\n[precision]\ninternal_bits = 8\n")?;
  let luma = Bands::constant(16, 12, 1);
  let chroma = Bands::constant(240, 6, 1);
  let output = decode(&params, &[&luma, &chroma, &chroma], 12, 1)?;
  assert_eq!(output, [240_u8, 16, 240, 16].repeat(6));
  Ok(())
}

#[test]
fn frame_in_parallel_strips() -> TestResult {
  init_test_logger();
  let (width, rows, rows_per_strip) = (48, 16, 5);
  let y = samples(width * rows, 11, 1023);
  let c = samples(width / 2 * rows, 12, 1023);

  let strips: Vec<(Bands, Bands)> = (0..rows)
    .step_by(rows_per_strip)
    .map(|first| {
      let n = rows_per_strip.min(rows - first);
      (
        Bands::encode(&y[first * width..(first + n) * width], n),
        Bands::encode(&c[first * width / 2..(first + n) * width / 2], n),
      )
    })
    .collect();
  let inputs: Vec<_> = strips
    .iter()
    .enumerate()
    .map(|(i, (luma, chroma))| {
      let n = rows_per_strip.min(rows - i * rows_per_strip);
      stripsynth::StripInput::new(vec![luma.plane(), chroma.plane(), chroma.plane()], n).at_row(i * rows_per_strip)
    })
    .collect();

  let decoder = StripDecoder::new(&DecodeParams::new(PixelFormat::V210))?;
  let pitch = decoder.format().row_bytes(width);
  let mut frame = vec![0; pitch * rows];
  decode_strips(&decoder, &inputs, rows_per_strip, &mut frame, pitch)?;

  for (row, packed) in frame.chunks_exact(pitch).enumerate() {
    let first = LittleEndian::read_u32(packed);
    assert_eq!((first >> 10 & 0x3ff) as i16, y[row * width], "row {}", row);
    assert_eq!((first & 0x3ff) as i16, c[row * width / 2], "row {}", row);
  }
  Ok(())
}

#[test]
fn unknown_format_name() {
  assert!(matches!(PixelFormat::from_fourcc("I420"), Err(SynthError::UnknownFormat(_))));
}
