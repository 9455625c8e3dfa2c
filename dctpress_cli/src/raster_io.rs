// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! PNG files to and from rasters of 8-bit RGB samples.

use std::io::Cursor;

use color_eyre::eyre::{Result, eyre};
use dctpress::Raster;

/// Decodes any PNG to RGB, dropping alpha and replicating gray.
pub fn decode_png(data: &[u8]) -> Result<Raster> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| eyre!("PNG image is too large"))?;
    let mut buf = vec![0; buffer_size];
    let info = reader.next_frame(&mut buf)?;
    let samples = &buf[..info.buffer_size()];
    let rgb: Vec<u8> = match info.color_type {
        png::ColorType::Rgb => samples.to_vec(),
        png::ColorType::Rgba => samples
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect(),
        png::ColorType::Grayscale => samples.iter().flat_map(|&g| [g, g, g]).collect(),
        png::ColorType::GrayscaleAlpha => samples
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0]])
            .collect(),
        png::ColorType::Indexed => return Err(eyre!("PNG palette was not expanded")),
    };
    let (width, height) = (info.width as usize, info.height as usize);
    Ok(Raster::from_rgb8(width, height, &rgb))
}

pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    if raster.is_empty() {
        return Err(eyre!(
            "Cannot write an empty {}x{} image",
            raster.width(),
            raster.height()
        ));
    }
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, raster.width() as u32, raster.height() as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&raster.to_rgb8())?;
    writer.finish()?;
    Ok(out)
}
