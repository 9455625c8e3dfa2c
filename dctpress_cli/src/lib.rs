// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod raster_io;

use color_eyre::eyre::{Result, WrapErr};
use dctpress::{
    CompressOptions, CompressedImage, DecompressOptions, compress_with_options,
    decompress_with_options,
};

/// Compresses the contents of a PNG file.
pub fn compress_png(png_data: &[u8], options: &CompressOptions) -> Result<CompressedImage> {
    let raster = raster_io::decode_png(png_data).wrap_err("Failed to decode PNG input")?;
    compress_with_options(&raster, options).wrap_err("Compression failed")
}

/// Decodes a serialized [`CompressedImage`] and encodes it as PNG.
pub fn uncompress_to_png(data: &[u8], options: &DecompressOptions) -> Result<Vec<u8>> {
    let image = CompressedImage::from_bytes(data).wrap_err("Failed to read compressed image")?;
    let raster = decompress_with_options(&image, options).wrap_err("Decompression failed")?;
    raster_io::encode_png(&raster)
}
