// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]
pub mod bit_reader;
pub mod bit_writer;
pub mod color;
pub mod container;
pub mod entropy_coding;
pub mod error;
pub mod image;
pub mod options;
pub mod pipeline;
pub mod quantize;
pub mod stages;
pub mod util;
pub mod zigzag;

pub use dctpress_transforms::{BLOCK_DIM, BLOCK_SIZE, Block, TransformKind};
pub use error::{Error, Result};
pub use image::Raster;
pub use options::{CompressOptions, DecompressOptions};
pub use pipeline::{
    CompressedImage, compress, compress_with_options, decompress, decompress_with_options,
};

/// Number of coded channels per block: luma, then the two chroma channels.
pub const NUM_CHANNELS: usize = 3;
