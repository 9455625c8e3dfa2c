// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Block-parallel compression and reconstruction.
//!
//! Quantized coefficients live in one flat buffer laid out as
//! `[block][channel][scan index]`, with blocks in row-major order. Every block
//! owns a disjoint slice of that buffer, so the per-block work runs without
//! any synchronization. Entropy coding needs the whole distribution and runs
//! once after all blocks are done; entropy decoding is sequential and happens
//! before any block is reconstructed.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use dctpress_transforms::FrequencyTransform;

use crate::{
    BLOCK_DIM, BLOCK_SIZE, Block, NUM_CHANNELS, TransformKind,
    color::{CHROMA_OFFSET, Pixel},
    entropy_coding::huffman::{self, HuffmanTable},
    error::{Error, Result},
    image::Raster,
    options::{CompressOptions, DecompressOptions, run_with_threads},
    quantize::{QuantMatrix, check_quality},
    stages::{BlockStage, apply_stages},
    util::tracing_wrappers::*,
    zigzag::{scan, unscan},
};

/// Coded bytes of one block: all channels, in scan order.
const BYTES_PER_BLOCK: usize = NUM_CHANNELS * BLOCK_SIZE;

/// Samples are centered around zero before the forward transform.
const LEVEL_SHIFT: f64 = CHROMA_OFFSET;

/// A compressed raster together with everything needed to decode it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedImage {
    pub quality: u8,
    pub width: usize,
    pub height: usize,
    /// Number of meaningful bits in `payload`.
    pub bit_count: u64,
    pub payload: Vec<u8>,
    pub table: HuffmanTable,
}

impl CompressedImage {
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    pub fn bits_per_pixel(&self) -> f64 {
        let pixels = self.width as f64 * self.height as f64;
        if pixels == 0.0 {
            return 0.0;
        }
        self.bit_count as f64 / pixels
    }

    /// Number of quantized bytes the payload must decode to.
    pub fn num_coefficients(&self) -> Result<usize> {
        (self.width / BLOCK_DIM)
            .checked_mul(self.height / BLOCK_DIM)
            .and_then(|blocks| blocks.checked_mul(BYTES_PER_BLOCK))
            .ok_or(Error::SizeOverflow)
    }
}

/// Calls `process` on consecutive `chunk_size` slices of `data` and collects
/// the results in chunk order.
fn map_chunks<T: Send, R: Send>(
    data: &mut [T],
    chunk_size: usize,
    process: impl Fn(usize, &mut [T]) -> R + Send + Sync,
) -> Vec<R> {
    #[cfg(feature = "parallel")]
    let results = data
        .par_chunks_mut(chunk_size)
        .enumerate()
        .map(|(i, chunk)| process(i, chunk))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results = data
        .chunks_mut(chunk_size)
        .enumerate()
        .map(|(i, chunk)| process(i, chunk))
        .collect();
    results
}

fn encode_block(
    raster: &Raster,
    (bx, by): (usize, usize),
    transform: TransformKind,
    matrix: &QuantMatrix,
    stages: &[Box<dyn BlockStage>],
    out: &mut [u8],
) -> usize {
    let (x0, y0) = (bx * BLOCK_DIM, by * BLOCK_DIM);
    let mut channels = [[0.0; BLOCK_SIZE]; NUM_CHANNELS];
    for y in 0..BLOCK_DIM {
        let row = &raster.row(y0 + y)[x0..x0 + BLOCK_DIM];
        for (x, pixel) in row.iter().enumerate() {
            for (c, value) in pixel.to_ycbcr_array().into_iter().enumerate() {
                channels[c][y * BLOCK_DIM + x] = value;
            }
        }
    }
    let mut saturated = 0;
    let outputs = out.chunks_exact_mut(BLOCK_SIZE);
    for (c, (block, out)) in channels.iter_mut().zip(outputs).enumerate() {
        apply_stages(stages, c, block);
        block.iter_mut().for_each(|v| *v -= LEVEL_SHIFT);
        transform.forward(block);
        saturated += matrix.count_saturated(block);
        out.copy_from_slice(&scan(&matrix.quantize(block)));
    }
    saturated
}

fn decode_block(
    coefficients: &[u8],
    transform: TransformKind,
    matrix: &QuantMatrix,
) -> [Block; NUM_CHANNELS] {
    let mut channels = [[0.0; BLOCK_SIZE]; NUM_CHANNELS];
    let sequences = coefficients.chunks_exact(BLOCK_SIZE);
    for (block, bytes) in channels.iter_mut().zip(sequences) {
        let sequence: [u8; BLOCK_SIZE] = std::array::from_fn(|i| bytes[i]);
        *block = matrix.dequantize(&unscan(&sequence));
        transform.inverse(block);
        block.iter_mut().for_each(|v| *v += LEVEL_SHIFT);
    }
    channels
}

/// Runs every block of `raster` through the stages, the forward transform,
/// quantization and the zigzag scan.
///
/// Coefficients that do not fit a byte are clipped, see
/// [`QuantMatrix::quantize`]; their total is logged.
pub fn quantize_blocks(raster: &Raster, options: &CompressOptions) -> Result<Vec<u8>> {
    let matrix = QuantMatrix::new(options.quality as u32)?;
    let (blocks_x, blocks_y) = raster.blocks();
    let stages = options.stages();
    trace!(stages = ?stages.iter().map(|s| s.to_string()).collect::<Vec<_>>(), "block stages");
    let mut coefficients = vec![0u8; blocks_x * blocks_y * BYTES_PER_BLOCK];
    let saturated: usize = run_with_threads(options.num_threads, || {
        map_chunks(&mut coefficients, BYTES_PER_BLOCK, |b, out| {
            encode_block(
                raster,
                (b % blocks_x, b / blocks_x),
                options.transform,
                &matrix,
                &stages,
                out,
            )
        })
    })?
    .into_iter()
    .sum();
    if saturated > 0 {
        info!(
            saturated,
            quality = options.quality,
            "coefficients clipped to the byte range"
        );
    }
    Ok(coefficients)
}

/// Inverse of [`quantize_blocks`] for a `width` x `height` raster.
pub fn reconstruct_blocks(
    coefficients: &[u8],
    width: usize,
    height: usize,
    quality: u8,
    options: &DecompressOptions,
) -> Result<Raster> {
    if width % BLOCK_DIM != 0 || height % BLOCK_DIM != 0 {
        return Err(Error::InvalidImageSize(width, height));
    }
    let matrix = QuantMatrix::new(quality as u32)?;
    let blocks_x = width / BLOCK_DIM;
    let expected = blocks_x
        .checked_mul(height / BLOCK_DIM)
        .and_then(|blocks| blocks.checked_mul(BYTES_PER_BLOCK))
        .ok_or(Error::SizeOverflow)?;
    if coefficients.len() != expected {
        return Err(Error::CoefficientCountMismatch {
            expected,
            found: coefficients.len(),
        });
    }
    let mut raster = Raster::new(width, height);
    if raster.is_empty() {
        return Ok(raster);
    }
    run_with_threads(options.num_threads, || {
        map_chunks(raster.pixels_mut(), width * BLOCK_DIM, |by, rows| {
            for bx in 0..blocks_x {
                let b = by * blocks_x + bx;
                let [luma, cb, cr] = decode_block(
                    &coefficients[b * BYTES_PER_BLOCK..(b + 1) * BYTES_PER_BLOCK],
                    options.transform,
                    &matrix,
                );
                for y in 0..BLOCK_DIM {
                    let row = &mut rows[y * width + bx * BLOCK_DIM..][..BLOCK_DIM];
                    for (x, pixel) in row.iter_mut().enumerate() {
                        let i = y * BLOCK_DIM + x;
                        *pixel = Pixel::ycbcr(luma[i], cb[i], cr[i]).to_rgb();
                    }
                }
            }
        })
    })?;
    Ok(raster)
}

pub fn compress(raster: &Raster, quality: u8) -> Result<CompressedImage> {
    compress_with_options(raster, &CompressOptions::with_quality(quality))
}

pub fn compress_with_options(
    raster: &Raster,
    options: &CompressOptions,
) -> Result<CompressedImage> {
    let quality = check_quality(options.quality as u32)?;
    info!(
        blocks = ?raster.blocks(),
        quality,
        transform = %options.transform,
        subsampling = options.chroma_subsampling,
        "compressing"
    );
    let coefficients = quantize_blocks(raster, options)?;
    let stream = huffman::encode(&coefficients)?;
    debug!(
        coefficients = coefficients.len(),
        bit_count = stream.bit_count,
        payload = stream.payload.len(),
        symbols = stream.table.len(),
        "compressed"
    );
    Ok(CompressedImage {
        quality,
        width: raster.width(),
        height: raster.height(),
        bit_count: stream.bit_count,
        payload: stream.payload,
        table: stream.table,
    })
}

pub fn decompress(image: &CompressedImage) -> Result<Raster> {
    decompress_with_options(image, &DecompressOptions::default())
}

pub fn decompress_with_options(
    image: &CompressedImage,
    options: &DecompressOptions,
) -> Result<Raster> {
    let quality = check_quality(image.quality as u32)?;
    if image.width % BLOCK_DIM != 0 || image.height % BLOCK_DIM != 0 {
        return Err(Error::InvalidImageSize(image.width, image.height));
    }
    let expected = image.num_coefficients()?;
    let coefficients = huffman::decode(&image.payload, &image.table, image.bit_count)?;
    debug!(decoded = coefficients.len(), expected, "entropy decoded");
    if coefficients.len() != expected {
        return Err(Error::CoefficientCountMismatch {
            expected,
            found: coefficients.len(),
        });
    }
    info!(
        width = image.width,
        height = image.height,
        transform = %options.transform,
        "reconstructing"
    );
    reconstruct_blocks(&coefficients, image.width, image.height, quality, options)
}
