// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{BLOCK_DIM, color::Pixel};

/// Rounds a dimension down to a whole number of blocks.
#[inline]
pub fn truncate_to_blocks(dim: usize) -> usize {
    dim - dim % BLOCK_DIM
}

/// A row-major grid of pixels whose dimensions are multiples of 8.
///
/// Constructors drop the rightmost columns and bottom rows that do not fill a
/// whole block.
#[derive(Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Raster {{ {}x{} }}", self.width, self.height)
    }
}

impl Raster {
    /// Creates a black RGB raster.
    pub fn new(width: usize, height: usize) -> Raster {
        Raster::filled(width, height, Pixel::default())
    }

    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Raster {
        let (width, height) = (truncate_to_blocks(width), truncate_to_blocks(height));
        Raster {
            width,
            height,
            pixels: vec![pixel; width * height],
        }
    }

    /// Builds a raster from a pixel source addressed as `(x, y)`.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut source: impl FnMut(usize, usize) -> Pixel,
    ) -> Raster {
        let (width, height) = (truncate_to_blocks(width), truncate_to_blocks(height));
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(source(x, y));
            }
        }
        Raster {
            width,
            height,
            pixels,
        }
    }

    /// Builds a raster from interleaved 8-bit RGB samples of a
    /// `width` x `height` bitmap.
    pub fn from_rgb8(width: usize, height: usize, rgb: &[u8]) -> Raster {
        assert_eq!(rgb.len(), width * height * 3, "RGB buffer size mismatch");
        Raster::from_fn(width, height, |x, y| {
            let idx = (y * width + x) * 3;
            Pixel::rgb(rgb[idx] as f64, rgb[idx + 1] as f64, rgb[idx + 2] as f64)
        })
    }

    /// Interleaved 8-bit RGB, with each channel clamped to `[0, 255]` and
    /// rounded to the nearest integer.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| pixel.to_rgb_array())
            .map(|v| v.clamp(0.0, 255.0).round() as u8)
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Number of blocks along each axis.
    pub fn blocks(&self) -> (usize, usize) {
        (self.width / BLOCK_DIM, self.height / BLOCK_DIM)
    }

    pub fn get(&self, x: usize, y: usize) -> Pixel {
        assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x] = pixel;
    }

    pub fn row(&self, y: usize) -> &[Pixel] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Mutable access for writers that partition the rows themselves.
    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Mean absolute difference over all RGB channels.
    pub fn mean_abs_diff(&self, other: &Raster) -> f64 {
        assert_eq!(self.size(), other.size());
        if self.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .pixels
            .iter()
            .zip(other.pixels.iter())
            .flat_map(|(a, b)| {
                let (a, b) = (a.to_rgb_array(), b.to_rgb_array());
                (0..3).map(move |c| (a[c] - b[c]).abs())
            })
            .sum();
        total / (self.pixels.len() * 3) as f64
    }
}
