// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_SIZE, Block,
    error::{Error, Result},
};

pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 99;
pub const DEFAULT_QUALITY: u8 = 70;

/// Perceptual step sizes at quality 50 (ITU T.81 Annex K luminance table),
/// row-major.
#[rustfmt::skip]
pub const BASE_MATRIX: [u16; BLOCK_SIZE] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Quantization step sizes for one quality level, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantMatrix {
    steps: [u16; BLOCK_SIZE],
}

pub fn check_quality(quality: u32) -> Result<u8> {
    if !(MIN_QUALITY as u32..=MAX_QUALITY as u32).contains(&quality) {
        return Err(Error::InvalidQuality(quality));
    }
    Ok(quality as u8)
}

impl QuantMatrix {
    /// Scales [`BASE_MATRIX`] for `quality`; entries are clamped to `[1, 255]`.
    pub fn new(quality: u32) -> Result<QuantMatrix> {
        let quality = check_quality(quality)? as u32;
        let multiplier = if quality < 50 {
            5000 / quality
        } else {
            200 - 2 * quality
        };
        let steps = BASE_MATRIX.map(|base| scale_step(base, multiplier));
        Ok(QuantMatrix { steps })
    }

    pub fn steps(&self) -> &[u16; BLOCK_SIZE] {
        &self.steps
    }

    /// Divides each coefficient by its step, truncating toward zero, and
    /// stores the signed result as its two's complement byte.
    ///
    /// Quotients outside `[-128, 127]` saturate. The DC coefficient of a flat
    /// block spans `[-1024, 1016]`, which only fits while the DC step is at
    /// least 8. From quality 77 on, blocks close to full black or white clip
    /// toward gray; [`QuantMatrix::count_saturated`] reports how many
    /// coefficients are affected.
    pub fn quantize(&self, coeffs: &Block) -> [u8; BLOCK_SIZE] {
        std::array::from_fn(|i| quantize_value(coeffs[i], self.steps[i]))
    }

    /// Number of coefficients that [`QuantMatrix::quantize`] clips.
    pub fn count_saturated(&self, coeffs: &Block) -> usize {
        coeffs
            .iter()
            .zip(&self.steps)
            .filter(|&(&coeff, &step)| saturates(coeff, step))
            .count()
    }

    pub fn dequantize(&self, bytes: &[u8; BLOCK_SIZE]) -> Block {
        std::array::from_fn(|i| dequantize_value(bytes[i], self.steps[i]))
    }
}

#[inline]
fn scale_step(base: u16, multiplier: u32) -> u16 {
    ((multiplier * base as u32 + 50) / 100).clamp(1, 255) as u16
}

/// Float to `i8` conversion saturates at `[-128, 127]`.
#[inline]
pub fn quantize_value(coeff: f64, step: u16) -> u8 {
    (coeff / step as f64).trunc() as i8 as u8
}

/// Whether `coeff / step` falls outside the byte range.
#[inline]
pub fn saturates(coeff: f64, step: u16) -> bool {
    let quotient = (coeff / step as f64).trunc();
    !(i8::MIN as f64..=i8::MAX as f64).contains(&quotient)
}

#[inline]
pub fn dequantize_value(byte: u8, step: u16) -> f64 {
    (byte as i8) as f64 * step as f64
}
