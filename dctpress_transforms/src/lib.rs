// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]

pub mod dct;
pub mod fft;
pub mod transform;

pub use transform::*;

/// Side length of a coding block.
pub const BLOCK_DIM: usize = 8;
/// Number of samples in a coding block.
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;

/// An 8x8 block of samples or coefficients in row-major order.
pub type Block = [f64; BLOCK_SIZE];

#[cfg(test)]
mod tests;
