// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Direct cosine-basis transform.
//!
//! Coefficient `(u, v)` of a `xsize` x `ysize` block is
//! `β·α(u)·α(v)·Σx Σy f(x, y)·cos((2x+1)uπ/2·xsize)·cos((2y+1)vπ/2·ysize)`, with
//! `α(0) = 1/√2`, `α(k > 0) = 1` and `β = 1/xsize + 1/ysize`. The inverse uses
//! the same scaling, which makes the pair exact for square blocks.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::LazyLock;

use crate::{BLOCK_DIM, BLOCK_SIZE, Block};

#[inline(always)]
pub(crate) fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// Overall normalization applied by both directions of the transform.
#[inline]
pub fn scale(size: (usize, usize)) -> f64 {
    1.0 / size.0 as f64 + 1.0 / size.1 as f64
}

/// `COSINES[k][i] = cos((2i+1)kπ/16)`, shared read-only by every worker.
static COSINES: LazyLock<[[f64; BLOCK_DIM]; BLOCK_DIM]> = LazyLock::new(|| {
    std::array::from_fn(|k| std::array::from_fn(|i| direct_cosine(BLOCK_DIM, k, i)))
});

#[inline]
fn direct_cosine(n: usize, k: usize, i: usize) -> f64 {
    ((2 * i + 1) as f64 * k as f64 * PI / (2 * n) as f64).cos()
}

/// Cosine basis along one axis; uses the cached table for 8-point axes.
#[derive(Clone, Copy)]
struct Basis {
    n: usize,
    table: Option<&'static [[f64; BLOCK_DIM]; BLOCK_DIM]>,
}

impl Basis {
    fn new(n: usize) -> Basis {
        Basis {
            n,
            table: (n == BLOCK_DIM).then(|| &*COSINES),
        }
    }

    #[inline(always)]
    fn get(&self, k: usize, i: usize) -> f64 {
        match self.table {
            Some(table) => table[k][i],
            None => direct_cosine(self.n, k, i),
        }
    }
}

fn forward_impl(data: &mut [f64], scratch: &mut [f64], size: (usize, usize)) {
    let (xsize, ysize) = size;
    assert_eq!(data.len(), xsize * ysize);
    assert_eq!(scratch.len(), xsize * ysize);
    let bx = Basis::new(xsize);
    let by = Basis::new(ysize);

    // Rows: scratch[y][u] = α(u)·Σx f(x, y)·cos(x, u)
    for y in 0..ysize {
        let row = &data[y * xsize..(y + 1) * xsize];
        for u in 0..xsize {
            let sum: f64 = row
                .iter()
                .enumerate()
                .map(|(x, &value)| value * bx.get(u, x))
                .sum();
            scratch[y * xsize + u] = alpha(u) * sum;
        }
    }

    // Columns: data[v][u] = β·α(v)·Σy scratch[y][u]·cos(y, v)
    let beta = scale(size);
    for v in 0..ysize {
        for u in 0..xsize {
            let mut sum = 0.0;
            for y in 0..ysize {
                sum += scratch[y * xsize + u] * by.get(v, y);
            }
            data[v * xsize + u] = beta * alpha(v) * sum;
        }
    }
}

fn inverse_impl(data: &mut [f64], scratch: &mut [f64], size: (usize, usize)) {
    let (xsize, ysize) = size;
    assert_eq!(data.len(), xsize * ysize);
    assert_eq!(scratch.len(), xsize * ysize);
    let bx = Basis::new(xsize);
    let by = Basis::new(ysize);

    for v in 0..ysize {
        let row = &data[v * xsize..(v + 1) * xsize];
        for x in 0..xsize {
            let sum: f64 = row
                .iter()
                .enumerate()
                .map(|(u, &coeff)| alpha(u) * coeff * bx.get(u, x))
                .sum();
            scratch[v * xsize + x] = sum;
        }
    }

    let beta = scale(size);
    for y in 0..ysize {
        for x in 0..xsize {
            let mut sum = 0.0;
            for v in 0..ysize {
                sum += alpha(v) * scratch[v * xsize + x] * by.get(v, y);
            }
            data[y * xsize + x] = beta * sum;
        }
    }
}

/// In-place forward transform of a `size.0` x `size.1` row-major block.
pub fn dct2d(data: &mut [f64], size: (usize, usize)) {
    let mut scratch = vec![0.0; size.0 * size.1];
    forward_impl(data, &mut scratch, size);
}

/// In-place inverse of [`dct2d`].
pub fn idct2d(data: &mut [f64], size: (usize, usize)) {
    let mut scratch = vec![0.0; size.0 * size.1];
    inverse_impl(data, &mut scratch, size);
}

/// Allocation-free forward transform of one coding block.
pub fn dct2d_block(block: &mut Block) {
    let mut scratch = [0.0; BLOCK_SIZE];
    forward_impl(block, &mut scratch, (BLOCK_DIM, BLOCK_DIM));
}

/// Allocation-free inverse transform of one coding block.
pub fn idct2d_block(block: &mut Block) {
    let mut scratch = [0.0; BLOCK_SIZE];
    inverse_impl(block, &mut scratch, (BLOCK_DIM, BLOCK_DIM));
}
