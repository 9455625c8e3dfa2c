// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

/// Row-major block position of each scan index, in the diagonal JPEG order.
#[rustfmt::skip]
pub const ZIGZAG: [usize; BLOCK_SIZE] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Flattens a row-major block into scan order.
pub fn scan<T: Copy>(block: &[T; BLOCK_SIZE]) -> [T; BLOCK_SIZE] {
    std::array::from_fn(|i| block[ZIGZAG[i]])
}

/// Inverse of [`scan`].
pub fn unscan<T: Copy + Default>(sequence: &[T; BLOCK_SIZE]) -> [T; BLOCK_SIZE] {
    let mut block = [T::default(); BLOCK_SIZE];
    for (i, &pos) in ZIGZAG.iter().enumerate() {
        block[pos] = sequence[i];
    }
    block
}
