// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! FFT-accelerated version of the cosine transform in [`crate::dct`].
//!
//! Each 1D pass reorders the real line into a complex buffer (even samples
//! ascending, odd samples descending), runs a radix-2 FFT and keeps the real
//! part of the twiddled spectrum. The 2D block is then scaled exactly like the
//! direct strategy, so both produce the same coefficients.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

use crate::dct::{alpha, scale};
use crate::{BLOCK_DIM, Block};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub fn new(re: f64, im: f64) -> Complex {
        Complex { re, im }
    }

    /// `e^(iθ)`
    pub fn cis(theta: f64) -> Complex {
        let (sin, cos) = theta.sin_cos();
        Complex { re: cos, im: sin }
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;
    fn mul(self, rhs: f64) -> Complex {
        Complex::new(self.re * rhs, self.im * rhs)
    }
}

fn bit_reverse_permute(data: &mut [Complex]) {
    let n = data.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

fn fft_impl(data: &mut [Complex], inverse: bool) {
    let n = data.len();
    assert!(n.is_power_of_two(), "FFT size {n} is not a power of two");
    bit_reverse_permute(data);

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = sign * 2.0 * PI / len as f64;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                let w = Complex::cis(step * k as f64);
                let even = data[start + k];
                let odd = data[start + k + half] * w;
                data[start + k] = even + odd;
                data[start + k + half] = even - odd;
            }
        }
        len <<= 1;
    }

    if inverse {
        let norm = 1.0 / n as f64;
        for value in data.iter_mut() {
            *value = *value * norm;
        }
    }
}

/// In-place forward FFT. `data.len()` must be a power of two.
pub fn fft(data: &mut [Complex]) {
    fft_impl(data, false);
}

/// In-place inverse FFT, including the `1/n` normalization.
pub fn ifft(data: &mut [Complex]) {
    fft_impl(data, true);
}

/// Unnormalized DCT-II: `output[k] = Σn input[n]·cos((2n+1)kπ/2N)`.
pub fn dct1d(input: &[f64], output: &mut [f64], scratch: &mut [Complex]) {
    let n = input.len();
    assert_eq!(output.len(), n);
    assert_eq!(scratch.len(), n);
    for i in 0..n.div_ceil(2) {
        scratch[i] = Complex::new(input[2 * i], 0.0);
    }
    for i in 0..n / 2 {
        scratch[n - 1 - i] = Complex::new(input[2 * i + 1], 0.0);
    }
    fft(scratch);
    for (k, out) in output.iter_mut().enumerate() {
        let twiddle = Complex::cis(-PI * k as f64 / (2 * n) as f64);
        *out = (scratch[k] * twiddle).re;
    }
}

/// Exact inverse of [`dct1d`].
pub fn idct1d(input: &[f64], output: &mut [f64], scratch: &mut [Complex]) {
    let n = input.len();
    assert_eq!(output.len(), n);
    assert_eq!(scratch.len(), n);
    for k in 0..n {
        let mirrored = if k == 0 { 0.0 } else { input[n - k] };
        let twiddle = Complex::cis(PI * k as f64 / (2 * n) as f64);
        scratch[k] = twiddle * Complex::new(input[k], -mirrored);
    }
    ifft(scratch);
    for i in 0..n.div_ceil(2) {
        output[2 * i] = scratch[i].re;
    }
    for i in 0..n / 2 {
        output[2 * i + 1] = scratch[n - 1 - i].re;
    }
}

/// Line buffers for one 2D transform; each must hold `max(xsize, ysize)` entries.
struct Lines<'a> {
    line: &'a mut [f64],
    out: &'a mut [f64],
    scratch: &'a mut [Complex],
}

type LineTransform = fn(&[f64], &mut [f64], &mut [Complex]);

impl Lines<'_> {
    fn rows(&mut self, data: &mut [f64], size: (usize, usize), transform: LineTransform) {
        let (xsize, ysize) = size;
        for y in 0..ysize {
            let row = &mut data[y * xsize..(y + 1) * xsize];
            transform(row, &mut self.out[..xsize], &mut self.scratch[..xsize]);
            row.copy_from_slice(&self.out[..xsize]);
        }
    }

    fn columns(&mut self, data: &mut [f64], size: (usize, usize), transform: LineTransform) {
        let (xsize, ysize) = size;
        for x in 0..xsize {
            for y in 0..ysize {
                self.line[y] = data[y * xsize + x];
            }
            transform(
                &self.line[..ysize],
                &mut self.out[..ysize],
                &mut self.scratch[..ysize],
            );
            for y in 0..ysize {
                data[y * xsize + x] = self.out[y];
            }
        }
    }
}

fn forward_impl(data: &mut [f64], size: (usize, usize), lines: &mut Lines<'_>) {
    let (xsize, ysize) = size;
    assert_eq!(data.len(), xsize * ysize);
    lines.rows(data, size, dct1d);
    lines.columns(data, size, dct1d);
    let beta = scale(size);
    for v in 0..ysize {
        for u in 0..xsize {
            data[v * xsize + u] *= beta * alpha(u) * alpha(v);
        }
    }
}

fn inverse_impl(data: &mut [f64], size: (usize, usize), lines: &mut Lines<'_>) {
    let (xsize, ysize) = size;
    assert_eq!(data.len(), xsize * ysize);
    let beta = scale(size);
    for v in 0..ysize {
        for u in 0..xsize {
            data[v * xsize + u] /= beta * alpha(u) * alpha(v);
        }
    }
    lines.columns(data, size, idct1d);
    lines.rows(data, size, idct1d);
}

/// In-place forward transform; both dimensions must be powers of two.
pub fn fft_dct2d(data: &mut [f64], size: (usize, usize)) {
    let n = size.0.max(size.1);
    let (mut line, mut out) = (vec![0.0; n], vec![0.0; n]);
    let mut scratch = vec![Complex::ZERO; n];
    let mut lines = Lines {
        line: &mut line,
        out: &mut out,
        scratch: &mut scratch,
    };
    forward_impl(data, size, &mut lines);
}

/// In-place inverse of [`fft_dct2d`].
pub fn fft_idct2d(data: &mut [f64], size: (usize, usize)) {
    let n = size.0.max(size.1);
    let (mut line, mut out) = (vec![0.0; n], vec![0.0; n]);
    let mut scratch = vec![Complex::ZERO; n];
    let mut lines = Lines {
        line: &mut line,
        out: &mut out,
        scratch: &mut scratch,
    };
    inverse_impl(data, size, &mut lines);
}

/// Forward transform of one coding block through the FFT.
pub fn fft_dct2d_block(block: &mut Block) {
    let (mut line, mut out) = ([0.0; BLOCK_DIM], [0.0; BLOCK_DIM]);
    let mut scratch = [Complex::ZERO; BLOCK_DIM];
    let mut lines = Lines {
        line: &mut line,
        out: &mut out,
        scratch: &mut scratch,
    };
    forward_impl(block, (BLOCK_DIM, BLOCK_DIM), &mut lines);
}

/// In-place inverse of [`fft_dct2d_block`].
pub fn fft_idct2d_block(block: &mut Block) {
    let (mut line, mut out) = ([0.0; BLOCK_DIM], [0.0; BLOCK_DIM]);
    let mut scratch = [Complex::ZERO; BLOCK_DIM];
    let mut lines = Lines {
        line: &mut line,
        out: &mut out,
        scratch: &mut scratch,
    };
    inverse_impl(block, (BLOCK_DIM, BLOCK_DIM), &mut lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn naive_dft(input: &[Complex]) -> Vec<Complex> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .fold(Complex::ZERO, |acc, (j, &x)| {
                        acc + x * Complex::cis(-2.0 * PI * (j * k) as f64 / n as f64)
                    })
            })
            .collect()
    }

    #[test]
    fn fft_matches_naive_dft() {
        let input: Vec<Complex> = (0..16)
            .map(|i| Complex::new(i as f64 * 0.5 - 3.0, ((i * 7) % 5) as f64))
            .collect();
        let expected = naive_dft(&input);
        let mut data = input.clone();
        fft(&mut data);
        for (a, b) in data.iter().zip(expected.iter()) {
            assert!((a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9);
        }
        ifft(&mut data);
        for (a, b) in data.iter().zip(input.iter()) {
            assert!((a.re - b.re).abs() < 1e-12 && (a.im - b.im).abs() < 1e-12);
        }
    }

    #[test]
    fn dct1d_matches_cosine_sum() {
        let input = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let mut output = [0.0; 8];
        let mut scratch = [Complex::ZERO; 8];
        dct1d(&input, &mut output, &mut scratch);
        for (k, &value) in output.iter().enumerate() {
            let expected: f64 = input
                .iter()
                .enumerate()
                .map(|(n, &x)| x * ((2 * n + 1) as f64 * k as f64 * PI / 16.0).cos())
                .sum();
            assert!(
                (value - expected).abs() < 1e-9,
                "k={k}: {value} vs {expected}"
            );
        }
        let mut back = [0.0; 8];
        idct1d(&output, &mut back, &mut scratch);
        for (a, b) in back.iter().zip(input.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn single_sample_line() {
        let mut output = [0.0];
        let mut scratch = [Complex::ZERO];
        dct1d(&[5.0], &mut output, &mut scratch);
        assert_eq!(output, [5.0]);
    }

    #[test]
    #[should_panic]
    fn rejects_non_power_of_two() {
        let mut data = vec![Complex::ZERO; 6];
        fft(&mut data);
    }
}
