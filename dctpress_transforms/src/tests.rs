// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::*;
use crate::dct::{dct2d, idct2d};
use crate::fft::{fft_dct2d, fft_idct2d};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use test_log::test;

#[track_caller]
fn check_close(a: f64, b: f64, max_err: f64) {
    let abs = (a - b).abs();
    let rel = abs / a.abs().max(b.abs());
    assert!(
        abs < max_err || rel < max_err,
        "a: {a} b: {b} abs diff: {abs:?} rel diff: {rel:?}"
    );
}

#[track_caller]
fn check_all_close(a: &[f64], b: &[f64], max_err: f64) {
    assert_eq!(a.len(), b.len());
    for (a, b) in a.iter().zip(b.iter()) {
        check_close(*a, *b, max_err);
    }
}

fn random_samples(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-128.0..128.0)).collect()
}

fn random_block(seed: u64) -> Block {
    let samples = random_samples(BLOCK_SIZE, seed);
    std::array::from_fn(|i| samples[i])
}

#[test]
fn strategies_agree_on_random_blocks() {
    for seed in 0..64 {
        let input = random_block(seed);
        let mut cosine = input;
        let mut fft = input;
        CosineTransform.forward(&mut cosine);
        FftTransform.forward(&mut fft);
        check_all_close(&cosine, &fft, 1e-6);

        CosineTransform.inverse(&mut cosine);
        FftTransform.inverse(&mut fft);
        check_all_close(&cosine, &fft, 1e-6);
    }
}

#[test]
fn both_strategies_reconstruct_input() {
    for kind in TransformKind::ALL {
        for seed in 100..132 {
            let input = random_block(seed);
            let mut block = input;
            kind.forward(&mut block);
            kind.inverse(&mut block);
            check_all_close(&block, &input, 1e-6);
        }
    }
}

#[test]
fn strategies_agree_on_inverse_of_arbitrary_coefficients() {
    let mut rng = ChaCha12Rng::seed_from_u64(7);
    let coefficients: Block = std::array::from_fn(|_| rng.random_range(-1024.0..1024.0));
    let mut cosine = coefficients;
    let mut fft = coefficients;
    CosineTransform.inverse(&mut cosine);
    FftTransform.inverse(&mut fft);
    check_all_close(&cosine, &fft, 1e-6);
}

#[test]
fn kind_dispatches_to_strategy() {
    let input = random_block(3);
    let mut via_kind = input;
    let mut direct = input;
    TransformKind::Fft.forward(&mut via_kind);
    FftTransform.forward(&mut direct);
    assert_eq!(via_kind, direct);
    assert_eq!(TransformKind::default(), TransformKind::Cosine);
    assert_eq!(TransformKind::Fft.to_string(), "fft");
}

macro_rules! test_forward_eq_n_m {
    ($xsize:literal, $ysize:literal) => {
        paste::paste! {
            #[test]
            fn [<test_forward_eq_ $xsize x $ysize>]() {
                let size = ($xsize, $ysize);
                let input = random_samples($xsize * $ysize, $xsize * 1000 + $ysize);
                let mut cosine = input.clone();
                let mut fft = input.clone();
                dct2d(&mut cosine, size);
                fft_dct2d(&mut fft, size);
                check_all_close(&cosine, &fft, 1e-6);
            }
        }
    };
}

test_forward_eq_n_m!(1, 1);
test_forward_eq_n_m!(2, 2);
test_forward_eq_n_m!(4, 4);
test_forward_eq_n_m!(8, 8);
test_forward_eq_n_m!(4, 8);
test_forward_eq_n_m!(8, 16);
test_forward_eq_n_m!(16, 16);
test_forward_eq_n_m!(32, 32);

macro_rules! test_square_roundtrip_n {
    ($n:literal) => {
        paste::paste! {
            #[test]
            fn [<test_square_roundtrip_ $n>]() {
                let size = ($n, $n);
                let input = random_samples($n * $n, $n);
                let mut cosine = input.clone();
                let mut fft = input.clone();
                dct2d(&mut cosine, size);
                idct2d(&mut cosine, size);
                fft_dct2d(&mut fft, size);
                fft_idct2d(&mut fft, size);
                check_all_close(&cosine, &input, 1e-6);
                check_all_close(&fft, &input, 1e-6);
            }
        }
    };
}

test_square_roundtrip_n!(2);
test_square_roundtrip_n!(4);
test_square_roundtrip_n!(16);
test_square_roundtrip_n!(32);
