// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    Block,
    dct::{dct2d_block, idct2d_block},
    fft::{fft_dct2d_block, fft_idct2d_block},
};

/// A separable 8x8 frequency transform. Implementations must agree with each
/// other within floating point tolerance.
pub trait FrequencyTransform {
    /// Replaces centered sample values with frequency coefficients.
    fn forward(&self, block: &mut Block);
    /// Replaces frequency coefficients with sample values.
    fn inverse(&self, block: &mut Block);
}

/// Direct evaluation against the cached cosine basis.
#[derive(Clone, Copy, Debug, Default)]
pub struct CosineTransform;

impl FrequencyTransform for CosineTransform {
    fn forward(&self, block: &mut Block) {
        dct2d_block(block);
    }

    fn inverse(&self, block: &mut Block) {
        idct2d_block(block);
    }
}

/// Radix-2 FFT evaluation of the same transform.
#[derive(Clone, Copy, Debug, Default)]
pub struct FftTransform;

impl FrequencyTransform for FftTransform {
    fn forward(&self, block: &mut Block) {
        fft_dct2d_block(block);
    }

    fn inverse(&self, block: &mut Block) {
        fft_idct2d_block(block);
    }
}

/// Selects one of the transform strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformKind {
    #[default]
    Cosine,
    Fft,
}

impl TransformKind {
    pub const ALL: [TransformKind; 2] = [TransformKind::Cosine, TransformKind::Fft];
}

impl FrequencyTransform for TransformKind {
    fn forward(&self, block: &mut Block) {
        match self {
            TransformKind::Cosine => CosineTransform.forward(block),
            TransformKind::Fft => FftTransform.forward(block),
        }
    }

    fn inverse(&self, block: &mut Block) {
        match self {
            TransformKind::Cosine => CosineTransform.inverse(block),
            TransformKind::Fft => FftTransform.inverse(block),
        }
    }
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformKind::Cosine => write!(f, "cosine"),
            TransformKind::Fft => write!(f, "fft"),
        }
    }
}
