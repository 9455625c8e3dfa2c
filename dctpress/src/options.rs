// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    TransformKind,
    error::Result,
    quantize::DEFAULT_QUALITY,
    stages::{BlockStage, ChromaSubsample},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressOptions {
    /// In `[1, 99]`; validated when compression starts.
    pub quality: u8,
    pub transform: TransformKind,
    pub chroma_subsampling: bool,
    /// Size of a dedicated worker pool. `None` uses the global pool.
    pub num_threads: Option<usize>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            quality: DEFAULT_QUALITY,
            transform: TransformKind::default(),
            chroma_subsampling: false,
            num_threads: None,
        }
    }
}

impl CompressOptions {
    pub fn with_quality(quality: u8) -> CompressOptions {
        CompressOptions {
            quality,
            ..Default::default()
        }
    }

    pub(crate) fn stages(&self) -> Vec<Box<dyn BlockStage>> {
        let mut stages: Vec<Box<dyn BlockStage>> = Vec::new();
        if self.chroma_subsampling {
            stages.push(Box::new(ChromaSubsample));
        }
        stages
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecompressOptions {
    /// Inverse strategy. Both agree to within rounding noise, so it need not
    /// match the one used for compression.
    pub transform: TransformKind,
    pub num_threads: Option<usize>,
}

/// Runs `work` inside a pool of `num_threads` workers, or directly when no
/// size is given.
#[cfg(feature = "parallel")]
pub(crate) fn run_with_threads<T: Send>(
    num_threads: Option<usize>,
    work: impl FnOnce() -> T + Send,
) -> Result<T> {
    match num_threads {
        Some(num_threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(num_threads).build()?;
            Ok(pool.install(work))
        }
        None => Ok(work()),
    }
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn run_with_threads<T: Send>(
    _num_threads: Option<usize>,
    work: impl FnOnce() -> T + Send,
) -> Result<T> {
    Ok(work())
}
