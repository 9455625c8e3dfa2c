// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Pixel-domain filters applied to one channel of a block before the forward
//! transform.

use crate::{BLOCK_DIM, Block};

pub trait BlockStage: Send + Sync + std::fmt::Display {
    fn uses_channel(&self, c: usize) -> bool;

    /// Filters one channel of an 8x8 block in place.
    fn process_block(&self, block: &mut Block);
}

/// Replaces every 2x2 neighborhood of the chroma channels by its mean.
pub struct ChromaSubsample;

impl std::fmt::Display for ChromaSubsample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "2x2 chroma subsample of channels 1 and 2")
    }
}

impl BlockStage for ChromaSubsample {
    fn uses_channel(&self, c: usize) -> bool {
        c == 1 || c == 2
    }

    fn process_block(&self, block: &mut Block) {
        for y in (0..BLOCK_DIM).step_by(2) {
            for x in (0..BLOCK_DIM).step_by(2) {
                let cells = [
                    y * BLOCK_DIM + x,
                    y * BLOCK_DIM + x + 1,
                    (y + 1) * BLOCK_DIM + x,
                    (y + 1) * BLOCK_DIM + x + 1,
                ];
                let mean = cells.iter().map(|&i| block[i]).sum::<f64>() * 0.25;
                for i in cells {
                    block[i] = mean;
                }
            }
        }
    }
}

/// Runs every stage that uses channel `c` over `block`, in order.
pub fn apply_stages(stages: &[Box<dyn BlockStage>], c: usize, block: &mut Block) {
    for stage in stages.iter().filter(|stage| stage.uses_channel(c)) {
        stage.process_block(block);
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::BLOCK_SIZE;

    #[test]
    fn averages_each_quad() {
        let mut block: Block = std::array::from_fn(|i| (i % BLOCK_DIM + i / BLOCK_DIM * 10) as f64);
        ChromaSubsample.process_block(&mut block);
        // (0 + 1 + 10 + 11) / 4
        assert_eq!(&block[0..2], &[5.5, 5.5]);
        assert_eq!(&block[BLOCK_DIM..BLOCK_DIM + 2], &[5.5, 5.5]);
        // (6 + 7 + 16 + 17) / 4 at x = 6
        assert_eq!(block[6], 11.5);
        assert_eq!(block[BLOCK_SIZE - 1], (66 + 67 + 76 + 77) as f64 / 4.0);
    }

    #[test]
    fn preserves_block_mean() {
        let original: Block = std::array::from_fn(|i| ((i * 37) % 19) as f64);
        let mut block = original;
        ChromaSubsample.process_block(&mut block);
        let mean = |b: &Block| b.iter().sum::<f64>() / BLOCK_SIZE as f64;
        assert!((mean(&block) - mean(&original)).abs() < 1e-12);
    }

    #[test]
    fn skips_luma() {
        let stages: Vec<Box<dyn BlockStage>> = vec![Box::new(ChromaSubsample)];
        let original: Block = std::array::from_fn(|i| i as f64);
        let mut luma = original;
        apply_stages(&stages, 0, &mut luma);
        assert_eq!(luma, original);
        let mut cr = original;
        apply_stages(&stages, 2, &mut cr);
        assert_ne!(cr, original);
        assert_eq!(cr[0], cr[9]);
    }
}
