// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

use crate::entropy_coding::huffman::MAX_CODE_LENGTH;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid quality {0}, expected a value in [1, 99]")]
    InvalidQuality(u32),
    #[error("Invalid image size: {0}x{1}, dimensions must be multiples of 8")]
    InvalidImageSize(usize, usize),
    #[error("Huffman code of length {0} exceeds the maximum of {MAX_CODE_LENGTH}")]
    HuffmanCodeTooLong(usize),
    #[error("Invalid Huffman code of length {0}")]
    InvalidHuffman(u8),
    #[error("Huffman table is not prefix-free")]
    NonPrefixFreeTable,
    #[error("Symbol {0} appears more than once in the Huffman table")]
    DuplicateSymbol(u8),
    #[error("Symbol {0} has no Huffman code")]
    MissingSymbol(u8),
    #[error("Bit count {bit_count} exceeds the {available} bits of payload")]
    TruncatedBitstream { bit_count: u64, available: u64 },
    #[error("Bitstream ended in the middle of a Huffman code")]
    IncompleteCode,
    #[error("Unknown Huffman code at bit {0}")]
    UnknownCode(u64),
    #[error("Decoded {found} coefficients, expected {expected}")]
    CoefficientCountMismatch { expected: usize, found: usize },
    #[error("Read out of bounds")]
    OutOfBounds,
    #[error("Invalid signature {0:02x?}, expected \"DCTP\"")]
    InvalidSignature([u8; 4]),
    #[error("Unsupported container version {0}")]
    UnsupportedVersion(u8),
    #[error("File truncated")]
    FileTruncated,
    #[error("{0} unexpected bytes after the payload")]
    TrailingData(usize),
    #[error("Overflow when computing a bitstream size")]
    SizeOverflow,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "parallel")]
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
