// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Byte layout of a [`CompressedImage`]. All integers are little-endian.
//!
//! | field        | size                          |
//! |--------------|-------------------------------|
//! | signature    | 4 bytes, `DCTP`               |
//! | version      | u8                            |
//! | quality      | u8                            |
//! | width        | u32                           |
//! | height       | u32                           |
//! | bit count    | u64                           |
//! | table size   | u16                           |
//! | table entry  | symbol u8, length u8, bits u64 |
//! | payload size | u64                           |
//! | payload      | payload size bytes            |

use std::io::{Cursor, ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    BLOCK_DIM,
    entropy_coding::huffman::{Code, HuffmanTable},
    error::{Error, Result},
    pipeline::CompressedImage,
    quantize::check_quality,
    util::tracing_wrappers::*,
};

pub const SIGNATURE: [u8; 4] = *b"DCTP";
pub const VERSION: u8 = 1;

const TABLE_ENTRY_SIZE: usize = 10;

fn map_eof(error: std::io::Error) -> Error {
    if error.kind() == ErrorKind::UnexpectedEof {
        Error::FileTruncated
    } else {
        Error::Io(error)
    }
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::SizeOverflow)
}

impl CompressedImage {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let table_len = u16::try_from(self.table.len()).map_err(|_| Error::SizeOverflow)?;
        let capacity = 40 + self.table.len() * TABLE_ENTRY_SIZE + self.payload.len();
        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(&SIGNATURE);
        out.write_u8(VERSION)?;
        out.write_u8(self.quality)?;
        out.write_u32::<LittleEndian>(to_u32(self.width)?)?;
        out.write_u32::<LittleEndian>(to_u32(self.height)?)?;
        out.write_u64::<LittleEndian>(self.bit_count)?;
        out.write_u16::<LittleEndian>(table_len)?;
        for (symbol, code) in self.table.iter() {
            out.write_u8(symbol)?;
            out.write_u8(code.len)?;
            out.write_u64::<LittleEndian>(code.bits)?;
        }
        out.write_u64::<LittleEndian>(self.payload.len() as u64)?;
        out.extend_from_slice(&self.payload);
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> Result<CompressedImage> {
        let mut cursor = Cursor::new(data);
        let mut signature = [0u8; 4];
        cursor.read_exact(&mut signature).map_err(map_eof)?;
        if signature != SIGNATURE {
            return Err(Error::InvalidSignature(signature));
        }
        let version = cursor.read_u8().map_err(map_eof)?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let quality = check_quality(cursor.read_u8().map_err(map_eof)? as u32)?;
        let width = cursor.read_u32::<LittleEndian>().map_err(map_eof)? as usize;
        let height = cursor.read_u32::<LittleEndian>().map_err(map_eof)? as usize;
        if width % BLOCK_DIM != 0 || height % BLOCK_DIM != 0 {
            return Err(Error::InvalidImageSize(width, height));
        }
        let bit_count = cursor.read_u64::<LittleEndian>().map_err(map_eof)?;

        let table_len = cursor.read_u16::<LittleEndian>().map_err(map_eof)? as usize;
        let mut codes = Vec::with_capacity(table_len.min(256));
        for _ in 0..table_len {
            let symbol = cursor.read_u8().map_err(map_eof)?;
            let len = cursor.read_u8().map_err(map_eof)?;
            let bits = cursor.read_u64::<LittleEndian>().map_err(map_eof)?;
            codes.push((symbol, Code { bits, len }));
        }
        let table = HuffmanTable::from_codes(codes)?;

        let payload_len = cursor.read_u64::<LittleEndian>().map_err(map_eof)?;
        let remaining = (data.len() as u64).saturating_sub(cursor.position());
        if payload_len > remaining {
            return Err(Error::FileTruncated);
        }
        let available = payload_len * 8;
        if bit_count > available {
            return Err(Error::TruncatedBitstream {
                bit_count,
                available,
            });
        }
        let mut payload = vec![0; payload_len as usize];
        cursor.read_exact(&mut payload).map_err(map_eof)?;
        if remaining > payload_len {
            return Err(Error::TrailingData((remaining - payload_len) as usize));
        }
        debug!(
            width,
            height,
            quality,
            bit_count,
            symbols = table.len(),
            "read container"
        );
        Ok(CompressedImage {
            quality,
            width,
            height,
            bit_count,
            payload,
            table,
        })
    }
}
