// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::Error;
use byteorder::{BigEndian, ByteOrder};

/// Reads bits from a sequence of bytes, most significant bit first.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    // Valid bits are left-aligned.
    bit_buf: u64,
    bits_in_buf: usize,
    total_bits_read: usize,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], bits_in_buf: {}, total_bits_read: {} }}",
            self.data.len(),
            self.bits_in_buf,
            self.total_bits_read,
        )
    }
}

pub const MAX_BITS_PER_CALL: usize = 56;

impl<'a> BitReader<'a> {
    /// Constructs a BitReader for a given range of data.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            bit_buf: 0,
            bits_in_buf: 0,
            total_bits_read: 0,
        }
    }

    /// Reads `num` bits from the buffer without consuming them.
    pub fn peek(&mut self, num: usize) -> Result<u64, Error> {
        assert!(num <= MAX_BITS_PER_CALL);
        if num == 0 {
            return Ok(0);
        }
        self.refill();
        if self.bits_in_buf < num {
            return Err(Error::OutOfBounds);
        }
        Ok(self.bit_buf >> (64 - num))
    }

    /// Advances by `num` bits, which must already be in the buffer.
    pub fn consume(&mut self, num: usize) -> Result<(), Error> {
        if self.bits_in_buf < num {
            return Err(Error::OutOfBounds);
        }
        self.bit_buf = self.bit_buf.checked_shl(num as u32).unwrap_or(0);
        self.bits_in_buf -= num;
        self.total_bits_read += num;
        Ok(())
    }

    /// Reads `num` bits from the buffer.
    /// ```
    /// # use dctpress::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0b1011_0000, 0xff]);
    /// assert_eq!(br.read(1)?, 1);
    /// assert_eq!(br.read(3)?, 0b011);
    /// assert_eq!(br.read(12)?, 0x0ff);
    /// assert_eq!(br.total_bits_read(), 16);
    /// assert!(br.read(1).is_err());
    /// # Ok::<(), dctpress::error::Error>(())
    /// ```
    pub fn read(&mut self, num: usize) -> Result<u64, Error> {
        let ret = self.peek(num)?;
        self.consume(num)?;
        Ok(ret)
    }

    pub fn read_bit(&mut self) -> Result<bool, Error> {
        Ok(self.read(1)? != 0)
    }

    /// Returns the total number of bits that have been read.
    pub fn total_bits_read(&self) -> usize {
        self.total_bits_read
    }

    /// Returns the total number of bits that can still be read.
    pub fn total_bits_available(&self) -> usize {
        self.data.len() * 8 + self.bits_in_buf
    }

    fn refill(&mut self) {
        if self.data.len() >= 8 {
            let bits = BigEndian::read_u64(self.data);
            self.bit_buf |= bits >> self.bits_in_buf;
            let read_bytes = (63 - self.bits_in_buf) >> 3;
            self.bits_in_buf |= 56;
            self.data = &self.data[read_bytes..];
            debug_assert!(56 <= self.bits_in_buf && self.bits_in_buf < 64);
        } else {
            self.refill_slow()
        }
    }

    #[inline(never)]
    fn refill_slow(&mut self) {
        while self.bits_in_buf < 56 {
            if self.data.is_empty() {
                return;
            }
            self.bit_buf |= (self.data[0] as u64) << (56 - self.bits_in_buf);
            self.bits_in_buf += 8;
            self.data = &self.data[1..];
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn reads_across_fast_and_slow_refills() {
        let data: Vec<u8> = (0..19u8).map(|i| i.wrapping_mul(37)).collect();
        let mut br = BitReader::new(&data);
        let mut bits = Vec::new();
        while br.total_bits_available() > 0 {
            bits.push(br.read_bit().unwrap());
        }
        let expected: Vec<bool> = data
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
            .collect();
        assert_eq!(bits, expected);
        assert_eq!(br.total_bits_read(), data.len() * 8);
    }

    #[test]
    fn mixed_widths() {
        let data = [0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab];
        let mut br = BitReader::new(&data);
        assert_eq!(br.read(4).unwrap(), 0xd);
        assert_eq!(br.read(12).unwrap(), 0xead);
        assert_eq!(br.read(40).unwrap(), 0xbeef012345);
        assert_eq!(br.read(20).unwrap(), 0x6789a);
        assert_eq!(br.total_bits_available(), 4);
        assert!(br.read(5).is_err());
        assert_eq!(br.read(4).unwrap(), 0xb);
    }

    #[test]
    fn empty_reader() {
        let mut br = BitReader::new(&[]);
        assert_eq!(br.read(0).unwrap(), 0);
        assert!(matches!(br.read_bit(), Err(Error::OutOfBounds)));
    }
}
