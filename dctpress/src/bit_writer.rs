// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Packs bit strings into bytes, most significant bit first. The last byte is
/// zero-padded.
#[derive(Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    current: u8,
    bits_in_current: usize,
}

pub const MAX_BITS_PER_CALL: usize = 64;

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter::default()
    }

    pub fn with_capacity(bytes: usize) -> BitWriter {
        BitWriter {
            data: Vec::with_capacity(bytes),
            ..Default::default()
        }
    }

    /// Appends the low `num` bits of `bits`, highest first.
    /// ```
    /// # use dctpress::bit_writer::BitWriter;
    /// let mut bw = BitWriter::new();
    /// bw.write(3, 0b101);
    /// bw.write(9, 0x1ff);
    /// assert_eq!(bw.bit_count(), 12);
    /// assert_eq!(bw.finish(), vec![0b1011_1111, 0b1111_0000]);
    /// ```
    pub fn write(&mut self, num: usize, bits: u64) {
        assert!(num <= MAX_BITS_PER_CALL);
        debug_assert!(num == 64 || bits >> num == 0);
        let mut remaining = num;
        while remaining > 0 {
            let space = 8 - self.bits_in_current;
            let n = remaining.min(space);
            let shift = remaining - n;
            let chunk = ((bits >> shift) & ((1u64 << n) - 1)) as u8;
            self.current |= chunk << (space - n);
            self.bits_in_current += n;
            remaining -= n;
            if self.bits_in_current == 8 {
                self.data.push(self.current);
                self.current = 0;
                self.bits_in_current = 0;
            }
        }
    }

    /// Number of meaningful bits written so far.
    pub fn bit_count(&self) -> u64 {
        self.data.len() as u64 * 8 + self.bits_in_current as u64
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_in_current > 0 {
            self.data.push(self.current);
        }
        self.data
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::bit_reader::BitReader;

    #[test]
    fn single_bits() {
        let mut bw = BitWriter::new();
        for bit in [true, false, true, true, false, true, false, false, true] {
            bw.write(1, bit as u64);
        }
        assert_eq!(bw.bit_count(), 9);
        assert_eq!(bw.finish(), vec![0b1011_0100, 0b1000_0000]);
    }

    #[test]
    fn full_width_write() {
        let mut bw = BitWriter::new();
        bw.write(4, 0xa);
        bw.write(64, 0x0123_4567_89ab_cdef);
        bw.write(0, 0);
        assert_eq!(bw.bit_count(), 68);
        assert_eq!(
            bw.finish(),
            vec![0xa0, 0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0]
        );
    }

    #[test]
    fn empty_writer() {
        let bw = BitWriter::with_capacity(16);
        assert_eq!(bw.bit_count(), 0);
        assert!(bw.finish().is_empty());
    }

    #[test]
    fn read_back() {
        arbtest::arbtest(|u| {
            let fields: Vec<(u8, u64)> = u.arbitrary()?;
            let fields: Vec<(usize, u64)> = fields
                .into_iter()
                .map(|(len, bits)| {
                    let len = (len as usize) % 57;
                    (len, if len == 0 { 0 } else { bits >> (64 - len) })
                })
                .collect();
            let mut bw = BitWriter::new();
            for &(len, bits) in &fields {
                bw.write(len, bits);
            }
            let total = bw.bit_count() as usize;
            let data = bw.finish();
            assert_eq!(data.len(), total.div_ceil(8));
            let mut br = BitReader::new(&data);
            for &(len, bits) in &fields {
                assert_eq!(br.read(len).unwrap(), bits);
            }
            assert_eq!(br.total_bits_read(), total);
            Ok(())
        });
    }
}
