// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Debug;

use crate::{
    bit_reader::BitReader,
    bit_writer::BitWriter,
    error::{Error, Result},
    util::tracing_wrappers::*,
};

pub const MAX_CODE_LENGTH: usize = 64;
pub const NUM_SYMBOLS: usize = 256;

/// A right-aligned bit pattern of `len` bits, read most significant bit first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    fn push(&self, bit: u64) -> Code {
        Code {
            bits: (self.bits << 1) | bit,
            len: self.len + 1,
        }
    }
}

/// Prefix-free mapping between byte symbols and codes.
#[derive(Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    codes: [Option<Code>; NUM_SYMBOLS],
    decode: HashMap<Code, u8>,
    max_len: usize,
}

impl Debug for HuffmanTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HuffmanTable {{ symbols: {}, max_len: {} }}",
            self.len(),
            self.max_len
        )
    }
}

#[derive(Clone, Copy)]
enum Node {
    Leaf(u8),
    Internal(usize, usize),
}

impl HuffmanTable {
    fn empty() -> HuffmanTable {
        HuffmanTable {
            codes: [None; NUM_SYMBOLS],
            decode: HashMap::new(),
            max_len: 0,
        }
    }

    /// Builds the code tree by repeatedly merging the two least frequent
    /// nodes. Ties go to the node created first; leaves are created in symbol
    /// order before any internal node.
    pub fn from_histogram(histogram: &[u64; NUM_SYMBOLS]) -> Result<HuffmanTable> {
        let mut nodes: Vec<Node> = Vec::with_capacity(2 * NUM_SYMBOLS);
        let mut heap = BinaryHeap::new();
        for (symbol, &count) in histogram.iter().enumerate() {
            if count > 0 {
                heap.push(Reverse((count, nodes.len())));
                nodes.push(Node::Leaf(symbol as u8));
            }
        }

        let mut table = HuffmanTable::empty();
        match nodes.as_slice() {
            [] => return Ok(table),
            [Node::Leaf(symbol)] => {
                table.insert(*symbol, Code { bits: 0, len: 1 });
                return Ok(table);
            }
            _ => {}
        }

        while let Some(Reverse((a_count, a))) = heap.pop() {
            let Some(Reverse((b_count, b))) = heap.pop() else {
                break;
            };
            heap.push(Reverse((a_count + b_count, nodes.len())));
            nodes.push(Node::Internal(a, b));
        }

        let mut stack = vec![(nodes.len() - 1, Code::default())];
        while let Some((index, code)) = stack.pop() {
            match nodes[index] {
                Node::Leaf(symbol) => table.insert(symbol, code),
                Node::Internal(left, right) => {
                    if code.len as usize >= MAX_CODE_LENGTH {
                        return Err(Error::HuffmanCodeTooLong(code.len as usize + 1));
                    }
                    stack.push((right, code.push(1)));
                    stack.push((left, code.push(0)));
                }
            }
        }
        debug!(
            symbols = table.len(),
            max_len = table.max_len,
            "built Huffman table"
        );
        Ok(table)
    }

    /// Validates and assembles a table from explicit codes.
    pub fn from_codes(codes: impl IntoIterator<Item = (u8, Code)>) -> Result<HuffmanTable> {
        let mut table = HuffmanTable::empty();
        for (symbol, code) in codes {
            let len = code.len as usize;
            if len == 0 || len > MAX_CODE_LENGTH || (len < 64 && code.bits >> len != 0) {
                return Err(Error::InvalidHuffman(code.len));
            }
            if table.codes[symbol as usize].is_some() {
                return Err(Error::DuplicateSymbol(symbol));
            }
            table.insert(symbol, code);
        }
        let mut sorted: Vec<Code> = table.iter().map(|(_, code)| code).collect();
        sorted.sort_by_key(|code| code.len);
        for (i, short) in sorted.iter().enumerate() {
            if sorted[i + 1..].iter().any(|long| short.is_prefix_of(long)) {
                return Err(Error::NonPrefixFreeTable);
            }
        }
        Ok(table)
    }

    fn insert(&mut self, symbol: u8, code: Code) {
        self.codes[symbol as usize] = Some(code);
        self.decode.insert(code, symbol);
        self.max_len = self.max_len.max(code.len as usize);
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.decode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decode.is_empty()
    }

    pub fn code(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    pub fn max_code_len(&self) -> usize {
        self.max_len
    }

    /// Coded symbols in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|code| (symbol as u8, code)))
    }

    pub fn write_symbols(&self, data: &[u8], bw: &mut BitWriter) -> Result<()> {
        for &symbol in data {
            let code = self.code(symbol).ok_or(Error::MissingSymbol(symbol))?;
            bw.write(code.len as usize, code.bits);
        }
        Ok(())
    }
}

/// Output of [`encode`]. Bits of the last payload byte beyond `bit_count`
/// are zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedStream {
    pub payload: Vec<u8>,
    pub bit_count: u64,
    pub table: HuffmanTable,
}

pub fn histogram(data: &[u8]) -> [u64; NUM_SYMBOLS] {
    let mut counts = [0u64; NUM_SYMBOLS];
    for &symbol in data {
        counts[symbol as usize] += 1;
    }
    counts
}

/// Builds a table for the symbol distribution of `data` and packs `data`
/// with it.
pub fn encode(data: &[u8]) -> Result<EncodedStream> {
    let table = HuffmanTable::from_histogram(&histogram(data))?;
    let mut bw = BitWriter::with_capacity(data.len() / 2);
    table.write_symbols(data, &mut bw)?;
    let bit_count = bw.bit_count();
    trace!(input = data.len(), bit_count, "Huffman encoded");
    Ok(EncodedStream {
        payload: bw.finish(),
        bit_count,
        table,
    })
}

/// Decodes exactly `bit_count` bits of `payload`, which must end on a code
/// boundary.
pub fn decode(payload: &[u8], table: &HuffmanTable, bit_count: u64) -> Result<Vec<u8>> {
    let available = payload.len() as u64 * 8;
    if bit_count > available {
        return Err(Error::TruncatedBitstream {
            bit_count,
            available,
        });
    }
    let mut br = BitReader::new(payload);
    let mut out = Vec::new();
    let mut code = Code::default();
    let mut code_start = 0;
    for position in 0..bit_count {
        code = code.push(br.read(1)?);
        if let Some(&symbol) = table.decode.get(&code) {
            out.push(symbol);
            code = Code::default();
            code_start = position + 1;
        } else if code.len as usize >= table.max_len {
            return Err(Error::UnknownCode(code_start));
        }
    }
    if code.len > 0 {
        return Err(Error::IncompleteCode);
    }
    trace!(symbols = out.len(), bit_count, "Huffman decoded");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use test_log::test;

    use super::*;

    fn code(bits: u64, len: u8) -> Code {
        Code { bits, len }
    }

    fn kraft_sum(table: &HuffmanTable) -> f64 {
        table.iter().map(|(_, c)| 0.5f64.powi(c.len as i32)).sum()
    }

    #[test]
    fn code_lengths_follow_frequencies() {
        let mut counts = [0u64; NUM_SYMBOLS];
        for (&symbol, count) in b"abcdef".iter().zip([5, 9, 12, 13, 16, 45]) {
            counts[symbol as usize] = count;
        }
        let table = HuffmanTable::from_histogram(&counts).unwrap();
        let symbols: Vec<u8> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, b"abcdef");
        let lengths: Vec<u8> = table.iter().map(|(_, c)| c.len).collect();
        assert_eq!(lengths, [4u8, 4, 3, 3, 3, 1]);
        assert_eq!(table.code(b'f'), Some(code(0, 1)));
        assert_eq!(table.max_code_len(), 4);
        assert_eq!(kraft_sum(&table), 1.0);
        assert_eq!(table.code(b'g'), None);
    }

    #[test]
    fn empty_input() {
        let stream = encode(&[]).unwrap();
        assert!(stream.table.is_empty());
        assert_eq!(stream.bit_count, 0);
        assert!(stream.payload.is_empty());
        let decoded = decode(&stream.payload, &stream.table, 0).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn single_symbol_uses_one_bit_codes() {
        let data = vec![42u8; 1000];
        let stream = encode(&data).unwrap();
        assert_eq!(stream.table.len(), 1);
        assert_eq!(stream.table.code(42), Some(code(0, 1)));
        assert_eq!(stream.bit_count, 1000);
        assert_eq!(stream.payload.len(), 125);
        let decoded = decode(&stream.payload, &stream.table, stream.bit_count).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn is_deterministic() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let data: Vec<u8> = (0..5000)
            .map(|_| rng.random_range(0..16u8).min(rng.random()))
            .collect();
        assert_eq!(encode(&data).unwrap(), encode(&data).unwrap());
    }

    #[test]
    fn roundtrip() {
        arbtest::arbtest(|u| {
            let data: Vec<u8> = u.arbitrary()?;
            let stream = encode(&data).unwrap();
            let decoded = decode(&stream.payload, &stream.table, stream.bit_count).unwrap();
            assert_eq!(decoded, data);
            if stream.table.len() > 1 {
                assert!((kraft_sum(&stream.table) - 1.0).abs() < 1e-12);
            }
            Ok(())
        });
    }

    #[test]
    fn skewed_distribution_compresses() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        let data: Vec<u8> = (0..10_000)
            .map(|_| if rng.random_bool(0.9) { 0 } else { rng.random() })
            .collect();
        let stream = encode(&data).unwrap();
        assert!(stream.bit_count < data.len() as u64 * 4);
        let decoded = decode(&stream.payload, &stream.table, stream.bit_count).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn from_codes_validates() {
        let codes = [(1, code(0b0, 1)), (2, code(0b10, 2)), (3, code(0b11, 2))];
        let table = HuffmanTable::from_codes(codes).unwrap();
        assert_eq!(table.len(), 3);

        assert!(matches!(
            HuffmanTable::from_codes([(1, code(0b1, 1)), (2, code(0b10, 2))]),
            Err(Error::NonPrefixFreeTable)
        ));
        assert!(matches!(
            HuffmanTable::from_codes([(1, code(0b01, 2)), (2, code(0b01, 2))]),
            Err(Error::NonPrefixFreeTable)
        ));
        assert!(matches!(
            HuffmanTable::from_codes([(1, code(0b0, 1)), (1, code(0b10, 2))]),
            Err(Error::DuplicateSymbol(1))
        ));
        assert!(matches!(
            HuffmanTable::from_codes([(1, code(0b100, 2))]),
            Err(Error::InvalidHuffman(2))
        ));
        assert!(matches!(
            HuffmanTable::from_codes([(1, code(0, 0))]),
            Err(Error::InvalidHuffman(0))
        ));
        assert!(matches!(
            HuffmanTable::from_codes([(1, code(0, 65))]),
            Err(Error::InvalidHuffman(65))
        ));
    }

    #[test]
    fn rebuilt_table_decodes_identically() {
        let data = b"abracadabra, alakazam".to_vec();
        let stream = encode(&data).unwrap();
        let rebuilt = HuffmanTable::from_codes(stream.table.iter()).unwrap();
        assert_eq!(rebuilt, stream.table);
        let decoded = decode(&stream.payload, &rebuilt, stream.bit_count).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn bit_count_beyond_payload_is_rejected() {
        let stream = encode(b"hello world").unwrap();
        let bits = stream.payload.len() as u64 * 8 + 1;
        assert!(matches!(
            decode(&stream.payload, &stream.table, bits),
            Err(Error::TruncatedBitstream { .. })
        ));
        assert!(matches!(
            decode(&stream.payload[..2], &stream.table, stream.bit_count),
            Err(Error::TruncatedBitstream { .. })
        ));
    }

    #[test]
    fn stream_ending_inside_a_code() {
        let codes = [(7, code(0b0, 1)), (9, code(0b10, 2)), (11, code(0b11, 2))];
        let table = HuffmanTable::from_codes(codes).unwrap();
        // 0 10 1
        assert!(matches!(
            decode(&[0b0101_0000], &table, 4),
            Err(Error::IncompleteCode)
        ));
        assert_eq!(decode(&[0b0101_0000], &table, 3).unwrap(), vec![7, 9]);
    }

    #[test]
    fn unknown_code() {
        let table = HuffmanTable::from_codes([(7, code(0b0, 1)), (9, code(0b10, 2))]).unwrap();
        // 0 0 11
        assert!(matches!(
            decode(&[0b0011_0000], &table, 4),
            Err(Error::UnknownCode(2))
        ));
        let empty = HuffmanTable::from_codes(std::iter::empty()).unwrap();
        let result = decode(&[0xff], &empty, 1);
        assert!(matches!(result, Err(Error::UnknownCode(0))));
    }

    #[test]
    fn missing_symbol_is_an_error() {
        let table = HuffmanTable::from_codes([(7, code(0b0, 1))]).unwrap();
        let mut bw = BitWriter::new();
        assert!(matches!(
            table.write_symbols(&[7, 8], &mut bw),
            Err(Error::MissingSymbol(8))
        ));
    }
}
