//! Canonical length-limited prefix code over a fixed 256-symbol alphabet.
//!
//! A `SymbolTree` is nothing but a 256-entry code-length vector: the
//! canonical assignment algorithm makes the actual codes a pure function of
//! those lengths, so that's all that gets serialized.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::CodecError;

const ALPHABET: usize = 256;
const MAX_LENGTH: u8 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTree {
    lengths: [u8; ALPHABET],
    codes: [u16; ALPHABET],
}

struct MergeNode {
    weight: u64,
    order: u64,
    left: Link,
    right: Link,
}

#[derive(Clone, Copy)]
enum Link {
    Leaf(u8),
    Internal(usize),
}

impl SymbolTree {
    /// Builds a tree from a 256-entry frequency table, following the
    /// merge-and-clamp procedure: repeatedly combine the two lowest-weight
    /// trees (ties broken by insertion order), then repair any length that
    /// exceeds the 15-bit limit.
    pub fn from_frequencies(freq: &[u64; ALPHABET]) -> SymbolTree {
        let active: Vec<u8> = (0..ALPHABET).filter(|&i| freq[i] > 0).map(|i| i as u8).collect();

        let mut lengths = [0u8; ALPHABET];

        if active.is_empty() {
            return SymbolTree { lengths, codes: [0u16; ALPHABET] };
        }
        if active.len() == 1 {
            lengths[active[0] as usize] = 1;
            let codes = assign_canonical_codes(&lengths, &active);
            return SymbolTree { lengths, codes };
        }

        lengths = build_lengths_by_merge(freq, &active);
        repair_length_limit(&mut lengths, &active);
        let codes = assign_canonical_codes(&lengths, &active);
        SymbolTree { lengths, codes }
    }

    /// Rebuilds a tree from a previously serialized code-length vector,
    /// rejecting one that doesn't satisfy Kraft's inequality or exceeds the
    /// 15-bit length limit — a corrupted or foreign-origin vector shouldn't
    /// silently produce a tree with overlapping codes.
    pub fn from_lengths(lengths: [u8; ALPHABET]) -> Result<SymbolTree, CodecError> {
        let active: Vec<u8> = (0..ALPHABET).filter(|&i| lengths[i] > 0).map(|i| i as u8).collect();
        if active.iter().any(|&s| lengths[s as usize] > MAX_LENGTH) {
            return Err(CodecError::Malformed);
        }
        let kraft: u64 = active.iter().map(|&s| 1u64 << (MAX_LENGTH - lengths[s as usize])).sum();
        if kraft > 1u64 << MAX_LENGTH {
            return Err(CodecError::Malformed);
        }
        let codes = assign_canonical_codes(&lengths, &active);
        Ok(SymbolTree { lengths, codes })
    }

    pub fn lengths(&self) -> &[u8; ALPHABET] {
        &self.lengths
    }

    /// Serializes the code-length vector: exactly 256 bytes, one per symbol.
    pub fn serialize(&self) -> [u8; ALPHABET] {
        self.lengths
    }

    pub fn deserialize(bytes: &[u8; ALPHABET]) -> Result<SymbolTree, CodecError> {
        SymbolTree::from_lengths(*bytes)
    }

    /// Encodes `data`, writing canonical codes MSB-first into a packed bit
    /// stream. Returns the byte buffer and the number of valid bits.
    pub fn encode(&self, data: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
        let mut writer = BitWriter::new();
        for &byte in data {
            let len = self.lengths[byte as usize];
            if len == 0 {
                return Err(CodecError::UncodedSymbol);
            }
            writer.push_bits(self.codes[byte as usize], len);
        }
        Ok(writer.finish())
    }

    /// Decodes `bit_count` bits from `bits`, expecting exactly
    /// `expected_len` output bytes.
    pub fn decode(&self, bits: &[u8], bit_count: usize, expected_len: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(expected_len);
        let mut reader = BitReader::new(bits, bit_count);
        let mut current_code: u16 = 0;
        let mut current_len: u8 = 0;

        while reader.remaining() > 0 {
            current_code = (current_code << 1) | reader.next_bit()? as u16;
            current_len += 1;
            if current_len > MAX_LENGTH {
                return Err(CodecError::BadCode);
            }
            if let Some(symbol) = self.lookup(current_len, current_code) {
                out.push(symbol);
                if out.len() > expected_len {
                    return Err(CodecError::LengthMismatch);
                }
                current_code = 0;
                current_len = 0;
            }
        }

        if current_len != 0 {
            return Err(CodecError::BadCode);
        }
        if out.len() != expected_len {
            return Err(CodecError::LengthMismatch);
        }
        Ok(out)
    }

    fn lookup(&self, len: u8, code: u16) -> Option<u8> {
        for symbol in 0..ALPHABET {
            if self.lengths[symbol] == len && self.codes[symbol] == code {
                return Some(symbol as u8);
            }
        }
        None
    }
}

fn build_lengths_by_merge(freq: &[u64; ALPHABET], active: &[u8]) -> [u8; ALPHABET] {
    let mut nodes: Vec<MergeNode> = Vec::new();
    let mut forest: Vec<usize> = Vec::new(); // indices into `nodes`
    let mut next_order: u64 = 0;

    for &symbol in active {
        nodes.push(MergeNode {
            weight: freq[symbol as usize],
            order: next_order,
            left: Link::Leaf(symbol),
            right: Link::Leaf(symbol),
        });
        next_order += 1;
        forest.push(nodes.len() - 1);
    }

    // Leaves double as their own placeholder; track which forest entries are
    // raw leaves (left==right==Leaf(sym) with weight==freq[sym]) vs merged
    // internal nodes by a parallel is_leaf flag instead of overloading Link.
    let mut is_leaf: Vec<bool> = vec![true; nodes.len()];

    while forest.len() > 1 {
        // find two lowest-weight entries, ties broken by order (= insertion order)
        let (mut i1, mut i2) = (0usize, 1usize);
        if weight_order(&nodes, forest[i2]) < weight_order(&nodes, forest[i1]) {
            core::mem::swap(&mut i1, &mut i2);
        }
        for k in 2..forest.len() {
            let wk = weight_order(&nodes, forest[k]);
            if wk < weight_order(&nodes, forest[i1]) {
                i2 = i1;
                i1 = k;
            } else if wk < weight_order(&nodes, forest[i2]) {
                i2 = k;
            }
        }

        let (lo, hi) = if i1 < i2 { (i1, i2) } else { (i2, i1) };
        let idx_hi = forest.remove(hi);
        let idx_lo = forest.remove(lo);

        let weight = nodes[idx_lo].weight + nodes[idx_hi].weight;
        let left = if is_leaf[idx_lo] { nodes[idx_lo].left } else { Link::Internal(idx_lo) };
        let right = if is_leaf[idx_hi] { nodes[idx_hi].left } else { Link::Internal(idx_hi) };

        nodes.push(MergeNode { weight, order: next_order, left, right });
        is_leaf.push(false);
        next_order += 1;
        forest.push(nodes.len() - 1);
    }

    let mut lengths = [0u8; ALPHABET];
    if let Some(&root) = forest.first() {
        if is_leaf[root] {
            // Only one node ever existed (shouldn't happen: active.len() > 1
            // guarantees at least one merge), but guard anyway.
            if let Link::Leaf(sym) = nodes[root].left {
                lengths[sym as usize] = 1;
            }
        } else {
            assign_depths(&nodes, Link::Internal(root), 0, &mut lengths);
        }
    }
    lengths
}

fn weight_order(nodes: &[MergeNode], idx: usize) -> (u64, u64) {
    (nodes[idx].weight, nodes[idx].order)
}

fn assign_depths(nodes: &[MergeNode], link: Link, depth: u8, lengths: &mut [u8; ALPHABET]) {
    match link {
        Link::Leaf(sym) => lengths[sym as usize] = depth,
        Link::Internal(idx) => {
            assign_depths(nodes, nodes[idx].left, depth + 1, lengths);
            assign_depths(nodes, nodes[idx].right, depth + 1, lengths);
        }
    }
}

fn repair_length_limit(lengths: &mut [u8; ALPHABET], active: &[u8]) {
    for &s in active {
        if lengths[s as usize] > MAX_LENGTH {
            lengths[s as usize] = MAX_LENGTH;
        }
    }

    loop {
        let kraft: u64 = active.iter().map(|&s| 1u64 << (MAX_LENGTH - lengths[s as usize])).sum();
        if kraft <= (1u64 << MAX_LENGTH) {
            break;
        }
        let shortest = active
            .iter()
            .copied()
            .filter(|&s| lengths[s as usize] < MAX_LENGTH)
            .min_by_key(|&s| lengths[s as usize]);
        match shortest {
            Some(s) => lengths[s as usize] += 1,
            None => break,
        }
    }
}

fn assign_canonical_codes(lengths: &[u8; ALPHABET], active: &[u8]) -> [u16; ALPHABET] {
    let mut codes = [0u16; ALPHABET];
    let mut sorted: Vec<u8> = active.to_vec();
    sorted.sort_by_key(|&s| (lengths[s as usize], s));

    let mut code: u32 = 0;
    let mut prev_len: u8 = 0;
    for &s in &sorted {
        let len = lengths[s as usize];
        code <<= (len - prev_len) as u32;
        codes[s as usize] = code as u16;
        code += 1;
        prev_len = len;
    }
    codes
}

struct BitWriter {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl BitWriter {
    fn new() -> Self {
        BitWriter { bytes: Vec::new(), bit_count: 0 }
    }

    fn push_bits(&mut self, code: u16, len: u8) {
        for i in (0..len).rev() {
            let bit = (code >> i) & 1;
            let byte_idx = self.bit_count / 8;
            if byte_idx == self.bytes.len() {
                self.bytes.push(0);
            }
            if bit != 0 {
                self.bytes[byte_idx] |= 0x80 >> (self.bit_count % 8);
            }
            self.bit_count += 1;
        }
    }

    fn finish(self) -> (Vec<u8>, usize) {
        (self.bytes, self.bit_count)
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    bit_count: usize,
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8], bit_count: usize) -> Self {
        BitReader { bytes, bit_count, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bit_count - self.pos
    }

    fn next_bit(&mut self) -> Result<u8, CodecError> {
        if self.pos >= self.bit_count {
            return Err(CodecError::BadCode);
        }
        let byte = *self.bytes.get(self.pos / 8).ok_or(CodecError::BadCode)?;
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Ok(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq_for(bytes: &[u8]) -> [u64; ALPHABET] {
        let mut freq = [0u64; ALPHABET];
        for &b in bytes {
            freq[b as usize] += 1;
        }
        freq
    }

    #[test]
    fn empty_frequency_table_has_all_zero_lengths() {
        let tree = SymbolTree::from_frequencies(&[0u64; ALPHABET]);
        assert!(tree.lengths().iter().all(|&l| l == 0));
        assert_eq!(tree.encode(&[1]), Err(CodecError::UncodedSymbol));
    }

    #[test]
    fn single_active_symbol_gets_length_one() {
        let mut freq = [0u64; ALPHABET];
        freq[65] = 10;
        let tree = SymbolTree::from_frequencies(&freq);
        assert_eq!(tree.lengths()[65], 1);
        assert!(tree.lengths().iter().enumerate().all(|(i, &l)| i == 65 || l == 0));

        let (bits, bit_count) = tree.encode(&[65, 65, 65]).unwrap();
        assert_eq!(bit_count, 3);
        let decoded = tree.decode(&bits, bit_count, 3).unwrap();
        assert_eq!(decoded, alloc::vec![65, 65, 65]);
    }

    #[test]
    fn round_trips_typical_distribution() {
        let data: Vec<u8> = b"the quick brown fox jumps over the lazy dog the fox ran".to_vec();
        let freq = freq_for(&data);
        let tree = SymbolTree::from_frequencies(&freq);
        assert!(tree.lengths().iter().all(|&l| l <= MAX_LENGTH));
        let (bits, bit_count) = tree.encode(&data).unwrap();
        let decoded = tree.decode(&bits, bit_count, data.len()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn kraft_inequality_holds_for_skewed_distribution() {
        let mut freq = [0u64; ALPHABET];
        // A long tail of singleton symbols forces the length limiter to act.
        for i in 0..200u64 {
            freq[i as usize] = 1;
        }
        freq[200] = 1_000_000;
        let tree = SymbolTree::from_frequencies(&freq);
        let active: Vec<u8> = (0..ALPHABET).filter(|&i| freq[i] > 0).map(|i| i as u8).collect();
        let kraft: u64 = active.iter().map(|&s| 1u64 << (MAX_LENGTH - tree.lengths()[s as usize])).sum();
        assert!(kraft <= 1u64 << MAX_LENGTH);
        assert!(active.iter().all(|&s| tree.lengths()[s as usize] <= MAX_LENGTH));
    }

    #[test]
    fn serialize_round_trips_through_deserialize() {
        let freq = freq_for(b"aaaabbbc");
        let tree = SymbolTree::from_frequencies(&freq);
        let bytes = tree.serialize();
        let restored = SymbolTree::deserialize(&bytes).unwrap();
        assert_eq!(restored, tree);
    }

    #[test]
    fn deserialize_rejects_a_vector_that_violates_kraft() {
        // Two symbols both claiming length 1 overcommits the code space.
        let mut lengths = [0u8; ALPHABET];
        lengths[0] = 1;
        lengths[1] = 1;
        lengths[2] = 1;
        assert_eq!(SymbolTree::from_lengths(lengths), Err(CodecError::Malformed));
    }

    #[test]
    fn decode_rejects_truncated_bitstream() {
        let freq = freq_for(b"aaaabbbc");
        let tree = SymbolTree::from_frequencies(&freq);
        let (bits, bit_count) = tree.encode(b"aaaabbbc").unwrap();
        assert!(tree.decode(&bits, bit_count - 1, 8).is_err());
    }

    #[test]
    fn decode_rejects_wrong_expected_length() {
        let freq = freq_for(b"aaaabbbc");
        let tree = SymbolTree::from_frequencies(&freq);
        let (bits, bit_count) = tree.encode(b"aaaabbbc").unwrap();
        assert_eq!(tree.decode(&bits, bit_count, 7), Err(CodecError::LengthMismatch));
    }
}
