//! Sparse-Merkle-tree codec.
//!
//! Payload: `root(32) ‖ entry_count(varint) ‖ entries`, each entry:
//! `bit_len(varint) ‖ path_bits(ceil(bit_len/8) bytes) ‖ value(32)`.
//! Bits are packed most-significant-bit-first within each byte; logical bit 0
//! goes to bit 7 of byte 0. Trailing padding bits in the last byte are
//! unspecified on write and ignored on read.

use alloc::vec;
use alloc::vec::Vec;

use crate::envelope::{self, TAG_SMT};
use crate::error::CodecError;
use crate::records::common::{read_hash, Hash};
use crate::varint::{decode_varint, write_varint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMTEntry {
    /// Ordered sequence of bits (the path), `true` = 1.
    pub path: Vec<bool>,
    pub value: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMTData {
    pub root: Hash,
    pub entries: Vec<SMTEntry>,
}

fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let byte_len = bits.len().div_ceil(8);
    let mut out = vec![0u8; byte_len];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            out[i / 8] |= 0x80 >> (i % 8);
        }
    }
    out
}

fn unpack_bits(packed: &[u8], bit_len: usize) -> Vec<bool> {
    let mut out = Vec::with_capacity(bit_len);
    for i in 0..bit_len {
        let byte = packed[i / 8];
        out.push((byte & (0x80 >> (i % 8))) != 0);
    }
    out
}

fn encode_payload(data: &SMTData) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&data.root);
    write_varint(&mut out, data.entries.len() as u64);
    for entry in &data.entries {
        write_varint(&mut out, entry.path.len() as u64);
        out.extend_from_slice(&pack_bits(&entry.path));
        out.extend_from_slice(&entry.value);
    }
    out
}

fn decode_payload(data: &[u8]) -> Result<SMTData, CodecError> {
    let (root, mut data) = read_hash(data)?;
    let (entry_count, used) = decode_varint(data, 0)?;
    data = &data[used..];

    let mut entries = Vec::with_capacity(entry_count as usize);
    for _ in 0..entry_count {
        let (bit_len, used) = decode_varint(data, 0)?;
        data = &data[used..];
        let bit_len = bit_len as usize;
        let byte_len = bit_len.div_ceil(8);
        if data.len() < byte_len {
            return Err(CodecError::Truncated);
        }
        let path = unpack_bits(&data[..byte_len], bit_len);
        data = &data[byte_len..];
        let (value, rest) = read_hash(data)?;
        data = rest;
        entries.push(SMTEntry { path, value });
    }

    Ok(SMTData { root, entries })
}

/// Encodes `data` as an envelope-wrapped sparse-Merkle-tree record.
pub fn encode_smt(data: &SMTData) -> Vec<u8> {
    envelope::write_envelope(TAG_SMT, &encode_payload(data))
}

/// Decodes an envelope-wrapped sparse-Merkle-tree record, failing if the tag doesn't match.
pub fn decode_smt(bytes: &[u8]) -> Result<SMTData, CodecError> {
    let payload = envelope::read_envelope_tagged(bytes, TAG_SMT)?;
    decode_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_entry_order() {
        let data = SMTData {
            root: [9u8; 32],
            entries: alloc::vec![
                SMTEntry { path: alloc::vec![true, false, true], value: [1u8; 32] },
                SMTEntry { path: alloc::vec![false; 9], value: [2u8; 32] },
            ],
        };
        let wire = encode_smt(&data);
        assert_eq!(decode_smt(&wire).unwrap(), data);
    }

    #[test]
    fn zero_entries_round_trips() {
        let data = SMTData { root: [0u8; 32], entries: Vec::new() };
        let wire = encode_smt(&data);
        assert_eq!(decode_smt(&wire).unwrap(), data);
    }

    #[test]
    fn single_bit_path_packs_to_one_byte() {
        let data = SMTData {
            root: [0u8; 32],
            entries: alloc::vec![SMTEntry { path: alloc::vec![true], value: [1u8; 32] }],
        };
        let payload = encode_payload(&data);
        // root(32) + entry_count varint(1) + bit_len varint(1) + 1 packed byte + value(32)
        assert_eq!(payload.len(), 32 + 1 + 1 + 1 + 32);
        assert_eq!(decode_smt(&encode_smt(&data)).unwrap(), data);
    }

    #[test]
    fn bit_order_is_msb_first() {
        let bits = alloc::vec![true, false, false, false, false, false, false, false];
        assert_eq!(pack_bits(&bits), alloc::vec![0x80]);
        assert_eq!(unpack_bits(&[0x80], 8), bits);
    }

    #[test]
    fn nine_bit_path_spans_two_bytes() {
        let bits: Vec<bool> = (0..9).map(|i| i == 0).collect();
        let packed = pack_bits(&bits);
        assert_eq!(packed.len(), 2);
        assert_eq!(unpack_bits(&packed, 9), bits);
    }
}
