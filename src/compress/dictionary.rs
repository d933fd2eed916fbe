//! Trainable substitution dictionary layered on top of a `SymbolTree`.
//!
//! Encoding replaces recurring byte windows with a two-byte escape sequence
//! (`0x00` + 1-based index), then runs the result through the prefix coder.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::compress::prefix::SymbolTree;
use crate::error::CodecError;
use crate::varint::{decode_varint, write_varint};

const DICTIONARY_VERSION: u8 = 0x01;
const WINDOW_SIZES: [usize; 4] = [4, 8, 16, 32];
const MAX_STRINGS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    strings: Vec<Vec<u8>>,
    tree: SymbolTree,
}

impl Dictionary {
    /// Trains a dictionary from a list of sample byte sequences. Zero
    /// samples yields a dictionary with no strings and an empty tree.
    pub fn train(samples: &[&[u8]]) -> Dictionary {
        if samples.is_empty() {
            return Dictionary { strings: Vec::new(), tree: SymbolTree::from_frequencies(&[0u64; 256]) };
        }

        let mut counts: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        for &window in &WINDOW_SIZES {
            for sample in samples {
                if sample.len() < window {
                    continue;
                }
                for start in 0..=(sample.len() - window) {
                    let w = sample[start..start + window].to_vec();
                    *counts.entry(w).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<(Vec<u8>, u64)> = counts.into_iter().filter(|(_, count)| *count >= 2).collect();
        candidates.sort_by(|a, b| {
            let score_a = a.1 * a.0.len() as u64;
            let score_b = b.1 * b.0.len() as u64;
            score_b.cmp(&score_a).then_with(|| b.0.len().cmp(&a.0.len())).then_with(|| a.0.cmp(&b.0))
        });
        candidates.truncate(MAX_STRINGS);
        let strings: Vec<Vec<u8>> = candidates.into_iter().map(|(s, _)| s).collect();

        let mut freq = [0u64; 256];
        for sample in samples {
            for b in substitute_encode(sample, &strings) {
                freq[b as usize] += 1;
            }
        }
        let tree = SymbolTree::from_frequencies(&freq);

        Dictionary { strings, tree }
    }

    /// Applies substitution, then the prefix code, emitting
    /// `substituted_len(varint) ‖ bit_count(varint) ‖ bits`.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let substituted = substitute_encode(data, &self.strings);
        let (bits, bit_count) = self.tree.encode(&substituted)?;

        let mut out = Vec::with_capacity(bits.len() + 10);
        write_varint(&mut out, substituted.len() as u64);
        write_varint(&mut out, bit_count as u64);
        out.extend_from_slice(&bits);
        Ok(out)
    }

    /// Reverses `compress`. The original-size argument is accepted for
    /// symmetry with the pipeline's decompressor signature but not required:
    /// the stored substituted length and bit count are sufficient.
    pub fn decompress(&self, buf: &[u8], _original_size: usize) -> Result<Vec<u8>, CodecError> {
        let (substituted_len, used) = decode_varint(buf, 0)?;
        let mut offset = used;
        let (bit_count, used) = decode_varint(buf, offset)?;
        offset += used;

        let bits = &buf[offset..];
        let substituted = self.tree.decode(bits, bit_count as usize, substituted_len as usize)?;
        substitute_decode(&substituted, &self.strings)
    }

    /// `version(1) ‖ tree(256 bytes) ‖ string_count(varint) ‖ [string_len(varint) ‖ bytes]*`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(DICTIONARY_VERSION);
        out.extend_from_slice(&self.tree.serialize());
        write_varint(&mut out, self.strings.len() as u64);
        for s in &self.strings {
            write_varint(&mut out, s.len() as u64);
            out.extend_from_slice(s);
        }
        out
    }

    pub fn deserialize(data: &[u8]) -> Result<Dictionary, CodecError> {
        let version = *data.first().ok_or(CodecError::Truncated)?;
        if version != DICTIONARY_VERSION {
            return Err(CodecError::BadVersion(version));
        }
        let mut offset = 1;
        if data.len() < offset + 256 {
            return Err(CodecError::Truncated);
        }
        let mut lengths = [0u8; 256];
        lengths.copy_from_slice(&data[offset..offset + 256]);
        offset += 256;
        let tree = SymbolTree::from_lengths(lengths)?;

        let (count, used) = decode_varint(data, offset)?;
        offset += used;
        let mut strings = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (len, used) = decode_varint(data, offset)?;
            offset += used;
            let len = len as usize;
            if data.len() < offset + len {
                return Err(CodecError::Truncated);
            }
            strings.push(data[offset..offset + len].to_vec());
            offset += len;
        }

        Ok(Dictionary { strings, tree })
    }
}

/// Scans `strings` in priority order at every position; the first match
/// wins even if a later entry would match more bytes.
fn substitute_encode(data: &[u8], strings: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    'positions: while i < data.len() {
        for (idx, s) in strings.iter().enumerate() {
            if !s.is_empty() && data[i..].starts_with(s.as_slice()) {
                out.push(0x00);
                out.push((idx + 1) as u8);
                i += s.len();
                continue 'positions;
            }
        }
        if data[i] == 0x00 {
            out.push(0x00);
            out.push(0x00);
        } else {
            out.push(data[i]);
        }
        i += 1;
    }
    out
}

fn substitute_decode(data: &[u8], strings: &[Vec<u8>]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == 0x00 {
            let marker = *data.get(i + 1).ok_or(CodecError::Truncated)?;
            if marker == 0x00 {
                out.push(0x00);
            } else {
                let s = strings.get((marker - 1) as usize).ok_or(CodecError::Malformed)?;
                out.extend_from_slice(s);
            }
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    Ok(out)
}
