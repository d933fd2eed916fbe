//! File-node codec.
//!
//! Payload: `content_hash(32) ‖ created(6 BE) ‖ modified(6 BE) ‖ size(varint)
//! ‖ chunk_count(varint) ‖ chunk_refs`, each `ChunkRef` inline as
//! `index(varint) ‖ hash(32) ‖ blob_address(32) ‖ nonce(24)`.

use alloc::vec::Vec;

use crate::envelope::{self, TAG_FILE_NODE};
use crate::error::CodecError;
use crate::records::common::{read_hash, read_nonce, read_timestamp, write_timestamp, Hash, Nonce, Timestamp};
use crate::varint::{decode_varint, write_varint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRef {
    pub index: u64,
    pub hash: Hash,
    pub blob_address: Hash,
    pub nonce: Nonce,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub content_hash: Hash,
    pub size: u64,
    pub created: Timestamp,
    pub modified: Timestamp,
    pub chunks: Vec<ChunkRef>,
}

fn encode_payload(node: &FileNode) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&node.content_hash);
    write_timestamp(&mut out, node.created);
    write_timestamp(&mut out, node.modified);
    write_varint(&mut out, node.size);
    write_varint(&mut out, node.chunks.len() as u64);
    for chunk in &node.chunks {
        write_varint(&mut out, chunk.index);
        out.extend_from_slice(&chunk.hash);
        out.extend_from_slice(&chunk.blob_address);
        out.extend_from_slice(&chunk.nonce);
    }
    out
}

fn decode_payload(mut data: &[u8]) -> Result<FileNode, CodecError> {
    let (content_hash, rest) = read_hash(data)?;
    data = rest;
    let (created, rest) = read_timestamp(data)?;
    data = rest;
    let (modified, rest) = read_timestamp(data)?;
    data = rest;
    let (size, used) = decode_varint(data, 0)?;
    data = &data[used..];
    let (chunk_count, used) = decode_varint(data, 0)?;
    data = &data[used..];

    let mut chunks = Vec::with_capacity(chunk_count as usize);
    for _ in 0..chunk_count {
        let (index, used) = decode_varint(data, 0)?;
        data = &data[used..];
        let (hash, rest) = read_hash(data)?;
        data = rest;
        let (blob_address, rest) = read_hash(data)?;
        data = rest;
        let (nonce, rest) = read_nonce(data)?;
        data = rest;
        chunks.push(ChunkRef { index, hash, blob_address, nonce });
    }

    Ok(FileNode { content_hash, size, created, modified, chunks })
}

/// Encodes `node` as an envelope-wrapped file-node record.
pub fn encode_file_node(node: &FileNode) -> Vec<u8> {
    envelope::write_envelope(TAG_FILE_NODE, &encode_payload(node))
}

/// Decodes an envelope-wrapped file-node record, failing if the tag doesn't match.
pub fn decode_file_node(bytes: &[u8]) -> Result<FileNode, CodecError> {
    let payload = envelope::read_envelope_tagged(bytes, TAG_FILE_NODE)?;
    decode_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileNode {
        FileNode {
            content_hash: [1u8; 32],
            size: 1024,
            created: 1_700_000_000_000,
            modified: 1_700_000_000_000,
            chunks: alloc::vec![ChunkRef {
                index: 0,
                hash: [0u8; 32],
                blob_address: [0u8; 32],
                nonce: [0u8; 24],
            }],
        }
    }

    #[test]
    fn round_trip() {
        let node = sample();
        let wire = encode_file_node(&node);
        let decoded = decode_file_node(&wire).unwrap();
        assert_eq!(decoded, node);
    }

    #[test]
    fn scenario_single_chunk_length_bound() {
        let wire = encode_file_node(&sample());
        assert!(wire.len() <= 160, "encoded length {} exceeds 160", wire.len());
    }

    #[test]
    fn zero_chunks_round_trips() {
        let mut node = sample();
        node.chunks.clear();
        let wire = encode_file_node(&node);
        let decoded = decode_file_node(&wire).unwrap();
        assert_eq!(decoded, node);
        assert!(decoded.chunks.is_empty());
    }

    #[test]
    fn chunk_order_preserved() {
        let mut node = sample();
        node.chunks = alloc::vec![
            ChunkRef { index: 5, hash: [5u8; 32], blob_address: [6u8; 32], nonce: [7u8; 24] },
            ChunkRef { index: 1, hash: [1u8; 32], blob_address: [2u8; 32], nonce: [3u8; 24] },
        ];
        let wire = encode_file_node(&node);
        let decoded = decode_file_node(&wire).unwrap();
        assert_eq!(decoded.chunks, node.chunks);
    }

    #[test]
    fn truncated_payload_fails() {
        let wire = encode_file_node(&sample());
        let truncated = &wire[..wire.len() - 10];
        assert!(decode_file_node(truncated).is_err());
    }

    #[test]
    fn wrong_tag_rejected() {
        let wire = envelope::write_envelope(envelope::TAG_DIR_NODE, &encode_payload(&sample()));
        assert!(matches!(decode_file_node(&wire), Err(CodecError::BadTag(_))));
    }
}
