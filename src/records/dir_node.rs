//! Directory-node codec.
//!
//! Payload: `smt_root(32) ‖ has_group(1 byte, 0 or 1) ‖ [group_id(32) if
//! has_group=1] ‖ created(6 BE) ‖ modified(6 BE)`.

use alloc::vec::Vec;

use crate::envelope::{self, TAG_DIR_NODE};
use crate::error::CodecError;
use crate::records::common::{read_hash, read_timestamp, write_timestamp, Hash, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    pub smt_root: Hash,
    /// `None` means inherit the parent's group.
    pub group_id: Option<Hash>,
    pub created: Timestamp,
    pub modified: Timestamp,
}

fn encode_payload(node: &DirNode) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&node.smt_root);
    match node.group_id {
        Some(id) => {
            out.push(0x01);
            out.extend_from_slice(&id);
        }
        None => out.push(0x00),
    }
    write_timestamp(&mut out, node.created);
    write_timestamp(&mut out, node.modified);
    out
}

fn decode_payload(data: &[u8]) -> Result<DirNode, CodecError> {
    let (smt_root, data) = read_hash(data)?;
    let has_group = *data.first().ok_or(CodecError::Truncated)?;
    let data = &data[1..];
    let (group_id, data) = match has_group {
        0x00 => (None, data),
        0x01 => {
            let (id, rest) = read_hash(data)?;
            (Some(id), rest)
        }
        _ => return Err(CodecError::Malformed),
    };
    let (created, data) = read_timestamp(data)?;
    let (modified, _data) = read_timestamp(data)?;

    Ok(DirNode { smt_root, group_id, created, modified })
}

/// Encodes `node` as an envelope-wrapped directory-node record.
pub fn encode_dir_node(node: &DirNode) -> Vec<u8> {
    envelope::write_envelope(TAG_DIR_NODE, &encode_payload(node))
}

/// Decodes an envelope-wrapped directory-node record, failing if the tag doesn't match.
pub fn decode_dir_node(bytes: &[u8]) -> Result<DirNode, CodecError> {
    let payload = envelope::read_envelope_tagged(bytes, TAG_DIR_NODE)?;
    decode_payload(payload)
}
