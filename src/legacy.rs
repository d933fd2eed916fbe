//! Backward-compatibility decoding for the pre-existing textual node
//! representation. This module is read-only: encoders never emit this shape,
//! and it exists purely so `decode_node` can still ingest data written by the
//! system this codec replaces.
//!
//! The legacy form encodes byte arrays as `{ "__uint8array": [..numbers..] }`
//! or, equivalently, as a plain hex string. Everything else is ordinary JSON.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::Value;

use crate::error::CodecError;
use crate::node::Node;
use crate::records::{ChunkRef, DirNode, FileNode};

/// Parses a legacy textual node. Detection of "is this legacy" happens in
/// `crate::node::decode_node`; this function assumes it already is.
pub fn decode_legacy_node(bytes: &[u8]) -> Result<Node, CodecError> {
    let text = core::str::from_utf8(bytes).map_err(|_| CodecError::Malformed)?;
    let value: Value = serde_json::from_str(text).map_err(|_| CodecError::Malformed)?;
    let node_type = value.get("type").and_then(Value::as_str).ok_or(CodecError::Malformed)?;
    match node_type {
        "file" => Ok(Node::File(decode_legacy_file(&value)?)),
        "dir" => Ok(Node::Dir(decode_legacy_dir(&value)?)),
        _ => Err(CodecError::Malformed),
    }
}

fn decode_legacy_file(value: &Value) -> Result<FileNode, CodecError> {
    let content_hash = bytes_field(value, "content_hash")?;
    let content_hash = to_hash(&content_hash)?;
    let size = u64_field(value, "size")?;
    let created = u64_field(value, "created")?;
    let modified = u64_field(value, "modified")?;

    let chunks_value = value.get("chunks").and_then(Value::as_array).ok_or(CodecError::Malformed)?;
    let mut chunks = Vec::with_capacity(chunks_value.len());
    for chunk in chunks_value {
        let index = u64_field(chunk, "index")?;
        let hash = to_hash(&bytes_field(chunk, "hash")?)?;
        let blob_address = to_hash(&bytes_field(chunk, "blob_address")?)?;
        let nonce = to_nonce(&bytes_field(chunk, "nonce")?)?;
        chunks.push(ChunkRef { index, hash, blob_address, nonce });
    }

    Ok(FileNode { content_hash, size, created, modified, chunks })
}

fn decode_legacy_dir(value: &Value) -> Result<DirNode, CodecError> {
    let smt_root = to_hash(&bytes_field(value, "smt_root")?)?;
    let group_id = match value.get("group_id") {
        None | Some(Value::Null) => None,
        Some(v) => Some(to_hash(&decode_bytes_value(v)?)?),
    };
    let created = u64_field(value, "created")?;
    let modified = u64_field(value, "modified")?;
    Ok(DirNode { smt_root, group_id, created, modified })
}

fn u64_field(value: &Value, key: &str) -> Result<u64, CodecError> {
    value.get(key).and_then(Value::as_u64).ok_or(CodecError::Malformed)
}

fn bytes_field(value: &Value, key: &str) -> Result<Vec<u8>, CodecError> {
    let field = value.get(key).ok_or(CodecError::Malformed)?;
    decode_bytes_value(field)
}

fn decode_bytes_value(value: &Value) -> Result<Vec<u8>, CodecError> {
    match value {
        Value::String(hex) => decode_hex(hex),
        Value::Object(map) => {
            let arr = map.get("__uint8array").and_then(Value::as_array).ok_or(CodecError::Malformed)?;
            let mut out = Vec::with_capacity(arr.len());
            for n in arr {
                let byte = n.as_u64().ok_or(CodecError::Malformed)?;
                if byte > 0xFF {
                    return Err(CodecError::Malformed);
                }
                out.push(byte as u8);
            }
            Ok(out)
        }
        _ => Err(CodecError::Malformed),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    if s.len() % 2 != 0 {
        return Err(CodecError::Malformed);
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for pair in bytes.chunks(2) {
        let hi = hex_digit(pair[0])?;
        let lo = hex_digit(pair[1])?;
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

fn hex_digit(c: u8) -> Result<u8, CodecError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(CodecError::Malformed),
    }
}

fn to_hash(bytes: &[u8]) -> Result<[u8; 32], CodecError> {
    bytes.try_into().map_err(|_| CodecError::Malformed)
}

fn to_nonce(bytes: &[u8]) -> Result<[u8; 24], CodecError> {
    bytes.try_into().map_err(|_| CodecError::Malformed)
}

/// Renders a byte string the way the legacy system expects it (used only by
/// tests, to build legacy fixtures without depending on an external JS runtime).
#[cfg(test)]
fn to_legacy_uint8array(bytes: &[u8]) -> String {
    let nums: Vec<String> = bytes.iter().map(|b| format!("{}", b)).collect();
    format!("{{\"__uint8array\":[{}]}}", nums.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_legacy_file_node_size_100() {
        let json = format!(
            r#"{{"type":"file","content_hash":{},"size":100,"created":0,"modified":0,"chunks":[]}}"#,
            to_legacy_uint8array(&[0u8; 32])
        );
        let node = decode_legacy_node(json.as_bytes()).unwrap();
        match node {
            Node::File(f) => assert_eq!(f.size, 100),
            Node::Dir(_) => panic!("expected file node"),
        }
    }

    #[test]
    fn legacy_file_node_with_hex_strings() {
        let hash_hex = "ab".repeat(32);
        let json = format!(
            r#"{{"type":"file","content_hash":"{}","size":1,"created":0,"modified":0,"chunks":[]}}"#,
            hash_hex
        );
        let node = decode_legacy_node(json.as_bytes()).unwrap();
        match node {
            Node::File(f) => assert_eq!(f.content_hash, [0xab; 32]),
            Node::Dir(_) => panic!("expected file node"),
        }
    }

    #[test]
    fn legacy_dir_node_inherits_when_group_absent() {
        let json = format!(
            r#"{{"type":"dir","smt_root":{},"created":5,"modified":5}}"#,
            to_legacy_uint8array(&[0u8; 32])
        );
        let node = decode_legacy_node(json.as_bytes()).unwrap();
        match node {
            Node::Dir(d) => assert!(d.group_id.is_none()),
            Node::File(_) => panic!("expected dir node"),
        }
    }

    #[test]
    fn unknown_type_is_malformed() {
        let json = r#"{"type":"symlink"}"#;
        assert_eq!(decode_legacy_node(json.as_bytes()), Err(CodecError::Malformed));
    }

    #[test]
    fn not_json_is_malformed() {
        assert_eq!(decode_legacy_node(b"not json at all"), Err(CodecError::Malformed));
    }
}
