//! Top-level node dispatch: a file-system entry is either a `FileNode` or a
//! `DirNode`, encoded as an envelope. `decode_node` also accepts the legacy
//! textual form so stores that still hold pre-migration records keep working.

use alloc::vec::Vec;

use crate::envelope::{self, TAG_DIR_NODE, TAG_FILE_NODE};
use crate::error::CodecError;
use crate::records::{decode_dir_node, decode_file_node, encode_dir_node, encode_file_node, DirNode, FileNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(FileNode),
    Dir(DirNode),
}

/// Encodes a node in the current binary envelope form. Never produces the
/// legacy textual shape; that shape is decode-only.
pub fn encode_node(node: &Node) -> Vec<u8> {
    match node {
        Node::File(f) => encode_file_node(f),
        Node::Dir(d) => encode_dir_node(d),
    }
}

/// Decodes a node, accepting either the binary envelope form or the legacy
/// textual form. Dispatch is by magic bytes: anything that doesn't start
/// with the envelope magic is handed to the legacy textual decoder.
pub fn decode_node(bytes: &[u8]) -> Result<Node, CodecError> {
    if envelope::has_magic(bytes) {
        let env = envelope::read_envelope(bytes)?;
        return match env.tag {
            TAG_FILE_NODE => Ok(Node::File(decode_file_node(bytes)?)),
            TAG_DIR_NODE => Ok(Node::Dir(decode_dir_node(bytes)?)),
            other => Err(CodecError::BadTag(other)),
        };
    }

    decode_legacy(bytes)
}

#[cfg(feature = "legacy-json")]
fn decode_legacy(bytes: &[u8]) -> Result<Node, CodecError> {
    crate::legacy::decode_legacy_node(bytes)
}

#[cfg(not(feature = "legacy-json"))]
fn decode_legacy(_bytes: &[u8]) -> Result<Node, CodecError> {
    Err(CodecError::BadMagic)
}
