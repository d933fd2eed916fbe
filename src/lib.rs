#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

// Needed for Vec, String, and friends on targets without std.
extern crate alloc;

pub mod compress;
pub mod crc32;
pub mod envelope;
pub mod error;
pub mod node;
pub mod records;
pub mod varint;

#[cfg(feature = "legacy-json")]
pub mod legacy;

pub use compress::{compress_blob, decompress_blob, Dictionary, PipelineOptions, SymbolTree};
pub use envelope::has_magic;
pub use error::CodecError;
pub use node::{decode_node, encode_node, Node};
pub use records::{
    decode_dir_node, decode_file_node, decode_group, decode_smt, encode_dir_node, encode_file_node, encode_group,
    encode_smt, ChunkRef, DirNode, FileNode, Group, GroupMember, Role, SMTData, SMTEntry,
};
