pub mod common;
pub mod dir_node;
pub mod file_node;
pub mod group;
pub mod smt;

pub use common::{Hash, Nonce, Role, Timestamp};
pub use dir_node::{decode_dir_node, encode_dir_node, DirNode};
pub use file_node::{decode_file_node, encode_file_node, ChunkRef, FileNode};
pub use group::{decode_group, encode_group, Group, GroupMember};
pub use smt::{decode_smt, encode_smt, SMTData, SMTEntry};
