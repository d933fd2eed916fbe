//! Envelope framing shared by every top-level record kind.
//!
//! ```text
//! offset 0 : 0x5A 0x4B      (magic "ZK")
//! offset 2 : 0x01           (version)
//! offset 3 : type tag
//! offset 4 : payload bytes
//! trailer  : CRC-32 of bytes [0 .. trailer) big-endian, 4 bytes
//! ```

use alloc::vec::Vec;
use byteorder::{BigEndian, ByteOrder};

use crate::crc32;
use crate::error::CodecError;

pub const MAGIC: [u8; 2] = [0x5A, 0x4B];
pub const CURRENT_VERSION: u8 = 0x01;
pub const HEADER_LEN: usize = 4;
pub const TRAILER_LEN: usize = 4;

pub const TAG_FILE_NODE: u8 = 0x01;
pub const TAG_DIR_NODE: u8 = 0x02;
pub const TAG_GROUP: u8 = 0x03;
pub const TAG_SMT: u8 = 0x04;
pub const TAG_COMPRESSED_BLOB: u8 = 0x10;

/// A successfully parsed envelope: the tag byte and a borrow over the payload
/// bytes (header and trailer excluded).
pub struct Envelope<'a> {
    pub tag: u8,
    pub payload: &'a [u8],
}

/// `true` iff `bytes` starts with the envelope magic `0x5A 0x4B`.
pub fn has_magic(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == MAGIC[0] && bytes[1] == MAGIC[1]
}

/// Wraps `payload` with the given tag into a single contiguous buffer:
/// header + payload + CRC-32 trailer.
pub fn write_envelope(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + TRAILER_LEN);
    out.extend_from_slice(&MAGIC);
    out.push(CURRENT_VERSION);
    out.push(tag);
    out.extend_from_slice(payload);
    let crc = crc32::crc32(&out);
    let mut trailer = [0u8; TRAILER_LEN];
    BigEndian::write_u32(&mut trailer, crc);
    out.extend_from_slice(&trailer);
    out
}

/// Parses an envelope from `bytes`, validating magic, version, and CRC.
/// Exposes the tag byte and a borrow over the payload (header/trailer excluded).
pub fn read_envelope(bytes: &[u8]) -> Result<Envelope<'_>, CodecError> {
    if bytes.len() < HEADER_LEN + TRAILER_LEN {
        return Err(CodecError::TooShort);
    }
    if bytes[0] != MAGIC[0] || bytes[1] != MAGIC[1] {
        return Err(CodecError::BadMagic);
    }
    if bytes[2] != CURRENT_VERSION {
        return Err(CodecError::BadVersion(bytes[2]));
    }
    let tag = bytes[3];

    let body_len = bytes.len() - TRAILER_LEN;
    let (body, trailer) = bytes.split_at(body_len);
    let expected = BigEndian::read_u32(trailer);
    let found = crc32::crc32(body);
    if expected != found {
        return Err(CodecError::BadCrc { expected, found });
    }

    let payload = &bytes[HEADER_LEN..body_len];
    Ok(Envelope { tag, payload })
}

/// Like `read_envelope`, but also requires the tag to equal `expected_tag`.
pub fn read_envelope_tagged(bytes: &[u8], expected_tag: u8) -> Result<&[u8], CodecError> {
    let env = read_envelope(bytes)?;
    if env.tag != expected_tag {
        return Err(CodecError::BadTag(env.tag));
    }
    Ok(env.payload)
}
