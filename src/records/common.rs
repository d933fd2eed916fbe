//! Fixed-width primitives shared by every record codec: 32-byte hashes,
//! 24-byte nonces, 48-bit big-endian timestamps, and the closed `Role` set.

use alloc::vec::Vec;
use byteorder::{BigEndian, ByteOrder};

use crate::error::CodecError;

pub type Hash = [u8; 32];
pub type Nonce = [u8; 24];

/// Milliseconds since epoch. Representable in 48 bits (`0 <= t < 2^48`).
pub type Timestamp = u64;

pub const TIMESTAMP_MAX: u64 = 1u64 << 48;

/// Access-control role. Closed set: read, write, admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Read,
    Write,
    Admin,
}

impl Role {
    pub const fn to_byte(self) -> u8 {
        match self {
            Role::Read => 0x00,
            Role::Write => 0x01,
            Role::Admin => 0x02,
        }
    }

    pub const fn from_byte(byte: u8) -> Result<Self, CodecError> {
        match byte {
            0x00 => Ok(Role::Read),
            0x01 => Ok(Role::Write),
            0x02 => Ok(Role::Admin),
            _ => Err(CodecError::Malformed),
        }
    }
}

/// Writes a 48-bit timestamp as 6 big-endian bytes.
/// Callers are expected to keep `t < 2^48` (the data model's invariant); values
/// outside that range are truncated to their low 48 bits on write.
pub fn write_timestamp(buf: &mut Vec<u8>, t: Timestamp) {
    let mut be = [0u8; 6];
    BigEndian::write_u48(&mut be, t % TIMESTAMP_MAX);
    buf.extend_from_slice(&be);
}

/// Reads a 48-bit big-endian timestamp from the front of `data`.
pub fn read_timestamp(data: &[u8]) -> Result<(Timestamp, &[u8]), CodecError> {
    if data.len() < 6 {
        return Err(CodecError::Truncated);
    }
    let t = BigEndian::read_u48(&data[0..6]);
    debug_assert!(t < TIMESTAMP_MAX, "6-byte big-endian read cannot exceed TIMESTAMP_MAX");
    Ok((t, &data[6..]))
}

/// Reads a fixed-size 32-byte hash from the front of `data`.
pub fn read_hash(data: &[u8]) -> Result<(Hash, &[u8]), CodecError> {
    if data.len() < 32 {
        return Err(CodecError::Truncated);
    }
    let mut h = [0u8; 32];
    h.copy_from_slice(&data[0..32]);
    Ok((h, &data[32..]))
}

/// Reads a fixed-size 24-byte nonce from the front of `data`.
pub fn read_nonce(data: &[u8]) -> Result<(Nonce, &[u8]), CodecError> {
    if data.len() < 24 {
        return Err(CodecError::Truncated);
    }
    let mut n = [0u8; 24];
    n.copy_from_slice(&data[0..24]);
    Ok((n, &data[24..]))
}
