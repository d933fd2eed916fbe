//! Group codec.
//!
//! Payload: `id(32) ‖ member_count(varint) ‖ members`, each member:
//! `pubkey(32) ‖ dek_len(varint) ‖ encrypted_dek(dek_len bytes) ‖ role(1 byte)`.

use alloc::vec::Vec;

use crate::envelope::{self, TAG_GROUP};
use crate::error::CodecError;
use crate::records::common::{read_hash, Hash, Role};
use crate::varint::{decode_varint, write_varint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub pubkey: Hash,
    pub encrypted_dek: Vec<u8>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: Hash,
    pub members: Vec<GroupMember>,
}

fn encode_payload(group: &Group) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&group.id);
    write_varint(&mut out, group.members.len() as u64);
    for member in &group.members {
        out.extend_from_slice(&member.pubkey);
        write_varint(&mut out, member.encrypted_dek.len() as u64);
        out.extend_from_slice(&member.encrypted_dek);
        out.push(member.role.to_byte());
    }
    out
}

fn decode_payload(data: &[u8]) -> Result<Group, CodecError> {
    let (id, mut data) = read_hash(data)?;
    let (member_count, used) = decode_varint(data, 0)?;
    data = &data[used..];

    let mut members = Vec::with_capacity(member_count as usize);
    for _ in 0..member_count {
        let (pubkey, rest) = read_hash(data)?;
        data = rest;
        let (dek_len, used) = decode_varint(data, 0)?;
        data = &data[used..];
        let dek_len = dek_len as usize;
        if data.len() < dek_len {
            return Err(CodecError::Truncated);
        }
        let encrypted_dek = data[..dek_len].to_vec();
        data = &data[dek_len..];
        let role_byte = *data.first().ok_or(CodecError::Truncated)?;
        data = &data[1..];
        let role = Role::from_byte(role_byte)?;
        members.push(GroupMember { pubkey, encrypted_dek, role });
    }

    Ok(Group { id, members })
}

/// Encodes `group` as an envelope-wrapped group record.
pub fn encode_group(group: &Group) -> Vec<u8> {
    envelope::write_envelope(TAG_GROUP, &encode_payload(group))
}

/// Decodes an envelope-wrapped group record, failing if the tag doesn't match.
pub fn decode_group(bytes: &[u8]) -> Result<Group, CodecError> {
    let payload = envelope::read_envelope_tagged(bytes, TAG_GROUP)?;
    decode_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Group {
        Group {
            id: [3u8; 32],
            members: alloc::vec![
                GroupMember { pubkey: [1u8; 32], encrypted_dek: alloc::vec![0xAA; 48], role: Role::Admin },
                GroupMember { pubkey: [2u8; 32], encrypted_dek: alloc::vec![0xBB; 32], role: Role::Read },
            ],
        }
    }

    #[test]
    fn round_trip_preserves_member_order() {
        let group = sample();
        let wire = encode_group(&group);
        let decoded = decode_group(&wire).unwrap();
        assert_eq!(decoded, group);
    }

    #[test]
    fn zero_members_round_trips() {
        let group = Group { id: [0u8; 32], members: Vec::new() };
        let wire = encode_group(&group);
        assert_eq!(decode_group(&wire).unwrap(), group);
    }

    #[test]
    fn bad_role_byte_is_malformed() {
        let group = Group {
            id: [0u8; 32],
            members: alloc::vec![GroupMember { pubkey: [0u8; 32], encrypted_dek: Vec::new(), role: Role::Read }],
        };
        let mut payload = encode_payload(&group);
        *payload.last_mut().unwrap() = 0x09;
        let wire = envelope::write_envelope(TAG_GROUP, &payload);
        assert_eq!(decode_group(&wire), Err(CodecError::Malformed));
    }

    #[test]
    fn truncated_dek_fails() {
        let group = sample();
        let wire = encode_group(&group);
        let truncated = &wire[..wire.len() - 20];
        assert!(decode_group(truncated).is_err());
    }
}
