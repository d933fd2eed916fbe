//! Blob compression pipeline: content-type sniffing, method negotiation, and
//! the envelope-wrapped compressed-blob record (tag `0x10`).

use alloc::vec::Vec;

use crate::compress::dictionary::Dictionary;
use crate::envelope::{self, TAG_COMPRESSED_BLOB};
use crate::error::CodecError;
use crate::varint::{decode_varint, write_varint};

pub const METHOD_NONE: u8 = 0x00;
pub const METHOD_EXTERNAL: u8 = 0x01;
pub const METHOD_DICTIONARY: u8 = 0x02;
pub const METHOD_DICTIONARY_EXTERNAL: u8 = 0x03;

pub const CONTENT_JSON: u8 = 0x00;
pub const CONTENT_TEXT: u8 = 0x01;
pub const CONTENT_BINARY: u8 = 0x02;

/// Injected collaborators for the pipeline. Both closures return `None` on
/// failure rather than panicking; a failing `fallback_compress` is swallowed
/// during negotiation, a failing `fallback_decompress` surfaces as an error.
#[derive(Default)]
pub struct PipelineOptions<'a> {
    pub dictionary: Option<&'a Dictionary>,
    pub fallback_compress: Option<&'a dyn Fn(&[u8]) -> Option<Vec<u8>>>,
    pub fallback_decompress: Option<&'a dyn Fn(&[u8], usize) -> Option<Vec<u8>>>,
}

/// Classifies `data` for the content-type byte persisted alongside the
/// compressed payload. Purely advisory: it never affects decompression.
pub fn sniff_content_type(data: &[u8]) -> u8 {
    if data.is_empty() {
        return CONTENT_BINARY;
    }
    let head = &data[..data.len().min(64)];
    if (data[0] == b'{' || data[0] == b'[') && !head.contains(&0x00) {
        return CONTENT_JSON;
    }

    let sample = &data[..data.len().min(512)];
    if !sample.contains(&0x00) {
        let printable = sample
            .iter()
            .filter(|&&b| (0x20..=0x7E).contains(&b) || b == 0x09 || b == 0x0A || b == 0x0D || b >= 0x80)
            .count();
        if printable * 100 > sample.len() * 90 {
            return CONTENT_TEXT;
        }
    }
    CONTENT_BINARY
}

/// Negotiates the smallest representation of `data` across the four
/// methods and wraps the result in a `CompressedBlob` envelope.
pub fn compress_blob(data: &[u8], options: &PipelineOptions) -> Vec<u8> {
    let content_type = sniff_content_type(data);

    let mut best_payload: Vec<u8> = data.to_vec();
    let mut best_method = METHOD_NONE;
    let mut dictionary_output: Option<Vec<u8>> = None;

    if let Some(dict) = options.dictionary {
        if content_type == CONTENT_JSON || content_type == CONTENT_TEXT {
            if let Ok(compressed) = dict.compress(data) {
                if compressed.len() < best_payload.len() {
                    best_payload = compressed.clone();
                    best_method = METHOD_DICTIONARY;
                }
                dictionary_output = Some(compressed);
            }
        }
    }

    if let Some(fallback) = options.fallback_compress {
        if let Some(compressed) = fallback(data) {
            if compressed.len() < best_payload.len() {
                best_payload = compressed;
                best_method = METHOD_EXTERNAL;
            }
        }
        if let Some(dict_out) = &dictionary_output {
            if let Some(compressed) = fallback(dict_out) {
                if compressed.len() < best_payload.len() {
                    best_payload = compressed;
                    best_method = METHOD_DICTIONARY_EXTERNAL;
                }
            }
        }
    }

    if best_payload.len() >= data.len() {
        best_payload = data.to_vec();
        best_method = METHOD_NONE;
    }

    let mut payload = Vec::with_capacity(best_payload.len() + 12);
    payload.push(best_method);
    payload.push(content_type);
    write_varint(&mut payload, data.len() as u64);
    write_varint(&mut payload, best_payload.len() as u64);
    payload.extend_from_slice(&best_payload);

    envelope::write_envelope(TAG_COMPRESSED_BLOB, &payload)
}

/// Reverses `compress_blob`. Fails with `MissingCollaborator` if the method
/// recorded on the wire needs a dictionary or external decompressor that
/// wasn't supplied.
pub fn decompress_blob(bytes: &[u8], options: &PipelineOptions) -> Result<Vec<u8>, CodecError> {
    let payload = envelope::read_envelope_tagged(bytes, TAG_COMPRESSED_BLOB)?;
    let method = *payload.first().ok_or(CodecError::Truncated)?;
    let _content_type = *payload.get(1).ok_or(CodecError::Truncated)?;

    let (original_size, used) = decode_varint(payload, 2)?;
    let mut offset = 2 + used;
    let (compressed_len, used) = decode_varint(payload, offset)?;
    offset += used;
    let compressed_len = compressed_len as usize;

    if payload.len() < offset + compressed_len {
        return Err(CodecError::Truncated);
    }
    let data = &payload[offset..offset + compressed_len];

    let result = match method {
        METHOD_NONE => data.to_vec(),
        METHOD_EXTERNAL => {
            let f = options.fallback_decompress.ok_or(CodecError::MissingCollaborator)?;
            f(data, original_size as usize).ok_or(CodecError::Malformed)?
        }
        METHOD_DICTIONARY => {
            let dict = options.dictionary.ok_or(CodecError::MissingCollaborator)?;
            dict.decompress(data, original_size as usize)?
        }
        METHOD_DICTIONARY_EXTERNAL => {
            let f = options.fallback_decompress.ok_or(CodecError::MissingCollaborator)?;
            let dict = options.dictionary.ok_or(CodecError::MissingCollaborator)?;
            // The reference passes 0 as the intermediate size: the external
            // decompressor must recover its own output length.
            let intermediate = f(data, 0).ok_or(CodecError::Malformed)?;
            dict.decompress(&intermediate, original_size as usize)?
        }
        other => return Err(CodecError::BadMethod(other)),
    };

    if result.len() as u64 != original_size {
        return Err(CodecError::LengthMismatch);
    }
    Ok(result)
}
