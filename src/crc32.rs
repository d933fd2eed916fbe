//! CRC-32 (IEEE 802.3), delegated to `crc32fast`.
//! Polynomial 0xEDB88320 (reflected), initial value 0xFFFFFFFF, final XOR 0xFFFFFFFF.
//! This is the framing checksum under the envelope (`crate::envelope`); it is not
//! a security mechanism.

/// Computes the CRC-32 (IEEE 802.3) of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_check_string() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn trailer_bytes_big_endian() {
        let crc = crc32(b"123456789");
        assert_eq!(crc.to_be_bytes(), [0xCB, 0xF4, 0x39, 0x26]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(crc32(b""), 0);
    }
}
