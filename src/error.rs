// src/error.rs

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer ended before a varint terminator, a record field, or an envelope could be read.
    Truncated,

    /// A varint would need more than 49 payload bits to decode (must encompass 2^48).
    TooLarge,

    /// The envelope was fewer than 8 bytes.
    TooShort,

    /// The envelope's first two bytes were not `0x5A 0x4B`.
    BadMagic,

    /// The envelope (or dictionary) version byte was not the one supported value.
    BadVersion(u8),

    /// The envelope's stored CRC-32 did not match the computed one.
    BadCrc { expected: u32, found: u32 },

    /// A tag-strict decoder saw an envelope tag it doesn't accept.
    BadTag(u8),

    /// A role byte, has-group byte, or other closed-set byte held an out-of-range value.
    Malformed,

    /// A prefix-code encode saw an input byte with code length 0.
    UncodedSymbol,

    /// A prefix-code decode saw a bit pattern that matches no entry in the decode table.
    BadCode,

    /// A prefix-code or pipeline decode produced a byte count different from the one expected.
    LengthMismatch,

    /// A compressed blob's method byte was not one of the four defined methods.
    BadMethod(u8),

    /// Decoding required a collaborator (external compressor/decompressor) that was not supplied.
    MissingCollaborator,
}

// Manual implementation of Display for no_std environments.
impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Truncated => write!(f, "buffer ended before the value could be fully read"),
            Self::TooLarge => write!(f, "varint exceeds the 49-bit payload limit"),
            Self::TooShort => write!(f, "envelope shorter than 8 bytes"),
            Self::BadMagic => write!(f, "envelope magic bytes did not match 'ZK'"),
            Self::BadVersion(v) => write!(f, "unsupported version byte: {}", v),
            Self::BadCrc { expected, found } => write!(
                f,
                "CRC mismatch: expected {:08x}, found {:08x}",
                expected, found
            ),
            Self::BadTag(t) => write!(f, "unexpected envelope tag: 0x{:02x}", t),
            Self::Malformed => write!(f, "field held a value outside its closed set"),
            Self::UncodedSymbol => write!(f, "input byte has no assigned code"),
            Self::BadCode => write!(f, "bit pattern does not decode to any symbol"),
            Self::LengthMismatch => {
                write!(f, "decoded byte count did not match the expected count")
            }
            Self::BadMethod(m) => write!(f, "unknown compression method: 0x{:02x}", m),
            Self::MissingCollaborator => {
                write!(f, "required external collaborator was not supplied")
            }
        }
    }
}

// Enable standard Error trait if the "std" feature is on.
#[cfg(feature = "std")]
impl std::error::Error for CodecError {}
