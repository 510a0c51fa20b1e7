use crate::{Format, ObjectId, Value};

/// Rejected codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("source address {0} is out of range (1..=99)")]
    SourceOutOfRange(u32),

    #[error("destination address {0} is out of range")]
    DestinationOutOfRange(u32),
}

/// A value that cannot be represented in the requested wire format.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("value {value} is out of range for format {format}")]
    OutOfRange { format: Format, value: Value },

    #[error("value {value} has more than one bit set, which format {format} does not allow")]
    MultipleBitsSet { format: Format, value: i64 },

    #[error("value {value} has the wrong type for format {format}")]
    TypeMismatch { format: Format, value: Value },
}

/// Bytes that do not hold a valid value of the requested wire format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("format {format} needs {expected} bytes, got {actual}")]
    Length {
        format: Format,
        expected: usize,
        actual: usize,
    },

    #[error("raw value {raw:#x} is not valid for format {format}")]
    InvalidValue { format: Format, raw: u32 },
}

/// Framing faults found while validating an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("malformed frame: missing start byte 0xAA")]
    Malformed,

    #[error("incomplete frame")]
    Incomplete,

    #[error("header checksum mismatch: expected {expected:02X?}, got {actual:02X?}")]
    HeaderChecksum { expected: [u8; 2], actual: [u8; 2] },

    #[error("data checksum mismatch: expected {expected:02X?}, got {actual:02X?}")]
    DataChecksum { expected: [u8; 2], actual: [u8; 2] },

    #[error("not a response frame")]
    NotAResponse,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("unknown object id {0}")]
    UnknownObject(ObjectId),

    #[error("format {0} is not supported")]
    UnsupportedFormat(u8),
}
