use std::fmt;

use crate::{
    describe_error, DecodeError, Format, FrameFlags, ObjectId, Value, RESPONSE_SUCCESS,
    VALUE_OFFSET,
};

/// Outcome reported by the device for a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    Value(Value),
    /// A write was acknowledged; the response carries no value.
    ValueSet,
    Failure(DeviceError),
}

impl Response {
    pub fn is_failure(&self) -> bool {
        matches!(self, Response::Failure(_))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Value(value) => write!(f, "{}", value),
            Response::ValueSet => f.write_str("value set"),
            Response::Failure(err) => write!(f, "{}", err),
        }
    }
}

/// Error code returned by the device in place of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceError {
    pub code: u16,
}

impl DeviceError {
    pub fn description(&self) -> &'static str {
        describe_error(self.code)
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device error {:#06x}: {}", self.code, self.description())
    }
}

impl std::error::Error for DeviceError {}

/// A frame that passed [`crate::Scom::validate`].
///
/// Holding one is the proof that framing, length and (when enabled) checksums
/// were checked, so decoding never validates twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> ValidatedFrame<'a> {
    /// Only called once every check passed; guarantees at least 15 bytes.
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn flags(&self) -> FrameFlags {
        FrameFlags(self.bytes[1])
    }

    pub fn status(&self) -> u8 {
        self.bytes[14]
    }

    pub fn object_id(&self) -> Result<ObjectId, DecodeError> {
        let bytes = self.bytes.get(18..22).unwrap_or_default();
        Format::Int32.check_width(bytes)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Value bytes taken by offset, so a short value runs into the data checksum.
    fn payload(&self, width: usize) -> &'a [u8] {
        let payload = self.bytes.get(VALUE_OFFSET..).unwrap_or_default();
        &payload[..payload.len().min(width)]
    }

    pub fn decode(&self, format: Format) -> Result<Response, DecodeError> {
        if self.status() == RESPONSE_SUCCESS {
            if self.bytes.len() == VALUE_OFFSET + 2 {
                return Ok(Response::ValueSet);
            }
            return Ok(Response::Value(format.decode(self.payload(format.width()))?));
        }

        let payload = self.payload(Format::Error.width());
        Format::Error.check_width(payload)?;
        Ok(Response::Failure(DeviceError {
            code: u16::from_le_bytes([payload[0], payload[1]]),
        }))
    }
}
