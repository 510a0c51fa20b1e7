//! Frame codec for the Studer SCOM protocol spoken through an Xcom-232i gateway.

use crate::utils::calculate_checksum;

pub const START_BYTE: u8 = 0xAA;
pub const HEADER_LEN: usize = 14;
/// Bytes of a frame not covered by its declared data length.
pub const FRAME_OVERHEAD: usize = 16;
/// Data section length of a frame without a property value.
pub const DATA_LEN_WITHOUT_VALUE: usize = 10;
/// Offset of the property value within a frame.
pub const VALUE_OFFSET: usize = HEADER_LEN + DATA_LEN_WITHOUT_VALUE;

pub const SERVICE_READ: u8 = 1;
pub const SERVICE_WRITE: u8 = 2;
/// Response status signalling success; anything else carries an error code.
pub const RESPONSE_SUCCESS: u8 = 2;

/// Structural view of a frame, without checksums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    pub flags: u8,
    pub source: u32,
    pub destination: u32,
    pub data_flags: u8,
    pub service: u8,
    pub object_type: u16,
    pub object_id: u32,
    pub property_id: u16,
    pub value: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, ParseError<'a>> {
        let (_, frame) = parser::parse_frame(bytes)?;
        Ok(frame)
    }

    /// Parses a frame from the start of `bytes`, returning how many bytes it took.
    pub fn try_parse(bytes: &'a [u8]) -> Result<(usize, Self), ParseError<'a>> {
        let (rest, frame) = parser::parse_frame(bytes)?;
        Ok((bytes.len() - rest.len(), frame))
    }

    pub fn data_len(&self) -> usize {
        DATA_LEN_WITHOUT_VALUE + self.value.len()
    }

    pub fn encoded_size(&self) -> usize {
        self.data_len() + FRAME_OVERHEAD
    }

    /// Serializes the frame, computing both checksums.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_size());

        bytes.push(START_BYTE);
        bytes.push(self.flags);
        bytes.extend_from_slice(&self.source.to_le_bytes());
        bytes.extend_from_slice(&self.destination.to_le_bytes());
        bytes.extend_from_slice(&(self.data_len() as u16).to_le_bytes());
        let header_checksum = calculate_checksum(&bytes[1..]);
        bytes.extend_from_slice(&header_checksum);

        bytes.push(self.data_flags);
        bytes.push(self.service);
        bytes.extend_from_slice(&self.object_type.to_le_bytes());
        bytes.extend_from_slice(&self.object_id.to_le_bytes());
        bytes.extend_from_slice(&self.property_id.to_le_bytes());
        bytes.extend_from_slice(self.value);
        let data_checksum = calculate_checksum(&bytes[HEADER_LEN..]);
        bytes.extend_from_slice(&data_checksum);

        bytes
    }
}

impl<'a> TryFrom<&'a [u8]> for Frame<'a> {
    type Error = ParseError<'a>;

    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        Frame::from_bytes(bytes)
    }
}

pub use directory::{info, param, ObjectEntry, ObjectId, ObjectType, PropertyId};
pub use error::{ConfigError, DecodeError, EncodeError, Error, FrameError};
pub use error_code::{describe_error, UNKNOWN_ERROR_CODE};
pub use flags::FrameFlags;
pub use format::{Format, ParseValueError, Value};
pub use nom::Needed as ParseSizeNeeded;
pub use parser::ParseError;
pub use response::{DeviceError, Response, ValidatedFrame};
pub use scom::Scom;
pub use utils::calculate_checksum as checksum;

pub mod directory;
mod error;
pub mod error_code;
mod flags;
mod format;
mod parser;
mod response;
mod scom;
mod utils;
