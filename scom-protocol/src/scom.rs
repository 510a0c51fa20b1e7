use tracing::{debug, trace};

use crate::utils::calculate_checksum;
use crate::{
    directory, EncodeError, Error, Format, Frame, FrameError, FrameFlags, ObjectId, ObjectType,
    PropertyId, Response, ValidatedFrame, Value, FRAME_OVERHEAD, HEADER_LEN, SERVICE_READ,
    SERVICE_WRITE, START_BYTE,
};

/// Builds request frames and decodes response frames for one source and
/// destination address pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scom {
    source: u32,
    destination: u32,
    verify_checksums: bool,
}

impl Default for Scom {
    fn default() -> Self {
        Self {
            source: 1,
            destination: 101,
            verify_checksums: true,
        }
    }
}

fn is_valid_destination(destination: u32) -> bool {
    matches!(
        destination,
        0 | 401 | 501 | 601 | 100..=109 | 191..=193 | 300..=315 | 700..=715
    )
}

impl Scom {
    pub fn new(source: u32, destination: u32, verify_checksums: bool) -> Result<Self, Error> {
        if !(1..=99).contains(&source) {
            return Err(crate::ConfigError::SourceOutOfRange(source).into());
        }
        if !is_valid_destination(destination) {
            return Err(crate::ConfigError::DestinationOutOfRange(destination).into());
        }
        Ok(Self {
            source,
            destination,
            verify_checksums,
        })
    }

    pub fn source(&self) -> u32 {
        self.source
    }

    pub fn destination(&self) -> u32 {
        self.destination
    }

    pub fn verifies_checksums(&self) -> bool {
        self.verify_checksums
    }

    fn request(
        &self,
        service: u8,
        object_type: ObjectType,
        object_id: ObjectId,
        property_id: PropertyId,
        value: &[u8],
    ) -> Result<Vec<u8>, Error> {
        // both fields are signed on the wire
        if i32::try_from(object_id).is_err() {
            return Err(EncodeError::OutOfRange {
                format: Format::Int32,
                value: Value::Int(object_id.into()),
            }
            .into());
        }
        if i16::try_from(property_id.0).is_err() {
            return Err(EncodeError::OutOfRange {
                format: Format::ShortInt,
                value: Value::Int(property_id.0.into()),
            }
            .into());
        }

        let frame = Frame {
            flags: 0x00,
            source: self.source,
            destination: self.destination,
            data_flags: 0x00,
            service,
            object_type: object_type.id(),
            object_id,
            property_id: property_id.0,
            value,
        };
        let bytes = frame.to_bytes();
        trace!("Built request frame {:02X?}", bytes);

        Ok(bytes)
    }

    pub fn read_frame_ext(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        property_id: PropertyId,
    ) -> Result<Vec<u8>, Error> {
        self.request(SERVICE_READ, object_type, object_id, property_id, &[])
    }

    pub fn write_frame_ext(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        property_id: PropertyId,
        value: Value,
        format: Format,
    ) -> Result<Vec<u8>, Error> {
        let value = format.encode(value)?;
        self.request(SERVICE_WRITE, object_type, object_id, property_id, &value)
    }

    /// Read request for an object known to the directory.
    pub fn read_frame(&self, object_id: ObjectId) -> Result<Vec<u8>, Error> {
        let entry = directory::lookup(object_id)?;
        self.read_frame_ext(entry.object_type, object_id, entry.property_id)
    }

    /// Write request for a parameter known to the directory. Other object
    /// types are reported as unknown.
    pub fn write_frame(&self, object_id: ObjectId, value: Value) -> Result<Vec<u8>, Error> {
        let entry = directory::lookup(object_id)?;
        if entry.object_type != ObjectType::Parameter {
            debug!("Refusing to write {:?} object {}", entry.object_type, object_id);
            return Err(Error::UnknownObject(object_id));
        }
        self.write_frame_ext(
            entry.object_type,
            object_id,
            entry.property_id,
            value,
            entry.format,
        )
    }

    /// Checks framing, declared length and, when enabled, both checksums.
    pub fn validate<'a>(&self, bytes: &'a [u8]) -> Result<ValidatedFrame<'a>, FrameError> {
        match self.check(bytes) {
            Ok(()) => Ok(ValidatedFrame::new(bytes)),
            Err(err) => {
                debug!("Rejected frame {:02X?}: {}", bytes, err);
                Err(err)
            }
        }
    }

    fn check(&self, bytes: &[u8]) -> Result<(), FrameError> {
        match bytes.first() {
            Some(&START_BYTE) => {}
            Some(_) => return Err(FrameError::Malformed),
            None => return Err(FrameError::Incomplete),
        }
        if bytes.len() < HEADER_LEN {
            return Err(FrameError::Incomplete);
        }

        if self.verify_checksums {
            let expected = calculate_checksum(&bytes[1..12]);
            let actual = [bytes[12], bytes[13]];
            if expected != actual {
                return Err(FrameError::HeaderChecksum { expected, actual });
            }
        }

        let declared = i16::from_le_bytes([bytes[10], bytes[11]]);
        if i64::from(declared) + FRAME_OVERHEAD as i64 != bytes.len() as i64 {
            return Err(FrameError::Incomplete);
        }

        if self.verify_checksums {
            let split = bytes.len() - 2;
            let data = bytes.get(HEADER_LEN..split).ok_or(FrameError::Incomplete)?;
            let expected = calculate_checksum(data);
            let actual = [bytes[split], bytes[split + 1]];
            if expected != actual {
                return Err(FrameError::DataChecksum { expected, actual });
            }
        }

        match bytes.get(HEADER_LEN) {
            None => Err(FrameError::Incomplete),
            Some(0) => Err(FrameError::NotAResponse),
            Some(_) => Ok(()),
        }
    }

    /// Validates `bytes` and decodes the response with an explicit format.
    pub fn decode_response_ext(&self, bytes: &[u8], format: Format) -> Result<Response, Error> {
        let frame = self.validate(bytes)?;
        let response = frame.decode(format)?;
        trace!("Decoded response {:?}", response);
        Ok(response)
    }

    /// Validates `bytes` and decodes the response using the directory entry of
    /// the object id embedded in the frame.
    pub fn decode_response(&self, bytes: &[u8]) -> Result<Response, Error> {
        let frame = self.validate(bytes)?;
        let entry = directory::lookup(frame.object_id()?)?;
        let response = frame.decode(entry.format)?;
        trace!("Decoded response {:?} for {}", response, entry.name);
        Ok(response)
    }

    pub fn frame_flags_binary(&self, bytes: &[u8]) -> Result<String, FrameError> {
        Ok(self.validate(bytes)?.flags().to_binary())
    }

    pub fn frame_flags_text(&self, bytes: &[u8]) -> Result<[&'static str; 6], FrameError> {
        Ok(self.frame_flags(bytes)?.describe())
    }

    pub fn frame_flags(&self, bytes: &[u8]) -> Result<FrameFlags, FrameError> {
        Ok(self.validate(bytes)?.flags())
    }
}
