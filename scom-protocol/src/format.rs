use std::fmt;
use std::str::FromStr;

use crate::error::{DecodeError, EncodeError, Error};

/// Wire formats of a property value, each with a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Bool,
    Format,
    ShortInt,
    Enum,
    ShortEnum,
    LongEnum,
    Error,
    Int32,
    Float,
    Byte,
}

impl Format {
    pub const ALL: [Format; 10] = [
        Format::Bool,
        Format::Format,
        Format::ShortInt,
        Format::Enum,
        Format::ShortEnum,
        Format::LongEnum,
        Format::Error,
        Format::Int32,
        Format::Float,
        Format::Byte,
    ];

    /// Numeric tag used by the protocol documentation.
    pub fn id(self) -> u8 {
        match self {
            Format::Bool => 1,
            Format::Format => 2,
            Format::ShortInt => 3,
            Format::Enum => 4,
            Format::ShortEnum => 5,
            Format::LongEnum => 6,
            Format::Error => 7,
            Format::Int32 => 8,
            Format::Float => 9,
            Format::Byte => 10,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.id() == id)
    }

    /// Number of bytes a value occupies on the wire.
    pub fn width(self) -> usize {
        match self {
            Format::Bool | Format::Byte => 1,
            Format::Format
            | Format::ShortInt
            | Format::Enum
            | Format::ShortEnum
            | Format::Error => 2,
            Format::LongEnum | Format::Int32 | Format::Float => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Bool => "bool",
            Format::Format => "format",
            Format::ShortInt => "short int",
            Format::Enum => "enum",
            Format::ShortEnum => "short enum",
            Format::LongEnum => "long enum",
            Format::Error => "error",
            Format::Int32 => "int32",
            Format::Float => "float",
            Format::Byte => "byte",
        }
    }

    /// Serializes `value` least significant byte first.
    pub fn encode(self, value: Value) -> Result<Vec<u8>, EncodeError> {
        let bytes = match self {
            Format::Bool => match value {
                Value::Bool(b) => vec![b as u8],
                Value::Int(v @ 0..=1) => vec![v as u8],
                Value::Int(_) => return Err(EncodeError::OutOfRange { format: self, value }),
                Value::Float(_) => return Err(EncodeError::TypeMismatch { format: self, value }),
            },
            Format::Byte => vec![self.integer(value, 0, 0xFF)? as u8],
            Format::Format | Format::ShortInt => {
                let v = self.integer(value, i16::MIN.into(), i16::MAX.into())?;
                (v as i16).to_le_bytes().to_vec()
            }
            Format::Enum | Format::ShortEnum => {
                let v = self.single_bit(value, i16::MAX.into())?;
                (v as u16).to_le_bytes().to_vec()
            }
            Format::LongEnum => {
                let v = self.single_bit(value, i32::MAX.into())?;
                (v as u32).to_le_bytes().to_vec()
            }
            Format::Error => {
                let v = self.integer(value, 0, u16::MAX.into())?;
                (v as u16).to_le_bytes().to_vec()
            }
            Format::Int32 => {
                let v = self.integer(value, i32::MIN.into(), i32::MAX.into())?;
                (v as i32).to_le_bytes().to_vec()
            }
            Format::Float => match value {
                // the accepted range is the int32 range, not the f32 one
                Value::Float(f)
                    if (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&f64::from(f)) =>
                {
                    f.to_le_bytes().to_vec()
                }
                Value::Float(_) => return Err(EncodeError::OutOfRange { format: self, value }),
                _ => return Err(EncodeError::TypeMismatch { format: self, value }),
            },
        };
        Ok(bytes)
    }

    /// Inverse of [`Format::encode`]; `bytes` must be exactly [`Format::width`] long.
    pub fn decode(self, bytes: &[u8]) -> Result<Value, DecodeError> {
        self.check_width(bytes)?;

        let value = match self {
            Format::Bool => match bytes[0] {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                raw => return Err(self.invalid(raw.into())),
            },
            Format::Byte => Value::Int(bytes[0].into()),
            Format::Error => Value::Int(u16::from_le_bytes([bytes[0], bytes[1]]).into()),
            Format::Format | Format::ShortInt => {
                Value::Int(i16::from_le_bytes([bytes[0], bytes[1]]).into())
            }
            Format::Enum | Format::ShortEnum => {
                let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
                if raw & 0x8000 != 0 {
                    return Err(self.invalid(raw.into()));
                }
                Value::Int(raw.into())
            }
            Format::LongEnum => {
                let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                if raw & 0x8000_0000 != 0 {
                    return Err(self.invalid(raw));
                }
                Value::Int(raw.into())
            }
            Format::Int32 => {
                Value::Int(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).into())
            }
            Format::Float => {
                Value::Float(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        };
        Ok(value)
    }

    pub(crate) fn check_width(self, bytes: &[u8]) -> Result<(), DecodeError> {
        if bytes.len() != self.width() {
            return Err(DecodeError::Length {
                format: self,
                expected: self.width(),
                actual: bytes.len(),
            });
        }
        Ok(())
    }

    fn invalid(self, raw: u32) -> DecodeError {
        DecodeError::InvalidValue { format: self, raw }
    }

    fn integer(self, value: Value, min: i64, max: i64) -> Result<i64, EncodeError> {
        let v = match value {
            Value::Bool(b) => b.into(),
            Value::Int(v) => v,
            Value::Float(_) => return Err(EncodeError::TypeMismatch { format: self, value }),
        };
        if !(min..=max).contains(&v) {
            return Err(EncodeError::OutOfRange { format: self, value });
        }
        Ok(v)
    }

    fn single_bit(self, value: Value, max: i64) -> Result<i64, EncodeError> {
        let v = self.integer(value, 0, max)?;
        if v.count_ones() > 1 {
            return Err(EncodeError::MultipleBitsSet {
                format: self,
                value: v,
            });
        }
        Ok(v)
    }
}

impl TryFrom<u8> for Format {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Error> {
        Format::from_id(id).ok_or(Error::UnsupportedFormat(id))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f32),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {0:?} as a bool, integer or float value")]
pub struct ParseValueError(String);

/// Parses `true`/`false`, integers, and anything containing a `.` or
/// exponent as a float.
impl FromStr for Value {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Value::Int(v));
        }
        s.parse::<f32>()
            .map(Value::Float)
            .map_err(|_| ParseValueError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip(format: Format, value: Value) {
        let bytes = format.encode(value).unwrap();
        assert_eq!(bytes.len(), format.width(), "{} {}", format, value);
        assert_eq!(format.decode(&bytes).unwrap(), value, "{} {}", format, value);
    }

    #[test]
    fn test_float_wire_order() {
        assert_eq!(Format::Float.encode(Value::Float(12.0)).unwrap(), b"\x00\x00\x40\x41");
        assert_eq!(Format::Float.decode(b"\x00\x00\x72\x43").unwrap(), Value::Float(242.0));
    }

    #[test]
    fn test_boundaries_round_trip() {
        assert_round_trip(Format::Bool, Value::Bool(false));
        assert_round_trip(Format::Bool, Value::Bool(true));
        assert_round_trip(Format::Byte, Value::Int(0));
        assert_round_trip(Format::Byte, Value::Int(255));
        for format in [Format::Format, Format::ShortInt] {
            assert_round_trip(format, Value::Int(-32768));
            assert_round_trip(format, Value::Int(-1));
            assert_round_trip(format, Value::Int(32767));
        }
        for format in [Format::Enum, Format::ShortEnum] {
            assert_round_trip(format, Value::Int(0));
            assert_round_trip(format, Value::Int(1));
            assert_round_trip(format, Value::Int(16384));
        }
        assert_round_trip(Format::LongEnum, Value::Int(0));
        assert_round_trip(Format::LongEnum, Value::Int(1 << 30));
        assert_round_trip(Format::Error, Value::Int(0));
        assert_round_trip(Format::Error, Value::Int(65535));
        assert_round_trip(Format::Int32, Value::Int(i32::MIN.into()));
        assert_round_trip(Format::Int32, Value::Int(i32::MAX.into()));
        assert_round_trip(Format::Float, Value::Float(-48.5));
        assert_round_trip(Format::Float, Value::Float(0.1));
    }

    #[test]
    fn test_negative_wire_values() {
        assert_eq!(Format::ShortInt.encode(Value::Int(-2)).unwrap(), b"\xFE\xFF");
        assert_eq!(Format::Int32.encode(Value::Int(-2)).unwrap(), b"\xFE\xFF\xFF\xFF");
        assert_eq!(Format::Format.decode(b"\x00\x80").unwrap(), Value::Int(-32768));
    }

    #[test]
    fn test_out_of_range() {
        let cases = [
            (Format::Bool, Value::Int(2)),
            (Format::Byte, Value::Int(256)),
            (Format::Byte, Value::Int(-1)),
            (Format::ShortInt, Value::Int(32768)),
            (Format::Format, Value::Int(-32769)),
            (Format::Enum, Value::Int(32768)),
            (Format::ShortEnum, Value::Int(-1)),
            (Format::LongEnum, Value::Int(1 << 31)),
            (Format::Error, Value::Int(65536)),
            (Format::Int32, Value::Int(i64::from(i32::MAX) + 1)),
            (Format::Float, Value::Float(3.0e9)),
            (Format::Float, Value::Float(f32::NAN)),
        ];
        for (format, value) in cases {
            assert!(
                matches!(format.encode(value), Err(EncodeError::OutOfRange { .. })),
                "{} {}",
                format,
                value
            );
        }
    }

    #[test]
    fn test_enum_single_bit() {
        for format in [Format::Enum, Format::ShortEnum] {
            for bit in 0..15 {
                assert_round_trip(format, Value::Int(1 << bit));
            }
        }
        for bit in 0..31 {
            assert_round_trip(Format::LongEnum, Value::Int(1 << bit));
        }

        for format in [Format::Enum, Format::ShortEnum, Format::LongEnum] {
            for value in [3, 5, 6, 0x4001] {
                assert_eq!(
                    format.encode(Value::Int(value)),
                    Err(EncodeError::MultipleBitsSet { format, value })
                );
            }
        }
        assert!(Format::Error.encode(Value::Int(3)).is_ok());
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(
            Format::Float.encode(Value::Int(12)),
            Err(EncodeError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Format::Int32.encode(Value::Float(1.0)),
            Err(EncodeError::TypeMismatch { .. })
        ));
        assert_eq!(Format::Byte.encode(Value::Bool(true)).unwrap(), b"\x01");
    }

    #[test]
    fn test_decode_wrong_width() {
        for format in Format::ALL {
            let bytes = vec![0; format.width() + 1];
            assert_eq!(
                format.decode(&bytes),
                Err(DecodeError::Length {
                    format,
                    expected: format.width(),
                    actual: format.width() + 1,
                })
            );
            assert!(format.decode(&bytes[..format.width() - 1]).is_err());
        }
    }

    #[test]
    fn test_decode_invalid() {
        assert!(Format::Bool.decode(b"\x02").is_err());
        assert!(Format::Enum.decode(b"\x00\x80").is_err());
        assert!(Format::ShortEnum.decode(b"\xFF\xFF").is_err());
        assert!(Format::LongEnum.decode(b"\x00\x00\x00\x80").is_err());
        // enums are not checked for a single bit on the way in
        assert_eq!(Format::ShortEnum.decode(b"\x03\x00").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_format_ids() {
        for format in Format::ALL {
            assert_eq!(Format::try_from(format.id()), Ok(format));
        }
        assert_eq!(Format::try_from(0), Err(Error::UnsupportedFormat(0)));
        assert_eq!(Format::try_from(11), Err(Error::UnsupportedFormat(11)));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!("true".parse::<Value>().unwrap(), Value::Bool(true));
        assert_eq!("-12".parse::<Value>().unwrap(), Value::Int(-12));
        assert_eq!("12.5".parse::<Value>().unwrap(), Value::Float(12.5));
        assert!("twelve".parse::<Value>().is_err());
    }
}
