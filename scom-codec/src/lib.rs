use bytes::{Buf, BufMut, Bytes, BytesMut};
use scom_protocol::{Frame, ParseError, ParseSizeNeeded, START_BYTE};
use std::io::Error;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

pub use client::{Client, ClientError, DEFAULT_TIMEOUT};

mod client;

/// Cuts complete frames out of a byte stream. Frames are yielded unvalidated;
/// checksums are left to [`scom_protocol::Scom::validate`]. Bytes that cannot
/// start a frame are dropped up to the next start byte.
#[derive(Default)]
pub struct ScomCodec {
    needed_bytes: usize,
}

impl Decoder for ScomCodec {
    type Item = Bytes;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if src.len() < self.needed_bytes {
                return Ok(None);
            }

            match Frame::try_parse(src.chunk()) {
                Ok((bytes_read, frame)) => {
                    trace!("Decoded frame {:?}", frame);

                    self.needed_bytes = 0;
                    return Ok(Some(src.split_to(bytes_read).freeze()));
                }
                Err(ParseError::Incomplete(ParseSizeNeeded::Size(additional))) => {
                    self.needed_bytes = src.len() + usize::from(additional);
                    return Ok(None);
                }
                Err(ParseError::Incomplete(_)) => return Ok(None),
                Err(err) => {
                    let skip = src
                        .iter()
                        .skip(1)
                        .position(|&b| b == START_BYTE)
                        .map_or(src.len(), |pos| pos + 1);
                    debug!("Discarding {} bytes of line noise: {}", skip, err);

                    src.advance(skip);
                    self.needed_bytes = 0;
                }
            }
        }
    }
}

impl Encoder<Vec<u8>> for ScomCodec {
    type Error = Error;

    fn encode(&mut self, item: Vec<u8>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        trace!("Encoding frame {:02X?}", item);

        dst.put_slice(&item);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &[u8] = b"\xAA\x63\x65\x00\x00\x00\x01\x00\x00\x00\x0E\x00\xD6\x4A\
                              \x02\x01\x01\x00\xC3\x0B\x00\x00\x01\x00\x00\x00\x72\x43\x87\x55";

    #[test]
    fn test_decode_in_pieces() -> Result<(), Error> {
        let mut codec = ScomCodec::default();
        let mut buf = BytesMut::new();

        buf.extend_from_slice(&RESPONSE[..5]);
        assert_eq!(codec.decode(&mut buf)?, None);
        buf.extend_from_slice(&RESPONSE[5..20]);
        assert_eq!(codec.decode(&mut buf)?, None);
        assert_eq!(codec.needed_bytes, RESPONSE.len());
        buf.extend_from_slice(&RESPONSE[20..29]);
        assert_eq!(codec.decode(&mut buf)?, None);
        buf.extend_from_slice(&RESPONSE[29..]);
        assert_eq!(codec.decode(&mut buf)?, Some(Bytes::from_static(RESPONSE)));
        assert!(buf.is_empty());

        Ok(())
    }

    #[test]
    fn test_decode_back_to_back() -> Result<(), Error> {
        let mut codec = ScomCodec::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(RESPONSE);
        buf.extend_from_slice(RESPONSE);

        assert_eq!(codec.decode(&mut buf)?, Some(Bytes::from_static(RESPONSE)));
        assert_eq!(codec.decode(&mut buf)?, Some(Bytes::from_static(RESPONSE)));
        assert_eq!(codec.decode(&mut buf)?, None);

        Ok(())
    }

    #[test]
    fn test_decode_garbage() -> Result<(), Error> {
        let mut codec = ScomCodec::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"\x55\x00\x01\x00\x00\x00\x65\x00\x00\x00\x0A\x00\x6F\x71");

        assert_eq!(codec.decode(&mut buf)?, None);
        assert!(buf.is_empty());

        Ok(())
    }

    #[test]
    fn test_decode_resyncs_on_start_byte() -> Result<(), Error> {
        let mut codec = ScomCodec::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"\x00\x13");
        assert_eq!(codec.decode(&mut buf)?, None);
        assert!(buf.is_empty());

        // a start byte whose declared length is too short is noise as well
        buf.extend_from_slice(b"\x00\xAA\x00\x01\x00\x00\x00\x65\x00\x00\x00\x02\x00");
        buf.extend_from_slice(RESPONSE);
        assert_eq!(codec.decode(&mut buf)?, Some(Bytes::from_static(RESPONSE)));
        assert!(buf.is_empty());

        Ok(())
    }

    #[test]
    fn test_decode_noise_then_partial_frame() -> Result<(), Error> {
        let mut codec = ScomCodec::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"\xFF\xFF");
        buf.extend_from_slice(&RESPONSE[..20]);

        assert_eq!(codec.decode(&mut buf)?, None);
        assert_eq!(buf.len(), 20);
        buf.extend_from_slice(&RESPONSE[20..]);
        assert_eq!(codec.decode(&mut buf)?, Some(Bytes::from_static(RESPONSE)));

        Ok(())
    }

    #[test]
    fn test_encode() -> Result<(), Error> {
        let mut codec = ScomCodec::default();
        let mut buf = BytesMut::new();
        codec.encode(RESPONSE.to_vec(), &mut buf)?;
        assert_eq!(&buf[..], RESPONSE);
        Ok(())
    }
}
