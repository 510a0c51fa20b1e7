use crate::ScomCodec;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use scom_protocol::{
    Format, Frame, ObjectId, ObjectType, PropertyId, Response, Scom, Value, SERVICE_READ,
    SERVICE_WRITE,
};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] scom_protocol::Error),

    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("transport closed before a response arrived")]
    Closed,
}

/// Runs one request/response exchange at a time over a framed transport.
pub struct Client<T> {
    scom: Scom,
    transport: Framed<T, ScomCodec>,
    timeout: Duration,
}

impl<T> Client<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(scom: Scom, transport: Framed<T, ScomCodec>) -> Self {
        Self {
            scom,
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn scom(&self) -> &Scom {
        &self.scom
    }

    pub fn into_inner(self) -> Framed<T, ScomCodec> {
        self.transport
    }

    /// Sends `request` and waits for the frame answering `service` on
    /// `object_id`. Leftovers of earlier exchanges are dropped.
    async fn transact(
        &mut self,
        request: Vec<u8>,
        service: u8,
        object_id: ObjectId,
    ) -> Result<Bytes, ClientError> {
        let stale = self.transport.read_buffer().len();
        if stale > 0 {
            debug!("Discarding {} stale bytes", stale);
            self.transport.read_buffer_mut().clear();
            self.transport.codec_mut().needed_bytes = 0;
        }

        debug!("Sending request {:02X?}", request);
        self.transport.send(request).await?;

        let timeout = self.timeout;
        let response = tokio::time::timeout(timeout, self.reply(service, object_id))
            .await
            .map_err(|_| ClientError::Timeout(timeout))??;

        debug!("Received response {:02X?}", response);
        Ok(response)
    }

    async fn reply(&mut self, service: u8, object_id: ObjectId) -> Result<Bytes, ClientError> {
        loop {
            let frame = self.transport.next().await.ok_or(ClientError::Closed)??;
            // malformed frames are handed on so validation can report them
            let answers = match Frame::from_bytes(&frame) {
                Ok(reply) if reply.service != service || reply.object_id != object_id => {
                    debug!(
                        "Skipping frame for object {} (service {}), waiting for {}",
                        reply.object_id, reply.service, object_id
                    );
                    false
                }
                _ => true,
            };
            if answers {
                return Ok(frame);
            }
        }
    }

    pub async fn read(&mut self, object_id: ObjectId) -> Result<Response, ClientError> {
        let request = self.scom.read_frame(object_id)?;
        let response = self.transact(request, SERVICE_READ, object_id).await?;
        Ok(self.scom.decode_response(&response)?)
    }

    pub async fn write(
        &mut self,
        object_id: ObjectId,
        value: Value,
    ) -> Result<Response, ClientError> {
        let request = self.scom.write_frame(object_id, value)?;
        let response = self.transact(request, SERVICE_WRITE, object_id).await?;
        Ok(self.scom.decode_response(&response)?)
    }

    pub async fn read_ext(
        &mut self,
        object_type: ObjectType,
        object_id: ObjectId,
        property_id: PropertyId,
        format: Format,
    ) -> Result<Response, ClientError> {
        let request = self.scom.read_frame_ext(object_type, object_id, property_id)?;
        let response = self.transact(request, SERVICE_READ, object_id).await?;
        Ok(self.scom.decode_response_ext(&response, format)?)
    }

    pub async fn write_ext(
        &mut self,
        object_type: ObjectType,
        object_id: ObjectId,
        property_id: PropertyId,
        value: Value,
        format: Format,
    ) -> Result<Response, ClientError> {
        let request = self
            .scom
            .write_frame_ext(object_type, object_id, property_id, value, format)?;
        let response = self.transact(request, SERVICE_WRITE, object_id).await?;
        Ok(self.scom.decode_response_ext(&response, format)?)
    }
}
