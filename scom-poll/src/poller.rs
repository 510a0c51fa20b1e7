use color_eyre::eyre::{eyre, Result};
use scom_codec::{Client, ClientError};
use scom_protocol::{ObjectId, Response};
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTarget {
    pub object_id: ObjectId,
    pub interval: Duration,
}

impl PollTarget {
    pub fn new(object_id: ObjectId, interval: Duration) -> Self {
        Self {
            object_id,
            interval,
        }
    }
}

impl FromStr for PollTarget {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let (id, seconds) = s
            .split_once(':')
            .ok_or_else(|| eyre!("expected ID:SECONDS, got {:?}", s))?;
        let interval = Duration::try_from_secs_f64(seconds.parse()?)?;
        if interval.is_zero() {
            return Err(eyre!("poll interval of {:?} must be positive", s));
        }
        Ok(Self::new(id.parse()?, interval))
    }
}

/// Next due time per target; every target is due immediately at start.
pub struct Schedule {
    targets: Vec<PollTarget>,
    due: Vec<Instant>,
}

impl Schedule {
    pub fn new(targets: Vec<PollTarget>) -> Self {
        let now = Instant::now();
        let due = vec![now; targets.len()];
        Self { targets, due }
    }

    /// Earliest due target, the first listed one on ties.
    fn next(&self) -> Option<(usize, Instant)> {
        self.due
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|(_, due)| *due)
    }

    fn reschedule(&mut self, index: usize) {
        self.due[index] = Instant::now() + self.targets[index].interval;
    }
}

/// Waits for the next due target and reads it. Returns `None` when cancelled
/// or when the device could not be read this round.
pub async fn poll_single_op<T>(
    token: CancellationToken,
    client: &mut Client<T>,
    schedule: &mut Schedule,
) -> Result<Option<(ObjectId, Response)>>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let Some((index, due)) = schedule.next() else {
        token.cancelled().await;
        return Ok(None);
    };
    let object_id = schedule.targets[index].object_id;

    tokio::select! {
        biased;

        _ = token.cancelled() => {
            debug!("Cancellation token received, shutting down");
            return Ok(None);
        }
        _ = tokio::time::sleep_until(due) => {}
    }

    let result = client.read(object_id).await;
    schedule.reschedule(index);

    match result {
        Ok(response) => Ok(Some((object_id, response))),
        Err(err @ (ClientError::Timeout(_) | ClientError::Protocol(_))) => {
            warn!("Failed to read object {}: {}", object_id, err);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scom_codec::ScomCodec;
    use scom_protocol::{info, Frame, ObjectType, PropertyId, Scom, Value};
    use tokio_util::codec::Decoder;

    #[derive(Clone, Debug)]
    struct MockBuilder(tokio_test::io::Builder);

    impl MockBuilder {
        pub fn new() -> Self {
            MockBuilder(tokio_test::io::Builder::new())
        }

        pub fn read(&mut self, bytes: &[u8]) -> &mut Self {
            self.0.read(bytes);
            self
        }

        pub fn write(&mut self, bytes: &[u8]) -> &mut Self {
            self.0.write(bytes);
            self
        }

        pub fn build(&mut self) -> Client<tokio_test::io::Mock> {
            Client::new(Scom::default(), ScomCodec::default().framed(self.0.build()))
        }
    }

    fn request(object_id: ObjectId) -> Vec<u8> {
        Scom::default().read_frame(object_id).unwrap()
    }

    fn response(object_id: ObjectId, value: f32) -> Vec<u8> {
        Frame {
            flags: 0x00,
            source: 101,
            destination: 1,
            data_flags: 0x02,
            service: 0x01,
            object_type: ObjectType::Info.id(),
            object_id,
            property_id: PropertyId::VALUE.0,
            value: &value.to_le_bytes(),
        }
        .to_bytes()
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(
            "3011:5".parse::<PollTarget>().unwrap(),
            PollTarget::new(3011, Duration::from_secs(5))
        );
        assert_eq!(
            "3000:0.5".parse::<PollTarget>().unwrap(),
            PollTarget::new(3000, Duration::from_millis(500))
        );
        assert!("3011".parse::<PollTarget>().is_err());
        assert!("3011:0".parse::<PollTarget>().is_err());
        assert!("3011:-1".parse::<PollTarget>().is_err());
        assert!("volts:5".parse::<PollTarget>().is_err());
    }

    #[tokio::test]
    async fn test_poll_in_order() -> Result<()> {
        let mut client = MockBuilder::new()
            .write(&request(info::INPUT_VOLTAGE))
            .read(&response(info::INPUT_VOLTAGE, 230.0))
            .write(&request(info::INPUT_CURRENT))
            .read(&response(info::INPUT_CURRENT, 1.5))
            .build();
        let mut schedule = Schedule::new(vec![
            PollTarget::new(info::INPUT_VOLTAGE, Duration::from_secs(60)),
            PollTarget::new(info::INPUT_CURRENT, Duration::from_secs(60)),
        ]);

        let token = CancellationToken::new();
        assert_eq!(
            poll_single_op(token.clone(), &mut client, &mut schedule).await?,
            Some((info::INPUT_VOLTAGE, Response::Value(Value::Float(230.0))))
        );
        assert_eq!(
            poll_single_op(token.clone(), &mut client, &mut schedule).await?,
            Some((info::INPUT_CURRENT, Response::Value(Value::Float(1.5))))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_poll_survives_line_noise() -> Result<()> {
        let mut client = MockBuilder::new()
            .write(&request(info::INPUT_VOLTAGE))
            .read(b"\x00\x13")
            .read(&response(info::INPUT_VOLTAGE, 230.0))
            .build();
        let mut schedule = Schedule::new(vec![PollTarget::new(
            info::INPUT_VOLTAGE,
            Duration::from_secs(60),
        )]);

        let result = poll_single_op(CancellationToken::new(), &mut client, &mut schedule).await?;
        assert_eq!(
            result,
            Some((info::INPUT_VOLTAGE, Response::Value(Value::Float(230.0))))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_poll_ignores_late_reply() -> Result<()> {
        let mut client = MockBuilder::new()
            .write(&request(info::INPUT_CURRENT))
            .read(&response(info::INPUT_VOLTAGE, 230.0))
            .read(&response(info::INPUT_CURRENT, 1.5))
            .build();
        let mut schedule = Schedule::new(vec![PollTarget::new(
            info::INPUT_CURRENT,
            Duration::from_secs(60),
        )]);

        let result = poll_single_op(CancellationToken::new(), &mut client, &mut schedule).await?;
        assert_eq!(
            result,
            Some((info::INPUT_CURRENT, Response::Value(Value::Float(1.5))))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_object_is_skipped() -> Result<()> {
        let mut client = MockBuilder::new().build();
        let mut schedule = Schedule::new(vec![PollTarget::new(4242, Duration::from_secs(60))]);

        let result = poll_single_op(CancellationToken::new(), &mut client, &mut schedule).await?;
        assert_eq!(result, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_closed_transport_is_fatal() {
        let mut client = MockBuilder::new()
            .write(&request(info::INPUT_VOLTAGE))
            .build();
        let mut schedule = Schedule::new(vec![PollTarget::new(
            info::INPUT_VOLTAGE,
            Duration::from_secs(60),
        )]);

        let result = poll_single_op(CancellationToken::new(), &mut client, &mut schedule).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancel() -> Result<()> {
        let mut client = MockBuilder::new().build();
        let mut schedule = Schedule::new(vec![PollTarget::new(
            info::INPUT_VOLTAGE,
            Duration::from_secs(60),
        )]);
        let token = CancellationToken::new();
        token.cancel();

        let result = poll_single_op(token.clone(), &mut client, &mut schedule).await?;
        assert_eq!(result, None);

        Ok(())
    }
}
