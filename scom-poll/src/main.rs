use clap::Parser;
use color_eyre::eyre::{Context, Result};
use poller::{PollTarget, Schedule};
use scom_codec::{Client, ScomCodec};
use scom_protocol::{directory, Scom};
use std::time::Duration;
use tokio::signal;
use tokio_serial::SerialPortBuilderExt;
use tokio_util::codec::Decoder;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod poller;

#[derive(Parser, Debug)]
#[command()]
struct Args {
    #[arg(long, default_value = "info")]
    log_level: Level,

    #[arg(long, value_name = "TTY", value_hint = clap::ValueHint::FilePath)]
    tty_path: String,

    #[arg(short, long, default_value_t = 115200)]
    serial_baudrate: u32,

    #[arg(long, default_value_t = 1)]
    source: u32,

    #[arg(long, default_value_t = 101)]
    destination: u32,

    /// Accept frames without checking their checksums
    #[arg(long)]
    no_checksum: bool,

    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Object to poll as `ID:SECONDS`, may be repeated
    #[arg(long = "object", value_name = "ID:SECONDS")]
    objects: Vec<PollTarget>,
}

fn default_targets() -> Vec<PollTarget> {
    vec![
        PollTarget::new(directory::info::INPUT_VOLTAGE, Duration::from_secs(5)),
        PollTarget::new(directory::info::INPUT_CURRENT, Duration::from_secs(8)),
        PollTarget::new(directory::info::INPUT_POWER, Duration::from_secs(10)),
    ]
}

fn open_serial(path: String, baudrate: u32) -> Result<tokio_serial::SerialStream> {
    let serial = tokio_serial::new(path, baudrate)
        .data_bits(tokio_serial::DataBits::Eight)
        .stop_bits(tokio_serial::StopBits::One)
        .parity(tokio_serial::Parity::Even)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()?;
    Ok(serial)
}

fn spawn_sigint_watcher(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", err);
        }
        token.cancel();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(args.log_level)
            .finish(),
    )?;

    let scom = Scom::new(args.source, args.destination, !args.no_checksum)?;
    let gateway = open_serial(args.tty_path, args.serial_baudrate)
        .with_context(|| "Failed to open gateway port")?;
    let mut client = Client::new(scom, ScomCodec::default().framed(gateway))
        .with_timeout(Duration::from_millis(args.timeout_ms));

    let targets = if args.objects.is_empty() {
        default_targets()
    } else {
        args.objects
    };
    let mut schedule = Schedule::new(targets);
    let token = CancellationToken::new();

    spawn_sigint_watcher(token.clone());

    while !token.is_cancelled() {
        if let Some((object_id, response)) =
            poller::poll_single_op(token.clone(), &mut client, &mut schedule).await?
        {
            info!("Object {}: {}", object_id, response);
        }
    }

    Ok(())
}
