use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Context, Result};
use scom_codec::{Client, ScomCodec};
use scom_protocol::{
    directory, error_code, Format, ObjectId, ObjectType, PropertyId, Response, Scom, Value,
};
use std::time::Duration;
use tokio_serial::SerialPortBuilderExt;
use tokio_util::codec::Decoder;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command()]
struct Args {
    #[arg(long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct LinkArgs {
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
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read an object listed by `list`
    Read {
        #[command(flatten)]
        link: LinkArgs,
        object_id: ObjectId,
    },
    /// Write a parameter listed by `list`
    Write {
        #[command(flatten)]
        link: LinkArgs,
        object_id: ObjectId,
        value: Value,
    },
    /// Read any object, naming its type, property and format
    ReadExt {
        #[command(flatten)]
        link: LinkArgs,
        #[arg(long, default_value_t = 1)]
        object_type: u16,
        #[arg(long, default_value_t = 1)]
        property_id: u16,
        #[arg(long, default_value_t = 9)]
        format: u8,
        object_id: ObjectId,
    },
    /// Decode a hex encoded response frame
    Decode {
        #[arg(long)]
        no_checksum: bool,
        /// Decode with this format instead of looking the object up
        #[arg(long)]
        format: Option<u8>,
        hex: String,
    },
    /// List the objects known to `read` and `write`
    List,
    /// List the error codes a device may answer with
    Errors,
}

fn open_serial(path: String, baudrate: u32) -> Result<tokio_serial::SerialStream> {
    debug!("Opening serial port {} (baudrate={})", path, baudrate);

    let serial = tokio_serial::new(path, baudrate)
        .data_bits(tokio_serial::DataBits::Eight)
        .stop_bits(tokio_serial::StopBits::One)
        .parity(tokio_serial::Parity::Even)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()?;
    Ok(serial)
}

fn connect(link: LinkArgs) -> Result<Client<tokio_serial::SerialStream>> {
    let scom = Scom::new(link.source, link.destination, !link.no_checksum)?;
    let serial = open_serial(link.tty_path, link.serial_baudrate)
        .with_context(|| "Failed to open gateway port")?;

    Ok(Client::new(scom, ScomCodec::default().framed(serial))
        .with_timeout(Duration::from_millis(link.timeout_ms)))
}

fn parse_hex(hex: &str) -> Result<Vec<u8>> {
    let digits: String = hex
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if !digits.is_ascii() {
        return Err(eyre!("invalid hex string {:?}", hex));
    }
    if digits.len() % 2 != 0 {
        return Err(eyre!("odd number of hex digits"));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte {:?}", &digits[i..i + 2]))
        })
        .collect()
}

fn report(object_id: ObjectId, response: Response) {
    match response {
        Response::Failure(err) => warn!("Object {}: {}", object_id, err),
        _ => info!("Object {}: {}", object_id, response),
    }
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

    match args.command {
        Command::Read { link, object_id } => {
            let mut client = connect(link)?;
            report(object_id, client.read(object_id).await?);
        }
        Command::Write {
            link,
            object_id,
            value,
        } => {
            let mut client = connect(link)?;
            report(object_id, client.write(object_id, value).await?);
        }
        Command::ReadExt {
            link,
            object_type,
            property_id,
            format,
            object_id,
        } => {
            let object_type = ObjectType::from_id(object_type)
                .ok_or_else(|| eyre!("unknown object type {}", object_type))?;
            let format = Format::try_from(format)?;
            let mut client = connect(link)?;
            let response = client
                .read_ext(object_type, object_id, PropertyId(property_id), format)
                .await?;
            report(object_id, response);
        }
        Command::Decode {
            no_checksum,
            format,
            hex,
        } => {
            let bytes = parse_hex(&hex)?;
            let scom = Scom::new(1, 101, !no_checksum)?;
            let frame = scom.validate(&bytes)?;
            let response = match format {
                Some(format) => frame.decode(Format::try_from(format)?)?,
                None => scom.decode_response(&bytes)?,
            };
            println!("flags:  {}", frame.flags().to_binary());
            for line in frame.flags().describe() {
                println!("        {}", line);
            }
            println!("status: {}", frame.status());
            println!("value:  {}", response);
        }
        Command::List => {
            for entry in directory::entries() {
                println!(
                    "{:>5}  {:<9}  {:<10}  {}",
                    entry.id,
                    format!("{:?}", entry.object_type),
                    entry.format.name(),
                    entry.name
                );
            }
        }
        Command::Errors => {
            for (code, description) in error_code::error_codes() {
                println!("{:#06x}  {}", code, description);
            }
        }
    }

    Ok(())
}
