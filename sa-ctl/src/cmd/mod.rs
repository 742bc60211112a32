use std::io;
use std::time::Duration;

use clap::{Args, Subcommand};
use sa_link::{BaudRate, CommandChannel, SerialConfig, SerialTransport, Timing, Transport};
use sa_protocol::Frequency;
use sa_sim::VirtualModule;
use tracing::info;

use crate::exit::{link_error, CliResult};
use crate::output::OutputFormat;

pub mod ports;
pub mod read;
pub mod reset;
pub mod set;
pub mod tones;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the module firmware version.
    Version,
    /// Reset the module.
    Reset,
    /// Read and print all 16 channels, tones and squelch.
    #[command(name = "readparameter")]
    ReadParameter(ReadParameterArgs),
    /// Reprogram one channel along with tones and squelch.
    #[command(name = "setparameter")]
    SetParameter(SetParameterArgs),
    /// List serial ports.
    Ports,
    /// List tone labels accepted by --txctcss/--rxctcss.
    Tones,
}

#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Serial port the module is attached to.
    #[arg(long, short = 'p', env = "SA_PORT", default_value = "/dev/ttyUSB0", global = true)]
    pub port: String,
    /// Baud rate (300, 1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200).
    #[arg(long, short = 'b', env = "SA_BAUD", default_value = "9600", global = true)]
    pub baud: BaudRate,
    /// Reply timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 3, global = true)]
    pub timeout: u64,
    /// Use an in-process simulated module instead of the serial port.
    #[arg(long, global = true)]
    pub simulate: bool,
}

#[derive(Args, Debug)]
pub struct ReadParameterArgs {
    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct SetParameterArgs {
    /// Channel to program (1-16).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub channel: u8,
    /// Transmit frequency in MHz (DDD.DDDD).
    #[arg(long)]
    pub txfreq: Frequency,
    /// Receive frequency in MHz (DDD.DDDD).
    #[arg(long)]
    pub rxfreq: Frequency,
    /// Transmit CTCSS/CDCSS tone label, e.g. 88.5, 023I or None.
    #[arg(long)]
    pub txctcss: String,
    /// Receive CTCSS/CDCSS tone label.
    #[arg(long)]
    pub rxctcss: String,
    /// Squelch level (0-8).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=8))]
    pub squelch: u8,
    /// Reject unknown tone labels instead of disabling the tone.
    #[arg(long)]
    pub strict_tones: bool,
}

pub fn run(command: Command, link: &LinkArgs) -> CliResult<i32> {
    let mut out = io::stdout().lock();
    match command {
        Command::Version => version::run(&mut open_channel(link)?, &mut out),
        Command::Reset => reset::run(&mut open_channel(link)?, &mut out),
        Command::ReadParameter(args) => read::run(&mut open_channel(link)?, &args, &mut out),
        Command::SetParameter(args) => {
            let update = set::build_update(&args)?;
            set::run(&mut open_channel(link)?, &update, &mut out)
        }
        Command::Ports => ports::run(&mut out),
        Command::Tones => tones::run(&mut out),
    }
}

/// Open the serial port, or the simulator with `--simulate`
pub fn open_channel(link: &LinkArgs) -> CliResult<CommandChannel<Box<dyn Transport>>> {
    if link.simulate {
        info!("Using simulated module");
        let transport: Box<dyn Transport> = Box::new(VirtualModule::new());
        return Ok(CommandChannel::with_timing(transport, Timing::immediate()));
    }

    let config = SerialConfig {
        port: link.port.clone(),
        baud_rate: link.baud,
        timeout: Duration::from_secs(link.timeout),
    };
    let transport = SerialTransport::open(&config).map_err(|e| link_error("open serial port", e))?;
    info!("Opened {} at {} baud", transport.name(), config.baud_rate);

    let transport: Box<dyn Transport> = Box::new(transport);
    let timing = Timing::default().with_read_timeout(config.timeout);
    Ok(CommandChannel::with_timing(transport, timing))
}
