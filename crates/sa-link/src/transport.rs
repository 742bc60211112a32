//! Line transports
//!
//! [`Transport`] is the seam between the command channel and the byte
//! stream it talks over. [`SerialTransport`] implements it for a real
//! serial port; in-process implementations (simulators, test doubles)
//! implement it directly.

use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::str::FromStr;
use std::time::{Duration, Instant};

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace};

use crate::error::LinkError;

/// A bidirectional, line-oriented byte transport
pub trait Transport {
    /// Write all bytes
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Read until CRLF or until `timeout` elapses
    ///
    /// Returns the bytes received, including the terminator when one
    /// arrived. A timeout is not an error: whatever was received so far
    /// (possibly nothing) is returned.
    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>, LinkError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        (**self).write(bytes)
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>, LinkError> {
        (**self).read_line(timeout)
    }
}

/// Baud rates the module firmware accepts
pub const SUPPORTED_BAUD_RATES: [u32; 9] = [
    300, 1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200,
];

/// A validated module baud rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaudRate(u32);

impl BaudRate {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self(9600)
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = LinkError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if SUPPORTED_BAUD_RATES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(LinkError::UnsupportedBaudRate(value))
        }
    }
}

impl FromStr for BaudRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<u32>()
            .map_err(|_| format!("not a number: {s:?}"))?;
        Self::try_from(value).map_err(|_| {
            format!(
                "unsupported baud rate {value} (expected one of {:?})",
                SUPPORTED_BAUD_RATES
            )
        })
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serial port configuration
///
/// The module always uses 8 data bits, no parity, one stop bit and no
/// flow control; only the port and baud rate vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port name (e.g., /dev/ttyUSB0, COM3)
    pub port: String,
    pub baud_rate: BaudRate,
    /// Read timeout applied when opening the port
    pub timeout: Duration,
}

impl SerialConfig {
    /// Default settings for `port`
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: BaudRate::default(),
            timeout: Duration::from_secs(3),
        }
    }
}

/// Serial port transport
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialTransport {
    /// Open and configure a serial port
    pub fn open(config: &SerialConfig) -> Result<Self, LinkError> {
        debug!("Opening {} at {} baud", config.port, config.baud_rate);

        let port = serialport::new(&config.port, config.baud_rate.as_u32())
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| LinkError::OpenFailed {
                port: config.port.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            port,
            name: config.port.clone(),
        })
    }

    /// Port name this transport was opened on
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        trace!("{} <- {:?}", self.name, String::from_utf8_lossy(bytes));
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>, LinkError> {
        self.port.set_timeout(timeout)?;
        let deadline = Instant::now() + timeout;
        let mut line = Vec::with_capacity(256);
        let mut byte = [0u8; 1];

        while !line.ends_with(b"\r\n") {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    trace!("{} read timed out after {} bytes", self.name, line.len());
                    break;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                trace!("{} read deadline reached", self.name);
                break;
            }
        }

        trace!("{} -> {:?}", self.name, String::from_utf8_lossy(&line));
        Ok(line)
    }
}
