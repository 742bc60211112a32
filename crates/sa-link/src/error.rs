//! Error types for the serial link

use sa_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur while talking to the module
#[derive(Debug, Error)]
pub enum LinkError {
    /// Failed to enumerate serial ports
    #[error("failed to enumerate ports: {0}")]
    EnumerationFailed(String),

    /// Failed to open serial port
    #[error("failed to open port {port}: {reason}")]
    OpenFailed { port: String, reason: String },

    /// Baud rate not supported by the module
    #[error("unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),

    /// I/O error on the transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port error
    #[error("serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// Reply could not be decoded
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Module answered `ERROR`
    #[error("module rejected {command}: {reply}")]
    Rejected { command: String, reply: String },

    /// Nothing arrived before the read timed out
    #[error("no reply to {0}")]
    NoReply(String),

    /// Reply carried neither `OK` nor `ERROR` where an acknowledgement was required
    #[error("unexpected reply to {command}: {reply:?}")]
    Unexpected { command: String, reply: String },
}
