use std::fmt;
use std::io;

use sa_link::LinkError;
use sa_protocol::ProtocolError;

// Exit codes follow sysexits.h.
pub const SUCCESS: i32 = 0;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 70;
pub const IO_ERROR: i32 = 74;
pub const PROTOCOL: i32 = 76;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(IO_ERROR, format!("{context}: {err}"))
}

pub fn protocol_error(context: &str, err: ProtocolError) -> CliError {
    match err {
        ProtocolError::InvalidFrequency(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(PROTOCOL, format!("{context}: {other}")),
    }
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::EnumerationFailed(_)
        | LinkError::OpenFailed { .. }
        | LinkError::Io(_)
        | LinkError::SerialPort(_)
        | LinkError::NoReply(_) => CliError::new(IO_ERROR, format!("{context}: {err}")),
        LinkError::UnsupportedBaudRate(_) => CliError::new(USAGE, format!("{context}: {err}")),
        LinkError::Protocol(err) => protocol_error(context, err),
        LinkError::Rejected { .. } | LinkError::Unexpected { .. } => {
            CliError::new(PROTOCOL, format!("{context}: {err}"))
        }
    }
}
