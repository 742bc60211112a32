//! Error types for SA module protocol parsing and encoding

use thiserror::Error;

/// Structural problems found while parsing data received from the module
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Wrong number of comma-separated fields in a parameter block
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// A numeric field could not be parsed as an integer
    #[error("field {field} is not an integer: {value:?}")]
    InvalidNumber { field: usize, value: String },

    /// A numeric field parsed but lies outside its allowed range
    #[error("field {field} out of range: {value} (max {max})")]
    FieldOutOfRange { field: usize, value: u32, max: u32 },

    /// Reply is too short to carry the configuration header
    #[error("reply shorter than the {0}-character header")]
    MissingHeader(usize),

    /// Frame does not start with a known command code
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Higher-level protocol errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Reply from the module could not be decoded
    #[error("malformed reply: {0}")]
    Malformed(#[from] ParseError),

    /// Channel number, tone index or squelch level outside its bounds
    #[error("{what} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Frequency text is not of the form `DDD.DDDD`
    #[error("invalid frequency: {0:?}")]
    InvalidFrequency(String),
}

impl ProtocolError {
    pub(crate) fn out_of_range(
        what: &'static str,
        value: impl Into<i64>,
        min: i64,
        max: i64,
    ) -> Self {
        Self::OutOfRange {
            what,
            value: value.into(),
            min,
            max,
        }
    }
}
