//! SA Module Serial Link
//!
//! This crate drives an SA-series module over a line-oriented transport:
//! each operation sends one framed request, waits a fixed settle delay
//! and reads a single CRLF-terminated reply.
//!
//! # Example
//!
//! ```rust,no_run
//! use sa_link::{CommandChannel, SerialConfig, SerialTransport};
//!
//! let transport = SerialTransport::open(&SerialConfig::new("/dev/ttyUSB0")).unwrap();
//! let mut channel = CommandChannel::new(transport);
//!
//! let block = channel.read_parameters().unwrap();
//! println!("squelch level {}", block.squelch);
//! ```

pub mod channel;
pub mod error;
pub mod scanner;
pub mod timing;
pub mod transport;

pub use channel::{require_ok, require_text, CommandChannel};
pub use error::LinkError;
pub use scanner::{PortScanner, SerialPortInfo};
pub use timing::Timing;
pub use transport::{BaudRate, SerialConfig, SerialTransport, Transport};
