//! SA Module Protocol Library
//!
//! This crate provides framing and parsing for the line-oriented ASCII
//! command protocol spoken by SA-series two-way radio transceiver modules,
//! and the codec for their 16-channel parameter block.
//!
//! # Wire Format
//!
//! Every frame in either direction is a single ASCII line terminated by
//! CRLF. Requests start with a fixed 5-character command code:
//!
//! | Command | Frame | Reply |
//! |---|---|---|
//! | version | `AAFAA` | version string |
//! | reset | `AAFA2` | `OK` |
//! | read configuration | `AAFA1` | 2-character header + 35 fields |
//! | write configuration | `AAFA3` + 35 fields | `OK` |
//!
//! Any request may be answered with `ERROR`.
//!
//! # Example
//!
//! ```rust
//! use sa_protocol::{tone, Frequency, ParameterBlock};
//!
//! let reply = "XX145.4500,145.4500,146.0000,146.0000,\
//!     146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,\
//!     146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,\
//!     146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,146.0000,\
//!     146.0000,146.0000,146.0000,146.0000,005,010,3";
//!
//! let block = ParameterBlock::parse_reply(reply).unwrap();
//! assert_eq!(block.squelch, 3);
//! assert_eq!(tone::label_for(block.transmit_tone).unwrap(), "79.7");
//!
//! let tx: Frequency = "145.5".parse().unwrap();
//! let updated = block.merge_channel(2, tx.clone(), tx).unwrap();
//! assert_eq!(updated.channel(2).unwrap().transmit.as_str(), "145.5000");
//! ```

pub mod block;
pub mod command;
pub mod error;
pub mod frequency;
pub mod tone;

pub use block::{ChannelPair, ChannelUpdate, ParameterBlock, CHANNEL_COUNT, FIELD_COUNT};
pub use command::{Command, Reply, ReplyStatus};
pub use error::{ParseError, ProtocolError};
pub use frequency::Frequency;
