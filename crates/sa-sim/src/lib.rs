//! SA Module Simulation Library
//!
//! This crate provides a virtual SA-series module that answers the wire
//! protocol from in-memory state, for exercising the command channel and
//! the CLI without hardware.
//!
//! # Example
//!
//! ```rust
//! use sa_link::{CommandChannel, Timing};
//! use sa_sim::VirtualModule;
//!
//! let mut channel = CommandChannel::with_timing(VirtualModule::new(), Timing::immediate());
//!
//! assert!(channel.reset().is_ok());
//! let block = channel.read_parameters().unwrap();
//! assert_eq!(block.channels.len(), 16);
//! ```

pub mod module;

pub use module::{VirtualModule, VirtualModuleConfig};
