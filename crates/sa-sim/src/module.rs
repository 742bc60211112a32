//! Virtual transceiver module
//!
//! Receives request frames through [`Transport::write`], decodes them and
//! queues the reply a real module would send for [`Transport::read_line`].

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use sa_link::{LinkError, Transport};
use sa_protocol::command::TERMINATOR;
use sa_protocol::{ChannelPair, Command, Frequency, ParameterBlock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for creating a virtual module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualModuleConfig {
    /// Reply to the version query
    pub version: String,
    /// 2-character header prefixed to configuration reads
    pub header: String,
    /// Initial parameter block
    pub block: ParameterBlock,
}

impl Default for VirtualModuleConfig {
    fn default() -> Self {
        Self {
            version: "SA828_V4.2".to_string(),
            header: "WR".to_string(),
            block: default_block(),
        }
    }
}

/// Channels on 145.000 MHz upward in 25 kHz steps, no tones, squelch 4
fn default_block() -> ParameterBlock {
    let channels = std::array::from_fn(|i| {
        // Frequency in 100 Hz units
        let units = 1_450_000 + 250 * i as u32;
        let freq = Frequency::from_wire(format!("{}.{:04}", units / 10_000, units % 10_000));
        ChannelPair::new(freq.clone(), freq)
    });
    ParameterBlock {
        channels,
        transmit_tone: 0,
        receive_tone: 0,
        squelch: 4,
    }
}

/// A simulated module speaking the line protocol
#[derive(Debug)]
pub struct VirtualModule {
    version: String,
    header: String,
    block: ParameterBlock,
    /// Bytes written but not yet terminated
    inbound: Vec<u8>,
    /// Reply lines waiting to be read
    pending_output: VecDeque<Vec<u8>>,
    /// Every request line received, in order
    received: Vec<String>,
    reset_count: usize,
    reject_writes: bool,
    silent: bool,
    fail_writes: bool,
}

impl Default for VirtualModule {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualModule {
    /// Create a module with default settings
    pub fn new() -> Self {
        Self::from_config(VirtualModuleConfig::default())
    }

    /// Create a module from configuration
    pub fn from_config(config: VirtualModuleConfig) -> Self {
        Self {
            version: config.version,
            header: config.header,
            block: config.block,
            inbound: Vec::new(),
            pending_output: VecDeque::new(),
            received: Vec::new(),
            reset_count: 0,
            reject_writes: false,
            silent: false,
            fail_writes: false,
        }
    }

    /// Current stored configuration
    pub fn block(&self) -> &ParameterBlock {
        &self.block
    }

    /// Request lines received so far
    pub fn received(&self) -> &[String] {
        &self.received
    }

    /// Number of reset commands processed
    pub fn reset_count(&self) -> usize {
        self.reset_count
    }

    /// Answer configuration writes with `ERROR`
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Stop replying to anything
    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Make transport writes fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Queue raw reply bytes, bypassing the protocol
    pub fn inject_reply(&mut self, bytes: &[u8]) {
        self.pending_output.push_back(bytes.to_vec());
    }

    /// Take the next pending output line
    pub fn take_output(&mut self) -> Option<Vec<u8>> {
        self.pending_output.pop_front()
    }

    /// Feed request bytes, processing every complete line
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.inbound.extend_from_slice(data);

        while let Some(end) = self
            .inbound
            .windows(TERMINATOR.len())
            .position(|w| w == TERMINATOR.as_bytes())
        {
            let line: Vec<u8> = self.inbound.drain(..end + TERMINATOR.len()).collect();
            let line = String::from_utf8_lossy(&line[..end]).into_owned();
            if let Some(reply) = self.handle_line(&line) {
                let mut bytes = reply.into_bytes();
                bytes.extend_from_slice(TERMINATOR.as_bytes());
                self.pending_output.push_back(bytes);
            }
        }
    }

    /// Process one request line and produce the reply text
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        debug!("Virtual module received {:?}", line);
        self.received.push(line.to_string());

        if self.silent {
            return None;
        }

        let reply = match Command::parse(line) {
            Ok(Command::Version) => self.version.clone(),
            Ok(Command::Reset) => {
                self.reset_count += 1;
                "OK".to_string()
            }
            Ok(Command::ReadParameters) => format!("{}{}", self.header, self.block.encode()),
            Ok(Command::WriteParameters(_)) if self.reject_writes => "ERROR".to_string(),
            Ok(Command::WriteParameters(block)) => {
                self.block = block;
                "OK".to_string()
            }
            Err(e) => {
                warn!("Virtual module rejecting {:?}: {}", line, e);
                "ERROR".to_string()
            }
        };
        Some(reply)
    }
}

impl Transport for VirtualModule {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "virtual port closed").into());
        }
        self.push_bytes(bytes);
        Ok(())
    }

    fn read_line(&mut self, _timeout: Duration) -> Result<Vec<u8>, LinkError> {
        Ok(self.take_output().unwrap_or_default())
    }
}
