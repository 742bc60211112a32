//! Command channel
//!
//! Each operation is one transaction: send the framed request, sleep the
//! settle delay, read a single reply line. There are no retries and at
//! most one request is in flight.
//!
//! Transport failures while sending or receiving are logged and surface
//! only as a missing or partial reply, so callers always get something to
//! report. Structural problems in a reply that must be decoded are
//! returned as errors.

use std::thread;

use sa_protocol::{ChannelUpdate, Command, ParameterBlock, Reply, ReplyStatus};
use tracing::{debug, info, warn};

use crate::error::LinkError;
use crate::timing::Timing;
use crate::transport::Transport;

/// Request/reply channel to a module
pub struct CommandChannel<T: Transport> {
    transport: T,
    timing: Timing,
}

impl<T: Transport> CommandChannel<T> {
    /// Create a channel with default timing
    pub fn new(transport: T) -> Self {
        Self::with_timing(transport, Timing::default())
    }

    /// Create a channel with custom timing
    pub fn with_timing(transport: T, timing: Timing) -> Self {
        Self { transport, timing }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the underlying transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Join `tokens` with commas, append CRLF and write the frame
    ///
    /// A failed write is logged, not returned: the following read simply
    /// finds no reply.
    pub fn send<S: AsRef<str>>(&mut self, tokens: &[S]) {
        let frame = sa_protocol::command::frame(tokens);
        debug!("Sending {:?}", String::from_utf8_lossy(&frame).trim_end());

        if let Err(e) = self.transport.write(&frame) {
            warn!("Failed to write command: {}", e);
        }
    }

    /// Read one reply line with the terminator stripped
    ///
    /// Non-ASCII bytes are logged and the lossily-decoded text is still
    /// returned, so it may be partial. Read failures yield an empty string.
    pub fn read_reply(&mut self) -> String {
        let raw = match self.transport.read_line(self.timing.read_timeout) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read reply: {}", e);
                return String::new();
            }
        };

        if !raw.is_ascii() {
            warn!("Reply is not valid ASCII: {:02X?}", raw);
        }

        let text = String::from_utf8_lossy(&raw);
        let text = text.trim_end_matches(['\r', '\n']).to_string();
        debug!("Received {:?}", text);
        text
    }

    /// Run one request/settle/reply transaction
    pub fn transact(&mut self, command: &Command) -> Reply {
        debug!("Transaction: {}", command.name());
        self.send(&command.tokens());

        let settle = self.timing.settle_for(command);
        if !settle.is_zero() {
            thread::sleep(settle);
        }

        let reply = Reply::classify(self.read_reply());
        if reply.status == ReplyStatus::NoReply {
            warn!("No reply to {}", command.name());
        }
        reply
    }

    /// Query the firmware version
    pub fn version(&mut self) -> Reply {
        self.transact(&Command::Version)
    }

    /// Reset the module
    pub fn reset(&mut self) -> Reply {
        self.transact(&Command::Reset)
    }

    /// Read and decode the parameter block
    pub fn read_parameters(&mut self) -> Result<ParameterBlock, LinkError> {
        let command = Command::ReadParameters;
        let reply = self.transact(&command);

        match reply.status {
            ReplyStatus::Error => Err(LinkError::Rejected {
                command: command.name().to_string(),
                reply: reply.text,
            }),
            ReplyStatus::NoReply => Err(LinkError::NoReply(command.name().to_string())),
            ReplyStatus::Ok | ReplyStatus::Indeterminate => {
                Ok(ParameterBlock::parse_reply(&reply.text)?)
            }
        }
    }

    /// Write a full parameter block
    pub fn write_parameters(&mut self, block: &ParameterBlock) -> Reply {
        self.transact(&Command::WriteParameters(block.clone()))
    }

    /// Reprogram one channel by reading the current block, merging and writing it back
    pub fn update_channel(&mut self, update: &ChannelUpdate) -> Result<Reply, LinkError> {
        let current = self.read_parameters()?;
        let updated = current.apply(update)?;

        info!(
            "Writing channel {}: TX {} RX {}",
            update.channel, update.transmit, update.receive
        );
        Ok(self.write_parameters(&updated))
    }
}

/// Require an `OK` acknowledgement
pub fn require_ok(command: &str, reply: Reply) -> Result<Reply, LinkError> {
    match reply.status {
        ReplyStatus::Ok => Ok(reply),
        ReplyStatus::Error => Err(LinkError::Rejected {
            command: command.to_string(),
            reply: reply.text,
        }),
        ReplyStatus::NoReply => Err(LinkError::NoReply(command.to_string())),
        ReplyStatus::Indeterminate => Err(LinkError::Unexpected {
            command: command.to_string(),
            reply: reply.text,
        }),
    }
}

/// Require any reply other than `ERROR` and return its text
pub fn require_text(command: &str, reply: Reply) -> Result<String, LinkError> {
    match reply.status {
        ReplyStatus::Ok | ReplyStatus::Indeterminate => Ok(reply.text),
        ReplyStatus::Error => Err(LinkError::Rejected {
            command: command.to_string(),
            reply: reply.text,
        }),
        ReplyStatus::NoReply => Err(LinkError::NoReply(command.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::time::Duration;

    use sa_protocol::ProtocolError;

    /// Transport that replays canned replies and records writes
    #[derive(Default)]
    struct ScriptedTransport {
        replies: VecDeque<Result<Vec<u8>, io::ErrorKind>>,
        written: Vec<Vec<u8>>,
        fail_writes: bool,
    }

    impl ScriptedTransport {
        fn with_replies(replies: &[&[u8]]) -> Self {
            Self {
                replies: replies.iter().map(|r| Ok(r.to_vec())).collect(),
                ..Default::default()
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
            if self.fail_writes {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe).into());
            }
            self.written.push(bytes.to_vec());
            Ok(())
        }

        fn read_line(&mut self, _timeout: Duration) -> Result<Vec<u8>, LinkError> {
            match self.replies.pop_front() {
                Some(Ok(bytes)) => Ok(bytes),
                Some(Err(kind)) => Err(io::Error::from(kind).into()),
                None => Ok(Vec::new()),
            }
        }
    }

    fn channel(replies: &[&[u8]]) -> CommandChannel<ScriptedTransport> {
        CommandChannel::with_timing(ScriptedTransport::with_replies(replies), Timing::immediate())
    }

    fn block_reply() -> Vec<u8> {
        let mut reply = String::from("XX");
        let freqs: Vec<String> = (0..32).map(|i| format!("{}.1250", 430 + i)).collect();
        reply.push_str(&freqs.join(","));
        reply.push_str(",001,002,5\r\n");
        reply.into_bytes()
    }

    #[test]
    fn test_send_joins_and_terminates() {
        let mut ch = channel(&[]);
        ch.send(&["AAFA3145.0000", "146.0000"]);
        assert_eq!(ch.transport().written, vec![b"AAFA3145.0000,146.0000\r\n".to_vec()]);
    }

    #[test]
    fn test_send_failure_is_not_fatal() {
        let mut transport = ScriptedTransport::with_replies(&[]);
        transport.fail_writes = true;
        let mut ch = CommandChannel::with_timing(transport, Timing::immediate());

        let reply = ch.version();
        assert_eq!(reply.status, ReplyStatus::NoReply);
        assert!(reply.text.is_empty());
    }

    #[test]
    fn test_read_reply_strips_terminator() {
        let mut ch = channel(&[b"OK\r\n", b"partial"]);
        assert_eq!(ch.read_reply(), "OK");
        assert_eq!(ch.read_reply(), "partial");
        assert_eq!(ch.read_reply(), "");
    }

    #[test]
    fn test_read_reply_non_ascii_returns_raw_text() {
        let mut ch = channel(&[b"SA\xFF828\r\n"]);
        assert_eq!(ch.read_reply(), "SA\u{FFFD}828");
    }

    #[test]
    fn test_read_error_yields_empty_reply() {
        let mut transport = ScriptedTransport::default();
        transport.replies.push_back(Err(io::ErrorKind::BrokenPipe));
        let mut ch = CommandChannel::with_timing(transport, Timing::immediate());

        assert_eq!(ch.read_reply(), "");
    }

    #[test]
    fn test_version_and_reset_frames() {
        let mut ch = channel(&[b"SA828_V4.2\r\n", b"OK\r\n"]);

        let version = ch.version();
        assert_eq!(version.text, "SA828_V4.2");
        assert_eq!(version.status, ReplyStatus::Indeterminate);

        assert!(ch.reset().is_ok());
        assert_eq!(
            ch.transport().written,
            vec![b"AAFAA\r\n".to_vec(), b"AAFA2\r\n".to_vec()]
        );
    }

    #[test]
    fn test_read_parameters() {
        let reply = block_reply();
        let mut ch = channel(&[&reply]);

        let block = ch.read_parameters().unwrap();
        assert_eq!(block.channels[0].transmit.as_str(), "430.1250");
        assert_eq!(block.channels[15].receive.as_str(), "461.1250");
        assert_eq!((block.transmit_tone, block.receive_tone, block.squelch), (1, 2, 5));
        assert_eq!(ch.transport().written, vec![b"AAFA1\r\n".to_vec()]);
    }

    #[test]
    fn test_read_parameters_noisy_header() {
        let mut reply = block_reply();
        reply[0] = 0xFF;
        let mut ch = channel(&[&reply]);

        let block = ch.read_parameters().unwrap();
        assert_eq!(block.channels[0].transmit.as_str(), "430.1250");
        assert_eq!(block.squelch, 5);
    }

    #[test]
    fn test_read_parameters_error_reply() {
        let mut ch = channel(&[b"ERROR\r\n"]);
        assert!(matches!(ch.read_parameters(), Err(LinkError::Rejected { .. })));
    }

    #[test]
    fn test_read_parameters_no_reply() {
        let mut ch = channel(&[]);
        assert!(matches!(ch.read_parameters(), Err(LinkError::NoReply(_))));
    }

    #[test]
    fn test_read_parameters_truncated() {
        let mut ch = channel(&[b"XX145.0000,145.0000\r\n"]);
        assert!(matches!(
            ch.read_parameters(),
            Err(LinkError::Protocol(ProtocolError::Malformed(_)))
        ));
    }

    #[test]
    fn test_update_channel_read_modify_write() {
        let reply = block_reply();
        let mut ch = channel(&[&reply, b"OK\r\n"]);
        let update = ChannelUpdate {
            channel: 2,
            transmit: "145.45".parse().unwrap(),
            receive: "145.45".parse().unwrap(),
            transmit_tone: 0,
            receive_tone: 165,
            squelch: 8,
        };

        let result = ch.update_channel(&update).unwrap();
        assert!(result.is_ok());

        let written = &ch.transport().written;
        assert_eq!(written.len(), 2);
        let frame = String::from_utf8(written[1].clone()).unwrap();
        assert!(
            frame.starts_with("AAFA3430.1250,431.1250,145.4500,145.4500,434.1250,"),
            "{frame}"
        );
        assert!(frame.ends_with(",461.1250,000,165,8\r\n"), "{frame}");
    }

    #[test]
    fn test_update_channel_out_of_range_writes_nothing() {
        let reply = block_reply();
        let mut ch = channel(&[&reply]);
        let update = ChannelUpdate {
            channel: 17,
            transmit: "145.45".parse().unwrap(),
            receive: "145.45".parse().unwrap(),
            transmit_tone: 0,
            receive_tone: 0,
            squelch: 0,
        };

        assert!(matches!(
            ch.update_channel(&update),
            Err(LinkError::Protocol(ProtocolError::OutOfRange { .. }))
        ));
        assert_eq!(ch.transport().written.len(), 1);
    }

    #[test]
    fn test_require_ok() {
        assert!(require_ok("reset", Reply::classify("OK")).is_ok());
        assert!(matches!(
            require_ok("reset", Reply::classify("ERROR")),
            Err(LinkError::Rejected { .. })
        ));
        assert!(matches!(
            require_ok("reset", Reply::classify("")),
            Err(LinkError::NoReply(_))
        ));
        assert!(matches!(
            require_ok("reset", Reply::classify("huh")),
            Err(LinkError::Unexpected { .. })
        ));
    }

    proptest::proptest! {
        #[test]
        fn read_reply_strips_only_the_terminator(text in "[ -~]{0,80}") {
            let line = format!("{text}\r\n");
            let mut ch = channel(&[line.as_bytes()]);
            proptest::prop_assert_eq!(ch.read_reply(), text);
        }
    }

    #[test]
    fn test_require_text() {
        assert_eq!(
            require_text("version", Reply::classify("SA828_V4.2")).unwrap(),
            "SA828_V4.2"
        );
        assert!(require_text("version", Reply::classify("ERROR")).is_err());
        assert!(require_text("version", Reply::classify("")).is_err());
    }
}
