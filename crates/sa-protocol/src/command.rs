//! Request framing and reply classification
//!
//! Requests are a fixed command code optionally followed by data, sent as
//! comma-joined tokens terminated with CRLF. Replies are single lines whose
//! leading token tells success from failure.

use crate::block::{FIELD_COUNT, ParameterBlock};
use crate::error::{ParseError, ProtocolError};

/// Line terminator in both directions
pub const TERMINATOR: &str = "\r\n";

/// Token separator within a frame
pub const SEPARATOR: char = ',';

const VERSION_CODE: &str = "AAFAA";
const RESET_CODE: &str = "AAFA2";
const READ_CODE: &str = "AAFA1";
const WRITE_CODE: &str = "AAFA3";

/// A request to the module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Query firmware version: `AAFAA`
    Version,
    /// Reset the module: `AAFA2`
    Reset,
    /// Read the parameter block: `AAFA1`
    ReadParameters,
    /// Write the parameter block: `AAFA3<fields>`
    WriteParameters(ParameterBlock),
}

impl Command {
    /// Fixed command code prefix
    pub fn code(&self) -> &'static str {
        match self {
            Command::Version => VERSION_CODE,
            Command::Reset => RESET_CODE,
            Command::ReadParameters => READ_CODE,
            Command::WriteParameters(_) => WRITE_CODE,
        }
    }

    /// Human-readable name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Version => "version",
            Command::Reset => "reset",
            Command::ReadParameters => "read parameters",
            Command::WriteParameters(_) => "write parameters",
        }
    }

    /// Whether the module commits this command to flash before replying
    pub fn writes_flash(&self) -> bool {
        matches!(self, Command::WriteParameters(_))
    }

    /// Tokens to be comma-joined on the wire
    ///
    /// The command code is concatenated with the first data field rather
    /// than separated from it.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Command::WriteParameters(block) => {
                let mut tokens = block.to_fields();
                tokens[0] = format!("{WRITE_CODE}{}", tokens[0]);
                tokens
            }
            _ => vec![self.code().to_string()],
        }
    }

    /// Full wire frame including the terminator
    pub fn encode(&self) -> Vec<u8> {
        frame(&self.tokens())
    }

    /// Parse a received request line (without terminator)
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        match line {
            VERSION_CODE => Ok(Command::Version),
            RESET_CODE => Ok(Command::Reset),
            READ_CODE => Ok(Command::ReadParameters),
            _ => match line.strip_prefix(WRITE_CODE) {
                Some(data) => {
                    let fields: Vec<&str> = data.split(SEPARATOR).collect();
                    if fields.len() > FIELD_COUNT {
                        return Err(ParseError::FieldCount {
                            expected: FIELD_COUNT,
                            actual: fields.len(),
                        }
                        .into());
                    }
                    Ok(Command::WriteParameters(ParameterBlock::decode(&fields)?))
                }
                None => Err(ParseError::UnknownCommand(line.to_string()).into()),
            },
        }
    }
}

/// Join tokens with the separator and append the terminator
pub fn frame<S: AsRef<str>>(tokens: &[S]) -> Vec<u8> {
    let mut line = tokens
        .iter()
        .map(|token| token.as_ref())
        .collect::<Vec<&str>>()
        .join(",");
    line.push_str(TERMINATOR);
    line.into_bytes()
}

/// Outcome class of a reply line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReplyStatus {
    /// Reply starts with `OK`
    Ok,
    /// Reply starts with `ERROR`
    Error,
    /// Non-empty reply carrying neither marker (version strings, blocks)
    Indeterminate,
    /// Nothing arrived before the read timed out
    NoReply,
}

/// A reply line with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply text with the terminator removed
    pub text: String,
    pub status: ReplyStatus,
}

impl Reply {
    /// Classify a reply line
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        let status = if text.starts_with("OK") {
            ReplyStatus::Ok
        } else if text.starts_with("ERROR") {
            ReplyStatus::Error
        } else if text.is_empty() {
            ReplyStatus::NoReply
        } else {
            ReplyStatus::Indeterminate
        };
        Self { text, status }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ReplyStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> ParameterBlock {
        let mut fields: Vec<String> = (0..32).map(|i| format!("{}.0000", 400 + i)).collect();
        fields.extend(["012".to_string(), "000".to_string(), "4".to_string()]);
        ParameterBlock::decode(&fields).unwrap()
    }

    #[test]
    fn test_encode_fixed_commands() {
        assert_eq!(Command::Version.encode(), b"AAFAA\r\n");
        assert_eq!(Command::Reset.encode(), b"AAFA2\r\n");
        assert_eq!(Command::ReadParameters.encode(), b"AAFA1\r\n");
    }

    #[test]
    fn test_encode_write_prefixes_first_field() {
        let encoded = Command::WriteParameters(sample_block()).encode();
        let text = String::from_utf8(encoded).unwrap();

        assert!(text.starts_with("AAFA3400.0000,401.0000,"), "{text}");
        assert!(text.ends_with(",431.0000,012,000,4\r\n"), "{text}");
        assert_eq!(text.trim_end().split(',').count(), FIELD_COUNT);
    }

    #[test]
    fn test_frame_joins_tokens() {
        assert_eq!(frame(&["A", "B", "C"]), b"A,B,C\r\n");
        assert_eq!(frame(&["AAFAA"]), b"AAFAA\r\n");
        assert_eq!(frame::<&str>(&[]), b"\r\n");
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("AAFAA").unwrap(), Command::Version);
        assert_eq!(Command::parse("AAFA2").unwrap(), Command::Reset);
        assert_eq!(Command::parse("AAFA1").unwrap(), Command::ReadParameters);

        let block = sample_block();
        let line = String::from_utf8(Command::WriteParameters(block.clone()).encode()).unwrap();
        assert_eq!(
            Command::parse(line.trim_end()).unwrap(),
            Command::WriteParameters(block)
        );
    }

    #[test]
    fn test_parse_unknown_and_malformed() {
        assert_eq!(
            Command::parse("AT"),
            Err(ProtocolError::Malformed(ParseError::UnknownCommand("AT".into())))
        );
        assert!(matches!(
            Command::parse("AAFA3145.0000"),
            Err(ProtocolError::Malformed(ParseError::FieldCount { .. }))
        ));

        let frame = Command::WriteParameters(sample_block()).encode();
        let line = format!("{},", String::from_utf8_lossy(&frame).trim_end());
        assert!(matches!(
            Command::parse(&line),
            Err(ProtocolError::Malformed(ParseError::FieldCount { actual: 36, .. }))
        ));
    }

    #[test]
    fn test_flash_write_flag() {
        assert!(Command::WriteParameters(sample_block()).writes_flash());
        assert!(!Command::ReadParameters.writes_flash());
        assert!(!Command::Reset.writes_flash());
    }

    #[test]
    fn test_classify_replies() {
        assert_eq!(Reply::classify("OK").status, ReplyStatus::Ok);
        assert_eq!(Reply::classify("OK,extra").status, ReplyStatus::Ok);
        assert_eq!(Reply::classify("ERROR").status, ReplyStatus::Error);
        assert_eq!(Reply::classify("ERROR 3").status, ReplyStatus::Error);
        assert_eq!(Reply::classify("SA828_V4.2").status, ReplyStatus::Indeterminate);
        assert_eq!(Reply::classify("ok").status, ReplyStatus::Indeterminate);
        assert_eq!(Reply::classify("").status, ReplyStatus::NoReply);
        assert!(Reply::classify("OK").is_ok());
    }
}
