//! Channel parameter block
//!
//! The module stores its whole configuration in one comma-separated block
//! exchanged in a single read or write:
//!
//! ```text
//! tx1,rx1,tx2,rx2,...,tx16,rx16,TTT,RRR,S
//! ```
//!
//! - `txN`/`rxN`: channel N transmit/receive frequency (`DDD.DDDD`)
//! - `TTT`/`RRR`: transmit/receive tone index, zero-padded to 3 digits
//! - `S`: squelch level 0-8, unpadded
//!
//! A read reply additionally carries a 2-character header in front of the
//! first field.

use tracing::{trace, warn};

use crate::error::{ParseError, ProtocolError};
use crate::frequency::Frequency;
use crate::tone::MAX_TONE_INDEX;

/// Number of memory channels
pub const CHANNEL_COUNT: usize = 16;

/// Number of comma-separated fields in a parameter block
pub const FIELD_COUNT: usize = CHANNEL_COUNT * 2 + 3;

/// Length of the header preceding the block in a read reply
pub const HEADER_LEN: usize = 2;

/// Highest squelch level
pub const MAX_SQUELCH: u8 = 8;

const TRANSMIT_TONE_FIELD: usize = CHANNEL_COUNT * 2;
const RECEIVE_TONE_FIELD: usize = TRANSMIT_TONE_FIELD + 1;
const SQUELCH_FIELD: usize = TRANSMIT_TONE_FIELD + 2;

/// Transmit and receive frequency of one channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelPair {
    /// Transmit frequency
    pub transmit: Frequency,
    /// Receive frequency
    pub receive: Frequency,
}

impl ChannelPair {
    pub fn new(transmit: Frequency, receive: Frequency) -> Self {
        Self { transmit, receive }
    }
}

/// The module's full configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterBlock {
    /// Channels 1..=16 in wire order
    pub channels: [ChannelPair; CHANNEL_COUNT],
    /// Transmit tone index into the tone table
    pub transmit_tone: u8,
    /// Receive tone index into the tone table
    pub receive_tone: u8,
    /// Squelch level 0..=8
    pub squelch: u8,
}

/// A request to reprogram one channel along with the block-wide settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUpdate {
    /// Channel number, 1-indexed
    pub channel: u8,
    pub transmit: Frequency,
    pub receive: Frequency,
    pub transmit_tone: u8,
    pub receive_tone: u8,
    pub squelch: u8,
}

impl ParameterBlock {
    /// Decode the 35 header-stripped fields of a parameter block
    ///
    /// Fields beyond the 35th (a trailing separator, newer firmware) are
    /// logged and ignored.
    pub fn decode<S: AsRef<str>>(fields: &[S]) -> Result<Self, ProtocolError> {
        if fields.len() < FIELD_COUNT {
            return Err(ParseError::FieldCount {
                expected: FIELD_COUNT,
                actual: fields.len(),
            }
            .into());
        }
        if fields.len() > FIELD_COUNT {
            warn!(
                "Ignoring {} extra field(s) after the parameter block",
                fields.len() - FIELD_COUNT
            );
        }

        let field = |index: usize| fields[index].as_ref();
        let channels = std::array::from_fn(|i| {
            ChannelPair::new(
                Frequency::from_wire(field(2 * i)),
                Frequency::from_wire(field(2 * i + 1)),
            )
        });

        Ok(Self {
            channels,
            transmit_tone: parse_numeric(
                TRANSMIT_TONE_FIELD,
                field(TRANSMIT_TONE_FIELD),
                MAX_TONE_INDEX,
            )?,
            receive_tone: parse_numeric(
                RECEIVE_TONE_FIELD,
                field(RECEIVE_TONE_FIELD),
                MAX_TONE_INDEX,
            )?,
            squelch: parse_numeric(SQUELCH_FIELD, field(SQUELCH_FIELD), MAX_SQUELCH)?,
        })
    }

    /// Parse a read-configuration reply: strip the header, then decode
    ///
    /// The header is counted in characters so a noisy header byte that was
    /// decoded to a replacement character still strips cleanly.
    pub fn parse_reply(reply: &str) -> Result<Self, ProtocolError> {
        let start = reply
            .char_indices()
            .map(|(index, _)| index)
            .chain(std::iter::once(reply.len()))
            .nth(HEADER_LEN)
            .ok_or(ParseError::MissingHeader(HEADER_LEN))?;
        let body = &reply[start..];
        trace!("Parameter block body: {}", body);

        let fields: Vec<&str> = body.split(',').collect();
        Self::decode(&fields)
    }

    /// Wire fields in order, without separators
    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(FIELD_COUNT);
        for pair in &self.channels {
            fields.push(pair.transmit.as_str().to_string());
            fields.push(pair.receive.as_str().to_string());
        }
        fields.push(format!("{:03}", self.transmit_tone));
        fields.push(format!("{:03}", self.receive_tone));
        fields.push(self.squelch.to_string());
        fields
    }

    /// Encode to the comma-joined wire form, with no trailing separator
    pub fn encode(&self) -> String {
        self.to_fields().join(",")
    }

    /// Channel by 1-indexed number
    pub fn channel(&self, number: u8) -> Result<&ChannelPair, ProtocolError> {
        Ok(&self.channels[channel_slot(number)?])
    }

    /// Copy of this block with one channel's frequencies replaced
    pub fn merge_channel(
        &self,
        number: u8,
        transmit: Frequency,
        receive: Frequency,
    ) -> Result<Self, ProtocolError> {
        let slot = channel_slot(number)?;
        let mut merged = self.clone();
        merged.channels[slot] = ChannelPair::new(transmit, receive);
        Ok(merged)
    }

    /// Replace the transmit and receive tone indices
    pub fn with_tones(mut self, transmit: u8, receive: u8) -> Result<Self, ProtocolError> {
        for index in [transmit, receive] {
            if index > MAX_TONE_INDEX {
                return Err(ProtocolError::out_of_range(
                    "tone index",
                    index,
                    0,
                    MAX_TONE_INDEX.into(),
                ));
            }
        }
        self.transmit_tone = transmit;
        self.receive_tone = receive;
        Ok(self)
    }

    /// Replace the squelch level
    pub fn with_squelch(mut self, level: u8) -> Result<Self, ProtocolError> {
        if level > MAX_SQUELCH {
            return Err(ProtocolError::out_of_range(
                "squelch level",
                level,
                0,
                MAX_SQUELCH.into(),
            ));
        }
        self.squelch = level;
        Ok(self)
    }

    /// Apply a channel update on top of this block
    pub fn apply(&self, update: &ChannelUpdate) -> Result<Self, ProtocolError> {
        self.merge_channel(
            update.channel,
            update.transmit.clone(),
            update.receive.clone(),
        )?
        .with_tones(update.transmit_tone, update.receive_tone)?
        .with_squelch(update.squelch)
    }
}

fn channel_slot(number: u8) -> Result<usize, ProtocolError> {
    match usize::from(number) {
        n @ 1..=CHANNEL_COUNT => Ok(n - 1),
        _ => Err(ProtocolError::out_of_range(
            "channel number",
            number,
            1,
            CHANNEL_COUNT as i64,
        )),
    }
}

fn parse_numeric(field: usize, text: &str, max: u8) -> Result<u8, ParseError> {
    let value = text
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidNumber {
            field,
            value: text.to_string(),
        })?;

    if value > u32::from(max) {
        return Err(ParseError::FieldOutOfRange {
            field,
            value,
            max: max.into(),
        });
    }
    Ok(value as u8)
}
