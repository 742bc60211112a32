//! Channel frequency representation
//!
//! Frequencies travel as MHz decimal text with exactly four fractional
//! digits (`145.4500`). The text is kept verbatim so a block read from the
//! module is written back byte-for-byte.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Number of integer digits the module expects
const INTEGER_DIGITS: usize = 3;

/// A channel frequency in MHz, as wire text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Frequency(String);

impl Frequency {
    /// Number of fractional digits on the wire
    pub const FRACTION_DIGITS: usize = 4;

    /// Wrap text received from the module without reformatting it
    pub fn from_wire(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The wire text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Frequency {
    type Err = ProtocolError;

    /// Parse user input such as `145.45` and pad it to `145.4500`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidFrequency(s.to_string());

        let (int, frac) = match s.split_once('.') {
            Some((_, "")) => return Err(invalid()),
            Some((int, frac)) => (int, frac),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int.len() != INTEGER_DIGITS
            || frac.len() > Self::FRACTION_DIGITS
            || !all_digits(int)
            || !all_digits(frac)
        {
            return Err(invalid());
        }

        Ok(Self(format!(
            "{int}.{frac:0<width$}",
            width = Self::FRACTION_DIGITS
        )))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
