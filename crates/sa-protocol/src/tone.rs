//! CTCSS/CDCSS tone table
//!
//! The module addresses sub-audible tones by their position in a fixed
//! table. Position 0 disables the tone, positions 1..=38 are the standard
//! CTCSS tones and the rest are inverted-polarity CDCSS codes.
//!
//! The firmware table is not a bijection: after the 104 CDCSS codes it
//! repeats the first 23 of them. Indices must match the firmware, so the
//! repeat is kept and label lookups resolve to the first occurrence.

use crate::error::ProtocolError;

/// Number of entries in the tone table
pub const TONE_COUNT: usize = 166;

/// Highest valid tone index
pub const MAX_TONE_INDEX: u8 = (TONE_COUNT - 1) as u8;

/// Index meaning "no tone"
pub const NO_TONE: u8 = 0;

/// Last CTCSS position in the table
const LAST_CTCSS: u8 = 38;

/// Tone labels indexed by their wire position
pub static TONE_CODES: [&str; TONE_COUNT] = [
    // no tone
    "None",
    // CTCSS, positions 1..=38
    "67.0", "71.9", "74.4", "77.0", "79.7", "82.5", "85.4", "88.5", "91.5", "94.8",
    "97.4", "100.0", "103.5", "107.2", "110.9", "114.8", "118.8", "123.0", "127.3", "131.8",
    "136.5", "141.3", "146.2", "151.4", "156.7", "162.2", "167.9", "173.8", "179.9", "186.2",
    "192.8", "203.5", "210.7", "218.1", "225.7", "233.6", "241.8", "250.3",
    // CDCSS inverted, positions 39..=142
    "023I", "025I", "026I", "031I", "032I", "036I", "043I", "047I", "051I", "053I",
    "054I", "065I", "071I", "072I", "073I", "074I", "114I", "115I", "116I", "122I",
    "125I", "131I", "132I", "134I", "143I", "145I", "152I", "155I", "156I", "162I",
    "165I", "172I", "174I", "205I", "212I", "223I", "225I", "226I", "243I", "244I",
    "245I", "246I", "251I", "252I", "255I", "261I", "263I", "265I", "266I", "271I",
    "274I", "306I", "311I", "315I", "325I", "331I", "332I", "343I", "346I", "351I",
    "356I", "364I", "365I", "371I", "411I", "412I", "413I", "423I", "431I", "432I",
    "445I", "446I", "452I", "454I", "455I", "462I", "464I", "465I", "466I", "503I",
    "506I", "516I", "523I", "526I", "532I", "546I", "565I", "606I", "612I", "624I",
    "627I", "631I", "632I", "654I", "662I", "664I", "703I", "712I", "723I", "731I",
    "732I", "734I", "743I", "754I",
    // firmware repeats the head of the CDCSS list, positions 143..=165
    "023I", "025I", "026I", "031I", "032I", "036I", "043I", "047I", "051I", "053I",
    "054I", "065I", "071I", "072I", "073I", "074I", "114I", "115I", "116I", "122I",
    "125I", "131I", "132I",
];

/// Kind of squelch tone stored at a table position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToneKind {
    /// Tone squelch disabled
    None,
    /// Analog sub-audible tone
    Ctcss,
    /// Digital squelch code
    Cdcss,
}

/// Label for a tone index
pub fn label_for(index: u8) -> Result<&'static str, ProtocolError> {
    TONE_CODES
        .get(usize::from(index))
        .copied()
        .ok_or_else(|| ProtocolError::out_of_range("tone index", index, 0, MAX_TONE_INDEX.into()))
}

/// Index of the first entry exactly matching `label` (case-sensitive)
pub fn lookup(label: &str) -> Option<u8> {
    TONE_CODES
        .iter()
        .position(|&code| code == label)
        .map(|pos| pos as u8)
}

/// Index of the first entry matching `label`, or [`NO_TONE`] when nothing matches
///
/// This mirrors how the module's configuration tools have always resolved
/// tone names: an unknown label silently disables the tone. Use [`lookup`]
/// to detect the miss.
pub fn index_for(label: &str) -> u8 {
    lookup(label).unwrap_or(NO_TONE)
}

/// Kind of tone stored at `index`, or `None` when the index is out of range
pub fn kind(index: u8) -> Option<ToneKind> {
    match index {
        NO_TONE => Some(ToneKind::None),
        1..=LAST_CTCSS => Some(ToneKind::Ctcss),
        _ if index <= MAX_TONE_INDEX => Some(ToneKind::Cdcss),
        _ => None,
    }
}
