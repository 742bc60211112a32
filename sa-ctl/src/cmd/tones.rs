use std::io::Write;

use sa_protocol::tone::{self, ToneKind, TONE_CODES};

use crate::exit::{io_error, CliResult, SUCCESS};

pub fn run(out: &mut impl Write) -> CliResult<i32> {
    for (index, label) in TONE_CODES.iter().enumerate() {
        let kind = match tone::kind(index as u8) {
            Some(ToneKind::Ctcss) => "CTCSS",
            Some(ToneKind::Cdcss) => "CDCSS",
            Some(ToneKind::None) | None => "",
        };
        writeln!(out, "{index:>3}  {label:<6} {kind}").map_err(|e| io_error("write output", e))?;
    }
    Ok(SUCCESS)
}
