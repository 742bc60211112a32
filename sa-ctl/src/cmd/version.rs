use std::io::Write;

use sa_link::{require_text, CommandChannel, Transport};

use crate::exit::{io_error, link_error, CliResult, SUCCESS};

pub fn run<T: Transport>(channel: &mut CommandChannel<T>, out: &mut impl Write) -> CliResult<i32> {
    let version = require_text("version", channel.version()).map_err(|e| link_error("version", e))?;
    writeln!(out, "{version}").map_err(|e| io_error("write output", e))?;
    Ok(SUCCESS)
}
