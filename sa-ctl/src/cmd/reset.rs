use std::io::Write;

use sa_link::{require_ok, CommandChannel, Transport};

use crate::exit::{io_error, link_error, CliResult, SUCCESS};

pub fn run<T: Transport>(channel: &mut CommandChannel<T>, out: &mut impl Write) -> CliResult<i32> {
    let reply = require_ok("reset", channel.reset()).map_err(|e| link_error("reset", e))?;
    writeln!(out, "{}", reply.text).map_err(|e| io_error("write output", e))?;
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_link::Timing;
    use sa_sim::VirtualModule;

    #[test]
    fn test_reset() {
        let mut channel = CommandChannel::with_timing(VirtualModule::new(), Timing::immediate());
        let mut out: Vec<u8> = Vec::new();

        assert_eq!(run(&mut channel, &mut out).unwrap(), SUCCESS);
        assert_eq!(out, b"OK\n");
        assert_eq!(channel.transport().reset_count(), 1);
    }
}
