use std::io::Write;

use sa_link::{require_ok, CommandChannel, Transport};
use sa_protocol::{tone, ChannelUpdate};
use tracing::warn;

use crate::cmd::SetParameterArgs;
use crate::exit::{io_error, link_error, CliError, CliResult, SUCCESS, USAGE};

/// Resolve a tone label, deciding what to do with unknown labels
fn resolve_tone(flag: &str, label: &str, strict: bool) -> CliResult<u8> {
    match tone::lookup(label) {
        Some(index) => Ok(index),
        None if strict => Err(CliError::new(
            USAGE,
            format!("{flag}: unknown tone {label:?} (see `sactl tones`)"),
        )),
        None => {
            warn!("{flag}: unknown tone {label:?}, tone disabled");
            Ok(tone::NO_TONE)
        }
    }
}

pub fn build_update(args: &SetParameterArgs) -> CliResult<ChannelUpdate> {
    Ok(ChannelUpdate {
        channel: args.channel,
        transmit: args.txfreq.clone(),
        receive: args.rxfreq.clone(),
        transmit_tone: resolve_tone("--txctcss", &args.txctcss, args.strict_tones)?,
        receive_tone: resolve_tone("--rxctcss", &args.rxctcss, args.strict_tones)?,
        squelch: args.squelch,
    })
}

pub fn run<T: Transport>(
    channel: &mut CommandChannel<T>,
    update: &ChannelUpdate,
    out: &mut impl Write,
) -> CliResult<i32> {
    let reply = channel
        .update_channel(update)
        .and_then(|reply| require_ok("write parameters", reply))
        .map_err(|e| link_error("set parameters", e))?;
    writeln!(out, "{}", reply.text).map_err(|e| io_error("write output", e))?;
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::{IO_ERROR, PROTOCOL};
    use sa_link::Timing;
    use sa_sim::VirtualModule;

    fn args(txctcss: &str, strict_tones: bool) -> SetParameterArgs {
        SetParameterArgs {
            channel: 4,
            txfreq: "145.45".parse().unwrap(),
            rxfreq: "145.45".parse().unwrap(),
            txctcss: txctcss.to_string(),
            rxctcss: "None".to_string(),
            squelch: 8,
            strict_tones,
        }
    }

    #[test]
    fn test_build_update_resolves_labels() {
        let update = build_update(&args("88.5", false)).unwrap();
        assert_eq!(update.transmit_tone, 8);
        assert_eq!(update.receive_tone, 0);
        assert_eq!(update.transmit.as_str(), "145.4500");
    }

    #[test]
    fn test_unknown_tone_falls_back_unless_strict() {
        let update = build_update(&args("88.6", false)).unwrap();
        assert_eq!(update.transmit_tone, tone::NO_TONE);

        let err = build_update(&args("88.6", true)).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("--txctcss"));
    }

    #[test]
    fn test_set_writes_module() {
        let mut channel = CommandChannel::with_timing(VirtualModule::new(), Timing::immediate());
        let update = build_update(&args("023I", true)).unwrap();
        let mut out: Vec<u8> = Vec::new();

        assert_eq!(run(&mut channel, &update, &mut out).unwrap(), SUCCESS);
        assert_eq!(out, b"OK\n");

        let block = channel.transport().block();
        assert_eq!(block.channel(4).unwrap().transmit.as_str(), "145.4500");
        assert_eq!(block.channel(3).unwrap().transmit.as_str(), "145.0500");
        assert_eq!((block.transmit_tone, block.receive_tone, block.squelch), (39, 0, 8));
    }

    #[test]
    fn test_rejected_write() {
        let mut module = VirtualModule::new();
        module.set_reject_writes(true);
        let mut channel = CommandChannel::with_timing(module, Timing::immediate());
        let update = build_update(&args("None", false)).unwrap();

        let err = run(&mut channel, &update, &mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.code, PROTOCOL);
    }

    #[test]
    fn test_silent_module() {
        let mut module = VirtualModule::new();
        module.set_silent(true);
        let mut channel = CommandChannel::with_timing(module, Timing::immediate());
        let update = build_update(&args("None", false)).unwrap();

        let err = run(&mut channel, &update, &mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.code, IO_ERROR);
    }
}
