use std::io::Write;

use sa_link::{CommandChannel, Transport};

use crate::cmd::ReadParameterArgs;
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::print_parameters;

pub fn run<T: Transport>(
    channel: &mut CommandChannel<T>,
    args: &ReadParameterArgs,
    out: &mut impl Write,
) -> CliResult<i32> {
    let block = channel
        .read_parameters()
        .map_err(|e| link_error("read parameters", e))?;
    print_parameters(out, &block, args.format)?;
    Ok(SUCCESS)
}
