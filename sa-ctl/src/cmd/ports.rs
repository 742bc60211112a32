use std::io::Write;

use sa_link::PortScanner;

use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::print_ports;

pub fn run(out: &mut impl Write) -> CliResult<i32> {
    let ports = PortScanner::new()
        .enumerate_ports()
        .map_err(|e| link_error("enumerate ports", e))?;
    print_ports(out, &ports)?;
    Ok(SUCCESS)
}
