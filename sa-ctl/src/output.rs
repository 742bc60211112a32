use std::io::Write;

use clap::ValueEnum;
use sa_link::SerialPortInfo;
use sa_protocol::{tone, ParameterBlock};
use serde::Serialize;

use crate::exit::{io_error, protocol_error, CliError, CliResult, INTERNAL};

#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct ChannelOutput<'a> {
    channel: usize,
    transmit: &'a str,
    receive: &'a str,
}

#[derive(Serialize)]
struct ToneOutput {
    index: u8,
    label: &'static str,
}

#[derive(Serialize)]
struct ParameterOutput<'a> {
    channels: Vec<ChannelOutput<'a>>,
    transmit_tone: ToneOutput,
    receive_tone: ToneOutput,
    squelch: u8,
}

fn tone_output(index: u8) -> CliResult<ToneOutput> {
    let label = tone::label_for(index).map_err(|e| protocol_error("resolve tone", e))?;
    Ok(ToneOutput { index, label })
}

pub fn print_parameters(
    out: &mut impl Write,
    block: &ParameterBlock,
    format: OutputFormat,
) -> CliResult<()> {
    let report = ParameterOutput {
        channels: block
            .channels
            .iter()
            .enumerate()
            .map(|(i, pair)| ChannelOutput {
                channel: i + 1,
                transmit: pair.transmit.as_str(),
                receive: pair.receive.as_str(),
            })
            .collect(),
        transmit_tone: tone_output(block.transmit_tone)?,
        receive_tone: tone_output(block.receive_tone)?,
        squelch: block.squelch,
    };

    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(INTERNAL, format!("serialize parameters: {e}")))?,
        OutputFormat::Text => render_text(&report),
    };
    writeln!(out, "{text}").map_err(|e| io_error("write output", e))
}

fn render_text(report: &ParameterOutput<'_>) -> String {
    let mut lines = vec!["CH  TX        RX".to_string()];
    for ch in &report.channels {
        lines.push(format!("{:>2}  {}  {}", ch.channel, ch.transmit, ch.receive));
    }
    lines.push(format!("TX CTCSS: {}", report.transmit_tone.label));
    lines.push(format!("RX CTCSS: {}", report.receive_tone.label));
    lines.push(format!("Squelch:  {}", report.squelch));
    lines.join("\n")
}

pub fn print_ports(out: &mut impl Write, ports: &[SerialPortInfo]) -> CliResult<()> {
    if ports.is_empty() {
        return writeln!(out, "no serial ports found").map_err(|e| io_error("write output", e));
    }
    for port in ports {
        let id = port.usb_id().unwrap_or_else(|| "-".to_string());
        let product = port.product.as_deref().unwrap_or("");
        writeln!(out, "{:<24} {:<9} {}", port.port, id, product)
            .map_err(|e| io_error("write output", e))?;
    }
    Ok(())
}
