//! Serial port scanner
//!
//! Lists candidate ports for the module, mostly USB-to-UART bridges.

use serialport::{available_ports, SerialPortType};
use tracing::{debug, info};

use crate::error::LinkError;

/// Information about a serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., /dev/ttyUSB0, COM3)
    pub port: String,
    /// USB Vendor ID (if USB)
    pub vid: Option<u16>,
    /// USB Product ID (if USB)
    pub pid: Option<u16>,
    /// USB product string
    pub product: Option<String>,
}

impl SerialPortInfo {
    fn from_serialport(name: String, port_type: &SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => Self {
                port: name,
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                product: usb.product.clone(),
            },
            _ => Self {
                port: name,
                vid: None,
                pid: None,
                product: None,
            },
        }
    }

    /// `VID:PID` string for USB ports
    pub fn usb_id(&self) -> Option<String> {
        match (self.vid, self.pid) {
            (Some(vid), Some(pid)) => Some(format!("{vid:04X}:{pid:04X}")),
            _ => None,
        }
    }
}

/// Serial port scanner
pub struct PortScanner {
    skip_patterns: Vec<String>,
}

impl PortScanner {
    /// Scanner that skips Bluetooth and debug ports
    pub fn new() -> Self {
        Self::with_skip_patterns(vec!["Bluetooth".to_string(), "debug".to_string()])
    }

    /// Scanner skipping ports whose name contains any of `patterns`
    pub fn with_skip_patterns(patterns: Vec<String>) -> Self {
        Self {
            skip_patterns: patterns,
        }
    }

    /// Enumerate all available serial ports
    pub fn enumerate_ports(&self) -> Result<Vec<SerialPortInfo>, LinkError> {
        let ports = available_ports().map_err(|e| LinkError::EnumerationFailed(e.to_string()))?;

        let result: Vec<_> = ports
            .into_iter()
            .map(|p| SerialPortInfo::from_serialport(p.port_name, &p.port_type))
            .filter(|p| !self.should_skip_port(p))
            .collect();

        info!("Found {} serial port(s)", result.len());
        for port in &result {
            debug!("  {} - {}", port.port, port.product.as_deref().unwrap_or("Unknown"));
        }
        Ok(result)
    }

    fn should_skip_port(&self, port: &SerialPortInfo) -> bool {
        self.skip_patterns
            .iter()
            .any(|pattern| port.port.contains(pattern.as_str()))
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}
