//! Serial link to the sensor
//!
//! The R307 speaks 57600 baud 8N1 over UART. The port handle is owned
//! exclusively by one [`SerialTransport`] and released when it drops, on
//! every exit path.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, trace};

use r307_core::constants::{DEFAULT_ADDRESS, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS};

use crate::{error::*, Transport};

/// Serial link parameters
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use r307_transport::SerialConfig;
///
/// let config = SerialConfig::new("/dev/ttyUSB0")
///     .with_read_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Port name, e.g. "/dev/ttyUSB0" or "COM3"
    pub port: String,

    /// UART speed (factory default 57600)
    pub baud_rate: u32,

    /// Deadline for each frame read
    pub read_timeout: Duration,

    /// Device address (factory default broadcast)
    pub address: u32,
}

impl SerialConfig {
    /// Create a config with factory-default sensor parameters
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            address: DEFAULT_ADDRESS,
        }
    }

    /// Set the UART speed
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read deadline
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Set a non-broadcast device address
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = address;
        self
    }
}

/// Exclusive, blocking serial link
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    name: String,
    read_timeout: Duration,
}

impl SerialTransport {
    /// Open and configure the port (8 data bits, no parity, 1 stop bit,
    /// no flow control)
    pub fn open(config: &SerialConfig) -> Result<Self> {
        debug!("Opening serial port {} at {} baud", config.port, config.baud_rate);

        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| Error::Open {
                port: config.port.clone(),
                source,
            })?;

        Ok(Self {
            port,
            name: config.port.clone(),
            read_timeout: config.read_timeout,
        })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        trace!("{} <- {} bytes", self.name, data.len());

        self.port.write_all(data)?;
        self.port.flush()?;

        Ok(())
    }

    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;

        while filled < buf.len() {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Error::ReadTimeout {
                        wanted: buf.len(),
                        got: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Err(Error::ReadTimeout {
                        wanted: buf.len(),
                        got: filled,
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        trace!("{} -> {} bytes", self.name, buf.len());
        Ok(())
    }

    fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        debug!("Releasing serial port {}", self.name);
    }
}

/// List candidate serial port names, sorted for stable presentation
pub fn available_ports() -> Vec<String> {
    let mut names: Vec<String> = serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(|info| info.port_name)
        .collect();

    names.sort();
    names.dedup();
    names
}
