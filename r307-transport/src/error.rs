//! Transport errors

use std::io;

use r307_core::FramingError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port could not be opened
    #[error("Failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Read deadline elapsed before the requested bytes arrived
    #[error("Read timed out: wanted {wanted} bytes, got {got}")]
    ReadTimeout {
        wanted: usize,
        got: usize,
    },

    /// Frame-level fault while reading or validating a frame
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
