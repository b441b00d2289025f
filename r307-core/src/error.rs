//! Error types for r307-core

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, FramingError>;

/// Wire-level framing faults
///
/// Everything this crate can reject is transport corruption of one kind or
/// another; none of it is retried automatically. The caller decides whether
/// to resynchronize or reopen the link.
#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    /// Frame does not begin with the fixed start marker
    #[error("Bad start marker: expected 0xEF01, got 0x{actual:04X}")]
    BadStartMarker {
        actual: u16,
    },

    /// Frame addressed to a different device
    #[error("Address mismatch: expected 0x{expected:08X}, got 0x{actual:08X}")]
    BadAddress {
        expected: u32,
        actual: u32,
    },

    /// Unknown packet identifier byte
    #[error("Invalid packet type: 0x{0:02X}")]
    InvalidPacketType(u8),

    /// Byte source ended before the declared frame length
    #[error("Truncated frame: {declared} bytes declared, {available} available")]
    Truncated {
        declared: usize,
        available: usize,
    },

    /// Read deadline elapsed before a frame completed
    #[error("Timed out after {millis}ms waiting for a frame")]
    Timeout {
        millis: u64,
    },

    /// Carried checksum does not match the frame contents
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },
}
