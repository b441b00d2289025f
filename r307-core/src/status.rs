//! Acknowledgement status codes
//!
//! The first payload byte of every ACK frame is a confirmation code. The
//! sensor has many more codes than the enrollment/matching path can
//! trigger; anything outside the known set decodes as [`StatusCode::Unknown`]
//! rather than failing, since an unrecognized code still tells the caller
//! the transaction reached the sensor.

use std::fmt;

/// Sensor confirmation code
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Instruction executed
    Ok,

    /// Sensor could not parse the command frame it received
    PacketReceiveError,

    /// No finger on the prism
    NoFingerPresent,

    /// Finger present but the scan failed
    ImageCaptureFailed,

    /// Image too noisy to characterize
    ImageTooMessy,

    /// Too few feature points in the image
    FeatureExtractionFailed,

    /// Buffer contents do not match
    NoMatch,

    /// No valid image in the image buffer
    InvalidImage,

    /// Any confirmation code outside the known set
    Unknown(u8),
}

impl StatusCode {
    /// Whether the transaction succeeded
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Whether an immediate identical retry can plausibly succeed
    ///
    /// Only "finger not there yet" conditions qualify; everything else needs
    /// the caller to change something (placement, link state) first, so the
    /// engine fails fast on those instead of spinning.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::NoFingerPresent | Self::ImageCaptureFailed)
    }

    /// Get status name
    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::PacketReceiveError => "PACKET_RECEIVE_ERR",
            Self::NoFingerPresent => "NO_FINGER",
            Self::ImageCaptureFailed => "IMAGE_FAIL",
            Self::ImageTooMessy => "IMAGE_MESS",
            Self::FeatureExtractionFailed => "FEATURE_FAIL",
            Self::NoMatch => "NO_MATCH",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Wire value of the code
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::PacketReceiveError => 0x01,
            Self::NoFingerPresent => 0x02,
            Self::ImageCaptureFailed => 0x03,
            Self::ImageTooMessy => 0x06,
            Self::FeatureExtractionFailed => 0x07,
            Self::NoMatch => 0x08,
            Self::InvalidImage => 0x15,
            Self::Unknown(code) => code,
        }
    }
}

impl From<u8> for StatusCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Ok,
            0x01 => Self::PacketReceiveError,
            0x02 => Self::NoFingerPresent,
            0x03 => Self::ImageCaptureFailed,
            0x06 => Self::ImageTooMessy,
            0x07 => Self::FeatureExtractionFailed,
            0x08 => Self::NoMatch,
            0x15 => Self::InvalidImage,
            code => Self::Unknown(code),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.code())
    }
}
