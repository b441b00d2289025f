//! R307 instruction definitions
//!
//! Commands travel in the payload of a [`PacketType::Command`] frame: one
//! instruction byte, optionally followed by a buffer-slot byte.
//!
//! [`PacketType::Command`]: crate::packet::PacketType::Command

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// On-device template buffer
///
/// The sensor has two scratch registers. The match instruction compares
/// their contents, so a stored template and a live capture must never share
/// a slot; keeping the registers as a closed two-variant enum makes the
/// distinction visible at the call site instead of being a magic `1` or `2`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    /// CharBuffer1, used for templates loaded from the host
    Stored,

    /// CharBuffer2, used for live captures
    Live,
}

impl BufferSlot {
    /// Wire identifier of the slot
    pub const fn id(self) -> u8 {
        match self {
            Self::Stored => 1,
            Self::Live => 2,
        }
    }
}

impl fmt::Display for BufferSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharBuffer{}", self.id())
    }
}

/// Protocol instructions
///
/// The subset of the R307 instruction set needed for enrollment and
/// authentication. Slot-addressed instructions carry their target register
/// in the variant, so a command value is always complete and encodable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Scan the prism and store the raw image (GenImg)
    CaptureImage,

    /// Generate a character file from the image into a slot (Img2Tz)
    ConvertImage(BufferSlot),

    /// Compare the two buffer slots, reporting a match score (Match)
    MatchTemplates,

    /// Count templates in the sensor's flash library (TempleteNum)
    TemplateCount,

    /// Stream a slot's template up to the host (UpChar)
    UploadTemplate(BufferSlot),

    /// Stream a template from the host down into a slot (DownChar)
    DownloadTemplate(BufferSlot),
}

impl Command {
    /// Instruction code byte
    pub const fn code(self) -> u8 {
        match self {
            Self::CaptureImage => 0x01,
            Self::ConvertImage(_) => 0x02,
            Self::MatchTemplates => 0x03,
            Self::UploadTemplate(_) => 0x08,
            Self::DownloadTemplate(_) => 0x09,
            Self::TemplateCount => 0x1D,
        }
    }

    /// Buffer slot argument, for instructions that take one
    pub const fn slot(self) -> Option<BufferSlot> {
        match self {
            Self::ConvertImage(slot)
            | Self::UploadTemplate(slot)
            | Self::DownloadTemplate(slot) => Some(slot),
            Self::CaptureImage | Self::MatchTemplates | Self::TemplateCount => None,
        }
    }

    /// Build the command-frame payload: instruction byte + optional slot byte
    pub fn payload(self) -> Bytes {
        let mut buf = BytesMut::with_capacity(2);
        buf.put_u8(self.code());
        if let Some(slot) = self.slot() {
            buf.put_u8(slot.id());
        }
        buf.freeze()
    }

    /// Get instruction name
    pub fn name(self) -> &'static str {
        match self {
            Self::CaptureImage => "GenImg",
            Self::ConvertImage(_) => "Img2Tz",
            Self::MatchTemplates => "Match",
            Self::TemplateCount => "TempleteNum",
            Self::UploadTemplate(_) => "UpChar",
            Self::DownloadTemplate(_) => "DownChar",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot() {
            Some(slot) => write!(f, "{}(0x{:02X}, {})", self.name(), self.code(), slot),
            None => write!(f, "{}(0x{:02X})", self.name(), self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::CaptureImage.code(), 0x01);
        assert_eq!(Command::ConvertImage(BufferSlot::Stored).code(), 0x02);
        assert_eq!(Command::MatchTemplates.code(), 0x03);
        assert_eq!(Command::UploadTemplate(BufferSlot::Stored).code(), 0x08);
        assert_eq!(Command::DownloadTemplate(BufferSlot::Live).code(), 0x09);
        assert_eq!(Command::TemplateCount.code(), 0x1D);
    }

    #[test]
    fn test_slot_ids() {
        assert_eq!(BufferSlot::Stored.id(), 1);
        assert_eq!(BufferSlot::Live.id(), 2);
    }

    #[test]
    fn test_payload_without_slot() {
        assert_eq!(Command::CaptureImage.payload().as_ref(), &[0x01]);
        assert_eq!(Command::MatchTemplates.payload().as_ref(), &[0x03]);
    }

    #[test]
    fn test_payload_with_slot() {
        assert_eq!(
            Command::ConvertImage(BufferSlot::Live).payload().as_ref(),
            &[0x02, 0x02]
        );
        assert_eq!(
            Command::UploadTemplate(BufferSlot::Stored).payload().as_ref(),
            &[0x08, 0x01]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::CaptureImage.to_string(), "GenImg(0x01)");
        assert_eq!(
            Command::DownloadTemplate(BufferSlot::Stored).to_string(),
            "DownChar(0x09, CharBuffer1)"
        );
    }
}
