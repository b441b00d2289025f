//! R307 protocol frame structure and encoding/decoding
//!
//! # Frame Structure
//!
//! ```text
//! ┌──────────┬───────────┬──────────┬──────────┬───────────┬───────────┐
//! │  Start   │  Address  │   Type   │  Length  │  Payload  │ Checksum  │
//! │  2 bytes │  4 bytes  │  1 byte  │  2 bytes │  N bytes  │  2 bytes  │
//! │ (0xEF01) │ (BE u32)  │          │ (BE u16) │           │ (BE u16)  │
//! └──────────┴───────────┴──────────┴──────────┴───────────┴───────────┘
//! ```
//!
//! All multi-byte values are in big-endian format. The length field counts
//! the payload plus the two checksum bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    constants::START_MARKER,
    error::{FramingError, Result},
};

/// Frame packet identifier
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Command from host to sensor
    Command = 0x01,

    /// Data chunk of a multi-frame transfer
    Data = 0x02,

    /// Acknowledgement from sensor (first payload byte is the status)
    Ack = 0x07,

    /// Final data chunk, terminates a transfer
    EndOfData = 0x08,
}

impl PacketType {
    /// Get packet type name
    pub fn name(self) -> &'static str {
        match self {
            Self::Command => "COMMAND",
            Self::Data => "DATA",
            Self::Ack => "ACK",
            Self::EndOfData => "END_OF_DATA",
        }
    }
}

impl From<PacketType> for u8 {
    fn from(pt: PacketType) -> u8 {
        pt as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = FramingError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::Data),
            0x07 => Ok(Self::Ack),
            0x08 => Ok(Self::EndOfData),
            _ => Err(FramingError::InvalidPacketType(value)),
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// One unit of the R307 wire protocol
///
/// A frame does not store the device address; the address is supplied at
/// encode/decode time by the owning session, so the same frame value can be
/// replayed against any configured device.
///
/// # Examples
///
/// ```
/// use r307_core::{Frame, PacketType};
/// use r307_core::constants::DEFAULT_ADDRESS;
///
/// let frame = Frame::new(PacketType::Command, vec![0x01]);
/// let encoded = frame.encode(DEFAULT_ADDRESS);
///
/// let decoded = Frame::decode(&encoded, DEFAULT_ADDRESS).unwrap();
/// assert_eq!(decoded.packet_type, PacketType::Command);
/// decoded.verify_checksum().unwrap();
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Packet identifier
    pub packet_type: PacketType,

    /// Frame payload (instruction/status/template chunk)
    pub payload: Bytes,

    /// Checksum as carried on the wire
    ///
    /// Computed for locally built frames; received verbatim for decoded
    /// ones. Decoding never verifies it — call [`Frame::verify_checksum`]
    /// where a corrupt frame must be rejected.
    checksum: u16,
}

impl Frame {
    /// Fixed header size: start marker + address + type + length field
    pub const HEADER_SIZE: usize = 9;

    /// Maximum payload size representable by the length field
    pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize - 2;

    /// Create a frame with a freshly computed checksum
    pub fn new(packet_type: PacketType, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let checksum = checksum::calculate(
            packet_type.into(),
            Self::length_field_for(payload.len()),
            &payload,
        );

        Self {
            packet_type,
            payload,
            checksum,
        }
    }

    /// Wire length field for a payload of `len` bytes (payload + checksum)
    fn length_field_for(len: usize) -> u16 {
        (len + 2) as u16
    }

    /// This frame's wire length field
    pub fn length_field(&self) -> u16 {
        Self::length_field_for(self.payload.len())
    }

    /// Checksum as carried on the wire
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Checksum recomputed from the frame contents
    pub fn expected_checksum(&self) -> u16 {
        checksum::calculate(self.packet_type.into(), self.length_field(), &self.payload)
    }

    /// Reject the frame if its carried checksum does not match its contents
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::ChecksumMismatch`] on a corrupt frame.
    pub fn verify_checksum(&self) -> Result<()> {
        let expected = self.expected_checksum();
        if expected != self.checksum {
            return Err(FramingError::ChecksumMismatch {
                expected,
                received: self.checksum,
            });
        }
        Ok(())
    }

    /// Encode the frame for the device at `address`
    ///
    /// A pure, total function: any frame value encodes successfully.
    pub fn encode(&self, address: u32) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u16(START_MARKER);
        buf.put_u32(address);
        buf.put_u8(self.packet_type.into());
        buf.put_u16(self.length_field());
        buf.put_slice(&self.payload);
        buf.put_u16(self.checksum);

        buf
    }

    /// Decode a frame from a complete frame image
    ///
    /// The carried checksum is retained but **not** verified here; whether a
    /// mismatch is fatal depends on transaction context the codec does not
    /// have.
    ///
    /// # Errors
    ///
    /// - [`FramingError::BadStartMarker`] if the two marker bytes are wrong
    /// - [`FramingError::BadAddress`] on a device address mismatch
    /// - [`FramingError::InvalidPacketType`] on an unknown type byte
    /// - [`FramingError::Truncated`] if the buffer holds fewer bytes than
    ///   the length field declares
    pub fn decode(buf: &[u8], expected_address: u32) -> Result<Self> {
        let mut buf = buf;

        if buf.len() < Self::HEADER_SIZE {
            return Err(FramingError::Truncated {
                declared: Self::HEADER_SIZE,
                available: buf.len(),
            });
        }

        let marker = buf.get_u16();
        if marker != START_MARKER {
            return Err(FramingError::BadStartMarker { actual: marker });
        }

        let address = buf.get_u32();
        if address != expected_address {
            return Err(FramingError::BadAddress {
                expected: expected_address,
                actual: address,
            });
        }

        let packet_type = PacketType::try_from(buf.get_u8())?;
        let declared = buf.get_u16() as usize;

        if declared < 2 || buf.remaining() < declared {
            return Err(FramingError::Truncated {
                declared,
                available: buf.remaining(),
            });
        }

        let payload = Bytes::copy_from_slice(&buf[..declared - 2]);
        buf.advance(declared - 2);
        let received_checksum = buf.get_u16();

        Ok(Self {
            packet_type,
            payload,
            checksum: received_checksum,
        })
    }

    /// Total encoded size in bytes
    pub fn size(&self) -> usize {
        Self::HEADER_SIZE + self.payload.len() + 2
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("packet_type", &self.packet_type)
            .field("payload_len", &self.payload.len())
            .field("checksum", &format!("0x{:04X}", self.checksum))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}](len={})", self.packet_type, self.payload.len())
    }
}
