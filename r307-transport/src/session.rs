//! Frame-level session over a transport
//!
//! A session pairs a byte-level [`Transport`] with the configured device
//! address and moves whole frames across it. The staged reads mirror the
//! frame layout, so the read timeout bounds every stage and a dead sensor
//! surfaces as a timeout rather than a hang.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use r307_core::{Frame, FramingError};

use crate::{error::*, Transport};

/// Exclusive frame-level connection to one sensor
///
/// Owns its transport for its whole lifetime; dropping the session releases
/// the underlying link. Callers must not interleave frames from concurrent
/// workflows — the sensor has no frame IDs, so request/response ordering is
/// the only thing keeping the conversation coherent.
pub struct Session {
    transport: Box<dyn Transport>,
    address: u32,
}

impl Session {
    /// Wrap a transport, speaking to the device at `address`
    pub fn new(transport: Box<dyn Transport>, address: u32) -> Self {
        Self { transport, address }
    }

    /// Configured device address
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Link label for log messages
    pub fn describe(&self) -> String {
        self.transport.describe()
    }

    /// Encode and write one frame
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let encoded = frame.encode(self.address);
        trace!(
            link = %self.transport.describe(),
            frame = %frame,
            bytes = %hex::encode(&encoded[..encoded.len().min(16)]),
            "Sending frame"
        );

        self.transport.send(&encoded)
    }

    /// Read one complete frame
    ///
    /// The header stage failing its deadline is [`FramingError::Timeout`]
    /// (no frame arrived); the body stage coming up short against the
    /// declared length is [`FramingError::Truncated`]. The frame's checksum
    /// is carried through unverified — see [`Frame::verify_checksum`].
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut header = [0u8; Frame::HEADER_SIZE];
        self.transport.recv_exact(&mut header).map_err(|e| match e {
            Error::ReadTimeout { .. } => Error::Framing(FramingError::Timeout {
                millis: self.transport.read_timeout().as_millis() as u64,
            }),
            other => other,
        })?;

        // Validate the fixed header fields before trusting the declared
        // length; a bad marker means the stream is out of sync and reading
        // a garbage-sized body would only make that worse.
        let marker = u16::from_be_bytes([header[0], header[1]]);
        if marker != r307_core::constants::START_MARKER {
            return Err(FramingError::BadStartMarker { actual: marker }.into());
        }

        let address = u32::from_be_bytes([header[2], header[3], header[4], header[5]]);
        if address != self.address {
            return Err(FramingError::BadAddress {
                expected: self.address,
                actual: address,
            }
            .into());
        }

        // Last two header bytes are the declared length (payload + checksum)
        let declared = u16::from_be_bytes([header[7], header[8]]) as usize;

        let mut body = vec![0u8; declared];
        self.transport.recv_exact(&mut body).map_err(|e| match e {
            Error::ReadTimeout { got, .. } => Error::Framing(FramingError::Truncated {
                declared,
                available: got,
            }),
            other => other,
        })?;

        let mut image = BytesMut::with_capacity(Frame::HEADER_SIZE + declared);
        image.put_slice(&header);
        image.put_slice(&body);

        let frame = Frame::decode(&image, self.address)?;
        trace!(
            link = %self.transport.describe(),
            frame = %frame,
            "Received frame"
        );

        Ok(frame)
    }
}
