//! Chunked template transfer
//!
//! Templates move between host and sensor as a burst of DATA frames closed
//! by exactly one END_OF_DATA frame. The sensor terminates on the
//! END_OF_DATA marker, not on a byte count, so the final frame is sent even
//! when it carries no bytes.
//!
//! Size normalization happens at the [`Template`] boundary and nowhere
//! else: uploads normalize the reassembled stream, downloads start from an
//! already-normalized value.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use r307_core::constants::TRANSFER_CHUNK_SIZE;
use r307_core::{BufferSlot, Command, Frame, PacketType};
use r307_transport::Session;
use r307_types::Template;

use crate::cancel::CancelToken;
use crate::transaction::{self, RetryPolicy, TransactionError};

/// Transfer failures
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// A frame type that has no business mid-stream arrived
    ///
    /// After this the sensor's framing state is unknown, so the whole
    /// transfer is abandoned; partial template bytes are worthless for
    /// matching.
    #[error("Protocol violation: unexpected {unexpected} frame mid-transfer")]
    ProtocolViolation {
        unexpected: PacketType,
    },

    /// The initiating transaction failed
    #[error("Transfer setup failed: {0}")]
    Transaction(#[from] TransactionError),

    /// Link-level failure while streaming
    #[error("Transport error: {0}")]
    Transport(#[from] r307_transport::Error),
}

/// Read a template out of a sensor buffer slot
///
/// Issues UpChar, then consumes DATA frames until the END_OF_DATA frame
/// closes the stream. Each streamed frame is checksum-verified; template
/// bytes are worthless if the link mangled them.
pub fn upload(
    session: &mut Session,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    slot: BufferSlot,
) -> Result<Template, TransferError> {
    transaction::execute(session, Command::UploadTemplate(slot), policy, cancel)?;

    let mut raw = BytesMut::new();

    loop {
        let frame = session.read_frame()?;
        frame
            .verify_checksum()
            .map_err(r307_transport::Error::from)?;

        match frame.packet_type {
            PacketType::Data => {
                trace!(chunk = frame.payload.len(), "Template chunk");
                raw.extend_from_slice(&frame.payload);
            }
            PacketType::EndOfData => {
                raw.extend_from_slice(&frame.payload);
                break;
            }
            unexpected => {
                return Err(TransferError::ProtocolViolation { unexpected });
            }
        }
    }

    debug!(slot = %slot, bytes = raw.len(), "Template uploaded");
    Ok(Template::normalized(raw))
}

/// Write a template into a sensor buffer slot
///
/// Issues DownChar; once acknowledged, streams the template as DATA frames
/// with the final chunk in an END_OF_DATA frame.
pub fn download(
    session: &mut Session,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    slot: BufferSlot,
    template: &Template,
) -> Result<(), TransferError> {
    transaction::execute(session, Command::DownloadTemplate(slot), policy, cancel)?;

    for frame in chunk_frames(template.as_bytes()) {
        session.write_frame(&frame)?;
    }

    debug!(slot = %slot, bytes = template.len(), "Template downloaded");
    Ok(())
}

/// Split a buffer into the transfer frame sequence
///
/// Every full chunk becomes a DATA frame; the remainder — empty when the
/// length is an exact multiple of the chunk size — always becomes the
/// single closing END_OF_DATA frame.
pub(crate) fn chunk_frames(data: &[u8]) -> Vec<Frame> {
    let mut chunks = data.chunks_exact(TRANSFER_CHUNK_SIZE);

    let mut frames: Vec<Frame> = chunks
        .by_ref()
        .map(|chunk| Frame::new(PacketType::Data, Bytes::copy_from_slice(chunk)))
        .collect();

    frames.push(Frame::new(
        PacketType::EndOfData,
        Bytes::copy_from_slice(chunks.remainder()),
    ));

    frames
}
