//! Command/acknowledgement transactions
//!
//! One transaction is a single command frame answered by a single ACK
//! frame. The engine interprets the ACK's confirmation code and applies
//! the one retry rule this protocol has: a status that can clear on its
//! own ("finger not there yet") is retried on a bounded schedule, anything
//! that needs the caller to change something fails immediately. The caller
//! re-prompting a user is a new workflow invocation, never an engine
//! concern.

use std::fmt;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use r307_core::{Command, Frame, FramingError, PacketType, StatusCode};
use r307_transport::Session;

use crate::cancel::CancelToken;

/// Bounded retry schedule for recoverable confirmation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Pause between attempts
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Single attempt, no waiting
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(500))
    }
}

/// Parsed acknowledgement
#[derive(Debug, Clone)]
pub struct Ack {
    /// Confirmation code from the first payload byte
    pub status: StatusCode,

    /// Remaining payload bytes (match score, template count, ...)
    pub body: Bytes,
}

/// Transaction failures
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// ACK frame failed checksum verification; the link corrupted data
    #[error("Corrupt acknowledgement: expected checksum 0x{expected:04X}, received 0x{received:04X}")]
    Corrupt {
        expected: u16,
        received: u16,
    },

    /// A recoverable status persisted past the retry budget
    #[error("Gave up after {attempts} attempts, last status {last}")]
    Exhausted {
        last: StatusCode,
        attempts: u32,
    },

    /// The sensor reported a condition retrying cannot fix
    #[error("Sensor reported {0}")]
    Terminal(StatusCode),

    /// Got a non-ACK frame where an acknowledgement was required
    #[error("Expected an ACK frame, got {0}")]
    UnexpectedFrame(PacketType),

    /// ACK frame carried no confirmation code
    #[error("Acknowledgement payload was empty or too short")]
    MalformedAck,

    /// Cancellation was requested between attempts
    #[error("Cancelled")]
    Cancelled,

    /// Link-level failure
    #[error("Transport error: {0}")]
    Transport(#[from] r307_transport::Error),
}

/// Run one command/ACK round trip
///
/// Verifies the acknowledgement checksum: a mismatch is
/// [`TransactionError::Corrupt`] and is never retried, since it means the
/// link itself is mangling bytes and identical retransmissions prove
/// nothing.
pub fn transact(session: &mut Session, command: Command) -> Result<Ack, TransactionError> {
    trace!(command = %command, "Issuing command");

    let request = Frame::new(PacketType::Command, command.payload());
    session.write_frame(&request)?;

    let reply = session.read_frame()?;

    if let Err(FramingError::ChecksumMismatch { expected, received }) = reply.verify_checksum() {
        return Err(TransactionError::Corrupt { expected, received });
    }

    if reply.packet_type != PacketType::Ack {
        return Err(TransactionError::UnexpectedFrame(reply.packet_type));
    }

    let Some((&code, body)) = reply.payload.split_first() else {
        return Err(TransactionError::MalformedAck);
    };

    let ack = Ack {
        status: StatusCode::from(code),
        body: Bytes::copy_from_slice(body),
    };
    trace!(command = %command, status = %ack.status, "Acknowledged");

    Ok(ack)
}

/// Run a transaction with bounded retry on recoverable statuses
///
/// The cancel token is consulted between attempts only; a single frame
/// exchange always runs to completion or timeout.
pub fn execute(
    session: &mut Session,
    command: Command,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Ack, TransactionError> {
    let mut last = StatusCode::Ok;

    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            debug!(command = %command, "Cancelled before attempt {attempt}");
            return Err(TransactionError::Cancelled);
        }

        let ack = transact(session, command)?;

        match ack.status {
            StatusCode::Ok => {
                if attempt > 1 {
                    debug!(command = %command, attempt, "Succeeded after retries");
                }
                return Ok(ack);
            }
            status if status.is_recoverable() => {
                debug!(
                    command = %command,
                    attempt,
                    max = policy.max_attempts,
                    status = %status,
                    "Recoverable status, will retry"
                );
                last = status;
                if attempt < policy.max_attempts {
                    thread::sleep(policy.retry_delay);
                }
            }
            status => {
                warn!(command = %command, status = %status, "Terminal status");
                return Err(TransactionError::Terminal(status));
            }
        }
    }

    Err(TransactionError::Exhausted {
        last,
        attempts: policy.max_attempts,
    })
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ack[{}](body={} bytes)", self.status, self.body.len())
    }
}
