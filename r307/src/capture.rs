//! Capture workflow
//!
//! Acquires a fresh template from a live finger:
//! scan the prism, characterize the image into CharBuffer1, then read the
//! buffer back to the host. Scanning is the only stage that retries — a
//! finger arriving late is normal — while characterization faults mean the
//! placement itself was bad and only the caller can fix that.

use tracing::{debug, info};

use r307_core::{BufferSlot, Command};
use r307_transport::Session;
use r307_types::Template;

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::transaction::{self, RetryPolicy};
use crate::transfer;

/// Workflow phases, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Capturing,
    Converting,
    Uploading,
}

/// Drive a full capture, returning the normalized template
///
/// Runs `Idle → Capturing → Converting → Uploading` and stops at the first
/// failed stage; the sensor is left with the capture in CharBuffer1, which
/// the next workflow simply overwrites.
pub fn run(
    session: &mut Session,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Template, Error> {
    let mut state = State::Idle;

    loop {
        debug!(state = ?state, "Capture workflow");

        state = match state {
            State::Idle => State::Capturing,

            State::Capturing => {
                transaction::execute(session, Command::CaptureImage, policy, cancel)?;
                State::Converting
            }

            State::Converting => {
                transaction::execute(
                    session,
                    Command::ConvertImage(BufferSlot::Stored),
                    policy,
                    cancel,
                )?;
                State::Uploading
            }

            State::Uploading => {
                let template = transfer::upload(session, policy, cancel, BufferSlot::Stored)?;
                info!(bytes = template.len(), "Capture complete");
                return Ok(template);
            }
        };
    }
}
