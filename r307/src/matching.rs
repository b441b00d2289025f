//! Match workflow
//!
//! Verifies a live finger against a previously-stored template: load the
//! stored template into CharBuffer1, capture the live finger into
//! CharBuffer2, then let the sensor compare the two. The slot assignment
//! is fixed by construction — the two operands of the match instruction
//! must never share a register, and using both [`BufferSlot`] variants
//! here makes that impossible to get wrong at a call site.

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, info};

use r307_core::{BufferSlot, Command, StatusCode};
use r307_transport::Session;
use r307_types::{MatchOutcome, Template};

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::transaction::{self, RetryPolicy, TransactionError};
use crate::transfer;

/// Workflow phases, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    LoadingStored,
    CapturingLive,
    ConvertingLive,
    Matching,
}

/// Drive a full match against `stored`, returning the sensor's verdict
///
/// A sensor-reported non-match is a successful run with a negative
/// [`MatchOutcome`], not an error; errors mean the comparison never
/// happened.
pub fn run(
    session: &mut Session,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    stored: &Template,
) -> Result<MatchOutcome, Error> {
    let mut state = State::Idle;

    loop {
        debug!(state = ?state, "Match workflow");

        state = match state {
            State::Idle => State::LoadingStored,

            State::LoadingStored => {
                transfer::download(session, policy, cancel, BufferSlot::Stored, stored)?;
                State::CapturingLive
            }

            State::CapturingLive => {
                transaction::execute(session, Command::CaptureImage, policy, cancel)?;
                State::ConvertingLive
            }

            State::ConvertingLive => {
                transaction::execute(
                    session,
                    Command::ConvertImage(BufferSlot::Live),
                    policy,
                    cancel,
                )?;
                State::Matching
            }

            State::Matching => {
                let outcome = match_buffers(session)?;
                info!(outcome = %outcome, "Match complete");
                return Ok(outcome);
            }
        };
    }
}

/// Issue the match instruction once and interpret its verdict
///
/// No retry here: a NO_MATCH answer is an answer, and re-running the
/// comparison against the same capture cannot change it.
fn match_buffers(session: &mut Session) -> Result<MatchOutcome, Error> {
    let ack = transaction::transact(session, Command::MatchTemplates)?;

    match ack.status {
        StatusCode::Ok => {
            if ack.body.len() < 2 {
                return Err(TransactionError::MalformedAck.into());
            }
            let confidence = BigEndian::read_u16(&ack.body[..2]);
            Ok(MatchOutcome::matched(confidence))
        }
        StatusCode::NoMatch => Ok(MatchOutcome::not_matched()),
        status => Err(TransactionError::Terminal(status).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::time::Duration;

    use r307_core::constants::DEFAULT_ADDRESS;
    use r307_core::{Frame, PacketType};
    use r307_transport::Transport;
    use r307_types::TEMPLATE_SIZE;

    /// Sensor double for the match path: accepts the template download,
    /// captures cleanly, and answers Match with a scripted verdict
    struct MatchSensor {
        verdict: u8,
        confidence: u16,
        inbox: VecDeque<u8>,
    }

    impl MatchSensor {
        fn matching(confidence: u16) -> Self {
            Self {
                verdict: 0x00,
                confidence,
                inbox: VecDeque::new(),
            }
        }

        fn rejecting() -> Self {
            Self {
                verdict: 0x08,
                confidence: 0,
                inbox: VecDeque::new(),
            }
        }

        fn ack_ok(&mut self) {
            let frame = Frame::new(PacketType::Ack, vec![0x00]);
            self.inbox.extend(frame.encode(DEFAULT_ADDRESS));
        }
    }

    impl Transport for MatchSensor {
        fn send(&mut self, data: &[u8]) -> r307_transport::Result<()> {
            // Template data frames are consumed without a reply
            if data.get(6) != Some(&(PacketType::Command as u8)) {
                return Ok(());
            }

            match data.get(9).copied() {
                Some(0x03) => {
                    let mut payload = vec![self.verdict];
                    payload.extend_from_slice(&self.confidence.to_be_bytes());
                    let frame = Frame::new(PacketType::Ack, payload);
                    self.inbox.extend(frame.encode(DEFAULT_ADDRESS));
                }
                _ => self.ack_ok(),
            }
            Ok(())
        }

        fn recv_exact(&mut self, buf: &mut [u8]) -> r307_transport::Result<()> {
            for (i, slot) in buf.iter_mut().enumerate() {
                match self.inbox.pop_front() {
                    Some(byte) => *slot = byte,
                    None => {
                        return Err(r307_transport::Error::ReadTimeout {
                            wanted: buf.len(),
                            got: i,
                        })
                    }
                }
            }
            Ok(())
        }

        fn read_timeout(&self) -> Duration {
            Duration::from_secs(2)
        }

        fn describe(&self) -> String {
            "match-double".into()
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[test]
    fn test_match_positive_verdict() {
        let transport = MatchSensor::matching(180);
        let mut session = Session::new(Box::new(transport), DEFAULT_ADDRESS);

        let stored = Template::normalized(vec![0x33; TEMPLATE_SIZE]);
        let outcome = run(&mut session, &fast_policy(), &CancelToken::new(), &stored).unwrap();

        assert!(outcome.matched);
        assert_eq!(outcome.confidence, 180);
    }

    #[test]
    fn test_match_negative_verdict() {
        let transport = MatchSensor::rejecting();
        let mut session = Session::new(Box::new(transport), DEFAULT_ADDRESS);

        let stored = Template::normalized(vec![0x33; TEMPLATE_SIZE]);
        let outcome = run(&mut session, &fast_policy(), &CancelToken::new(), &stored).unwrap();

        assert!(!outcome.matched);
        assert_eq!(outcome.confidence, 0);
    }

    #[test]
    fn test_match_confidence_is_big_endian() {
        let transport = MatchSensor::matching(0x0102);
        let mut session = Session::new(Box::new(transport), DEFAULT_ADDRESS);

        let stored = Template::normalized(vec![0x33; TEMPLATE_SIZE]);
        let outcome = run(&mut session, &fast_policy(), &CancelToken::new(), &stored).unwrap();

        assert_eq!(outcome.confidence, 258);
    }

    #[test]
    fn test_match_unexpected_status_is_terminal() {
        let mut transport = MatchSensor::matching(0);
        transport.verdict = 0x15;
        let mut session = Session::new(Box::new(transport), DEFAULT_ADDRESS);

        let stored = Template::normalized(vec![0x33; TEMPLATE_SIZE]);
        let result = run(&mut session, &fast_policy(), &CancelToken::new(), &stored);

        assert!(matches!(
            result,
            Err(Error::Transaction(TransactionError::Terminal(
                StatusCode::InvalidImage
            )))
        ));
    }
}
