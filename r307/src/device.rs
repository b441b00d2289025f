//! High-level device interface

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, info};

use r307_core::Command;
use r307_transport::{SerialConfig, SerialTransport, Session, Transport};
use r307_types::{MatchOutcome, Template};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::transaction::{self, RetryPolicy, TransactionError};
use crate::{capture, matching};

/// R307 fingerprint sensor
///
/// High-level interface for enrolling and authenticating fingerprints.
/// Owns its serial link exclusively for its whole lifetime; the port is
/// released when the device is dropped, on every exit path. One physical
/// sensor admits one in-flight transaction, so callers running multiple
/// workflows must serialize access themselves.
///
/// # Examples
///
/// ```no_run
/// use r307::{Device, SerialConfig};
///
/// fn main() -> r307::Result<()> {
///     let mut device = Device::open(&SerialConfig::new("/dev/ttyUSB0"))?;
///
///     let template = device.enroll("alice")?;
///     println!("Enrolled, template is {} bytes", template.len());
///
///     let outcome = device.authenticate("alice", &template)?;
///     println!("Authentication: {}", outcome);
///
///     Ok(())
/// }
/// ```
pub struct Device {
    session: Session,
    policy: RetryPolicy,
    cancel: CancelToken,
}

impl Device {
    /// Open the sensor on a serial port
    pub fn open(config: &SerialConfig) -> Result<Self> {
        info!("Connecting to sensor on {}...", config.port);

        let transport = SerialTransport::open(config)?;
        Ok(Self::with_transport(Box::new(transport), config.address))
    }

    /// Build a device over an arbitrary transport
    ///
    /// This is the seam collaborators and tests inject doubles through.
    pub fn with_transport(transport: Box<dyn Transport>, address: u32) -> Self {
        Self {
            session: Session::new(transport, address),
            policy: RetryPolicy::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Set the retry schedule for recoverable sensor statuses
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Token for aborting workflows between attempts
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Capture a fresh fingerprint and return its template
    ///
    /// The caller persists the template; this library holds no biometric
    /// state between calls. `user_id` is only a log label here — which
    /// finger belongs to whom is the store's business.
    pub fn enroll(&mut self, user_id: &str) -> Result<Template> {
        info!(user = user_id, link = %self.session.describe(), "Enrolling fingerprint");

        let template = capture::run(&mut self.session, &self.policy, &self.cancel)?;

        info!(user = user_id, "Enrollment capture complete");
        Ok(template)
    }

    /// Verify a live finger against a stored template
    pub fn authenticate(&mut self, user_id: &str, stored: &Template) -> Result<MatchOutcome> {
        info!(user = user_id, link = %self.session.describe(), "Authenticating fingerprint");

        let outcome = matching::run(&mut self.session, &self.policy, &self.cancel, stored)?;

        info!(user = user_id, outcome = %outcome, "Authentication finished");
        Ok(outcome)
    }

    /// Number of templates in the sensor's on-flash library
    pub fn template_count(&mut self) -> Result<u16> {
        debug!("Reading template count");

        let ack = transaction::execute(
            &mut self.session,
            Command::TemplateCount,
            &self.policy,
            &self.cancel,
        )?;

        if ack.body.len() < 2 {
            return Err(TransactionError::MalformedAck.into());
        }
        Ok(BigEndian::read_u16(&ack.body[..2]))
    }
}
