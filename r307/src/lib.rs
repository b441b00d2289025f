//! # r307
//!
//! Rust implementation of the GROW R307 optical fingerprint sensor
//! protocol: framing, checksummed transactions, chunked template transfer,
//! and the capture/match workflows built on top of them.
//!
//! ## Features
//!
//! - Type-safe frame codec with checksum verification at the transaction
//!   boundary
//! - Bounded, policy-driven retry for "finger not there yet" conditions
//! - Chunked template upload/download with strict stream termination
//! - Enrollment and authentication workflows over any [`Transport`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use r307::{Device, SerialConfig};
//!
//! fn main() -> r307::Result<()> {
//!     // Open the sensor with factory-default parameters
//!     let mut device = Device::open(&SerialConfig::new("/dev/ttyUSB0"))?;
//!
//!     // Capture a fresh template; persisting it is the caller's job
//!     let template = device.enroll("alice")?;
//!
//!     // Later: verify a live finger against the stored template
//!     let outcome = device.authenticate("alice", &template)?;
//!     println!("{}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod capture;
pub mod device;
pub mod error;
pub mod matching;
pub mod store;
pub mod transaction;
pub mod transfer;

// Re-exports
pub use cancel::CancelToken;
pub use device::Device;
pub use error::{Error, Result};
pub use store::{MemoryStore, TemplateStore};
pub use transaction::{Ack, RetryPolicy, TransactionError};
pub use transfer::TransferError;

// Re-export protocol and data types
pub use r307_core::{BufferSlot, Command, Frame, FramingError, PacketType, StatusCode};
pub use r307_transport::{available_ports, SerialConfig, SerialTransport, Session, Transport};
pub use r307_types::{MatchOutcome, Template, TEMPLATE_SIZE};
