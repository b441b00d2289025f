//! # r307-core
//!
//! Core protocol implementation for the GROW R307 optical fingerprint
//! sensor.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Instruction and confirmation-code definitions
//! - Protocol constants
//!
//! Everything here is a pure transform over byte buffers; the serial link
//! itself lives in `r307-transport`.

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod status;

pub use command::{BufferSlot, Command};
pub use error::{FramingError, Result};
pub use packet::{Frame, PacketType};
pub use status::StatusCode;
