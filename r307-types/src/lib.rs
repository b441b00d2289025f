//! # r307-types
//!
//! Plain data types shared across the r307 crates: the fixed-size
//! fingerprint template buffer and the match outcome handed back to
//! callers.

pub mod outcome;
pub mod template;

pub use outcome::MatchOutcome;
pub use template::{Template, TEMPLATE_SIZE};
