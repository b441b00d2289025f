//! Match result structures

use std::fmt;

/// Result of one on-device match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Whether the sensor judged the two buffers to be the same finger
    pub matched: bool,

    /// Sensor-reported match score
    ///
    /// Meaningful only relative to an application-chosen threshold; zero
    /// when `matched` is false.
    pub confidence: u16,
}

impl MatchOutcome {
    /// A positive match with the given score
    pub fn matched(confidence: u16) -> Self {
        Self {
            matched: true,
            confidence,
        }
    }

    /// A rejection
    pub fn not_matched() -> Self {
        Self {
            matched: false,
            confidence: 0,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched {
            write!(f, "matched (confidence {})", self.confidence)
        } else {
            write!(f, "not matched")
        }
    }
}
