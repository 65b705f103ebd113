//! Acknowledgment messages written back to the command sender
//!
//! Every inbound message produces exactly one [`Ack`]; maneuver stage
//! completions produce additional announcement lines of the same shape.

use serde::{Deserialize, Serialize};

use crate::now_ms;

/// One acknowledgment or announcement line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
    pub timestamp: u64,
}

impl Ack {
    /// Acknowledge an accepted command
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: now_ms(),
        }
    }

    /// Acknowledge a rejected command with a reason
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            timestamp: now_ms(),
        }
    }

    /// Unsolicited announcement (arrival, abort), same shape as an ack
    pub fn announcement(message: impl Into<String>) -> Self {
        Self::accepted(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_and_rejected() {
        let ok = Ack::accepted("Course laid in");
        assert!(ok.success);
        assert_eq!(ok.message, "Course laid in");
        assert!(ok.timestamp > 0);

        let no = Ack::rejected("helm is busy");
        assert!(!no.success);
        assert!(!no.message.is_empty());
    }

    #[test]
    fn test_serializes_flat() {
        let ack = Ack {
            success: true,
            message: "Arrived at Mars".into(),
            timestamp: 42,
        };
        let json = serde_json::to_string(&ack).expect("serialize failed");
        assert_eq!(json, r#"{"success":true,"message":"Arrived at Mars","timestamp":42}"#);
    }
}
