//! Command routing infrastructure
//!
//! This module handles:
//! - Decoding and validating inbound message lines
//! - Dispatching validated commands to intent handlers
//! - Producing exactly one acknowledgment per message

pub mod handlers;
mod router;

pub use router::{CommandRouter, RoutingAuthority};

/// Result of handling one validated command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Accepted { message: String },
    Rejected { message: String },
}

impl CommandOutcome {
    pub fn accepted(message: impl Into<String>) -> Self {
        CommandOutcome::Accepted {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        CommandOutcome::Rejected {
            message: message.into(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, CommandOutcome::Accepted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            CommandOutcome::Accepted { message } | CommandOutcome::Rejected { message } => message,
        }
    }
}

/// Map a helm-machine result onto an outcome
impl From<Result<String, String>> for CommandOutcome {
    fn from(result: Result<String, String>) -> Self {
        match result {
            Ok(message) => CommandOutcome::accepted(message),
            Err(message) => CommandOutcome::rejected(message),
        }
    }
}
