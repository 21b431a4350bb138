use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// The network wait point an operation was blocked on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Send,
    Receive,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Send => write!(f, "send"),
            Operation::Receive => write!(f, "receive"),
        }
    }
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Timed out on {op} after {after:?}")]
    Timeout { op: Operation, after: Duration },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl HarnessError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HarnessError::Timeout { .. })
    }
}
