//! Errors raised by core types.

use std::fmt;

/// Why a [`ConnectionGuard`](crate::ConnectionGuard) could not disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// The slot was already removed.
    InvalidConnection,
    /// The signal no longer exists.
    SignalDropped,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidConnection => "connection already removed",
            Self::SignalDropped => "signal no longer exists",
        })
    }
}

impl std::error::Error for SignalError {}

pub type Result<T> = std::result::Result<T, SignalError>;
