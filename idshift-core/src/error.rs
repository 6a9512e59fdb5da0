//! Error types for idshift

use thiserror::Error;

/// Result type alias for idshift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for idshift
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// DUID type outside the four RFC 8415 encodings
    #[error("Unsupported DUID type: {0}")]
    UnsupportedDuidType(u16),

    /// Host OS is not one of the known platform families
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Caller did not supply an interface name
    #[error("No interface name supplied")]
    MissingInterface,

    /// Interface exists but no MAC address could be read from it
    #[error("No MAC address available for interface '{0}'")]
    InterfaceMacUnavailable(String),

    /// Malformed MAC address text
    #[error("Invalid MAC address '{0}'")]
    InvalidMac(String),

    /// Malformed hex text
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Original-value store failure
    #[error("Original-value store error: {0}")]
    Store(String),

    /// Native platform mechanism failure during a required step.
    /// `step` names the operation so "could not read current DUID" and
    /// "could not write new DUID" are distinguishable to the operator.
    #[error("Platform mechanism failed during {step}: {reason}")]
    Mechanism { step: String, reason: String },

    /// External command execution error
    #[error("Command execution failed: {0}")]
    Command(String),
}

impl Error {
    /// Create a store error with a custom message
    pub fn store<S: Into<String>>(msg: S) -> Self {
        Error::Store(msg.into())
    }

    /// Create a mechanism error naming the failed step
    pub fn mechanism(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Mechanism {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Create a command error with a custom message
    pub fn command<S: Into<String>>(msg: S) -> Self {
        Error::Command(msg.into())
    }
}
