//! Error types for the rustygatt library
//!
//! Protocol-level failures inside the transaction engine are reported as
//! boolean or empty results; the errors here cover API misuse and lookups.

use thiserror::Error;

/// Errors that can occur when working with attribute values and the GATT server
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GattError {
    #[error("No active transaction for connection {0}")]
    NoActiveTransaction(u16),

    #[error("Duplicate attribute handle: {0:#06x}")]
    DuplicateHandle(u16),

    #[error("Unknown connection: {0}")]
    UnknownConnection(u16),

    #[error("Connection already exists: {0}")]
    ConnectionExists(u16),

    #[error("Unknown service: {0}")]
    UnknownService(usize),

    #[error("Unknown profile: {0}")]
    UnknownProfile(usize),

    #[error("Invalid MTU: {0}")]
    InvalidMtu(u16),
}

/// GATT Result type
pub type GattResult<T> = Result<T, GattError>;
