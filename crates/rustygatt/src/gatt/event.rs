//! GATT server events and responses

use super::constants::{ATT_EXEC_WRITE_CANCEL, ATT_EXEC_WRITE_COMMIT};
use super::types::AttStatus;

/// An event delivered by the Bluetooth stack to the GATT server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GattEvent {
    /// A peer connected
    Connect { conn_id: u16 },
    /// The MTU of a connection was negotiated
    MtuChanged { conn_id: u16, mtu: u16 },
    /// A peer disconnected
    Disconnect { conn_id: u16 },
    /// Write request, write command or prepare write request
    Write {
        conn_id: u16,
        handle: u16,
        offset: u16,
        value: Vec<u8>,
        is_prep: bool,
        need_rsp: bool,
    },
    /// Execute write request; `commit` is false for a cancel
    ExecWrite { conn_id: u16, commit: bool },
    /// Read request; `is_long` marks a continuation of a long read
    Read {
        conn_id: u16,
        handle: u16,
        is_long: bool,
    },
}

impl GattEvent {
    /// Build an execute write event from the ATT flags byte.
    ///
    /// Returns `None` for reserved flag values.
    pub fn exec_write(conn_id: u16, flags: u8) -> Option<Self> {
        let commit = match flags {
            ATT_EXEC_WRITE_COMMIT => true,
            ATT_EXEC_WRITE_CANCEL => false,
            _ => return None,
        };

        Some(GattEvent::ExecWrite { conn_id, commit })
    }

    /// Connection the event belongs to
    pub fn conn_id(&self) -> u16 {
        match self {
            GattEvent::Connect { conn_id }
            | GattEvent::MtuChanged { conn_id, .. }
            | GattEvent::Disconnect { conn_id }
            | GattEvent::Write { conn_id, .. }
            | GattEvent::ExecWrite { conn_id, .. }
            | GattEvent::Read { conn_id, .. } => *conn_id,
        }
    }
}

/// A response the stack must send back to the peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattResponse {
    /// Connection to answer on
    pub conn_id: u16,
    /// Result of the request
    pub status: AttStatus,
    /// Attribute handle, 0 when not applicable
    pub handle: u16,
    /// Offset echoed for prepared writes
    pub offset: u16,
    /// Value payload
    pub value: Vec<u8>,
}

impl GattResponse {
    /// A successful response carrying `value`
    pub fn ok(conn_id: u16, handle: u16, offset: u16, value: Vec<u8>) -> Self {
        Self {
            conn_id,
            status: AttStatus::Ok,
            handle,
            offset,
            value,
        }
    }

    /// An error response
    pub fn error(conn_id: u16, handle: u16, status: AttStatus) -> Self {
        Self {
            conn_id,
            status,
            handle,
            offset: 0,
            value: Vec::new(),
        }
    }
}
