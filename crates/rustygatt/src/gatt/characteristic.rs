//! GATT characteristics
//!
//! A characteristic owns one [`AttributeValue`] and translates write, execute
//! write, read and disconnect events into its transaction operations.

use super::event::GattResponse;
use super::types::{AttPermissions, AttStatus, CharacteristicProperty, ServiceHandle};
use crate::uuid::Uuid;
use crate::value::AttributeValue;
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

/// Callback run after a write commits or a read completes.
///
/// Receives the connection ID and the attribute value involved. It runs
/// before the response is handed back to the stack.
pub type RwCallback = Arc<dyn Fn(u16, &[u8]) + Send + Sync>;

/// A GATT characteristic and its value
pub struct Characteristic {
    /// Characteristic UUID
    pub uuid: Uuid,
    /// Value attribute handle
    pub handle: u16,
    /// Owning service
    pub service: ServiceHandle,
    /// Characteristic properties
    pub properties: CharacteristicProperty,
    /// Access permissions of the value attribute
    pub permissions: AttPermissions,
    value: AttributeValue,
    read_callback: Option<RwCallback>,
    write_callback: Option<RwCallback>,
}

impl fmt::Debug for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Characteristic")
            .field("uuid", &self.uuid)
            .field("handle", &self.handle)
            .field("service", &self.service)
            .field("properties", &self.properties)
            .field("permissions", &self.permissions)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl Characteristic {
    /// Create a characteristic with an empty value
    pub fn new(
        uuid: Uuid,
        handle: u16,
        service: ServiceHandle,
        properties: CharacteristicProperty,
        permissions: AttPermissions,
    ) -> Self {
        Self {
            uuid,
            handle,
            service,
            properties,
            permissions,
            value: AttributeValue::new(),
            read_callback: None,
            write_callback: None,
        }
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut AttributeValue {
        &mut self.value
    }

    /// Set the callback run whenever a write completes
    pub fn set_write_callback(&mut self, callback: RwCallback) {
        self.write_callback = Some(callback);
    }

    /// Set the callback run whenever a read completes
    pub fn set_read_callback(&mut self, callback: RwCallback) {
        self.read_callback = Some(callback);
    }

    /// Handle a write or prepare write request.
    ///
    /// A plain write, or the first chunk of a prepared write, opens a new
    /// transaction. Plain writes commit straight away; prepared writes wait for
    /// an execute write. Returns the response to send if `need_rsp` is set.
    pub fn handle_write(
        &mut self,
        conn_id: u16,
        offset: u16,
        data: &[u8],
        is_prep: bool,
        need_rsp: bool,
    ) -> Option<GattResponse> {
        debug!(
            "{:04X} -- write from conn {} offset {}{}: {}",
            self.handle,
            conn_id,
            offset,
            if is_prep { " (prep)" } else { "" },
            hex::encode(data)
        );

        if !self.permissions.can_write() {
            warn!("{:04X} -- write not permitted", self.handle);
            return need_rsp
                .then(|| GattResponse::error(conn_id, self.handle, AttStatus::WriteNotPermitted));
        }

        if !is_prep || offset == 0 {
            self.value.write_start(conn_id);
        }

        if !self.value.write_add(conn_id, data) {
            warn!(
                "{:04X} -- prepared write at offset {} without transaction on conn {}",
                self.handle, offset, conn_id
            );
            return need_rsp
                .then(|| GattResponse::error(conn_id, self.handle, AttStatus::InvalidOffset));
        }

        if !is_prep {
            self.commit(conn_id);
        }

        need_rsp.then(|| GattResponse::ok(conn_id, self.handle, offset, data.to_vec()))
    }

    /// Handle an execute write for `conn_id`.
    ///
    /// Commits or cancels the pending prepared write. Returns `false` if this
    /// characteristic had none.
    pub fn handle_exec_write(&mut self, conn_id: u16, commit: bool) -> bool {
        if !self.value.write_ongoing(conn_id) {
            return false;
        }

        if commit {
            debug!("{:04X} -- executing prepared write for conn {}", self.handle, conn_id);
            self.commit(conn_id);
        } else {
            debug!("{:04X} -- cancelling prepared write for conn {}", self.handle, conn_id);
            self.value.write_abort(conn_id);
        }

        true
    }

    /// Handle a read or read blob request, answering with at most `chunk_len` bytes.
    ///
    /// A chunk shorter than `chunk_len` ends the long read.
    pub fn handle_read(&mut self, conn_id: u16, is_long: bool, chunk_len: usize) -> GattResponse {
        debug!(
            "{:04X} -- read from conn {}{}",
            self.handle,
            conn_id,
            if is_long { " (long)" } else { "" }
        );

        if !self.permissions.can_read() {
            warn!("{:04X} -- read not permitted", self.handle);
            return GattResponse::error(conn_id, self.handle, AttStatus::ReadNotPermitted);
        }

        if !is_long {
            self.value.read_start(conn_id);
        } else if !self.value.read_ongoing(conn_id) {
            warn!(
                "{:04X} -- long read continuation without transaction on conn {}",
                self.handle, conn_id
            );
            return GattResponse::error(conn_id, self.handle, AttStatus::InvalidOffset);
        }

        let chunk = self.value.read_advance(conn_id, chunk_len);
        if chunk.len() < chunk_len {
            // Report what the peer was served, not what was committed since
            if let Some(snapshot) = self.value.read_abort(conn_id) {
                if let Some(callback) = &self.read_callback {
                    callback(conn_id, &snapshot[..]);
                }
            }
        }

        GattResponse::ok(conn_id, self.handle, 0, chunk)
    }

    /// Drop all transaction state for a disconnected peer
    pub fn handle_disconnect(&mut self, conn_id: u16) {
        self.value.abort_all(conn_id);
    }

    fn commit(&mut self, conn_id: u16) {
        if self.value.write_commit(conn_id) {
            if let Some(callback) = &self.write_callback {
                callback(conn_id, self.value.raw());
            }
        }
    }
}
