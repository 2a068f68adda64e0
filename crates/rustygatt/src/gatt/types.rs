//! Common types for GATT operations
//!
//! Profiles, services and characteristics live in arenas owned by the server.
//! A child records the handle of its parent instead of a reference to it.

use super::constants::*;
use crate::uuid::Uuid;
use bitflags::bitflags;
use std::fmt;

/// Index of a profile in the server arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileHandle(pub(crate) usize);

/// Index of a service in the server arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceHandle(pub(crate) usize);

impl ProfileHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl ServiceHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ProfileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile#{}", self.0)
    }
}

impl fmt::Display for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service#{}", self.0)
    }
}

bitflags! {
    /// Characteristic properties as defined in the Bluetooth specification
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CharacteristicProperty: u8 {
        const BROADCAST = 0x01;
        const READ = 0x02;
        const WRITE_WITHOUT_RESPONSE = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
        const INDICATE = 0x20;
        const AUTHENTICATED_SIGNED_WRITES = 0x40;
        const EXTENDED_PROPERTIES = 0x80;
    }
}

bitflags! {
    /// Access permissions of an attribute
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttPermissions: u16 {
        const READ = ATT_PERM_READ;
        const WRITE = ATT_PERM_WRITE;
    }
}

impl Default for AttPermissions {
    fn default() -> Self {
        AttPermissions::READ | AttPermissions::WRITE
    }
}

impl AttPermissions {
    pub fn can_read(&self) -> bool {
        self.contains(AttPermissions::READ)
    }

    pub fn can_write(&self) -> bool {
        self.contains(AttPermissions::WRITE)
    }
}

/// Status carried in a response to the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttStatus {
    /// Success
    Ok,
    /// Invalid handle
    InvalidHandle,
    /// Read not permitted
    ReadNotPermitted,
    /// Write not permitted
    WriteNotPermitted,
    /// Invalid offset
    InvalidOffset,
    /// Unlikely error
    Unlikely,
}

impl AttStatus {
    pub fn is_ok(&self) -> bool {
        *self == AttStatus::Ok
    }
}

impl From<AttStatus> for u8 {
    fn from(status: AttStatus) -> u8 {
        match status {
            AttStatus::Ok => 0,
            AttStatus::InvalidHandle => ATT_ERROR_INVALID_HANDLE,
            AttStatus::ReadNotPermitted => ATT_ERROR_READ_NOT_PERMITTED,
            AttStatus::WriteNotPermitted => ATT_ERROR_WRITE_NOT_PERMITTED,
            AttStatus::InvalidOffset => ATT_ERROR_INVALID_OFFSET,
            AttStatus::Unlikely => ATT_ERROR_UNLIKELY,
        }
    }
}

/// A GATT profile, the root of a group of services
#[derive(Debug, Clone)]
pub struct Profile {
    /// Profile UUID
    pub uuid: Uuid,
}

/// A GATT service
#[derive(Debug, Clone)]
pub struct Service {
    /// Service UUID
    pub uuid: Uuid,
    /// Owning profile
    pub profile: ProfileHandle,
    /// Whether this is a primary or secondary service
    pub is_primary: bool,
}

impl Service {
    /// The attribute type of this service's declaration
    pub fn declaration_uuid(&self) -> Uuid {
        if self.is_primary {
            Uuid::from_u16(PRIMARY_SERVICE_UUID)
        } else {
            Uuid::from_u16(SECONDARY_SERVICE_UUID)
        }
    }
}

/// A connected peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    /// Connection ID
    pub conn_id: u16,
    /// Negotiated MTU
    pub mtu: u16,
}

impl Connection {
    /// Largest payload that fits in a single read response
    pub fn read_chunk_len(&self) -> usize {
        (self.mtu as usize).saturating_sub(ATT_FIELD_LENGTH_OPCODE)
    }
}
