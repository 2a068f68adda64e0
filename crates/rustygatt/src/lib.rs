//! RustyGatt - A peripheral-side GATT attribute engine
//!
//! This library models the value of a GATT attribute as it is mutated by chunked
//! ATT operations (prepared writes and long reads), keeping per-connection
//! transaction state isolated. It also provides a Bluetooth UUID type that
//! canonicalizes 16, 32 and 128-bit identifiers into a single comparable form,
//! and a small server layer that routes GATT events onto attribute values.

pub mod error;
pub mod gatt;
pub mod uuid;
pub mod value;

// Re-export common types for convenience
pub use error::{GattError, GattResult};
pub use gatt::{
    AttPermissions, AttStatus, Characteristic, CharacteristicProperty, Connection, GattEvent,
    GattResponse, GattServer, GattServerConfig, ProfileHandle, ServiceHandle,
};
pub use uuid::{Uuid, UuidError, BASE_UUID};
pub use value::{AttributeValue, Deserializer, Integral, Serializer};
