//! GATT server layer
//!
//! This module routes GATT events onto the attribute values of characteristics
//! stored in an arena of profiles, services and characteristics.

pub mod characteristic;
pub mod constants;
pub mod event;
pub mod server;
pub mod types;


pub use characteristic::{Characteristic, RwCallback};
pub use event::{GattEvent, GattResponse};
pub use server::{GattServer, GattServerConfig};
pub use types::{
    AttPermissions, AttStatus, CharacteristicProperty, Connection, Profile, ProfileHandle,
    Service, ServiceHandle,
};
