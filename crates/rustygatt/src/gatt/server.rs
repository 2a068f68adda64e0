//! GATT Server implementation
//!
//! The server owns arenas of profiles, services and characteristics plus the
//! table of live connections. [`GattServer::dispatch`] maps each incoming
//! [`GattEvent`] to the characteristic it concerns and returns the response,
//! if any, that the stack must send back.
//!
//! All methods take `&mut self`; a server shared between threads has to be
//! wrapped in a `Mutex` by its owner.

use super::characteristic::Characteristic;
use super::constants::*;
use super::event::{GattEvent, GattResponse};
use super::types::{
    AttPermissions, AttStatus, CharacteristicProperty, Connection, Profile, ProfileHandle,
    Service, ServiceHandle,
};
use crate::error::{GattError, GattResult};
use crate::uuid::Uuid;
use log::{info, trace, warn};
use std::collections::{BTreeMap, HashMap};

/// GATT Server configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GattServerConfig {
    /// Largest MTU the server accepts
    pub mtu: u16,
    /// MTU assumed for a new connection until one is negotiated
    pub default_client_mtu: u16,
}

impl Default for GattServerConfig {
    fn default() -> Self {
        Self {
            mtu: GATT_SERVER_DEFAULT_MTU,
            default_client_mtu: ATT_DEFAULT_MTU,
        }
    }
}

impl GattServerConfig {
    fn validate(&self) -> GattResult<()> {
        for mtu in [self.mtu, self.default_client_mtu] {
            if !(ATT_DEFAULT_MTU..=ATT_MAX_MTU).contains(&mtu) {
                return Err(GattError::InvalidMtu(mtu));
            }
        }
        Ok(())
    }
}

/// GATT Server
#[derive(Debug, Default)]
pub struct GattServer {
    /// Server configuration
    config: GattServerConfig,
    /// Profile arena
    profiles: Vec<Profile>,
    /// Service arena
    services: Vec<Service>,
    /// Characteristics by value handle
    characteristics: BTreeMap<u16, Characteristic>,
    /// Connected peers
    connections: HashMap<u16, Connection>,
}

impl GattServer {
    /// Create a new GATT server with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new GATT server with `config`
    pub fn with_config(config: GattServerConfig) -> GattResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Get server configuration
    pub fn config(&self) -> GattServerConfig {
        self.config
    }

    /// Set server configuration
    pub fn set_config(&mut self, config: GattServerConfig) -> GattResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    // --- Arena ---

    /// Add a profile
    pub fn add_profile(&mut self, uuid: Uuid) -> ProfileHandle {
        self.profiles.push(Profile { uuid });
        ProfileHandle(self.profiles.len() - 1)
    }

    /// Add a service to `profile`
    pub fn add_service(
        &mut self,
        profile: ProfileHandle,
        uuid: Uuid,
        is_primary: bool,
    ) -> GattResult<ServiceHandle> {
        if self.profile(profile).is_none() {
            return Err(GattError::UnknownProfile(profile.0));
        }

        self.services.push(Service {
            uuid,
            profile,
            is_primary,
        });
        Ok(ServiceHandle(self.services.len() - 1))
    }

    /// Add a characteristic to `service` with its value at attribute `handle`
    pub fn add_characteristic(
        &mut self,
        service: ServiceHandle,
        uuid: Uuid,
        handle: u16,
        properties: CharacteristicProperty,
        permissions: AttPermissions,
    ) -> GattResult<&mut Characteristic> {
        if self.service(service).is_none() {
            return Err(GattError::UnknownService(service.0));
        }
        if self.characteristics.contains_key(&handle) {
            return Err(GattError::DuplicateHandle(handle));
        }

        let characteristic = Characteristic::new(uuid, handle, service, properties, permissions);
        Ok(self.characteristics.entry(handle).or_insert(characteristic))
    }

    pub fn profile(&self, handle: ProfileHandle) -> Option<&Profile> {
        self.profiles.get(handle.0)
    }

    pub fn service(&self, handle: ServiceHandle) -> Option<&Service> {
        self.services.get(handle.0)
    }

    pub fn characteristic(&self, handle: u16) -> Option<&Characteristic> {
        self.characteristics.get(&handle)
    }

    pub fn characteristic_mut(&mut self, handle: u16) -> Option<&mut Characteristic> {
        self.characteristics.get_mut(&handle)
    }

    /// Services belonging to `profile`
    pub fn services_of(&self, profile: ProfileHandle) -> Vec<ServiceHandle> {
        self.services
            .iter()
            .enumerate()
            .filter(|(_, service)| service.profile == profile)
            .map(|(index, _)| ServiceHandle(index))
            .collect()
    }

    /// Characteristics belonging to `service`, by ascending handle
    pub fn characteristics_of(&self, service: ServiceHandle) -> Vec<&Characteristic> {
        self.characteristics
            .values()
            .filter(|characteristic| characteristic.service == service)
            .collect()
    }

    /// Find the characteristic of `service` with type `uuid`
    pub fn find_characteristic(&self, service: ServiceHandle, uuid: &Uuid) -> Option<&Characteristic> {
        self.characteristics
            .values()
            .find(|characteristic| characteristic.service == service && characteristic.uuid == *uuid)
    }

    // --- Connections ---

    pub fn connection(&self, conn_id: u16) -> Option<&Connection> {
        self.connections.get(&conn_id)
    }

    /// Register a new connection at the default client MTU
    pub fn connect(&mut self, conn_id: u16) -> GattResult<()> {
        if self.connections.contains_key(&conn_id) {
            return Err(GattError::ConnectionExists(conn_id));
        }

        self.connections.insert(
            conn_id,
            Connection {
                conn_id,
                mtu: self.config.default_client_mtu,
            },
        );
        info!("Client connected: {}", conn_id);
        Ok(())
    }

    /// Record the MTU negotiated for `conn_id`, capped by the server MTU.
    ///
    /// Returns the MTU in effect.
    pub fn update_mtu(&mut self, conn_id: u16, mtu: u16) -> GattResult<u16> {
        let server_mtu = self.config.mtu;
        let connection = self
            .connections
            .get_mut(&conn_id)
            .ok_or(GattError::UnknownConnection(conn_id))?;

        connection.mtu = mtu.clamp(ATT_DEFAULT_MTU, server_mtu);
        info!("MTU for connection {} set to {}", conn_id, connection.mtu);
        Ok(connection.mtu)
    }

    /// Drop every transaction of `conn_id` and forget the connection
    pub fn disconnect(&mut self, conn_id: u16) {
        for characteristic in self.characteristics.values_mut() {
            characteristic.handle_disconnect(conn_id);
        }

        if self.connections.remove(&conn_id).is_some() {
            info!("Client disconnected: {}", conn_id);
        } else {
            warn!("Disconnect for unknown connection {}", conn_id);
        }
    }

    // --- Routing ---

    /// Route `event` to its target and return the response to send, if any
    pub fn dispatch(&mut self, event: GattEvent) -> Option<GattResponse> {
        trace!("GATTS event: {:?}", event);

        match event {
            GattEvent::Connect { conn_id } => {
                if let Err(e) = self.connect(conn_id) {
                    warn!("{}", e);
                }
                None
            }
            GattEvent::MtuChanged { conn_id, mtu } => {
                if let Err(e) = self.update_mtu(conn_id, mtu) {
                    warn!("{}", e);
                }
                None
            }
            GattEvent::Disconnect { conn_id } => {
                self.disconnect(conn_id);
                None
            }
            GattEvent::Write {
                conn_id,
                handle,
                offset,
                value,
                is_prep,
                need_rsp,
            } => self.route_write(conn_id, handle, offset, &value, is_prep, need_rsp),
            GattEvent::ExecWrite { conn_id, commit } => {
                Some(self.route_exec_write(conn_id, commit))
            }
            GattEvent::Read {
                conn_id,
                handle,
                is_long,
            } => Some(self.route_read(conn_id, handle, is_long)),
        }
    }

    fn route_write(
        &mut self,
        conn_id: u16,
        handle: u16,
        offset: u16,
        value: &[u8],
        is_prep: bool,
        need_rsp: bool,
    ) -> Option<GattResponse> {
        match self.characteristics.get_mut(&handle) {
            Some(characteristic) => {
                characteristic.handle_write(conn_id, offset, value, is_prep, need_rsp)
            }
            None => {
                warn!("Write to unknown handle {:04X}", handle);
                need_rsp.then(|| GattResponse::error(conn_id, handle, AttStatus::InvalidHandle))
            }
        }
    }

    fn route_exec_write(&mut self, conn_id: u16, commit: bool) -> GattResponse {
        let mut executed = 0;
        for characteristic in self.characteristics.values_mut() {
            if characteristic.handle_exec_write(conn_id, commit) {
                executed += 1;
            }
        }

        if executed == 0 {
            warn!("Execute write without prepared writes on conn {}", conn_id);
        }

        GattResponse::ok(conn_id, 0, 0, Vec::new())
    }

    fn route_read(&mut self, conn_id: u16, handle: u16, is_long: bool) -> GattResponse {
        let Some(characteristic) = self.characteristics.get_mut(&handle) else {
            warn!("Read of unknown handle {:04X}", handle);
            return GattResponse::error(conn_id, handle, AttStatus::InvalidHandle);
        };

        let Some(connection) = self.connections.get(&conn_id) else {
            warn!("Read from unknown connection {}", conn_id);
            return GattResponse::error(conn_id, handle, AttStatus::Unlikely);
        };

        characteristic.handle_read(conn_id, is_long, connection.read_chunk_len())
    }
}
