//! Bluetooth UUIDs
//!
//! A [`Uuid`] keeps the width it was created with (16, 32 or 128 bits) but is
//! always compared, hashed, encoded and rendered through its canonical 128-bit
//! value. Short forms expand into the Bluetooth base UUID space:
//! `value * 2^96 + BASE_UUID`.

use rand::RngCore;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// The Bluetooth base UUID, "00000000-0000-1000-8000-00805F9B34FB".
pub const BASE_UUID: u128 = 0x0000_0000_0000_1000_8000_0080_5F9B_34FB;

/// Bit position of a 16/32-bit value inside the canonical form.
const SHORT_SHIFT: u32 = 96;

/// The bits of a canonical value not covered by a short form.
const BASE_MASK: u128 = (1u128 << SHORT_SHIFT) - 1;

/// Errors raised while building a [`Uuid`] from bytes or text
#[derive(Error, Debug, PartialEq)]
pub enum UuidError {
    #[error("Invalid UUID length: {0}")]
    InvalidLength(usize),

    #[error("Invalid UUID format")]
    InvalidFormat,

    #[error("Invalid UUID hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// UUID for GATT attributes, services and profiles
#[derive(Clone, Copy)]
pub enum Uuid {
    /// 16-bit SIG-assigned UUID
    Uuid16(u16),
    /// 32-bit SIG-assigned UUID
    Uuid32(u32),
    /// Full 128-bit UUID
    Uuid128(u128),
}

impl Uuid {
    /// Create a UUID from a 16-bit value
    pub const fn from_u16(uuid: u16) -> Self {
        Uuid::Uuid16(uuid)
    }

    /// Create a UUID from a 32-bit value
    pub const fn from_u32(uuid: u32) -> Self {
        Uuid::Uuid32(uuid)
    }

    /// Create a UUID from a 128-bit value
    pub const fn from_u128(uuid: u128) -> Self {
        Uuid::Uuid128(uuid)
    }

    /// Build a UUID from its little-endian wire encoding.
    ///
    /// Accepts 2, 4 or 16 bytes, producing the 16, 32 or 128-bit variant.
    /// Byte 0 is the least significant byte.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, UuidError> {
        match bytes.len() {
            2 => Ok(Uuid::Uuid16(u16::from_le_bytes([bytes[0], bytes[1]]))),
            4 => Ok(Uuid::Uuid32(u32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]))),
            16 => {
                let mut raw = [0u8; 16];
                raw.copy_from_slice(bytes);
                Ok(Uuid::Uuid128(u128::from_le_bytes(raw)))
            }
            len => Err(UuidError::InvalidLength(len)),
        }
    }

    /// Generates a random (version 4) UUID.
    pub fn new_random_v4() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);

        // Big-endian layout: octet 6 holds the version, octet 8 the variant
        bytes[6] = (bytes[6] & 0x0F) | 0x40;
        bytes[8] = (bytes[8] & 0x3F) | 0x80;

        Uuid::Uuid128(u128::from_be_bytes(bytes))
    }

    /// The canonical 128-bit value of this UUID.
    pub const fn canonical128(&self) -> u128 {
        match *self {
            Uuid::Uuid16(uuid) => ((uuid as u128) << SHORT_SHIFT) | BASE_UUID,
            Uuid::Uuid32(uuid) => ((uuid as u128) << SHORT_SHIFT) | BASE_UUID,
            Uuid::Uuid128(uuid) => uuid,
        }
    }

    /// The 16-byte little-endian wire encoding of the canonical value.
    pub const fn to_wire_bytes_128(&self) -> [u8; 16] {
        self.canonical128().to_le_bytes()
    }

    /// The 4-byte wire encoding, if this UUID lives in the base UUID space.
    pub fn to_wire_bytes_32(&self) -> Option<[u8; 4]> {
        self.as_u32().map(u32::to_le_bytes)
    }

    /// The 2-byte wire encoding, if this UUID is a 16-bit SIG-assigned value.
    pub fn to_wire_bytes_16(&self) -> Option<[u8; 2]> {
        self.as_u16().map(u16::to_le_bytes)
    }

    /// Checks if the canonical value is derived from the Bluetooth base UUID.
    pub fn is_sig_assigned(&self) -> bool {
        self.canonical128() & BASE_MASK == BASE_UUID
    }

    /// Tries to represent the UUID as a 32-bit value.
    pub fn as_u32(&self) -> Option<u32> {
        if self.is_sig_assigned() {
            Some((self.canonical128() >> SHORT_SHIFT) as u32)
        } else {
            None
        }
    }

    /// Tries to represent the UUID as a 16-bit value.
    pub fn as_u16(&self) -> Option<u16> {
        self.as_u32().and_then(|uuid| u16::try_from(uuid).ok())
    }
}

impl Default for Uuid {
    fn default() -> Self {
        Uuid::Uuid16(0)
    }
}

// --- From Implementations ---

impl From<u16> for Uuid {
    fn from(uuid: u16) -> Self {
        Uuid::from_u16(uuid)
    }
}

impl From<u32> for Uuid {
    fn from(uuid: u32) -> Self {
        Uuid::from_u32(uuid)
    }
}

impl From<u128> for Uuid {
    fn from(uuid: u128) -> Self {
        Uuid::from_u128(uuid)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = UuidError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Uuid::from_wire_bytes(bytes)
    }
}

// --- Comparison and hashing go through the canonical value ---

impl PartialEq for Uuid {
    fn eq(&self, other: &Self) -> bool {
        self.canonical128() == other.canonical128()
    }
}

impl Eq for Uuid {}

impl PartialOrd for Uuid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uuid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical128().cmp(&other.canonical128())
    }
}

impl Hash for Uuid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical128().hash(state);
    }
}

impl PartialEq<u16> for Uuid {
    fn eq(&self, other: &u16) -> bool {
        self.as_u16() == Some(*other)
    }
}

impl PartialEq<u32> for Uuid {
    fn eq(&self, other: &u32) -> bool {
        self.as_u32() == Some(*other)
    }
}

// --- Formatting ---

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.canonical128().to_be_bytes();
        write!(
            f,
            "{:02X}{:02X}{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
            b[0], b[1], b[2], b[3],
            b[4], b[5],
            b[6], b[7],
            b[8], b[9],
            b[10], b[11], b[12], b[13], b[14], b[15]
        )
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show short form if possible, otherwise full hyphenated form
        if let Some(uuid16) = self.as_u16() {
            write!(f, "Uuid(0x{:04X})", uuid16)
        } else if let Some(uuid32) = self.as_u32() {
            write!(f, "Uuid(0x{:08X})", uuid32)
        } else {
            write!(f, "Uuid({})", self)
        }
    }
}

// --- Parsing ---

impl FromStr for Uuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Hyphens are only accepted in the 8-4-4-4-12 grouping
        if s.contains('-') {
            let grouped = s.len() == 36
                && s.char_indices()
                    .all(|(i, c)| (c == '-') == matches!(i, 8 | 13 | 18 | 23));
            if !grouped {
                return Err(UuidError::InvalidFormat);
            }
        }

        let cleaned: String = s.chars().filter(|c| *c != '-').collect();
        if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(UuidError::InvalidFormat);
        }

        match cleaned.len() {
            4 => {
                // 16-bit short form e.g., "180A"
                let uuid = u16::from_str_radix(&cleaned, 16).map_err(|_| UuidError::InvalidFormat)?;
                Ok(Uuid::from_u16(uuid))
            }
            8 => {
                // 32-bit short form e.g., "0000180A"
                let uuid = u32::from_str_radix(&cleaned, 16).map_err(|_| UuidError::InvalidFormat)?;
                Ok(Uuid::from_u32(uuid))
            }
            32 => {
                let mut bytes_be = [0u8; 16];
                hex::decode_to_slice(&cleaned, &mut bytes_be)?;
                Ok(Uuid::from_u128(u128::from_be_bytes(bytes_be)))
            }
            len => Err(UuidError::InvalidLength(len)),
        }
    }
}
