//! GATT constants

// ATT error codes carried in responses
pub const ATT_ERROR_INVALID_HANDLE: u8 = 0x01;
pub const ATT_ERROR_READ_NOT_PERMITTED: u8 = 0x02;
pub const ATT_ERROR_WRITE_NOT_PERMITTED: u8 = 0x03;
pub const ATT_ERROR_INVALID_OFFSET: u8 = 0x07;
pub const ATT_ERROR_UNLIKELY: u8 = 0x0E;

// ATT attribute permission flags
pub const ATT_PERM_READ: u16 = 0x0001;
pub const ATT_PERM_WRITE: u16 = 0x0002;

// ATT MTU limits. Bluetooth 4.0/4.1 links carry 27 bytes, 4 of which go to L2CAP.
pub const ATT_DEFAULT_MTU: u16 = 23;
pub const ATT_MAX_MTU: u16 = 517;

// Local MTU offered by the server; high enough to never be the bottleneck
pub const GATT_SERVER_DEFAULT_MTU: u16 = 512;

// A read response spends one byte on the opcode
pub const ATT_FIELD_LENGTH_OPCODE: usize = 1;

// ATT execute write flags
pub const ATT_EXEC_WRITE_CANCEL: u8 = 0x00;
pub const ATT_EXEC_WRITE_COMMIT: u8 = 0x01;

// Declaration UUIDs
pub const PRIMARY_SERVICE_UUID: u16 = 0x2800;
pub const SECONDARY_SERVICE_UUID: u16 = 0x2801;
