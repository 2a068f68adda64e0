//! Value codecs
//!
//! A serializer turns a typed value into the bytes stored in an attribute and a
//! deserializer does the reverse. The default codec covers fixed-width integral
//! types and always uses big-endian wire order, independent of the host.

use byteorder::{BigEndian, ByteOrder};

/// Converts a typed value into raw attribute bytes
pub type Serializer<T> = fn(T) -> Vec<u8>;

/// Converts raw attribute bytes into a typed value
pub type Deserializer<T> = fn(&[u8]) -> T;

/// Fixed-width integral types handled by the default codec
pub trait Integral: Copy {
    /// Width of the encoded value in bytes
    const WIDTH: usize;

    /// Write the value into `buf` (exactly `WIDTH` bytes) in wire order.
    fn write_wire(self, buf: &mut [u8]);

    /// Read a value from `buf` (exactly `WIDTH` bytes) in wire order.
    fn read_wire(buf: &[u8]) -> Self;
}

macro_rules! impl_integral {
    ($($ty:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl Integral for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_wire(self, buf: &mut [u8]) {
                    BigEndian::$write(buf, self);
                }

                fn read_wire(buf: &[u8]) -> Self {
                    BigEndian::$read(buf)
                }
            }
        )*
    };
}

impl_integral! {
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
    i128 => write_i128, read_i128;
}

impl Integral for u8 {
    const WIDTH: usize = 1;

    fn write_wire(self, buf: &mut [u8]) {
        buf[0] = self;
    }

    fn read_wire(buf: &[u8]) -> Self {
        buf[0]
    }
}

impl Integral for i8 {
    const WIDTH: usize = 1;

    fn write_wire(self, buf: &mut [u8]) {
        buf[0] = self as u8;
    }

    fn read_wire(buf: &[u8]) -> Self {
        buf[0] as i8
    }
}

impl Integral for bool {
    const WIDTH: usize = 1;

    fn write_wire(self, buf: &mut [u8]) {
        buf[0] = self as u8;
    }

    fn read_wire(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

/// Serialize an integral value into `T::WIDTH` bytes, most significant byte first.
pub fn default_serializer<T: Integral>(value: T) -> Vec<u8> {
    let mut buf = vec![0u8; T::WIDTH];
    value.write_wire(&mut buf);
    buf
}

/// Deserialize an integral value written by [`default_serializer`].
///
/// At most `T::WIDTH` bytes are read. Shorter input is taken as the low-order
/// bytes of the value with the missing high-order bytes set to zero.
pub fn default_deserializer<T: Integral>(bytes: &[u8]) -> T {
    let len = bytes.len().min(T::WIDTH);
    let mut buf = vec![0u8; T::WIDTH];
    buf[T::WIDTH - len..].copy_from_slice(&bytes[..len]);
    T::read_wire(&buf)
}
