//! Attribute values
//!
//! This module holds the raw bytes of an attribute together with the
//! per-connection write and read transactions that mutate and stream them,
//! plus the pluggable codecs used to move typed values in and out.

pub mod codec;
pub mod store;

#[cfg(test)]
mod tests;

pub use codec::{default_deserializer, default_serializer, Deserializer, Integral, Serializer};
pub use store::AttributeValue;
