//! Attribute value store
//!
//! [`AttributeValue`] owns the current bytes of one attribute and drives two
//! independent per-connection state machines on top of them:
//!
//! * write transactions accumulate PDU payloads (prepared writes) and replace
//!   the value atomically on commit;
//! * read transactions take a snapshot at start and hand it out in bounded
//!   chunks (long reads), unaffected by later commits.
//!
//! Every operation is synchronous and bounded by the payload size. The store
//! performs no locking: callers that receive events on several threads must
//! serialize access themselves, e.g. by holding the owning server in a `Mutex`.

use super::codec::{default_deserializer, default_serializer, Deserializer, Integral, Serializer};
use crate::error::{GattError, GattResult};
use log::trace;
use std::collections::HashMap;
use std::sync::Arc;

/// An in-progress long read
#[derive(Debug, Clone)]
struct ReadTransaction {
    /// Value as it was when the read started
    snapshot: Arc<[u8]>,
    /// Number of bytes already handed out
    offset: usize,
}

/// The value of a single attribute
#[derive(Debug, Clone)]
pub struct AttributeValue {
    /// Current committed value
    value: Arc<[u8]>,
    /// Open write transactions by connection ID
    writes: HashMap<u16, Vec<u8>>,
    /// Open read transactions by connection ID
    reads: HashMap<u16, ReadTransaction>,
}

impl Default for AttributeValue {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::with_value(value)
    }
}

impl AttributeValue {
    /// Create an empty attribute value
    pub fn new() -> Self {
        Self::with_value(Vec::new())
    }

    /// Create an attribute value holding `value`
    pub fn with_value(value: Vec<u8>) -> Self {
        Self {
            value: Arc::from(value),
            writes: HashMap::new(),
            reads: HashMap::new(),
        }
    }

    /// Borrow the current bytes
    pub fn raw(&self) -> &[u8] {
        &self.value
    }

    /// Copy of the current bytes
    pub fn to_raw(&self) -> Vec<u8> {
        self.value.to_vec()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the current bytes with the serialized form of `value`.
    ///
    /// Read transactions already in progress keep serving their snapshot.
    pub fn set<T, S>(&mut self, value: T, serializer: S)
    where
        S: FnOnce(T) -> Vec<u8>,
    {
        self.value = Arc::from(serializer(value));
    }

    /// Decode the current bytes with `deserializer`
    pub fn get<T, D>(&self, deserializer: D) -> T
    where
        D: FnOnce(&[u8]) -> T,
    {
        deserializer(self.raw())
    }

    /// Set an integral value using the default codec
    pub fn set_integral<T: Integral>(&mut self, value: T) {
        let serializer: Serializer<T> = default_serializer::<T>;
        self.set(value, serializer);
    }

    /// Get an integral value using the default codec
    pub fn get_integral<T: Integral>(&self) -> T {
        let deserializer: Deserializer<T> = default_deserializer::<T>;
        self.get(deserializer)
    }

    // --- Write transactions ---

    /// Open an empty write transaction for `conn_id`, dropping any uncommitted one.
    pub fn write_start(&mut self, conn_id: u16) {
        self.writes.insert(conn_id, Vec::new());
    }

    /// Append `data` to the open write transaction.
    ///
    /// Returns `false` if no transaction is open for `conn_id`.
    pub fn write_add(&mut self, conn_id: u16, data: &[u8]) -> bool {
        match self.writes.get_mut(&conn_id) {
            Some(buffer) => {
                buffer.extend_from_slice(data);
                true
            }
            None => false,
        }
    }

    /// Replace the value with the accumulated bytes and close the transaction.
    ///
    /// Returns `false`, leaving the value untouched, if none is open.
    pub fn write_commit(&mut self, conn_id: u16) -> bool {
        match self.writes.remove(&conn_id) {
            Some(buffer) => {
                trace!("conn {}: committing {} bytes", conn_id, buffer.len());
                self.value = Arc::from(buffer);
                true
            }
            None => false,
        }
    }

    /// Drop the open write transaction, if any.
    pub fn write_abort(&mut self, conn_id: u16) {
        self.writes.remove(&conn_id);
    }

    /// Whether a write transaction is open for `conn_id`
    pub fn write_ongoing(&self, conn_id: u16) -> bool {
        self.writes.contains_key(&conn_id)
    }

    /// [`write_add`](Self::write_add) as a `Result`
    pub fn try_write_add(&mut self, conn_id: u16, data: &[u8]) -> GattResult<()> {
        if self.write_add(conn_id, data) {
            Ok(())
        } else {
            Err(GattError::NoActiveTransaction(conn_id))
        }
    }

    /// [`write_commit`](Self::write_commit) as a `Result`
    pub fn try_write_commit(&mut self, conn_id: u16) -> GattResult<()> {
        if self.write_commit(conn_id) {
            Ok(())
        } else {
            Err(GattError::NoActiveTransaction(conn_id))
        }
    }

    // --- Read transactions ---

    /// Snapshot the current value for `conn_id` and rewind its cursor.
    pub fn read_start(&mut self, conn_id: u16) {
        self.reads.insert(
            conn_id,
            ReadTransaction {
                snapshot: Arc::clone(&self.value),
                offset: 0,
            },
        );
    }

    /// Return up to `max_len` bytes of the snapshot and advance the cursor.
    ///
    /// Returns an empty vector if no transaction is open or the snapshot is
    /// exhausted. A chunk shorter than `max_len` is the last one.
    pub fn read_advance(&mut self, conn_id: u16, max_len: usize) -> Vec<u8> {
        let Some(transaction) = self.reads.get_mut(&conn_id) else {
            return Vec::new();
        };

        let remaining = &transaction.snapshot[transaction.offset..];
        let len = remaining.len().min(max_len);
        let chunk = remaining[..len].to_vec();
        transaction.offset += len;

        chunk
    }

    /// Drop the open read transaction and return the snapshot it was serving.
    pub fn read_abort(&mut self, conn_id: u16) -> Option<Arc<[u8]>> {
        self.reads
            .remove(&conn_id)
            .map(|transaction| transaction.snapshot)
    }

    /// Whether a read transaction is open for `conn_id`
    pub fn read_ongoing(&self, conn_id: u16) -> bool {
        self.reads.contains_key(&conn_id)
    }

    /// [`read_advance`](Self::read_advance) as a `Result`
    pub fn try_read_advance(&mut self, conn_id: u16, max_len: usize) -> GattResult<Vec<u8>> {
        if !self.read_ongoing(conn_id) {
            return Err(GattError::NoActiveTransaction(conn_id));
        }

        Ok(self.read_advance(conn_id, max_len))
    }

    /// Drop both transaction kinds for `conn_id`; used on disconnection.
    pub fn abort_all(&mut self, conn_id: u16) {
        self.read_abort(conn_id);
        self.write_abort(conn_id);
    }
}
