//! Key-value persistence for ordering state
//!
//! Ledgers never talk to a database directly; they go through the
//! [`KvStore`] trait so the on-disk backend can be swapped for an in-memory
//! one in tests.
//!
//! State is split into three namespaces, each keyed by collection id:
//! - `item-order`: `{ filter: [itemId, ...] }`
//! - `group-order`: `{ parent: [groupId, ...] }`
//! - `expansion`: `[groupId, ...]`

use std::fmt;

pub mod disk;
pub mod error;
pub mod memory;

pub use disk::SledStore;
pub use error::StoreError;
pub use memory::MemoryStore;

/// One of the three persisted namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    ItemOrder,
    GroupOrder,
    Expansion,
}

impl Namespace {
    /// Every namespace, in a fixed order
    pub const ALL: [Self; 3] = [Self::ItemOrder, Self::GroupOrder, Self::Expansion];

    /// Name used for the backing tree
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ItemOrder => "item-order",
            Self::GroupOrder => "group-order",
            Self::Expansion => "expansion",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte-oriented key-value backend, one keyspace per [`Namespace`]
///
/// Writes are expected to be durable when `put` returns.
pub trait KvStore {
    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, namespace: Namespace, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn put(&self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete the value under `key`; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&self, namespace: Namespace, key: &str) -> Result<bool, StoreError>;
}
