//! In-memory store
//!
//! Same contract as the sled backend without touching disk. Writes can be
//! switched off, and reads made to fail, to exercise failure paths.

use super::{KvStore, Namespace, StoreError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// `HashMap`-backed [`KvStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<(Namespace, String), Vec<u8>>>,
    reject_writes: Cell<bool>,
    reject_reads: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put`/`remove` fail
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Make every subsequent `get` fail
    pub fn set_reject_reads(&self, reject: bool) {
        self.reject_reads.set(reject);
    }

    /// Number of successful writes so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Store raw bytes regardless of the write switch
    pub fn seed(&self, namespace: Namespace, key: &str, value: &[u8]) {
        self.entries
            .borrow_mut()
            .insert((namespace, key.to_string()), value.to_vec());
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.reject_writes.get() {
            return Err(StoreError::WriteRejected("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, namespace: Namespace, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.reject_reads.get() {
            return Err(StoreError::ReadFailed("memory store is unreadable".to_string()));
        }
        Ok(self
            .entries
            .borrow()
            .get(&(namespace, key.to_string()))
            .cloned())
    }

    fn put(&self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries
            .borrow_mut()
            .insert((namespace, key.to_string()), value.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, namespace: Namespace, key: &str) -> Result<bool, StoreError> {
        self.check_writable()?;
        let existed = self
            .entries
            .borrow_mut()
            .remove(&(namespace, key.to_string()))
            .is_some();
        self.writes.set(self.writes.get() + 1);
        Ok(existed)
    }
}
