//! On-disk store backed by sled
//!
//! One sled tree per [`Namespace`], named after the namespace. Keys are
//! collection ids encoded as UTF-8.

use super::{KvStore, Namespace, StoreError};
use sled::{Db, Tree};
use std::path::Path;

/// sled-backed [`KvStore`]
pub struct SledStore {
    db: Db,
    item_order: Tree,
    group_order: Tree,
    expansion: Tree,
}

impl SledStore {
    /// Opens or creates a store at the specified directory
    ///
    /// # Examples
    /// ```no_run
    /// use modshelf::store::SledStore;
    /// let store = SledStore::open("state").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database or its trees cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let item_order = db.open_tree(Namespace::ItemOrder.as_str())?;
        let group_order = db.open_tree(Namespace::GroupOrder.as_str())?;
        let expansion = db.open_tree(Namespace::Expansion.as_str())?;
        Ok(Self {
            db,
            item_order,
            group_order,
            expansion,
        })
    }

    const fn tree(&self, namespace: Namespace) -> &Tree {
        match namespace {
            Namespace::ItemOrder => &self.item_order,
            Namespace::GroupOrder => &self.group_order,
            Namespace::Expansion => &self.expansion,
        }
    }

    /// Collection ids that have state in a namespace
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if iteration fails or a key is not UTF-8.
    pub fn collections(&self, namespace: Namespace) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in self.tree(namespace).iter() {
            let (key, _) = entry?;
            let key = String::from_utf8(key.to_vec()).map_err(|e| StoreError::InvalidKey {
                namespace: namespace.as_str(),
                message: e.to_string(),
            })?;
            keys.push(key);
        }
        Ok(keys)
    }

    /// Drop every namespace entry of a collection
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any tree cannot be written.
    pub fn forget_collection(&self, collection: &str) -> Result<(), StoreError> {
        for namespace in Namespace::ALL {
            self.tree(namespace).remove(collection.as_bytes())?;
        }
        self.db.flush()?;
        Ok(())
    }

    /// Remove all state
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any tree cannot be cleared.
    pub fn clear(&self) -> Result<(), StoreError> {
        for namespace in Namespace::ALL {
            self.tree(namespace).clear()?;
        }
        self.db.flush()?;
        Ok(())
    }
}

impl KvStore for SledStore {
    fn get(&self, namespace: Namespace, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .tree(namespace)
            .get(key.as_bytes())?
            .map(|value| value.to_vec()))
    }

    fn put(&self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let tree = self.tree(namespace);
        tree.insert(key.as_bytes(), value)?;
        tree.flush()?;
        Ok(())
    }

    fn remove(&self, namespace: Namespace, key: &str) -> Result<bool, StoreError> {
        let tree = self.tree(namespace);
        let existed = tree.remove(key.as_bytes())?.is_some();
        tree.flush()?;
        Ok(existed)
    }
}
