//! Source of truth for items and groups
//!
//! The ordering engine never creates or deletes items or groups itself. It
//! reads snapshots through [`ModRepository::scan`], asks the repository to
//! relabel an item's group on a committed cross-group drag, and listens to
//! a change feed that only says "something changed, re-scan".

use crate::model::{Group, Item};
use std::path::Path;
use std::sync::mpsc::Receiver;

pub mod error;
pub mod feed;
pub mod fs;

pub use error::RepoError;
pub use feed::ChangeFeed;
pub use fs::FsRepository;

/// Everything a collection currently contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub items: Vec<Item>,
    pub groups: Vec<Group>,
}

/// Change notification; carries no detail beyond the affected collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryEvent {
    Changed { collection: String },
}

/// Storage of mods and their group folders
pub trait ModRepository {
    /// Read the current items and groups of a collection
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the collection is unknown or cannot be read.
    fn scan(&self, collection: &str) -> Result<ScanResult, RepoError>;

    /// Put an item into another group (`"Root"` for ungrouped)
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the item or target group is missing, or the
    /// destination already holds an item with the same folder name.
    fn move_item(&self, collection: &str, item_id: &str, group_id: &str) -> Result<(), RepoError>;

    /// Enable or disable an item
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the item is missing or cannot be renamed.
    fn set_enabled(&self, collection: &str, item_id: &str, enabled: bool) -> Result<(), RepoError>;

    /// Create an empty group
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the id is invalid or the folder cannot be created.
    fn create_group(&self, collection: &str, group_id: &str) -> Result<(), RepoError>;

    /// Rename (or re-path) a group together with its contents
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the old group is missing or the new id is taken.
    fn rename_group(&self, collection: &str, old_id: &str, new_id: &str) -> Result<(), RepoError>;

    /// Delete a group and everything in it
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the group is missing or cannot be removed.
    fn delete_group(&self, collection: &str, group_id: &str) -> Result<(), RepoError>;

    /// Delete an item
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the item is missing or cannot be removed.
    fn delete_item(&self, collection: &str, item_id: &str) -> Result<(), RepoError>;

    /// Install an item from an archive into a group
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the archive cannot be installed.
    fn install_from_archive(
        &self,
        collection: &str,
        archive: &Path,
        name: &str,
        group_id: &str,
        password: Option<&str>,
    ) -> Result<(), RepoError>;

    /// New receiver for change notifications
    fn subscribe(&self) -> Receiver<RepositoryEvent>;
}
