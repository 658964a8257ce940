//! Modshelf - manual ordering and grouping for mod collections
//!
//! A mod collection is a folder of mods organised into nested group folders.
//! This library keeps the user's hand-made order of items and groups next to
//! that folder and reconciles it with whatever is on disk:
//!
//! - [`ledger`]: persisted order lists and expanded-group sets that repair
//!   themselves when ids appear or vanish
//! - [`tree`] and [`view`]: the group hierarchy and the item list a view shows
//! - [`drag`]: a pointer-driven drag state machine that commits reorders and
//!   group moves
//! - [`session`]: one open collection tying the pieces together
//!
//! The folder itself is reached through a [`repository::ModRepository`];
//! ordering state lives in a [`store::KvStore`].

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod drag;
pub mod ledger;
pub mod model;
pub mod output;
pub mod repository;
pub mod session;
pub mod store;
pub mod tree;
pub mod view;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ModshelfError {
    /// State store error
    #[error("Store error: {0}")]
    StoreError(#[from] store::StoreError),
    /// Mod folder error
    #[error("Repository error: {0}")]
    RepoError(#[from] repository::RepoError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
