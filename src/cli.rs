//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for modshelf using the `clap` crate.
//!
//! # Commands
//!
//! - **list**: Items of a collection in their persisted order (default)
//! - **tree**: The group hierarchy with item counts
//! - **reorder** / **reorder-group**: Manual ordering of items and sibling groups
//! - **move**: Put an item into another group
//! - **expand** / **collapse**: Remembered sidebar state
//! - **group** / **collection** / **config**: Management subcommands
//!
//! # Examples
//!
//! ```
//! use modshelf::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from_args(["modshelf", "-c", "game", "move", "Axe", "Weapons"]);
//! assert_eq!(cli.collection.as_deref(), Some("game"));
//! assert!(matches!(cli.get_command(), Commands::Move { .. }));
//! ```

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "modshelf")]
#[command(about = "Manual ordering and grouping for mod collections", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Collection to use (defaults to the configured default)
    #[arg(short = 'c', long = "collection", global = true, value_name = "NAME")]
    pub collection: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List items in display order (default)
    #[command(visible_alias = "ls")]
    List {
        /// Only items directly in this group ("Root" for ungrouped)
        #[arg(short = 'g', long = "group", value_name = "GROUP")]
        group: Option<String>,

        /// Only items whose name contains this text
        #[arg(short = 's', long = "search", value_name = "TEXT")]
        search: Option<String>,
    },

    /// Show the group tree
    Tree {
        /// Show collapsed groups' children too
        #[arg(short = 'a', long = "all")]
        all: bool,
    },

    /// Move ITEM to TARGET's position in a view
    Reorder {
        /// Item to move
        item: String,

        /// Item whose position it takes
        target: String,

        /// View to reorder (defaults to all items)
        #[arg(short = 'g', long = "group", value_name = "GROUP")]
        group: Option<String>,
    },

    /// Move GROUP to sibling TARGET's position
    #[command(name = "reorder-group")]
    ReorderGroup {
        /// Group to move
        group: String,

        /// Sibling group whose position it takes
        target: String,
    },

    /// Put an item into another group ("Root" for ungrouped)
    #[command(visible_alias = "mv")]
    Move {
        item: String,
        group: String,
    },

    /// Expand a group in the tree
    Expand { group: String },

    /// Collapse a group in the tree
    Collapse { group: String },

    /// Enable an item
    Enable { item: String },

    /// Disable an item
    Disable { item: String },

    /// Delete an item from disk
    #[command(visible_alias = "rm")]
    Delete { item: String },

    /// Manage groups
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Manage collections
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Group management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GroupCommands {
    /// Create an empty group ("Parent/Child" nests)
    Create { group: String },

    /// Rename a group together with its contents
    Rename { group: String, new_name: String },

    /// Delete a group and everything in it
    #[command(visible_alias = "rm")]
    Delete { group: String },
}

/// Collection management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CollectionCommands {
    /// Register a mods folder as a collection
    Add {
        /// Name of the collection
        name: String,

        /// Path to the mods folder
        path: PathBuf,
    },

    /// List all collections
    List,

    /// Remove a collection from configuration (files are kept)
    #[command(visible_alias = "rm")]
    Remove {
        /// Name of the collection to remove
        name: String,

        /// Also forget its ordering state
        #[arg(long = "forget-state")]
        forget_state: bool,
    },

    /// Set the default collection
    #[command(name = "set-default")]
    SetDefault {
        /// Name of the collection to set as default
        name: String,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., drag_threshold=6)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., quiet)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

impl ConfigCommands {
    /// Split a `KEY=VALUE` setting
    ///
    /// # Examples
    /// ```
    /// # use modshelf::cli::ConfigCommands;
    /// assert_eq!(ConfigCommands::split_setting("quiet=true"), Some(("quiet", "true")));
    /// assert_eq!(ConfigCommands::split_setting("quiet"), None);
    /// ```
    #[must_use]
    pub fn split_setting(setting: &str) -> Option<(&str, &str)> {
        let (key, value) = setting.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key, value.trim()))
    }
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse from an explicit argument list
    #[must_use]
    pub fn parse_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// Get the command, defaulting to List if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::List {
            group: None,
            search: None,
        })
    }
}
