//! Ordering scopes
//!
//! Every independently ordered list is addressed by a [`ScopeKey`]. Item
//! order is kept per collection and group filter; group order is kept per
//! collection and parent group. The two kinds live in separate namespaces.

use super::{GroupFilter, ParentGroup};
use crate::store::Namespace;
use std::fmt;

/// Address of one ordered id list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// Order of items shown under a group filter
    Items {
        collection: String,
        filter: GroupFilter,
    },
    /// Order of sibling groups under one parent
    Groups {
        collection: String,
        parent: ParentGroup,
    },
}

impl ScopeKey {
    #[must_use]
    pub fn items(collection: impl Into<String>, filter: GroupFilter) -> Self {
        Self::Items {
            collection: collection.into(),
            filter,
        }
    }

    #[must_use]
    pub fn groups(collection: impl Into<String>, parent: ParentGroup) -> Self {
        Self::Groups {
            collection: collection.into(),
            parent,
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            Self::Items { collection, .. } | Self::Groups { collection, .. } => collection,
        }
    }

    /// Key of the list inside the collection's namespace entry
    #[must_use]
    pub fn list_key(&self) -> &str {
        match self {
            Self::Items { filter, .. } => filter.as_key(),
            Self::Groups { parent, .. } => parent.as_key(),
        }
    }

    /// Namespace the list is persisted in
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        match self {
            Self::Items { .. } => Namespace::ItemOrder,
            Self::Groups { .. } => Namespace::GroupOrder,
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Items { collection, filter } => write!(f, "items[{collection}:{filter}]"),
            Self::Groups { collection, parent } => write!(f, "groups[{collection}:{parent}]"),
        }
    }
}
