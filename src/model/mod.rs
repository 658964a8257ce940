//! Core data model for mod collections
//!
//! Items and groups are owned by the repository; this crate only keeps a
//! read-only snapshot of them. Group ids are slash-delimited paths
//! (`"Characters/Alpha"`), which is also how the hierarchy is encoded.
//!
//! Two group ids are reserved:
//! - [`ROOT_GROUP`] (`"Root"`): the explicit bucket for ungrouped items
//! - [`ALL_GROUPS`] (`"All"`): the virtual "no filter" selection, never persisted

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub mod scope;

pub use scope::ScopeKey;

/// Group id of the ungrouped bucket
pub const ROOT_GROUP: &str = "Root";

/// Virtual group id meaning "no group filter"
pub const ALL_GROUPS: &str = "All";

/// Persisted key for the top level of the group tree
///
/// Group ids are derived from directory names, which can never contain NUL.
pub const ROOT_SENTINEL: &str = "\u{0}root";

/// Delimiter between group path segments
pub const GROUP_DELIMITER: char = '/';

/// A single mod in a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable id, unchanged when the item moves between groups
    pub id: String,
    /// Display name
    pub name: String,
    /// Owning group id, or [`ROOT_GROUP`]
    pub group_id: String,
    pub enabled: bool,
    /// Unix seconds
    pub last_modified: u64,
    /// Location relative to the collection root
    #[serde(default)]
    pub relative_path: String,
    /// Paths to preview images shipped with the mod
    #[serde(default)]
    pub preview_refs: Vec<String>,
}

impl Item {
    /// Create an enabled item with no location information
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group_id: group_id.into(),
            enabled: true,
            last_modified: 0,
            relative_path: String::new(),
            preview_refs: Vec::new(),
        }
    }

    /// Set the modification time
    #[must_use]
    pub const fn modified_at(mut self, last_modified: u64) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Whether the item sits in the ungrouped bucket
    #[must_use]
    pub fn is_ungrouped(&self) -> bool {
        self.group_id == ROOT_GROUP
    }
}

/// A named folder of items; may nest under another group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Slash-delimited path, globally unique within a collection
    pub id: String,
    /// Path to an icon image, if the group has one
    #[serde(default)]
    pub icon_ref: Option<String>,
}

impl Group {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            icon_ref: None,
        }
    }

    /// Last path segment of the id, used as the display label
    #[must_use]
    pub fn name(&self) -> &str {
        group_name(&self.id)
    }
}

/// Whether a group id is one of the reserved ids
#[must_use]
pub fn is_reserved_group(id: &str) -> bool {
    id == ROOT_GROUP || id == ALL_GROUPS
}

/// Last path segment of a group id
///
/// Falls back to the whole id when the last segment is empty (`"a/"`).
///
/// # Examples
/// ```
/// # use modshelf::model::group_name;
/// assert_eq!(group_name("Weapons/Rare"), "Rare");
/// assert_eq!(group_name("Weapons"), "Weapons");
/// ```
#[must_use]
pub fn group_name(id: &str) -> &str {
    match id.rsplit_once(GROUP_DELIMITER) {
        Some((_, last)) if !last.is_empty() => last,
        _ => id,
    }
}

/// Parent of a group within the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParentGroup {
    /// Top level of the tree
    Top,
    /// Nested under the named group
    Group(String),
}

impl ParentGroup {
    /// Derive the parent from a group id by dropping its last segment
    ///
    /// Ids without a delimiter, or with an empty parent segment (`"/x"`),
    /// live at the top level.
    ///
    /// # Examples
    /// ```
    /// # use modshelf::model::ParentGroup;
    /// assert_eq!(ParentGroup::of("Characters/Alpha"), ParentGroup::Group("Characters".into()));
    /// assert_eq!(ParentGroup::of("Characters"), ParentGroup::Top);
    /// assert_eq!(ParentGroup::of("/Alpha"), ParentGroup::Top);
    /// ```
    #[must_use]
    pub fn of(group_id: &str) -> Self {
        match group_id.rsplit_once(GROUP_DELIMITER) {
            Some((parent, _)) if !parent.is_empty() => Self::Group(parent.to_string()),
            _ => Self::Top,
        }
    }

    /// Like [`ParentGroup::of`], but a parent that is not a live group is
    /// promoted to the top level so the group stays reachable
    #[must_use]
    pub fn resolve(group_id: &str, live_groups: &HashSet<&str>) -> Self {
        match Self::of(group_id) {
            Self::Group(parent) if live_groups.contains(parent.as_str()) => Self::Group(parent),
            _ => Self::Top,
        }
    }

    /// Persisted key for this parent
    #[must_use]
    pub fn as_key(&self) -> &str {
        match self {
            Self::Top => ROOT_SENTINEL,
            Self::Group(id) => id,
        }
    }
}

impl fmt::Display for ParentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "(top level)"),
            Self::Group(id) => write!(f, "{id}"),
        }
    }
}

/// Which items a view shows
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum GroupFilter {
    /// No filtering
    #[default]
    All,
    /// Only ungrouped items
    Root,
    /// Only items directly in this group
    Group(String),
}

impl GroupFilter {
    /// Parse a filter from its persisted / user-facing form
    ///
    /// # Examples
    /// ```
    /// # use modshelf::model::GroupFilter;
    /// assert_eq!(GroupFilter::parse("All"), GroupFilter::All);
    /// assert_eq!(GroupFilter::parse("Root"), GroupFilter::Root);
    /// assert_eq!(GroupFilter::parse("Weapons"), GroupFilter::Group("Weapons".into()));
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            ALL_GROUPS | "" => Self::All,
            ROOT_GROUP => Self::Root,
            other => Self::Group(other.to_string()),
        }
    }

    /// Persisted key for this filter
    #[must_use]
    pub fn as_key(&self) -> &str {
        match self {
            Self::All => ALL_GROUPS,
            Self::Root => ROOT_GROUP,
            Self::Group(id) => id,
        }
    }

    /// Whether an item passes this filter
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Root => item.group_id == ROOT_GROUP,
            Self::Group(id) => item.group_id == *id,
        }
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_of_nested_group() {
        assert_eq!(
            ParentGroup::of("a/b/c"),
            ParentGroup::Group("a/b".to_string())
        );
        assert_eq!(ParentGroup::of("a"), ParentGroup::Top);
    }

    #[test]
    fn test_parent_of_malformed_ids() {
        assert_eq!(ParentGroup::of("/b"), ParentGroup::Top);
        assert_eq!(ParentGroup::of(""), ParentGroup::Top);
        assert_eq!(ParentGroup::of("a//b"), ParentGroup::Group("a/".to_string()));
    }

    #[test]
    fn test_resolve_promotes_orphans() {
        let live: HashSet<&str> = ["a", "a/b"].into_iter().collect();
        assert_eq!(
            ParentGroup::resolve("a/b", &live),
            ParentGroup::Group("a".to_string())
        );
        assert_eq!(ParentGroup::resolve("x/y", &live), ParentGroup::Top);
        assert_eq!(ParentGroup::resolve("a//b", &live), ParentGroup::Top);
    }

    #[test]
    fn test_root_sentinel_is_not_a_group_id() {
        assert_eq!(ParentGroup::Top.as_key(), ROOT_SENTINEL);
        assert_ne!(ROOT_SENTINEL, ROOT_GROUP);
        assert!(!ROOT_SENTINEL.contains(GROUP_DELIMITER));
    }

    #[test]
    fn test_group_filter_matches() {
        let loose = Item::new("a", "A", ROOT_GROUP);
        let grouped = Item::new("b", "B", "Weapons");
        let nested = Item::new("c", "C", "Weapons/Rare");

        assert!(GroupFilter::All.matches(&loose));
        assert!(GroupFilter::All.matches(&nested));
        assert!(GroupFilter::Root.matches(&loose));
        assert!(!GroupFilter::Root.matches(&grouped));

        let weapons = GroupFilter::Group("Weapons".to_string());
        assert!(weapons.matches(&grouped));
        // Direct membership only
        assert!(!weapons.matches(&nested));
    }

    #[test]
    fn test_group_filter_key_round_trip() {
        for key in ["All", "Root", "Weapons/Rare"] {
            assert_eq!(GroupFilter::parse(key).as_key(), key);
        }
    }

    #[test]
    fn test_group_name() {
        assert_eq!(group_name("a/b/c"), "c");
        assert_eq!(group_name("a/"), "a/");
        assert_eq!(Group::new("Characters/Alpha").name(), "Alpha");
    }

    #[test]
    fn test_reserved_groups() {
        assert!(is_reserved_group("Root"));
        assert!(is_reserved_group("All"));
        assert!(!is_reserved_group("root"));
    }
}
