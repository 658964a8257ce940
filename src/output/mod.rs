//! Output formatting for CLI display
//!
//! Items and groups are printed one per line. In quiet mode only the id is
//! printed so the output can be piped.

use crate::model::{Item, ROOT_GROUP};
use crate::tree::GroupNode;
use chrono::{DateTime, Utc};
use colored::Colorize;

/// Render a Unix timestamp as a calendar date
///
/// Out-of-range values print as `-`.
///
/// # Examples
/// ```
/// # use modshelf::output::format_timestamp;
/// assert_eq!(format_timestamp(0), "1970-01-01");
/// ```
#[must_use]
pub fn format_timestamp(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map_or_else(|| "-".to_string(), |time| time.format("%Y-%m-%d").to_string())
}

/// Format an item for display
///
/// Disabled items are dimmed. The group is shown when the view spans
/// several groups.
#[must_use]
pub fn item_line(item: &Item, show_group: bool, quiet: bool) -> String {
    if quiet {
        return item.id.clone();
    }

    let name = if item.enabled {
        item.name.bold().to_string()
    } else {
        format!("{} (disabled)", item.name).dimmed().to_string()
    };
    let date = format_timestamp(item.last_modified).dimmed();

    if show_group && item.group_id != ROOT_GROUP {
        format!("  {name} {} {date}", format!("[{}]", item.group_id).cyan())
    } else {
        format!("  {name} {date}")
    }
}

/// Format a group tree row with indentation and item count
///
/// `expanded` is `None` for leaf groups.
#[must_use]
pub fn group_line(node: &GroupNode, expanded: Option<bool>, quiet: bool) -> String {
    if quiet {
        return node.id.clone();
    }

    let marker = match expanded {
        Some(true) => "▾",
        Some(false) => "▸",
        None => " ",
    };
    let indent = "  ".repeat(node.depth + 1);
    format!(
        "{indent}{marker} {} {}",
        node.name.green(),
        format!("({})", node.count).dimmed()
    )
}
