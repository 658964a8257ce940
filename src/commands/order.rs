//! Reorder commands - keyboard equivalents of dragging

use super::{CliSession, select_filter};
use crate::ModshelfError;

type Result<T> = std::result::Result<T, ModshelfError>;

/// Move `item` to `target`'s position in the view of `group`
///
/// # Errors
///
/// Returns `ModshelfError::InvalidInput` if the view does not exist or the
/// two ids are not distinct items of that view.
pub fn reorder_items(
    session: &mut CliSession,
    item: &str,
    target: &str,
    group: Option<&str>,
    quiet: bool,
) -> Result<()> {
    select_filter(session, group)?;
    if !session.reorder_items(item, target) {
        return Err(ModshelfError::InvalidInput(format!(
            "Cannot reorder '{item}' onto '{target}': both must be different items in view '{}'",
            session.group_filter()
        )));
    }
    if !quiet {
        println!("Moved {item} to the position of {target}");
    }
    Ok(())
}

/// Move `group` to sibling `target`'s position
///
/// # Errors
///
/// Returns `ModshelfError::InvalidInput` if the groups are missing or do not
/// share a parent.
pub fn reorder_groups(session: &CliSession, group: &str, target: &str, quiet: bool) -> Result<()> {
    if !session.reorder_groups(group, target) {
        return Err(ModshelfError::InvalidInput(format!(
            "Cannot reorder '{group}' onto '{target}': both must be different groups with the same parent"
        )));
    }
    if !quiet {
        println!("Moved group {group} to the position of {target}");
    }
    Ok(())
}
