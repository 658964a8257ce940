//! Item commands - move, enable, disable and delete

use super::CliSession;
use crate::repository::ModRepository;
use crate::ModshelfError;

type Result<T> = std::result::Result<T, ModshelfError>;

/// Put an item into another group
///
/// # Errors
///
/// Returns `ModshelfError::RepoError` if the repository refuses the move.
pub fn move_item(session: &CliSession, item: &str, group: &str, quiet: bool) -> Result<()> {
    session.move_item(item, group)?;
    if !quiet {
        println!("Moved {item} to {group}");
    }
    Ok(())
}

/// Enable or disable an item
///
/// # Errors
///
/// Returns `ModshelfError::RepoError` if the item is missing or cannot be renamed.
pub fn set_enabled(session: &CliSession, item: &str, enabled: bool, quiet: bool) -> Result<()> {
    session
        .repository()
        .set_enabled(session.collection(), item, enabled)?;
    if !quiet {
        println!("{} {item}", if enabled { "Enabled" } else { "Disabled" });
    }
    Ok(())
}

/// Delete an item
///
/// # Errors
///
/// Returns `ModshelfError::RepoError` if the item is missing or cannot be removed.
pub fn delete(session: &CliSession, item: &str, quiet: bool) -> Result<()> {
    session.repository().delete_item(session.collection(), item)?;
    if !quiet {
        println!("Deleted {item}");
    }
    Ok(())
}
