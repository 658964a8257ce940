//! Command implementations
//!
//! Each command is a module with functions that take the open session and
//! parsed CLI args and carry out the operation.

use crate::drag::HeadlessSurface;
use crate::model::GroupFilter;
use crate::repository::FsRepository;
use crate::session::Session;
use crate::ModshelfError;

pub mod group;
pub mod item;
pub mod list;
pub mod order;
pub mod tree;

pub use list::execute as list;
pub use tree::execute as tree;

/// Session type the command line works with
pub type CliSession = Session<FsRepository, HeadlessSurface>;

type Result<T> = std::result::Result<T, ModshelfError>;

/// Switch the session to the view named by a `--group` argument
///
/// # Errors
///
/// Returns `ModshelfError::InvalidInput` if the group does not exist.
pub fn select_filter(session: &mut CliSession, group: Option<&str>) -> Result<()> {
    let filter = group.map_or(GroupFilter::All, GroupFilter::parse);
    if !session.group_filters().contains(&filter) {
        return Err(ModshelfError::InvalidInput(format!(
            "Group '{filter}' not found in collection '{}'",
            session.collection()
        )));
    }
    session.set_group_filter(filter);
    Ok(())
}
