//! List command - items of a view in display order

use super::{CliSession, select_filter};
use crate::model::GroupFilter;
use crate::{ModshelfError, output};

type Result<T> = std::result::Result<T, ModshelfError>;

/// Execute the list command
///
/// # Errors
///
/// Returns `ModshelfError::InvalidInput` if the group does not exist.
pub fn execute(session: &mut CliSession, group: Option<&str>, search: Option<&str>, quiet: bool) -> Result<()> {
    select_filter(session, group)?;
    if let Some(text) = search {
        session.set_search(text);
    }

    let items = session.view();
    let filter = session.group_filter().clone();

    if items.is_empty() {
        if !quiet {
            println!("No items found in {} ({filter}).", session.collection());
        }
        return Ok(());
    }

    if !quiet {
        println!("Items in {} ({filter}):", session.collection());
    }
    let show_group = filter == GroupFilter::All;
    for item in &items {
        println!("{}", output::item_line(item, show_group, quiet));
    }
    Ok(())
}
