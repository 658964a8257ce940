//! Tree, expand and collapse commands

use super::CliSession;
use crate::{ModshelfError, output};
use colored::Colorize;

type Result<T> = std::result::Result<T, ModshelfError>;

/// Print the group tree
///
/// Without `all`, collapsed groups hide their children.
///
/// # Errors
///
/// Currently infallible; returns `Result` like the other commands.
pub fn execute(session: &CliSession, all: bool, quiet: bool) -> Result<()> {
    let tree = session.group_tree();
    let expanded = session.expanded_groups();
    let rows = if all {
        tree.iter_depth_first()
    } else {
        tree.visible(&expanded)
    };

    if !quiet {
        let ungrouped = session
            .snapshot()
            .items
            .iter()
            .filter(|item| item.is_ungrouped())
            .count();
        println!("Groups in {}:", session.collection());
        println!("  {} {}", "Root".yellow(), format!("({ungrouped})").dimmed());
    }

    for node in rows {
        let state = (!node.children.is_empty()).then(|| expanded.contains(&node.id));
        println!("{}", output::group_line(node, state, quiet));
    }
    Ok(())
}

/// Remember a group as expanded or collapsed
///
/// # Errors
///
/// Returns `ModshelfError::InvalidInput` if the group does not exist.
pub fn set_expanded(session: &CliSession, group: &str, expanded: bool, quiet: bool) -> Result<()> {
    if !session.set_expanded(group, expanded) {
        return Err(ModshelfError::InvalidInput(format!("Group '{group}' not found")));
    }
    if !quiet {
        println!("{} {group}", if expanded { "Expanded" } else { "Collapsed" });
    }
    Ok(())
}
