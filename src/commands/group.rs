//! Group management commands

use super::CliSession;
use crate::cli::GroupCommands;
use crate::repository::ModRepository;
use crate::ModshelfError;

type Result<T> = std::result::Result<T, ModshelfError>;

/// Execute a group subcommand
///
/// A renamed group keeps its expanded state; its position among siblings is
/// recomputed like any new group's.
///
/// # Errors
///
/// Returns `ModshelfError::RepoError` if the repository refuses the change.
pub fn execute(session: &mut CliSession, command: &GroupCommands, quiet: bool) -> Result<()> {
    let collection = session.collection().to_string();
    match command {
        GroupCommands::Create { group } => {
            session.repository().create_group(&collection, group)?;
            if !quiet {
                println!("Created group {group}");
            }
        }
        GroupCommands::Rename { group, new_name } => {
            let was_expanded = session.expanded_groups().contains(group);
            session.repository().rename_group(&collection, group, new_name)?;
            session.refresh()?;
            if was_expanded {
                session.set_expanded(new_name, true);
            }
            if !quiet {
                println!("Renamed group {group} to {new_name}");
            }
        }
        GroupCommands::Delete { group } => {
            session.repository().delete_group(&collection, group)?;
            if !quiet {
                println!("Deleted group {group}");
            }
        }
    }
    Ok(())
}
