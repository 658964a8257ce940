//! Modshelf CLI application entry point
//!
//! Command-line front end for the ordering engine. Every invocation scans the
//! chosen collection, applies one operation, and exits; ordering state is
//! kept in a sled database between runs.
//!
//! # Usage
//!
//! ```bash
//! # Items of the default collection in display order (default command)
//! modshelf
//! modshelf list -g Weapons -s axe
//!
//! # Group tree, and remembered expansion
//! modshelf tree
//! modshelf expand Characters
//!
//! # Manual ordering
//! modshelf reorder "Blue Axe" "Red Axe" -g Weapons
//! modshelf reorder-group Characters/Beta Characters/Alpha
//!
//! # Put an item into another group
//! modshelf move "Blue Axe" Weapons/Rare
//!
//! # Work on another collection, with debug logging on stderr
//! modshelf -c other -v tree
//! ```
//!
//! # Configuration
//!
//! On first run, modshelf will prompt for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/modshelf/config.toml` on Linux).

use dialoguer::{Confirm, theme::ColorfulTheme};
use modshelf::{
    ModshelfError,
    cli::{Cli, CollectionCommands, Commands, ConfigCommands, GroupCommands},
    commands::{self, CliSession},
    config::ModshelfConfig,
    drag::HeadlessSurface,
    repository::FsRepository,
    session::Session,
    store::SledStore,
};
use std::rc::Rc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, ModshelfError>;

/// Send logs to stderr; `RUST_LOG` overrides the verbosity flag
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "modshelf=debug",
        _ => "modshelf=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prompt user for yes/no confirmation
///
/// # Errors
/// Returns `ModshelfError` if the prompt cannot be shown.
fn confirm(prompt: &str, quiet: bool) -> Result<bool> {
    if quiet {
        return Ok(true);
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ModshelfError::InvalidInput(format!("Failed to read input: {e}")))
}

/// Open the ordering state and scan the chosen collection
fn open_session(config: &ModshelfConfig, requested: Option<&str>) -> Result<CliSession> {
    let (name, root) = config.resolve_collection(requested)?;
    let state_dir = config.state_path()?;
    debug!(collection = %name, root = %root.display(), state = %state_dir.display(), "opening session");

    let store = SledStore::open(&state_dir)?;
    let repository = FsRepository::default().with_collection(name.as_str(), root);
    let session = Session::open(
        repository,
        Rc::new(store),
        HeadlessSurface,
        &name,
        config.drag_threshold,
    )?;
    Ok(session)
}

fn handle_collection_command(mut config: ModshelfConfig, command: &CollectionCommands, quiet: bool) -> Result<()> {
    match command {
        CollectionCommands::Add { name, path } => {
            if config.get_collection(name).is_some() {
                return Err(ModshelfError::InvalidInput(format!("Collection '{name}' already exists")));
            }
            if !path.is_dir() {
                return Err(ModshelfError::InvalidInput(format!(
                    "'{}' is not a directory",
                    path.display()
                )));
            }

            let resolved_path = path.canonicalize()?;
            config.add_collection(name.clone(), resolved_path.clone())?;

            if !quiet {
                println!("Collection '{name}' added at {}", resolved_path.display());
            }

            if config.collections.len() == 1 {
                config.set_default_collection(name.clone())?;
                if !quiet {
                    println!("Set '{name}' as default collection");
                }
            }
        }
        CollectionCommands::List => {
            if config.collections.is_empty() {
                if !quiet {
                    println!("No collections configured.");
                    println!("Add one with: modshelf collection add <name> <path>");
                }
                return Ok(());
            }

            if !quiet {
                println!("Configured collections:");
            }

            let default_collection = config.get_default_collection();
            for name in config.list_collections() {
                if quiet {
                    println!("{name}");
                } else if let Some(path) = config.get_collection(name) {
                    let marker = if default_collection == Some(name) { " (default)" } else { "" };
                    println!("  {name}{marker}: {}", path.display());
                }
            }
        }
        CollectionCommands::Remove { name, forget_state } => {
            if config.get_collection(name).is_none() {
                return Err(ModshelfError::InvalidInput(format!("Collection '{name}' not found")));
            }
            if !confirm(&format!("Remove collection '{name}' from configuration?"), quiet)? {
                if !quiet {
                    println!("Cancelled.");
                }
                return Ok(());
            }

            if *forget_state {
                let store = SledStore::open(config.state_path()?)?;
                store.forget_collection(name)?;
            }
            config.remove_collection(name)?;

            if !quiet {
                println!("Collection '{name}' removed from configuration");
            }
        }
        CollectionCommands::SetDefault { name } => {
            config.set_default_collection(name.clone())?;
            if !quiet {
                println!("Default collection set to '{name}'");
            }
        }
    }
    Ok(())
}

fn handle_config_command(mut config: ModshelfConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = ConfigCommands::split_setting(setting).ok_or_else(|| {
                ModshelfError::InvalidInput("Invalid format. Use: modshelf config set key=value".into())
            })?;
            config.set(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {}", config.get(key).unwrap_or_default());
            }
        }
        ConfigCommands::Get { key } => {
            let value = config.get(key).ok_or_else(|| {
                ModshelfError::InvalidInput(format!(
                    "Unknown configuration key: '{key}'. Available keys: {}",
                    modshelf::config::SETTING_KEYS.join(", ")
                ))
            })?;
            println!("{value}");
        }
    }
    Ok(())
}

/// Main entry point for the modshelf application
///
/// Loads configuration, parses command-line arguments, and dispatches to the
/// appropriate command handler.
///
/// # Errors
///
/// Returns `ModshelfError` if configuration loading fails, the collection cannot
/// be opened, or any command handler returns an error.
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = ModshelfConfig::load_or_setup()?;
    let quiet = cli.quiet || config.quiet;
    let command = cli.get_command();

    match &command {
        Commands::Collection { command } => return handle_collection_command(config, command, quiet),
        Commands::Config { command } => return handle_config_command(config, command, quiet),
        _ => {}
    }

    let mut session = open_session(&config, cli.collection.as_deref())?;

    match &command {
        Commands::List { group, search } => {
            commands::list(&mut session, group.as_deref(), search.as_deref(), quiet)?;
        }
        Commands::Tree { all } => commands::tree(&session, *all, quiet)?,
        Commands::Reorder { item, target, group } => {
            commands::order::reorder_items(&mut session, item, target, group.as_deref(), quiet)?;
        }
        Commands::ReorderGroup { group, target } => {
            commands::order::reorder_groups(&session, group, target, quiet)?;
        }
        Commands::Move { item, group } => commands::item::move_item(&session, item, group, quiet)?,
        Commands::Expand { group } => commands::tree::set_expanded(&session, group, true, quiet)?,
        Commands::Collapse { group } => commands::tree::set_expanded(&session, group, false, quiet)?,
        Commands::Enable { item } => commands::item::set_enabled(&session, item, true, quiet)?,
        Commands::Disable { item } => commands::item::set_enabled(&session, item, false, quiet)?,
        Commands::Delete { item } => {
            if confirm(&format!("Delete '{item}' from disk?"), quiet)? {
                commands::item::delete(&session, item, quiet)?;
            } else if !quiet {
                println!("Cancelled.");
            }
        }
        Commands::Group {
            command: GroupCommands::Delete { group },
        } if !confirm(&format!("Delete group '{group}' and everything in it?"), quiet)? => {
            if !quiet {
                println!("Cancelled.");
            }
        }
        Commands::Group { command } => commands::group::execute(&mut session, command, quiet)?,
        Commands::Collection { .. } | Commands::Config { .. } => {}
    }
    Ok(())
}
