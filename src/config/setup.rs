//! Interactive setup wizard for first-time configuration
//!
//! Asks for the first mod collection when modshelf runs without a config file.

use super::ModshelfConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for the first collection
///
/// 1. Prompts for a collection name (default: "default")
/// 2. Prompts for the collection's mods folder
/// 3. Prompts for where ordering state is kept (default: system data directory)
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The system data directory cannot be determined
/// - User input cannot be read
/// - The configuration cannot be saved
///
/// # Examples
/// ```ignore
/// use modshelf::config::first_time_setup;
///
/// let config = first_time_setup()?;
/// println!("Configuration created with {} collection(s)", config.collections.len());
/// ```
pub fn first_time_setup() -> Result<ModshelfConfig, ConfigError> {
    println!("Welcome to modshelf! Let's register your first mod collection.\n");

    let theme = ColorfulTheme::default();
    let read_error = |e: dialoguer::Error| ConfigError::Message(format!("Failed to read input: {e}"));

    let name: String = Input::with_theme(&theme)
        .with_prompt("Collection name")
        .default("default".to_string())
        .interact_text()
        .map_err(read_error)?;

    let mods_dir: String = Input::with_theme(&theme)
        .with_prompt("Mods folder")
        .validate_with(|input: &String| -> Result<(), String> {
            if PathBuf::from(input).is_dir() {
                Ok(())
            } else {
                Err(format!("'{input}' is not a directory"))
            }
        })
        .interact_text()
        .map_err(read_error)?;

    let default_state = ModshelfConfig::default_state_dir()?;
    let state_dir: String = Input::with_theme(&theme)
        .with_prompt("State location")
        .default(default_state.to_string_lossy().to_string())
        .interact_text()
        .map_err(read_error)?;

    let mut config = ModshelfConfig::default();
    config.collections.insert(name.clone(), PathBuf::from(mods_dir));
    config.default_collection = Some(name);
    let state_dir = PathBuf::from(state_dir);
    if state_dir != default_state {
        config.state_dir = Some(state_dir);
    }

    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
