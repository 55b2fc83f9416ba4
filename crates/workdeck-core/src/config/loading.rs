//! Configuration loading and merging logic.
//!
//! This module handles loading configuration from files and merging
//! configurations from different sources (user config, project config).
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.workdeck/config.toml` (global user preferences)
//! 3. **Project config** - `<project>/.workdeck/config.toml` (project-specific overrides)

use crate::config::types::{BoardConfig, SyncConfig};
use crate::config::validation::validate_config;
use std::fs;
use std::path::{Path, PathBuf};

/// Check if an error is a "file not found" error.
fn is_file_not_found(e: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(io_err) = e.downcast_ref::<std::io::Error>() {
        return io_err.kind() == std::io::ErrorKind::NotFound;
    }

    let err_str = e.to_string();
    err_str.contains("No such file or directory") || err_str.contains("cannot find the path")
}

/// Load configuration from the hierarchy of config files.
///
/// Loads and merges configuration from:
/// 1. Default values
/// 2. User config (`~/.workdeck/config.toml`)
/// 3. Project config (`<project_root>/.workdeck/config.toml`)
///
/// # Errors
///
/// Returns an error if validation fails. Missing config files are not errors.
pub fn load_hierarchy_from(
    project_root: &Path,
) -> Result<BoardConfig, Box<dyn std::error::Error>> {
    let mut config = BoardConfig::default();

    // Load user config (file not found is expected, parse errors fail)
    match load_user_config() {
        Ok(user_config) => config = merge_configs(config, user_config),
        Err(e) if !is_file_not_found(e.as_ref()) => return Err(e),
        Err(_) => {} // File not found - continue with defaults
    }

    // Load project config (file not found is expected, parse errors fail)
    match load_project_config(project_root) {
        Ok(project_config) => config = merge_configs(config, project_config),
        Err(e) if !is_file_not_found(e.as_ref()) => return Err(e),
        Err(_) => {} // File not found - continue with merged config
    }

    // Validate the final configuration
    validate_config(&config)?;

    Ok(config)
}

/// Load the user configuration from ~/.workdeck/config.toml.
fn load_user_config() -> Result<BoardConfig, Box<dyn std::error::Error>> {
    let home_dir = dirs::home_dir().ok_or("Could not find home directory")?;
    let config_path = home_dir.join(".workdeck").join("config.toml");
    load_config_file(&config_path)
}

/// Load the project configuration from `<project_root>/.workdeck/config.toml`.
fn load_project_config(project_root: &Path) -> Result<BoardConfig, Box<dyn std::error::Error>> {
    let config_path = project_root.join(".workdeck").join("config.toml");
    load_config_file(&config_path)
}

/// Load a configuration file from the given path.
fn load_config_file(path: &PathBuf) -> Result<BoardConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
    let config: BoardConfig = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
    Ok(config)
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields replace base values only when present in the override.
pub fn merge_configs(base: BoardConfig, override_config: BoardConfig) -> BoardConfig {
    BoardConfig {
        sync: SyncConfig {
            debounce_ms: override_config.sync.debounce_ms.or(base.sync.debounce_ms),
            poll_interval_secs: override_config
                .sync
                .poll_interval_secs
                .or(base.sync.poll_interval_secs),
            ipc_enabled: override_config.sync.ipc_enabled,
        },
    }
}
