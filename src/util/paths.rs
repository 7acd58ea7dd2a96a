use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::RwLock;

const APP_DIR_NAME: &str = "filekeeper";
const CONFIG_DIR_ENV: &str = "FILEKEEPER_CONFIG_DIR";
const SETTINGS_FILE: &str = "settings.toml";
const LOGS_DIR: &str = ".logs";

// Set from --config
static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

pub fn set_config_dir_override(path: Option<PathBuf>) {
    let mut override_path = CONFIG_DIR_OVERRIDE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *override_path = path;
}

pub fn get_config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Pick the config directory without touching the filesystem.
///
/// An explicit directory (`--config`, then `FILEKEEPER_CONFIG_DIR`) wins over
/// the platform location (`~/.config/filekeeper` on Unix, `%APPDATA%\filekeeper`
/// on Windows). An empty environment value counts as unset.
pub fn select_config_directory(
    override_dir: Option<PathBuf>,
    env_dir: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    match env_dir {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => get_user_config_dir(),
    }
}

/// Resolve the config directory and create it if missing.
///
/// Nothing here logs: this runs before the subscriber is installed.
pub fn find_config_directory() -> Result<PathBuf> {
    let dir = select_config_directory(
        get_config_dir_override(),
        std::env::var_os(CONFIG_DIR_ENV),
    )?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory {:?}", dir))?;
    Ok(dir)
}

fn get_user_config_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine user config directory"))?;
    Ok(base_dir.join(APP_DIR_NAME))
}

pub fn get_app_config_path() -> Result<PathBuf> {
    Ok(find_config_directory()?.join(SETTINGS_FILE))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    Ok(find_config_directory()?.join(LOGS_DIR))
}
