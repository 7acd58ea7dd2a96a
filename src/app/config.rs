use crate::file::manager::DEFAULT_JSON_INDENT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration (saved to config/settings.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Directory every filename is resolved against
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    #[serde(default = "default_json_indent")]
    pub json_indent: usize,
    /// Reject filenames that resolve outside base_path
    #[serde(default)]
    pub confine_to_base: bool,
}

fn default_base_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_json_indent() -> usize {
    DEFAULT_JSON_INDENT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for the log file (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write JSON lines instead of plain text
    #[serde(default = "default_log_json")]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_json() -> bool {
    true
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            json_indent: default_json_indent(),
            confine_to_base: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_log_json(),
        }
    }
}

impl Config {
    /// Load configuration from the config directory
    pub fn load() -> anyhow::Result<Self> {
        let config_path = crate::util::paths::get_app_config_path()?;
        Self::load_from(&config_path)
    }

    /// Save configuration to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = crate::util::paths::get_app_config_path()?;
        self.save_to(&config_path)?;
        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Load from an explicit path. A missing file yields defaults.
    /// Does not log, since it runs before tracing is set up.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read {:?}", path))?;
        let mut config: Config = toml::from_str(&content)
            .context(format!("Failed to parse {:?}", path))?;

        config.validate()?;

        // Relative base paths in the file are taken relative to the config directory
        if let Some(config_dir) = path.parent() {
            if config.files.base_path.is_relative() && config.files.base_path != default_base_path() {
                config.files.base_path = config_dir.join(&config.files.base_path);
            }
        }

        Ok(config)
    }

    /// Save to an explicit path (atomic write using temp file + rename)
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        use anyhow::Context;

        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;

        let temp_path = path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content).context("Failed to write temp config file")?;
        std::fs::rename(&temp_path, path).context("Failed to rename temp config file")?;

        Ok(())
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid logging.level '{}' (expected one of: {})",
                self.logging.level,
                LEVELS.join(", ")
            );
        }
        if self.files.json_indent > 16 {
            anyhow::bail!(
                "Invalid files.json_indent {} (maximum is 16)",
                self.files.json_indent
            );
        }
        Ok(())
    }

    /// Map logging.level onto a tracing level
    pub fn log_level(&self) -> tracing::Level {
        match self.logging.level.to_lowercase().as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        }
    }
}
