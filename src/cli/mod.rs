use crate::app::config::Config;
use clap::{Parser, Subcommand};

pub mod error;
pub mod handler;
pub mod output;

/// File Keeper - text, JSON and CSV file operations rooted at a base directory
#[derive(Parser, Debug)]
#[command(name = "filekeeper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base directory for all filenames (overrides files.base_path)
    #[arg(long, global = true, value_name = "PATH")]
    pub base: Option<std::path::PathBuf>,

    /// Override config directory path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Reject filenames that resolve outside the base directory
    #[arg(long, global = true)]
    pub confine: bool,

    /// Enable verbose logging (TRACE level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Copy of `config` with `--base` and `--confine` applied. The loaded
    /// settings stay untouched so `config init` never persists one-off flags.
    pub fn apply_overrides(&self, config: &Config) -> Config {
        let mut effective = config.clone();
        if let Some(ref base) = self.base {
            effective.files.base_path = base.clone();
        }
        if self.confine {
            effective.files.confine_to_base = true;
        }
        effective
    }
}

/// CLI commands
///
/// Content arguments accept `-` to read from standard input.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a text file
    Read {
        /// Filename relative to the base directory
        file: String,
    },

    /// Replace a text file's contents
    Write {
        file: String,

        /// Text to write
        content: String,
    },

    /// Append text to a file
    Append {
        file: String,

        /// Text to append
        content: String,
    },

    /// Print a JSON file
    ReadJson {
        file: String,
    },

    /// Write a JSON value to a file
    WriteJson {
        file: String,

        /// JSON document to write
        json: String,

        /// Indentation width (0 keeps line breaks without indenting)
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Print a CSV file
    ReadCsv {
        file: String,

        /// Output rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a JSON array of objects as CSV
    WriteCsv {
        file: String,

        /// JSON array of objects, one per row
        rows: String,

        /// Comma-separated column order (default: keys of the first row)
        #[arg(long)]
        fields: Option<String>,
    },

    /// List files in the base directory
    List {
        /// Only names ending with this suffix (e.g. .txt)
        #[arg(long)]
        ext: Option<String>,

        /// Show size and modification time
        #[arg(long, short)]
        long: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a regular file exists
    Exists {
        file: String,
    },

    /// Delete a regular file
    Delete {
        file: String,
    },

    /// Walk through every operation in a temporary directory
    Demo,

    /// Manage configuration
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the configuration loaded from settings.toml
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the path of settings.toml
    Path,

    /// Write the current configuration to settings.toml
    Init {
        /// Overwrite an existing settings.toml
        #[arg(long)]
        force: bool,
    },
}
