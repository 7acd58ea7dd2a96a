use anyhow::Result;
use clap::Parser;
use filekeeper::{
    app::config::Config,
    cli::{self, Cli},
    file::FileManager,
};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbose flag
    let cli = Cli::parse();

    // Set config directory override if --config flag was used
    if let Some(ref config_dir) = cli.config {
        filekeeper::util::paths::set_config_dir_override(Some(config_dir.clone()));
    }

    // Load configuration (logging level comes from it). Nothing on this path
    // logs; problems are reported once the subscriber is installed.
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Get logs directory (creates if needed)
    let logs_dir = filekeeper::util::paths::get_logs_dir().unwrap_or_else(|_| PathBuf::from("."));
    std::fs::create_dir_all(&logs_dir).ok();

    // Set up daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "filekeeper.jsonl");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set log level based on verbose flag
    let log_level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        config.log_level()
    };
    let file_filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    let json_layer = config.logging.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking.clone())
            .with_ansi(false)
            .with_filter(file_filter)
    });
    let text_layer = (!config.logging.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking.clone())
            .with_ansi(false)
            .with_filter(file_filter)
    });

    // Failures of boolean-returning operations surface on stderr as well
    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Starting File Keeper...");
    if cli.verbose {
        tracing::info!("Verbose logging enabled (TRACE level)");
    }
    tracing::trace!("CLI arguments: {:?}", cli);

    match filekeeper::util::paths::get_app_config_path() {
        Ok(path) if path.exists() => tracing::debug!("Loaded config from {:?}", path),
        Ok(path) => tracing::info!("Config not found at {:?}, using defaults", path),
        Err(e) => tracing::warn!("Could not resolve config directory: {:#}", e),
    }
    if let Some(e) = config_error {
        tracing::warn!("Failed to load config, using defaults: {:#}", e);
    }
    tracing::debug!("Config loaded: {:?}", config);

    // Command-line flags take precedence over settings.toml for this run only
    let manager = FileManager::from_config(&cli.apply_overrides(&config));
    tracing::debug!("Base directory: {:?}", manager.base_path());

    let exit_code = cli::handler::handle_command(cli.command, &manager, &config);

    // Flush the non-blocking writer before exiting
    drop(guard);
    std::process::exit(exit_code);
}
