use super::error;
use super::output;
use super::{Commands, ConfigAction};
use crate::app::config::Config;
use crate::file::{FileManager, Record};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::io::Read;

/// Handle a CLI command and return exit code
pub fn handle_command(command: Commands, manager: &FileManager, config: &Config) -> i32 {
    let result = match command {
        Commands::Read { file } => handle_read(manager, &file),
        Commands::Write { file, content } => handle_write(manager, &file, &content, false),
        Commands::Append { file, content } => handle_write(manager, &file, &content, true),
        Commands::ReadJson { file } => handle_read_json(manager, &file),
        Commands::WriteJson { file, json, indent } => {
            handle_write_json(manager, &file, &json, indent)
        }
        Commands::ReadCsv { file, json } => handle_read_csv(manager, &file, json),
        Commands::WriteCsv { file, rows, fields } => {
            handle_write_csv(manager, &file, &rows, fields.as_deref())
        }
        Commands::List { ext, long, json } => handle_list(manager, ext.as_deref(), long, json),
        Commands::Exists { file } => handle_exists(manager, &file),
        Commands::Delete { file } => handle_delete(manager, &file),
        Commands::Demo => handle_demo(manager),
        Commands::Config { action } => handle_config(action, config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            error::ERROR
        }
    }
}

/// Resolve a content argument, reading standard input for `-`
fn read_input(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read standard input")?;
    Ok(buffer)
}

/// Print a text file
fn handle_read(manager: &FileManager, file: &str) -> Result<i32> {
    match manager.read_text(file) {
        Ok(text) => {
            print!("{}", text);
            Ok(error::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.text_sentinel());
            Ok(error::exit_code(&e))
        }
    }
}

/// Write or append text
fn handle_write(manager: &FileManager, file: &str, content: &str, append: bool) -> Result<i32> {
    let content = read_input(content)?;

    let (ok, verb) = if append {
        (manager.append_text(file, &content), "Appended to")
    } else {
        (manager.write_text(file, &content), "Wrote")
    };

    if ok {
        println!("{} {} ({} bytes)", verb, file, content.len());
        Ok(error::SUCCESS)
    } else {
        eprintln!("Failed to write {}", file);
        Ok(error::ERROR)
    }
}

/// Print a JSON file
fn handle_read_json(manager: &FileManager, file: &str) -> Result<i32> {
    match manager.read_json(file) {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(error::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.json_sentinel());
            Ok(error::exit_code(&e))
        }
    }
}

/// Write a JSON document
fn handle_write_json(
    manager: &FileManager,
    file: &str,
    json: &str,
    indent: Option<usize>,
) -> Result<i32> {
    let input = read_input(json)?;
    let value: Value = match serde_json::from_str(&input) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Invalid JSON input: {}", e);
            return Ok(error::INVALID_INPUT);
        }
    };

    if manager.write_json(file, &value, indent) {
        println!("Wrote {}", file);
        Ok(error::SUCCESS)
    } else {
        eprintln!("Failed to write {}", file);
        Ok(error::ERROR)
    }
}

/// Print a CSV file
fn handle_read_csv(manager: &FileManager, file: &str, json: bool) -> Result<i32> {
    match manager.read_csv(file) {
        Ok(rows) => {
            println!("{}", output::format_rows(&rows, json));
            Ok(error::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.csv_sentinel());
            Ok(error::exit_code(&e))
        }
    }
}

/// Write a JSON array of objects as CSV
fn handle_write_csv(
    manager: &FileManager,
    file: &str,
    rows: &str,
    fields: Option<&str>,
) -> Result<i32> {
    let input = read_input(rows)?;
    let records: Vec<Record> = match serde_json::from_str(&input) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Rows must be a JSON array of objects: {}", e);
            return Ok(error::INVALID_INPUT);
        }
    };

    if records.is_empty() {
        eprintln!("No rows to write");
        return Ok(error::INVALID_INPUT);
    }

    let fieldnames: Option<Vec<String>> = fields.map(|f| {
        f.split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    });

    if manager.write_csv(file, &records, fieldnames.as_deref()) {
        println!("Wrote {} row(s) to {}", records.len(), file);
        Ok(error::SUCCESS)
    } else {
        eprintln!("Failed to write {}", file);
        Ok(error::ERROR)
    }
}

/// List the base directory
fn handle_list(manager: &FileManager, ext: Option<&str>, long: bool, json: bool) -> Result<i32> {
    let entries = manager
        .try_list_entries(ext)
        .with_context(|| format!("Failed to list {}", manager.base_path().display()))?;

    println!("{}", output::format_entries(&entries, long, json));
    Ok(error::SUCCESS)
}

/// Report whether a regular file exists
fn handle_exists(manager: &FileManager, file: &str) -> Result<i32> {
    let exists = manager.file_exists(file);
    println!("{}", exists);

    Ok(if exists {
        error::SUCCESS
    } else {
        error::NOT_FOUND
    })
}

/// Delete a regular file
fn handle_delete(manager: &FileManager, file: &str) -> Result<i32> {
    match manager.try_delete_file(file) {
        Ok(true) => {
            println!("Deleted {}", file);
            Ok(error::SUCCESS)
        }
        Ok(false) => {
            eprintln!("No such file: {}", file);
            Ok(error::NOT_FOUND)
        }
        Err(e) => {
            tracing::error!("Error deleting file {}: {}", file, e);
            eprintln!("Failed to delete {}: {}", file, e);
            Ok(error::exit_code(&e))
        }
    }
}

/// Walk through every operation in a scratch directory
fn handle_demo(manager: &FileManager) -> Result<i32> {
    println!("=== File Keeper Example ===\n");

    let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
    let fm = FileManager::with_options(temp_dir.path(), manager.options().clone());
    tracing::info!("Running demo in {:?}", temp_dir.path());

    println!("1. Writing text file...");
    fm.write_text("example.txt", "Hello, File Keeper!");
    match fm.read_text("example.txt") {
        Ok(text) => println!("   Content: {}", text),
        Err(e) => println!("   Content: {}", e.text_sentinel()),
    }

    println!("\n2. Writing JSON file...");
    let data = json!({
        "name": "Sample Project",
        "version": "1.0.0",
        "created": chrono::Local::now().to_rfc3339(),
    });
    fm.write_json("data.json", &data, None);
    match fm.read_json("data.json") {
        Ok(value) => println!("   Content: {}", value),
        Err(e) => println!("   Content: {}", e.json_sentinel()),
    }

    println!("\n3. Writing CSV file...");
    let users: Vec<Record> = serde_json::from_value(json!([
        {"id": 1, "name": "Alice", "age": 30},
        {"id": 2, "name": "Bob", "age": 25},
        {"id": 3, "name": "Charlie", "age": 35}
    ]))?;
    fm.write_csv("users.csv", &users, None);
    match fm.read_csv("users.csv") {
        Ok(rows) => println!("   Content: {}", serde_json::to_string(&rows)?),
        Err(e) => println!("   Content: {}", e.csv_sentinel()),
    }

    println!("\n4. Files in directory: {:?}", fm.list_files(None));

    println!("\n5. Cleaning up temporary files...");
    for filename in fm.list_files(None) {
        fm.delete_file(&filename);
    }
    temp_dir.close().context("Failed to remove temporary directory")?;
    println!("   Done!");

    Ok(error::SUCCESS)
}

/// Handle config commands
fn handle_config(action: ConfigAction, config: &Config) -> Result<i32> {
    match action {
        ConfigAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                print!("{}", toml::to_string_pretty(config)?);
            }
            Ok(error::SUCCESS)
        }
        ConfigAction::Path => {
            let path = crate::util::paths::get_app_config_path()?;
            println!("{}", path.display());
            Ok(error::SUCCESS)
        }
        ConfigAction::Init { force } => {
            let path = crate::util::paths::get_app_config_path()?;
            if path.exists() && !force {
                eprintln!("{} already exists (use --force to overwrite)", path.display());
                return Ok(error::INVALID_INPUT);
            }
            config.save()?;
            println!("Wrote {}", path.display());
            Ok(error::SUCCESS)
        }
    }
}
