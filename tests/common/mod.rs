use filekeeper::file::{FileManager, ManagerOptions, Record};
use serde_json::Value;
use tempfile::TempDir;

/// Initialize logging once for all tests
#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Create a manager over a fresh temporary directory
/// Returns (TempDir, FileManager); keep the TempDir alive for the test
pub fn create_test_manager() -> (TempDir, FileManager) {
    let temp_dir = TempDir::new().unwrap();
    let manager = FileManager::new(temp_dir.path());
    (temp_dir, manager)
}

/// Create a manager that rejects filenames escaping its base directory.
/// The base is a subdirectory `base/` so escapes land inside the TempDir.
#[allow(dead_code)]
pub fn create_confined_manager() -> (TempDir, FileManager) {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("base");
    std::fs::create_dir_all(&base).unwrap();
    let options = ManagerOptions {
        confine_to_base: true,
        ..ManagerOptions::default()
    };
    (temp_dir, FileManager::with_options(base, options))
}

/// Build CSV records from a JSON array literal
#[allow(dead_code)]
pub fn records(value: Value) -> Vec<Record> {
    serde_json::from_value(value).expect("records must be a JSON array of objects")
}

/// Sorted listing, for assertions that do not depend on enumeration order
#[allow(dead_code)]
pub fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}
