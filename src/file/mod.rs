/// File operations rooted at a base directory
///
/// # Architecture
///
/// - FileManager: Public API for text, JSON and CSV files
/// - naming: Filename joining, containment and extension filters
/// - table: CSV row model and codec
/// - metadata: Directory entry details for listings
/// - error: Error types
///
/// # Usage
///
/// ```rust,no_run
/// use filekeeper::file::FileManager;
///
/// let manager = FileManager::new("./data");
/// manager.write_text("notes.txt", "hello");
/// match manager.read_text("notes.txt") {
///     Ok(text) => println!("{}", text),
///     Err(e) => eprintln!("{}", e.text_sentinel()),
/// }
/// ```

pub mod error;
pub mod manager;
pub mod metadata;
pub mod naming;
pub mod table;

pub use error::{ErrorKind, FileError, FileResult};
pub use manager::{FileManager, ManagerOptions};
pub use metadata::FileEntry;
pub use table::{Record, Row};
