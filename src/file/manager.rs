use super::error::{FileError, FileResult};
use super::metadata::FileEntry;
use super::naming;
use super::table::{self, Record, Row};
use crate::app::config::Config;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_JSON_INDENT: usize = 2;

/// Behaviour switches for a [`FileManager`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Indentation used by `write_json` when no explicit indent is given
    pub json_indent: usize,
    /// Reject filenames that resolve outside the base directory
    pub confine_to_base: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            json_indent: DEFAULT_JSON_INDENT,
            confine_to_base: false,
        }
    }
}

/// Text, JSON and CSV file operations rooted at a base directory.
///
/// Reads return a [`FileResult`]; writes return `true` on success and log the
/// failure otherwise. Every call opens the target for the duration of the call
/// only, so nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct FileManager {
    base_path: PathBuf,
    options: ManagerOptions,
}

impl FileManager {
    /// Create a manager for `base_path`. The directory is not checked.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_options(base_path, ManagerOptions::default())
    }

    pub fn with_options(base_path: impl Into<PathBuf>, options: ManagerOptions) -> Self {
        Self {
            base_path: base_path.into(),
            options,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_options(
            config.files.base_path.clone(),
            ManagerOptions {
                json_indent: config.files.json_indent,
                confine_to_base: config.files.confine_to_base,
            },
        )
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Resolve `filename` against the base directory
    pub fn resolve(&self, filename: &str) -> FileResult<PathBuf> {
        if self.options.confine_to_base {
            naming::join_contained(&self.base_path, filename)
        } else {
            Ok(naming::join(&self.base_path, filename))
        }
    }

    fn open_for_read(&self, filename: &str) -> FileResult<File> {
        let path = self.resolve(filename)?;
        File::open(&path).map_err(|e| FileError::from_read(filename, path, e))
    }

    fn open_for_write(&self, filename: &str, append: bool) -> FileResult<File> {
        let path = self.resolve(filename)?;
        OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .map_err(|e| FileError::io(path, e))
    }

    // --- Text ---

    /// Read the full contents of a text file
    pub fn read_text(&self, filename: &str) -> FileResult<String> {
        let path = self.resolve(filename)?;
        let content = std::fs::read_to_string(&path)
            .map_err(|e| FileError::from_read(filename, path, e))?;
        tracing::debug!("Read {} bytes from {}", content.len(), filename);
        Ok(content)
    }

    pub fn try_write_text(&self, filename: &str, content: &str) -> FileResult<()> {
        self.write_with(filename, false, |mut file| {
            file.write_all(content.as_bytes())
                .map_err(|e| FileError::io(filename, e))
        })
    }

    /// Replace a text file's contents, creating it if needed
    pub fn write_text(&self, filename: &str, content: &str) -> bool {
        report("writing file", filename, self.try_write_text(filename, content))
    }

    pub fn try_append_text(&self, filename: &str, content: &str) -> FileResult<()> {
        self.write_with(filename, true, |mut file| {
            file.write_all(content.as_bytes())
                .map_err(|e| FileError::io(filename, e))
        })
    }

    /// Append to a text file, creating it if needed
    pub fn append_text(&self, filename: &str, content: &str) -> bool {
        report("appending to file", filename, self.try_append_text(filename, content))
    }

    // --- JSON ---

    /// Read and parse a JSON file
    pub fn read_json(&self, filename: &str) -> FileResult<Value> {
        let file = self.open_for_read(filename)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            if e.is_io() {
                FileError::io(filename, e.into())
            } else {
                FileError::InvalidJson(e)
            }
        })
    }

    /// Write `data` as JSON indented by `indent` spaces (the configured
    /// default when `None`). With 0 every element still gets its own line.
    pub fn try_write_json<T: Serialize + ?Sized>(
        &self,
        filename: &str,
        data: &T,
        indent: Option<usize>,
    ) -> FileResult<()> {
        let indent = indent.unwrap_or(self.options.json_indent);
        self.write_with(filename, false, |file| {
            let mut writer = BufWriter::new(file);
            let spaces = vec![b' '; indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&spaces);
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            data.serialize(&mut serializer).map_err(FileError::Serialize)?;
            writer.flush().map_err(|e| FileError::io(filename, e))
        })
    }

    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        filename: &str,
        data: &T,
        indent: Option<usize>,
    ) -> bool {
        report(
            "writing JSON file",
            filename,
            self.try_write_json(filename, data, indent),
        )
    }

    // --- CSV ---

    /// Read a CSV file as header-keyed rows
    pub fn read_csv(&self, filename: &str) -> FileResult<Vec<Row>> {
        let file = self.open_for_read(filename)?;
        let rows = table::decode_rows(BufReader::new(file))?;
        tracing::debug!("Read {} CSV rows from {}", rows.len(), filename);
        Ok(rows)
    }

    /// Write `records` as CSV. Without `fieldnames` the key order of the first
    /// record is used. Fails before touching the filesystem when `records` is
    /// empty ([`FileError::EmptyDataset`]) or carries a key outside the
    /// fieldnames ([`FileError::UnknownField`]).
    pub fn try_write_csv(
        &self,
        filename: &str,
        records: &[Record],
        fieldnames: Option<&[String]>,
    ) -> FileResult<()> {
        if records.is_empty() {
            return Err(FileError::EmptyDataset);
        }

        let fieldnames = match fieldnames {
            Some(names) => names.to_vec(),
            None => table::default_fieldnames(records),
        };
        table::check_fields(records, &fieldnames)?;

        self.write_with(filename, false, |file| {
            table::encode_rows(BufWriter::new(file), records, &fieldnames)
        })
    }

    pub fn write_csv(
        &self,
        filename: &str,
        records: &[Record],
        fieldnames: Option<&[String]>,
    ) -> bool {
        match self.try_write_csv(filename, records, fieldnames) {
            Err(FileError::EmptyDataset) => {
                tracing::debug!("Skipped writing {}: no rows", filename);
                false
            }
            result => report("writing CSV file", filename, result),
        }
    }

    // --- Directory ---

    /// Names of the entries directly inside the base directory, in
    /// enumeration order, optionally filtered by suffix. Only names are read.
    pub fn try_list_files(&self, extension: Option<&str>) -> FileResult<Vec<String>> {
        let names = self
            .matching_entries(extension)?
            .into_iter()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        tracing::trace!("Listed {} names in {:?}", names.len(), self.base_path);
        Ok(names)
    }

    pub fn list_files(&self, extension: Option<&str>) -> Vec<String> {
        self.try_list_files(extension).unwrap_or_else(|e| {
            tracing::error!("Error listing files: {}", e);
            Vec::new()
        })
    }

    /// Like [`try_list_files`](Self::try_list_files) but stats every entry;
    /// one failed stat fails the listing.
    pub fn try_list_entries(&self, extension: Option<&str>) -> FileResult<Vec<FileEntry>> {
        let entries = self
            .matching_entries(extension)?
            .iter()
            .map(|entry| FileEntry::from_dir_entry(entry).map_err(|e| FileError::io(entry.path(), e)))
            .collect::<FileResult<Vec<_>>>()?;
        tracing::trace!("Listed {} entries in {:?}", entries.len(), self.base_path);
        Ok(entries)
    }

    /// Detailed listing (size, modification time)
    pub fn list_entries(&self, extension: Option<&str>) -> Vec<FileEntry> {
        self.try_list_entries(extension).unwrap_or_else(|e| {
            tracing::error!("Error listing files: {}", e);
            Vec::new()
        })
    }

    /// True iff `filename` names an existing regular file
    pub fn file_exists(&self, filename: &str) -> bool {
        self.resolve(filename)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Returns `Ok(false)` when there is no regular file to delete
    pub fn try_delete_file(&self, filename: &str) -> FileResult<bool> {
        let path = self.resolve(filename)?;
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(&path).map_err(|e| FileError::io(path, e))?;
        tracing::debug!("Deleted {}", filename);
        Ok(true)
    }

    pub fn delete_file(&self, filename: &str) -> bool {
        self.try_delete_file(filename).unwrap_or_else(|e| {
            tracing::error!("Error deleting file {}: {}", filename, e);
            false
        })
    }

    fn matching_entries(&self, extension: Option<&str>) -> FileResult<Vec<std::fs::DirEntry>> {
        let read_dir = std::fs::read_dir(&self.base_path)
            .map_err(|e| FileError::io(&self.base_path, e))?;
        let extension = extension.unwrap_or_default();

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| FileError::io(&self.base_path, e))?;
            if naming::matches_extension(&entry.file_name().to_string_lossy(), extension) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn write_with<F>(&self, filename: &str, append: bool, write: F) -> FileResult<()>
    where
        F: FnOnce(File) -> FileResult<()>,
    {
        let file = self.open_for_write(filename, append)?;
        write(file)?;
        tracing::debug!("Wrote {}", filename);
        Ok(())
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Log a failed write and collapse the result to a success flag
fn report(action: &str, filename: &str, result: FileResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Error {} {}: {}", action, filename, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileManager) {
        let temp_dir = TempDir::new().unwrap();
        let manager = FileManager::new(temp_dir.path());
        (temp_dir, manager)
    }

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_base_path() {
        let manager = FileManager::default();
        assert_eq!(manager.base_path(), Path::new("."));
        assert_eq!(manager.options(), &ManagerOptions::default());
    }

    #[test]
    fn test_new_does_not_validate_base() {
        let manager = FileManager::new("/definitely/not/here");
        assert!(!manager.file_exists("a.txt"));
        assert!(manager.list_files(None).is_empty());
    }

    #[test]
    fn test_text_roundtrip() {
        let (_dir, manager) = setup();
        assert!(manager.write_text("example.txt", "Hello, world!\nsecond line"));
        assert_eq!(
            manager.read_text("example.txt").unwrap(),
            "Hello, world!\nsecond line"
        );
    }

    #[test]
    fn test_write_text_truncates() {
        let (_dir, manager) = setup();
        assert!(manager.write_text("a.txt", "a much longer first version"));
        assert!(manager.write_text("a.txt", "short"));
        assert_eq!(manager.read_text("a.txt").unwrap(), "short");
    }

    #[test]
    fn test_append_text() {
        let (_dir, manager) = setup();
        assert!(manager.append_text("log.txt", "one\n"));
        assert!(manager.append_text("log.txt", "two\n"));
        assert_eq!(manager.read_text("log.txt").unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_read_text_missing() {
        let (_dir, manager) = setup();
        let err = manager.read_text("missing.txt").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.text_sentinel(), "Error: File 'missing.txt' not found");
    }

    #[test]
    fn test_read_text_on_directory_is_io_error() {
        let (dir, manager) = setup();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let err = manager.read_text("sub").unwrap_err();
        assert!(!err.is_not_found());
        assert!(err.text_sentinel().starts_with("Error reading file: "));
    }

    #[test]
    fn test_write_text_into_missing_directory_fails() {
        let (_dir, manager) = setup();
        assert!(!manager.write_text("no/such/dir/a.txt", "x"));
    }

    #[test]
    fn test_json_roundtrip() {
        let (_dir, manager) = setup();
        let data = json!({
            "name": "Sample Project",
            "version": "1.0.0",
            "tags": ["a", "b"],
            "nested": {"count": 3, "ratio": 0.5, "ok": true, "none": null}
        });

        assert!(manager.write_json("data.json", &data, None));
        assert_eq!(manager.read_json("data.json").unwrap(), data);
    }

    #[test]
    fn test_json_indent() {
        let (_dir, manager) = setup();
        let data = json!({"a": 1});

        assert!(manager.write_json("two.json", &data, None));
        assert_eq!(manager.read_text("two.json").unwrap(), "{\n  \"a\": 1\n}");

        assert!(manager.write_json("four.json", &data, Some(4)));
        assert_eq!(manager.read_text("four.json").unwrap(), "{\n    \"a\": 1\n}");

        assert!(manager.write_json("flat.json", &json!({"a": [1, 2]}), Some(0)));
        assert_eq!(
            manager.read_text("flat.json").unwrap(),
            "{\n\"a\": [\n1,\n2\n]\n}"
        );

        assert!(manager.write_json("empty.json", &json!({"a": [], "b": {}}), Some(0)));
        assert_eq!(
            manager.read_text("empty.json").unwrap(),
            "{\n\"a\": [],\n\"b\": {}\n}"
        );
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let (_dir, manager) = setup();
        assert!(manager.write_json("jp.json", &json!({"name": "ファイル"}), Some(0)));
        assert_eq!(manager.read_text("jp.json").unwrap(), "{\n\"name\": \"ファイル\"\n}");
    }

    #[test]
    fn test_read_json_missing() {
        let (_dir, manager) = setup();
        let err = manager.read_json("missing.json").unwrap_err();
        assert_eq!(
            err.json_sentinel(),
            json!({"error": "File 'missing.json' not found"})
        );
    }

    #[test]
    fn test_read_json_invalid() {
        let (_dir, manager) = setup();
        assert!(manager.write_text("bad.json", "{ not json"));
        let err = manager.read_json("bad.json").unwrap_err();
        assert!(matches!(err, FileError::InvalidJson(_)));
        assert_eq!(err.json_sentinel(), json!({"error": "Invalid JSON format"}));
    }

    #[test]
    fn test_json_with_error_key_is_data() {
        let (_dir, manager) = setup();
        let data = json!({"error": "this is just data"});
        assert!(manager.write_json("e.json", &data, None));
        assert_eq!(manager.read_json("e.json").unwrap(), data);
    }

    #[test]
    fn test_csv_roundtrip() {
        let (_dir, manager) = setup();
        let rows = records(json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"}
        ]));

        assert!(manager.write_csv("users.csv", &rows, None));
        let read = manager.read_csv("users.csv").unwrap();

        assert_eq!(read.len(), 2);
        assert_eq!(read[0]["id"], "1");
        assert_eq!(read[0]["name"], "Alice");
        assert_eq!(read[1]["id"], "2");
        assert_eq!(read[1]["name"], "Bob");
    }

    #[test]
    fn test_write_csv_empty_creates_nothing() {
        let (dir, manager) = setup();
        assert!(!manager.write_csv("empty.csv", &[], None));
        assert!(!dir.path().join("empty.csv").exists());
        assert!(matches!(
            manager.try_write_csv("empty.csv", &[], None),
            Err(FileError::EmptyDataset)
        ));
    }

    #[test]
    fn test_write_csv_explicit_fieldnames() {
        let (_dir, manager) = setup();
        let rows = records(json!([{"id": 1, "name": "Alice", "age": 30}]));
        let fields = vec!["name".to_string(), "id".to_string(), "age".to_string()];

        assert!(manager.write_csv("users.csv", &rows, Some(&fields)));
        assert_eq!(
            manager.read_text("users.csv").unwrap(),
            "name,id,age\nAlice,1,30\n"
        );
    }

    #[test]
    fn test_write_csv_unknown_field_fails() {
        let (_dir, manager) = setup();
        let rows = records(json!([{"id": 1, "name": "Alice"}]));
        let fields = vec!["id".to_string()];
        assert!(!manager.write_csv("users.csv", &rows, Some(&fields)));
    }

    #[test]
    fn test_rejected_csv_leaves_existing_file_intact() {
        let (_dir, manager) = setup();
        assert!(manager.write_text("users.csv", "id,name\n1,Alice\n"));

        let rows = records(json!([{"id": 2}, {"id": 3, "extra": "x"}]));
        let fields = vec!["id".to_string()];
        assert!(matches!(
            manager.try_write_csv("users.csv", &rows, Some(&fields)),
            Err(FileError::UnknownField { .. })
        ));
        assert_eq!(manager.read_text("users.csv").unwrap(), "id,name\n1,Alice\n");
    }

    #[test]
    fn test_read_csv_missing() {
        let (_dir, manager) = setup();
        let err = manager.read_csv("missing.csv").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.csv_sentinel(),
            json!([{"error": "File 'missing.csv' not found"}])
        );
    }

    #[test]
    fn test_list_files_with_extension() {
        let (_dir, manager) = setup();
        manager.write_text("a.txt", "a");
        manager.write_text("b.json", "{}");
        manager.write_text("c.txt", "c");

        let mut all = manager.list_files(None);
        all.sort();
        assert_eq!(all, vec!["a.txt", "b.json", "c.txt"]);

        let mut txt = manager.list_files(Some(".txt"));
        txt.sort();
        assert_eq!(txt, vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_list_files_order_matches_enumeration() {
        let (dir, manager) = setup();
        for name in ["x.txt", "y.log", "z.txt"] {
            manager.write_text(name, name);
        }

        let expected: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".txt"))
            .collect();
        assert_eq!(manager.list_files(Some(".txt")), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_reads_names_only() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, manager) = setup();
        manager.write_text("a.txt", "a");
        manager.write_text("b.txt", "b");

        // Readable but not searchable: names enumerate, stat is refused
        // (unless running as root).
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o600)).unwrap();
        let mut names = manager.list_files(Some(".txt"));
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o700)).unwrap();

        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_list_entries() {
        let (_dir, manager) = setup();
        manager.write_text("a.txt", "12345");

        let entries = manager.list_entries(None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].size, 5);
    }

    #[test]
    fn test_file_exists() {
        let (dir, manager) = setup();
        assert!(!manager.file_exists("a.txt"));
        manager.write_text("a.txt", "a");
        assert!(manager.file_exists("a.txt"));

        std::fs::create_dir(dir.path().join("sub")).unwrap();
        assert!(!manager.file_exists("sub"));
    }

    #[test]
    fn test_delete_file() {
        let (_dir, manager) = setup();
        assert!(!manager.delete_file("a.txt"));

        manager.write_text("a.txt", "a");
        assert!(manager.delete_file("a.txt"));
        assert!(!manager.file_exists("a.txt"));
    }

    #[test]
    fn test_delete_file_skips_directories() {
        let (dir, manager) = setup();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        assert!(!manager.delete_file("sub"));
        assert!(dir.path().join("sub").is_dir());
    }

    #[test]
    fn test_confined_manager_rejects_escape() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base");
        std::fs::create_dir(&base).unwrap();
        let options = ManagerOptions {
            confine_to_base: true,
            ..ManagerOptions::default()
        };
        let manager = FileManager::with_options(&base, options);

        assert!(!manager.write_text("../outside.txt", "x"));
        assert!(!dir.path().join("outside.txt").exists());
        assert!(matches!(
            manager.read_text("../outside.txt"),
            Err(FileError::OutsideBase { .. })
        ));
        assert!(manager.write_text("inside.txt", "x"));
    }

    #[test]
    fn test_unconfined_manager_allows_parent() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base");
        std::fs::create_dir(&base).unwrap();
        let manager = FileManager::new(&base);

        assert!(manager.write_text("../outside.txt", "x"));
        assert!(dir.path().join("outside.txt").exists());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.files.base_path = PathBuf::from("/srv/files");
        config.files.json_indent = 4;
        config.files.confine_to_base = true;

        let manager = FileManager::from_config(&config);
        assert_eq!(manager.base_path(), Path::new("/srv/files"));
        assert_eq!(manager.options().json_indent, 4);
        assert!(manager.options().confine_to_base);
    }
}
