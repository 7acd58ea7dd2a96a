use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::DirEntry;
use std::io;

/// A directory entry with the details shown by `list --long`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Size in bytes (0 for directories)
    pub size: u64,
    pub is_dir: bool,
    /// Last modification time, when the platform reports one
    pub modified: Option<DateTime<Utc>>,
}

impl FileEntry {
    pub fn from_dir_entry(entry: &DirEntry) -> io::Result<Self> {
        let metadata = entry.metadata()?;
        let is_dir = metadata.is_dir();
        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

        Ok(Self {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: if is_dir { 0 } else { metadata.len() },
            is_dir,
            modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let mut entries: Vec<FileEntry> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| FileEntry::from_dir_entry(&e.unwrap()).unwrap())
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].size, 5);
        assert!(!entries[0].is_dir);
        assert!(entries[0].modified.is_some());

        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].size, 0);
        assert!(entries[1].is_dir);
    }
}
