use super::error::{FileError, FileResult};
use std::path::{Component, Path, PathBuf};

/// Joins `filename` onto `base` without any validation.
///
/// Absolute filenames replace the base, and `..` components are kept as-is.
pub fn join(base: &Path, filename: &str) -> PathBuf {
    base.join(filename)
}

/// Joins `filename` onto `base`, rejecting names that would resolve outside it.
///
/// The check is lexical: the filesystem is not consulted, so symlinks inside
/// `base` are not followed.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use filekeeper::file::naming::join_contained;
///
/// assert!(join_contained(Path::new("/data"), "reports/q1.csv").is_ok());
/// assert!(join_contained(Path::new("/data"), "../etc/passwd").is_err());
/// ```
pub fn join_contained(base: &Path, filename: &str) -> FileResult<PathBuf> {
    let mut depth: usize = 0;

    for component in Path::new(filename).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FileError::outside_base(filename))?;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(FileError::outside_base(filename));
            }
        }
    }

    if depth == 0 {
        // Resolves to the base directory itself, which is not a file
        return Err(FileError::outside_base(filename));
    }

    Ok(base.join(filename))
}

/// Suffix filter used by directory listings.
///
/// An empty filter matches everything.
pub fn matches_extension(name: &str, extension: &str) -> bool {
    extension.is_empty() || name.ends_with(extension)
}
