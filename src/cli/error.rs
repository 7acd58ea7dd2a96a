use crate::file::{ErrorKind, FileError};

// Exit codes for CLI automation
pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1;
pub const NOT_FOUND: i32 = 2;
pub const INVALID_INPUT: i32 = 3;

/// Exit code for a failed file operation
pub fn exit_code(err: &FileError) -> i32 {
    match err.kind() {
        ErrorKind::NotFound => NOT_FOUND,
        ErrorKind::Rejected => INVALID_INPUT,
        ErrorKind::Decode | ErrorKind::Io => ERROR,
    }
}
