//! Reading drafts and policy files from disk or standard input.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::{AutowriterError, Result};

/// Path argument that means "read standard input".
pub const STDIN_MARKER: &str = "-";

/// Reads a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &Path) -> Result<String> {
    if !path.exists() {
        Err(AutowriterError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(AutowriterError::from)
    }
}

/// Reads everything on standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reads `source`, treating `-` as standard input.
pub fn fetch_source(source: &str) -> Result<String> {
    if source == STDIN_MARKER { fetch_stdin() } else { fetch_file(&PathBuf::from(source)) }
}
