//! Directory-backed implementation of [`DocumentStore`].
//!
//! Each document is one file, `<root>/<name>.json`. Writes go to a sibling
//! temporary file first and are renamed into place, so a crash mid-write
//! never leaves a truncated document behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::traits::DocumentStore;

const EXTENSION: &str = "json";

/// Stores documents as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(DirectoryStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `name`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.{EXTENSION}")))
    }
}

/// Names become file stems: ASCII letters, digits, `-`, `_` and `.`, not
/// starting with a dot.
fn validate_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty() && !name.starts_with('.') && name.chars().all(is_name_char);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn not_found(name: &str, err: io::Error) -> StorageError {
    if err.kind() == io::ErrorKind::NotFound {
        StorageError::DocumentNotFound(name.to_string())
    } else {
        StorageError::Io(err)
    }
}

impl DocumentStore for DirectoryStore {
    fn save(&mut self, name: &str, json: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&tmp, json)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        tracing::debug!(path = %path.display(), bytes = json.len(), "wrote document");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<String, StorageError> {
        let path = self.path_for(name)?;
        fs::read_to_string(&path).map_err(|e| not_found(name, e))
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).map_err(|e| not_found(name, e))
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
