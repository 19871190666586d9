//! Output tree on the file system

use crate::error::{Result, VaultError};
use std::fs;
use std::path::{Path, PathBuf};

/// The folder documents and attachments are written into
#[derive(Debug, Clone)]
pub struct OutputRepository {
    pub root: PathBuf,
}

impl OutputRepository {
    pub fn new(root: PathBuf) -> Self {
        OutputRepository { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove a generated folder (relative to the root) so it can be rebuilt.
    ///
    /// Returns whether anything was removed.
    pub fn reset_dir(&self, relative: &Path) -> Result<bool> {
        let path = self.root.join(relative);
        if !path.exists() {
            return Ok(false);
        }
        if !path.is_dir() {
            return Err(VaultError::Config(format!(
                "Output path is not a directory: {}",
                path.display()
            )));
        }

        fs::remove_dir_all(&path)?;
        Ok(true)
    }

    /// Write a document (creates parents, overwrites if present)
    pub fn write_document(&self, relative: &Path, content: &str) -> Result<()> {
        let path = self.root.join(relative);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, content).map_err(VaultError::Io)
    }

    /// Copy a media file from the export to `relative` under the root
    pub fn copy_media(&self, source: &Path, relative: &Path) -> Result<()> {
        let to_path = self.root.join(relative);

        if !source.exists() {
            return Err(VaultError::Config(format!(
                "Cannot copy missing file: {}",
                source.display()
            )));
        }

        if let Some(parent) = to_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::copy(source, to_path)?;
        Ok(())
    }
}
