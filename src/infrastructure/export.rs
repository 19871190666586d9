//! Day One export folder reader

use crate::domain::entry::{AttachmentKind, RawEntry};
use crate::domain::MediaInventory;
use crate::error::{Result, VaultError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct ExportFile {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

/// Raw records of one journal file
#[derive(Debug, Clone)]
pub struct JournalExport {
    /// Lowercased file stem, e.g. `travel` for `Travel.json`
    pub name: String,
    pub path: PathBuf,
    pub records: Vec<RawEntry>,
}

/// An unzipped Day One export: `<Journal>.json` files plus media folders
#[derive(Debug, Clone)]
pub struct ExportFolder {
    root: PathBuf,
}

impl ExportFolder {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(VaultError::ExportNotFound(root.to_path_buf()));
        }
        Ok(ExportFolder {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding the export's files of one attachment kind
    pub fn media_dir(&self, kind: AttachmentKind) -> PathBuf {
        self.root.join(kind.folder())
    }

    /// Every `*.json` directly inside the export, sorted by path
    pub fn journal_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect();

        if files.is_empty() {
            return Err(VaultError::NoJournals(self.root.clone()));
        }

        files.sort();
        Ok(files)
    }

    pub fn read_journal(path: &Path) -> Result<JournalExport> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                VaultError::Config(format!("Invalid journal file name: {}", path.display()))
            })?;

        let contents = fs::read_to_string(path)?;
        let export: ExportFile = serde_json::from_str(&contents).map_err(|source| {
            VaultError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;

        debug!(journal = %name, records = export.entries.len(), "read journal");

        Ok(JournalExport {
            name,
            path: path.to_path_buf(),
            records: export.entries,
        })
    }

    pub fn read_all(&self) -> Result<Vec<JournalExport>> {
        self.journal_files()?
            .iter()
            .map(|path| Self::read_journal(path))
            .collect()
    }

    /// File names present in the media folders
    pub fn inventory(&self) -> MediaInventory {
        let mut inventory = MediaInventory::new();

        for kind in AttachmentKind::ALL {
            let dir = self.media_dir(kind);
            if !dir.is_dir() {
                continue;
            }

            for entry in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
            {
                if let Some(name) = entry.file_name().to_str() {
                    inventory.insert(kind, name);
                }
            }
        }

        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JOURNAL: &str = r#"{
        "metadata": {"version": "1.0"},
        "entries": [
            {"uuid": "A1", "creationDate": "2022-09-21T08:30:00Z", "text": "hello"}
        ]
    }"#;

    #[test]
    fn test_missing_export_folder() {
        let temp = TempDir::new().unwrap();
        let err = ExportFolder::open(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, VaultError::ExportNotFound(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_no_journals() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();

        let export = ExportFolder::open(temp.path()).unwrap();
        assert!(matches!(
            export.journal_files().unwrap_err(),
            VaultError::NoJournals(_)
        ));
    }

    #[test]
    fn test_journals_named_by_lowercased_stem() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Travel.json"), JOURNAL).unwrap();
        fs::write(temp.path().join("Work.JSON"), r#"{"entries": []}"#).unwrap();

        let export = ExportFolder::open(temp.path()).unwrap();
        let journals = export.read_all().unwrap();

        assert_eq!(journals.len(), 2);
        assert_eq!(journals[0].name, "travel");
        assert_eq!(journals[0].records.len(), 1);
        assert_eq!(journals[0].records[0].uuid.as_deref(), Some("A1"));
        assert_eq!(journals[1].name, "work");
        assert!(journals[1].records.is_empty());
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Broken.json"), "{ not json").unwrap();

        let export = ExportFolder::open(temp.path()).unwrap();
        let err = export.read_all().unwrap_err();
        assert!(err.to_string().contains("Broken.json"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_media_inventory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("photos")).unwrap();
        fs::create_dir_all(temp.path().join("audios")).unwrap();
        fs::write(temp.path().join("photos/abc.jpeg"), "jpeg").unwrap();
        fs::write(temp.path().join("audios/def.m4a"), "m4a").unwrap();

        let inventory = ExportFolder::open(temp.path()).unwrap().inventory();
        assert!(inventory.contains(AttachmentKind::Photo, "abc.jpeg"));
        assert!(inventory.contains(AttachmentKind::Audio, "def.m4a"));
        assert!(!inventory.contains(AttachmentKind::Video, "abc.jpeg"));
    }
}
