//! Error types for dayvault

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dayvault
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Entry {record} is missing required field '{field}'")]
    MissingField { field: &'static str, record: String },

    #[error("Entry {identifier} has an invalid creation date: {value}")]
    InvalidTimestamp { identifier: String, value: String },

    #[error("Export folder not found: {0}")]
    ExportNotFound(PathBuf),

    #[error("No journal JSON files found in {0}")]
    NoJournals(PathBuf),

    #[error("Failed to parse journal {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl VaultError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            VaultError::MissingField { .. } | VaultError::InvalidTimestamp { .. } => 2,
            VaultError::Config(_) | VaultError::Yaml(_) => 3,
            VaultError::ExportNotFound(_) | VaultError::NoJournals(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            VaultError::MissingField { .. } | VaultError::InvalidTimestamp { .. } => {
                format!(
                    "{}\n\n\
                    No files were written. Other entries may link to this one, so\n\
                    the export is converted as a whole or not at all.\n\n\
                    Suggestions:\n\
                    • Re-export the journal from Day One\n\
                    • Remove the broken entry from the JSON file",
                    self
                )
            }
            VaultError::NoJournals(path) => {
                format!(
                    "No journal JSON files found in {}\n\n\
                    Suggestions:\n\
                    • Unzip the Day One export first\n\
                    • Pass the folder containing <Journal>.json, not the file itself",
                    path.display()
                )
            }
            VaultError::Yaml(_) => {
                format!(
                    "{}\n\n\
                    Valid config keys: yaml, convert_links, convert_tags_to_links,\n\
                    tag_prefix, merge_entries, entries_sep, ignore_tags, status_tags,\n\
                    vault_directory, metadata",
                    self
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using VaultError
pub type Result<T> = std::result::Result<T, VaultError>;
