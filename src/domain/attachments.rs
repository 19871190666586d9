//! Attachment renaming and lookup

use super::entry::{AttachmentKind, Entry};
use super::references::relative_href;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Output folder holding one sub-folder per attachment kind
pub const ATTACHMENTS_DIR: &str = "attachments";

/// File names present in the export's media folders
#[derive(Debug, Clone, Default)]
pub struct MediaInventory {
    files: BTreeMap<AttachmentKind, BTreeSet<String>>,
}

impl MediaInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: AttachmentKind, filename: impl Into<String>) {
        self.files.entry(kind).or_default().insert(filename.into());
    }

    pub fn contains(&self, kind: AttachmentKind, filename: &str) -> bool {
        self.files
            .get(&kind)
            .is_some_and(|names| names.contains(filename))
    }
}

/// Where one attachment comes from and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTarget {
    pub kind: AttachmentKind,
    /// File name inside the export's kind folder
    pub source: String,
    /// `<identifier>.<ext>`
    pub renamed: String,
    /// Destination relative to the output root
    pub path: PathBuf,
}

impl MediaTarget {
    /// Link to this file from the document at `document`
    pub fn relative_from(&self, document: &Path) -> String {
        relative_href(&self.path, document)
    }

    /// Path relative to the output root, with `/` separators
    pub fn vault_path(&self) -> String {
        format!("{}/{}/{}", ATTACHMENTS_DIR, self.kind.folder(), self.renamed)
    }
}

/// Lookup from attachment identifier to its renamed output file
#[derive(Debug, Clone, Default)]
pub struct AttachmentMapper {
    targets: HashMap<String, MediaTarget>,
}

impl AttachmentMapper {
    /// Map every attachment of `entries` whose file is present in `inventory`.
    ///
    /// A file is found either under its export name `<md5>.<ext>` or under
    /// the renamed `<identifier>.<ext>` left by an earlier run.
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a Entry>, inventory: &MediaInventory) -> Self {
        let mut targets = HashMap::new();

        for entry in entries {
            for attachment in &entry.attachments {
                let Some(extension) = attachment.extension.as_deref() else {
                    continue;
                };

                let exported = format!("{}.{}", attachment.md5, extension);
                let renamed = format!("{}.{}", attachment.identifier, extension);

                let source = if inventory.contains(attachment.kind, &exported) {
                    exported
                } else if inventory.contains(attachment.kind, &renamed) {
                    renamed.clone()
                } else {
                    continue;
                };

                let path = Path::new(ATTACHMENTS_DIR)
                    .join(attachment.kind.folder())
                    .join(&renamed);

                targets.insert(
                    attachment.identifier.clone(),
                    MediaTarget {
                        kind: attachment.kind,
                        source,
                        renamed,
                        path,
                    },
                );
            }
        }

        AttachmentMapper { targets }
    }

    pub fn resolve(&self, identifier: &str) -> Option<&MediaTarget> {
        self.targets.get(identifier)
    }

    /// All mapped files, ordered by destination
    pub fn targets(&self) -> Vec<&MediaTarget> {
        let mut targets: Vec<&MediaTarget> = self.targets.values().collect();
        targets.sort_by(|a, b| a.path.cmp(&b.path));
        targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
