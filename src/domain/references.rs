//! Identifier to document lookup for cross-entry links

use super::placement::DayDocument;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Output document an entry ended up in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path relative to the output root
    pub path: PathBuf,
    /// Human label for bare links, e.g. `2022-09-21a`
    pub title: String,
}

/// A resolved link, relative to the referencing document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub title: String,
}

/// Lookup from entry identifier to output document, over every journal of a run
#[derive(Debug, Clone, Default)]
pub struct ResolverTable {
    targets: HashMap<String, Target>,
}

impl ResolverTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from every placed document. Each member of a merged
    /// document points at the merged file.
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a DayDocument>) -> Self {
        let mut table = ResolverTable::new();
        for document in documents {
            for entry in &document.entries {
                table.insert(
                    &entry.identifier,
                    Target {
                        path: document.path.clone(),
                        title: document.title.clone(),
                    },
                );
            }
        }
        table
    }

    pub fn insert(&mut self, identifier: &str, target: Target) {
        self.targets.insert(identifier.to_string(), target);
    }

    pub fn target(&self, identifier: &str) -> Option<&Target> {
        self.targets.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Link to `identifier` as seen from the document at `from_document`
    pub fn resolve(&self, identifier: &str, from_document: &Path) -> Option<Link> {
        self.target(identifier).map(|target| Link {
            href: relative_href(&target.path, from_document),
            title: target.title.clone(),
        })
    }
}

/// Path of `target` relative to the directory holding `from_document`,
/// both given relative to the output root. Always uses `/`.
pub fn relative_href(target: &Path, from_document: &Path) -> String {
    let base = from_document.parent().unwrap_or_else(|| Path::new(""));
    let relative = pathdiff::diff_paths(target, base).unwrap_or_else(|| target.to_path_buf());

    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Markdown link destination, wrapped in `<>` when it contains spaces
pub fn markdown_target(href: &str) -> String {
    if href.contains(char::is_whitespace) {
        format!("<{}>", href)
    } else {
        href.to_string()
    }
}
