//! Output paths and write decisions

use super::entry::{Attachment, Entry};
use super::merge::DayGroup;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A group of entries with its place in the output tree
#[derive(Debug, Clone, PartialEq)]
pub struct DayDocument {
    /// Path relative to the output root, e.g. `travel/2022/09/21a.md`
    pub path: PathBuf,
    /// Date label including the disambiguation suffix, e.g. `2022-09-21a`
    pub title: String,
    pub day: NaiveDate,
    pub entries: Vec<Entry>,
}

impl DayDocument {
    /// First chronological entry; singular metadata comes from it
    pub fn first(&self) -> &Entry {
        &self.entries[0]
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.identifier.as_str()).collect()
    }

    pub fn starred(&self) -> bool {
        self.entries.iter().any(|e| e.starred)
    }

    /// Attachments of every member, first occurrence kept
    pub fn attachments(&self) -> Vec<&Attachment> {
        let mut attachments: Vec<&Attachment> = Vec::new();
        for attachment in self.entries.iter().flat_map(|e| &e.attachments) {
            if !attachments
                .iter()
                .any(|a| a.identifier == attachment.identifier)
            {
                attachments.push(attachment);
            }
        }
        attachments
    }
}

/// Suffix telling apart documents of the same day: "", "a", "b", ... "z", "-27", ...
fn day_suffix(ordinal: usize) -> String {
    match ordinal {
        0 => String::new(),
        1..=26 => char::from(b'a' + (ordinal - 1) as u8).to_string(),
        _ => format!("-{}", ordinal),
    }
}

/// Assign paths to the groups of one journal.
///
/// Groups must come from `group_by_day`: same-day groups adjacent and in
/// chronological order. The first document of a day is `DD.md`, the next
/// ones `DDa.md`, `DDb.md` and so on.
pub fn place(groups: Vec<DayGroup>) -> Vec<DayDocument> {
    let mut documents: Vec<DayDocument> = Vec::with_capacity(groups.len());
    let mut ordinal = 0usize;

    for group in groups {
        let Some(journal) = group.entries.first().map(|e| e.journal.clone()) else {
            continue;
        };

        match documents.last() {
            Some(previous) if previous.day == group.day => ordinal += 1,
            _ => ordinal = 0,
        }

        let suffix = day_suffix(ordinal);
        let path = Path::new(&journal)
            .join(group.day.format("%Y").to_string())
            .join(group.day.format("%m").to_string())
            .join(format!("{}{}.md", group.day.format("%d"), suffix));

        documents.push(DayDocument {
            path,
            title: format!("{}{}", group.day.format("%Y-%m-%d"), suffix),
            day: group.day,
            entries: group.entries,
        });
    }

    documents
}

/// What to do with one output document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Create,
    Overwrite,
    Skip,
}

/// Rerun policy against an existing vault
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementPolicy {
    /// Vault the output will be copied into; documents already there are skipped
    pub vault: Option<PathBuf>,
    /// Write documents even when they already exist in the vault
    pub force: bool,
}

impl PlacementPolicy {
    pub fn decide(&self, relative: &Path) -> Disposition {
        self.decide_with(relative, |path| path.exists())
    }

    pub fn decide_with(&self, relative: &Path, exists: impl Fn(&Path) -> bool) -> Disposition {
        match &self.vault {
            Some(vault) if exists(&vault.join(relative)) => {
                if self.force {
                    Disposition::Overwrite
                } else {
                    Disposition::Skip
                }
            }
            _ => Disposition::Create,
        }
    }
}
