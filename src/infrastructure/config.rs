//! Configuration file and layered settings

use crate::domain::options::{ConvertOptions, DEFAULT_SEPARATOR, DEFAULT_TAGS_PREFIX};
use crate::error::{Result, VaultError};
use serde::Deserialize;
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};

/// One layer of settings: every key optional.
///
/// The config file deserializes straight into this type; the CLI builds
/// one from its flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub yaml: Option<bool>,
    pub convert_links: Option<bool>,
    pub convert_tags_to_links: Option<bool>,
    #[serde(alias = "tags_prefix")]
    pub tag_prefix: Option<String>,
    pub merge_entries: Option<bool>,
    #[serde(alias = "separator")]
    pub entries_sep: Option<String>,
    pub ignore_tags: Option<Vec<String>>,
    pub status_tags: Option<Vec<String>>,
    pub vault_directory: Option<PathBuf>,
    pub metadata: Option<Mapping>,
}

/// How a key combines when both layers set it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Upper layer wins
    Override,
    /// Both lists, lower layer first, duplicates dropped
    Union,
}

pub const MERGE_RULES: &[(&str, MergeRule)] = &[
    ("yaml", MergeRule::Override),
    ("convert_links", MergeRule::Override),
    ("convert_tags_to_links", MergeRule::Override),
    ("tag_prefix", MergeRule::Override),
    ("merge_entries", MergeRule::Override),
    ("entries_sep", MergeRule::Override),
    ("ignore_tags", MergeRule::Union),
    ("status_tags", MergeRule::Union),
    ("vault_directory", MergeRule::Override),
    ("metadata", MergeRule::Override),
];

pub fn rule_for(key: &str) -> MergeRule {
    MERGE_RULES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, rule)| *rule)
        .unwrap_or(MergeRule::Override)
}

/// Values that can be combined under `MergeRule::Union`
pub trait Layered: Sized {
    fn union(self, upper: Self) -> Self {
        upper
    }
}

impl Layered for bool {}
impl Layered for String {}
impl Layered for PathBuf {}

impl Layered for Vec<String> {
    fn union(mut self, upper: Self) -> Self {
        for value in upper {
            if !self.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
                self.push(value);
            }
        }
        self
    }
}

impl Layered for Mapping {
    fn union(mut self, upper: Self) -> Self {
        for (key, value) in upper {
            self.insert(key, value);
        }
        self
    }
}

fn layer<T: Layered>(key: &str, lower: Option<T>, upper: Option<T>) -> Option<T> {
    match (rule_for(key), lower, upper) {
        (MergeRule::Union, Some(lower), Some(upper)) => Some(lower.union(upper)),
        (_, lower, upper) => upper.or(lower),
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub options: ConvertOptions,
    pub vault_directory: Option<PathBuf>,
}

impl PartialSettings {
    /// Load a YAML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VaultError::Config(format!("Config file not found: {}", path.display()))
            } else {
                VaultError::Io(e)
            }
        })?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(PartialSettings::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Put `upper` on top of `self`, key by key, following `MERGE_RULES`
    pub fn layered(self, upper: PartialSettings) -> PartialSettings {
        PartialSettings {
            yaml: layer("yaml", self.yaml, upper.yaml),
            convert_links: layer("convert_links", self.convert_links, upper.convert_links),
            convert_tags_to_links: layer(
                "convert_tags_to_links",
                self.convert_tags_to_links,
                upper.convert_tags_to_links,
            ),
            tag_prefix: layer("tag_prefix", self.tag_prefix, upper.tag_prefix),
            merge_entries: layer("merge_entries", self.merge_entries, upper.merge_entries),
            entries_sep: layer("entries_sep", self.entries_sep, upper.entries_sep),
            ignore_tags: layer("ignore_tags", self.ignore_tags, upper.ignore_tags),
            status_tags: layer("status_tags", self.status_tags, upper.status_tags),
            vault_directory: layer("vault_directory", self.vault_directory, upper.vault_directory),
            metadata: layer("metadata", self.metadata, upper.metadata),
        }
    }

    /// Apply defaults for every key no layer set
    pub fn resolve(self) -> Settings {
        Settings {
            options: ConvertOptions {
                yaml: self.yaml.unwrap_or(false),
                convert_links: self.convert_links.unwrap_or(false),
                convert_tags_to_links: self.convert_tags_to_links.unwrap_or(false),
                tags_prefix: self
                    .tag_prefix
                    .unwrap_or_else(|| DEFAULT_TAGS_PREFIX.to_string()),
                status_tags: self.status_tags.unwrap_or_default(),
                ignore_tags: self.ignore_tags.unwrap_or_default(),
                merge_entries: self.merge_entries.unwrap_or(false),
                separator: self
                    .entries_sep
                    .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
                extra_metadata: self.metadata.unwrap_or_default(),
            },
            vault_directory: self.vault_directory,
        }
    }
}
