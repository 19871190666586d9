//! CLI argument definitions

use crate::infrastructure::PartialSettings;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dayvault")]
#[command(about = "Convert a Day One JSON export into a Markdown vault", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Unzipped Day One export folder (the one holding <Journal>.json)
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// YAML config file
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Output folder (default: FOLDER)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Existing vault; documents already present there are not written
    #[arg(long, value_name = "DIR")]
    pub vault_directory: Option<PathBuf>,

    /// Write documents even when they already exist in the vault
    #[arg(short, long)]
    pub force: bool,

    /// Add a YAML front-matter instead of inline fields
    #[arg(long, overrides_with = "no_yaml")]
    pub yaml: bool,

    /// Use inline fields instead of a YAML front-matter
    #[arg(long, overrides_with = "yaml")]
    pub no_yaml: bool,

    /// Rewrite links between Day One entries to links between documents
    #[arg(long)]
    pub convert_links: bool,

    /// Render tags as [[links]] instead of #tags
    #[arg(long)]
    pub convert_tags_to_links: bool,

    /// Prefix for every entry tag (default: journal/)
    #[arg(long, value_name = "PREFIX")]
    pub tag_prefix: Option<String>,

    /// One document per day instead of one per entry
    #[arg(long)]
    pub merge_entries: bool,

    /// Separator between merged entries
    #[arg(long, value_name = "SEP")]
    pub entries_sep: Option<String>,

    /// Tag to drop from the output (repeatable)
    #[arg(short = 'i', long = "ignore-tags", value_name = "TAG", action = ArgAction::Append)]
    pub ignore_tags: Vec<String>,

    /// Tag to render as a status instead of a tag (repeatable)
    #[arg(short = 's', long = "status-tags", value_name = "TAG", action = ArgAction::Append)]
    pub status_tags: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// `Some(true)` for `--x`, `Some(false)` for `--no-x`, `None` when neither is given
fn flag(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn list(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

impl Cli {
    /// Settings given on the command line, to be layered over the config file
    pub fn settings_layer(&self) -> PartialSettings {
        PartialSettings {
            yaml: flag(self.yaml, self.no_yaml),
            convert_links: flag(self.convert_links, false),
            convert_tags_to_links: flag(self.convert_tags_to_links, false),
            tag_prefix: self.tag_prefix.clone(),
            merge_entries: flag(self.merge_entries, false),
            entries_sep: self.entries_sep.clone(),
            ignore_tags: list(&self.ignore_tags),
            status_tags: list(&self.status_tags),
            vault_directory: self.vault_directory.clone(),
            metadata: None,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.folder.clone())
    }
}
