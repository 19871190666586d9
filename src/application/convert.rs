//! Export conversion use case
//!
//! Reads every journal of an export, places all documents, then transforms
//! and writes them. Nothing is written until every record has been read and
//! normalized.

use crate::domain::{
    group_by_day, join_bodies, place, AttachmentKind, AttachmentMapper, ContentTransformer,
    DayDocument, Disposition, Entry, MetadataFormatter, PlacementPolicy, ResolverTable,
    TransformContext, Warning, ATTACHMENTS_DIR,
};
use crate::error::{Result, VaultError};
use crate::infrastructure::{ExportFolder, JournalExport, OutputRepository, Settings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counts for one journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSummary {
    pub name: String,
    pub entries: usize,
    pub documents: usize,
}

/// Outcome of a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertReport {
    pub journals: Vec<JournalSummary>,
    pub documents_written: usize,
    /// Documents left alone because they already exist in the vault
    pub documents_skipped: usize,
    pub attachments_copied: usize,
    pub warnings: Vec<Warning>,
}

impl ConvertReport {
    pub fn entries(&self) -> usize {
        self.journals.iter().map(|j| j.entries).sum()
    }

    /// Entries folded into a document started by an earlier entry of the same day
    pub fn entries_merged(&self) -> usize {
        self.journals
            .iter()
            .map(|j| j.entries.saturating_sub(j.documents))
            .sum()
    }
}

/// Service converting a Day One export into a Markdown vault
pub struct ConvertService {
    export: ExportFolder,
    repository: OutputRepository,
}

impl ConvertService {
    pub fn new(export: ExportFolder, repository: OutputRepository) -> Self {
        ConvertService { export, repository }
    }

    /// Run the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The export holds no journal files
    /// - A journal file is not valid JSON
    /// - A record lacks its identifier or creation date
    /// - File I/O fails
    pub fn execute(&self, settings: &Settings, force: bool) -> Result<ConvertReport> {
        let options = &settings.options;
        let mut report = ConvertReport::default();

        // 1. Read and normalize everything before touching the output
        let journals = self.export.read_all()?;
        self.check_journal_names(&journals)?;

        let mut documents: Vec<DayDocument> = Vec::new();
        for journal in &journals {
            let entries = normalize(journal, &mut report.warnings)?;
            let placed = place(group_by_day(entries, options.merge_entries));

            info!(
                journal = %journal.name,
                file = %journal.path.display(),
                entries = journal.records.len(),
                documents = placed.len(),
                "journal placed"
            );
            report.journals.push(JournalSummary {
                name: journal.name.clone(),
                entries: journal.records.len(),
                documents: placed.len(),
            });
            documents.extend(placed);
        }

        // 2. Lookups over every journal
        let references = ResolverTable::build(&documents);
        let inventory = self.export.inventory();
        let attachments =
            AttachmentMapper::build(documents.iter().flat_map(|d| &d.entries), &inventory);
        debug!(
            entries = references.len(),
            attachments = attachments.len(),
            "lookups built"
        );

        // 3. Regenerate output folders
        self.reset_output(&journals)?;
        for target in attachments.targets() {
            let source = self.export.media_dir(target.kind).join(&target.source);
            self.repository.copy_media(&source, &target.path)?;
            report.attachments_copied += 1;
        }

        // 4. Transform and write
        let policy = PlacementPolicy {
            vault: settings.vault_directory.clone(),
            force,
        };
        let ctx = TransformContext {
            references: &references,
            attachments: &attachments,
            options,
        };

        for document in &documents {
            let disposition = policy.decide(&document.path);
            if disposition == Disposition::Skip {
                debug!(path = %document.path.display(), "already in vault, skipping");
                report.documents_skipped += 1;
                continue;
            }

            let mut bodies = Vec::with_capacity(document.entries.len());
            for entry in &document.entries {
                let transformed = ContentTransformer::transform(entry, &document.path, ctx);
                report.warnings.extend(transformed.warnings);
                bodies.push(transformed.text);
            }

            let body = join_bodies(&bodies, &options.separator);
            let output = MetadataFormatter::render(document, &body, options, &attachments)?;
            self.repository.write_document(&output.path, &output.content)?;

            debug!(path = %output.path.display(), ?disposition, "document written");
            report.documents_written += 1;
        }

        info!(
            written = report.documents_written,
            skipped = report.documents_skipped,
            attachments = report.attachments_copied,
            warnings = report.warnings.len(),
            "conversion finished"
        );
        Ok(report)
    }

    /// Journal folders are wiped on every run; none may shadow a media folder
    fn check_journal_names(&self, journals: &[JournalExport]) -> Result<()> {
        let same_root = same_folder(self.export.root(), self.repository.root());
        let mut folders: BTreeMap<&str, &Path> = BTreeMap::new();

        for journal in journals {
            if let Some(previous) = folders.insert(&journal.name, &journal.path) {
                return Err(VaultError::Config(format!(
                    "Journals '{}' and '{}' both map to folder '{}'",
                    file_name(previous),
                    file_name(&journal.path),
                    journal.name
                )));
            }

            let clashes_with_media = AttachmentKind::ALL
                .iter()
                .any(|kind| kind.folder() == journal.name);

            if journal.name == ATTACHMENTS_DIR || (same_root && clashes_with_media) {
                return Err(VaultError::Config(format!(
                    "Journal '{}' would overwrite the '{}' folder; choose another output folder",
                    journal.name, journal.name
                )));
            }
        }
        Ok(())
    }

    fn reset_output(&self, journals: &[JournalExport]) -> Result<()> {
        let folders = journals
            .iter()
            .map(|journal| PathBuf::from(&journal.name))
            .chain(
                AttachmentKind::ALL
                    .iter()
                    .map(|kind| Path::new(ATTACHMENTS_DIR).join(kind.folder())),
            );

        for folder in folders {
            if self.repository.reset_dir(&folder)? {
                warn!(folder = %self.repository.root().join(&folder).display(), "removed previous output");
            }
        }
        Ok(())
    }
}

fn normalize(journal: &JournalExport, warnings: &mut Vec<Warning>) -> Result<Vec<Entry>> {
    journal
        .records
        .iter()
        .enumerate()
        .map(|(index, raw)| Entry::from_record(&journal.name, index, raw, warnings))
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn same_folder(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
