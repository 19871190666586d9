//! Body text rewriting: attachments, internal links, tags

use super::attachments::AttachmentMapper;
use super::entry::{AttachmentKind, Entry};
use super::options::ConvertOptions;
use super::references::{markdown_target, ResolverTable};
use super::report::{Warning, WarningKind};
use super::tags::rewrite_tag_markers;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

/// Lookups shared by every entry of a run
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub references: &'a ResolverTable,
    pub attachments: &'a AttachmentMapper,
    pub options: &'a ConvertOptions,
}

/// Rewritten body of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub warnings: Vec<Warning>,
}

fn attachment_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"!\[\]\(dayone-moment:/+(?:(video|audio|pdfAttachment)/)?([A-Za-z0-9]+)\)")
            .unwrap()
    })
}

fn link_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"\[([^\]]*)\]\(dayone2?://view\?entry[Ii]d=([A-Za-z0-9]+)\)|dayone2?://view\?entry[Ii]d=([A-Za-z0-9]+)",
        )
        .unwrap()
    })
}

/// Replace every match of `regex`; a resolver returning `None` keeps the match as is.
fn rewrite<F>(text: &str, regex: &Regex, mut resolver: F) -> String
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    regex
        .replace_all(text, |captures: &Captures<'_>| {
            resolver(captures).unwrap_or_else(|| captures[0].to_string())
        })
        .into_owned()
}

pub struct ContentTransformer;

impl ContentTransformer {
    /// Rewrite the body of `entry` for the document at `document`.
    ///
    /// Passes run in a fixed order: attachments, then links, then tags. The
    /// text inserted by one pass never matches the markers of a later one.
    pub fn transform(entry: &Entry, document: &Path, ctx: TransformContext<'_>) -> Transformed {
        let mut warnings = Vec::new();

        let text = Self::rewrite_attachments(entry, document, ctx, &mut warnings);
        let text = if ctx.options.convert_links {
            Self::rewrite_links(&text, entry, document, ctx, &mut warnings)
        } else {
            text
        };
        let text = rewrite_tag_markers(&text, &entry.tags, ctx.options);

        Transformed { text, warnings }
    }

    fn rewrite_attachments(
        entry: &Entry,
        document: &Path,
        ctx: TransformContext<'_>,
        warnings: &mut Vec<Warning>,
    ) -> String {
        rewrite(&entry.text, attachment_regex(), |captures| {
            let identifier = &captures[2];

            match ctx.attachments.resolve(identifier) {
                Some(target) => Some(format!(
                    "![]({})",
                    markdown_target(&target.relative_from(document))
                )),
                None => {
                    let kind = marker_kind(captures.get(1).map(|m| m.as_str()));
                    warn!(entry = %entry.identifier, attachment = %identifier, "attachment file missing from export");
                    warnings.push(Warning::new(
                        &entry.identifier,
                        WarningKind::MissingAttachment {
                            attachment: identifier.to_string(),
                        },
                    ));
                    Some(format!(
                        "^[Missing {} attachment `{}`]",
                        kind.label(),
                        identifier
                    ))
                }
            }
        })
    }

    fn rewrite_links(
        text: &str,
        entry: &Entry,
        document: &Path,
        ctx: TransformContext<'_>,
        warnings: &mut Vec<Warning>,
    ) -> String {
        rewrite(text, link_regex(), |captures| {
            let (label, identifier) = match (captures.get(2), captures.get(3)) {
                (Some(id), _) => (captures.get(1).map(|m| m.as_str()), id.as_str()),
                (None, Some(id)) => (None, id.as_str()),
                (None, None) => return None,
            };

            let Some(link) = ctx.references.resolve(identifier, document) else {
                warn!(entry = %entry.identifier, target = %identifier, "linked entry not in export, keeping original link");
                warnings.push(Warning::new(
                    &entry.identifier,
                    WarningKind::UnresolvedLink {
                        target: identifier.to_string(),
                    },
                ));
                return None;
            };

            Some(format!(
                "[{}]({})",
                label.unwrap_or(&link.title),
                markdown_target(&link.href)
            ))
        })
    }
}

fn marker_kind(segment: Option<&str>) -> AttachmentKind {
    match segment {
        Some("video") => AttachmentKind::Video,
        Some("audio") => AttachmentKind::Audio,
        Some("pdfAttachment") => AttachmentKind::Pdf,
        _ => AttachmentKind::Photo,
    }
}
