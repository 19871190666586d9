//! Non-fatal conditions collected during a conversion run

use std::fmt;

/// What went wrong for a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// Internal link to an entry outside the converted set
    UnresolvedLink { target: String },
    /// Attachment referenced in the text but absent from the media folders
    MissingAttachment { attachment: String },
    /// Time zone name not recognized, timestamp kept in UTC
    UnknownTimeZone { zone: String },
}

/// A warning tied to the entry that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub identifier: String,
    pub kind: WarningKind,
}

impl Warning {
    pub fn new(identifier: &str, kind: WarningKind) -> Self {
        Warning {
            identifier: identifier.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::UnresolvedLink { target } => write!(
                f,
                "{}: linked entry {} is not part of this export",
                self.identifier, target
            ),
            WarningKind::MissingAttachment { attachment } => write!(
                f,
                "{}: attachment {} is missing from the export",
                self.identifier, attachment
            ),
            WarningKind::UnknownTimeZone { zone } => write!(
                f,
                "{}: unknown time zone '{}', using UTC",
                self.identifier, zone
            ),
        }
    }
}
