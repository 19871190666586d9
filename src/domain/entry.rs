//! Entry model and normalization of raw Day One records

use super::report::{Warning, WarningKind};
use crate::error::{Result, VaultError};
use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// One record of a journal export, exactly as Day One writes it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub uuid: Option<String>,
    pub creation_date: Option<String>,
    pub time_zone: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub location: Option<RawLocation>,
    pub weather: Option<RawWeather>,
    pub user_activity: Option<RawActivity>,
    #[serde(default)]
    pub photos: Vec<RawMedia>,
    #[serde(default)]
    pub videos: Vec<RawMedia>,
    #[serde(default)]
    pub audios: Vec<RawMedia>,
    #[serde(default)]
    pub pdf_attachments: Vec<RawMedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub place_name: Option<String>,
    pub locality_name: Option<String>,
    pub administrative_area: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWeather {
    #[serde(rename = "weatherCode")]
    pub weather_code: Option<String>,
    #[serde(rename = "temperatureCelsius")]
    pub temperature_celsius: Option<f64>,
    #[serde(rename = "windSpeedKPH")]
    pub wind_speed_kph: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    pub activity_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    pub identifier: Option<String>,
    pub md5: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// Kind of media attached to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttachmentKind {
    Photo,
    Video,
    Audio,
    Pdf,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 4] = [
        AttachmentKind::Photo,
        AttachmentKind::Video,
        AttachmentKind::Audio,
        AttachmentKind::Pdf,
    ];

    /// Folder name used both in the export and in the output tree
    pub fn folder(&self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photos",
            AttachmentKind::Video => "videos",
            AttachmentKind::Audio => "audios",
            AttachmentKind::Pdf => "pdfs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Video => "video",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Pdf => "pdf",
        }
    }
}

/// Reference from an entry to one media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub identifier: String,
    pub md5: String,
    pub kind: AttachmentKind,
    /// None when the export did not record a file type (file was never downloaded)
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Location {
    pub place: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// Non-empty address parts, most specific first
    pub fn places(&self) -> Vec<&str> {
        [&self.place, &self.locality, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect()
    }

    /// Address parts without the place name, most specific first
    pub fn places_without_name(&self) -> Vec<&str> {
        [&self.locality, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect()
    }

    /// Address as a single line, e.g. "Duomo, Milan, Lombardy, Italy"
    pub fn address(&self) -> Option<String> {
        let places = self.places();
        if places.is_empty() {
            None
        } else {
            Some(places.join(", "))
        }
    }
}

/// A normalized journal entry
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub identifier: String,
    pub journal: String,
    pub timestamp: DateTime<FixedOffset>,
    pub text: String,
    pub location: Option<Location>,
    pub tags: Vec<String>,
    pub starred: bool,
    pub weather: Option<String>,
    pub activity: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Entry {
    /// Build an entry from a raw record.
    ///
    /// `index` is the position of the record in its journal and is only used
    /// to report records that have no identifier.
    pub fn from_record(
        journal: &str,
        index: usize,
        raw: &RawEntry,
        warnings: &mut Vec<Warning>,
    ) -> Result<Entry> {
        let identifier = non_empty(&raw.uuid).ok_or_else(|| VaultError::MissingField {
            field: "uuid",
            record: format!("{}#{}", journal, index),
        })?;

        let created = non_empty(&raw.creation_date).ok_or_else(|| VaultError::MissingField {
            field: "creationDate",
            record: identifier.clone(),
        })?;

        let timestamp = localize(&identifier, &created, raw.time_zone.as_deref(), warnings)?;

        let mut tags: Vec<String> = Vec::new();
        for tag in &raw.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        Ok(Entry {
            journal: journal.to_string(),
            timestamp,
            text: raw.text.as_deref().map(clean_export_text).unwrap_or_default(),
            location: raw.location.as_ref().and_then(normalize_location),
            tags,
            starred: raw.starred,
            weather: raw.weather.as_ref().and_then(describe_weather),
            activity: raw
                .user_activity
                .as_ref()
                .and_then(|activity| non_empty(&activity.activity_name)),
            attachments: collect_attachments(&identifier, raw),
            identifier,
        })
    }

    /// Local calendar day of the entry
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn localize(
    identifier: &str,
    created: &str,
    zone: Option<&str>,
    warnings: &mut Vec<Warning>,
) -> Result<DateTime<FixedOffset>> {
    let utc = DateTime::parse_from_rfc3339(created).map_err(|_| VaultError::InvalidTimestamp {
        identifier: identifier.to_string(),
        value: created.to_string(),
    })?;

    match zone {
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => Ok(utc.with_timezone(&tz).fixed_offset()),
            Err(_) => {
                warn!(entry = %identifier, zone = %name, "unknown time zone, keeping UTC");
                warnings.push(Warning::new(
                    identifier,
                    WarningKind::UnknownTimeZone {
                        zone: name.to_string(),
                    },
                ));
                Ok(utc.with_timezone(&chrono::Utc).fixed_offset())
            }
        },
        None => Ok(utc.with_timezone(&chrono::Utc).fixed_offset()),
    }
}

fn normalize_location(raw: &RawLocation) -> Option<Location> {
    let coordinates = match (raw.latitude, raw.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let location = Location {
        place: non_empty(&raw.place_name),
        locality: non_empty(&raw.locality_name),
        region: non_empty(&raw.administrative_area),
        country: non_empty(&raw.country),
        coordinates,
    };

    if location.places().is_empty() && location.coordinates.is_none() {
        None
    } else {
        Some(location)
    }
}

fn describe_weather(raw: &RawWeather) -> Option<String> {
    match (&raw.weather_code, raw.temperature_celsius, raw.wind_speed_kph) {
        (Some(code), Some(temperature), Some(wind)) => Some(format!(
            "{}, {:.1}°C, {:.1} km/h wind",
            code, temperature, wind
        )),
        _ => None,
    }
}

fn collect_attachments(identifier: &str, raw: &RawEntry) -> Vec<Attachment> {
    let groups = [
        (AttachmentKind::Photo, &raw.photos),
        (AttachmentKind::Video, &raw.videos),
        (AttachmentKind::Audio, &raw.audios),
        (AttachmentKind::Pdf, &raw.pdf_attachments),
    ];

    let mut attachments = Vec::new();
    for (kind, media) in groups {
        for item in media {
            let (Some(id), Some(md5)) = (non_empty(&item.identifier), non_empty(&item.md5)) else {
                debug!(entry = %identifier, kind = kind.label(), "skipping attachment without identifier");
                continue;
            };

            // Day One never records a type for audio; recordings are AAC in .m4a
            let extension = match kind {
                AttachmentKind::Audio => Some("m4a".to_string()),
                AttachmentKind::Pdf => Some("pdf".to_string()),
                _ => non_empty(&item.media_type),
            };

            attachments.push(Attachment {
                identifier: id,
                md5,
                kind,
                extension,
            });
        }
    }
    attachments
}

fn escaped_punctuation_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\\([\\`*_{}\[\]()#+\-.!>|~])").unwrap())
}

fn split_fence_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"```\s+```").unwrap())
}

/// Undo Day One's export quirks: markdown escapes, odd separators and
/// code blocks split into one fence per line.
pub fn clean_export_text(text: &str) -> String {
    let text = escaped_punctuation_regex().replace_all(text, "$1");
    let text = text
        .replace('\u{2028}', "\n")
        .replace('\u{1C6A}', "\n\n")
        .replace('\u{200B}', "");
    split_fence_regex().replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn raw(json: &str) -> RawEntry {
        serde_json::from_str(json).unwrap()
    }

    fn normalize(json: &str) -> Result<Entry> {
        Entry::from_record("travel", 0, &raw(json), &mut Vec::new())
    }

    #[test]
    fn test_full_record() {
        let entry = normalize(
            r#"{
                "uuid": "ABC123",
                "creationDate": "2022-09-21T08:30:00Z",
                "timeZone": "Europe/Rome",
                "text": "Hello \\. world",
                "starred": true,
                "tags": ["Vacation", "Road trip", "Vacation"],
                "location": {
                    "placeName": "Duomo",
                    "localityName": "Milan",
                    "administrativeArea": "Lombardy",
                    "country": "Italy",
                    "latitude": 45.4642,
                    "longitude": 9.19
                },
                "weather": {"weatherCode": "clear", "temperatureCelsius": 21.04, "windSpeedKPH": 7.26},
                "userActivity": {"activityName": "Walking"},
                "photos": [{"identifier": "P1", "md5": "aa11", "type": "jpeg"}]
            }"#,
        )
        .unwrap();

        assert_eq!(entry.identifier, "ABC123");
        assert_eq!(entry.journal, "travel");
        assert_eq!(entry.timestamp.hour(), 10);
        assert_eq!(entry.day(), NaiveDate::from_ymd_opt(2022, 9, 21).unwrap());
        assert_eq!(entry.text, "Hello . world");
        assert!(entry.starred);
        assert_eq!(entry.tags, vec!["Vacation", "Road trip"]);
        assert_eq!(entry.weather.as_deref(), Some("clear, 21.0°C, 7.3 km/h wind"));
        assert_eq!(entry.activity.as_deref(), Some("Walking"));

        let location = entry.location.unwrap();
        assert_eq!(
            location.address().as_deref(),
            Some("Duomo, Milan, Lombardy, Italy")
        );
        let coordinates = location.coordinates.unwrap();
        assert_eq!(coordinates.latitude, 45.4642);
        assert_eq!(coordinates.longitude, 9.19);

        assert_eq!(entry.attachments.len(), 1);
        assert_eq!(entry.attachments[0].kind, AttachmentKind::Photo);
        assert_eq!(entry.attachments[0].extension.as_deref(), Some("jpeg"));
    }

    #[test]
    fn test_optional_fields_absent() {
        let entry = normalize(r#"{"uuid": "A", "creationDate": "2022-01-05T10:00:00Z"}"#).unwrap();

        assert_eq!(entry.text, "");
        assert!(entry.location.is_none());
        assert!(entry.weather.is_none());
        assert!(entry.activity.is_none());
        assert!(entry.tags.is_empty());
        assert!(!entry.starred);
        assert_eq!(entry.timestamp.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_empty_location_is_none() {
        let entry = normalize(
            r#"{"uuid": "A", "creationDate": "2022-01-05T10:00:00Z", "location": {"placeName": ""}}"#,
        )
        .unwrap();
        assert!(entry.location.is_none());
    }

    #[test]
    fn test_partial_coordinates_dropped() {
        let entry = normalize(
            r#"{"uuid": "A", "creationDate": "2022-01-05T10:00:00Z",
                "location": {"country": "Italy", "latitude": 45.0}}"#,
        )
        .unwrap();
        let location = entry.location.unwrap();
        assert!(location.coordinates.is_none());
        assert_eq!(location.address().as_deref(), Some("Italy"));
    }

    #[test]
    fn test_incomplete_weather_omitted() {
        let entry = normalize(
            r#"{"uuid": "A", "creationDate": "2022-01-05T10:00:00Z",
                "weather": {"weatherCode": "rain"}}"#,
        )
        .unwrap();
        assert!(entry.weather.is_none());
    }

    #[test]
    fn test_missing_uuid_is_fatal() {
        let err = Entry::from_record(
            "travel",
            7,
            &raw(r#"{"creationDate": "2022-01-05T10:00:00Z"}"#),
            &mut Vec::new(),
        )
        .unwrap_err();

        match err {
            VaultError::MissingField { field, record } => {
                assert_eq!(field, "uuid");
                assert_eq!(record, "travel#7");
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_creation_date_reports_identifier() {
        let err = normalize(r#"{"uuid": "ABC"}"#).unwrap_err();
        match err {
            VaultError::MissingField { field, record } => {
                assert_eq!(field, "creationDate");
                assert_eq!(record, "ABC");
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_timestamp_is_fatal() {
        let err = normalize(r#"{"uuid": "ABC", "creationDate": "last tuesday"}"#).unwrap_err();
        assert!(matches!(err, VaultError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_unknown_time_zone_warns() {
        let mut warnings = Vec::new();
        let entry = Entry::from_record(
            "travel",
            0,
            &raw(r#"{"uuid": "A", "creationDate": "2022-01-05T23:30:00Z", "timeZone": "Mars/Olympus"}"#),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(entry.day(), NaiveDate::from_ymd_opt(2022, 1, 5).unwrap());
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].kind,
            WarningKind::UnknownTimeZone {
                zone: "Mars/Olympus".to_string()
            }
        );
    }

    #[test]
    fn test_time_zone_moves_day() {
        let entry = normalize(
            r#"{"uuid": "A", "creationDate": "2022-01-05T23:30:00Z", "timeZone": "Asia/Tokyo"}"#,
        )
        .unwrap();
        assert_eq!(entry.day(), NaiveDate::from_ymd_opt(2022, 1, 6).unwrap());
    }

    #[test]
    fn test_attachment_extensions() {
        let entry = normalize(
            r#"{"uuid": "A", "creationDate": "2022-01-05T10:00:00Z",
                "photos": [{"identifier": "P1", "md5": "m1"}],
                "audios": [{"identifier": "A1", "md5": "m2"}],
                "pdfAttachments": [{"identifier": "D1", "md5": "m3"}],
                "videos": [{"md5": "m4", "type": "mov"}]}"#,
        )
        .unwrap();

        let extensions: Vec<_> = entry
            .attachments
            .iter()
            .map(|a| (a.identifier.as_str(), a.extension.as_deref()))
            .collect();
        assert_eq!(
            extensions,
            vec![("P1", None), ("A1", Some("m4a")), ("D1", Some("pdf"))]
        );
    }

    #[test]
    fn test_clean_export_text() {
        assert_eq!(clean_export_text("a\\-b\\!"), "a-b!");
        assert_eq!(clean_export_text("one\u{2028}two"), "one\ntwo");
        assert_eq!(clean_export_text("one\u{1C6A}two"), "one\n\ntwo");
        assert_eq!(clean_export_text("zero\u{200B}width"), "zerowidth");
        assert_eq!(
            clean_export_text("```\nlet a = 1;\n```\n```\nlet b = 2;\n```"),
            "```\nlet a = 1;\n\nlet b = 2;\n```"
        );
    }
}
