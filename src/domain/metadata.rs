//! Metadata rendering: YAML front-matter or inline fields

use super::attachments::AttachmentMapper;
use super::entry::Coordinates;
use super::options::ConvertOptions;
use super::placement::DayDocument;
use super::tags::{push_unique, EntryTags};
use crate::error::Result;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

/// Final content of one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    Flag(bool),
    Point(Coordinates),
    /// Tag names without `#`
    Tags(Vec<String>),
    List(Vec<String>),
    /// Entry identifiers, hidden in inline mode
    Identifiers(Vec<String>),
    Urls(Vec<String>),
    /// Verbatim value from the config `metadata` mapping
    Config(Value),
}

/// Ordered metadata fields; setting an existing key replaces it in place
#[derive(Debug, Default)]
struct Fields(Vec<(String, FieldValue)>);

impl Fields {
    fn set(&mut self, key: &str, value: FieldValue) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(field) => field.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }
}

pub struct MetadataFormatter;

impl MetadataFormatter {
    /// Render `document` with its already transformed `body`.
    ///
    /// Exactly one representation is produced: a front-matter block when
    /// `options.yaml` is set, trailing inline fields otherwise.
    pub fn render(
        document: &DayDocument,
        body: &str,
        options: &ConvertOptions,
        attachments: &AttachmentMapper,
    ) -> Result<OutputDocument> {
        let fields = Self::fields(document, options, attachments);
        let body = body.trim_end_matches(|c: char| c == '\n' || c == '\r');

        let content = if options.yaml {
            front_matter(&fields, body)?
        } else {
            inline(&fields, body, options)
        };

        Ok(OutputDocument {
            path: document.path.clone(),
            content,
        })
    }

    fn fields(
        document: &DayDocument,
        options: &ConvertOptions,
        attachments: &AttachmentMapper,
    ) -> Fields {
        let first = document.first();
        let mut fields = Fields::default();

        fields.set(
            "date",
            FieldValue::Text(first.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()),
        );
        fields.set("journal", FieldValue::Text(first.journal.clone()));

        if let Some(location) = &first.location {
            if let Some(address) = location.address() {
                fields.set("places", FieldValue::Text(address));
            }
            if let Some(coordinates) = location.coordinates {
                fields.set("location", FieldValue::Point(coordinates));
            }
        }
        if let Some(weather) = &first.weather {
            fields.set("weather", FieldValue::Text(weather.clone()));
        }
        if let Some(activity) = &first.activity {
            fields.set("activity", FieldValue::Text(activity.clone()));
        }

        let mut tags = EntryTags::default();
        for entry in &document.entries {
            tags.extend(EntryTags::for_entry(entry, options));
        }
        for extra in config_tags(options) {
            push_unique(&mut tags.tags, extra);
        }
        if !tags.tags.is_empty() {
            fields.set("tags", FieldValue::Tags(tags.tags));
        }
        if !tags.status.is_empty() {
            fields.set("status", FieldValue::Tags(tags.status));
        }

        let media: Vec<String> = document
            .attachments()
            .iter()
            .filter_map(|a| attachments.resolve(&a.identifier))
            .map(|target| target.vault_path())
            .collect();
        if !media.is_empty() {
            fields.set("attachments", FieldValue::List(media));
        }

        fields.set("starred", FieldValue::Flag(document.starred()));

        let identifiers: Vec<String> = document
            .identifiers()
            .into_iter()
            .map(str::to_string)
            .collect();
        let urls = identifiers
            .iter()
            .map(|id| format!("dayone://view?entryId={}", id))
            .collect();
        fields.set("uuid", FieldValue::Identifiers(identifiers));
        fields.set("url", FieldValue::Urls(urls));

        for (key, value) in &options.extra_metadata {
            let Some(key) = key.as_str() else {
                continue;
            };
            if key != "tags" {
                fields.set(key, FieldValue::Config(value.clone()));
            }
        }

        fields
    }
}

/// Tags from the config `metadata.tags` key, as a list or a comma separated string
fn config_tags(options: &ConvertOptions) -> Vec<String> {
    let values: Vec<String> = match options.extra_metadata.get("tags") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(list)) => list.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    values
        .into_iter()
        .map(|tag| tag.trim().trim_start_matches('#').to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn single_or_list(values: &[String]) -> Value {
    match values {
        [single] => Value::String(single.clone()),
        _ => Value::Sequence(values.iter().cloned().map(Value::String).collect()),
    }
}

fn to_yaml(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Flag(flag) => Value::Bool(*flag),
        FieldValue::Point(point) => Value::Sequence(vec![
            Value::Number(point.latitude.into()),
            Value::Number(point.longitude.into()),
        ]),
        FieldValue::Tags(list) | FieldValue::List(list) => {
            Value::Sequence(list.iter().cloned().map(Value::String).collect())
        }
        FieldValue::Identifiers(list) | FieldValue::Urls(list) => single_or_list(list),
        FieldValue::Config(value) => value.clone(),
    }
}

fn front_matter(fields: &Fields, body: &str) -> Result<String> {
    let mut mapping = Mapping::new();
    for (key, value) in &fields.0 {
        mapping.insert(Value::String(key.clone()), to_yaml(value));
    }

    let yaml = serde_yaml::to_string(&mapping)?;
    let mut content = format!("---\n{}---\n", yaml);
    if !body.is_empty() {
        content.push('\n');
        content.push_str(body);
        content.push('\n');
    }
    Ok(content)
}

fn inline_config(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(inline_config)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Mapping(mapping) => mapping
            .iter()
            .map(|(k, v)| format!("{}: {}", inline_config(k), inline_config(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Tagged(tagged) => inline_config(&tagged.value),
    }
}

fn inline_value(value: &FieldValue, options: &ConvertOptions) -> String {
    match value {
        FieldValue::Text(text) => text.replace('\n', " "),
        FieldValue::Flag(flag) => flag.to_string(),
        FieldValue::Point(point) => format!("[{}, {}]", point.latitude, point.longitude),
        FieldValue::Tags(tags) => tags
            .iter()
            .map(|tag| {
                if options.convert_tags_to_links {
                    format!("[[{}]]", tag)
                } else {
                    format!("#{}", tag)
                }
            })
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::List(list) | FieldValue::Identifiers(list) => list.join(", "),
        FieldValue::Urls(urls) => urls
            .iter()
            .map(|url| format!("[Day One]({})", url))
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::Config(value) => inline_config(value).replace('\n', " "),
    }
}

fn inline(fields: &Fields, body: &str, options: &ConvertOptions) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut hidden: Vec<String> = Vec::new();

    for (key, value) in &fields.0 {
        if key == "uuid" {
            let identifiers = match value {
                FieldValue::Identifiers(list) => list.clone(),
                other => vec![inline_value(other, options)],
            };
            hidden.extend(identifiers.iter().map(|id| format!("%% uuid:: {} %%", id)));
        } else {
            lines.push(format!("{}:: {}", key, inline_value(value, options)));
        }
    }
    lines.extend(hidden);

    let fields = lines.join("\n");
    if body.is_empty() {
        format!("{}\n", fields)
    } else if body.starts_with("---") {
        // A leading rule would be read as a front-matter fence
        format!("\n{}\n\n{}\n", body, fields)
    } else {
        format!("{}\n\n{}\n", body, fields)
    }
}
