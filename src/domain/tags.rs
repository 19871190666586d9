//! Tag routing, tag slugs and body hashtag rewriting

use super::entry::Entry;
use super::options::ConvertOptions;
use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Where a single entry tag ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRoute {
    /// Listed in `ignore_tags`: not rendered anywhere
    Ignored,
    /// Listed in `status_tags`: goes to the status field as `status/<slug>`
    Status(String),
    /// Everything else: `<prefix><slug>` in the tag list
    Regular(String),
}

pub fn route(tag: &str, options: &ConvertOptions) -> TagRoute {
    if options.is_ignored(tag) {
        TagRoute::Ignored
    } else if options.is_status(tag) {
        TagRoute::Status(format!("status/{}", slug(tag)))
    } else {
        TagRoute::Regular(format!("{}{}", options.prefix(), slug(tag)))
    }
}

/// Rendered tags of one entry, without the leading `#`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryTags {
    pub tags: Vec<String>,
    pub status: Vec<String>,
}

impl EntryTags {
    pub fn for_entry(entry: &Entry, options: &ConvertOptions) -> Self {
        let mut result = EntryTags::default();

        for tag in &entry.tags {
            match route(tag, options) {
                TagRoute::Ignored => {}
                TagRoute::Status(status) => push_unique(&mut result.status, status),
                TagRoute::Regular(regular) => push_unique(&mut result.tags, regular),
            }
        }

        if let Some(place) = entry.location.as_ref().and_then(|l| place_tag(&l.places_without_name())) {
            push_unique(&mut result.tags, place);
        }

        result
    }

    /// Union keeping the first occurrence of every tag
    pub fn extend(&mut self, other: EntryTags) {
        for tag in other.tags {
            push_unique(&mut self.tags, tag);
        }
        for status in other.status {
            push_unique(&mut self.status, status);
        }
    }
}

pub fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Camel-case a tag: `Road trip` becomes `roadTrip`
pub fn slug(tag: &str) -> String {
    tag.trim_start_matches('#')
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `places/Italy/Lombardy/Milan` from address parts given most specific first
fn place_tag(parts: &[&str]) -> Option<String> {
    if parts.is_empty() {
        return None;
    }

    let segments: Vec<String> = parts
        .iter()
        .rev()
        .map(|part| {
            part.replace('\'', "-")
                .split_whitespace()
                .map(capitalize)
                .collect::<String>()
        })
        .collect();

    Some(format!("places/{}", segments.join("/")))
}

fn body_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?m)(^|[\s(\[{,;])#([\p{L}\p{N}_-]+)").unwrap())
}

/// Rewrite hashtags in the body that name one of the entry's tags.
///
/// Fenced code blocks, inline code spans and link destinations are left alone.
pub fn rewrite_tag_markers(text: &str, entry_tags: &[String], options: &ConvertOptions) -> String {
    if text.is_empty() || entry_tags.is_empty() {
        return text.to_string();
    }

    let excluded = excluded_ranges(text);

    body_tag_regex()
        .replace_all(text, |captures: &regex::Captures<'_>| {
            let lead = &captures[1];
            let word = &captures[2];
            let hash = captures[1].len() + captures.get(0).map_or(0, |m| m.start());

            if excluded.iter().any(|range| range.contains(&hash)) {
                return captures[0].to_string();
            }
            let Some(tag) = find_entry_tag(word, entry_tags) else {
                return captures[0].to_string();
            };

            match route(tag, options) {
                TagRoute::Ignored | TagRoute::Status(_) => format!("{}{}", lead, word),
                TagRoute::Regular(rendered) if options.convert_tags_to_links => {
                    format!("{}[[{}]]", lead, rendered)
                }
                TagRoute::Regular(rendered) => format!("{}#{}", lead, rendered),
            }
        })
        .into_owned()
}

fn find_entry_tag<'a>(word: &str, entry_tags: &'a [String]) -> Option<&'a String> {
    let word = word.to_lowercase();
    entry_tags
        .iter()
        .find(|tag| tag.to_lowercase() == word || slug(tag).to_lowercase() == word)
}

fn excluded_ranges(markdown: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut code_block_start: Option<usize> = None;
    // Open links and images with the end of their label so far
    let mut links: Vec<(Range<usize>, usize)> = Vec::new();

    for (event, range) in MdParser::new(markdown).into_offset_iter() {
        if !matches!(
            event,
            Event::Start(Tag::Link { .. } | Tag::Image { .. })
                | Event::End(TagEnd::Link | TagEnd::Image)
        ) {
            if let Some((_, label_end)) = links.last_mut() {
                *label_end = (*label_end).max(range.end);
            }
        }

        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                let label_start = (range.start + 1).min(range.end);
                links.push((range, label_start));
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                if let Some((link, label_end)) = links.pop() {
                    // Everything after the label is the destination or reference
                    ranges.push(label_end.min(link.end)..link.end);
                    if let Some((_, outer_end)) = links.last_mut() {
                        *outer_end = (*outer_end).max(link.end);
                    }
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                code_block_start = Some(range.start);
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(start) = code_block_start.take() {
                    ranges.push(start..range.end);
                }
            }
            Event::Code(_) => {
                ranges.push(range.start..range.end);
            }
            _ => {}
        }
    }

    if let Some(start) = code_block_start.take() {
        ranges.push(start..markdown.len());
    }

    merge_ranges(ranges)
}

fn merge_ranges(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}
