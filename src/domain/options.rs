//! Resolved conversion options

use serde_yaml::Mapping;

pub const DEFAULT_TAGS_PREFIX: &str = "journal/";
pub const DEFAULT_SEPARATOR: &str = "\n\n---\n\n";

/// Options driving the entry transformation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Front-matter block instead of inline fields
    pub yaml: bool,
    /// Rewrite Day One internal links to relative document links
    pub convert_links: bool,
    /// Render tags as `[[links]]` instead of `#tags`
    pub convert_tags_to_links: bool,
    pub tags_prefix: String,
    pub status_tags: Vec<String>,
    pub ignore_tags: Vec<String>,
    /// One document per day instead of one per entry
    pub merge_entries: bool,
    pub separator: String,
    /// Extra metadata fields copied into every document
    pub extra_metadata: Mapping,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            yaml: false,
            convert_links: false,
            convert_tags_to_links: false,
            tags_prefix: DEFAULT_TAGS_PREFIX.to_string(),
            status_tags: Vec::new(),
            ignore_tags: Vec::new(),
            merge_entries: false,
            separator: DEFAULT_SEPARATOR.to_string(),
            extra_metadata: Mapping::new(),
        }
    }
}

impl ConvertOptions {
    /// Tag prefix without a leading `#`
    pub fn prefix(&self) -> &str {
        self.tags_prefix.trim_start_matches('#')
    }

    pub fn is_ignored(&self, tag: &str) -> bool {
        contains_tag(&self.ignore_tags, tag)
    }

    pub fn is_status(&self, tag: &str) -> bool {
        contains_tag(&self.status_tags, tag)
    }
}

fn contains_tag(list: &[String], tag: &str) -> bool {
    let tag = tag.to_lowercase();
    list.iter().any(|t| t.trim_start_matches('#').to_lowercase() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(!options.yaml);
        assert!(!options.merge_entries);
        assert_eq!(options.prefix(), "journal/");
        assert_eq!(options.separator, "\n\n---\n\n");
    }

    #[test]
    fn test_prefix_drops_hash() {
        let options = ConvertOptions {
            tags_prefix: "#on/".to_string(),
            ..Default::default()
        };
        assert_eq!(options.prefix(), "on/");
    }

    #[test]
    fn test_tag_lists_case_insensitive() {
        let options = ConvertOptions {
            ignore_tags: vec!["Private".to_string()],
            status_tags: vec!["#draft".to_string()],
            ..Default::default()
        };
        assert!(options.is_ignored("private"));
        assert!(options.is_status("Draft"));
        assert!(!options.is_status("private"));
    }
}
