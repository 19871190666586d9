//! Grouping of entries by calendar day

use super::entry::Entry;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Entries that share one output document.
///
/// Entries are chronological and all fall on `day`.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub entries: Vec<Entry>,
}

/// Local day first, then instant, then identifier, so the result never
/// depends on the order of records in the export and same-day entries are
/// adjacent even when they were written in different time zones.
pub fn chronological(a: &Entry, b: &Entry) -> Ordering {
    a.day()
        .cmp(&b.day())
        .then_with(|| a.timestamp.cmp(&b.timestamp))
        .then_with(|| a.identifier.cmp(&b.identifier))
}

/// Sort `entries` and group them by local calendar day.
///
/// With `merge` off every entry gets its own group; same-day groups stay
/// adjacent and in chronological order.
pub fn group_by_day(mut entries: Vec<Entry>, merge: bool) -> Vec<DayGroup> {
    entries.sort_by(chronological);

    let mut groups: Vec<DayGroup> = Vec::new();
    for entry in entries {
        let day = entry.day();
        match groups.last_mut() {
            Some(group) if merge && group.day == day => group.entries.push(entry),
            _ => groups.push(DayGroup {
                day,
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// Concatenate transformed bodies in order. A single body is returned as is.
pub fn join_bodies(bodies: &[String], separator: &str) -> String {
    bodies.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn entry(identifier: &str, timestamp: &str) -> Entry {
        Entry {
            identifier: identifier.to_string(),
            journal: "travel".to_string(),
            timestamp: DateTime::parse_from_rfc3339(timestamp).unwrap(),
            text: format!("body of {}", identifier),
            location: None,
            tags: Vec::new(),
            starred: false,
            weather: None,
            activity: None,
            attachments: Vec::new(),
        }
    }

    fn identifiers(group: &DayGroup) -> Vec<&str> {
        group.entries.iter().map(|e| e.identifier.as_str()).collect()
    }

    #[test]
    fn test_merge_groups_same_day() {
        let entries = vec![
            entry("B", "2022-09-21T18:00:00+00:00"),
            entry("C", "2022-09-22T08:00:00+00:00"),
            entry("A", "2022-09-21T09:00:00+00:00"),
        ];

        let groups = group_by_day(entries, true);
        assert_eq!(groups.len(), 2);
        assert_eq!(identifiers(&groups[0]), vec!["A", "B"]);
        assert_eq!(identifiers(&groups[1]), vec!["C"]);
        assert_eq!(groups[0].day, NaiveDate::from_ymd_opt(2022, 9, 21).unwrap());
    }

    #[test]
    fn test_no_merge_one_group_per_entry() {
        let entries = vec![
            entry("B", "2022-09-21T18:00:00+00:00"),
            entry("A", "2022-09-21T09:00:00+00:00"),
        ];

        let groups = group_by_day(entries, false);
        assert_eq!(groups.len(), 2);
        assert_eq!(identifiers(&groups[0]), vec!["A"]);
        assert_eq!(identifiers(&groups[1]), vec!["B"]);
    }

    #[test]
    fn test_same_timestamp_ordered_by_identifier() {
        let forward = group_by_day(
            vec![
                entry("Y", "2022-09-21T09:00:00+00:00"),
                entry("X", "2022-09-21T09:00:00+00:00"),
            ],
            true,
        );
        let backward = group_by_day(
            vec![
                entry("X", "2022-09-21T09:00:00+00:00"),
                entry("Y", "2022-09-21T09:00:00+00:00"),
            ],
            true,
        );
        assert_eq!(forward, backward);
        assert_eq!(identifiers(&forward[0]), vec!["X", "Y"]);
    }

    #[test]
    fn test_local_day_is_used() {
        let groups = group_by_day(
            vec![
                entry("A", "2022-09-21T23:30:00-05:00"),
                entry("B", "2022-09-22T01:00:00+00:00"),
            ],
            true,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(identifiers(&groups[0]), vec!["A"]);
        assert_eq!(groups[0].day, NaiveDate::from_ymd_opt(2022, 9, 21).unwrap());
    }

    #[test]
    fn test_join_bodies() {
        let bodies = vec!["body1".to_string(), "body2".to_string()];
        assert_eq!(join_bodies(&bodies, "\n---\n"), "body1\n---\nbody2");
        assert_eq!(join_bodies(&bodies[..1], "\n---\n"), "body1");
    }
}
