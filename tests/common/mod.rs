#![allow(dead_code)]

use assert_cmd::Command;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn dayvault_cmd() -> Command {
    let mut cmd = Command::cargo_bin("dayvault").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

pub const TRAVEL_JSON: &str = r#"{
    "metadata": {"version": "1.0"},
    "entries": [
        {
            "uuid": "BBB222",
            "creationDate": "2022-09-21T16:00:00Z",
            "timeZone": "Europe/Rome",
            "tags": ["Draft"],
            "text": "Back at the hotel, see dayone://view?entryId=CCC333"
        },
        {
            "uuid": "AAA111",
            "creationDate": "2022-09-21T08:30:00Z",
            "timeZone": "Europe/Rome",
            "starred": true,
            "tags": ["Vacation", "Road trip"],
            "text": "Arrived in #vacation mode.\n\n![](dayone-moment://PHOTO1)",
            "location": {
                "placeName": "Duomo",
                "localityName": "Milan",
                "administrativeArea": "Lombardy",
                "country": "Italy",
                "latitude": 45.4642,
                "longitude": 9.19
            },
            "photos": [{"identifier": "PHOTO1", "md5": "abc123", "type": "jpeg"}]
        }
    ]
}"#;

pub const WORK_JSON: &str = r#"{
    "metadata": {"version": "1.0"},
    "entries": [
        {
            "uuid": "CCC333",
            "creationDate": "2021-12-31T10:00:00Z",
            "text": "Year end. [trip](dayone://view?entryId=AAA111) and [lost](dayone://view?entryId=ZZZ999)"
        }
    ]
}"#;

/// Unzipped export with two journals and one photo
pub fn sample_export(root: &Path) {
    fs::create_dir_all(root.join("photos")).unwrap();
    fs::write(root.join("photos/abc123.jpeg"), b"jpeg bytes").unwrap();
    fs::write(root.join("Travel.json"), TRAVEL_JSON).unwrap();
    fs::write(root.join("Work.json"), WORK_JSON).unwrap();
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
}

/// Every file under `root`, relative path to content
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read(entry.path()).unwrap())
        })
        .collect()
}

/// Split a document into its front-matter mapping and the rest
pub fn front_matter(content: &str) -> (serde_yaml::Mapping, String) {
    let rest = content
        .strip_prefix("---\n")
        .expect("document should start with a front-matter fence");
    let end = rest.find("\n---\n").expect("front-matter should be closed");
    let mapping = serde_yaml::from_str(&rest[..end]).unwrap();
    (mapping, rest[end + 5..].to_string())
}

pub fn strings(value: &serde_yaml::Value) -> Vec<String> {
    value
        .as_sequence()
        .expect("expected a YAML list")
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}
