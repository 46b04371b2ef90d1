//! Loading records and rosters from JSON files.
//!
//! Records are a JSON array of `{"id": ..., "name": ...}` objects (extra
//! fields such as `department` are ignored). A roster is either an array of
//! strings or the `teachers_data.json` shape, `[{"teacherName": ...}]`.
//!
//! Any malformed element fails the whole load; there is no partial result.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::dedup::NameRecord;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid input at `{at}`")]
    Json {
        /// JSON path of the offending element, e.g. `[3].name`.
        at: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterEntry {
    Name(String),
    Teacher {
        #[serde(rename = "teacherName")]
        teacher_name: String,
    },
}

impl From<RosterEntry> for String {
    fn from(entry: RosterEntry) -> Self {
        match entry {
            RosterEntry::Name(name) => name,
            RosterEntry::Teacher { teacher_name } => teacher_name,
        }
    }
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(de).map_err(|err| LoadError::Json {
        at: err.path().to_string(),
        source: err.into_inner(),
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a JSON array of records.
pub fn parse_records(json: &str) -> Result<Vec<NameRecord>, LoadError> {
    parse_json(json)
}

/// Parse a roster in either supported shape.
pub fn parse_roster(json: &str) -> Result<Vec<String>, LoadError> {
    let entries: Vec<RosterEntry> = parse_json(json)?;
    Ok(entries.into_iter().map(String::from).collect())
}

pub fn read_records(path: &Path) -> Result<Vec<NameRecord>, LoadError> {
    parse_records(&read(path)?)
}

pub fn read_roster(path: &Path) -> Result<Vec<String>, LoadError> {
    parse_roster(&read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::RecordId;

    #[test]
    fn records_with_string_and_integer_ids() {
        let records = parse_records(
            r#"[
                {"id": "6f1c0a52-1d7e-4bb4-9d8e-0f6a3a3c2b11", "name": "John Smith", "department": "CS"},
                {"id": 2, "name": "Jon Smith"}
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, RecordId::from(2));
        assert_eq!(records[0].name, "John Smith");
    }

    #[test]
    fn non_string_name_reports_path() {
        let err = parse_records(r#"[{"id": 1, "name": "A"}, {"id": 2, "name": 7}]"#).unwrap_err();
        match err {
            LoadError::Json { at, .. } => assert_eq!(at, "[1].name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_name_is_rejected() {
        assert!(parse_records(r#"[{"id": 1, "name": null}]"#).is_err());
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = parse_records(r#"[{"name": "John Smith"}]"#).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn roster_plain_strings() {
        let roster = parse_roster(r#"["John Smith", "Aitbayeva Asel"]"#).unwrap();
        assert_eq!(roster, vec!["John Smith", "Aitbayeva Asel"]);
    }

    #[test]
    fn roster_teacher_objects() {
        let roster = parse_roster(
            r#"[
                {"teacherName": "Aitbayeva Asel", "disciplines": ["Chinese"], "groups": ["SE-2301"]},
                {"teacherName": "John Smith"}
            ]"#,
        )
        .unwrap();
        assert_eq!(roster, vec!["Aitbayeva Asel", "John Smith"]);
    }

    #[test]
    fn roster_rejects_unknown_shape() {
        assert!(parse_roster(r#"[{"name": "John Smith"}]"#).is_err());
    }

    #[test]
    fn missing_file() {
        let err = read_records(Path::new("/nonexistent/records.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
