use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::settings::project_dirs;

pub const KEY_PREFIX: &str = "column-selection-";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Column preference for '{table}' is not a JSON array of column names: {source}")]
    Malformed {
        table: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read column preference for '{table}': {source}")]
    Unreadable {
        table: String,
        #[source]
        source: io::Error,
    },
}

/// Column visibility per table, stored as a JSON array of column names
pub trait PreferenceStore {
    /// `None` when nothing was stored for the table
    fn load(&self, table: &str) -> Option<Result<Vec<String>, DecodeError>>;
    fn save(&mut self, table: &str, columns: &[String]) -> io::Result<()>;
    fn remove(&mut self, table: &str) -> io::Result<()>;
}

pub fn decode_columns(table: &str, raw: &str) -> Result<Vec<String>, DecodeError> {
    serde_json::from_str::<Vec<String>>(raw).map_err(|source| DecodeError::Malformed { table: table.to_string(), source })
}

#[derive(Default)]
pub struct MemoryPreferenceStore {
    entries: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn insert_raw(&mut self, table: &str, raw: &str) {
        self.entries.insert(table.to_string(), raw.to_string());
    }

    pub fn raw(&self, table: &str) -> Option<&str> {
        self.entries.get(table).map(String::as_str)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, table: &str) -> Option<Result<Vec<String>, DecodeError>> {
        self.entries.get(table).map(|raw| decode_columns(table, raw))
    }

    fn save(&mut self, table: &str, columns: &[String]) -> io::Result<()> {
        self.entries.insert(table.to_string(), serde_json::to_string(columns)?);
        Ok(())
    }

    fn remove(&mut self, table: &str) -> io::Result<()> {
        self.entries.remove(table);
        Ok(())
    }
}

/// Keeps `[A-Za-z0-9-]`, every other byte (`_` included) becomes `_XX`, so distinct tables never share a file
fn escape_file_name(table: &str) -> String {
    let mut escaped = String::with_capacity(table.len());
    for byte in table.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("_{byte:02X}"));
        }
    }
    escaped
}

/// One `column-selection-<table>.json` file per table
pub struct FilePreferenceStore {
    dir: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FilePreferenceStore { dir: dir.into() }
    }

    pub fn in_config_dir() -> Option<Self> {
        project_dirs().map(|dirs| Self::new(dirs.config_dir()))
    }

    fn path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{KEY_PREFIX}{}.json", escape_file_name(table)))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, table: &str) -> Option<Result<Vec<String>, DecodeError>> {
        match fs::read_to_string(self.path(table)) {
            Ok(raw) => Some(decode_columns(table, &raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => Some(Err(DecodeError::Unreadable { table: table.to_string(), source })),
        }
    }

    fn save(&mut self, table: &str, columns: &[String]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(table), serde_json::to_vec(columns)?)
    }

    fn remove(&mut self, table: &str) -> io::Result<()> {
        match fs::remove_file(self.path(table)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryPreferenceStore::default();
        assert!(store.load("donations").is_none());
        store.save("donations", &columns(&["id", "status"])).unwrap();
        assert_eq!(store.raw("donations"), Some(r#"["id","status"]"#));
        assert_eq!(store.load("donations").unwrap().unwrap(), columns(&["id", "status"]));
        store.remove("donations").unwrap();
        assert!(store.load("donations").is_none());
    }

    #[test]
    fn malformed_preference_is_a_decode_error() {
        let mut store = MemoryPreferenceStore::default();
        store.insert_raw("donations", "{not json");
        assert!(matches!(store.load("donations"), Some(Err(DecodeError::Malformed { .. }))));
        store.insert_raw("donations", r#"{"id": true}"#);
        assert!(matches!(store.load("donations"), Some(Err(DecodeError::Malformed { .. }))));
    }

    #[test]
    fn file_store_keys_by_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FilePreferenceStore::new(dir.path().join("prefs"));
        assert!(store.load("donations").is_none());

        store.save("donations", &columns(&["id", "created_at"])).unwrap();
        store.save("MatchingDonationLog", &columns(&["donorId"])).unwrap();
        assert!(dir.path().join("prefs/column-selection-donations.json").exists());
        assert_eq!(store.load("donations").unwrap().unwrap(), columns(&["id", "created_at"]));
        assert_eq!(store.load("MatchingDonationLog").unwrap().unwrap(), columns(&["donorId"]));

        store.remove("donations").unwrap();
        store.remove("donations").unwrap();
        assert!(store.load("donations").is_none());
    }

    #[test]
    fn file_store_reports_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("column-selection-donations.json"), "[1, 2").unwrap();
        let store = FilePreferenceStore::new(dir.path());
        assert!(matches!(store.load("donations"), Some(Err(DecodeError::Malformed { .. }))));
    }

    #[test]
    fn file_names_are_safe() {
        let store = FilePreferenceStore::new("/tmp/prefs");
        assert_eq!(store.path("../etc/passwd"), PathBuf::from("/tmp/prefs/column-selection-_2E_2E_2Fetc_2Fpasswd.json"));
        assert_eq!(store.path("donations"), PathBuf::from("/tmp/prefs/column-selection-donations.json"));
    }

    #[test]
    fn similar_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FilePreferenceStore::new(dir.path());
        assert_ne!(store.path("a.b"), store.path("a_b"));
        assert_ne!(store.path("a_2Eb"), store.path("a.b"));

        store.save("a.b", &columns(&["dot"])).unwrap();
        store.save("a_b", &columns(&["underscore"])).unwrap();
        assert_eq!(store.load("a.b").unwrap().unwrap(), columns(&["dot"]));
        assert_eq!(store.load("a_b").unwrap().unwrap(), columns(&["underscore"]));
    }
}
