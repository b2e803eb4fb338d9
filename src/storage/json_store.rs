use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::types::TiltLog;

/// 持久化错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Mirrors the in-memory log to a single JSON file.
///
/// Every save rewrites the whole file; nothing is appended in place.
pub struct JsonLogStore {
    path: PathBuf,
    indent: Vec<u8>,
}

impl JsonLogStore {
    pub fn new<P: AsRef<Path>>(path: P, indent_width: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            indent: vec![b' '; indent_width],
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the log as indented JSON.
    pub fn render(&self, log: &TiltLog) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(&self.indent);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        log.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Overwrites the file with the full contents of `log`.
    pub fn save(&self, log: &TiltLog) -> Result<(), StoreError> {
        let bytes = self.render(log)?;

        let mut file = fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        file.write_all(&bytes).map_err(|e| self.io_error(e))?;

        debug!("Persisted {} entries to {}", log.len(), self.path.display());
        Ok(())
    }

    /// Reads a previously persisted log back.
    pub fn load(&self) -> Result<TiltLog, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{LogEntry, TiltAngles};

    /// Unique scratch path under the system temp directory.
    pub(crate) fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("obstacle-tilt-logger-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    fn sample_log() -> TiltLog {
        let mut log = TiltLog::new();
        log.append(LogEntry::new("Mon Jun  3 12:00:00 2024", TiltAngles::new(0.0, 0.0, 0.0)));
        log.append(LogEntry::new("Mon Jun  3 12:00:03 2024", TiltAngles::new(10.5, -4.25, 80.0)));
        log
    }

    #[test]
    fn renders_with_four_space_indent() {
        let store = JsonLogStore::new("unused.json", 4);
        let mut log = TiltLog::new();
        log.append(LogEntry::new("Thu Jan  1 00:00:00 1970", TiltAngles::new(1.0, 2.0, 3.0)));

        let text = String::from_utf8(store.render(&log).unwrap()).unwrap();
        let expected = "[\n    {\n        \"Thu Jan  1 00:00:00 1970\": [\n            1.0,\n            2.0,\n            3.0\n        ]\n    }\n]";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_log_renders_as_empty_array() {
        let store = JsonLogStore::new("unused.json", 4);
        let text = String::from_utf8(store.render(&TiltLog::new()).unwrap()).unwrap();
        assert_eq!(text, "[]");
    }

    #[test]
    fn save_then_load_reproduces_entries() {
        let path = scratch_path("round_trip.json");
        let store = JsonLogStore::new(&path, 4);
        let log = sample_log();

        store.save(&log).unwrap();
        let loaded = store.load().unwrap();

        assert!(loaded.same_as(&log));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let path = scratch_path("overwrite.json");
        let store = JsonLogStore::new(&path, 4);

        store.save(&sample_log()).unwrap();
        let mut shorter = TiltLog::new();
        shorter.append(LogEntry::new("only", TiltAngles::new(1.0, 1.0, 1.0)));
        store.save(&shorter).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries()[0].timestamp, "only");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let path = scratch_path("does_not_exist.json");
        let store = JsonLogStore::new(&path, 4);
        match store.load() {
            Err(StoreError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
