//! Geometry persistence.
//!
//! One JSON object per application at `{data_dir}/window-bounds.json`:
//! `{"x": 120, "y": 80, "width": 1000, "height": 700}`.
//!
//! Reads and writes fail soft. `load()` turns every failure into `None`,
//! `save()` logs and drops write errors. The `try_*` variants keep the
//! error kind for callers (and tests) that care why.

use super::types::GeometryRecord;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No saved geometry at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed geometry record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Geometry record is not a JSON object")]
    NotAnObject,

    #[error("Geometry record has non-positive size {width}x{height}")]
    InvalidShape { width: i32, height: i32 },
}

/// Durable storage for the single window geometry record.
pub trait GeometryStore: Send + Sync {
    fn try_load(&self) -> Result<GeometryRecord, StoreError>;

    fn try_save(&self, record: &GeometryRecord) -> Result<(), StoreError>;

    /// Saved record, or `None` if it is missing or unusable for any reason.
    fn load(&self) -> Option<GeometryRecord> {
        match self.try_load() {
            Ok(record) => Some(record),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => {
                log::warn!("[GEOMETRY] Ignoring saved bounds: {}", e);
                None
            }
        }
    }

    /// Overwrite the saved record. Errors are logged, never returned.
    fn save(&self, record: &GeometryRecord) {
        if let Err(e) = self.try_save(record) {
            log::warn!("[GEOMETRY] Failed to save bounds: {}", e);
        }
    }
}

/// File-backed store.
#[derive(Debug, Clone)]
pub struct FileGeometryStore {
    path: PathBuf,
}

impl FileGeometryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeometryStore for FileGeometryStore {
    fn try_load(&self) -> Result<GeometryRecord, StoreError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io {
                path: self.path.clone(),
                source: e,
            },
        })?;
        parse_record(&raw)
    }

    fn try_save(&self, record: &GeometryRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string(record)?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        log::debug!(
            "[GEOMETRY] Saved bounds {}x{} at {},{}",
            record.width,
            record.height,
            record.x,
            record.y
        );
        Ok(())
    }
}

/// Parse and shape-check a persisted record.
///
/// Missing or non-integer fields are rejected by serde; a torn write shows
/// up as a JSON syntax error. Only the object form is accepted.
pub fn parse_record(raw: &str) -> Result<GeometryRecord, StoreError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(StoreError::NotAnObject);
    }
    let record: GeometryRecord = serde_json::from_value(value)?;
    if !record.is_well_formed() {
        return Err(StoreError::InvalidShape {
            width: record.width,
            height: record.height,
        });
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileGeometryStore {
        FileGeometryStore::new(dir.path().join("window-bounds.json"))
    }

    #[test]
    fn never_written_store_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_none());
        assert!(matches!(store.try_load(), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn save_then_load_returns_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let record = GeometryRecord::new(-1600, 24, 1280, 800);

        store.save(&record);
        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&GeometryRecord::new(0, 0, 640, 480));
        store.save(&GeometryRecord::new(10, 20, 800, 600));
        assert_eq!(store.load(), Some(GeometryRecord::new(10, 20, 800, 600)));
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGeometryStore::new(dir.path().join("nested/app/window-bounds.json"));
        store.try_save(&GeometryRecord::new(1, 2, 3, 4)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn truncated_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"x": 10, "y": 20, "wid"#).unwrap();
        assert!(matches!(store.try_load(), Err(StoreError::Malformed(_))));
        assert!(store.load().is_none());
    }

    #[test]
    fn shape_mismatches_load_as_none() {
        let payloads = [
            r#"{"x": 0, "y": 0, "width": -5, "height": 100}"#,
            r#"{"x": 0, "y": 0, "width": 100, "height": 0}"#,
            r#"{"x": 0, "y": 0, "width": 100}"#,
            r#"{"x": "left", "y": 0, "width": 100, "height": 100}"#,
            r#"{"x": 0.5, "y": 0, "width": 100, "height": 100}"#,
            r#"[0, 0, 100, 100]"#,
            "null",
            "",
        ];
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        for payload in payloads {
            std::fs::write(store.path(), payload).unwrap();
            assert!(store.load().is_none(), "payload should be rejected: {}", payload);
        }
    }

    #[test]
    fn non_positive_size_reports_invalid_shape() {
        let err = parse_record(r#"{"x": 0, "y": 0, "width": -5, "height": 100}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidShape { width: -5, height: 100 }));
    }

    #[test]
    fn array_form_is_rejected() {
        assert!(matches!(
            parse_record("[0, 0, 100, 100]"),
            Err(StoreError::NotAnObject)
        ));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record =
            parse_record(r#"{"x": 5, "y": 6, "width": 7, "height": 8, "maximized": true}"#)
                .unwrap();
        assert_eq!(record, GeometryRecord::new(5, 6, 7, 8));
    }

    #[test]
    fn write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // The target path is an existing directory, so the write must fail.
        let store = FileGeometryStore::new(dir.path());
        assert!(matches!(
            store.try_save(&GeometryRecord::new(0, 0, 10, 10)),
            Err(StoreError::Io { .. })
        ));
        store.save(&GeometryRecord::new(0, 0, 10, 10));
    }
}
