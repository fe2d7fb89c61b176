//! Whole-collection persistence for the annotation store.
//!
//! The stored value is a single JSON array of annotation records under one
//! fixed key. Loading is lenient: an absent, unreadable or non-array value
//! means "no annotations", and individual records that fail to decode are
//! skipped.
//!
//! ```text
//! <data_dir>/
//! └── bodymap_front_marks_v1.json   # [ {session, regionId, layer, ...}, ... ]
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::annotation::Annotation;
use crate::error::BodyMapResult;

/// Storage key of the annotation collection.
pub const STORAGE_KEY: &str = "bodymap_front_marks_v1";

/// Key-value persistence for the annotation collection.
pub trait AnnotationPersistence {
    /// Read the stored collection. `None` when nothing usable is stored.
    fn load(&self) -> Option<Vec<Annotation>>;

    /// Replace the stored collection.
    fn save(&mut self, annotations: &[Annotation]) -> BodyMapResult<()>;
}

/// Decode a stored value, discarding anything that is not an array of records.
pub fn decode_annotations(raw: &str) -> Option<Vec<Annotation>> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "Discarding unreadable annotation data");
            return None;
        }
    };

    let Value::Array(items) = value else {
        warn!("Discarding annotation data that is not an array");
        return None;
    };

    let total = items.len();
    let records: Vec<Annotation> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if records.len() < total {
        warn!(
            skipped = total - records.len(),
            kept = records.len(),
            "Skipped malformed annotation records"
        );
    }

    Some(records)
}

/// JSON file in a data directory, named after [`STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store inside `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().join(format!("{STORAGE_KEY}.json"));
        Self { path }
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl AnnotationPersistence for JsonFileStore {
    fn load(&self) -> Option<Vec<Annotation>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No annotation file yet");
            return None;
        }

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to read annotation file");
                return None;
            }
        };

        let records = decode_annotations(&raw)?;
        info!(path = %self.path.display(), count = records.len(), "Loaded annotations");
        Some(records)
    }

    fn save(&mut self, annotations: &[Annotation]) -> BodyMapResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                debug!(path = %parent.display(), "Created data directory");
            }
        }

        // Whole-collection replace via rename so readers never see a partial file.
        let json = serde_json::to_string_pretty(annotations)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), count = annotations.len(), "Saved annotations");
        Ok(())
    }
}

/// In-memory stand-in for browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw stored value, well-formed or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl AnnotationPersistence for MemoryStore {
    fn load(&self) -> Option<Vec<Annotation>> {
        decode_annotations(self.raw.as_deref()?)
    }

    fn save(&mut self, annotations: &[Annotation]) -> BodyMapResult<()> {
        self.raw = Some(serde_json::to_string(annotations)?);
        Ok(())
    }
}
