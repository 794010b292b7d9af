use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

use crate::error::StoreError;
use crate::types::Reminder;

use super::backend::ReminderBackend;

/// JSON file backend: the whole collection lives in one array.
pub struct FileReminderBackend {
    path: PathBuf,
}

impl FileReminderBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

/// Decode an array of reminder records, dropping the ones that do not parse.
/// Content that is not a JSON array at all is a read error.
pub fn decode_records(content: &str) -> Result<Vec<Reminder>, StoreError> {
    let values = serde_json::from_str::<Vec<serde_json::Value>>(content)
        .map_err(|e| StoreError::Read(format!("not a JSON array: {}", e)))?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<Reminder>(value) {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                warn!("Skipping malformed reminder record #{}: {}", idx, e);
                None
            }
        })
        .collect())
}

impl ReminderBackend for FileReminderBackend {
    fn try_load(&self) -> Result<Vec<Reminder>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path)
            .map_err(|e| StoreError::Read(format!("{}: {}", self.path.display(), e)))?;
        // Invalid UTF-8 damages only the records it appears in
        let content = String::from_utf8_lossy(&bytes);
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode_records(&content)
    }

    fn save(&self, reminders: &[Reminder]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Write(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(reminders).map_err(|e| StoreError::Write(e.to_string()))?;

        // Write to a sibling temp file, then rename over the store
        let temp_path = self.temp_path();
        let mut file =
            std::fs::File::create(&temp_path).map_err(|e| StoreError::Write(e.to_string()))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::Write(e.to_string()))?;
        drop(file);

        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            StoreError::Write(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })
    }
}
