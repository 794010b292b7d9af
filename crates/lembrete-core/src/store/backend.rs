use tracing::warn;

use crate::error::StoreError;
use crate::types::Reminder;

/// Trait for reminder persistence backends.
///
/// Backends hold the full collection and are the single source of truth:
/// every store operation loads, modifies and saves the whole sequence.
pub trait ReminderBackend: Send + Sync {
    /// Load every reminder. Records that cannot be parsed are skipped; a
    /// store that cannot be read at all is an error.
    fn try_load(&self) -> Result<Vec<Reminder>, StoreError>;

    /// Like [`ReminderBackend::try_load`], degrading to an empty collection.
    /// Only for read paths: never save what this returned after a failure.
    fn load(&self) -> Vec<Reminder> {
        self.try_load().unwrap_or_else(|e| {
            warn!("Failed to load reminders: {}", e);
            Vec::new()
        })
    }

    /// Replace the stored collection atomically.
    fn save(&self, reminders: &[Reminder]) -> Result<(), StoreError>;
}
