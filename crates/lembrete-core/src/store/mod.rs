pub mod backend;
pub mod memory_backend;

#[cfg(feature = "file-backend")]
pub mod file_backend;

use chrono::{NaiveDateTime, Timelike};
use tracing::info;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::Reminder;

pub use backend::ReminderBackend;
pub use memory_backend::MemoryReminderBackend;

#[cfg(feature = "file-backend")]
pub use file_backend::FileReminderBackend;

/// Reminder collection on top of a persistence backend.
///
/// Nothing is cached: each call loads the collection, and each mutation
/// saves the complete updated collection. Mutations fail with
/// [`StoreError::Read`] rather than overwrite a store they could not read.
/// Callers sharing a store across tasks must hold it behind a single lock.
pub struct ReminderStore {
    backend: Box<dyn ReminderBackend>,
}

impl ReminderStore {
    pub fn new(backend: Box<dyn ReminderBackend>) -> Self {
        Self { backend }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryReminderBackend::new()))
    }

    fn generate_id(existing: &[Reminder]) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string()[..8].to_string();
            if !existing.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    /// Add a new reminder due at `due_at` (truncated to whole seconds).
    pub fn create(&mut self, title: &str, due_at: NaiveDateTime) -> Result<Reminder, StoreError> {
        let mut reminders = self.backend.try_load()?;
        let due_at = due_at.with_nanosecond(0).unwrap_or(due_at);
        let reminder = Reminder::new(Self::generate_id(&reminders), title, due_at);

        reminders.push(reminder.clone());
        self.backend.save(&reminders)?;
        info!("Reminders: added '{}' ({}) due {}", reminder.title, reminder.id, reminder.due_at);
        Ok(reminder)
    }

    /// All reminders, earliest due first.
    pub fn list(&self) -> Vec<Reminder> {
        let mut reminders = self.backend.load();
        reminders.sort_by_key(|r| r.due_at);
        reminders
    }

    pub fn get(&self, id: &str) -> Option<Reminder> {
        self.backend.load().into_iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.backend.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a reminder by ID. Returns whether anything was removed.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut reminders = self.backend.try_load()?;
        let before = reminders.len();
        reminders.retain(|r| r.id != id);
        if reminders.len() == before {
            return Ok(false);
        }
        self.backend.save(&reminders)?;
        info!("Reminders: removed {}", id);
        Ok(true)
    }

    pub fn delete_all(&mut self) -> Result<(), StoreError> {
        self.backend.save(&[])?;
        info!("Reminders: removed all");
        Ok(())
    }

    /// Remove the reminder that is due first (not the most recently created).
    pub fn delete_earliest(&mut self) -> Result<Reminder, StoreError> {
        let mut reminders = self.backend.try_load()?;
        reminders.sort_by_key(|r| r.due_at);
        if reminders.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        let earliest = reminders.remove(0);
        self.backend.save(&reminders)?;
        info!("Reminders: removed earliest '{}' ({})", earliest.title, earliest.id);
        Ok(earliest)
    }

    /// Flag a reminder as notified. Returns `false` when it is unknown or was
    /// already notified, in which case nothing is written.
    pub fn mark_notified(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut reminders = self.backend.try_load()?;
        let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        if reminder.notified {
            return Ok(false);
        }
        reminder.notified = true;
        self.backend.save(&reminders)?;
        Ok(true)
    }

    /// Reminders that are due at `now` and have not been notified, earliest first.
    pub fn due_unnotified(&self, now: NaiveDateTime) -> Vec<Reminder> {
        self.list().into_iter().filter(|r| r.is_due(now)).collect()
    }
}
