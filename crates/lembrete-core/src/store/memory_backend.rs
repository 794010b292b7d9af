use std::sync::Mutex;

use crate::error::StoreError;
use crate::types::Reminder;

use super::backend::ReminderBackend;

/// In-process backend, used for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryReminderBackend {
    reminders: Mutex<Vec<Reminder>>,
}

impl MemoryReminderBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reminders(reminders: Vec<Reminder>) -> Self {
        Self {
            reminders: Mutex::new(reminders),
        }
    }
}

impl ReminderBackend for MemoryReminderBackend {
    fn try_load(&self) -> Result<Vec<Reminder>, StoreError> {
        self.reminders
            .lock()
            .map(|r| r.clone())
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    fn save(&self, reminders: &[Reminder]) -> Result<(), StoreError> {
        let mut guard = self
            .reminders
            .lock()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        *guard = reminders.to_vec();
        Ok(())
    }
}
