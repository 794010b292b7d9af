pub mod intent;
pub mod time;
pub mod title;

use chrono::NaiveDateTime;

use crate::error::CommandError;

pub use intent::{classify, normalize, Intent};
pub use time::resolve;
pub use title::extract_title;

/// Title and due instant parsed from a creation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub title: String,
    pub due_at: NaiveDateTime,
}

/// Parse a creation command into a reminder request.
///
/// Fails with [`CommandError::EmptyTitle`] before any time resolution when
/// nothing usable is left for the title.
pub fn parse_reminder(command: &str, now: NaiveDateTime) -> Result<ReminderRequest, CommandError> {
    let title = extract_title(command)?;
    let due_at = resolve(command, now);
    Ok(ReminderRequest { title, due_at })
}
