pub mod console;

use crate::error::ChannelError;

pub use console::{ConsoleNotifier, ConsoleSpeaker};

/// Speech synthesis collaborator: says a plain response string aloud.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), ChannelError>;
}

/// Notification delivery collaborator.
pub trait Notifier: Send + Sync {
    /// Whether notifications are supported and permitted right now.
    fn is_available(&self) -> bool;

    /// Show a notification. Callers check [`Notifier::is_available`] first.
    fn show(&self, title: &str, body: &str) -> Result<(), ChannelError>;
}

/// Speak `text`, logging instead of failing when speech is unavailable.
pub fn speak_or_log(speaker: &dyn Speaker, text: &str) {
    if let Err(e) = speaker.speak(text) {
        tracing::debug!("Speech skipped: {}", e);
    }
}
