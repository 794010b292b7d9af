use std::fmt;
use std::io::Write;
use std::sync::Mutex;

use tracing::info;

use crate::error::ChannelError;

use super::{Notifier, Speaker};

type Output = Mutex<Box<dyn Write + Send>>;

fn write_line(out: &Output, line: fmt::Arguments<'_>) -> Result<(), ChannelError> {
    let mut out = out
        .lock()
        .map_err(|e| ChannelError::Delivery(e.to_string()))?;
    out.write_fmt(line)
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush())
        .map_err(|e| ChannelError::Delivery(e.to_string()))
}

/// Speaker that writes responses to stdout.
pub struct ConsoleSpeaker {
    enabled: bool,
    out: Output,
}

impl ConsoleSpeaker {
    pub fn new(enabled: bool) -> Self {
        Self::with_writer(enabled, Box::new(std::io::stdout()))
    }

    pub fn with_writer(enabled: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            enabled,
            out: Mutex::new(out),
        }
    }
}

impl Speaker for ConsoleSpeaker {
    fn speak(&self, text: &str) -> Result<(), ChannelError> {
        if !self.enabled {
            return Err(ChannelError::Unavailable("speech disabled".to_string()));
        }
        write_line(&self.out, format_args!("🗣  {}", text))
    }
}

/// Notifier that prints notifications to stdout and the log.
pub struct ConsoleNotifier {
    enabled: bool,
    out: Output,
}

impl ConsoleNotifier {
    pub fn new(enabled: bool) -> Self {
        Self::with_writer(enabled, Box::new(std::io::stdout()))
    }

    pub fn with_writer(enabled: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            enabled,
            out: Mutex::new(out),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn is_available(&self) -> bool {
        self.enabled
    }

    fn show(&self, title: &str, body: &str) -> Result<(), ChannelError> {
        if !self.enabled {
            return Err(ChannelError::Unavailable("notifications disabled".to_string()));
        }
        info!("Notification: {} - {}", title, body);
        write_line(&self.out, format_args!("🔔 {}: {}", title, body))
    }
}
