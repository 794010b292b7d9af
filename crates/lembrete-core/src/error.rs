/// Core error types for lembrete.
#[derive(Debug, thiserror::Error)]
pub enum LembreteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while interpreting an utterance.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Could not extract a reminder title")]
    EmptyTitle,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No reminders stored")]
    EmptyStore,

    #[error("Failed to read reminders: {0}")]
    Read(String),

    #[error("Failed to write reminders: {0}")]
    Write(String),
}

/// Failures reported by speech or notification collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, LembreteError>;
