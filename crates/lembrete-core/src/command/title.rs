//! Reminder title extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CommandError;

/// Connectors tried in order; the title is whatever follows the first
/// occurrence of the first connector present.
pub const TITLE_CONNECTORS: &[&str] = &["para", "de", "sobre"];

/// Trigger phrases removed when no connector is present.
pub const TRIGGER_PHRASES: &[&str] = &["criar lembrete", "novo lembrete", "lembrar"];

/// Date/time tails that leak into the title, stripped in this order.
pub const TRAILING_CUES: &[&str] = &[
    "amanhã", "hoje", "às", "as", "da manhã", "da tarde", "da noite",
];

static TRAILING_CONNECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s(em|no|na|para|de|do|da)\s*$").unwrap());

/// Extract a clean reminder title from a creation command.
pub fn extract_title(command: &str) -> Result<String, CommandError> {
    let mut title = after_connector(command)
        .map(str::to_string)
        .unwrap_or_else(|| strip_triggers(command));
    title = title.trim().to_string();

    for cue in TRAILING_CUES {
        if let Some(idx) = rfind_token(&title, cue) {
            title = title[..idx].trim().to_string();
        }
    }

    let title = TRAILING_CONNECTOR.replace(&title, "").trim().to_string();
    if title.is_empty() {
        return Err(CommandError::EmptyTitle);
    }
    Ok(title)
}

fn after_connector(command: &str) -> Option<&str> {
    TITLE_CONNECTORS.iter().find_map(|connector| {
        command
            .find(connector)
            .map(|idx| &command[idx + connector.len()..])
    })
}

fn strip_triggers(command: &str) -> String {
    TRIGGER_PHRASES
        .iter()
        .fold(command.to_string(), |acc, phrase| acc.replacen(phrase, "", 1))
}

/// Byte offset of the last ` <token>` occurrence that ends on a word boundary.
fn rfind_token(text: &str, token: &str) -> Option<usize> {
    let needle = format!(" {token}");
    text.match_indices(&needle)
        .filter(|(idx, _)| {
            text[idx + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
        })
        .map(|(idx, _)| idx)
        .last()
}
