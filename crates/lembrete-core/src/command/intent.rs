//! Keyword-based intent classification.

use std::borrow::Cow;

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CreateReminder,
    ListReminders,
    DeleteAll,
    /// Delete the reminder that is due first.
    DeleteEarliest,
    ShowHelp,
    /// Nothing matched: the whole utterance becomes a reminder.
    FallbackCreate,
}

/// Prefix used to reinterpret an unmatched utterance as a creation command.
pub const FALLBACK_PREFIX: &str = "criar lembrete para ";

/// Keyword groups in precedence order. The first group with any keyword
/// contained in the utterance decides the intent; `FallbackCreate` applies
/// when none match.
pub const INTENT_TABLE: &[(&[&str], Intent)] = &[
    (
        &["criar lembrete", "novo lembrete", "lembrar de"],
        Intent::CreateReminder,
    ),
    (
        &["mostrar lembretes", "ver lembretes", "listar lembretes"],
        Intent::ListReminders,
    ),
    (&["excluir todos", "deletar todos"], Intent::DeleteAll),
    (&["excluir lembrete", "deletar lembrete"], Intent::DeleteEarliest),
    (&["ajuda", "como usar"], Intent::ShowHelp),
];

/// Lower-case and trim a raw transcript.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Classify an already normalized utterance.
pub fn classify(text: &str) -> Intent {
    INTENT_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::FallbackCreate)
}

impl Intent {
    /// The command text handed to title/time extraction, if this intent
    /// creates a reminder.
    pub fn creation_command(self, text: &str) -> Option<Cow<'_, str>> {
        match self {
            Intent::CreateReminder => Some(Cow::Borrowed(text)),
            Intent::FallbackCreate => Some(Cow::Owned(format!("{FALLBACK_PREFIX}{text}"))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_group() {
        assert_eq!(classify("criar lembrete para ligar"), Intent::CreateReminder);
        assert_eq!(classify("novo lembrete reunião"), Intent::CreateReminder);
        assert_eq!(classify("lembrar de pagar a conta"), Intent::CreateReminder);
        assert_eq!(classify("ver lembretes"), Intent::ListReminders);
        assert_eq!(classify("mostrar lembretes por favor"), Intent::ListReminders);
        assert_eq!(classify("excluir todos"), Intent::DeleteAll);
        assert_eq!(classify("deletar lembrete"), Intent::DeleteEarliest);
        assert_eq!(classify("ajuda"), Intent::ShowHelp);
        assert_eq!(classify("como usar isso"), Intent::ShowHelp);
    }

    #[test]
    fn test_classify_fallback() {
        assert_eq!(classify("comprar leite"), Intent::FallbackCreate);
        assert_eq!(classify(""), Intent::FallbackCreate);
    }

    #[test]
    fn test_classify_precedence() {
        // Creation wins over help even when both keywords appear
        assert_eq!(classify("criar lembrete ajuda"), Intent::CreateReminder);
        // "excluir todos" is checked before "excluir lembrete"
        assert_eq!(classify("excluir todos os lembretes"), Intent::DeleteAll);
        assert_eq!(classify("excluir lembrete e excluir todos"), Intent::DeleteAll);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Ver Lembretes \n"), "ver lembretes");
        assert_eq!(normalize("AMANHÃ"), "amanhã");
    }

    #[test]
    fn test_creation_command() {
        assert_eq!(
            Intent::FallbackCreate.creation_command("comprar leite").as_deref(),
            Some("criar lembrete para comprar leite")
        );
        assert_eq!(
            Intent::CreateReminder.creation_command("novo lembrete x").as_deref(),
            Some("novo lembrete x")
        );
        assert!(Intent::ListReminders.creation_command("ver lembretes").is_none());
        assert!(Intent::ShowHelp.creation_command("ajuda").is_none());
    }
}
