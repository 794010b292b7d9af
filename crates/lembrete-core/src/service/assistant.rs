use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::channel::{speak_or_log, Speaker};
use crate::command::{self, Intent};
use crate::error::{Result, StoreError};
use crate::types::Reminder;
use crate::util::{format_clock, format_due, Clock};

use super::scheduler::NotificationScheduler;
use super::SharedStore;

// ====== Responses ======

pub const NOT_UNDERSTOOD: &str = "Não consegui entender o lembrete. Por favor, tente novamente.";
pub const NO_REMINDERS: &str = "Você não tem lembretes.";
pub const NOTHING_TO_DELETE: &str = "Você não tem lembretes para excluir.";
pub const REMINDER_DELETED: &str = "Lembrete excluído.";
pub const ALL_DELETED: &str = "Todos os lembretes foram excluídos";
pub const SAVE_FAILED: &str = "Não foi possível salvar as alterações. Tente novamente.";
pub const PERMISSION_PROMPT: &str =
    "Por favor, permita as notificações para ser avisado dos seus lembretes.";

pub fn help_text() -> String {
    [
        "Você pode dizer:",
        "- \"criar lembrete para comprar pão amanhã às 8\"",
        "- \"lembrar de ligar para a mãe sexta às 7 da noite\"",
        "- \"ver lembretes\" para ouvir seus lembretes",
        "- \"excluir lembrete\" para apagar o próximo lembrete",
        "- \"excluir todos\" para apagar todos os lembretes",
        "Se nenhum comando for reconhecido, a frase inteira vira um lembrete.",
    ]
    .join("\n")
}

fn created_text(reminder: &Reminder) -> String {
    format!(
        "Lembrete criado para {} - {}",
        format_clock(reminder.due_at),
        reminder.title
    )
}

fn count_text(count: usize) -> String {
    if count == 1 {
        "Você tem 1 lembrete.".to_string()
    } else {
        format!("Você tem {} lembretes.", count)
    }
}

/// Result of handling one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    /// Text spoken back to the user.
    pub text: String,
    /// Reminder created by this utterance, if any.
    pub created: Option<Reminder>,
}

impl Reply {
    fn text(intent: Intent, text: impl Into<String>) -> Self {
        Self {
            intent,
            text: text.into(),
            created: None,
        }
    }
}

// ====== Assistant ======

/// Executes voice commands against the reminder store and speaks the result.
pub struct Assistant {
    scheduler: Arc<NotificationScheduler>,
    speaker: Arc<dyn Speaker>,
    clock: Arc<dyn Clock>,
    permission_prompted: AtomicBool,
}

impl Assistant {
    pub fn new(
        scheduler: Arc<NotificationScheduler>,
        speaker: Arc<dyn Speaker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scheduler,
            speaker,
            clock,
            permission_prompted: AtomicBool::new(false),
        }
    }

    fn store(&self) -> &SharedStore {
        self.scheduler.store()
    }

    pub fn scheduler(&self) -> &Arc<NotificationScheduler> {
        &self.scheduler
    }

    /// Handle one recognized utterance: classify, execute, speak the reply.
    pub async fn handle(&self, utterance: &str) -> Reply {
        let text = command::normalize(utterance);
        let intent = command::classify(&text);
        info!("Utterance '{}' classified as {:?}", text, intent);

        let reply = match intent {
            Intent::CreateReminder | Intent::FallbackCreate => {
                let cmd = intent
                    .creation_command(&text)
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|| text.clone());
                self.create_reminder(intent, &cmd).await
            }
            Intent::ListReminders => self.list_reminders().await,
            Intent::DeleteAll => self.delete_all().await,
            Intent::DeleteEarliest => self.delete_earliest().await,
            Intent::ShowHelp => Reply::text(intent, help_text()),
        };

        speak_or_log(self.speaker.as_ref(), &reply.text);
        reply
    }

    async fn create_reminder(&self, intent: Intent, cmd: &str) -> Reply {
        let now = self.clock.now();
        let request = match command::parse_reminder(cmd, now) {
            Ok(r) => r,
            Err(e) => {
                info!("Rejected creation command '{}': {}", cmd, e);
                return Reply::text(intent, NOT_UNDERSTOOD);
            }
        };

        let created = {
            let mut store = self.store().lock().await;
            store.create(&request.title, request.due_at)
        };
        let reminder = match created {
            Ok(r) => r,
            Err(e) => {
                error!("Failed to save reminder '{}': {}", request.title, e);
                return Reply::text(intent, SAVE_FAILED);
            }
        };

        if !self.scheduler.schedule(&reminder, now) {
            self.prompt_for_permission();
        }

        Reply {
            intent,
            text: created_text(&reminder),
            created: Some(reminder),
        }
    }

    /// Ask once per session for notification permission when it is missing.
    fn prompt_for_permission(&self) {
        if self.scheduler.notifier().is_available() {
            return;
        }
        if !self.permission_prompted.swap(true, Ordering::SeqCst) {
            speak_or_log(self.speaker.as_ref(), PERMISSION_PROMPT);
        }
    }

    async fn list_reminders(&self) -> Reply {
        let reminders = self.store().lock().await.list();
        if reminders.is_empty() {
            return Reply::text(Intent::ListReminders, NO_REMINDERS);
        }

        let now = self.clock.now();
        let mut lines = vec![count_text(reminders.len())];
        lines.extend(
            reminders
                .iter()
                .map(|r| format!("{}, {}", r.title, format_due(r.due_at, now))),
        );
        Reply::text(Intent::ListReminders, lines.join("\n"))
    }

    async fn delete_all(&self) -> Reply {
        let result = self.store().lock().await.delete_all();
        self.scheduler.cancel_all();
        match result {
            Ok(()) => Reply::text(Intent::DeleteAll, ALL_DELETED),
            Err(e) => {
                error!("Failed to delete reminders: {}", e);
                Reply::text(Intent::DeleteAll, SAVE_FAILED)
            }
        }
    }

    async fn delete_earliest(&self) -> Reply {
        let result = self.store().lock().await.delete_earliest();
        match result {
            Ok(removed) => {
                self.scheduler.cancel(&removed.id);
                Reply::text(Intent::DeleteEarliest, REMINDER_DELETED)
            }
            Err(StoreError::EmptyStore) => Reply::text(Intent::DeleteEarliest, NOTHING_TO_DELETE),
            Err(e) => {
                error!("Failed to delete earliest reminder: {}", e);
                Reply::text(Intent::DeleteEarliest, SAVE_FAILED)
            }
        }
    }

    /// Delete one reminder by ID (the list view's delete button) and drop its timer.
    pub async fn delete_reminder(&self, id: &str) -> Result<bool> {
        let removed = self.store().lock().await.delete_by_id(id)?;
        self.scheduler.cancel(id);
        Ok(removed)
    }

    /// Current reminders, earliest due first.
    pub async fn reminders(&self) -> Vec<Reminder> {
        self.store().lock().await.list()
    }
}
