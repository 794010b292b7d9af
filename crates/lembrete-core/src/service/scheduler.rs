//! Due-time delivery: per-reminder timers backed by a periodic sweep.
//!
//! Timers give prompt delivery while the process is alive but are lost on
//! restart and are only armed when notifications are available. The sweep
//! re-reads the store on a fixed interval and delivers anything due that was
//! never marked, so it is the path that guarantees delivery. Both paths go
//! through [`NotificationScheduler::notify_and_mark`], which re-checks the
//! `notified` flag under the store lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::channel::{speak_or_log, Notifier, Speaker};
use crate::types::Reminder;
use crate::util::Clock;

use super::SharedStore;

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Title used for every reminder notification.
pub const NOTIFICATION_TITLE: &str = "Lembrete";

#[derive(Clone)]
struct Delivery {
    store: SharedStore,
    notifier: Arc<dyn Notifier>,
    speaker: Arc<dyn Speaker>,
}

impl Delivery {
    async fn notify_and_mark(&self, id: &str) -> bool {
        let mut store = self.store.lock().await;
        let reminder = match store.get(id) {
            Some(r) if !r.notified => r,
            _ => return false,
        };

        if self.notifier.is_available() {
            if let Err(e) = self.notifier.show(NOTIFICATION_TITLE, &reminder.title) {
                warn!("Failed to show notification for {}: {}", id, e);
            }
            speak_or_log(
                self.speaker.as_ref(),
                &format!("{}: {}", NOTIFICATION_TITLE, reminder.title),
            );
        }

        match store.mark_notified(id) {
            Ok(marked) => {
                if marked {
                    info!("Notified reminder '{}' ({})", reminder.title, id);
                }
                marked
            }
            Err(e) => {
                warn!("Failed to mark reminder {} as notified: {}", id, e);
                false
            }
        }
    }
}

/// Arranges exactly-once notification of reminders at or after their due time.
pub struct NotificationScheduler {
    delivery: Delivery,
    timers: Arc<DashMap<String, AbortHandle>>,
    sweep_interval: Duration,
    timers_enabled: bool,
}

impl NotificationScheduler {
    pub fn new(store: SharedStore, notifier: Arc<dyn Notifier>, speaker: Arc<dyn Speaker>) -> Self {
        Self {
            delivery: Delivery {
                store,
                notifier,
                speaker,
            },
            timers: Arc::new(DashMap::new()),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            timers_enabled: true,
        }
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Enable or disable per-reminder timers. The sweep always runs.
    pub fn with_timers(mut self, enabled: bool) -> Self {
        self.timers_enabled = enabled;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.delivery.store
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.delivery.notifier
    }

    /// Number of armed timers.
    pub fn armed(&self) -> usize {
        self.timers.len()
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.timers.contains_key(id)
    }

    /// Arm a one-shot timer for `reminder`. Returns whether a timer was armed;
    /// past reminders, disabled timers and unavailable notifications are left
    /// to the sweep.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, reminder: &Reminder, now: NaiveDateTime) -> bool {
        if reminder.notified || reminder.due_at <= now {
            return false;
        }
        if !self.timers_enabled || !self.delivery.notifier.is_available() {
            debug!("Timer not armed for {}; sweep will deliver it", reminder.id);
            return false;
        }
        let delay = match (reminder.due_at - now).to_std() {
            Ok(d) => d,
            Err(_) => return false,
        };

        let id = reminder.id.clone();
        let delivery = self.delivery.clone();
        let timers = self.timers.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            timers.remove(&task_id);
            delivery.notify_and_mark(&task_id).await;
        });

        if let Some(previous) = self.timers.insert(id.clone(), handle.abort_handle()) {
            previous.abort();
        }
        debug!("Timer armed for {} in {:?}", id, delay);
        true
    }

    /// Cancel the timer for a reminder, if any.
    pub fn cancel(&self, id: &str) -> bool {
        match self.timers.remove(id) {
            Some((_, handle)) => {
                handle.abort();
                debug!("Timer cancelled for {}", id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        self.timers.retain(|_, handle| {
            handle.abort();
            false
        });
    }

    /// Re-arm timers for every pending reminder, e.g. after a restart.
    pub async fn arm_pending(&self, now: NaiveDateTime) -> usize {
        let pending: Vec<Reminder> = {
            let store = self.delivery.store.lock().await;
            store
                .list()
                .into_iter()
                .filter(|r| !r.notified && r.due_at > now)
                .collect()
        };
        pending.iter().filter(|r| self.schedule(r, now)).count()
    }

    /// Deliver every reminder due at `now` that has not been notified.
    /// Returns how many were delivered by this sweep.
    pub async fn sweep(&self, now: NaiveDateTime) -> usize {
        let due = {
            let store = self.delivery.store.lock().await;
            store.due_unnotified(now)
        };

        let mut delivered = 0;
        for reminder in due {
            if self.notify_and_mark(&reminder.id).await {
                delivered += 1;
            }
        }
        delivered
    }

    /// Notify and mark one reminder. A second call for the same reminder is a
    /// no-op returning `false`.
    pub async fn notify_and_mark(&self, id: &str) -> bool {
        self.delivery.notify_and_mark(id).await
    }

    /// Sweep on every interval tick (the first tick is immediate) until
    /// `shutdown` turns true or its sender is dropped.
    pub async fn run(&self, clock: Arc<dyn Clock>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Sweep loop started (every {:?})", self.sweep_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let delivered = self.sweep(clock.now()).await;
                    if delivered > 0 {
                        info!("Sweep: delivered {} reminder(s)", delivered);
                    } else {
                        debug!("Sweep: nothing due");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.cancel_all();
        info!("Sweep loop stopped");
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
