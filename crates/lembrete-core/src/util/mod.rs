use chrono::{Duration, NaiveDateTime};
use std::sync::Mutex;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Manually driven clock.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
            .lock()
            .map(|n| *n)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// `HH:MM`, as spoken in confirmations.
pub fn format_clock(dt: NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

/// Human-readable due date relative to `now`:
/// "Hoje às 14:30", "Amanhã às 14:30" or "01/01/2024 às 14:30".
pub fn format_due(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let time = format_clock(due);
    if due.date() == now.date() {
        format!("Hoje às {}", time)
    } else if Some(due.date()) == now.date().succ_opt() {
        format!("Amanhã às {}", time)
    } else {
        format!("{} às {}", due.format("%d/%m/%Y"), time)
    }
}
