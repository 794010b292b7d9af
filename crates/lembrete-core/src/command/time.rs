//! Resolution of Portuguese temporal phrases into a concrete due instant.
//!
//! Rules are applied in a fixed order and each one only overrides the part
//! it understands:
//!
//! 1. default: `now` truncated to the minute, plus one hour;
//! 2. clock time (`às 15`, `às 7:30 da noite`) sets the time of day;
//! 3. relative day (`depois de amanhã`, `amanhã`, `próxima semana`) sets the date;
//! 4. weekday (`sexta`, `terça-feira`) sets the date to its next occurrence.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)às (\d{1,2})(?::(\d{1,2}))?\s*(horas?|da tarde|da noite|da manhã)?").unwrap()
});

/// Relative-day phrases and their offsets in days. Longer phrases come first
/// so "depois de amanhã" is never read as "amanhã".
pub const RELATIVE_DAYS: &[(&str, i64)] = &[
    ("depois de amanhã", 2),
    ("amanhã", 1),
    ("próxima semana", 7),
    ("proxima semana", 7),
];

/// Weekday names keyed by days from Sunday. When several weekdays are
/// mentioned, the first row that matches wins.
pub const WEEKDAYS: &[(&[&str], u32)] = &[
    (&["domingo", "dom"], 0),
    (&["segunda", "segunda-feira", "seg"], 1),
    (&["terça", "terça-feira", "ter"], 2),
    (&["quarta", "quarta-feira", "qua"], 3),
    (&["quinta", "quinta-feira", "qui"], 4),
    (&["sexta", "sexta-feira", "sex"], 5),
    (&["sábado", "sabado", "sab"], 6),
];

/// Resolve the due instant for `command`, relative to `now`.
pub fn resolve(command: &str, now: NaiveDateTime) -> NaiveDateTime {
    let mut due = truncate_to_minute(now) + Duration::hours(1);

    if let Some(time) = clock_time(command) {
        let mut candidate = now.date().and_time(time);
        if candidate <= now {
            candidate += Duration::days(1);
        }
        due = candidate;
    }

    if let Some(days) = relative_day_offset(command) {
        due = (now.date() + Duration::days(days)).and_time(due.time());
    }

    if let Some(target) = weekday(command) {
        let current = now.weekday().num_days_from_sunday() as i64;
        let mut days = target as i64 - current;
        if days <= 0 {
            days += 7;
        }
        due = (now.date() + Duration::days(days)).and_time(due.time());
    }

    due
}

fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Time of day named by an `às <h>[:<m>]` cue, with "tarde"/"noite" moving
/// morning hours into the afternoon. Out-of-range values yield `None`.
pub fn clock_time(command: &str) -> Option<NaiveTime> {
    let caps = CLOCK_TIME.captures(command)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    let afternoon = caps
        .get(3)
        .map(|q| {
            let q = q.as_str().to_lowercase();
            q.contains("tarde") || q.contains("noite")
        })
        .unwrap_or(false);
    if afternoon && hour < 12 {
        hour += 12;
    }

    let time = NaiveTime::from_hms_opt(hour, minute, 0);
    if time.is_none() {
        tracing::debug!("Ignoring out-of-range clock time {}:{:02}", hour, minute);
    }
    time
}

/// Day offset for the first relative-day phrase present.
pub fn relative_day_offset(command: &str) -> Option<i64> {
    RELATIVE_DAYS
        .iter()
        .find(|(phrase, _)| command.contains(phrase))
        .map(|(_, days)| *days)
}

/// Days-from-Sunday index of the first weekday row with a name in `command`.
pub fn weekday(command: &str) -> Option<u32> {
    WEEKDAYS
        .iter()
        .find(|(names, _)| names.iter().any(|name| contains_word(command, name)))
        .map(|(_, day)| *day)
}

/// Whether `word` occurs in `text` delimited by non-alphanumeric characters.
fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(idx, _)| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + word.len()..].chars().next();
        before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
    })
}
