use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single reminder as stored and displayed.
///
/// Serialized as `{id, title, dateTime, notified}`; that record shape is the
/// durable format shared with every backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(rename = "dateTime", with = "local_datetime")]
    pub due_at: NaiveDateTime,
    #[serde(default)]
    pub notified: bool,
}

impl Reminder {
    pub fn new(id: impl Into<String>, title: impl Into<String>, due_at: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_at,
            notified: false,
        }
    }

    /// Whether the reminder should fire at `now` and has not fired yet.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        !self.notified && self.due_at <= now
    }
}

/// Local wall-clock timestamps in ISO-8601 form (`2024-01-01T15:00:00`).
///
/// Reading also accepts RFC 3339 values carrying an offset (`...Z`), which are
/// converted to the local clock.
pub mod local_datetime {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid dateTime '{raw}'")))
    }

    /// Parse a local or offset-qualified ISO-8601 timestamp.
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_reminder_wire_shape() {
        let reminder = Reminder::new("abc123", "comprar pão", at(15, 0));
        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["title"], "comprar pão");
        assert_eq!(json["dateTime"], "2024-01-01T15:00:00");
        assert_eq!(json["notified"], false);
        assert!(json.get("dueAt").is_none());
    }

    #[test]
    fn test_reminder_accepts_utc_timestamp() {
        let json = r#"{"id":"1","title":"x","dateTime":"2024-01-01T15:00:00.000Z","notified":true}"#;
        let reminder: Reminder = serde_json::from_str(json).unwrap();
        assert!(reminder.notified);
        let expected = chrono::DateTime::parse_from_rfc3339("2024-01-01T15:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Local)
            .naive_local();
        assert_eq!(reminder.due_at, expected);
    }

    #[test]
    fn test_reminder_rejects_garbage_timestamp() {
        let json = r#"{"id":"1","title":"x","dateTime":"amanhã","notified":false}"#;
        assert!(serde_json::from_str::<Reminder>(json).is_err());
    }

    #[test]
    fn test_is_due() {
        let mut reminder = Reminder::new("1", "x", at(10, 0));
        assert!(reminder.is_due(at(10, 0)));
        assert!(!reminder.is_due(at(9, 59)));
        reminder.notified = true;
        assert!(!reminder.is_due(at(11, 0)));
    }
}
