#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use lembrete_core::channel::{Notifier, Speaker};
use lembrete_core::error::ChannelError;

/// Speaker that records everything it is asked to say.
#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn said(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<(), ChannelError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Notifier with a switchable permission flag that records what it shows.
pub struct RecordingNotifier {
    pub available: AtomicBool,
    pub shown: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn show(&self, title: &str, body: &str) -> Result<(), ChannelError> {
        if !self.is_available() {
            return Err(ChannelError::Unavailable("permission denied".to_string()));
        }
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn recorders(available: bool) -> (Arc<RecordingNotifier>, Arc<RecordingSpeaker>) {
    (
        Arc::new(RecordingNotifier::new(available)),
        Arc::new(RecordingSpeaker::default()),
    )
}

/// 2024-01-03 is a Wednesday.
pub fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}
