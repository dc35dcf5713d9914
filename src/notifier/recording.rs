use std::sync::{Arc, Mutex};

use crate::notifier::interface;

/// Notifier that records alerts and answers every confirmation with a
/// preset value. Clones share the same log.
#[derive(Clone)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
    confirms: Arc<Mutex<Vec<String>>>,
    answer: bool,
}

impl RecordingNotifier {
    pub fn new(answer: bool) -> Self {
        RecordingNotifier {
            alerts: Arc::new(Mutex::new(Vec::new())),
            confirms: Arc::new(Mutex::new(Vec::new())),
            answer,
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn last_alert(&self) -> Option<String> {
        self.alerts().pop()
    }
}

#[async_trait::async_trait]
impl interface::Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }

    async fn confirm(&self, message: &str) -> bool {
        if let Ok(mut confirms) = self.confirms.lock() {
            confirms.push(message.to_string());
        }
        self.answer
    }
}
