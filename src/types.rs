use crate::config::AppConfig;
use crate::consts::DIAL_LOG_CAPACITY;
use crate::twilio_types::DialCallStatus;
use crate::voices::VoiceTable;

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One `/voice/after-dial` outcome, kept in memory for operator diagnostics.
/// The log resets on restart; that is fine for its purpose.
#[derive(Serialize, Clone, Debug)]
pub struct DialOutcome {
    pub call_sid: String,
    pub from: String,
    pub status: DialCallStatus,
    pub duration_secs: Option<u32>,
    pub at: String,
}

pub struct AppState {
    pub config: AppConfig,
    pub http_client: reqwest::Client,
    pub voices: VoiceTable,
    dial_log: Mutex<VecDeque<DialOutcome>>,
}

impl AppState {
    pub fn new(config: AppConfig, voices: VoiceTable) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            voices,
            dial_log: Mutex::new(VecDeque::with_capacity(DIAL_LOG_CAPACITY)),
        }
    }

    /// Append an outcome, evicting the oldest entry once the log is full.
    pub fn push_dial_outcome(&self, outcome: DialOutcome) {
        let mut log = self.dial_log.lock().unwrap();
        if log.len() == DIAL_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back(outcome);
    }

    /// Most recent outcomes, oldest first.
    pub fn dial_outcomes(&self) -> Vec<DialOutcome> {
        self.dial_log.lock().unwrap().iter().cloned().collect()
    }
}
