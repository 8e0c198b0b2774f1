use chrono::{DateTime, Utc};

use crate::ledger::Ledger;

/// Wall-clock timer for one play session of a title.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    id: u64,
    label: String,
    started_at: DateTime<Utc>,
}

impl SessionTimer {
    pub fn start(id: u64, label: impl Into<String>) -> Self {
        Self::start_at(id, label, Utc::now())
    }

    pub fn start_at(id: u64, label: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            label: label.into(),
            started_at,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Milliseconds since start; zero if the clock moved backwards.
    pub fn elapsed_ms_at(&self, now: DateTime<Utc>) -> u64 {
        let elapsed = (now - self.started_at).num_milliseconds();
        u64::try_from(elapsed).unwrap_or(0)
    }

    /// Ends the session and adds it to the ledger. Returns the recorded length.
    pub fn finish(self, ledger: &Ledger) -> u64 {
        self.finish_at(ledger, Utc::now())
    }

    pub fn finish_at(self, ledger: &Ledger, now: DateTime<Utc>) -> u64 {
        let elapsed = self.elapsed_ms_at(now);
        ledger.accumulate(self.id, &self.label, elapsed);
        elapsed
    }
}
