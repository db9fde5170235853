// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, warn};

use crate::TestId;

/// Completion cues posted by the hosted capture page. Payloads are never
/// parsed; only these substrings matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSignal {
    Alert,
    Complete,
    Finished,
}

impl CaptureSignal {
    pub const ALL: [Self; 3] = [Self::Alert, Self::Complete, Self::Finished];

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Complete => "complete",
            Self::Finished => "finished",
        }
    }

    pub fn detect(message: &str) -> Option<Self> {
        let lowered = message.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|signal| lowered.contains(signal.keyword()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    Loading,
    Ready,
    Finished(CaptureSignal),
    Failed(String),
}

pub fn capture_url(base: &str, test_id: TestId) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}test={test_id}")
}

/// One hand-off to the hosted capture page for a single test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSession {
    test_id: TestId,
    url: String,
    status: CaptureStatus,
}

impl CaptureSession {
    pub fn new(test_id: TestId, base_url: &str) -> Self {
        Self {
            test_id,
            url: capture_url(base_url, test_id),
            status: CaptureStatus::Loading,
        }
    }

    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, CaptureStatus::Finished(_))
    }

    pub fn on_loaded(&mut self) {
        if self.status == CaptureStatus::Loading {
            self.status = CaptureStatus::Ready;
        }
    }

    /// Returns the signal the first time a completion cue arrives; later
    /// messages and messages to a failed page are ignored.
    pub fn on_message(&mut self, raw: &str) -> Option<CaptureSignal> {
        if !matches!(self.status, CaptureStatus::Loading | CaptureStatus::Ready) {
            return None;
        }
        let signal = CaptureSignal::detect(raw)?;
        debug!(
            test = %self.test_id,
            keyword = signal.keyword(),
            "capture page signalled completion"
        );
        self.status = CaptureStatus::Finished(signal);
        Some(signal)
    }

    pub fn on_load_error(&mut self, reason: &str) {
        if self.is_finished() {
            return;
        }
        warn!(test = %self.test_id, url = %self.url, reason, "capture page failed to load");
        self.status = CaptureStatus::Failed(reason.to_owned());
    }

    pub fn retry(&mut self) -> bool {
        if matches!(self.status, CaptureStatus::Failed(_)) {
            self.status = CaptureStatus::Loading;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub test_id: TestId,
    pub score: f64,
    pub reps: u32,
    /// Form quality, 0-100.
    pub form: u8,
}

impl TestResult {
    /// Placeholder result reported when the capture page finishes; the page
    /// does not send scores back.
    pub fn simulated(test_id: TestId) -> Self {
        Self {
            test_id,
            score: 25.0,
            reps: 25,
            form: 85,
        }
    }

    pub fn percent_of_target(&self, target: f64) -> u32 {
        if target <= 0.0 {
            return 0;
        }
        (self.score / target * 100.0).round().max(0.0) as u32
    }
}
