//! Scripted "analysis" animation.
//!
//! Nothing is analysed. The loader is a fixed-length progress bar with a
//! rotating status label and a rotating fact card; this module projects its
//! visible state from the time elapsed since the analysis step began.

use serde::{Deserialize, Serialize};

/// Default "Did you know?" rotation.
pub const DEFAULT_FACT_INTERVAL_MS: u64 = 4_000;

/// Length of the scripted loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisTiming {
    /// Time for the progress bar to reach 100%.
    pub duration_ms: u64,
    /// Pause between 100% and completion.
    pub settle_ms: u64,
    pub fact_interval_ms: u64,
}

impl AnalysisTiming {
    /// Progress-bar loader of the chat flow: 8 s plus a 400 ms settle.
    pub fn chat() -> Self {
        Self {
            duration_ms: 8_000,
            settle_ms: 400,
            fact_interval_ms: DEFAULT_FACT_INTERVAL_MS,
        }
    }

    /// Row-by-row checklist loader: 1.25 s lead-in, 1.5 s per row, 0.8 s settle.
    pub fn table(rows: u64) -> Self {
        Self {
            duration_ms: 1_250u64.saturating_add(1_500u64.saturating_mul(rows)),
            settle_ms: 800,
            fact_interval_ms: DEFAULT_FACT_INTERVAL_MS,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.duration_ms.saturating_add(self.settle_ms)
    }
}

impl Default for AnalysisTiming {
    fn default() -> Self {
        Self::chat()
    }
}

/// What the loader shows at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisView {
    pub elapsed_ms: u64,
    /// 0.0 ..= 100.0
    pub progress_pct: f64,
    pub label_index: usize,
    pub fact_index: usize,
    /// Animation and settle are over; the front end may complete the step.
    pub finished: bool,
}

impl AnalysisView {
    pub fn at(timing: &AnalysisTiming, elapsed_ms: u64, labels: usize, facts: usize) -> Self {
        let progress_pct = if timing.duration_ms == 0 {
            100.0
        } else {
            (elapsed_ms as f64 / timing.duration_ms as f64 * 100.0).min(100.0)
        };

        // Labels are spread evenly across the bar and wrap afterwards.
        let label_index = match labels {
            0 => 0,
            n => {
                let per_label = (timing.duration_ms / n as u64).max(1);
                (elapsed_ms / per_label) as usize % n
            }
        };

        let fact_index = match facts {
            0 => 0,
            n => (elapsed_ms / timing.fact_interval_ms.max(1)) as usize % n,
        };

        Self {
            elapsed_ms,
            progress_pct,
            label_index,
            fact_index,
            finished: elapsed_ms >= timing.total_ms(),
        }
    }

    pub fn remaining_ms(&self, timing: &AnalysisTiming) -> u64 {
        timing.total_ms().saturating_sub(self.elapsed_ms)
    }
}
