use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::Question;

/// Presentation variant driving the same machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Single-track wizard: starts on the first question, email from the preview.
    #[default]
    Wizard,
    /// Chat transcript: category pick first, explicit email gate, typing delays.
    Chat,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Wizard => "wizard",
            Variant::Chat => "chat",
        }
    }

    pub fn initial_step(self) -> Step {
        match self {
            Variant::Wizard => Step::Question(0),
            Variant::Chat => Step::CategorySelect,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wizard" => Ok(Variant::Wizard),
            "chat" => Ok(Variant::Chat),
            other => Err(format!("unknown variant '{other}' (expected wizard or chat)")),
        }
    }
}

/// Canonical step enumeration:
///
/// ```text
/// CategorySelect -> Question(0..N) -> Analysis -> Preview -> EmailGate -> Report
/// ```
///
/// The wizard variant starts at `Question(0)` and never visits
/// `CategorySelect` or `EmailGate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CategorySelect,
    Question(usize),
    Analysis,
    Preview,
    EmailGate,
    Report,
}

impl Step {
    pub fn is_question(self) -> bool {
        matches!(self, Step::Question(_))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CategorySelect => f.write_str("category-select"),
            Step::Question(i) => write!(f, "question {}", i + 1),
            Step::Analysis => f.write_str("analysis"),
            Step::Preview => f.write_str("preview"),
            Step::EmailGate => f.write_str("email-gate"),
            Step::Report => f.write_str("report"),
        }
    }
}

/// Progress bar value: `current` of `total` (questions plus one analysis step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// Always derived from the step; never stored.
    pub fn of(step: Step, total_questions: usize) -> Self {
        let current = match step {
            Step::CategorySelect => 0,
            Step::Question(i) => i,
            Step::Analysis | Step::Preview | Step::EmailGate => total_questions,
            Step::Report => total_questions + 1,
        };
        Self {
            current,
            total: total_questions + 1,
        }
    }

    /// 0.0 ..= 100.0
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64 * 100.0).min(100.0)
    }
}

/// One answered question. Appended once, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub step: u32,
    pub question: String,
    pub answer: String,
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub session_id: String,
    pub variant: Variant,
    pub step: Step,
    pub question_index: usize,
    pub current_question: Option<Question>,
    pub total_questions: usize,
    pub responses: usize,
    pub pending_insight: Option<String>,
    pub typing: bool,
    pub input_locked: bool,
    pub email_unlocked: bool,
    pub selected_category: Option<String>,
    pub progress: Progress,
    pub now_ms: u64,
}
