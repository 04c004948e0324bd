use serde::{Deserialize, Serialize};

use crate::assessment::{MessageKind, Role, Step, Variant};

/// Every state change of an assessment produces an Event.
///
/// `at_ms` is virtual time on the session's scheduler clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        session_id: String,
        variant: Variant,
        step: Step,
        at_ms: u64,
    },
    CategorySelected {
        category_id: String,
        at_ms: u64,
    },
    AnswerRecorded {
        step: u32,
        answer: String,
        responses: usize,
        at_ms: u64,
    },
    /// Chat: the bot "is typing"; input stays locked until it ends.
    TypingStarted {
        until_ms: u64,
        at_ms: u64,
    },
    InsightShown {
        step: u32,
        text: String,
        at_ms: u64,
    },
    InsightCleared {
        at_ms: u64,
    },
    QuestionPresented {
        index: usize,
        step: u32,
        at_ms: u64,
    },
    AnalysisStarted {
        duration_ms: u64,
        at_ms: u64,
    },
    AnalysisCompleted {
        at_ms: u64,
    },
    EmailGateShown {
        at_ms: u64,
    },
    ReportUnlocked {
        email: String,
        at_ms: u64,
    },
    MessageAppended {
        id: u64,
        role: Role,
        kind: MessageKind,
        content: String,
        at_ms: u64,
    },
    SessionDisposed {
        cancelled_timers: usize,
        at_ms: u64,
    },
}

impl Event {
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::SessionStarted { at_ms, .. }
            | Event::CategorySelected { at_ms, .. }
            | Event::AnswerRecorded { at_ms, .. }
            | Event::TypingStarted { at_ms, .. }
            | Event::InsightShown { at_ms, .. }
            | Event::InsightCleared { at_ms }
            | Event::QuestionPresented { at_ms, .. }
            | Event::AnalysisStarted { at_ms, .. }
            | Event::AnalysisCompleted { at_ms }
            | Event::EmailGateShown { at_ms }
            | Event::ReportUnlocked { at_ms, .. }
            | Event::MessageAppended { at_ms, .. }
            | Event::SessionDisposed { at_ms, .. } => *at_ms,
        }
    }
}
