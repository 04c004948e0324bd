//! Chat-variant message log.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Bot,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Text,
    Categories,
    Question,
    Insight,
    Preview,
    EmailGate,
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sequential within a session, starting at 1.
    pub id: u64,
    pub role: Role,
    pub kind: MessageKind,
    pub content: String,
    pub at_ms: u64,
}

/// Append-only, ordered by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        role: Role,
        kind: MessageKind,
        content: impl Into<String>,
        at_ms: u64,
    ) -> &ChatMessage {
        let id = self.messages.len() as u64 + 1;
        self.messages.push(ChatMessage {
            id,
            role,
            kind,
            content: content.into(),
            at_ms,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

pub(crate) const GREETING: &str = "Hi, I'm your PMF diagnostic assistant. I'll help you identify where you stand on your product-market fit journey in under 3 minutes.";
pub(crate) const CATEGORY_PROMPT: &str =
    "What is the primary challenge you are facing right now?";
pub(crate) const ANALYSIS_INTRO: &str =
    "Excellent. I have everything I need. Let me analyze your responses now.";
pub(crate) const PREVIEW_INTRO: &str = "Analysis complete. Here are your top signals:";
pub(crate) const EMAIL_GATE_PROMPT: &str = "I've generated your 9-section PMF report. Enter your email to unlock the full analysis and PDF download.";
pub(crate) const REPORT_READY: &str =
    "Your full PMF Insights Report is ready. Scroll down to explore all 9 sections.";

pub(crate) fn category_reply(title: &str, question_count: usize) -> String {
    format!(
        "Great choice. {title} is one of the most critical PMF dimensions. Let me ask you {question_count} focused questions to diagnose your situation."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut t = Transcript::new();
        t.push(Role::Bot, MessageKind::Text, GREETING, 0);
        t.push(Role::User, MessageKind::Text, "hello", 10);
        let ids: Vec<u64> = t.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(t.last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn category_reply_names_question_count() {
        let reply = category_reply("Retention & Engagement", 5);
        assert!(reply.starts_with("Great choice. Retention & Engagement"));
        assert!(reply.contains("5 focused questions"));
    }
}
