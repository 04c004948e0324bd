//! Assessment engine implementation.
//!
//! The engine is a virtual-time state machine. It does not use threads or
//! wall-clock timers; the caller advances time with `tick()` and every timed
//! transition (typing indicator, insight window) is a scheduled callback on
//! the session's own [`Scheduler`].
//!
//! ## State Transitions
//!
//! ```text
//! [CategorySelect] -> Question(0) -> ... -> Question(N-1) -> Analysis
//!     -> Preview -> [EmailGate] -> Report
//! ```
//!
//! Bracketed steps only exist in the chat variant.
//!
//! ## Usage
//!
//! ```
//! use pmfcheck_core::{AssessmentEngine, Config, Content, Step, Variant};
//!
//! let mut config = Config::for_variant(Variant::Wizard);
//! config.assessment.seed = Some(7);
//! let mut engine = AssessmentEngine::new(Content::default(), config).unwrap();
//!
//! engine.answer_question("We help founders find product-market fit.").unwrap();
//! assert!(engine.input_locked());
//! engine.tick(2_000);
//! assert_eq!(engine.step(), Step::Question(1));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use rand::{RngCore, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, trace};

use super::state::{Progress, Snapshot, Step, UserResponse, Variant};
use super::transcript::{self, ChatMessage, MessageKind, Role, Transcript};
use super::validate::{validate_answer, validate_email};
use crate::analysis::{AnalysisTiming, AnalysisView};
use crate::config::Config;
use crate::content::{Content, PreviewSignal, Question, ReportSection};
use crate::error::{AssessmentError, CoreError, ValidationError};
use crate::events::Event;
use crate::scheduler::Scheduler;

/// Transitions waiting on the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    /// Chat: opening typing is over; greet.
    Greeting,
    /// Chat: show the category cards.
    CategoryPrompt,
    /// Chat: typing after the category pick is over; acknowledge it.
    CategoryReply,
    /// Chat: lead-in after the category reply; present question 1.
    PresentFirstQuestion,
    /// Chat: typing after an answer is over; reveal the chosen insight.
    RevealInsight { index: usize, step: u32, text: String },
    /// Insight window for question `index` is over.
    Advance { index: usize },
    /// Chat: typing after the email submission is over; unlock the report.
    UnlockReport { email: String },
}

/// What the report screen may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportView<'a> {
    /// Preview or email gate: teaser cards only.
    Locked { preview: &'a [PreviewSignal] },
    Unlocked { sections: &'a [ReportSection] },
}

/// One assessment session.
///
/// Constructed per session and owned by the caller; [`dispose`] cancels any
/// pending timers when the session is torn down.
///
/// [`dispose`]: AssessmentEngine::dispose
pub struct AssessmentEngine {
    session_id: String,
    started_at: DateTime<Utc>,
    content: Content,
    config: Config,
    analysis_timing: AnalysisTiming,
    rng: Box<dyn RngCore + Send>,
    scheduler: Scheduler<Pending>,
    step: Step,
    question_index: usize,
    responses: Vec<UserResponse>,
    pending_insight: Option<String>,
    /// Chat typing indicator, up until this instant.
    typing_until_ms: Option<u64>,
    email_unlocked: bool,
    email: Option<String>,
    selected_category: Option<String>,
    transcript: Transcript,
    analysis_started_at_ms: Option<u64>,
    disposed: bool,
}

impl fmt::Debug for AssessmentEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentEngine")
            .field("session_id", &self.session_id)
            .field("variant", &self.variant())
            .field("step", &self.step)
            .field("question_index", &self.question_index)
            .field("responses", &self.responses.len())
            .field("pending_insight", &self.pending_insight)
            .field("typing_until_ms", &self.typing_until_ms)
            .field("email_unlocked", &self.email_unlocked)
            .field("now_ms", &self.scheduler.now_ms())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl AssessmentEngine {
    /// Create a session. Insight selection is seeded from
    /// `config.assessment.seed`, or from entropy when unset.
    pub fn new(content: Content, config: Config) -> Result<Self, CoreError> {
        let rng = match config.assessment.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self::with_rng(content, config, rng)
    }

    /// Create a session with a caller-provided random source.
    pub fn with_rng<R>(content: Content, config: Config, rng: R) -> Result<Self, CoreError>
    where
        R: RngCore + Send + 'static,
    {
        content.validate()?;
        config.validate()?;

        let variant = config.assessment.variant;
        let analysis_timing = config.timing.analysis();
        let mut engine = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            content,
            config,
            analysis_timing,
            rng: Box::new(rng),
            scheduler: Scheduler::new(),
            step: variant.initial_step(),
            question_index: 0,
            responses: Vec::new(),
            pending_insight: None,
            typing_until_ms: None,
            email_unlocked: false,
            email: None,
            selected_category: None,
            transcript: Transcript::new(),
            analysis_started_at_ms: None,
            disposed: false,
        };

        if variant == Variant::Chat {
            let delay = engine.config.timing.greeting_delay_ms;
            engine.start_typing(delay, Pending::Greeting);
        }

        debug!(
            session = %engine.session_id,
            variant = %variant,
            questions = engine.content.question_count(),
            "assessment session created"
        );
        Ok(engine)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn variant(&self) -> Variant {
        self.config.assessment.variant
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn total_questions(&self) -> usize {
        self.content.question_count()
    }

    /// The active question, only while in a question step.
    pub fn current_question(&self) -> Option<&Question> {
        match self.step {
            Step::Question(i) => self.content.question(i),
            _ => None,
        }
    }

    pub fn responses(&self) -> &[UserResponse] {
        &self.responses
    }

    pub fn pending_insight(&self) -> Option<&str> {
        self.pending_insight.as_deref()
    }

    pub fn is_typing(&self) -> bool {
        self.typing_until_ms.is_some()
    }

    /// Answering and category picks are ignored while this is set.
    pub fn input_locked(&self) -> bool {
        self.pending_insight.is_some() || self.typing_until_ms.is_some()
    }

    pub fn email_unlocked(&self) -> bool {
        self.email_unlocked
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn progress(&self) -> Progress {
        Progress::of(self.step, self.total_questions())
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Virtual time of the next timed transition, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.scheduler.next_due_ms()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Chat messages so far; always empty for the wizard.
    pub fn transcript(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn analysis_timing(&self) -> &AnalysisTiming {
        &self.analysis_timing
    }

    /// Loader state while in the analysis step.
    pub fn analysis_view(&self) -> Option<AnalysisView> {
        if self.step != Step::Analysis {
            return None;
        }
        let started = self.analysis_started_at_ms?;
        let elapsed = self.scheduler.now_ms().saturating_sub(started);
        Some(AnalysisView::at(
            &self.analysis_timing,
            elapsed,
            self.content.loading_labels.len(),
            self.content.facts.len(),
        ))
    }

    /// Teaser before the email is accepted, full sections after.
    pub fn report(&self) -> Option<ReportView<'_>> {
        match self.step {
            Step::Preview | Step::EmailGate => Some(ReportView::Locked {
                preview: &self.content.preview,
            }),
            Step::Report => Some(ReportView::Unlocked {
                sections: &self.content.report,
            }),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session_id: self.session_id.clone(),
            variant: self.variant(),
            step: self.step,
            question_index: self.question_index,
            current_question: self.current_question().cloned(),
            total_questions: self.total_questions(),
            responses: self.responses.len(),
            pending_insight: self.pending_insight.clone(),
            typing: self.is_typing(),
            input_locked: self.input_locked(),
            email_unlocked: self.email_unlocked,
            selected_category: self.selected_category.clone(),
            progress: self.progress(),
            now_ms: self.scheduler.now_ms(),
        }
    }

    /// Events describing the initial state, for front ends that render from
    /// the event stream.
    pub fn opening_events(&self) -> Vec<Event> {
        let mut events = vec![Event::SessionStarted {
            session_id: self.session_id.clone(),
            variant: self.variant(),
            step: self.step,
            at_ms: 0,
        }];
        events.extend(self.transcript.messages().iter().map(message_event));
        if let Some(until_ms) = self.typing_until_ms {
            events.push(Event::TypingStarted {
                until_ms,
                at_ms: self.scheduler.now_ms(),
            });
        }
        if let Step::Question(index) = self.step {
            if let Some(q) = self.content.question(index) {
                events.push(Event::QuestionPresented {
                    index,
                    step: q.step,
                    at_ms: 0,
                });
            }
        }
        events
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Chat only: pick the opening "primary challenge" card.
    pub fn select_category(&mut self, category_id: &str) -> Result<Vec<Event>, AssessmentError> {
        const COMMAND: &str = "select_category";
        self.ensure_live(COMMAND)?;
        if self.variant() != Variant::Chat || self.step != Step::CategorySelect {
            return Err(self.invalid(COMMAND));
        }
        if self.input_locked() {
            return Err(self.reject(COMMAND, AssessmentError::InputLocked));
        }
        let Some(category) = self.content.category(category_id) else {
            return Err(self.reject(
                COMMAND,
                ValidationError::UnknownCategory(category_id.to_string()).into(),
            ));
        };
        let echo = format!("{} {}", category.icon, category.title);

        let now = self.scheduler.now_ms();
        let mut events = vec![Event::CategorySelected {
            category_id: category_id.to_string(),
            at_ms: now,
        }];
        self.selected_category = Some(category_id.to_string());
        self.say(&mut events, Role::User, MessageKind::Text, echo);
        let delay = self.config.timing.typing_delay_ms;
        events.push(self.start_typing(delay, Pending::CategoryReply));

        debug!(session = %self.session_id, category = category_id, "category selected");
        Ok(events)
    }

    /// Validate and record an answer to the active question, then schedule
    /// the insight reveal and the advance to the next step.
    pub fn answer_question(&mut self, answer: &str) -> Result<Vec<Event>, AssessmentError> {
        const COMMAND: &str = "answer_question";
        self.ensure_live(COMMAND)?;
        let Step::Question(index) = self.step else {
            return Err(self.invalid(COMMAND));
        };
        if self.input_locked() {
            return Err(self.reject(COMMAND, AssessmentError::InputLocked));
        }
        let min_chars = self.config.assessment.min_answer_chars;
        let (step, prompt, recorded) = match self.content.question(index) {
            Some(q) => match validate_answer(q, answer, min_chars) {
                Ok(recorded) => (q.step, q.prompt.clone(), recorded),
                Err(e) => return Err(self.reject(COMMAND, e.into())),
            },
            None => return Err(self.invalid(COMMAND)),
        };

        let now = self.scheduler.now_ms();
        self.responses.push(UserResponse {
            step,
            question: prompt,
            answer: recorded.clone(),
        });
        let mut events = vec![Event::AnswerRecorded {
            step,
            answer: recorded.clone(),
            responses: self.responses.len(),
            at_ms: now,
        }];

        let text = self.content.insights.pick(step, self.rng.as_mut());

        match self.variant() {
            Variant::Wizard => {
                self.show_insight(&mut events, index, step, text);
            }
            Variant::Chat => {
                self.say(&mut events, Role::User, MessageKind::Text, recorded);
                let delay = self.config.timing.typing_delay_ms;
                events.push(self.start_typing(delay, Pending::RevealInsight { index, step, text }));
            }
        }

        debug!(
            session = %self.session_id,
            step,
            responses = self.responses.len(),
            "answer recorded"
        );
        Ok(events)
    }

    /// Analysis animation finished: show the locked preview.
    pub fn complete_analysis(&mut self) -> Result<Vec<Event>, AssessmentError> {
        const COMMAND: &str = "complete_analysis";
        self.ensure_live(COMMAND)?;
        if self.step != Step::Analysis {
            return Err(self.invalid(COMMAND));
        }
        let mut events = vec![Event::AnalysisCompleted {
            at_ms: self.scheduler.now_ms(),
        }];
        self.transition(Step::Preview);
        self.say(
            &mut events,
            Role::Bot,
            MessageKind::Preview,
            transcript::PREVIEW_INTRO,
        );
        Ok(events)
    }

    /// Chat only: move from the preview to the explicit email gate.
    pub fn show_email_gate(&mut self) -> Result<Vec<Event>, AssessmentError> {
        const COMMAND: &str = "show_email_gate";
        self.ensure_live(COMMAND)?;
        if self.variant() != Variant::Chat || self.step != Step::Preview {
            return Err(self.invalid(COMMAND));
        }
        if self.input_locked() {
            return Err(self.reject(COMMAND, AssessmentError::InputLocked));
        }
        let mut events = vec![Event::EmailGateShown {
            at_ms: self.scheduler.now_ms(),
        }];
        self.transition(Step::EmailGate);
        self.say(
            &mut events,
            Role::Bot,
            MessageKind::EmailGate,
            transcript::EMAIL_GATE_PROMPT,
        );
        Ok(events)
    }

    /// Unlock the full report. Valid from the preview or the email gate only,
    /// so a second submission after unlocking is rejected. The wizard unlocks
    /// at once; the chat unlocks after a short typing pause.
    pub fn submit_email(&mut self, email: &str) -> Result<Vec<Event>, AssessmentError> {
        const COMMAND: &str = "submit_email";
        self.ensure_live(COMMAND)?;
        if !matches!(self.step, Step::Preview | Step::EmailGate) {
            return Err(self.invalid(COMMAND));
        }
        if self.input_locked() {
            return Err(self.reject(COMMAND, AssessmentError::InputLocked));
        }
        if let Err(e) = validate_email(email) {
            return Err(self.reject(COMMAND, e.into()));
        }

        let mut events = Vec::new();
        match self.variant() {
            Variant::Wizard => self.unlock_report(email.to_string(), &mut events),
            Variant::Chat => {
                self.say(&mut events, Role::User, MessageKind::Text, email);
                let delay = self.config.timing.unlock_delay_ms;
                let email = email.to_string();
                events.push(self.start_typing(delay, Pending::UnlockReport { email }));
            }
        }
        Ok(events)
    }

    /// Advance virtual time by `elapsed_ms`, applying every timed transition
    /// that comes due. Timers armed by a transition fire within the same call
    /// if they fall inside the window.
    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<Event> {
        if self.disposed {
            return Vec::new();
        }
        let deadline = self.scheduler.now_ms().saturating_add(elapsed_ms);
        let mut events = Vec::new();
        while let Some(fired) = self.scheduler.pop_due(deadline) {
            trace!(session = %self.session_id, due_ms = fired.due_ms, "timer fired");
            self.fire(fired.payload, &mut events);
        }
        self.scheduler.settle_at(deadline);
        events
    }

    /// Jump virtual time forward until no timed transition is pending.
    pub fn run_until_idle(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(due) = self.next_due_ms() {
            if self.disposed {
                break;
            }
            let elapsed = due.saturating_sub(self.scheduler.now_ms());
            events.extend(self.tick(elapsed));
        }
        events
    }

    /// Tear the session down: cancel every pending timer and refuse further
    /// commands. Calling it twice is a no-op.
    pub fn dispose(&mut self) -> Vec<Event> {
        if self.disposed {
            return Vec::new();
        }
        let cancelled = self.scheduler.pending();
        self.scheduler.clear();
        self.disposed = true;
        debug!(session = %self.session_id, cancelled, "session disposed");
        vec![Event::SessionDisposed {
            cancelled_timers: cancelled,
            at_ms: self.scheduler.now_ms(),
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn fire(&mut self, pending: Pending, events: &mut Vec<Event>) {
        match pending {
            Pending::Greeting => {
                self.typing_until_ms = None;
                self.say(events, Role::Bot, MessageKind::Text, transcript::GREETING);
                let delay = self.config.timing.category_prompt_delay_ms;
                events.push(self.start_typing(delay, Pending::CategoryPrompt));
            }
            Pending::CategoryPrompt => {
                self.typing_until_ms = None;
                self.say(
                    events,
                    Role::Bot,
                    MessageKind::Categories,
                    transcript::CATEGORY_PROMPT,
                );
            }
            Pending::CategoryReply => {
                self.typing_until_ms = None;
                if self.step != Step::CategorySelect {
                    return;
                }
                let title = self
                    .selected_category
                    .as_deref()
                    .and_then(|id| self.content.category(id))
                    .map(|c| c.title.clone())
                    .unwrap_or_default();
                let reply = transcript::category_reply(&title, self.total_questions());
                self.say(events, Role::Bot, MessageKind::Text, reply);
                let delay = self.config.timing.question_lead_in_ms;
                events.push(self.start_typing(delay, Pending::PresentFirstQuestion));
            }
            Pending::PresentFirstQuestion => {
                self.typing_until_ms = None;
                if self.step != Step::CategorySelect {
                    return;
                }
                self.present_question(0, events);
            }
            Pending::RevealInsight { index, step, text } => {
                self.typing_until_ms = None;
                if self.step != Step::Question(index) {
                    return;
                }
                self.show_insight(events, index, step, text);
            }
            Pending::UnlockReport { email } => {
                self.typing_until_ms = None;
                if !matches!(self.step, Step::Preview | Step::EmailGate) {
                    return;
                }
                self.unlock_report(email, events);
            }
            Pending::Advance { index } => {
                self.typing_until_ms = None;
                if self.step != Step::Question(index) {
                    return;
                }
                self.pending_insight = None;
                events.push(Event::InsightCleared {
                    at_ms: self.scheduler.now_ms(),
                });
                let next = index + 1;
                if next < self.total_questions() {
                    self.present_question(next, events);
                } else {
                    self.start_analysis(events);
                }
            }
        }
    }

    fn show_insight(&mut self, events: &mut Vec<Event>, index: usize, step: u32, text: String) {
        let now = self.scheduler.now_ms();
        events.push(Event::InsightShown {
            step,
            text: text.clone(),
            at_ms: now,
        });
        self.say(events, Role::Bot, MessageKind::Insight, text.clone());
        self.pending_insight = Some(text);

        let timing = &self.config.timing;
        let is_last = index + 1 >= self.total_questions();
        match self.variant() {
            Variant::Wizard => {
                let delay = timing.insight_delay_ms;
                self.scheduler.schedule(delay, Pending::Advance { index });
            }
            // The bot "types" the next question through the insight window.
            Variant::Chat if !is_last => {
                let delay = timing.chat_insight_delay_ms;
                events.push(self.start_typing(delay, Pending::Advance { index }));
            }
            Variant::Chat => {
                let delay = timing.final_delay_ms;
                self.scheduler.schedule(delay, Pending::Advance { index });
            }
        }
    }

    fn unlock_report(&mut self, email: String, events: &mut Vec<Event>) {
        self.email_unlocked = true;
        self.transition(Step::Report);
        events.push(Event::ReportUnlocked {
            email: email.clone(),
            at_ms: self.scheduler.now_ms(),
        });
        self.email = Some(email);
        self.say(events, Role::Bot, MessageKind::Report, transcript::REPORT_READY);
    }

    fn present_question(&mut self, index: usize, events: &mut Vec<Event>) {
        self.question_index = index;
        self.transition(Step::Question(index));
        let Some((step, prompt)) = self
            .content
            .question(index)
            .map(|q| (q.step, q.prompt.clone()))
        else {
            return;
        };
        events.push(Event::QuestionPresented {
            index,
            step,
            at_ms: self.scheduler.now_ms(),
        });
        self.say(events, Role::Bot, MessageKind::Question, prompt);
    }

    fn start_analysis(&mut self, events: &mut Vec<Event>) {
        self.question_index = self.total_questions();
        self.transition(Step::Analysis);
        let now = self.scheduler.now_ms();
        self.analysis_started_at_ms = Some(now);
        self.say(
            events,
            Role::Bot,
            MessageKind::Text,
            transcript::ANALYSIS_INTRO,
        );
        events.push(Event::AnalysisStarted {
            duration_ms: self.analysis_timing.total_ms(),
            at_ms: now,
        });
    }

    /// Show the typing indicator for `delay_ms`, then apply `then`.
    fn start_typing(&mut self, delay_ms: u64, then: Pending) -> Event {
        let now = self.scheduler.now_ms();
        let until_ms = now.saturating_add(delay_ms);
        self.typing_until_ms = Some(until_ms);
        self.scheduler.schedule(delay_ms, then);
        Event::TypingStarted {
            until_ms,
            at_ms: now,
        }
    }

    /// Append to the transcript (chat variant only).
    fn say(
        &mut self,
        events: &mut Vec<Event>,
        role: Role,
        kind: MessageKind,
        content: impl Into<String>,
    ) {
        if self.variant() != Variant::Chat {
            return;
        }
        let now = self.scheduler.now_ms();
        let message = self.transcript.push(role, kind, content, now);
        events.push(message_event(message));
    }

    fn transition(&mut self, to: Step) {
        if self.step != to {
            debug!(session = %self.session_id, from = %self.step, to = %to, "step transition");
        }
        self.step = to;
    }

    fn ensure_live(&self, command: &'static str) -> Result<(), AssessmentError> {
        if self.disposed {
            return Err(self.reject(command, AssessmentError::Disposed));
        }
        Ok(())
    }

    fn invalid(&self, command: &'static str) -> AssessmentError {
        self.reject(
            command,
            AssessmentError::InvalidTransition {
                command,
                step: self.step,
            },
        )
    }

    fn reject(&self, command: &'static str, err: AssessmentError) -> AssessmentError {
        debug!(session = %self.session_id, command, step = %self.step, error = %err, "command rejected");
        err
    }
}

fn message_event(message: &ChatMessage) -> Event {
    Event::MessageAppended {
        id: message.id,
        role: message.role,
        kind: message.kind,
        content: message.content.clone(),
        at_ms: message.at_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str = "A long enough answer for the wizard.";

    fn engine(variant: Variant) -> AssessmentEngine {
        let mut config = Config::for_variant(variant);
        config.assessment.seed = Some(11);
        AssessmentEngine::new(Content::default(), config).unwrap()
    }

    fn answer_for(engine: &AssessmentEngine) -> String {
        match engine.current_question() {
            Some(q) if !q.is_free_text() => q.options[0].label.clone(),
            _ => ANSWER.to_string(),
        }
    }

    #[test]
    fn wizard_starts_on_first_question() {
        let e = engine(Variant::Wizard);
        assert_eq!(e.step(), Step::Question(0));
        assert_eq!(e.total_questions(), 5);
        assert_eq!(e.current_question().map(|q| q.step), Some(1));
        assert!(!e.input_locked());
        assert!(e.transcript().is_empty());
    }

    #[test]
    fn answer_sets_insight_then_advances_after_delay() {
        let mut e = engine(Variant::Wizard);
        let events = e.answer_question(ANSWER).unwrap();
        assert!(matches!(events[0], Event::AnswerRecorded { step: 1, .. }));
        assert!(matches!(events[1], Event::InsightShown { step: 1, .. }));

        let insight = e.pending_insight().unwrap().to_string();
        assert!(e.content().insights_for(1).contains(&insight));
        assert_eq!(e.responses().len(), 1);
        assert_eq!(e.step(), Step::Question(0));

        assert!(e.tick(1_999).is_empty());
        assert!(e.input_locked());

        let events = e.tick(1);
        assert!(matches!(events[0], Event::InsightCleared { at_ms: 2_000 }));
        assert!(matches!(events[1], Event::QuestionPresented { index: 1, step: 2, .. }));
        assert_eq!(e.step(), Step::Question(1));
        assert_eq!(e.pending_insight(), None);
        assert_eq!(e.responses().len(), e.question_index());
    }

    #[test]
    fn answer_during_insight_window_is_rejected() {
        let mut e = engine(Variant::Wizard);
        e.answer_question(ANSWER).unwrap();
        assert_eq!(
            e.answer_question(ANSWER),
            Err(AssessmentError::InputLocked)
        );
        assert_eq!(e.responses().len(), 1);
    }

    #[test]
    fn short_answer_reports_remaining_characters() {
        let mut e = engine(Variant::Wizard);
        assert_eq!(
            e.answer_question("short"),
            Err(AssessmentError::Validation(ValidationError::AnswerTooShort {
                remaining: 5
            }))
        );
        assert!(e.responses().is_empty());
        assert!(!e.input_locked());
        assert_eq!(e.pending_timers(), 0);
    }

    #[test]
    fn last_answer_leads_to_analysis_not_report() {
        let mut e = engine(Variant::Wizard);
        for _ in 0..5 {
            let answer = answer_for(&e);
            e.answer_question(&answer).unwrap();
            e.tick(2_000);
        }
        assert_eq!(e.step(), Step::Analysis);
        assert_eq!(e.question_index(), 5);
        assert_eq!(e.responses().len(), 5);
        assert!(!e.email_unlocked());
        assert_eq!(e.progress(), Progress { current: 5, total: 6 });
    }

    #[test]
    fn analysis_view_tracks_clock() {
        let mut e = engine(Variant::Wizard);
        assert!(e.analysis_view().is_none());
        for _ in 0..5 {
            let answer = answer_for(&e);
            e.answer_question(&answer).unwrap();
            e.tick(2_000);
        }
        let view = e.analysis_view().unwrap();
        assert_eq!(view.elapsed_ms, 0);
        e.tick(8_400);
        assert!(e.analysis_view().unwrap().finished);
    }

    #[test]
    fn commands_in_wrong_step_are_rejected() {
        let mut e = engine(Variant::Wizard);
        assert!(matches!(
            e.complete_analysis(),
            Err(AssessmentError::InvalidTransition { command: "complete_analysis", .. })
        ));
        assert!(matches!(
            e.submit_email("founder@startup.com"),
            Err(AssessmentError::InvalidTransition { .. })
        ));
        assert!(matches!(
            e.select_category("retention"),
            Err(AssessmentError::InvalidTransition { .. })
        ));
        assert!(matches!(
            e.show_email_gate(),
            Err(AssessmentError::InvalidTransition { .. })
        ));
        assert_eq!(e.step(), Step::Question(0));
    }

    /// Chat session past the opening greeting and category prompt.
    fn chat_ready() -> AssessmentEngine {
        let mut e = engine(Variant::Chat);
        e.run_until_idle();
        e
    }

    #[test]
    fn chat_opening_messages_are_typed() {
        let mut e = engine(Variant::Chat);
        assert!(e.transcript().is_empty());
        assert!(e.is_typing());
        assert_eq!(
            e.select_category("retention"),
            Err(AssessmentError::InputLocked)
        );

        assert!(e.tick(799).is_empty());
        let events = e.tick(1);
        assert!(matches!(events[0], Event::MessageAppended { at_ms: 800, .. }));
        assert!(matches!(events[1], Event::TypingStarted { until_ms: 1_400, .. }));
        assert!(e.is_typing());

        e.tick(600);
        assert!(!e.is_typing());
        let stamps: Vec<u64> = e.transcript().iter().map(|m| m.at_ms).collect();
        assert_eq!(stamps, vec![800, 1_400]);
        assert_eq!(e.transcript()[1].kind, MessageKind::Categories);
    }

    #[test]
    fn chat_category_then_typing_then_first_question() {
        let mut e = chat_ready();
        assert_eq!(e.step(), Step::CategorySelect);
        assert_eq!(e.transcript().len(), 2);

        assert!(matches!(
            e.select_category("vibes"),
            Err(AssessmentError::Validation(ValidationError::UnknownCategory(_)))
        ));

        e.select_category("retention").unwrap();
        assert!(e.is_typing());
        assert_eq!(e.selected_category(), Some("retention"));
        assert_eq!(
            e.select_category("positioning"),
            Err(AssessmentError::InputLocked)
        );

        // Reply after 1200 ms, question after another 800 ms.
        e.tick(1_200);
        assert_eq!(e.step(), Step::CategorySelect);
        assert!(e.is_typing());
        assert!(e.transcript().last().unwrap().content.starts_with("Great choice."));

        e.tick(799);
        assert_eq!(e.step(), Step::CategorySelect);
        e.tick(1);
        assert!(!e.is_typing());
        assert_eq!(e.step(), Step::Question(0));
        let last = e.transcript().last().unwrap();
        assert_eq!(last.kind, MessageKind::Question);
        assert_eq!(last.content, e.content().questions[0].prompt);
        assert_eq!(last.at_ms, 1_400 + 2_000);
    }

    #[test]
    fn chat_insight_follows_typing_delay() {
        let mut e = chat_ready();
        e.select_category("distribution").unwrap();
        e.run_until_idle();

        e.answer_question(ANSWER).unwrap();
        assert!(e.is_typing());
        assert_eq!(e.pending_insight(), None);
        assert!(e.input_locked());

        let events = e.tick(1_200);
        assert!(matches!(events[0], Event::InsightShown { step: 1, .. }));
        assert!(e.pending_insight().is_some());
        // The next question is being typed through the insight window.
        assert!(e.is_typing());

        e.tick(2_999);
        assert_eq!(e.step(), Step::Question(0));
        e.tick(1);
        assert_eq!(e.step(), Step::Question(1));
        assert!(!e.is_typing());
    }

    #[test]
    fn chat_single_tick_covers_chained_timers() {
        let mut e = chat_ready();
        e.select_category("monetization").unwrap();
        e.run_until_idle();
        assert_eq!(e.now_ms(), 3_400);
        e.answer_question(ANSWER).unwrap();
        // typing (1200) then insight window (3000) inside one window
        e.tick(10_000);
        assert_eq!(e.step(), Step::Question(1));
        assert_eq!(e.now_ms(), 13_400);
    }

    #[test]
    fn chat_email_gate_flow() {
        let mut e = chat_ready();
        e.select_category("market-fit").unwrap();
        e.run_until_idle();
        for _ in 0..5 {
            let answer = answer_for(&e);
            e.answer_question(&answer).unwrap();
            e.run_until_idle();
        }
        assert_eq!(e.step(), Step::Analysis);
        assert!(!e.is_typing());
        e.complete_analysis().unwrap();
        assert!(matches!(e.report(), Some(ReportView::Locked { .. })));
        e.show_email_gate().unwrap();
        assert_eq!(e.step(), Step::EmailGate);
        assert_eq!(e.progress().current, 5);

        e.submit_email("founder@startup.com").unwrap();
        assert_eq!(e.step(), Step::EmailGate);
        assert!(!e.email_unlocked());
        assert!(e.is_typing());
        assert_eq!(
            e.submit_email("founder@startup.com"),
            Err(AssessmentError::InputLocked)
        );

        e.tick(799);
        assert_eq!(e.step(), Step::EmailGate);
        let events = e.tick(1);
        assert!(matches!(events[0], Event::ReportUnlocked { .. }));
        assert_eq!(e.step(), Step::Report);
        assert!(e.email_unlocked());
        assert_eq!(e.email(), Some("founder@startup.com"));
        assert!(matches!(e.report(), Some(ReportView::Unlocked { sections }) if sections.len() == 9));
        assert_eq!(e.transcript().last().unwrap().kind, MessageKind::Report);
    }

    #[test]
    fn dispose_cancels_pending_advance() {
        let mut e = engine(Variant::Wizard);
        e.answer_question(ANSWER).unwrap();
        let events = e.dispose();
        assert!(matches!(
            events[0],
            Event::SessionDisposed { cancelled_timers: 1, .. }
        ));
        assert!(e.tick(10_000).is_empty());
        assert_eq!(e.step(), Step::Question(0));
        assert_eq!(e.answer_question(ANSWER), Err(AssessmentError::Disposed));
        assert!(e.dispose().is_empty());
    }

    #[test]
    fn custom_rng_is_used_for_insights() {
        let config = Config::for_variant(Variant::Wizard);
        let mut a = AssessmentEngine::with_rng(
            Content::default(),
            config.clone(),
            Mcg128Xsl64::seed_from_u64(3),
        )
        .unwrap();
        let mut b =
            AssessmentEngine::with_rng(Content::default(), config, Mcg128Xsl64::seed_from_u64(3))
                .unwrap();
        a.answer_question(ANSWER).unwrap();
        b.answer_question(ANSWER).unwrap();
        assert_eq!(a.pending_insight(), b.pending_insight());
    }

    #[test]
    fn opening_events_describe_initial_state() {
        let wizard = engine(Variant::Wizard);
        let events = wizard.opening_events();
        assert!(matches!(events[0], Event::SessionStarted { .. }));
        assert!(matches!(events[1], Event::QuestionPresented { index: 0, .. }));

        let chat = engine(Variant::Chat);
        let events = chat.opening_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Event::TypingStarted { until_ms: 800, at_ms: 0 }));

        let ready = chat_ready();
        let events = ready.opening_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], Event::MessageAppended { kind: MessageKind::Categories, .. }));
    }

    #[test]
    fn invalid_content_is_rejected_at_construction() {
        let mut content = Content::default();
        content.questions.clear();
        let err = AssessmentEngine::new(content, Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::Content(_)));
    }
}
