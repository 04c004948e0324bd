//! # PMF Check Core Library
//!
//! Core logic for the PMF assessment funnel: a multi-step questionnaire that
//! collects founder answers, shows a canned insight after each one, runs a
//! timed "analysis", teases a preview and unlocks the full report behind an
//! email address. The `pmfcheck` CLI is a thin terminal front end over this
//! library.
//!
//! ## Architecture
//!
//! - **Assessment Engine**: A virtual-time state machine; the caller advances
//!   the clock with `tick()` and receives events for every transition
//! - **Scheduler**: Sorted delay queue behind the engine's timed transitions
//! - **Content**: Questions, categories, insights and report tables, built in
//!   or loaded from TOML/JSON
//! - **Config**: TOML-based settings (variant, thresholds, pacing)
//!
//! ## Key Components
//!
//! - [`AssessmentEngine`]: Core assessment state machine
//! - [`Content`]: Static content tables
//! - [`Config`]: Application configuration management
//! - [`Event`]: Transition notifications

pub mod analysis;
pub mod assessment;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod scheduler;

pub use analysis::{AnalysisTiming, AnalysisView};
pub use assessment::{
    AssessmentEngine, ChatMessage, MessageKind, Progress, ReportView, Role, Snapshot, Step,
    UserResponse, Variant,
};
pub use config::{AssessmentConfig, Config, TimingConfig};
pub use content::{Category, Content, Question, QuestionKind, QuestionOption};
pub use error::{AssessmentError, ConfigError, ContentError, CoreError, ValidationError};
pub use events::Event;
pub use scheduler::{Scheduler, TimerId};
