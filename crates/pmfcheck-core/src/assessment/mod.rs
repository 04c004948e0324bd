//! Assessment state machine.
//!
//! One engine drives both presentation variants over a single step
//! enumeration; the variant only selects which steps are visited and how long
//! the timed transitions take.

mod engine;
mod state;
mod transcript;
mod validate;

pub use engine::{AssessmentEngine, ReportView};
pub use state::{Progress, Snapshot, Step, UserResponse, Variant};
pub use transcript::{ChatMessage, MessageKind, Role, Transcript};
pub use validate::{is_valid_email, validate_answer, validate_email};
