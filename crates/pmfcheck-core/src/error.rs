//! Core error types for pmfcheck-core.
//!
//! All failures in this crate are local: user input that fails validation,
//! commands issued in the wrong step, or malformed configuration/content
//! documents. Nothing here wraps I/O against a remote service.

use std::path::PathBuf;
use thiserror::Error;

use crate::assessment::Step;

/// Core error type for pmfcheck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Assessment command rejected
    #[error("Assessment error: {0}")]
    Assessment(#[from] AssessmentError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content table errors
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

/// Rejection of an assessment command.
///
/// A rejected command never mutates the session; the caller re-presents the
/// input for correction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    /// The input itself was invalid
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The command is not valid in the current step
    #[error("'{command}' is not allowed in step {step}")]
    InvalidTransition { command: &'static str, step: Step },

    /// A timed transition (insight reveal or typing) is still pending
    #[error("Input is locked until the current insight finishes")]
    InputLocked,

    /// The session was disposed
    #[error("Session has been disposed")]
    Disposed,
}

/// Input validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Free-text answer shorter than the minimum
    #[error("{remaining} more characters needed")]
    AnswerTooShort { remaining: usize },

    /// Single-select answer not in the option set
    #[error("'{answer}' is not one of the available options")]
    UnknownOption { answer: String },

    /// Unknown category id
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Malformed email address
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Errors raised while loading or validating a content document.
#[derive(Error, Debug)]
pub enum ContentError {
    /// Content file could not be read
    #[error("Failed to read content from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// Document could not be parsed
    #[error("Failed to parse content: {0}")]
    ParseFailed(String),

    /// No questions defined
    #[error("Content must define at least one question")]
    NoQuestions,

    /// Steps must be 1-based and consecutive
    #[error("Question at index {index} has step {found}, expected {expected}")]
    StepOutOfOrder {
        index: usize,
        expected: u32,
        found: u32,
    },

    /// Single-select question without options
    #[error("Question {step} is single-select but has no options")]
    MissingOptions { step: u32 },

    /// Duplicate option id within one question
    #[error("Question {step} has duplicate option id '{id}'")]
    DuplicateOption { step: u32, id: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_message_reports_remaining() {
        let err = ValidationError::AnswerTooShort { remaining: 6 };
        assert_eq!(err.to_string(), "6 more characters needed");
    }

    #[test]
    fn validation_converts_into_core_error() {
        let err: CoreError = AssessmentError::from(ValidationError::InvalidEmail).into();
        assert!(matches!(
            err,
            CoreError::Assessment(AssessmentError::Validation(ValidationError::InvalidEmail))
        ));
    }

    #[test]
    fn invalid_transition_names_step() {
        let err = AssessmentError::InvalidTransition {
            command: "submit_email",
            step: Step::Analysis,
        };
        assert_eq!(err.to_string(), "'submit_email' is not allowed in step analysis");
    }
}
