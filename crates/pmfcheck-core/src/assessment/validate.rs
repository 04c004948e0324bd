//! Input validation at the transition boundary.

use std::sync::LazyLock;

use regex::Regex;

use crate::content::{Question, QuestionKind};
use crate::error::ValidationError;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Check an answer against the question's rule and return the text to record:
/// the trimmed text for free text, the option label for single select.
pub fn validate_answer(
    question: &Question,
    answer: &str,
    min_chars: usize,
) -> Result<String, ValidationError> {
    match question.kind {
        QuestionKind::FreeText => {
            let trimmed = answer.trim();
            let len = trimmed.chars().count();
            if len < min_chars {
                return Err(ValidationError::AnswerTooShort {
                    remaining: min_chars - len,
                });
            }
            Ok(trimmed.to_string())
        }
        QuestionKind::SingleSelect => question
            .find_option(answer)
            .map(|o| o.label.clone())
            .ok_or_else(|| ValidationError::UnknownOption {
                answer: answer.to_string(),
            }),
    }
}

/// `local@domain.tld`: ASCII, no whitespace, exactly one `@`, a dot in the
/// domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    email.is_ascii() && EMAIL.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}
