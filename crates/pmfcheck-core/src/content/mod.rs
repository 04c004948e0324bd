//! Static content tables.
//!
//! The assessment engine treats [`Content`] as read-only configuration: the
//! question list (indexed by ordinal position), category cards, the insight
//! pool (keyed by 1-based step), the preview teaser and the report sections.
//! [`Content::default`] carries the built-in data; alternative question sets can
//! be loaded from TOML or JSON and are validated on load.

mod facts;
mod insights;
mod question;
mod report;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

pub use facts::PmfFact;
pub use insights::{InsightPool, FALLBACK_INSIGHT};
pub use question::{Category, Question, QuestionKind, QuestionOption};
pub use report::{PreviewSignal, ReportMetric, ReportSection, Severity, SignalKind, Trend};

/// Every table the assessment reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub questions: Vec<Question>,
    #[serde(default = "question::default_categories")]
    pub categories: Vec<Category>,
    #[serde(default = "insights::default_insights")]
    pub insights: InsightPool,
    #[serde(default = "report::default_preview_signals")]
    pub preview: Vec<PreviewSignal>,
    #[serde(default = "report::default_report_sections")]
    pub report: Vec<ReportSection>,
    #[serde(default = "facts::default_loading_labels")]
    pub loading_labels: Vec<String>,
    #[serde(default = "facts::default_facts")]
    pub facts: Vec<PmfFact>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            questions: question::default_questions(),
            categories: question::default_categories(),
            insights: insights::default_insights(),
            preview: report::default_preview_signals(),
            report: report::default_report_sections(),
            loading_labels: facts::default_loading_labels(),
            facts: facts::default_facts(),
        }
    }
}

impl Content {
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn insights_for(&self, step: u32) -> &[String] {
        self.insights.for_step(step)
    }

    /// Parse and validate a TOML content document.
    pub fn from_toml_str(s: &str) -> Result<Self, ContentError> {
        let content: Content =
            toml::from_str(s).map_err(|e| ContentError::ParseFailed(e.to_string()))?;
        content.validate()?;
        Ok(content)
    }

    /// Parse and validate a JSON content document.
    pub fn from_json_str(s: &str) -> Result<Self, ContentError> {
        let content: Content =
            serde_json::from_str(s).map_err(|e| ContentError::ParseFailed(e.to_string()))?;
        content.validate()?;
        Ok(content)
    }

    /// Load a content document, choosing the format by file extension
    /// (`.json` is JSON, anything else TOML).
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ContentError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            _ => Self::from_toml_str(&raw),
        }
    }

    /// Structural checks the engine relies on.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.questions.is_empty() {
            return Err(ContentError::NoQuestions);
        }
        for (index, q) in self.questions.iter().enumerate() {
            let expected = index as u32 + 1;
            if q.step != expected {
                return Err(ContentError::StepOutOfOrder {
                    index,
                    expected,
                    found: q.step,
                });
            }
            if q.kind == QuestionKind::SingleSelect && q.options.is_empty() {
                return Err(ContentError::MissingOptions { step: q.step });
            }
            let mut seen = HashSet::new();
            for option in &q.options {
                if !seen.insert(option.id.as_str()) {
                    return Err(ContentError::DuplicateOption {
                        step: q.step,
                        id: option.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reports_missing_file_as_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Content::load(&path).unwrap_err();
        assert!(matches!(&err, ContentError::ReadFailed { path: p, .. } if p == &path));
        assert!(err
            .to_string()
            .starts_with(&format!("Failed to read content from {}", path.display())));
    }

    #[test]
    fn load_reports_bad_document_as_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Content::load(&path),
            Err(ContentError::ParseFailed(_))
        ));
    }

    #[test]
    fn default_content_is_valid() {
        let content = Content::default();
        assert!(content.validate().is_ok());
        assert_eq!(content.question_count(), 5);
        assert_eq!(content.categories.len(), 5);
        assert_eq!(content.report.len(), 9);
        assert_eq!(content.loading_labels.len(), 8);
        assert_eq!(content.facts.len(), 6);
    }

    #[test]
    fn toml_document_keeps_default_tables() {
        let doc = r#"
[[questions]]
step = 1
prompt = "Who is your customer?"
kind = "free-text"

[[questions]]
step = 2
prompt = "Pick a stage"
kind = "single-select"
options = [
    { id = "idea", label = "Idea" },
    { id = "mvp", label = "MVP" },
]
"#;
        let content = Content::from_toml_str(doc).unwrap();
        assert_eq!(content.question_count(), 2);
        assert_eq!(content.question(1).unwrap().options.len(), 2);
        assert_eq!(content.report.len(), 9);
        assert_eq!(content.insights_for(1).len(), 3);
    }

    #[test]
    fn json_insights_keyed_by_step_string() {
        let doc = r#"{
            "questions": [{"step": 1, "prompt": "Why?", "kind": "free-text"}],
            "insights": {"1": ["Only line"]}
        }"#;
        let content = Content::from_json_str(doc).unwrap();
        assert_eq!(content.insights_for(1), ["Only line".to_string()]);
        assert!(content.insights_for(2).is_empty());
    }

    #[test]
    fn rejects_out_of_order_steps() {
        let mut content = Content::default();
        content.questions.swap(0, 1);
        assert!(matches!(
            content.validate(),
            Err(ContentError::StepOutOfOrder { index: 0, expected: 1, found: 2 })
        ));
    }

    #[test]
    fn rejects_select_without_options() {
        let mut content = Content::default();
        content.questions[2].options.clear();
        assert!(matches!(
            content.validate(),
            Err(ContentError::MissingOptions { step: 3 })
        ));
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let mut content = Content::default();
        let dup = content.questions[2].options[0].clone();
        content.questions[2].options.push(dup);
        assert!(matches!(
            content.validate(),
            Err(ContentError::DuplicateOption { step: 3, .. })
        ));
    }

    #[test]
    fn rejects_empty_question_list() {
        assert!(matches!(
            Content::from_json_str(r#"{"questions": []}"#),
            Err(ContentError::NoQuestions)
        ));
    }
}
