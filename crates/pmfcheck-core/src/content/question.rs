use serde::{Deserialize, Serialize};

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Multi-line free text with a minimum trimmed length.
    FreeText,
    /// Exactly one of the question's options.
    SingleSelect,
}

/// A selectable option of a single-select question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl QuestionOption {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: id.to_string(),
        }
    }
}

/// One question of the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based step number, also the key of the insight pool.
    pub step: u32,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Find an option by exact label, falling back to its id.
    pub fn find_option(&self, answer: &str) -> Option<&QuestionOption> {
        self.options
            .iter()
            .find(|o| o.label == answer)
            .or_else(|| self.options.iter().find(|o| o.id == answer))
    }

    pub fn is_free_text(&self) -> bool {
        self.kind == QuestionKind::FreeText
    }
}

/// "Primary challenge" card shown before the first question in the chat variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub description: String,
    /// Social-proof counter shown on the card.
    pub count: u32,
}

impl Category {
    fn new(id: &str, icon: &str, title: &str, description: &str, count: u32) -> Self {
        Self {
            id: id.to_string(),
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            count,
        }
    }
}

fn free_text(step: u32, prompt: &str, placeholder: &str) -> Question {
    Question {
        step,
        prompt: prompt.to_string(),
        kind: QuestionKind::FreeText,
        placeholder: Some(placeholder.to_string()),
        options: Vec::new(),
    }
}

pub(crate) fn default_questions() -> Vec<Question> {
    vec![
        free_text(
            1,
            "What does your product do in one sentence, and who is the primary user?",
            "e.g., \"We help remote teams track async standups. Primary users are engineering managers at 50-200 person companies.\"",
        ),
        free_text(
            2,
            "What is the single strongest signal that users find value in your product?",
            "e.g., \"40% of users who complete onboarding return within 48 hours\" or \"Users tell us they can't go back to their old workflow.\"",
        ),
        Question {
            step: 3,
            prompt: "What is your primary distribution channel today?".to_string(),
            kind: QuestionKind::SingleSelect,
            placeholder: None,
            options: vec![
                QuestionOption::new("organic-search", "Organic Search / SEO"),
                QuestionOption::new("paid-ads", "Paid Ads (Google, Meta, etc.)"),
                QuestionOption::new("social-media", "Social Media / Content"),
                QuestionOption::new("referral", "Word of Mouth / Referral"),
                QuestionOption::new("outbound", "Outbound Sales / Cold Email"),
                QuestionOption::new("partnerships", "Partnerships / Integrations"),
                QuestionOption::new("community", "Community / Events"),
                QuestionOption::new("none", "No clear channel yet"),
            ],
        },
        free_text(
            4,
            "What happens when you ask a paying customer \"What would you use if our product didn't exist?\"",
            "e.g., \"Most say they'd go back to spreadsheets\" or \"They mention Competitor X, but say we're easier to use.\"",
        ),
        free_text(
            5,
            "What is the biggest risk that could prevent you from reaching PMF in the next 6 months?",
            "e.g., \"Running out of runway before finding a scalable acquisition channel\" or \"Enterprise buyers have a 6-month sales cycle we can't sustain.\"",
        ),
    ]
}

pub(crate) fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "retention",
            "🔄",
            "Retention & Engagement",
            "Users sign up but churn within weeks",
            2847,
        ),
        Category::new(
            "positioning",
            "🎯",
            "Positioning & Messaging",
            "Struggle to articulate unique value",
            2134,
        ),
        Category::new(
            "distribution",
            "📢",
            "Distribution & Growth",
            "No scalable acquisition channels found",
            3201,
        ),
        Category::new(
            "monetization",
            "💰",
            "Monetization & Pricing",
            "Users love it but won't pay for it",
            1876,
        ),
        Category::new(
            "market-fit",
            "🧩",
            "Market & Segment Fit",
            "Not sure who the ideal customer is",
            2563,
        ),
    ]
}
