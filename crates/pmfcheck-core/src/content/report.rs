use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Positive,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Neutral => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetric {
    pub label: String,
    pub value: String,
    pub trend: Trend,
}

/// One of the nine sections of the unlocked report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub content: String,
    pub severity: Severity,
    #[serde(default)]
    pub metrics: Vec<ReportMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Risk,
    Signal,
    Strength,
}

/// Teaser card shown on the locked preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSignal {
    pub kind: SignalKind,
    pub emoji: String,
    pub title: String,
    pub description: String,
}

fn metric(label: &str, value: &str, trend: Trend) -> ReportMetric {
    ReportMetric {
        label: label.to_string(),
        value: value.to_string(),
        trend,
    }
}

fn section(
    id: &str,
    title: &str,
    icon: &str,
    severity: Severity,
    content: &str,
    metrics: [ReportMetric; 2],
) -> ReportSection {
    ReportSection {
        id: id.to_string(),
        title: title.to_string(),
        icon: icon.to_string(),
        content: content.to_string(),
        severity,
        metrics: metrics.to_vec(),
    }
}

pub(crate) fn default_report_sections() -> Vec<ReportSection> {
    vec![
        section(
            "reality-check",
            "Reality Check",
            "🔍",
            Severity::Warning,
            "Based on your responses, your product shows early signs of value delivery but has critical gaps in distribution and positioning that must be addressed before scaling.",
            [
                metric("PMF Score", "47/100", Trend::Neutral),
                metric("Confidence", "Medium", Trend::Neutral),
            ],
        ),
        section(
            "market-analysis",
            "Market Analysis",
            "📊",
            Severity::Neutral,
            "Your target market is viable but competitive. The segment you've identified has 3-5 established players, but your unique angle on the problem creates whitespace opportunity.",
            [
                metric("Market Size", "Medium", Trend::Up),
                metric("Competition", "High", Trend::Down),
            ],
        ),
        section(
            "retention-deep-dive",
            "Retention Deep Dive",
            "🔄",
            Severity::Positive,
            "Your retention signals suggest product value is being delivered, but the activation-to-habit loop has friction. Focus on reducing time-to-value in onboarding.",
            [
                metric("Activation Signal", "Strong", Trend::Up),
                metric("Habit Loop", "Weak", Trend::Down),
            ],
        ),
        section(
            "positioning-audit",
            "Positioning Audit",
            "🎯",
            Severity::Warning,
            "Your one-liner needs sharpening. Users understand what you do but not why they should switch from their current solution. The \"10x better\" narrative is missing.",
            [
                metric("Clarity", "Good", Trend::Up),
                metric("Differentiation", "Weak", Trend::Down),
            ],
        ),
        section(
            "distribution-strategy",
            "Distribution Strategy",
            "📢",
            Severity::Critical,
            "Your current channel shows promise but hasn't been validated at scale. Recommend testing 2 additional channels before doubling down on your primary.",
            [
                metric("Channel Fit", "Low", Trend::Down),
                metric("CAC Efficiency", "Unknown", Trend::Neutral),
            ],
        ),
        section(
            "monetization-review",
            "Monetization Review",
            "💰",
            Severity::Neutral,
            "Pricing signals indicate willingness to pay exists in your market. Consider value-based pricing tiers aligned with your strongest retention cohort.",
            [
                metric("WTP Signal", "Present", Trend::Up),
                metric("Price Sensitivity", "Medium", Trend::Neutral),
            ],
        ),
        section(
            "competitive-moat",
            "Competitive Moat",
            "🏰",
            Severity::Warning,
            "Your substitution analysis reveals a moderate moat. Users have alternatives but prefer your approach. Strengthen this by building network effects or data advantages.",
            [
                metric("Moat Strength", "Moderate", Trend::Neutral),
                metric("Switching Cost", "Low", Trend::Down),
            ],
        ),
        section(
            "risk-assessment",
            "Risk Assessment",
            "⚠️",
            Severity::Critical,
            "Your identified risk aligns with the most common pre-PMF failure pattern. Mitigation strategies are available and should be prioritized in your next sprint.",
            [
                metric("Risk Level", "High", Trend::Down),
                metric("Mitigatable", "Yes", Trend::Up),
            ],
        ),
        section(
            "action-plan",
            "Sprint 0 Action Plan",
            "🚀",
            Severity::Positive,
            "Based on this analysis, your immediate priorities should be: (1) Sharpen positioning with the \"switching\" narrative, (2) Test 2 new distribution channels, (3) Instrument your activation funnel to identify drop-off points.",
            [
                metric("Priority Actions", "3", Trend::Neutral),
                metric("Timeline", "4 weeks", Trend::Neutral),
            ],
        ),
    ]
}

pub(crate) fn default_preview_signals() -> Vec<PreviewSignal> {
    let signal = |kind, emoji: &str, title: &str, description: &str| PreviewSignal {
        kind,
        emoji: emoji.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    };
    vec![
        signal(
            SignalKind::Risk,
            "🔴",
            "Distribution Channel Risk",
            "Your current channel may not scale to your target market segment. Critical pivot point identified.",
        ),
        signal(
            SignalKind::Signal,
            "🟡",
            "Positioning Gap Detected",
            "Your value proposition resonates but lacks differentiation clarity. Adjustable with messaging refinement.",
        ),
        signal(
            SignalKind::Strength,
            "🟢",
            "Strong Retention Signal",
            "User engagement patterns suggest core value delivery. This is your strongest PMF indicator.",
        ),
    ]
}
