use serde::{Deserialize, Serialize};

/// "Did you know?" card rotated while the analysis runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmfFact {
    pub title: String,
    pub description: String,
}

pub(crate) fn default_loading_labels() -> Vec<String> {
    [
        "Analyzing your responses...",
        "Cross-referencing with 10,000+ PMF patterns...",
        "Identifying retention signals...",
        "Evaluating market positioning...",
        "Mapping distribution channels...",
        "Building competitive landscape...",
        "Generating strategic recommendations...",
        "Compiling your PMF report...",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub(crate) fn default_facts() -> Vec<PmfFact> {
    [
        (
            "Only 1 in 4",
            "startups achieve true product-market fit before Series A.",
        ),
        (
            "The #1 reason",
            "startups fail is building something nobody wants (42% of cases).",
        ),
        (
            "Retention > Growth",
            "Companies with 40%+ monthly retention are 3x more likely to reach PMF.",
        ),
        (
            "Sean Ellis Test",
            "If 40%+ users say they'd be \"very disappointed\" without your product, you have PMF.",
        ),
        (
            "Channel-Market Fit",
            "is as important as product-market fit. Most founders discover this too late.",
        ),
        (
            "The PMF Score",
            "Companies scoring above 70 on PMF diagnostics raise 2.1x more in their next round.",
        ),
    ]
    .iter()
    .map(|(title, description)| PmfFact {
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect()
}
