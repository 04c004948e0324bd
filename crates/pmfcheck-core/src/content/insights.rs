//! Canned "micro insight" lines shown after each answer.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Shown when a step has no pool of its own.
pub const FALLBACK_INSIGHT: &str = "Processing your response...";

/// Insight strings keyed by 1-based question step.
///
/// Keys are stored as strings so the table reads the same from TOML and JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightPool(BTreeMap<String, Vec<String>>);

impl InsightPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, step: u32, lines: Vec<String>) {
        self.0.insert(step.to_string(), lines);
    }

    pub fn for_step(&self, step: u32) -> &[String] {
        self.0
            .get(&step.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Uniform pick without memory; repeats across calls are expected.
    pub fn pick(&self, step: u32, rng: &mut dyn RngCore) -> String {
        self.for_step(step)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| FALLBACK_INSIGHT.to_string())
    }
}

pub(crate) fn default_insights() -> InsightPool {
    let table: [(u32, [&str; 3]); 5] = [
        (
            1,
            [
                "Interesting. Clarity of target user is a strong PMF signal. Let me dig deeper.",
                "Got it. Founders who can articulate this in one sentence are 2.3x more likely to find PMF.",
                "Clear product definition detected. This is a positive signal for your PMF journey.",
            ],
        ),
        (
            2,
            [
                "That retention signal tells me a lot. Most pre-PMF companies can't point to one metric. You can.",
                "Valuable insight. The best PMF signals are behavioral, not verbal. Let me factor this in.",
                "This is key data. Return usage patterns are one of the strongest PMF indicators.",
            ],
        ),
        (
            3,
            [
                "Your channel choice reveals a lot about your growth trajectory. Analyzing implications now.",
                "Distribution is where most post-MVP startups get stuck. I'm mapping your channel to PMF benchmarks.",
                "Channel-market fit is as important as product-market fit. Noting this for your report.",
            ],
        ),
        (
            4,
            [
                "The \"what would you use instead\" test is the Sean Ellis acid test for PMF. Processing your response.",
                "Substitution analysis is revealing. This tells me about your competitive moat.",
                "This answer reveals your positioning strength. Very few founders ask this question early enough.",
            ],
        ),
        (
            5,
            [
                "Understanding your perceived risk helps me calibrate the entire analysis. Building your report now.",
                "Risk awareness is a PMF superpower. Founders who name their risks clearly overcome them 4x faster.",
                "Final piece of the puzzle. I now have enough to generate a comprehensive PMF diagnostic.",
            ],
        ),
    ];

    let mut pool = InsightPool::new();
    for (step, lines) in table {
        pool.insert(step, lines.iter().map(|l| l.to_string()).collect());
    }
    pool
}
