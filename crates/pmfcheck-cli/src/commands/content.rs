use std::path::Path;

use clap::Subcommand;
use pmfcheck_core::Config;

use super::load_content;

#[derive(Subcommand)]
pub enum ContentTable {
    /// Question list in order
    Questions,
    /// Chat opening category cards
    Categories,
    /// Insight pool keyed by step
    Insights,
    /// Full report sections
    Report,
    /// Locked preview signals
    Preview,
}

pub fn run(table: ContentTable, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(config_path)?;
    let content = load_content(&config)?;

    let json = match table {
        ContentTable::Questions => serde_json::to_string_pretty(&content.questions)?,
        ContentTable::Categories => serde_json::to_string_pretty(&content.categories)?,
        ContentTable::Insights => serde_json::to_string_pretty(&content.insights)?,
        ContentTable::Report => serde_json::to_string_pretty(&content.report)?,
        ContentTable::Preview => serde_json::to_string_pretty(&content.preview)?,
    };
    println!("{json}");
    Ok(())
}
