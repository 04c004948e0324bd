pub mod completions;
pub mod config;
pub mod content;
pub mod run;
pub mod simulate;

use std::path::Path;

use clap::Args;
use pmfcheck_core::{Config, Content, Variant};

/// Flags shared by `run` and `simulate`.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Presentation variant (overrides config)
    #[arg(long)]
    pub variant: Option<Variant>,
    /// Seed for insight selection (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Effective config with command-line overrides applied, plus the content it
/// points at.
pub fn load_session(
    args: &SessionArgs,
    config_path: Option<&Path>,
) -> Result<(Config, Content), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(variant) = args.variant {
        config.assessment.variant = variant;
    }
    if let Some(seed) = args.seed {
        config.assessment.seed = Some(seed);
    }
    let content = load_content(&config)?;
    Ok((config, content))
}

pub fn load_content(config: &Config) -> Result<Content, Box<dyn std::error::Error>> {
    match &config.content_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading content");
            Ok(Content::load(path)?)
        }
        None => Ok(Content::default()),
    }
}
