use std::path::{Path, PathBuf};

use clap::Subcommand;
use pmfcheck_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config as TOML
    Show,
    /// Print the config file location
    Path,
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "assessment.variant", "timing.insight_delay_ms")
        key: String,
    },
}

fn resolve(config_path: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match config_path {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(Config::default_path()?),
    }
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default(config_path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", resolve(config_path)?.display());
        }
        ConfigAction::Init { force } => {
            let path = resolve(config_path)?;
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
            }
            Config::default().save_to(&path)?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Get { key } => {
            let config = Config::load_or_default(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
    }
    Ok(())
}
