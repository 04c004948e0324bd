use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pmfcheck", version, about = "PMF assessment in the terminal")]
struct Cli {
    /// Config file (default: ~/.config/pmfcheck/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the assessment interactively
    Run(commands::run::RunArgs),
    /// Run a scripted session and print events as JSON lines
    Simulate(commands::simulate::SimulateArgs),
    /// Print built-in or configured content tables
    Content {
        #[command(subcommand)]
        table: commands::content::ContentTable,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, config_path),
        Commands::Simulate(args) => commands::simulate::run(args, config_path),
        Commands::Content { table } => commands::content::run(table, config_path),
        Commands::Config { action } => commands::config::run(action, config_path),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
