//! Velixa console
//!
//! Runs the form validation engine from the terminal. Notifications are
//! printed to stderr, reports to stdout.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use velixa::config::VelixaConfig;
use velixa::logging::init_logging;
use velixa::notification::{NotificationCenter, NotificationOptions, TerminalSurface};

/// Form validation from the command line.
#[derive(Parser, Debug)]
#[command(name = "velixa")]
#[command(version, about = "Velixa form validation tool")]
#[command(propagate_version = true)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON record against a JSON rule set
    ///
    /// Exits with status 1 when any field fails.
    Validate {
        /// Rule set file, field name to rule
        #[arg(long)]
        rules: PathBuf,

        /// Record file, field name to value
        #[arg(long)]
        record: PathBuf,
    },

    /// Score a password
    Password {
        /// Password to score
        value: String,
    },

    /// Check an email address
    Email {
        /// Address to check
        value: String,
    },
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = VelixaConfig::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    // A logger installed by the embedding environment is fine.
    let _ = init_logging(level);
    log::debug!("Loaded configuration: {:?}", config);

    let notifier = NotificationCenter::with_defaults(
        TerminalSurface::stderr(),
        NotificationOptions::from(&config.notifications),
    );
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Validate { rules, record } => {
            commands::validate(&rules, &record, &mut out, &notifier)
        }
        Commands::Password { value } => {
            commands::password(&value, &config.validation, &mut out, &notifier)
        }
        Commands::Email { value } => commands::email(&value, &mut out),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
