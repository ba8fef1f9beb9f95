//! gateaccess CLI - gate access INSERTs from CRM contacts and locations

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gateaccess_core::{Config, Strategy};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod commands;

#[derive(Parser)]
#[command(name = "gateaccess")]
#[command(version)]
#[command(
    about = "Generate INSERTs for the gate access table from contact CSVs and a locations JSON",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level: debug, info, warning, error
    #[arg(long, global = true, value_enum, ignore_case = true, default_value = "info")]
    log: LogLevel,

    /// Show detailed matching information
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate INSERT statements
    Generate {
        /// Path to locations JSON
        #[arg(short = 'j', long = "json")]
        json: Option<String>,

        /// Paths to contact CSV files, processed in order
        #[arg(short = 'c', long = "csv", num_args = 1.., required = true)]
        csv: Vec<String>,

        /// Output SQL file ("-" for stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Matching strategy (text, positional)
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Double single quotes inside client names
        #[arg(long)]
        escape_quotes: bool,
    },

    /// Show the lookup keys built from a locations JSON
    Locations {
        /// Path to locations JSON
        #[arg(short = 'j', long = "json")]
        json: Option<String>,

        /// Matching strategy (text, positional)
        #[arg(long)]
        strategy: Option<Strategy>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write the current configuration to the config file
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        cli.log.into()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .parse_lossy(""),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            json,
            csv,
            output,
            strategy,
            escape_quotes,
        } => {
            commands::apply_overrides(&mut config, strategy, escape_quotes);
            commands::generate::run(
                &config,
                json.as_deref(),
                &csv,
                output.as_deref(),
                cli.verbose,
            )
        }

        Commands::Locations { json, strategy } => {
            commands::apply_overrides(&mut config, strategy, false);
            commands::locations::run(&config, json.as_deref())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::show_path(cli.config.as_deref()),
            ConfigAction::Init => commands::config::init(&config, cli.config.as_deref()),
        },
    }
}
