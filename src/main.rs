// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::app_config::Config;
use crate::database::{DatabaseConnection, Repository};
use crate::pipeline::{PipelineService, RunRequest};
use crate::providers::OpenRouterTranslator;
use crate::server::ServerState;

mod app_config;
mod database;
mod errors;
mod languages;
mod pipeline;
mod providers;
mod server;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server exposing the batch-translate endpoint
    Serve {
        /// Bind address, overriding the configured one
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Drive the translation job to completion from the CLI
    Run(RunArgs),

    /// Import newline-separated English terms into the card corpus
    Import {
        /// Path to the word list file
        #[arg(value_name = "WORDLIST")]
        path: String,
    },

    /// Show corpus and completion statistics
    Stats,

    /// Generate shell completions for vocabatch
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Target language codes (default: all supported languages)
    #[arg(short, long, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Cards selected per invocation
    #[arg(long)]
    cards_per_run: Option<usize>,

    /// Words per provider call
    #[arg(long)]
    batch_size: Option<usize>,

    /// Languages translated concurrently
    #[arg(long)]
    parallel_languages: Option<usize>,

    /// Resume from this card id
    #[arg(long)]
    continue_from: Option<String>,
}

/// vocabatch - bounded-time vocabulary batch translation
///
/// Translates a corpus of English vocabulary cards into ~70 target languages
/// with an LLM provider, in resumable, time-bounded batches.
#[derive(Parser, Debug)]
#[command(name = "vocabatch")]
#[command(version = "1.0.0")]
#[command(about = "Resumable LLM batch translation for vocabulary corpora")]
#[command(long_about = "vocabatch translates English vocabulary cards into ~70 target languages.

EXAMPLES:
    vocabatch serve                              # Expose POST /v1/batch-translate
    vocabatch run                                # Translate the whole corpus
    vocabatch run -l fr,es,de                    # Only these target languages
    vocabatch run --cards-per-run 20             # Bigger batches per invocation
    vocabatch import words.txt                   # Seed the corpus from a word list
    vocabatch stats                              # Corpus and completion counts
    vocabatch completions bash > vocabatch.bash  # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json by default (see --config). The
    OpenRouter API key comes from the config file or the OPENROUTER_API_KEY
    environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Database file path, overriding the configured one
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// Timestamped, colored stderr logger
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} [{}] {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize with info level; raised or lowered after the CLI is parsed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        log::set_max_level(level.clone().into());
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "vocabatch", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config_path)?;
    config.validate()?;

    if cli.log_level.is_none() {
        log::set_max_level(match config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        });
    }

    let repo = open_repository(&cli, &config)?;

    match cli.command {
        Commands::Serve { addr } => {
            let service = build_service(&config, repo.clone())?;
            let bind_addr = addr.unwrap_or_else(|| config.server.bind_addr.clone());
            server::run_server(ServerState { service, repo }, &bind_addr).await
        }
        Commands::Run(args) => run_job(&config, repo, args).await,
        Commands::Import { path } => import_words(repo, &path).await,
        Commands::Stats => show_stats(&repo),
        Commands::Completions { .. } => unreachable!("handled before config load"),
    }
}

fn open_repository(cli: &CommandLineOptions, config: &Config) -> Result<Repository> {
    let path = cli
        .database
        .clone()
        .or_else(|| config.database_path.clone());

    let db = match path {
        Some(path) => DatabaseConnection::new(path)?,
        None => DatabaseConnection::new_default()?,
    };
    info!("Database: {:?}", db.path());
    Ok(Repository::new(db))
}

fn build_service(config: &Config, repo: Repository) -> Result<PipelineService> {
    let api_key = config.resolve_api_key();
    if api_key.is_empty() {
        return Err(anyhow!(
            "No API key configured; set provider.api_key in the config file or the OPENROUTER_API_KEY environment variable"
        ));
    }

    let translator = Arc::new(OpenRouterTranslator::new(&config.provider, api_key));
    Ok(PipelineService::new(repo, translator, config.pipeline.clone()))
}

async fn run_job(config: &Config, repo: Repository, args: RunArgs) -> Result<()> {
    let service = build_service(config, repo)?;

    let request = RunRequest {
        batch_size: args.batch_size,
        cards_per_run: args.cards_per_run,
        parallel_languages: args.parallel_languages,
        languages: args.languages,
        continue_from: args.continue_from,
    };

    let totals = service.run_to_completion(&request, true).await?;

    println!(
        "Translated {} card(s): {} translation(s), {} error(s) across {} invocation(s) in {:.1}s",
        totals.cards_processed,
        totals.translations,
        totals.errors,
        totals.invocations,
        totals.duration.as_secs_f64()
    );
    Ok(())
}

async fn import_words(repo: Repository, path: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read word list: {}", path))?;

    let cards: Vec<database::models::CardRecord> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|term| database::models::CardRecord::new(term.to_string()))
        .collect();

    if cards.is_empty() {
        return Err(anyhow!("No terms found in {}", path));
    }

    let count = cards.len();
    repo.insert_cards(cards).await?;
    println!("Imported {} card(s) from {}", count, path);
    Ok(())
}

fn show_stats(repo: &Repository) -> Result<()> {
    let stats = repo.connection().stats()?;
    println!("{}", stats);
    Ok(())
}
