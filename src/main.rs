//! api-diff: breaking-change detection for OpenAPI documents
//!
//! Compares two revisions of an API description and classifies every
//! difference by how likely it is to break existing clients.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use api_diff::{
    changes::Level,
    cli::{self, DiffPaths},
    config::{AppConfig, BehaviorConfig, ChecksConfig, MatchingConfig, OutputConfig},
    policy::DeprecationPolicy,
    reports::ReportFormat,
};
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "api-diff")]
#[command(version)]
#[command(about = "Breaking-change detection for OpenAPI documents", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Nothing at or above --fail-on
    1  A change at or above --fail-on was reported
    3  Error occurred

EXAMPLES:
    # Breaking changes only
    api-diff breaking base.yaml revision.yaml

    # Full changelog as JSON
    api-diff changelog base.yaml revision.yaml --format json

    # CI gate
    api-diff breaking base.yaml revision.yaml --fail-on ERR")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "API_DIFF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// The documents to compare and how to align their paths
#[derive(Args)]
struct CompareArgs {
    /// Path to the base document
    base: PathBuf,

    /// Path to the revision document
    revision: PathBuf,

    /// Match paths that differ only in parameter names
    #[arg(long)]
    match_path_params: bool,

    /// Prefix to strip from base paths before matching
    #[arg(long)]
    strip_prefix_base: Option<String>,

    /// Prefix to strip from revision paths before matching
    #[arg(long)]
    strip_prefix_revision: Option<String>,

    /// Output format
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `diff` subcommand
#[derive(Args)]
struct DiffArgs {
    #[command(flatten)]
    compare: CompareArgs,

    /// Exit with code 1 when the documents differ
    #[arg(long)]
    fail_on_diff: bool,
}

/// Arguments for the `breaking` and `changelog` subcommands
#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    compare: CompareArgs,

    /// Exit with code 1 when a change at or above this level is reported
    #[arg(long, value_enum)]
    fail_on: Option<Level>,

    /// Minimum level to report
    #[arg(long, value_enum)]
    level: Option<Level>,

    /// File of `rule-id LEVEL` overrides
    #[arg(long)]
    severity_levels: Option<PathBuf>,

    /// Override one rule, as RULE=LEVEL (LEVEL may be NONE). Repeatable.
    #[arg(long = "severity", value_name = "RULE=LEVEL", value_parser = parse_severity)]
    severities: Vec<(String, String)>,

    /// Comma-separated checks to run (default: all)
    #[arg(long, value_delimiter = ',')]
    checks: Vec<String>,

    /// Extension keys to copy onto changes, e.g. x-owner
    #[arg(long, value_delimiter = ',')]
    attributes: Vec<String>,

    /// Minimum sunset notice, in days, for beta operations
    #[arg(long)]
    deprecation_days_beta: Option<u32>,

    /// Minimum sunset notice, in days, for stable operations
    #[arg(long)]
    deprecation_days_stable: Option<u32>,

    /// Evaluate sunset dates as of this day (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the structural diff between two documents
    Diff(DiffArgs),

    /// Report changes at WARN or above
    Breaking(CheckArgs),

    /// Report every change, including INFO
    Changelog(CheckArgs),

    /// List checks and the rules they own
    Checks {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (defaults merged with the file)
    Show,
    /// Generate an example .api-diff.yaml in the current directory
    Init,
}

fn parse_severity(raw: &str) -> Result<(String, String), String> {
    let (id, level) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected RULE=LEVEL, got '{raw}'"))?;
    api_diff::config::parse_level_token(level)?;
    Ok((id.trim().to_string(), level.trim().to_string()))
}

impl CompareArgs {
    fn paths(&self) -> DiffPaths {
        DiffPaths::new(&self.base, &self.revision)
    }

    fn overrides(&self, quiet: bool) -> AppConfig {
        AppConfig {
            matching: MatchingConfig {
                match_path_params: self.match_path_params,
                strip_prefix_base: self.strip_prefix_base.clone(),
                strip_prefix_revision: self.strip_prefix_revision.clone(),
            },
            output: OutputConfig {
                format: self.format.unwrap_or_default(),
                file: self.output_file.clone(),
            },
            behavior: BehaviorConfig {
                quiet,
                ..BehaviorConfig::default()
            },
            ..AppConfig::default()
        }
    }
}

impl CheckArgs {
    fn overrides(&self, quiet: bool) -> AppConfig {
        let mut config = self.compare.overrides(quiet);
        config.checks = ChecksConfig {
            enabled: self.checks.clone(),
            severity_levels: self.severity_levels.clone(),
            overrides: self.severities.iter().cloned().collect::<BTreeMap<_, _>>(),
            attributes: self.attributes.clone(),
        };
        config.deprecation = DeprecationPolicy::new(
            self.deprecation_days_beta.unwrap_or(0),
            self.deprecation_days_stable.unwrap_or(0),
        );
        config.behavior.fail_on = self.fail_on;
        config.behavior.level = self.level;
        config
    }
}

/// Layer CLI settings over the discovered config file.
fn load_config(path: Option<&std::path::Path>, overrides: &AppConfig) -> AppConfig {
    let (config, loaded_from) = AppConfig::from_file_with_overrides(path, overrides);
    if let Some(file) = loaded_from {
        tracing::debug!("Loaded configuration from {}", file.display());
    }
    config
}

fn exit_with(code: i32) -> Result<()> {
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(code) => exit_with(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(api_diff::pipeline::exit_codes::ERROR);
        }
    }
}

/// Dispatch to command handlers, returning the exit code.
fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Diff(args) => {
            let mut overrides = args.compare.overrides(cli.quiet);
            if args.fail_on_diff {
                overrides.behavior.fail_on = Some(Level::Info);
            }
            let config = load_config(cli.config.as_deref(), &overrides);
            cli::run_diff(&config, &args.compare.paths())
        }

        Commands::Breaking(args) => {
            let config = load_config(cli.config.as_deref(), &args.overrides(cli.quiet));
            cli::run_check(&config, &args.compare.paths(), Level::Warn, args.date)
        }

        Commands::Changelog(args) => {
            let config = load_config(cli.config.as_deref(), &args.overrides(cli.quiet));
            cli::run_check(&config, &args.compare.paths(), Level::Info, args.date)
        }

        Commands::Checks { format } => cli::run_list_checks(format).map(|()| 0),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "api-diff", &mut io::stdout());
            Ok(0)
        }

        Commands::ConfigSchema { output } => {
            let schema = api_diff::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(0)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    api_diff::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(0)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".api-diff.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, api_diff::config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(0)
            }
        },
    }
}
