//! Configuration management for the EditorConfig validator.
//!
//! Handles:
//! - Command-line argument parsing
//! - Rule cache and custom rule file locations

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::rules::DEFAULT_RULES_URL;

const APP_DIR: &str = "editorconfig-validator";
const USER_RULES_FILE: &str = "rules.toml";

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command-line arguments for the EditorConfig validator
#[derive(Debug, Parser)]
#[command(name = "editorconfig-validator")]
#[command(about = "Validate .editorconfig files line by line")]
#[command(version)]
pub struct Args {
    /// File to validate, or '-' to read standard input
    #[arg(default_value = ".editorconfig")]
    pub path: PathBuf,

    /// Directory holding the analyzer rule cache
    #[arg(long, help = "Directory for the analyzer rule cache")]
    pub cache_dir: Option<PathBuf>,

    /// Never read or write the analyzer rule cache
    #[arg(long, conflicts_with = "cache_dir")]
    pub no_cache: bool,

    /// Skip analyzer rules entirely
    #[arg(long, help = "Only use built-in and custom rules")]
    pub offline: bool,

    /// Remote analyzer rule document
    #[arg(long, default_value = DEFAULT_RULES_URL)]
    pub rules_url: String,

    /// Additional TOML rule files
    #[arg(long = "rules", value_name = "FILE")]
    pub rule_files: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Timeout for the rule download, in seconds (1 to 3600)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub fetch_timeout: u64,

    /// Log level for the validator
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Document to validate; `None` means standard input
    pub input: Option<PathBuf>,
    /// Cache directory, `None` when caching is disabled
    pub cache_dir: Option<PathBuf>,
    /// Where to fetch analyzer rules from, `None` in offline mode
    pub rules_url: Option<String>,
    /// Custom rule files, in registration order
    pub rule_files: Vec<PathBuf>,
    pub format: OutputFormat,
    pub fetch_timeout: Duration,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let input = (args.path.as_os_str() != "-").then_some(args.path);

        let cache_dir = if args.no_cache {
            None
        } else {
            args.cache_dir
                .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR)))
        };

        let mut rule_files = Vec::new();

        // User-global rules first, explicit files after
        if let Some(config_dir) = dirs::config_dir() {
            let user_rules = config_dir.join(APP_DIR).join(USER_RULES_FILE);
            if user_rules.is_file() {
                rule_files.push(user_rules);
            }
        }
        rule_files.extend(args.rule_files);

        Ok(Config {
            input,
            cache_dir,
            rules_url: (!args.offline).then_some(args.rules_url),
            rule_files,
            format: args.format,
            fetch_timeout: Duration::from_secs(args.fetch_timeout),
            log_level: args.log_level,
        })
    }
}
