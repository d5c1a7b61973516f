//! Command-line entry point
//!
//! Loads every rule set before the document is touched, validates, renders
//! the report and maps the outcome to an exit code.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::config::{Config, OutputFormat};
use crate::output::{render_json, render_text};
use crate::rules::{CurlFetcher, RuleCatalog, RuleFetcher, RuleSource};
use crate::validation::{validate_document, ValidationReport};

/// Exit code for a document without Error-status lines
pub const EXIT_OK: u8 = 0;
/// Exit code for a document with at least one Error-status line
pub const EXIT_INVALID: u8 = 1;
/// Exit code when validation could not run at all
pub const EXIT_FATAL: u8 = 2;

/// Map the outcome of [`validate`] to the process exit code
pub fn exit_code<E>(outcome: &Result<ValidationReport, E>) -> u8 {
    match outcome {
        Ok(report) if report.is_valid() => EXIT_OK,
        Ok(_) => EXIT_INVALID,
        Err(_) => EXIT_FATAL,
    }
}

/// Parse arguments, set up logging and run the validator
pub async fn run() -> ExitCode {
    let config = match Config::from_args_and_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let fetcher = CurlFetcher::new(config.fetch_timeout);
    let outcome = validate(&config, fetcher).await;
    let report = match &outcome {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(exit_code(&outcome));
        }
    };

    let source = config
        .input
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    match config.format {
        OutputFormat::Text => print!("{}", render_text(report, &source)),
        OutputFormat::Json => match render_json(report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to render report: {e}");
                return ExitCode::from(EXIT_FATAL);
            }
        },
    }

    ExitCode::from(exit_code(&outcome))
}

/// Build the catalog, read the document and validate it
pub async fn validate<F: RuleFetcher>(config: &Config, fetcher: F) -> Result<ValidationReport> {
    let catalog = build_catalog(config, fetcher).await?;
    let content = read_input(config.input.as_deref()).await?;
    Ok(validate_document(&content, &catalog))
}

/// Built-in rules, then analyzer rules, then custom rule files.
///
/// Any failure here is fatal: a partial catalog would report known keys as
/// unknown.
pub async fn build_catalog<F: RuleFetcher>(config: &Config, fetcher: F) -> Result<RuleCatalog> {
    let mut catalog = RuleCatalog::with_builtin_rules().context("Failed to load built-in rules")?;

    if let Some(url) = &config.rules_url {
        let source = RuleSource::new(fetcher, url.as_str());
        let rules = source.load(config.cache_dir.as_deref()).await?;
        catalog
            .register(rules)
            .context("Failed to register analyzer rules")?;
    }

    for path in &config.rule_files {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read rule file: {}", path.display()))?;
        let added = catalog.register_rule_file(&content, &path.display().to_string())?;
        log::info!("Loaded {} rules from {}", added, path.display());
    }

    log::info!("Rule catalog holds {} rules", catalog.len());
    Ok(catalog)
}

async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read standard input")?;
            Ok(content)
        }
    }
}
