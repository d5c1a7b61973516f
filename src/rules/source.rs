//! External Rule Source
//!
//! Produces the analyzer-diagnostic rule set: read from the local cache file
//! when present, otherwise fetch the remote rule document once, parse it and
//! persist it for the next run.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use super::error::RuleSourceError;
use super::schema::{AnalyzerReport, AnalyzerRule, Rule};

/// File name of the rule cache inside the cache directory
pub const CACHE_FILE_NAME: &str = "code_quality_rules.json";

/// Latest published NetAnalyzers rule document
pub const DEFAULT_RULES_URL: &str = "https://github.com/dotnet/roslyn-analyzers/raw/main/src/NetAnalyzers/Microsoft.CodeAnalysis.NetAnalyzers.sarif";

/// Transport used to download the remote rule document
pub trait RuleFetcher {
    /// Perform one GET request and return the response body
    fn fetch(&self, url: &str) -> impl Future<Output = io::Result<Vec<u8>>>;
}

impl<T: RuleFetcher + ?Sized> RuleFetcher for &T {
    fn fetch(&self, url: &str) -> impl Future<Output = io::Result<Vec<u8>>> {
        (**self).fetch(url)
    }
}

/// Fetches over HTTP(S) by running the system `curl`
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    timeout: Duration,
}

impl CurlFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Hard limit on the whole curl run, a little past its own `--max-time`
    fn deadline(&self) -> Duration {
        self.timeout.saturating_add(Duration::from_secs(5))
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl RuleFetcher for CurlFetcher {
    async fn fetch(&self, url: &str) -> io::Result<Vec<u8>> {
        let max_time = self.timeout.as_secs().max(1).to_string();
        let mut command = Command::new("curl");
        command
            .args(["-sSfL", "--max-time", &max_time, url])
            .kill_on_drop(true);

        // curl enforces --max-time itself; this is the backstop if it hangs
        let output = tokio::time::timeout(self.deadline(), command.output())
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no response after {}s", max_time),
                )
            })??;

        if !output.status.success() {
            return Err(io::Error::other(format!(
                "curl exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

/// Loads analyzer rules from the cache or the remote rule document
#[derive(Debug, Clone)]
pub struct RuleSource<F> {
    fetcher: F,
    url: String,
}

impl<F: RuleFetcher> RuleSource<F> {
    pub fn new(fetcher: F, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Load the analyzer rules as catalog rules
    pub async fn load(&self, cache_dir: Option<&Path>) -> Result<Vec<Rule>, RuleSourceError> {
        let records = self.load_records(cache_dir).await?;
        Ok(records.iter().map(Rule::from).collect())
    }

    /// Load the raw analyzer records.
    ///
    /// A cache file that exists but cannot be read or parsed is an error; it
    /// never falls back to the network. Nothing is written to the cache
    /// unless the fetched document parsed completely.
    pub async fn load_records(
        &self,
        cache_dir: Option<&Path>,
    ) -> Result<Vec<AnalyzerRule>, RuleSourceError> {
        if let Some(dir) = cache_dir {
            let path = cache_file_path(dir);
            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| RuleSourceError::CacheCorrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            if exists {
                let records = read_cache(&path).await?;
                log::info!("Loaded {} analyzer rules from {}", records.len(), path.display());
                return Ok(records);
            }
        }

        log::info!("Fetching analyzer rules from {}", self.url);
        let body = self
            .fetcher
            .fetch(&self.url)
            .await
            .map_err(|source| RuleSourceError::FetchFailed {
                url: self.url.clone(),
                source,
            })?;

        let report: AnalyzerReport =
            serde_json::from_slice(&body).map_err(|source| RuleSourceError::ParseFailed {
                url: self.url.clone(),
                source,
            })?;
        let records = report.into_records();
        log::info!("Fetched {} analyzer rules", records.len());

        if let Some(dir) = cache_dir {
            match write_cache(dir, &records).await {
                Ok(path) => log::debug!("Wrote rule cache {}", path.display()),
                Err(e) => log::warn!("Failed to write rule cache in {}: {}", dir.display(), e),
            }
        }

        Ok(records)
    }
}

/// Location of the rule cache inside `cache_dir`
pub fn cache_file_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_FILE_NAME)
}

/// Read and deserialize a rule cache file
pub async fn read_cache(path: &Path) -> Result<Vec<AnalyzerRule>, RuleSourceError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| RuleSourceError::CacheCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    serde_json::from_slice(&content).map_err(|e| RuleSourceError::CacheCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize `records` into the cache file under `cache_dir`.
///
/// The file is written next to its final name and renamed into place, so
/// the cache is either complete or absent.
pub async fn write_cache(cache_dir: &Path, records: &[AnalyzerRule]) -> io::Result<PathBuf> {
    let content = serde_json::to_vec_pretty(records)?;

    tokio::fs::create_dir_all(cache_dir).await?;
    let path = cache_file_path(cache_dir);
    let staging = path.with_extension("json.tmp");

    tokio::fs::write(&staging, content).await?;
    if let Err(e) = tokio::fs::rename(&staging, &path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }

    Ok(path)
}
