//! Configuration loading and resolution.
//!
//! Every setting resolves as command-line flag, then environment variable,
//! then built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::collect::BatchOptions;
use crate::error::{EtlError, EtlResult};

pub const DEFAULT_OUT_DIR: &str = "csv";
pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com";
pub const DEFAULT_MOJO_URL: &str = "https://www.boxofficemojo.com";
pub const DEFAULT_NUMBERS_URL: &str = "https://www.the-numbers.com";
pub const DEFAULT_DELAY_MS: u64 = 250;
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Values supplied on the command line. `None` falls through to the
/// environment and then the default.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub omdb_url: Option<String>,
    pub mojo_url: Option<String>,
    pub numbers_url: Option<String>,
    pub delay_ms: Option<u64>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub api_key: Option<String>,
    pub out_dir: PathBuf,
    pub omdb_url: Url,
    pub mojo_url: Url,
    pub numbers_url: Url,
    pub delay: Duration,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl EtlConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> EtlResult<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(overrides: ConfigOverrides, env: F) -> EtlResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = overrides
            .api_key
            .or_else(|| env("OMDB_API_KEY"))
            .filter(|k| !k.trim().is_empty());

        let out_dir = overrides
            .out_dir
            .or_else(|| env("FILM_LEDGER_OUT").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

        let omdb_url = resolve_url(
            "OMDb",
            overrides.omdb_url.or_else(|| env("FILM_LEDGER_OMDB_URL")),
            DEFAULT_OMDB_URL,
        )?;
        let mojo_url = resolve_url(
            "box office",
            overrides.mojo_url.or_else(|| env("FILM_LEDGER_MOJO_URL")),
            DEFAULT_MOJO_URL,
        )?;
        let numbers_url = resolve_url(
            "budget",
            overrides.numbers_url.or_else(|| env("FILM_LEDGER_NUMBERS_URL")),
            DEFAULT_NUMBERS_URL,
        )?;

        let concurrency = overrides.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(EtlError::InvalidSetting {
                name: "concurrency",
                reason: "must be at least 1".into(),
            });
        }

        let timeout_secs = overrides.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(EtlError::InvalidSetting {
                name: "timeout",
                reason: "must be at least one second".into(),
            });
        }

        Ok(Self {
            api_key,
            out_dir,
            omdb_url,
            mojo_url,
            numbers_url,
            delay: Duration::from_millis(overrides.delay_ms.unwrap_or(DEFAULT_DELAY_MS)),
            concurrency,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// The OMDb key, required by the metadata stage only.
    pub fn require_api_key(&self) -> EtlResult<&str> {
        self.api_key.as_deref().ok_or(EtlError::MissingApiKey)
    }

    /// Path of a checkpoint file inside the output directory.
    pub fn checkpoint(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            delay: self.delay,
            concurrency: self.concurrency,
        }
    }
}

fn resolve_url(name: &'static str, value: Option<String>, default: &str) -> EtlResult<Url> {
    let raw = value.unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|source| EtlError::InvalidUrl {
        name,
        value: raw.clone(),
        source,
    })
}

/// Base URL as a string without its trailing slash, ready for path joins.
pub fn base_str(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}
