//! Sync configuration.
//!
//! Built from defaults, then overridden by `ROSTER_*` environment variables
//! (a `.env` file is honored in development). The binary applies CLI flags
//! on top through the `with_*` setters.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::ConfigError;
use crate::types::record::SourceId;

/// Browser-like identifying header; several county sites reject bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const CRAWFORD: &str = "crawford";
pub const SEBASTIAN: &str = "sebastian";

/// Endpoints for the Crawford County Sheriff roster.
#[derive(Debug, Clone)]
pub struct CrawfordEndpoint {
    pub listing_url: String,
    /// Base that detail links and photo paths are resolved against
    pub site_base: String,
}

impl Default for CrawfordEndpoint {
    fn default() -> Self {
        Self {
            listing_url: "https://inmates.crawfordcountysheriff.org/".to_string(),
            site_base: "https://inmates.crawfordcountysheriff.org/".to_string(),
        }
    }
}

/// Endpoints for the Sebastian County Adult Detention Center roster.
#[derive(Debug, Clone)]
pub struct SebastianEndpoint {
    pub listing_url: String,
    /// Base that relative image sources are resolved against
    pub image_base: String,
}

impl Default for SebastianEndpoint {
    fn default() -> Self {
        Self {
            listing_url: "https://inmate.sebastiancountyar.gov/NewWorld.InmateInquiry/AR0660000"
                .to_string(),
            image_base: "https://inmate.sebastiancountyar.gov/NewWorld.InmateInquiry/"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceEndpoints {
    pub crawford: CrawfordEndpoint,
    pub sebastian: SebastianEndpoint,
}

/// Where a commit writes its artifacts.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub snapshot: PathBuf,
    pub ledger: PathBuf,
    pub metadata: PathBuf,
    /// Delta of identities first seen this run; `None` disables it
    pub newly_added: Option<PathBuf>,
}

impl OutputPaths {
    /// Standard file names inside one output directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            snapshot: dir.join("snapshot.json"),
            ledger: dir.join("database.json"),
            metadata: dir.join("last_updated.json"),
            newly_added: Some(dir.join("newly_added.json")),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

/// What happens to a known identity's stored payload when it is seen again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerPolicy {
    /// Keep the first observation forever; only presence matters.
    #[default]
    InsertOnly,
    /// Overwrite name and image with the latest observation.
    RefreshOnSight,
}

impl FromStr for LedgerPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert_only" | "insert-only" | "insert" => Ok(Self::InsertOnly),
            "refresh_on_sight" | "refresh-on-sight" | "refresh" => Ok(Self::RefreshOnSight),
            other => Err(format!("unknown ledger policy '{}'", other)),
        }
    }
}

/// What an adapter does with a record whose detail lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFailure {
    /// Drop the record and keep going.
    #[default]
    Skip,
    /// Emit the record with the no-image sentinel.
    Placeholder,
}

impl FromStr for DetailFailure {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(format!("unknown detail failure policy '{}'", other)),
        }
    }
}

/// Configuration for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub endpoints: SourceEndpoints,

    /// Sent as `User-Agent` on every request
    pub user_agent: String,

    /// Time box for each individual page request
    pub request_timeout: Duration,

    /// Time box for a whole adapter, detail lookups included
    pub adapter_deadline: Duration,

    pub outputs: OutputPaths,

    pub ledger_policy: LedgerPolicy,

    pub detail_failure: DetailFailure,

    /// Fan adapters out concurrently; output order is unaffected
    pub concurrent: bool,

    /// Restrict the run to these sources (empty = all registered)
    pub enabled_sources: Vec<SourceId>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoints: SourceEndpoints::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            adapter_deadline: Duration::from_secs(300),
            outputs: OutputPaths::default(),
            ledger_policy: LedgerPolicy::default(),
            detail_failure: DetailFailure::default(),
            concurrent: false,
            enabled_sources: Vec::new(),
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("ROSTER_OUTPUT_DIR") {
            config.outputs = OutputPaths::in_dir(dir);
        }
        if let Some(url) = lookup("ROSTER_CRAWFORD_URL") {
            config.endpoints.crawford.listing_url = url;
        }
        if let Some(base) = lookup("ROSTER_CRAWFORD_BASE") {
            config.endpoints.crawford.site_base = base;
        }
        if let Some(url) = lookup("ROSTER_SEBASTIAN_URL") {
            config.endpoints.sebastian.listing_url = url;
        }
        if let Some(base) = lookup("ROSTER_SEBASTIAN_IMAGE_BASE") {
            config.endpoints.sebastian.image_base = base;
        }
        if let Some(agent) = lookup("ROSTER_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = lookup("ROSTER_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = parse_secs("ROSTER_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("ROSTER_ADAPTER_DEADLINE_SECS") {
            config.adapter_deadline = parse_secs("ROSTER_ADAPTER_DEADLINE_SECS", &secs)?;
        }
        if let Some(policy) = lookup("ROSTER_LEDGER_POLICY") {
            config.ledger_policy = policy.parse().map_err(|reason| ConfigError::Invalid {
                key: "ROSTER_LEDGER_POLICY".to_string(),
                reason,
            })?;
        }
        if let Some(policy) = lookup("ROSTER_DETAIL_FAILURE") {
            config.detail_failure = policy.parse().map_err(|reason| ConfigError::Invalid {
                key: "ROSTER_DETAIL_FAILURE".to_string(),
                reason,
            })?;
        }
        if let Some(flag) = lookup("ROSTER_CONCURRENT") {
            config.concurrent = parse_bool("ROSTER_CONCURRENT", &flag)?;
        }
        if let Some(sources) = lookup("ROSTER_SOURCES") {
            config.enabled_sources = sources
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(SourceId::from)
                .collect();
        }

        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.outputs = OutputPaths::in_dir(dir);
        self
    }

    pub fn with_outputs(mut self, outputs: OutputPaths) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_adapter_deadline(mut self, deadline: Duration) -> Self {
        self.adapter_deadline = deadline;
        self
    }

    pub fn with_ledger_policy(mut self, policy: LedgerPolicy) -> Self {
        self.ledger_policy = policy;
        self
    }

    pub fn with_detail_failure(mut self, policy: DetailFailure) -> Self {
        self.detail_failure = policy;
        self
    }

    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<SourceId>>) -> Self {
        self.enabled_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a source should run under the current filter.
    pub fn is_enabled(&self, source: &SourceId) -> bool {
        self.enabled_sources.is_empty() || self.enabled_sources.contains(source)
    }
}

fn parse_secs(key: &str, value: &str) -> std::result::Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
