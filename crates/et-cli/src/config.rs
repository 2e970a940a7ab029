//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use et_core::{DEFAULT_IDLE_THRESHOLD, TrackingPolicy, duration_from_seconds};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// How idle gaps are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IdleMode {
    /// Always count idle gaps.
    Include,
    /// Never count idle gaps.
    Exclude,
    /// Ask on the terminal each time.
    Ask,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the document property database.
    pub database_path: PathBuf,

    /// Gaps between changes longer than this many seconds need a decision.
    pub idle_timeout_secs: f64,

    /// File names that are never tracked (case-insensitive).
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Host auto-open directory whose documents are never tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_dir: Option<PathBuf>,

    /// Default idle decision.
    pub idle_answer: IdleMode,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("et.db"),
            idle_timeout_secs: DEFAULT_IDLE_THRESHOLD.as_secs_f64(),
            blacklist: Vec::new(),
            startup_dir: None,
            idle_answer: IdleMode::Ask,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources override earlier ones: defaults, the default config
    /// file, `config_path`, then `ET_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("ET_"));

        figment.extract()
    }

    /// Idle threshold, falling back to the default for unusable values.
    pub fn idle_threshold(&self) -> Duration {
        if self.idle_timeout_secs.is_finite() && self.idle_timeout_secs >= 0.0 {
            duration_from_seconds(self.idle_timeout_secs)
        } else {
            tracing::warn!(
                idle_timeout_secs = self.idle_timeout_secs,
                "invalid idle timeout; using default"
            );
            DEFAULT_IDLE_THRESHOLD
        }
    }

    /// Builds the core tracking policy from this configuration.
    pub fn tracking_policy(&self) -> TrackingPolicy {
        let policy = TrackingPolicy::default()
            .with_idle_threshold(self.idle_threshold())
            .with_blacklist(&self.blacklist);
        match &self.startup_dir {
            Some(dir) => policy.with_startup_dir(dir),
            None => policy,
        }
    }
}

/// Returns the platform-specific config directory for et.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("et"))
}

/// Returns the platform-specific data directory for et.
///
/// On Linux: `~/.local/share/et`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("et"))
}
