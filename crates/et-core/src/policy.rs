//! Which documents get tracked, and when a quiet spell counts as idle.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::DocumentKey;

/// Default idle threshold (2 minutes).
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(120);

/// Tracking rules supplied by configuration.
#[derive(Debug, Clone)]
pub struct TrackingPolicy {
    /// Gaps between changes longer than this trigger an idle decision.
    pub idle_threshold: Duration,
    /// Lowercased file names that are never tracked.
    blacklist: HashSet<String>,
    /// Host auto-open directory; documents loaded from here are never tracked.
    pub startup_dir: Option<PathBuf>,
}

impl Default for TrackingPolicy {
    fn default() -> Self {
        Self {
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            blacklist: HashSet::new(),
            startup_dir: None,
        }
    }
}

impl TrackingPolicy {
    #[must_use]
    pub fn with_idle_threshold(mut self, idle_threshold: Duration) -> Self {
        self.idle_threshold = idle_threshold;
        self
    }

    /// Adds file names to the blacklist. Matching ignores case.
    #[must_use]
    pub fn with_blacklist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blacklist
            .extend(names.into_iter().map(|name| name.as_ref().to_lowercase()));
        self
    }

    #[must_use]
    pub fn with_startup_dir(mut self, startup_dir: impl Into<PathBuf>) -> Self {
        self.startup_dir = Some(startup_dir.into());
        self
    }

    fn is_blacklisted(&self, key: &DocumentKey) -> bool {
        self.blacklist.contains(&key.file_name().to_lowercase())
    }

    fn in_startup_dir(&self, key: &DocumentKey) -> bool {
        match (&self.startup_dir, key.directory()) {
            (Some(startup), Some(dir)) => startup.as_path() == dir,
            _ => false,
        }
    }

    /// Whether a newly opened document should get a timer.
    pub fn should_track(&self, key: &DocumentKey) -> bool {
        !self.is_blacklisted(key) && !self.in_startup_dir(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> DocumentKey {
        DocumentKey::new(name).unwrap()
    }

    #[test]
    fn default_policy_tracks_everything() {
        let policy = TrackingPolicy::default();
        assert_eq!(policy.idle_threshold, Duration::from_secs(120));
        assert!(policy.should_track(&key("/docs/a.xlsx")));
        assert!(policy.should_track(&key("Book1")));
    }

    #[test]
    fn blacklist_ignores_case() {
        let policy = TrackingPolicy::default().with_blacklist(["Personal.XLSB"]);
        assert!(!policy.should_track(&key("/startup/personal.xlsb")));
        assert!(!policy.should_track(&key("/other/PERSONAL.xlsb")));
        assert!(policy.should_track(&key("/other/personal.xlsx")));
        assert!(!policy.should_track(&key(r"C:\Users\ana\XLSTART\PERSONAL.XLSB")));
    }

    #[test]
    fn startup_dir_documents_are_skipped() {
        let policy = TrackingPolicy::default().with_startup_dir("/opt/host/xlstart");
        assert!(!policy.should_track(&key("/opt/host/xlstart/macros.xlsm")));
        assert!(policy.should_track(&key("/opt/host/xlstart/nested/macros.xlsm")));
        assert!(policy.should_track(&key("Book1")));
    }

    #[test]
    fn windows_startup_dir_matches_backslash_keys() {
        let policy = TrackingPolicy::default().with_startup_dir(r"C:\Program Files\Host\XLSTART");
        assert!(!policy.should_track(&key(r"C:\Program Files\Host\XLSTART\macros.xlsm")));
        assert!(policy.should_track(&key(r"C:\Users\ana\macros.xlsm")));
    }
}
