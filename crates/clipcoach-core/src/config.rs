//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::poller::PollPolicy;

/// Coaching pipeline configuration.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Delay between remote state checks
    pub poll_interval: Duration,
    /// Upper bound on the total readiness wait
    pub max_poll_wait: Duration,
    /// Directory for staged clips (system temp dir when unset)
    pub work_dir: Option<PathBuf>,
    /// Maximum pipelines running at once
    pub max_concurrent: usize,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_poll_wait: Duration::from_secs(300), // 5 minutes
            work_dir: None,
            max_concurrent: 4,
        }
    }
}

/// Smallest accepted delay between state checks.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl CoachConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable source.
    ///
    /// Poll intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let poll_interval = Duration::from_millis(
            lookup("POLL_INTERVAL_MS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(2000),
        );

        Self {
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            max_poll_wait: Duration::from_secs(
                lookup("POLL_MAX_WAIT_SECS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(300),
            ),
            work_dir: lookup("COACH_WORK_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            max_concurrent: lookup("MAX_CONCURRENT_ANALYSES")
                .and_then(|s| s.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(4),
        }
    }

    /// Polling policy derived from the interval and maximum wait.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from_max_wait(self.poll_interval, self.max_poll_wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_poll_policy() {
        let policy = CoachConfig::default().poll_policy();
        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.max_attempts, 150);
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = CoachConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_poll_wait, Duration::from_secs(300));
        assert_eq!(config.max_concurrent, 4);
        assert!(config.work_dir.is_none());
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = CoachConfig::from_lookup(lookup_from(&[
            ("POLL_INTERVAL_MS", "0"),
            ("POLL_MAX_WAIT_SECS", "300"),
        ]));
        assert_eq!(config.poll_interval, MIN_POLL_INTERVAL);
        // 300s at the 100ms floor
        assert_eq!(config.poll_policy().max_attempts, 3000);

        let config = CoachConfig::from_lookup(lookup_from(&[("POLL_INTERVAL_MS", "250")]));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = CoachConfig::from_lookup(lookup_from(&[
            ("POLL_INTERVAL_MS", "fast"),
            ("MAX_CONCURRENT_ANALYSES", "0"),
            ("COACH_WORK_DIR", "  "),
        ]));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_concurrent, 4);
        assert!(config.work_dir.is_none());
    }
}
