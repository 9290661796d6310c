//! Engine configuration
//!
//! Owned by the caller and injected at job start; the engine keeps no
//! settings state of its own. Settings persistence is the host's
//! concern.

use core_match::MatchTier;
use std::time::Duration;

/// Migration engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Loosest match tier resolution may escalate to. `Exact` disables
    /// the fuzzy tiers entirely.
    pub max_tier: MatchTier,

    /// Minimum delay between consecutive outbound calls to the
    /// destination service, regardless of call origin
    pub min_call_delay: Duration,

    /// Resolve and report without mutating the destination
    pub dry_run: bool,

    /// Attempt cap for transient-failure retries on remote calls
    pub retry_attempts: u32,

    /// Maximum candidates examined per search query
    pub search_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_tier: MatchTier::Exact,
            min_call_delay: Duration::from_millis(100),
            dry_run: false,
            retry_attempts: 3,
            search_limit: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_tier, MatchTier::Exact);
        assert_eq!(config.min_call_delay, Duration::from_millis(100));
        assert!(!config.dry_run);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.search_limit, 20);
    }
}
