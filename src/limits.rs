//! Resource limits for spawned applications.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;

/// Limits the spawned application runs under.
///
/// A value of 0 means unlimited for every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Requests the application may process before it exits.
    ///
    /// Default: 0 (unlimited).
    pub max_requests: u64,

    /// Memory the application may use, in megabytes.
    ///
    /// Default: 0 (unlimited).
    pub memory_limit: u64,
}

impl ResourceLimits {
    /// Set the maximum number of requests.
    pub fn with_max_requests(mut self, max: u64) -> Self {
        self.max_requests = max;
        self
    }

    /// Set the memory limit in megabytes.
    pub fn with_memory_limit(mut self, megabytes: u64) -> Self {
        self.memory_limit = megabytes;
        self
    }

    /// Request limit, or `None` if unlimited.
    pub fn max_requests_limit(&self) -> Option<NonZeroU64> {
        NonZeroU64::new(self.max_requests)
    }

    /// Memory limit in bytes, or `None` if unlimited.
    ///
    /// Saturates at `u64::MAX` for absurdly large megabyte values.
    pub fn memory_limit_bytes(&self) -> Option<u64> {
        NonZeroU64::new(self.memory_limit).map(|mb| mb.get().saturating_mul(1024 * 1024))
    }

    /// True when neither limit is set.
    pub fn is_unlimited(&self) -> bool {
        self.max_requests == 0 && self.memory_limit == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let limits = ResourceLimits::default();
        assert!(limits.is_unlimited());
        assert_eq!(limits.max_requests_limit(), None);
        assert_eq!(limits.memory_limit_bytes(), None);
    }

    #[test]
    fn test_memory_limit_bytes() {
        let limits = ResourceLimits::default().with_memory_limit(256);
        assert_eq!(limits.memory_limit_bytes(), Some(256 * 1024 * 1024));
        assert!(!limits.is_unlimited());
    }

    #[test]
    fn test_memory_limit_saturates() {
        let limits = ResourceLimits::default().with_memory_limit(u64::MAX);
        assert_eq!(limits.memory_limit_bytes(), Some(u64::MAX));
    }

    #[test]
    fn test_max_requests() {
        let limits = ResourceLimits::default().with_max_requests(1000);
        assert_eq!(limits.max_requests_limit().map(NonZeroU64::get), Some(1000));
    }
}
