//! Idle timeouts for framework and application spawners.
//!
//! On the wire a timeout is a signed number of seconds where `-1` asks for the
//! spawner's default and `0` disables idle shutdown. Positive values cover the
//! full signed 64-bit range.

use crate::error::InvalidTimeout;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use std::time::Duration;

/// Longest timeout the wire can carry.
const MAX_SECS: u64 = i64::MAX as u64;

/// Idle timeout of a spawner process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum IdleTimeout {
    /// Use the spawner's built-in default (wire `-1`).
    #[default]
    Default,

    /// Never shut down for idleness (wire `0`).
    Never,

    /// Shut down after this many idle seconds.
    ///
    /// Values above `i64::MAX` are sent as `i64::MAX`.
    After(NonZeroU64),
}

impl IdleTimeout {
    /// Timeout after `secs` seconds; zero means never.
    pub fn from_secs(secs: u64) -> Self {
        match NonZeroU64::new(secs.min(MAX_SECS)) {
            Some(secs) => IdleTimeout::After(secs),
            None => IdleTimeout::Never,
        }
    }

    /// The signed wire value.
    pub fn to_wire(self) -> i64 {
        match self {
            IdleTimeout::Default => -1,
            IdleTimeout::Never => 0,
            IdleTimeout::After(secs) => i64::try_from(secs.get()).unwrap_or(i64::MAX),
        }
    }

    /// Resolve against the spawner's default.
    ///
    /// Returns `None` when the spawner should never idle out.
    pub fn resolve(self, default: Duration) -> Option<Duration> {
        match self {
            IdleTimeout::Default => Some(default),
            IdleTimeout::Never => None,
            IdleTimeout::After(secs) => Some(Duration::from_secs(secs.get())),
        }
    }
}

impl TryFrom<i64> for IdleTimeout {
    type Error = InvalidTimeout;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(IdleTimeout::Default),
            0 => Ok(IdleTimeout::Never),
            v => u64::try_from(v)
                .ok()
                .and_then(NonZeroU64::new)
                .map(IdleTimeout::After)
                .ok_or(InvalidTimeout(v)),
        }
    }
}

impl From<IdleTimeout> for i64 {
    fn from(timeout: IdleTimeout) -> Self {
        timeout.to_wire()
    }
}

impl std::fmt::Display for IdleTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdleTimeout::Default => f.write_str("default"),
            IdleTimeout::Never => f.write_str("never"),
            IdleTimeout::After(secs) => write!(f, "{}s", secs),
        }
    }
}
