//! Spawn method selection.

use crate::error::ParseKindError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the spawner starts application processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnMethod {
    /// Preload the framework and application once, then fork workers from it (default).
    #[default]
    Smart,

    /// Start every worker from scratch.
    ///
    /// Slower, but works with applications that are not fork-safe.
    Conservative,
}

impl SpawnMethod {
    /// All spawn methods in wire order.
    pub const ALL: [SpawnMethod; 2] = [SpawnMethod::Smart, SpawnMethod::Conservative];

    /// The wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpawnMethod::Smart => "smart",
            SpawnMethod::Conservative => "conservative",
        }
    }
}

impl std::fmt::Display for SpawnMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpawnMethod {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpawnMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseKindError {
                kind: "spawn method",
                value: s.to_string(),
                expected: "smart, conservative",
            })
    }
}
