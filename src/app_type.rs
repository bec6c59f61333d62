//! Application type tags.

use crate::error::ParseKindError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kind of application being spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// Ruby on Rails application (default).
    #[default]
    Rails,
    /// Rack application.
    Rack,
    /// Python WSGI application.
    Wsgi,
}

impl AppType {
    /// All application types in wire order.
    pub const ALL: [AppType; 3] = [AppType::Rails, AppType::Rack, AppType::Wsgi];

    /// The wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AppType::Rails => "rails",
            AppType::Rack => "rack",
            AppType::Wsgi => "wsgi",
        }
    }

    /// Environment variable through which the application reads its environment name.
    ///
    /// WSGI has no such convention.
    pub const fn environment_variable(&self) -> Option<&'static str> {
        match self {
            AppType::Rails => Some("RAILS_ENV"),
            AppType::Rack => Some("RACK_ENV"),
            AppType::Wsgi => None,
        }
    }
}

impl std::fmt::Display for AppType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseKindError {
                kind: "application type",
                value: s.to_string(),
                expected: "rails, rack, wsgi",
            })
    }
}
