//! The wire schema of spawn options.
//!
//! A record travels as ten label/value pairs in a fixed order. [`Field::ALL`]
//! is that order; the encoder and both decoders walk it, so the layout is
//! defined here and nowhere else.

use crate::app_type::AppType;
use crate::error::DecodeError;
use crate::options::SpawnOptions;
use crate::spawn_method::SpawnMethod;
use crate::timeout::IdleTimeout;
use std::path::PathBuf;

/// Number of fields in an encoded record.
pub const FIELD_COUNT: usize = 10;

/// Number of tokens in an encoded record (one label and one value per field).
pub const TOKEN_COUNT: usize = FIELD_COUNT * 2;

/// How a field's value is written as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, copied verbatim.
    Text,
    /// `"true"` or `"false"`.
    Bool,
    /// Signed decimal seconds, `-1` = default, `0` = never.
    Timeout,
    /// Unsigned decimal, `0` = unlimited.
    Count,
}

/// One field of the wire schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    AppRoot,
    LowerPrivilege,
    LowestUser,
    Environment,
    SpawnMethod,
    AppType,
    FrameworkSpawnerTimeout,
    AppSpawnerTimeout,
    MaxRequests,
    MemoryLimit,
}

impl Field {
    /// All fields in wire order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::AppRoot,
        Field::LowerPrivilege,
        Field::LowestUser,
        Field::Environment,
        Field::SpawnMethod,
        Field::AppType,
        Field::FrameworkSpawnerTimeout,
        Field::AppSpawnerTimeout,
        Field::MaxRequests,
        Field::MemoryLimit,
    ];

    /// The wire label.
    pub const fn label(self) -> &'static str {
        match self {
            Field::AppRoot => "app_root",
            Field::LowerPrivilege => "lower_privilege",
            Field::LowestUser => "lowest_user",
            Field::Environment => "environment",
            Field::SpawnMethod => "spawn_method",
            Field::AppType => "app_type",
            Field::FrameworkSpawnerTimeout => "framework_spawner_timeout",
            Field::AppSpawnerTimeout => "app_spawner_timeout",
            Field::MaxRequests => "max_requests",
            Field::MemoryLimit => "memory_limit",
        }
    }

    /// How the value is rendered.
    pub const fn kind(self) -> FieldKind {
        match self {
            Field::AppRoot
            | Field::LowestUser
            | Field::Environment
            | Field::SpawnMethod
            | Field::AppType => FieldKind::Text,
            Field::LowerPrivilege => FieldKind::Bool,
            Field::FrameworkSpawnerTimeout | Field::AppSpawnerTimeout => FieldKind::Timeout,
            Field::MaxRequests | Field::MemoryLimit => FieldKind::Count,
        }
    }

    /// Look a field up by its wire label.
    pub fn from_label(label: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.label() == label)
    }

    /// Render this field's value from `options`.
    pub(crate) fn encode(self, options: &SpawnOptions) -> String {
        match self {
            Field::AppRoot => options.app_root.to_string_lossy().into_owned(),
            Field::LowerPrivilege => bool_to_wire(options.lower_privilege).to_string(),
            Field::LowestUser => options.lowest_user.clone(),
            Field::Environment => options.environment.clone(),
            Field::SpawnMethod => options.spawn_method.as_str().to_string(),
            Field::AppType => options.app_type.as_str().to_string(),
            Field::FrameworkSpawnerTimeout => {
                options.framework_spawner_timeout.to_wire().to_string()
            }
            Field::AppSpawnerTimeout => options.app_spawner_timeout.to_wire().to_string(),
            Field::MaxRequests => options.limits.max_requests.to_string(),
            Field::MemoryLimit => options.limits.memory_limit.to_string(),
        }
    }

    /// Parse `raw` and store it into this field of `options`.
    pub(crate) fn decode_into(
        self,
        options: &mut SpawnOptions,
        raw: &str,
    ) -> Result<(), DecodeError> {
        let invalid = |reason: String| DecodeError::InvalidValue {
            field: self.label(),
            value: raw.to_string(),
            reason,
        };

        match self {
            Field::AppRoot => options.app_root = PathBuf::from(raw),
            Field::LowerPrivilege => {
                options.lower_privilege = bool_from_wire(raw)
                    .ok_or_else(|| invalid("expected \"true\" or \"false\"".to_string()))?;
            }
            Field::LowestUser => options.lowest_user = raw.to_string(),
            Field::Environment => {
                if raw.is_empty() {
                    return Err(invalid("must not be empty".to_string()));
                }
                options.environment = raw.to_string();
            }
            Field::SpawnMethod => {
                options.spawn_method = raw
                    .parse::<SpawnMethod>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            Field::AppType => {
                options.app_type = raw
                    .parse::<AppType>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            Field::FrameworkSpawnerTimeout => {
                options.framework_spawner_timeout = timeout_from_wire(raw).map_err(invalid)?;
            }
            Field::AppSpawnerTimeout => {
                options.app_spawner_timeout = timeout_from_wire(raw).map_err(invalid)?;
            }
            Field::MaxRequests => {
                options.limits.max_requests = raw
                    .parse::<u64>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            Field::MemoryLimit => {
                options.limits.memory_limit = raw
                    .parse::<u64>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn bool_to_wire(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn bool_from_wire(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn timeout_from_wire(raw: &str) -> Result<IdleTimeout, String> {
    let secs = raw.parse::<i64>().map_err(|e| e.to_string())?;
    IdleTimeout::try_from(secs).map_err(|e| e.to_string())
}
