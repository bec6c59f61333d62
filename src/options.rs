//! The spawn options record.
//!
//! `SpawnOptions` carries everything a spawner needs to know to start an
//! application: where it lives, which environment and application type it
//! runs as, how it is spawned, and the limits it runs under.
//!
//! # Privilege lowering
//!
//! If `lower_privilege` is set, the spawner switches the application to the
//! user owning the application's startup file. When that user does not exist
//! or is root, it falls back to `lowest_user`. Lowering is only possible when
//! the spawner itself runs as root (see [`SpawnOptions::will_lower_privilege`]).

use crate::app_type::AppType;
use crate::error::Violation;
use crate::limits::ResourceLimits;
use crate::spawn_method::SpawnMethod;
use crate::timeout::IdleTimeout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default fallback identity for privilege lowering.
pub const DEFAULT_LOWEST_USER: &str = "nobody";

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Parameters for spawning one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnOptions {
    /// Root directory of the application.
    ///
    /// For a Rails application this is the directory containing `app/`,
    /// `config/` and `public/`. It does not have to be absolute.
    pub app_root: PathBuf,

    /// Whether to lower the application's privileges.
    pub lower_privilege: bool,

    /// User to fall back to when lowering privilege to the owner fails.
    pub lowest_user: String,

    /// Environment name (`RAILS_ENV` / `RACK_ENV`). Must not be empty.
    pub environment: String,

    /// Spawn method.
    pub spawn_method: SpawnMethod,

    /// Application type.
    pub app_type: AppType,

    /// Idle timeout of framework spawners.
    pub framework_spawner_timeout: IdleTimeout,

    /// Idle timeout of application spawners.
    pub app_spawner_timeout: IdleTimeout,

    /// Request and memory limits.
    #[serde(flatten)]
    pub limits: ResourceLimits,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            app_root: PathBuf::new(),
            lower_privilege: true,
            lowest_user: DEFAULT_LOWEST_USER.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            spawn_method: SpawnMethod::default(),
            app_type: AppType::default(),
            framework_spawner_timeout: IdleTimeout::Default,
            app_spawner_timeout: IdleTimeout::Default,
            limits: ResourceLimits::default(),
        }
    }
}

impl SpawnOptions {
    /// Options for the application at `app_root`, everything else defaulted.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
            ..Self::default()
        }
    }

    /// Create a builder for the application at `app_root`.
    pub fn builder(app_root: impl Into<PathBuf>) -> SpawnOptionsBuilder {
        SpawnOptionsBuilder::new(app_root)
    }

    /// Check the record's invariants.
    ///
    /// # Errors
    ///
    /// - `EnvironmentEmpty` if the environment name is empty
    /// - `AppRootEmpty` / `AppRootNotUtf8` if the root cannot be sent
    /// - `NulInField` if a text field could not cross a message channel
    ///
    /// An empty or `root` fallback identity is allowed and only logged; see
    /// [`SpawnOptions::check_lowering_fallback`] for the strict check.
    pub fn validate(&self) -> Result<(), Violation> {
        if self.environment.is_empty() {
            return Err(Violation::EnvironmentEmpty);
        }

        if self.app_root.as_os_str().is_empty() {
            return Err(Violation::AppRootEmpty);
        }

        let app_root = self.app_root.to_str().ok_or_else(|| Violation::AppRootNotUtf8 {
            path: self.app_root.display().to_string(),
        })?;

        for (field, value) in [
            ("app_root", app_root),
            ("lowest_user", self.lowest_user.as_str()),
            ("environment", self.environment.as_str()),
        ] {
            if value.contains('\0') {
                return Err(Violation::NulInField { field });
            }
        }

        if self.lower_privilege {
            if let Err(violation) = self.check_lowering_fallback() {
                tracing::warn!(
                    lowest_user = %self.lowest_user,
                    %violation,
                    "Privilege lowering has no usable fallback identity"
                );
            }
        } else if crate::privilege::running_as_root() {
            tracing::warn!(
                app_root = %self.app_root.display(),
                "Privilege lowering disabled while running as root"
            );
        }

        Ok(())
    }
}

/// Builder for `SpawnOptions`.
///
/// Every field starts at its default; `build()` validates the result.
#[derive(Debug, Clone)]
pub struct SpawnOptionsBuilder {
    options: SpawnOptions,
}

impl SpawnOptionsBuilder {
    /// Create a builder with default settings.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            options: SpawnOptions::new(app_root),
        }
    }

    /// Enable or disable privilege lowering.
    pub fn lower_privilege(mut self, lower: bool) -> Self {
        self.options.lower_privilege = lower;
        self
    }

    /// Set the fallback identity.
    pub fn lowest_user(mut self, user: impl Into<String>) -> Self {
        self.options.lowest_user = user.into();
        self
    }

    /// Set the environment name.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.options.environment = environment.into();
        self
    }

    /// Set the spawn method.
    pub fn spawn_method(mut self, method: SpawnMethod) -> Self {
        self.options.spawn_method = method;
        self
    }

    /// Set the application type.
    pub fn app_type(mut self, app_type: AppType) -> Self {
        self.options.app_type = app_type;
        self
    }

    /// Set the framework spawner idle timeout.
    pub fn framework_spawner_timeout(mut self, timeout: IdleTimeout) -> Self {
        self.options.framework_spawner_timeout = timeout;
        self
    }

    /// Set the application spawner idle timeout.
    pub fn app_spawner_timeout(mut self, timeout: IdleTimeout) -> Self {
        self.options.app_spawner_timeout = timeout;
        self
    }

    /// Set the maximum number of requests (0 = unlimited).
    pub fn max_requests(mut self, max: u64) -> Self {
        self.options.limits.max_requests = max;
        self
    }

    /// Set the memory limit in megabytes (0 = unlimited).
    pub fn memory_limit(mut self, megabytes: u64) -> Self {
        self.options.limits.memory_limit = megabytes;
        self
    }

    /// Set resource limits.
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.options.limits = limits;
        self
    }

    /// Build the options.
    ///
    /// # Errors
    ///
    /// Returns a `Violation` if the options break an invariant; see
    /// [`SpawnOptions::validate`].
    pub fn build(self) -> Result<SpawnOptions, Violation> {
        self.options.validate()?;
        Ok(self.options)
    }
}
