//! # spawn_options
//!
//! Parameters for spawning an application process, and their wire form.
//!
//! `spawn_options` describes *what* to spawn: the application root, whether
//! and to whom privileges are lowered, the environment name, the spawn method,
//! the application type, spawner idle timeouts and resource limits. It does
//! not spawn anything itself; a spawner receives the record, usually as a flat
//! label/value token sequence sent over a message channel.
//!
//! ## Quick Start
//!
//! ```rust
//! use spawn_options::{AppType, IdleTimeout, SpawnOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Describe the application
//! let options = SpawnOptions::builder("/var/www/blog")
//!     .app_type(AppType::Rack)
//!     .environment("staging")
//!     .app_spawner_timeout(IdleTimeout::from_secs(600))
//!     .max_requests(1000)
//!     .build()?;
//!
//! // Encode behind a command token
//! let mut message = vec!["spawn_application".to_string()];
//! options.append_to(&mut message);
//!
//! // Decode on the other side
//! let received = SpawnOptions::from_tokens(&message, 1)?;
//! assert_eq!(received, options);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Wire format
//!
//! Ten label/value pairs in a fixed order, see [`Field::ALL`]. Booleans are
//! `true`/`false`, numbers are decimal. Idle timeouts use `-1` for "spawner
//! default" and `0` for "never"; limits use `0` for "unlimited".
//!
//! Decoding is strict: a short sequence, a misplaced label or an unparsable
//! value is a [`DecodeError`] naming the position or field at fault.
//!
//! ## Platform Support
//!
//! Unix only (Linux, macOS). The privilege checks read the effective user id.

#[cfg(windows)]
compile_error!(
    "spawn_options does not support Windows. \
     Privilege lowering relies on Unix effective user ids (geteuid)."
);

mod app_root;
mod app_type;
mod channel;
mod codec;
mod env;
mod error;
mod limits;
mod options;
mod privilege;
mod schema;
mod spawn_method;
mod timeout;

#[cfg(test)]
mod property_tests;

// Public API
pub use app_root::check_app_root;
pub use app_type::AppType;
pub use channel::{decode_frame, encode_frame, MessageChannel, HEADER_SIZE, MAX_FRAME_SIZE};
pub use error::{
    ChannelError, DecodeError, InvalidTimeout, OptionsError, ParseKindError, Violation,
};
pub use limits::ResourceLimits;
pub use options::{SpawnOptions, SpawnOptionsBuilder, DEFAULT_ENVIRONMENT, DEFAULT_LOWEST_USER};
pub use privilege::running_as_root;
pub use schema::{Field, FieldKind, FIELD_COUNT, TOKEN_COUNT};
pub use spawn_method::SpawnMethod;
pub use timeout::IdleTimeout;
