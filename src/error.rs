//! Error types for spawn_options.
//!
//! This module defines the error categories of the crate:
//! - [`DecodeError`]: a flat token sequence could not be turned into `SpawnOptions`
//! - [`Violation`]: a record breaks one of its invariants
//! - [`ChannelError`]: framing or I/O failure on a message channel
//! - [`ParseKindError`]: unknown spawn method or application type name
//! - [`InvalidTimeout`]: idle timeout outside its wire range

use thiserror::Error;

/// Failure while decoding spawn options from a flat token sequence.
///
/// Every variant names the position or field that failed.
/// All error messages are safe to log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The sequence ends before all ten label/value pairs could be read
    #[error("spawn options truncated: need {needed} tokens at offset {offset}, sequence has {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A label slot holds something other than the expected label
    #[error("unexpected label at index {index}: expected {expected}, got {got:?}")]
    LabelMismatch {
        index: usize,
        expected: &'static str,
        got: String,
    },

    /// A value could not be parsed for its field
    #[error("invalid value for {field} ({value:?}): {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A label appears more than once in a keyed sequence
    #[error("field given more than once: {field}")]
    DuplicateField { field: &'static str },

    /// A keyed sequence ends with a label that has no value
    #[error("label without value: {label}")]
    DanglingLabel { label: String },
}

/// A spawn options record breaks one of its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    // Environment errors
    /// Environment name is empty
    #[error("environment must not be empty")]
    EnvironmentEmpty,

    // Application root errors
    /// Application root is not set
    #[error("application root must not be empty")]
    AppRootEmpty,

    /// Application root cannot be carried as text
    #[error("application root is not valid UTF-8: {path}")]
    AppRootNotUtf8 { path: String },

    /// Application root does not exist
    #[error("application root not found: {path}")]
    AppRootNotFound { path: String },

    /// Failed to canonicalize the application root
    #[error("failed to canonicalize application root {path}: {reason}")]
    AppRootCanonicalizeFailed { path: String, reason: String },

    /// Application root is not a directory
    #[error("application root is not a directory: {path}")]
    AppRootNotDirectory { path: String },

    // Privilege errors
    /// No fallback identity although privilege lowering is enabled
    #[error("lowest user must not be empty when privilege lowering is enabled")]
    LowestUserEmpty,

    /// Fallback identity is root, which would not lower anything
    #[error("lowest user must not be root when privilege lowering is enabled")]
    LowestUserIsRoot,

    // Wire safety
    /// A text field contains a NUL byte and cannot be framed
    #[error("{field} contains a NUL byte")]
    NulInField { field: &'static str },
}

/// Failure while framing or transporting a token array.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Underlying stream failed
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream ended in the middle of a frame
    #[error("unexpected end of stream inside a frame")]
    UnexpectedEof,

    /// Token contains the NUL separator
    #[error("token {index} contains a NUL byte")]
    NulInToken { index: usize },

    /// Encoded payload does not fit the 16-bit length header
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// Payload does not end with a NUL terminator
    #[error("frame payload is not NUL-terminated")]
    Unterminated,

    /// Payload is not valid UTF-8
    #[error("frame payload is not valid UTF-8")]
    InvalidUtf8,

    /// Frame carried no leading command token
    #[error("frame carries no command")]
    MissingCommand,
}

/// Unknown name for an enumerated selector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?} (expected one of {expected})")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Wire value outside the range an idle timeout can take.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("idle timeout {0} out of range (-1 for default, 0 for never, or a positive number of seconds)")]
pub struct InvalidTimeout(pub i64);

/// Combined error type for decode-validate-transport flows.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Violation(#[from] Violation),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
