//! Python bindings for spawn_options - spawn parameters and their wire form.
//!
//! This module provides Python wrappers around the Rust spawn_options crate,
//! so Python code can build, validate, encode and decode spawn requests.

#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use std::collections::HashMap;

use spawn_options::{
    AppType, ChannelError, DecodeError, IdleTimeout, ParseKindError, SpawnMethod,
    SpawnOptions as RustSpawnOptions, Violation,
};

// =============================================================================
// Error Conversion
// =============================================================================

/// Convert a decode failure to Python ValueError
fn decode_error_to_py_err(e: DecodeError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Convert a Violation to Python ValueError
fn violation_to_py_err(v: Violation) -> PyErr {
    PyValueError::new_err(v.to_string())
}

/// Convert a framing failure to Python ValueError
fn channel_error_to_py_err(e: ChannelError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn kind_error_to_py_err(e: ParseKindError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn timeout_from_py(secs: i64) -> PyResult<IdleTimeout> {
    IdleTimeout::try_from(secs).map_err(|e| PyValueError::new_err(e.to_string()))
}

// =============================================================================
// SpawnOptions
// =============================================================================

/// Parameters for spawning one application.
///
/// Example:
///     >>> options = SpawnOptions("/var/www/blog", environment="staging", app_type="rack")
///     >>> tokens = ["spawn_application"] + options.to_list()
///     >>> copy = SpawnOptions.from_list(tokens, 1)
///     >>> copy == options
///     True
#[pyclass(eq)]
#[derive(Clone, PartialEq)]
pub struct SpawnOptions {
    inner: RustSpawnOptions,
}

#[pymethods]
impl SpawnOptions {
    /// Create options for the application at `app_root`.
    ///
    /// Every other argument defaults the same way as the Rust `SpawnOptions::new`.
    /// Timeouts take -1 for the spawner default and 0 for never.
    #[new]
    #[pyo3(signature = (
        app_root = String::new(),
        lower_privilege = true,
        lowest_user = "nobody".to_string(),
        environment = "production".to_string(),
        spawn_method = "smart".to_string(),
        app_type = "rails".to_string(),
        framework_spawner_timeout = -1,
        app_spawner_timeout = -1,
        max_requests = 0,
        memory_limit = 0,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        app_root: String,
        lower_privilege: bool,
        lowest_user: String,
        environment: String,
        spawn_method: String,
        app_type: String,
        framework_spawner_timeout: i64,
        app_spawner_timeout: i64,
        max_requests: u64,
        memory_limit: u64,
    ) -> PyResult<Self> {
        let mut inner = RustSpawnOptions::new(app_root);
        inner.lower_privilege = lower_privilege;
        inner.lowest_user = lowest_user;
        inner.environment = environment;
        inner.spawn_method = spawn_method
            .parse::<SpawnMethod>()
            .map_err(kind_error_to_py_err)?;
        inner.app_type = app_type.parse::<AppType>().map_err(kind_error_to_py_err)?;
        inner.framework_spawner_timeout = timeout_from_py(framework_spawner_timeout)?;
        inner.app_spawner_timeout = timeout_from_py(app_spawner_timeout)?;
        inner.limits.max_requests = max_requests;
        inner.limits.memory_limit = memory_limit;
        Ok(Self { inner })
    }

    /// Decode options from a token list produced by `to_list()`.
    ///
    /// Raises:
    ///     ValueError: If the list is too short or malformed
    #[staticmethod]
    #[pyo3(signature = (tokens, offset = 0))]
    fn from_list(tokens: Vec<String>, offset: usize) -> PyResult<Self> {
        RustSpawnOptions::from_tokens(&tokens, offset)
            .map(|inner| Self { inner })
            .map_err(decode_error_to_py_err)
    }

    /// Decode options from label/value pairs in any order.
    #[staticmethod]
    fn from_key_values(tokens: Vec<String>) -> PyResult<Self> {
        RustSpawnOptions::from_key_values(&tokens)
            .map(|inner| Self { inner })
            .map_err(decode_error_to_py_err)
    }

    /// Encode as a flat label/value list.
    fn to_list(&self) -> Vec<String> {
        self.inner.to_tokens()
    }

    /// Check invariants.
    ///
    /// Raises:
    ///     ValueError: If the options are invalid
    fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(violation_to_py_err)
    }

    /// Resolve the application root to a canonical directory.
    fn resolve_app_root(&self) -> PyResult<String> {
        self.inner
            .resolve_app_root()
            .map(|p| p.display().to_string())
            .map_err(violation_to_py_err)
    }

    /// Environment variables carrying the environment name to the application.
    fn app_env(&self) -> HashMap<String, String> {
        self.inner.app_env()
    }

    #[getter]
    fn app_root(&self) -> String {
        self.inner.app_root.display().to_string()
    }

    #[getter]
    fn lower_privilege(&self) -> bool {
        self.inner.lower_privilege
    }

    #[getter]
    fn lowest_user(&self) -> String {
        self.inner.lowest_user.clone()
    }

    #[getter]
    fn environment(&self) -> String {
        self.inner.environment.clone()
    }

    #[getter]
    fn spawn_method(&self) -> &'static str {
        self.inner.spawn_method.as_str()
    }

    #[getter]
    fn app_type(&self) -> &'static str {
        self.inner.app_type.as_str()
    }

    #[getter]
    fn framework_spawner_timeout(&self) -> i64 {
        self.inner.framework_spawner_timeout.to_wire()
    }

    #[getter]
    fn app_spawner_timeout(&self) -> i64 {
        self.inner.app_spawner_timeout.to_wire()
    }

    #[getter]
    fn max_requests(&self) -> u64 {
        self.inner.limits.max_requests
    }

    #[getter]
    fn memory_limit(&self) -> u64 {
        self.inner.limits.memory_limit
    }

    fn __repr__(&self) -> String {
        format!(
            "SpawnOptions(app_root={:?}, environment={:?}, app_type={:?})",
            self.inner.app_root.display().to_string(),
            self.inner.environment,
            self.inner.app_type.as_str()
        )
    }
}

// =============================================================================
// Framing
// =============================================================================

/// Encode a token list as a length-prefixed, NUL-separated frame.
///
/// Raises:
///     ValueError: If a token contains NUL or the frame is too large
#[pyfunction]
fn encode_frame(py: Python<'_>, tokens: Vec<String>) -> PyResult<Py<PyBytes>> {
    let frame = spawn_options::encode_frame(&tokens).map_err(channel_error_to_py_err)?;
    Ok(PyBytes::new_bound(py, &frame).unbind())
}

/// Decode a frame payload (without the 2-byte header) into tokens.
#[pyfunction]
fn decode_frame(payload: &[u8]) -> PyResult<Vec<String>> {
    spawn_options::decode_frame(payload).map_err(channel_error_to_py_err)
}

// =============================================================================
// Module
// =============================================================================

/// Spawn parameters for application processes and their wire form.
///
/// Example:
///     >>> from spawn_options import SpawnOptions
///     >>>
///     >>> options = SpawnOptions("/var/www/blog", max_requests=1000)
///     >>> options.validate()
///     >>> message = ["spawn_application"] + options.to_list()
#[pymodule]
fn _spawn_options(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SpawnOptions>()?;
    m.add_function(wrap_pyfunction!(encode_frame, m)?)?;
    m.add_function(wrap_pyfunction!(decode_frame, m)?)?;
    Ok(())
}
