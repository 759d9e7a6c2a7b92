//! Error types for registry lifecycle and model dispatch.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistrationError   - build() failures; abort startup
//! ├── DuplicateRegistration
//! ├── UnresolvedHandle
//! └── InvalidDeclaration
//! DispatchError       - per-call failures; always returned to the caller
//! ├── NotFound(NotFoundError)
//! └── Invocation { name, source: InvocationError }
//! NativeError         - status reported by a native routine
//! ```

use std::ffi::NulError;

use thiserror::Error;

use crate::SignatureKind;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while building the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two table rows share a model name.
    #[error("duplicate registration: model '{name}' is listed more than once")]
    DuplicateRegistration { name: String },

    /// A listed routine could not be bound to a callable handle.
    #[error("unresolved handle for model '{name}' (symbol '{symbol}'): {reason}")]
    UnresolvedHandle {
        name: String,
        symbol: String,
        reason: String,
    },

    /// A table row is malformed.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),
}

impl RegistrationError {
    /// The model name the error refers to, if any.
    pub fn model_name(&self) -> Option<&str> {
        match self {
            RegistrationError::DuplicateRegistration { name }
            | RegistrationError::UnresolvedHandle { name, .. } => Some(name),
            RegistrationError::InvalidDeclaration(_) => None,
        }
    }
}

// ============================================================================
// Dispatch Errors
// ============================================================================

/// The requested model is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown model '{name}'")]
pub struct NotFoundError {
    pub name: String,
}

impl NotFoundError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Status reported by a native routine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NativeError {
    #[error("parameter {index} requested but only {count} supplied")]
    MissingParameter { index: usize, count: usize },

    #[error("{0}")]
    Failed(String),
}

impl NativeError {
    pub fn failed(message: impl Into<String>) -> Self {
        NativeError::Failed(message.into())
    }
}

/// Failure while adapting or executing a single call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvocationError {
    #[error("output buffer is empty")]
    EmptyOutput,

    #[error("{kind} routine needs {expected} grid values for {bins} bins, got {grid}", expected = .bins + 1)]
    GridMismatch {
        kind: SignatureKind,
        grid: usize,
        bins: usize,
    },

    #[error("routine reads {expected} parameters, got {got}")]
    ParamMismatch { expected: usize, got: usize },

    #[error("flux error buffer has {errors} values but there are {bins} bins")]
    ErrorBufferMismatch { bins: usize, errors: usize },

    #[error("{0} bins exceed the range of a C int")]
    TooManyBins(usize),

    #[error("init string contains an interior NUL: {0}")]
    InvalidInit(#[from] NulError),

    #[error("routine reported failure: {0}")]
    Failed(#[from] NativeError),

    #[error("routine panicked: {0}")]
    Panicked(String),
}

/// Failure of a single dispatch call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("model '{name}' failed: {source}")]
    Invocation {
        name: String,
        #[source]
        source: InvocationError,
    },
}

impl DispatchError {
    pub fn invocation(name: impl Into<String>, source: InvocationError) -> Self {
        DispatchError::Invocation {
            name: name.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::NotFound(_))
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, DispatchError::Invocation { .. })
    }
}
