//! Error types for the NWScript runtime.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ConversionError    - type-exact Variable access failed
//! RegistrationError  - an engine function table entry is malformed
//! DispatchError      - a caller violated a function's contract
//! NativeError        - a native callback failed
//! ScriptError        - loading or running a script failed
//! ```
//!
//! Missing or destroyed objects are not errors anywhere in the runtime: they
//! resolve to `None` / [`ObjectId::INVALID`](crate::ObjectId::INVALID).

use thiserror::Error;

use crate::{FunctionId, VariableType};

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors raised when a value is read as a type other than its tag.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors in an engine function table entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// An id is already bound to another function.
    #[error("function id {id} registered for '{name}' is already bound to '{existing}'")]
    DuplicateFunctionId {
        id: FunctionId,
        name: String,
        existing: String,
    },

    /// A name is already bound to another id.
    #[error("function name '{name}' is already registered")]
    DuplicateFunctionName { name: String },

    /// More defaults than parameters.
    #[error("function '{name}' declares {defaults} defaults for {params} parameters")]
    TooManyDefaults {
        name: String,
        params: usize,
        defaults: usize,
    },

    /// A default does not match the type of the parameter it covers.
    #[error("function '{name}': default for parameter {index} is {actual}, expected {expected}")]
    DefaultTypeMismatch {
        name: String,
        index: usize,
        expected: VariableType,
        actual: VariableType,
    },

    /// A parameter was declared `void`.
    #[error("function '{name}': parameter {index} cannot be void")]
    VoidParameter { name: String, index: usize },
}

// ============================================================================
// Dispatch Errors
// ============================================================================

/// Contract violations detected while dispatching an engine function call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No function is bound to this id.
    #[error("unknown engine function id {id}")]
    UnknownFunction { id: FunctionId },

    #[error("unknown engine function '{name}'")]
    UnknownFunctionName { name: String },

    #[error("{name}: expected at least {min} arguments, got {supplied}")]
    TooFewArguments {
        name: String,
        min: usize,
        supplied: usize,
    },

    #[error("{name}: expected at most {max} arguments, got {supplied}")]
    TooManyArguments {
        name: String,
        max: usize,
        supplied: usize,
    },

    #[error("{name}: argument {index} is {actual}, expected {expected}")]
    ArgumentTypeMismatch {
        name: String,
        index: usize,
        expected: VariableType,
        actual: VariableType,
    },

    /// A callback stored a value of the wrong type in the return slot.
    #[error("{name}: returned {actual}, declared {expected}")]
    ReturnTypeMismatch {
        name: String,
        expected: VariableType,
        actual: VariableType,
    },

    /// The native callback itself failed.
    #[error("{name}: {source}")]
    Native {
        name: String,
        #[source]
        source: NativeError,
    },
}

// ============================================================================
// Native Errors
// ============================================================================

/// Errors raised by native engine function callbacks.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("argument index {index} out of bounds (function has {count} arguments)")]
    ArgumentIndexOutOfBounds { index: usize, count: usize },

    /// Deferred execution was requested but no script is running.
    #[error("{function}: no valid current script name")]
    MissingScriptName { function: String },

    #[error(transparent)]
    Script(Box<ScriptError>),

    #[error("native error: {message}")]
    Other { message: String },
}

impl NativeError {
    /// Create a generic native error.
    pub fn other(message: impl Into<String>) -> Self {
        NativeError::Other {
            message: message.into(),
        }
    }
}

impl From<ScriptError> for NativeError {
    fn from(err: ScriptError) -> Self {
        NativeError::Script(Box::new(err))
    }
}

// ============================================================================
// Script Errors
// ============================================================================

/// Errors loading or running a compiled script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The resource resolver has no bytecode for this name.
    #[error("script '{name}' not found")]
    ScriptNotFound { name: String },

    /// The interpreter failed while executing.
    #[error("script '{script}' failed: {message}")]
    Execution { script: String, message: String },

    /// Nested script launches went deeper than allowed.
    #[error("script '{script}' exceeds the maximum nesting depth of {depth}")]
    DepthExceeded { script: String, depth: usize },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ScriptError {
    /// Create an execution error.
    pub fn execution(script: impl Into<String>, message: impl Into<String>) -> Self {
        ScriptError::Execution {
            script: script.into(),
            message: message.into(),
        }
    }
}
