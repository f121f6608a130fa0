//! Conversion traits for argument extraction and return values.
//!
//! - [`FromVariable`]: extract a Rust value from a [`Variable`] (type-exact)
//! - [`IntoVariable`]: convert a Rust value into a [`Variable`]
//!
//! NWScript has no boolean type; `bool` maps onto `int` (`FALSE == 0`).
//!
//! ## Example
//!
//! ```
//! use nwscript_core::{FromVariable, IntoVariable, Variable};
//!
//! let v = 42i32.into_variable();
//! assert_eq!(i32::from_variable(&v).unwrap(), 42);
//! assert!(f32::from_variable(&v).is_err());
//! ```

use crate::error::ConversionError;
use crate::{EngineType, ObjectId, ScriptState, Variable, Vector};

/// Extract a value from a Variable.
pub trait FromVariable: Sized {
    /// Returns a `ConversionError` if the variable holds another type.
    fn from_variable(var: &Variable) -> Result<Self, ConversionError>;
}

/// Convert a value into a Variable.
pub trait IntoVariable {
    fn into_variable(self) -> Variable;
}

impl FromVariable for i32 {
    fn from_variable(var: &Variable) -> Result<Self, ConversionError> {
        var.as_int()
    }
}

impl IntoVariable for i32 {
    fn into_variable(self) -> Variable {
        Variable::Int(self)
    }
}

impl FromVariable for bool {
    fn from_variable(var: &Variable) -> Result<Self, ConversionError> {
        var.as_int().map(|v| v != 0)
    }
}

impl IntoVariable for bool {
    fn into_variable(self) -> Variable {
        Variable::Int(self as i32)
    }
}

impl FromVariable for f32 {
    fn from_variable(var: &Variable) -> Result<Self, ConversionError> {
        var.as_float()
    }
}

impl IntoVariable for f32 {
    fn into_variable(self) -> Variable {
        Variable::Float(self)
    }
}

impl FromVariable for String {
    fn from_variable(var: &Variable) -> Result<Self, ConversionError> {
        var.as_str().map(str::to_owned)
    }
}

impl IntoVariable for String {
    fn into_variable(self) -> Variable {
        Variable::String(self)
    }
}

impl IntoVariable for &str {
    fn into_variable(self) -> Variable {
        Variable::String(self.to_owned())
    }
}

impl FromVariable for ObjectId {
    fn from_variable(var: &Variable) -> Result<Self, ConversionError> {
        var.as_object()
    }
}

impl IntoVariable for ObjectId {
    fn into_variable(self) -> Variable {
        Variable::Object(self)
    }
}

impl FromVariable for Vector {
    fn from_variable(var: &Variable) -> Result<Self, ConversionError> {
        var.as_vector()
    }
}

impl IntoVariable for Vector {
    fn into_variable(self) -> Variable {
        Variable::Vector(self)
    }
}

impl FromVariable for ScriptState {
    fn from_variable(var: &Variable) -> Result<Self, ConversionError> {
        var.as_script_state().cloned()
    }
}

impl IntoVariable for ScriptState {
    fn into_variable(self) -> Variable {
        Variable::ScriptState(Box::new(self))
    }
}

impl IntoVariable for EngineType {
    fn into_variable(self) -> Variable {
        Variable::Engine(self)
    }
}

impl IntoVariable for () {
    fn into_variable(self) -> Variable {
        Variable::Void
    }
}

impl IntoVariable for Variable {
    fn into_variable(self) -> Variable {
        self
    }
}
