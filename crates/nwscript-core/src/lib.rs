//! Core types for the NWScript runtime.
//!
//! This crate holds the leaf types every other runtime crate builds on:
//!
//! - [`Variable`] / [`VariableType`]: tagged dynamic values with type-exact access
//! - [`Signature`] / [`Defaults`]: callable type lists and trailing default arguments
//! - [`ObjectId`]: stable object ids with `SELF`/`INVALID` sentinels
//! - [`Script`], [`ScriptState`], [`ScriptEnvironment`]: compiled scripts and
//!   captured state for deferred or nested execution
//! - [`FromVariable`] / [`IntoVariable`]: argument and return conversions
//! - the error taxonomy shared by registration, dispatch and execution

mod convert;
mod error;
mod object_id;
mod script;
mod signature;
mod variable;

pub use convert::{FromVariable, IntoVariable};
pub use error::{ConversionError, DispatchError, NativeError, RegistrationError, ScriptError};
pub use object_id::ObjectId;
pub use script::{Script, ScriptEnvironment, ScriptState};
pub use signature::{Defaults, FunctionId, Parameters, Signature};
pub use variable::{EngineType, EngineTypeKind, Variable, VariableType, Vector};
