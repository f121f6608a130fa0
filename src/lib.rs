//! NWScript runtime core.
//!
//! An embedded scripting runtime that lets compiled game scripts drive live
//! game objects. The bytecode interpreter itself is an external collaborator;
//! this crate provides everything it calls into:
//!
//! - the engine function table and its dispatcher ([`functions`],
//!   [`FunctionManager`])
//! - the live object registry ([`ObjectContainer`], [`ObjectReference`],
//!   [`ObjectSearch`])
//! - the per-module action and event scheduler ([`Module`])
//! - the [`Runtime`] context object tying them together
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use nwscript::functions::id;
//! use nwscript::{
//!     CallSite, Interpreter, MemoryResolver, ObjectId, Runtime, RuntimeConfig,
//!     ScriptError, ScriptInvocation, Variable,
//! };
//!
//! struct Echo;
//!
//! impl Interpreter for Echo {
//!     fn run(&self, rt: &mut Runtime, inv: ScriptInvocation<'_>) -> Result<(), ScriptError> {
//!         let site = CallSite::new(inv.owner, inv.triggerer).with_script(inv.script);
//!         rt.call_function(id::PRINT_STRING, vec![Variable::String("hi".into())], site)?;
//!         Ok(())
//!     }
//! }
//!
//! let resolver = MemoryResolver::new().with_script("hello", vec![0u8]);
//! let mut runtime =
//!     Runtime::new(RuntimeConfig::default(), Arc::new(Echo), Arc::new(resolver)).unwrap();
//! runtime.run_script("hello", ObjectId::INVALID, ObjectId::INVALID).unwrap();
//! ```

mod clock;
mod config;
mod frame_lock;
mod interpreter;
mod runtime;

pub mod functions;
pub mod module;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, RuntimeConfig};
pub use frame_lock::{FrameGuard, FrameLock};
pub use interpreter::{Interpreter, MemoryResolver, ScriptInvocation, ScriptResolver};
pub use module::{Action, ActionKind, Event, EventKind, EventSink, Module};
pub use runtime::{MODULE_TAG, Runtime};

pub use nwscript_core::{
    ConversionError, Defaults, DispatchError, EngineType, EngineTypeKind, FromVariable,
    FunctionId, IntoVariable, NativeError, ObjectId, Parameters, RegistrationError, Script,
    ScriptEnvironment, ScriptError, ScriptState, Signature, Variable, VariableType, Vector,
};
pub use nwscript_objects::{
    Inventory, Object, ObjectContainer, ObjectDistanceSort, ObjectReference, ObjectSearch,
    ObjectType, ObjectTypeMask, Relation, SearchKey, Trap, nearest_object,
};
pub use nwscript_registry::{CallSite, FunctionContext, FunctionDef, FunctionManager, NativeFn};
