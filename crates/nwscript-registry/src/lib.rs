//! Engine function registry for the NWScript runtime.
//!
//! Compiled scripts call engine functions by stable numeric id. This crate
//! binds those ids to native Rust callbacks and performs every call:
//!
//! - [`FunctionDef`]: one table entry (id, name, signature, defaults, callback)
//! - [`FunctionManager`]: the registry and dispatcher
//! - [`FunctionContext`]: per-call arguments, return slot and call site
//! - [`NativeFn`]: the type-erased callback
//!
//! ## Example
//!
//! ```
//! use nwscript_core::{Defaults, FunctionId, Signature, Variable, VariableType};
//! use nwscript_registry::{CallSite, FunctionDef, FunctionManager};
//!
//! let mut manager: FunctionManager<()> = FunctionManager::new();
//! manager
//!     .register_function(
//!         FunctionDef::new(
//!             92,
//!             "IntToString",
//!             Signature::new(VariableType::String, &[VariableType::Int]),
//!             Defaults::none(),
//!         )
//!         .with_native(|_, ctx| {
//!             let value: i32 = ctx.arg(0)?;
//!             ctx.set_return(value.to_string());
//!             Ok(())
//!         }),
//!     )
//!     .unwrap();
//!
//! let result = manager
//!     .call(&mut (), FunctionId(92), vec![Variable::Int(7)], CallSite::default())
//!     .unwrap();
//! assert_eq!(result, Variable::String("7".into()));
//! ```

mod function_context;
mod function_def;
mod function_manager;
mod native_fn;

pub use function_context::{CallSite, FunctionContext};
pub use function_def::FunctionDef;
pub use function_manager::FunctionManager;
pub use native_fn::NativeFn;
