//! Contracts for the collaborators that load and execute bytecode.
//!
//! The runtime never decodes bytecode itself. A [`ScriptResolver`] maps a
//! script name to its compiled bytes, and an [`Interpreter`] executes a
//! loaded [`Script`], calling back into
//! [`Runtime::call_function`](crate::Runtime::call_function) for every
//! engine function call instruction.
//!
//! ## Call Convention
//!
//! For each call instruction the interpreter passes the arguments the
//! script supplied, in declared order; trailing arguments may be omitted
//! and are filled from the function's defaults. The [`CallSite`] names the
//! running script so deferred-command functions can re-enter it later:
//!
//! ```ignore
//! let site = CallSite::new(inv.owner, inv.triggerer).with_script(inv.script);
//! runtime.call_function(FunctionId(7), vec![Variable::Float(1.5), state], site)?;
//! ```
//!
//! [`CallSite`]: nwscript_registry::CallSite

use std::sync::Arc;

use rustc_hash::FxHashMap;

use nwscript_core::{ObjectId, Script, ScriptError, ScriptState};

use crate::Runtime;

/// One request to execute a script.
#[derive(Debug, Clone, Copy)]
pub struct ScriptInvocation<'a> {
    /// The script to run. Its environment holds bindings inherited from the
    /// script that launched it, if any.
    pub script: &'a Script,
    /// The object the script runs on (`OBJECT_SELF`).
    pub owner: ObjectId,
    pub triggerer: ObjectId,
    /// Captured state to replay, for deferred actions. `None` runs the
    /// script from its entry point.
    pub state: Option<&'a ScriptState>,
}

/// Executes compiled scripts.
pub trait Interpreter {
    fn run(
        &self,
        runtime: &mut Runtime,
        invocation: ScriptInvocation<'_>,
    ) -> Result<(), ScriptError>;
}

/// Resolves script names to compiled bytecode.
pub trait ScriptResolver {
    fn resolve(&self, name: &str) -> Option<Arc<[u8]>>;
}

/// An in-memory script table.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    scripts: FxHashMap<String, Arc<[u8]>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytecode: impl Into<Arc<[u8]>>) {
        self.scripts.insert(name.into(), bytecode.into());
    }

    pub fn with_script(mut self, name: impl Into<String>, bytecode: impl Into<Arc<[u8]>>) -> Self {
        self.insert(name, bytecode);
        self
    }
}

impl ScriptResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Option<Arc<[u8]>> {
        self.scripts.get(name).cloned()
    }
}
