//! FunctionManager - the engine function registry and dispatcher.
//!
//! The manager maps stable numeric ids (and names) to [`FunctionDef`]s and
//! performs every native call: argument validation, default filling,
//! invocation and return type checking.
//!
//! # Lifecycle
//!
//! - **Registration phase**: the registry is populated once at startup from
//!   the static engine function table ([`register_table`](FunctionManager::register_table)).
//! - **Execution phase**: the registry is effectively read-only. Hosts keep
//!   it behind an `Arc` so a call can borrow the registry and the host
//!   mutably at the same time.
//! - **Shutdown**: [`clear`](FunctionManager::clear) releases every binding.
//!
//! # Unimplemented functions
//!
//! A table entry without a native callback still dispatches: the call is
//! validated as usual, a diagnostic naming the function, its return type and
//! its arguments is logged, and the zero value of the declared return type
//! is returned. Partially implemented content keeps running.

use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use nwscript_core::{DispatchError, FunctionId, Parameters, RegistrationError, Variable};

use crate::{CallSite, FunctionContext, FunctionDef};

/// Engine function registry, generic over the host passed to callbacks.
pub struct FunctionManager<H> {
    functions: FxHashMap<FunctionId, FunctionDef<H>>,
    by_name: FxHashMap<String, FunctionId>,
    log_unimplemented: bool,
}

impl<H> Default for FunctionManager<H> {
    fn default() -> Self {
        Self {
            functions: FxHashMap::default(),
            by_name: FxHashMap::default(),
            log_unimplemented: true,
        }
    }
}

impl<H> FunctionManager<H> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the unimplemented-function diagnostic.
    pub fn set_log_unimplemented(&mut self, enabled: bool) {
        self.log_unimplemented = enabled;
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register one engine function.
    ///
    /// Ids and names must be unique, and the entry must pass
    /// [`FunctionDef::validate`].
    pub fn register_function(&mut self, def: FunctionDef<H>) -> Result<(), RegistrationError> {
        def.validate()?;

        if let Some(existing) = self.functions.get(&def.id) {
            return Err(RegistrationError::DuplicateFunctionId {
                id: def.id,
                name: def.name,
                existing: existing.name.clone(),
            });
        }
        if self.by_name.contains_key(&def.name) {
            return Err(RegistrationError::DuplicateFunctionName { name: def.name });
        }

        self.by_name.insert(def.name.clone(), def.id);
        self.functions.insert(def.id, def);
        Ok(())
    }

    /// Register every entry of a function table, stopping at the first error.
    pub fn register_table<I>(&mut self, table: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = FunctionDef<H>>,
    {
        table
            .into_iter()
            .try_for_each(|def| self.register_function(def))
    }

    /// Release every registration.
    pub fn clear(&mut self) {
        self.functions.clear();
        self.by_name.clear();
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn get(&self, id: FunctionId) -> Option<&FunctionDef<H>> {
        self.functions.get(&id)
    }

    /// Find a function's id by name.
    pub fn find(&self, name: &str) -> Option<FunctionId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, id: FunctionId) -> bool {
        self.functions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterate over the registered functions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionDef<H>> {
        let mut defs: Vec<_> = self.functions.values().collect();
        defs.sort_by_key(|def| def.id);
        defs.into_iter()
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    /// Call an engine function by id.
    ///
    /// Builds a [`FunctionContext`] with defaults filled in for omitted
    /// trailing arguments, invokes the native callback (or the unimplemented
    /// fallback) and returns the context's return slot.
    ///
    /// # Errors
    ///
    /// Only contract violations fail: an unknown id, too few or too many
    /// arguments, argument tag mismatches, a callback error, or a callback
    /// storing a value of the wrong type in the return slot.
    pub fn call(
        &self,
        host: &mut H,
        id: FunctionId,
        args: Parameters,
        site: CallSite<'_>,
    ) -> Result<Variable, DispatchError> {
        let def = self
            .functions
            .get(&id)
            .ok_or(DispatchError::UnknownFunction { id })?;

        let mut ctx = FunctionContext::with_arguments(
            def.id,
            &def.name,
            &def.signature,
            &def.defaults,
            args,
        )?;
        ctx.set_call_site(site);

        let Some(native) = &def.native else {
            self.unimplemented(&ctx);
            return Ok(ctx.into_return());
        };

        trace!(target: "nwscript", "{}", ctx.describe());
        native
            .call(host, &mut ctx)
            .map_err(|source| DispatchError::Native {
                name: def.name.clone(),
                source,
            })?;

        let expected = def.signature.return_type();
        let actual = ctx.return_value().variable_type();
        if actual != expected {
            return Err(DispatchError::ReturnTypeMismatch {
                name: def.name.clone(),
                expected,
                actual,
            });
        }

        Ok(ctx.into_return())
    }

    /// Call an engine function by name.
    pub fn call_by_name(
        &self,
        host: &mut H,
        name: &str,
        args: Parameters,
        site: CallSite<'_>,
    ) -> Result<Variable, DispatchError> {
        let id = self
            .find(name)
            .ok_or_else(|| DispatchError::UnknownFunctionName {
                name: name.to_owned(),
            })?;
        self.call(host, id, args, site)
    }

    fn unimplemented(&self, ctx: &FunctionContext<'_>) {
        if self.log_unimplemented {
            warn!(target: "nwscript", "{}", unimplemented_diagnostic(ctx));
        }
    }
}

/// `TODO: <return type> <name>(<args>)`, with omitted arguments shown at
/// their defaults.
fn unimplemented_diagnostic(ctx: &FunctionContext<'_>) -> String {
    format!("TODO: {} {}", ctx.signature().return_type().name(), ctx.describe())
}
