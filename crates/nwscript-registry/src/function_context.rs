//! Per-invocation context for native engine functions.
//!
//! A [`FunctionContext`] is created once for every native call. It owns the
//! argument list and the return slot and borrows the function's signature,
//! defaults and the currently running script. Nothing in it outlives the
//! dispatch call except what a callback explicitly copies out (for example
//! the script name and captured state of a deferred command).
//!
//! ## Typed Argument Access
//!
//! ```ignore
//! let max: i32 = ctx.arg(0)?;
//! let target: ObjectId = ctx.arg(1)?;
//! ctx.set_return(max - 1);
//! ```

use std::fmt;

use nwscript_core::{
    Defaults, DispatchError, FromVariable, FunctionId, IntoVariable, NativeError, ObjectId,
    Parameters, Script, Signature, Variable,
};

/// Who is calling, and from which script.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// The object the running script executes on (`OBJECT_SELF`).
    pub caller: ObjectId,
    /// The object that triggered the running script.
    pub triggerer: ObjectId,
    /// The running script, if the call comes from one.
    pub script: Option<&'a Script>,
}

impl<'a> CallSite<'a> {
    pub fn new(caller: ObjectId, triggerer: ObjectId) -> Self {
        Self {
            caller,
            triggerer,
            script: None,
        }
    }

    pub fn with_script(mut self, script: &'a Script) -> Self {
        self.script = Some(script);
        self
    }
}

impl Default for CallSite<'_> {
    fn default() -> Self {
        Self::new(ObjectId::INVALID, ObjectId::INVALID)
    }
}

/// One native function invocation.
pub struct FunctionContext<'a> {
    id: FunctionId,
    name: &'a str,
    signature: &'a Signature,
    defaults: &'a Defaults,
    params: Parameters,
    params_specified: usize,
    return_value: Variable,
    caller: ObjectId,
    triggerer: ObjectId,
    current_script: Option<&'a Script>,
}

impl<'a> FunctionContext<'a> {
    /// Every parameter at the zero value of its type; callers go through
    /// [`with_arguments`](Self::with_arguments).
    fn new(
        id: FunctionId,
        name: &'a str,
        signature: &'a Signature,
        defaults: &'a Defaults,
    ) -> Self {
        let params = signature
            .params()
            .iter()
            .map(|ty| Variable::default_for(*ty))
            .collect();

        Self {
            id,
            name,
            signature,
            defaults,
            params,
            params_specified: signature.param_max(),
            return_value: Variable::default_for(signature.return_type()),
            caller: ObjectId::INVALID,
            triggerer: ObjectId::INVALID,
            current_script: None,
        }
    }

    /// Create a context from the arguments a caller supplied.
    ///
    /// Fails fast when fewer than [`param_min`](Self::param_min) or more than
    /// [`param_max`](Self::param_max) arguments are given, or when an
    /// argument's tag differs from the declared parameter type. Omitted
    /// trailing arguments are filled from the defaults in declared order.
    pub fn with_arguments(
        id: FunctionId,
        name: &'a str,
        signature: &'a Signature,
        defaults: &'a Defaults,
        mut args: Parameters,
    ) -> Result<Self, DispatchError> {
        let mut ctx = Self::new(id, name, signature, defaults);
        let supplied = args.len();
        ctx.check_count(supplied)?;

        for (index, (arg, expected)) in args.iter().zip(signature.params()).enumerate() {
            if arg.variable_type() != *expected {
                return Err(DispatchError::ArgumentTypeMismatch {
                    name: name.to_owned(),
                    index,
                    expected: *expected,
                    actual: arg.variable_type(),
                });
            }
        }

        let max = signature.param_max();
        for index in supplied..max {
            // check_count guarantees every omitted index has a default
            if let Some(value) = defaults.for_param(index, max) {
                args.push(value.clone());
            }
        }

        ctx.params = args;
        ctx.params_specified = supplied;
        Ok(ctx)
    }

    fn check_count(&self, supplied: usize) -> Result<(), DispatchError> {
        if supplied < self.param_min() {
            return Err(DispatchError::TooFewArguments {
                name: self.name.to_owned(),
                min: self.param_min(),
                supplied,
            });
        }
        if supplied > self.param_max() {
            return Err(DispatchError::TooManyArguments {
                name: self.name.to_owned(),
                max: self.param_max(),
                supplied,
            });
        }
        Ok(())
    }

    // ==========================================================================
    // Function metadata
    // ==========================================================================

    pub fn id(&self) -> FunctionId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn signature(&self) -> &'a Signature {
        self.signature
    }

    /// Fewest arguments a caller may supply.
    pub fn param_min(&self) -> usize {
        self.signature.param_min(self.defaults)
    }

    /// Most arguments a caller may supply.
    pub fn param_max(&self) -> usize {
        self.signature.param_max()
    }

    /// Record how many arguments the caller actually supplied.
    pub fn set_params_specified(&mut self, count: usize) -> Result<(), DispatchError> {
        self.check_count(count)?;
        self.params_specified = count;
        Ok(())
    }

    /// How many arguments the caller actually supplied.
    pub fn params_specified(&self) -> usize {
        self.params_specified
    }

    /// Check if the caller supplied argument `index` rather than its default.
    pub fn is_specified(&self, index: usize) -> bool {
        index < self.params_specified
    }

    // ==========================================================================
    // Arguments and return value
    // ==========================================================================

    pub fn params(&self) -> &[Variable] {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut [Variable] {
        &mut self.params
    }

    /// Get a raw argument.
    pub fn param(&self, index: usize) -> Result<&Variable, NativeError> {
        self.params
            .get(index)
            .ok_or(NativeError::ArgumentIndexOutOfBounds {
                index,
                count: self.params.len(),
            })
    }

    /// Get a typed argument (type-exact).
    pub fn arg<T: FromVariable>(&self, index: usize) -> Result<T, NativeError> {
        let param = self.param(index)?;
        T::from_variable(param).map_err(NativeError::Conversion)
    }

    /// The return slot.
    pub fn return_value(&self) -> &Variable {
        &self.return_value
    }

    /// Mutable access to the return slot.
    pub fn return_mut(&mut self) -> &mut Variable {
        &mut self.return_value
    }

    /// Set a typed return value.
    pub fn set_return<T: IntoVariable>(&mut self, value: T) {
        self.return_value = value.into_variable();
    }

    /// Consume the context, yielding the return slot.
    pub fn into_return(self) -> Variable {
        self.return_value
    }

    // ==========================================================================
    // Call site
    // ==========================================================================

    pub fn set_call_site(&mut self, site: CallSite<'a>) {
        self.caller = site.caller;
        self.triggerer = site.triggerer;
        self.current_script = site.script;
    }

    pub fn caller(&self) -> ObjectId {
        self.caller
    }

    pub fn set_caller(&mut self, caller: ObjectId) {
        self.caller = caller;
    }

    pub fn triggerer(&self) -> ObjectId {
        self.triggerer
    }

    pub fn set_triggerer(&mut self, triggerer: ObjectId) {
        self.triggerer = triggerer;
    }

    pub fn set_current_script(&mut self, script: Option<&'a Script>) {
        self.current_script = script;
    }

    pub fn current_script(&self) -> Option<&'a Script> {
        self.current_script
    }

    /// Name of the running script, or `""` when there is none.
    pub fn script_name(&self) -> &'a str {
        self.current_script.map(Script::name).unwrap_or("")
    }

    /// Name of the running script, required for deferred execution.
    pub fn require_script_name(&self) -> Result<&'a str, NativeError> {
        match self.script_name() {
            "" => Err(NativeError::MissingScriptName {
                function: self.name.to_owned(),
            }),
            name => Ok(name),
        }
    }

    /// Describe this call as `Name(arg, arg, ...)`.
    pub fn describe(&self) -> String {
        let args: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

impl fmt::Debug for FunctionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("params_specified", &self.params_specified)
            .field("caller", &self.caller)
            .field("triggerer", &self.triggerer)
            .field("script", &self.script_name())
            .finish()
    }
}
