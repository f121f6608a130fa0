//! Test harness: a scripted interpreter backed by Rust closures.
//!
//! Each "script" is a closure standing in for compiled bytecode. It receives
//! the runtime and the invocation, and calls engine functions through
//! [`Runtime::call_function`] exactly as an interpreter would.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use nwscript::{
    CallSite, FunctionId, Interpreter, ManualClock, MemoryResolver, ObjectId, Runtime,
    RuntimeConfig, ScriptError, ScriptInvocation, ScriptState, Variable,
};

type ScriptFn = Box<dyn Fn(&mut Runtime, ScriptInvocation<'_>) -> Result<(), ScriptError>>;

/// Shared, append-only record of what scripts did.
#[derive(Clone, Default)]
pub struct Log {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

/// Interpreter that runs registered closures by script name.
#[derive(Default)]
pub struct TestInterpreter {
    scripts: FxHashMap<String, ScriptFn>,
}

impl Interpreter for TestInterpreter {
    fn run(
        &self,
        runtime: &mut Runtime,
        invocation: ScriptInvocation<'_>,
    ) -> Result<(), ScriptError> {
        let script = self
            .scripts
            .get(invocation.script.name())
            .ok_or_else(|| ScriptError::ScriptNotFound {
                name: invocation.script.name().to_owned(),
            })?;
        script(runtime, invocation)
    }
}

/// A runtime wired to a [`TestInterpreter`] and a [`ManualClock`].
pub struct Harness {
    pub runtime: Runtime,
    pub clock: ManualClock,
    pub log: Log,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// Advance the clock by `delta_ms` and pump once.
    pub fn pump_after(&mut self, delta_ms: u64) -> usize {
        self.clock.advance(delta_ms);
        self.runtime.pump()
    }
}

#[derive(Default)]
pub struct HarnessBuilder {
    config: RuntimeConfig,
    log: Log,
    interpreter: TestInterpreter,
    resolver: MemoryResolver,
}

impl HarnessBuilder {
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// The log scripts should write to.
    pub fn log(&self) -> Log {
        self.log.clone()
    }

    /// Register a script.
    pub fn script<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&mut Runtime, ScriptInvocation<'_>) -> Result<(), ScriptError> + 'static,
    {
        self.interpreter.scripts.insert(name.to_owned(), Box::new(f));
        self.resolver.insert(name, name.as_bytes().to_vec());
        self
    }

    /// Make a name resolvable without giving it an implementation, so
    /// running it fails inside the interpreter.
    pub fn broken_script(mut self, name: &str) -> Self {
        self.resolver.insert(name, vec![0u8]);
        self
    }

    pub fn build(self) -> Harness {
        let clock = ManualClock::new(0);
        let runtime = Runtime::new(
            self.config,
            Arc::new(self.interpreter),
            Arc::new(self.resolver),
        )
        .expect("engine function table registers")
        .with_clock(clock.clone());

        Harness {
            runtime,
            clock,
            log: self.log,
        }
    }
}

// ============================================================================
// Call helpers
// ============================================================================

/// The call site an interpreter would build for `invocation`.
pub fn site<'a>(invocation: &ScriptInvocation<'a>) -> CallSite<'a> {
    CallSite::new(invocation.owner, invocation.triggerer).with_script(invocation.script)
}

/// Call an engine function from within a script.
pub fn call(
    runtime: &mut Runtime,
    invocation: &ScriptInvocation<'_>,
    id: FunctionId,
    args: Vec<Variable>,
) -> Result<Variable, ScriptError> {
    Ok(runtime.call_function(id, args, site(invocation))?)
}

/// An `action` value capturing `tag` in its locals, so replays can tell
/// which deferred command they belong to.
pub fn action(tag: &str) -> Variable {
    Variable::ScriptState(Box::new(ScriptState::new(
        0,
        Vec::new(),
        vec![Variable::String(tag.to_owned())],
    )))
}

/// The tag captured by [`action`], if this invocation is a replay.
pub fn replayed_tag(invocation: &ScriptInvocation<'_>) -> Option<String> {
    invocation
        .state
        .and_then(|state| state.locals.first())
        .and_then(|v| v.as_str().ok())
        .map(str::to_owned)
}

/// Readable name of the invocation's owner, for log entries.
pub fn owner_tag(runtime: &Runtime, invocation: &ScriptInvocation<'_>) -> String {
    if invocation.owner == ObjectId::INVALID {
        return "<none>".to_owned();
    }
    runtime
        .objects()
        .get(invocation.owner)
        .map(|o| o.tag().to_owned())
        .unwrap_or_else(|| "<gone>".to_owned())
}
