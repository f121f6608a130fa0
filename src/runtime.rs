//! The runtime context passed to every engine function and interpreter run.
//!
//! A [`Runtime`] owns everything a script can reach: the engine function
//! registry, the live object registry, the module's action and event queues,
//! the clock and the random source. There is no global state; native
//! callbacks receive the runtime as an explicit `&mut` argument.
//!
//! ## Borrowing
//!
//! The function registry and the interpreter are shared through `Arc`s.
//! Dispatch clones the `Arc` first, so a callback can hold `&mut Runtime`
//! while the registry entry it runs from stays borrowed.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use nwscript_core::{
    DispatchError, FunctionId, ObjectId, Parameters, RegistrationError, Script, ScriptEnvironment,
    ScriptError, ScriptState, Variable, Vector,
};
use nwscript_objects::{Object, ObjectContainer, ObjectType, Relation};
use nwscript_registry::{CallSite, FunctionManager};

use crate::functions;
use crate::interpreter::{Interpreter, ScriptInvocation, ScriptResolver};
use crate::module::{Action, ActionKind, Event, EventKind, EventSink, Module};
use crate::{Clock, FrameLock, RuntimeConfig, SystemClock};

/// Tag of the module's own object.
pub const MODULE_TAG: &str = "module";

/// The scripting runtime for one loaded module.
pub struct Runtime {
    config: RuntimeConfig,
    functions: Arc<FunctionManager<Runtime>>,
    objects: ObjectContainer,
    module: Module,
    clock: Arc<dyn Clock>,
    interpreter: Arc<dyn Interpreter>,
    resolver: Arc<dyn ScriptResolver>,
    event_sink: Option<Box<dyn EventSink>>,
    frame_lock: FrameLock,
    rng: StdRng,
    depth: usize,
}

impl Runtime {
    /// Create a runtime with the full engine function table registered.
    ///
    /// # Errors
    ///
    /// Fails only if the engine function table is malformed.
    pub fn new(
        config: RuntimeConfig,
        interpreter: Arc<dyn Interpreter>,
        resolver: Arc<dyn ScriptResolver>,
    ) -> Result<Self, RegistrationError> {
        let mut manager = FunctionManager::new();
        manager.set_log_unimplemented(config.log_unimplemented);
        manager.register_table(functions::engine_functions())?;

        let mut objects = ObjectContainer::new();
        let module = Module::new(objects.add_object(Object::new(ObjectType::Module, MODULE_TAG)));

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(target: "nwscript", "runtime ready with {} engine functions", manager.len());

        Ok(Self {
            config,
            functions: Arc::new(manager),
            objects,
            module,
            clock: Arc::new(SystemClock::new()),
            interpreter,
            resolver,
            event_sink: None,
            frame_lock: FrameLock::new(),
            rng,
            depth: 0,
        })
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Forward drained events to `sink`.
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.event_sink = Some(Box::new(sink));
        self
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn functions(&self) -> &FunctionManager<Runtime> {
        &self.functions
    }

    pub fn objects(&self) -> &ObjectContainer {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectContainer {
        &mut self.objects
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    /// A handle to the frame lock, for a render thread.
    pub fn frame_lock(&self) -> &FrameLock {
        &self.frame_lock
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Current `ExecuteScript` nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A random integer in `0..max`, or 0 if `max` is not positive.
    pub fn random(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }

    // ==========================================================================
    // Objects
    // ==========================================================================

    pub fn add_object(&mut self, object: Object) -> ObjectId {
        self.objects.add_object(object)
    }

    /// Remove an object while holding the frame lock.
    ///
    /// Pending actions owned by the object stay queued and are skipped when
    /// they come due.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let _frame = self.frame_lock.lock();
        self.objects.remove_object(id)
    }

    /// Move an object into `area` at `position` as one frame-locked update.
    pub fn move_object(&mut self, id: ObjectId, area: ObjectId, position: Vector) -> bool {
        let _frame = self.frame_lock.lock();
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        object.set_relation(Relation::Area, area);
        object.set_position(position);
        true
    }

    // ==========================================================================
    // Engine Functions
    // ==========================================================================

    /// Call an engine function by id.
    pub fn call_function(
        &mut self,
        id: FunctionId,
        args: Parameters,
        site: CallSite<'_>,
    ) -> Result<Variable, DispatchError> {
        let functions = Arc::clone(&self.functions);
        functions.call(self, id, args, site)
    }

    pub fn call_function_by_name(
        &mut self,
        name: &str,
        args: Parameters,
        site: CallSite<'_>,
    ) -> Result<Variable, DispatchError> {
        let functions = Arc::clone(&self.functions);
        functions.call_by_name(self, name, args, site)
    }

    // ==========================================================================
    // Scripts
    // ==========================================================================

    pub fn load_script(&self, name: &str) -> Result<Script, ScriptError> {
        self.resolver
            .resolve(name)
            .map(|bytecode| Script::new(name, bytecode))
            .ok_or_else(|| ScriptError::ScriptNotFound { name: name.into() })
    }

    /// Run a script from its entry point on `owner`.
    pub fn run_script(
        &mut self,
        name: &str,
        owner: ObjectId,
        triggerer: ObjectId,
    ) -> Result<(), ScriptError> {
        let script = self.load_script(name)?;
        self.run_loaded(&script, owner, triggerer, None)
    }

    /// Run a script launched by another script, inheriting its environment.
    pub fn execute_script(
        &mut self,
        name: &str,
        owner: ObjectId,
        triggerer: ObjectId,
        environment: ScriptEnvironment,
    ) -> Result<(), ScriptError> {
        let script = self.load_script(name)?.with_environment(environment);
        self.run_loaded(&script, owner, triggerer, None)
    }

    fn run_loaded(
        &mut self,
        script: &Script,
        owner: ObjectId,
        triggerer: ObjectId,
        state: Option<&ScriptState>,
    ) -> Result<(), ScriptError> {
        if self.depth >= self.config.max_script_depth {
            return Err(ScriptError::DepthExceeded {
                script: script.name().to_owned(),
                depth: self.config.max_script_depth,
            });
        }

        let invocation = ScriptInvocation {
            script,
            owner,
            triggerer,
            state,
        };
        let interpreter = Arc::clone(&self.interpreter);

        self.depth += 1;
        let result = interpreter.run(self, invocation);
        self.depth -= 1;
        result
    }

    // ==========================================================================
    // Scheduling
    // ==========================================================================

    /// Schedule `script` to re-run with `state` after `delay_ms`.
    ///
    /// A delay of 0 runs on the next pump, never synchronously.
    pub fn delay_script(
        &mut self,
        script: impl Into<String>,
        state: ScriptState,
        owner: ObjectId,
        triggerer: ObjectId,
        delay_ms: u64,
    ) -> u64 {
        let timestamp = self.now_ms().saturating_add(delay_ms);
        self.module
            .queue_action(Action::script(script, state, owner, triggerer, timestamp))
    }

    /// Schedule removal of `target` after `delay_ms`.
    pub fn destroy_object_delayed(&mut self, target: ObjectId, delay_ms: u64) -> u64 {
        let timestamp = self.now_ms().saturating_add(delay_ms);
        self.module.queue_action(Action::destroy(target, timestamp))
    }

    pub fn add_event(&mut self, event: Event) {
        self.module.add_event(event);
    }

    /// Queue an event stamped with the current time.
    pub fn push_event(&mut self, kind: EventKind) {
        let event = Event::new(self.now_ms(), kind);
        self.module.add_event(event);
    }

    /// Run one game-loop tick.
    ///
    /// Drains the event queue in FIFO order, then fires every action due at
    /// the current time in timestamp order. Actions queued while pumping
    /// wait for the next pump. Returns the number of due actions taken off
    /// the queue, including any skipped because their owner is gone.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn pump(&mut self) -> usize {
        let now = self.now_ms();
        self.dispatch_events();

        if !self.module.is_running() {
            return 0;
        }

        let due = self.module.take_due(now, self.config.max_actions_per_pump);
        let fired = due.len();
        for action in due {
            self.fire_action(action);
        }
        fired
    }

    fn dispatch_events(&mut self) {
        for event in self.module.take_events() {
            debug!(target: "nwscript", "event {:?} at {}ms", event.kind, event.timestamp);
            if event.kind == EventKind::Quit {
                self.module.stop();
            }
            if let Some(sink) = self.event_sink.as_mut() {
                sink.handle_event(&event);
            }
        }
    }

    fn fire_action(&mut self, action: Action) {
        let scheduled_owner = action.owner.id();
        let owner = action.owner.resolve_id(&self.objects, ObjectId::INVALID);
        if scheduled_owner.is_concrete() && owner.is_invalid() {
            debug!(
                target: "nwscript",
                "skipping action #{}: owner {} is gone",
                action.seq(),
                scheduled_owner
            );
            return;
        }

        match action.kind {
            ActionKind::Script { script, state } => {
                let triggerer = action.triggerer.resolve_id(&self.objects, ObjectId::INVALID);
                debug!(target: "nwscript", "firing \"{}\" on {}", script, owner);

                let result = self
                    .load_script(&script)
                    .and_then(|loaded| self.run_loaded(&loaded, owner, triggerer, Some(&state)));
                if let Err(err) = result {
                    warn!(
                        target: "nwscript",
                        "deferred \"{}\" on {} failed: {}",
                        script,
                        owner,
                        err
                    );
                }
            }
            ActionKind::Destroy => {
                debug!(target: "nwscript", "destroying {}", owner);
                self.remove_object(owner);
            }
        }
    }

    // ==========================================================================
    // Shutdown
    // ==========================================================================

    /// Stop the module and release every object, action and registration.
    pub fn shutdown(&mut self) {
        self.module.stop();
        self.module.clear();
        self.objects.clear();
        match Arc::get_mut(&mut self.functions) {
            Some(functions) => functions.clear(),
            None => self.functions = Arc::new(FunctionManager::new()),
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("functions", &self.functions.len())
            .field("objects", &self.objects.len())
            .field("module", &self.module)
            .field("depth", &self.depth)
            .finish()
    }
}
