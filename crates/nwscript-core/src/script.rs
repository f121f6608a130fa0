//! Compiled scripts and captured script state.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::Variable;

/// Snapshot of a script's variable state, captured for a deferred command.
///
/// Replaying a state re-enters the script at `offset` with the captured
/// stack frames restored; it is not a resumption of the original call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScriptState {
    /// Bytecode offset of the captured action's entry point.
    pub offset: u32,
    /// Global stack at capture time.
    pub globals: Vec<Variable>,
    /// Local stack at capture time.
    pub locals: Vec<Variable>,
}

impl ScriptState {
    pub fn new(offset: u32, globals: Vec<Variable>, locals: Vec<Variable>) -> Self {
        Self {
            offset,
            globals,
            locals,
        }
    }
}

/// Named bindings inherited by scripts launched from another script.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScriptEnvironment {
    bindings: FxHashMap<String, Variable>,
}

impl ScriptEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.bindings.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Variable) {
        self.bindings.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.bindings.remove(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A loaded, compiled script ready for the interpreter.
#[derive(Debug, Clone)]
pub struct Script {
    name: String,
    bytecode: Arc<[u8]>,
    environment: ScriptEnvironment,
}

impl Script {
    pub fn new(name: impl Into<String>, bytecode: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytecode: bytecode.into(),
            environment: ScriptEnvironment::default(),
        }
    }

    /// Attach the environment inherited from a parent script.
    pub fn with_environment(mut self, environment: ScriptEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    pub fn environment(&self) -> &ScriptEnvironment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut ScriptEnvironment {
        &mut self.environment
    }
}
