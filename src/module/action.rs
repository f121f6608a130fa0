//! Deferred work items.

use nwscript_core::{ObjectId, ScriptState};
use nwscript_objects::ObjectReference;

/// What an action does when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Re-enter `script` with the captured `state`.
    Script { script: String, state: ScriptState },
    /// Remove the owner from the object registry.
    Destroy,
}

/// A pending deferred invocation.
///
/// Owner and triggerer are weak references; either may be gone by the time
/// the action fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub owner: ObjectReference,
    pub triggerer: ObjectReference,
    /// Fire time in clock milliseconds.
    pub timestamp: u64,
    pub(crate) seq: u64,
}

impl Action {
    pub fn script(
        script: impl Into<String>,
        state: ScriptState,
        owner: ObjectId,
        triggerer: ObjectId,
        timestamp: u64,
    ) -> Self {
        Self {
            kind: ActionKind::Script {
                script: script.into(),
                state,
            },
            owner: owner.into(),
            triggerer: triggerer.into(),
            timestamp,
            seq: 0,
        }
    }

    pub fn destroy(target: ObjectId, timestamp: u64) -> Self {
        Self {
            kind: ActionKind::Destroy,
            owner: target.into(),
            triggerer: ObjectReference::NONE,
            timestamp,
            seq: 0,
        }
    }

    /// Insertion sequence number, assigned when queued.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Name of the script this action re-enters, if any.
    pub fn script_name(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Script { script, .. } => Some(script),
            ActionKind::Destroy => None,
        }
    }

    pub(crate) fn key(&self) -> (u64, u64) {
        (self.timestamp, self.seq)
    }
}
