//! Per-module scheduling state.
//!
//! A [`Module`] owns the two queues pumped once per game-loop tick:
//!
//! - the **action queue**, ordered by fire timestamp with ties broken by
//!   insertion order, holding deferred script invocations and delayed
//!   destroys;
//! - the **event queue**, a plain FIFO of input and environment events.
//!
//! The queues are drained independently. Draining the action queue is a
//! prefix scan that stops at the first action not yet due.

mod action;
mod event;

pub use action::{Action, ActionKind};
pub use event::{Event, EventKind, EventSink};

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use nwscript_core::ObjectId;

/// Action and event queues of one loaded module.
#[derive(Debug)]
pub struct Module {
    object: ObjectId,
    actions: BTreeMap<(u64, u64), Action>,
    events: VecDeque<Event>,
    next_seq: u64,
    running: bool,
}

impl Module {
    /// Create a running module represented by `object` in the registry.
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            actions: BTreeMap::new(),
            events: VecDeque::new(),
            next_seq: 0,
            running: true,
        }
    }

    /// The module's own object id (`GetModule`).
    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    // ==========================================================================
    // Actions
    // ==========================================================================

    /// Queue an action, returning its sequence number.
    pub fn queue_action(&mut self, mut action: Action) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        action.seq = seq;

        debug!(
            target: "nwscript",
            "queued action #{} {:?} for {} at {}ms",
            seq,
            action.script_name().unwrap_or("<destroy>"),
            action.owner.id(),
            action.timestamp
        );
        self.actions.insert(action.key(), action);
        seq
    }

    /// Remove and return the due actions, in firing order.
    ///
    /// An action is due when its timestamp is at most `now`. At most `limit`
    /// actions are taken; the rest stay queued.
    pub fn take_due(&mut self, now: u64, limit: Option<usize>) -> Vec<Action> {
        let mut due = Vec::new();
        while limit.is_none_or(|limit| due.len() < limit) {
            let Some(entry) = self.actions.first_entry() else {
                break;
            };
            if entry.get().timestamp > now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// Drop every pending script action owned by `owner`, returning how many.
    ///
    /// A delayed destroy is irrevocable and stays queued.
    pub fn clear_actions_for(&mut self, owner: ObjectId) -> usize {
        let before = self.actions.len();
        self.actions.retain(|_, action| {
            action.owner.id() != owner || matches!(action.kind, ActionKind::Destroy)
        });
        let removed = before - self.actions.len();
        if removed > 0 {
            debug!(target: "nwscript", "cleared {} actions of {}", removed, owner);
        }
        removed
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }

    /// Fire time of the earliest pending action.
    pub fn next_fire_time(&self) -> Option<u64> {
        self.actions.first_key_value().map(|(_, a)| a.timestamp)
    }

    /// Pending actions in firing order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    // ==========================================================================
    // Events
    // ==========================================================================

    pub fn add_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Remove and return every queued event, oldest first.
    pub fn take_events(&mut self) -> VecDeque<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Drop all queued actions and events.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.events.clear();
    }
}
