//! Stable object identifiers.
//!
//! Every live game object is addressed by an [`ObjectId`]. Ids are assigned
//! once, never reused within a run, and are the only form in which an object
//! handle is stored in a [`Variable`](crate::Variable) or persisted to disk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Process-unique numeric id of a game object.
///
/// Two values are reserved as sentinels:
///
/// - [`ObjectId::INVALID`]: the "none" object (`OBJECT_INVALID` in scripts).
/// - [`ObjectId::SELF`]: the "calling object" placeholder (`OBJECT_SELF`),
///   which is substituted by the caller when a reference is resolved.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// The "none" object.
    pub const INVALID: ObjectId = ObjectId(u32::MAX);

    /// Placeholder for the calling object.
    pub const SELF: ObjectId = ObjectId(u32::MAX - 1);

    /// First id handed out by an object container.
    pub const FIRST: ObjectId = ObjectId(1);

    /// Check if this is the "none" sentinel.
    pub fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    /// Check if this is the "self" sentinel.
    pub fn is_self(self) -> bool {
        self == Self::SELF
    }

    /// Check if this id can name a real object (neither sentinel).
    pub fn is_concrete(self) -> bool {
        !self.is_invalid() && !self.is_self()
    }

    /// Substitute the caller for the "self" sentinel.
    pub fn or_caller(self, caller: ObjectId) -> ObjectId {
        if self.is_self() { caller } else { self }
    }

    /// The id following this one, for allocators.
    ///
    /// `None` once the successor would collide with a sentinel.
    pub fn next(self) -> Option<ObjectId> {
        self.0.checked_add(1).map(ObjectId).filter(|id| id.is_concrete())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INVALID => write!(f, "OBJECT_INVALID"),
            Self::SELF => write!(f, "OBJECT_SELF"),
            ObjectId(id) => write!(f, "#{id}"),
        }
    }
}
