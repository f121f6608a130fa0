//! Weak, id-based object references.

use std::fmt;

use serde::{Deserialize, Serialize};

use nwscript_core::ObjectId;

use crate::{Object, ObjectContainer};

/// A non-owning handle to an object.
///
/// A reference stores only the target's id. Every access goes through an
/// [`ObjectContainer`] lookup, so a reference to a removed object resolves
/// to `None` instead of stale data.
///
/// A reference may hold the `OBJECT_SELF` sentinel; resolving it substitutes
/// the calling object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectReference {
    id: ObjectId,
}

impl ObjectReference {
    /// The empty reference.
    pub const NONE: ObjectReference = ObjectReference {
        id: ObjectId::INVALID,
    };

    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }

    /// The stored id, sentinels included.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Check if the reference is empty, without consulting a container.
    pub fn is_none(&self) -> bool {
        self.id.is_invalid()
    }

    /// The id this reference names for `caller`, or `INVALID` if it does not
    /// name a live object.
    pub fn resolve_id(&self, container: &ObjectContainer, caller: ObjectId) -> ObjectId {
        let id = self.id.or_caller(caller);
        if container.contains(id) {
            id
        } else {
            ObjectId::INVALID
        }
    }

    pub fn resolve<'c>(
        &self,
        container: &'c ObjectContainer,
        caller: ObjectId,
    ) -> Option<&'c Object> {
        container.get(self.id.or_caller(caller))
    }

    pub fn resolve_mut<'c>(
        &self,
        container: &'c mut ObjectContainer,
        caller: ObjectId,
    ) -> Option<&'c mut Object> {
        container.get_mut(self.id.or_caller(caller))
    }

    /// Check if the reference names a live object.
    pub fn is_valid(&self, container: &ObjectContainer, caller: ObjectId) -> bool {
        self.resolve(container, caller).is_some()
    }
}

impl Default for ObjectReference {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<ObjectId> for ObjectReference {
    fn from(id: ObjectId) -> Self {
        Self::new(id)
    }
}

impl From<&Object> for ObjectReference {
    fn from(object: &Object) -> Self {
        Self::new(object.id())
    }
}

impl fmt::Debug for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectReference({})", self.id)
    }
}
