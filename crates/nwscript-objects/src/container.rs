//! The authoritative registry of live objects.
//!
//! [`ObjectContainer`] owns every [`Object`] and keeps two secondary
//! indices, by type and by tag. Adding an object assigns its id; removing an
//! object purges it from every index before handing it back, so no search or
//! reference can observe a half-removed object.
//!
//! ## Example
//!
//! ```
//! use nwscript_objects::{Object, ObjectContainer, ObjectType};
//!
//! let mut container = ObjectContainer::new();
//! let door = container.add_object(Object::new(ObjectType::Door, "door1"));
//!
//! let mut search = container.find_objects_by_tag("door1");
//! assert_eq!(search.next(&container).map(|o| o.id()), Some(door));
//! assert!(search.next(&container).is_none());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use nwscript_core::ObjectId;

use crate::{Object, ObjectSearch, ObjectType, SearchKey};

/// Owner of all live objects, indexed by id, type and tag.
#[derive(Debug)]
pub struct ObjectContainer {
    objects: BTreeMap<ObjectId, Object>,
    by_type: FxHashMap<ObjectType, BTreeSet<ObjectId>>,
    by_tag: FxHashMap<String, BTreeSet<ObjectId>>,
    next_id: ObjectId,
}

impl Default for ObjectContainer {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
            by_type: FxHashMap::default(),
            by_tag: FxHashMap::default(),
            next_id: ObjectId::FIRST,
        }
    }
}

impl ObjectContainer {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Mutation
    // ==========================================================================

    /// Take ownership of an object, assign its id and index it.
    ///
    /// Ids are never reused, so a stale id can never name a newer object.
    /// Once the id space is used up the object is dropped and
    /// [`ObjectId::INVALID`] is returned.
    pub fn add_object(&mut self, mut object: Object) -> ObjectId {
        let id = self.next_id;
        if !id.is_concrete() {
            warn!(target: "nwscript", "object ids exhausted, dropping \"{}\"", object.tag());
            return ObjectId::INVALID;
        }
        self.next_id = id.next().unwrap_or(ObjectId::SELF);
        object.set_id(id);

        self.by_type.entry(object.object_type()).or_default().insert(id);
        self.by_tag
            .entry(object.tag().to_owned())
            .or_default()
            .insert(id);

        trace!(
            target: "nwscript",
            "added object {} ({:?}, \"{}\")",
            id,
            object.object_type(),
            object.tag()
        );
        self.objects.insert(id, object);
        id
    }

    /// Remove an object from every index and return it.
    ///
    /// Safe to call between steps of an active [`ObjectSearch`]: the search
    /// simply never yields the removed object.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let object = self.objects.remove(&id)?;

        Self::unindex(&mut self.by_type, &object.object_type(), id);
        Self::unindex(&mut self.by_tag, object.tag(), id);

        trace!(target: "nwscript", "removed object {}", id);
        Some(object)
    }

    /// Change an object's tag, keeping the tag index current.
    pub fn set_tag(&mut self, id: ObjectId, tag: impl Into<String>) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        let tag = tag.into();

        Self::unindex(&mut self.by_tag, object.tag(), id);
        self.by_tag.entry(tag.clone()).or_default().insert(id);
        object.set_tag(tag);
        true
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.by_type.clear();
        self.by_tag.clear();
    }

    fn unindex<K, Q>(index: &mut FxHashMap<K, BTreeSet<ObjectId>>, key: &Q, id: ObjectId)
    where
        K: std::borrow::Borrow<Q> + std::hash::Hash + Eq,
        Q: std::hash::Hash + Eq + ?Sized,
    {
        if let Some(ids) = index.get_mut(key) {
            ids.remove(&id);
            if ids.is_empty() {
                index.remove(key);
            }
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over all objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    // ==========================================================================
    // Searches
    // ==========================================================================

    /// Search every object.
    pub fn find_objects(&self) -> ObjectSearch {
        ObjectSearch::new(SearchKey::All, self.next_id)
    }

    pub fn find_objects_by_type(&self, object_type: ObjectType) -> ObjectSearch {
        ObjectSearch::new(SearchKey::Type(object_type), self.next_id)
    }

    pub fn find_objects_by_tag(&self, tag: &str) -> ObjectSearch {
        ObjectSearch::new(SearchKey::Tag(tag.to_owned()), self.next_id)
    }

    /// The `nth` (0-based) object with this tag, in creation order.
    pub fn find_object_by_tag(&self, tag: &str, nth: usize) -> Option<&Object> {
        self.by_tag
            .get(tag)?
            .iter()
            .nth(nth)
            .and_then(|id| self.objects.get(id))
    }

    /// The first id matching `key` strictly after `lower` and below `ceiling`.
    pub(crate) fn next_match(
        &self,
        key: &SearchKey,
        lower: Bound<ObjectId>,
        ceiling: ObjectId,
    ) -> Option<ObjectId> {
        let range = (lower, Bound::Excluded(ceiling));
        match key {
            SearchKey::All => self.objects.range(range).next().map(|(id, _)| *id),
            SearchKey::Type(ty) => self.by_type.get(ty)?.range(range).next().copied(),
            SearchKey::Tag(tag) => self.by_tag.get(tag.as_str())?.range(range).next().copied(),
        }
    }
}
