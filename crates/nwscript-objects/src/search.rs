//! Lazy, single-pass searches over the object registry.
//!
//! An [`ObjectSearch`] does not borrow the container it searches. Each step
//! looks up the next matching id after the last one it yielded, so objects
//! may be removed between steps; a removed object is simply never yielded.
//! Objects added after the search was created are not observed.

use std::ops::Bound;

use nwscript_core::ObjectId;

use crate::{Object, ObjectContainer, ObjectType};

/// Which index a search walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKey {
    All,
    Type(ObjectType),
    Tag(String),
}

/// A single-pass cursor over one index of an [`ObjectContainer`].
///
/// Once exhausted, a search stays exhausted.
#[derive(Debug, Clone)]
pub struct ObjectSearch {
    key: SearchKey,
    last: Option<ObjectId>,
    ceiling: ObjectId,
    current: ObjectId,
    done: bool,
}

impl ObjectSearch {
    pub(crate) fn new(key: SearchKey, ceiling: ObjectId) -> Self {
        Self {
            key,
            last: None,
            ceiling,
            current: ObjectId::INVALID,
            done: false,
        }
    }

    pub fn key(&self) -> &SearchKey {
        &self.key
    }

    /// Advance to the next matching object.
    ///
    /// Returns `None` at exhaustion.
    #[allow(clippy::should_implement_trait)]
    pub fn next<'c>(&mut self, container: &'c ObjectContainer) -> Option<&'c Object> {
        let id = self.next_id(container);
        container.get(id)
    }

    /// Advance and return the next matching id, or `INVALID` at exhaustion.
    pub fn next_id(&mut self, container: &ObjectContainer) -> ObjectId {
        if self.done {
            return ObjectId::INVALID;
        }

        let lower = match self.last {
            Some(id) => Bound::Excluded(id),
            None => Bound::Unbounded,
        };
        match container.next_match(&self.key, lower, self.ceiling) {
            Some(id) => {
                self.last = Some(id);
                self.current = id;
            }
            None => {
                self.done = true;
                self.current = ObjectId::INVALID;
            }
        }
        self.current
    }

    /// The current object without advancing.
    ///
    /// `None` before the first step, after exhaustion, or if the current
    /// object was removed since it was yielded.
    pub fn get<'c>(&self, container: &'c ObjectContainer) -> Option<&'c Object> {
        container.get(self.current)
    }

    /// The current id, `INVALID` before the first step and after exhaustion.
    pub fn current(&self) -> ObjectId {
        self.current
    }

    pub fn is_exhausted(&self) -> bool {
        self.done
    }

    /// Borrow the container and drain the rest of the search as an iterator.
    pub fn iter<'s, 'c>(&'s mut self, container: &'c ObjectContainer) -> SearchIter<'s, 'c> {
        SearchIter {
            search: self,
            container,
        }
    }
}

/// Iterator adapter over an [`ObjectSearch`] with the container borrowed.
pub struct SearchIter<'s, 'c> {
    search: &'s mut ObjectSearch,
    container: &'c ObjectContainer,
}

impl<'c> Iterator for SearchIter<'_, 'c> {
    type Item = &'c Object;

    fn next(&mut self) -> Option<Self::Item> {
        self.search.next(self.container)
    }
}
