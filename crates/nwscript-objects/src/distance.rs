//! Distance ordering and nearest-object selection.

use std::cmp::Ordering;

use nwscript_core::Vector;

use crate::{Object, ObjectContainer, ObjectSearch, ObjectTypeMask};

/// Orders objects by Manhattan distance to a fixed target position.
///
/// Objects without a position sort after every placed object. Sorting with
/// [`ObjectDistanceSort::sort`] is stable: objects at equal distance keep
/// the order they were supplied in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectDistanceSort {
    target: Vector,
}

impl ObjectDistanceSort {
    pub fn new(target: Vector) -> Self {
        Self { target }
    }

    /// Sort around an object's position, if it has one.
    pub fn around(object: &Object) -> Option<Self> {
        object.position().map(Self::new)
    }

    pub fn target(&self) -> Vector {
        self.target
    }

    /// Manhattan distance from the target, infinite for unplaced objects.
    pub fn distance(&self, object: &Object) -> f32 {
        object
            .position()
            .map_or(f32::INFINITY, |p| p.manhattan_distance(&self.target))
    }

    pub fn compare(&self, a: &Object, b: &Object) -> Ordering {
        self.distance(a).total_cmp(&self.distance(b))
    }

    pub fn sort(&self, objects: &mut [&Object]) {
        objects.sort_by(|a, b| self.compare(a, b));
    }
}

/// The `nth` (0-based) closest object to `target`.
///
/// Candidates differ from the target, share its area, match `mask` (and
/// `tag`, if given) and have a position. Returns `None` if the target is
/// unplaced or fewer than `nth + 1` candidates qualify.
pub fn nearest_object<'c>(
    container: &'c ObjectContainer,
    target: &Object,
    mask: ObjectTypeMask,
    nth: usize,
    tag: Option<&str>,
) -> Option<&'c Object> {
    let sort = ObjectDistanceSort::around(target)?;
    let area = target.area().id();

    let mut search: ObjectSearch = match tag {
        Some(tag) => container.find_objects_by_tag(tag),
        None => container.find_objects(),
    };

    let mut candidates: Vec<&Object> = search
        .iter(container)
        .filter(|o| o.id() != target.id())
        .filter(|o| o.area().id() == area)
        .filter(|o| mask.matches(o.object_type()))
        .filter(|o| o.position().is_some())
        .collect();

    sort.sort(&mut candidates);
    candidates.get(nth).copied()
}
