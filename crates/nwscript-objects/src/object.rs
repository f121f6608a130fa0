//! The scripting object entity.
//!
//! An [`Object`] is one live game entity as seen by scripts: a unique id, a
//! tag, a closed [`ObjectType`], a local-variable table and a handful of
//! optional components. Game-specific state is composed in through
//! components rather than subtypes; callers ask for a capability
//! ([`Object::inventory`], [`Object::trap`]) and get `None` when the object
//! does not have it.
//!
//! Relationships to other objects (current area, linked door, last attacker,
//! master) are [`ObjectReference`]s keyed by [`Relation`]. They never own
//! their target and resolve to nothing once the target is removed.

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use nwscript_core::{ObjectId, Variable, Vector};

use crate::ObjectReference;

// ============================================================================
// Object Types
// ============================================================================

/// Closed set of object types.
///
/// Discriminants are the script-visible `OBJECT_TYPE_*` bit values, so a type
/// converts losslessly to and from the integer scripts pass around.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u32)]
pub enum ObjectType {
    Creature = 1,
    Item = 2,
    Trigger = 4,
    Door = 8,
    AreaOfEffect = 16,
    Waypoint = 32,
    Placeable = 64,
    Store = 128,
    Encounter = 256,
    Area = 4096,
    Module = 8192,
    Sound = 16384,
}

impl ObjectType {
    /// The single-bit mask selecting this type.
    pub fn mask(self) -> ObjectTypeMask {
        ObjectTypeMask::from_bits_truncate(u32::from(self))
    }
}

bitflags! {
    /// A set of object types, as passed to the `GetNearestObject` family.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObjectTypeMask: u32 {
        const CREATURE = 1;
        const ITEM = 2;
        const TRIGGER = 4;
        const DOOR = 8;
        const AREA_OF_EFFECT = 16;
        const WAYPOINT = 32;
        const PLACEABLE = 64;
        const STORE = 128;
        const ENCOUNTER = 256;
        const AREA = 4096;
        const MODULE = 8192;
        const SOUND = 16384;
        /// `OBJECT_TYPE_ALL`.
        const ALL = 32767;
    }
}

impl ObjectTypeMask {
    /// Check if this mask selects `ty`.
    pub fn matches(self, ty: ObjectType) -> bool {
        self.intersects(ty.mask())
    }

    /// Convert a script integer, ignoring unknown bits.
    pub fn from_script(value: i32) -> Self {
        Self::from_bits_truncate(value as u32)
    }
}

impl Default for ObjectTypeMask {
    fn default() -> Self {
        Self::ALL
    }
}

// ============================================================================
// Relations and Components
// ============================================================================

/// Named back-reference from one object to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// The area the object currently stands in.
    Area,
    /// Door or trigger transition target.
    LinkedTo,
    LastAttacker,
    /// Summoner, henchman owner or similar.
    Master,
}

/// Item storage carried by creatures, placeables and stores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<ObjectReference>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, ignoring duplicates.
    pub fn add_item(&mut self, item: ObjectId) {
        let item = ObjectReference::new(item);
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    /// Remove an item, returning whether it was present.
    pub fn remove_item(&mut self, item: ObjectId) -> bool {
        let before = self.items.len();
        self.items.retain(|r| r.id() != item);
        self.items.len() != before
    }

    pub fn contains(&self, item: ObjectId) -> bool {
        self.items.iter().any(|r| r.id() == item)
    }

    pub fn items(&self) -> &[ObjectReference] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trap state carried by doors, placeables and triggers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trap {
    pub trap_type: u32,
    pub detect_dc: i32,
    pub disarm_dc: i32,
    pub detectable: bool,
    pub disarmable: bool,
    pub detected: bool,
    pub active: bool,
}

impl Trap {
    /// An armed trap of the given type.
    pub fn armed(trap_type: u32) -> Self {
        Self {
            trap_type,
            detectable: true,
            disarmable: true,
            active: true,
            ..Self::default()
        }
    }

    pub fn disarm(&mut self) {
        self.active = false;
    }
}

// ============================================================================
// Object
// ============================================================================

/// A live scripting object.
///
/// The id is [`ObjectId::INVALID`] until the object is added to an
/// [`ObjectContainer`](crate::ObjectContainer), which assigns it. The tag is
/// indexed by the container, so it is changed through
/// [`ObjectContainer::set_tag`](crate::ObjectContainer::set_tag).
#[derive(Debug, Clone)]
pub struct Object {
    id: ObjectId,
    object_type: ObjectType,
    tag: String,
    name: String,
    position: Option<Vector>,
    orientation: Option<f32>,
    locals: FxHashMap<String, Variable>,
    relations: FxHashMap<Relation, ObjectReference>,
    inventory: Option<Inventory>,
    trap: Option<Trap>,
}

impl Object {
    pub fn new(object_type: ObjectType, tag: impl Into<String>) -> Self {
        Self {
            id: ObjectId::INVALID,
            object_type,
            tag: tag.into(),
            name: String::new(),
            position: None,
            orientation: None,
            locals: FxHashMap::default(),
            relations: FxHashMap::default(),
            inventory: None,
            trap: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Vector) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_orientation(mut self, orientation: f32) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_relation(mut self, relation: Relation, target: ObjectId) -> Self {
        self.set_relation(relation, target);
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn with_trap(mut self, trap: Trap) -> Self {
        self.trap = Some(trap);
        self
    }

    // ==========================================================================
    // Identity
    // ==========================================================================

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn set_tag(&mut self, tag: String) {
        self.tag = tag;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ==========================================================================
    // Placement
    // ==========================================================================

    pub fn position(&self) -> Option<Vector> {
        self.position
    }

    pub fn set_position(&mut self, position: Vector) {
        self.position = Some(position);
    }

    /// Facing in degrees, if the object is placed.
    pub fn orientation(&self) -> Option<f32> {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: f32) {
        self.orientation = Some(orientation);
    }

    // ==========================================================================
    // Relations
    // ==========================================================================

    /// The referenced object, or an empty reference if none was set.
    pub fn relation(&self, relation: Relation) -> ObjectReference {
        self.relations
            .get(&relation)
            .copied()
            .unwrap_or(ObjectReference::NONE)
    }

    pub fn set_relation(&mut self, relation: Relation, target: ObjectId) {
        if target.is_invalid() {
            self.relations.remove(&relation);
        } else {
            self.relations.insert(relation, ObjectReference::new(target));
        }
    }

    pub fn clear_relation(&mut self, relation: Relation) {
        self.relations.remove(&relation);
    }

    /// Shortcut for the [`Relation::Area`] reference.
    pub fn area(&self) -> ObjectReference {
        self.relation(Relation::Area)
    }

    // ==========================================================================
    // Components
    // ==========================================================================

    pub fn inventory(&self) -> Option<&Inventory> {
        self.inventory.as_ref()
    }

    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        self.inventory.as_mut()
    }

    pub fn trap(&self) -> Option<&Trap> {
        self.trap.as_ref()
    }

    pub fn trap_mut(&mut self) -> Option<&mut Trap> {
        self.trap.as_mut()
    }

    /// Check if the object carries an armed trap.
    pub fn is_trapped(&self) -> bool {
        self.trap.as_ref().is_some_and(|t| t.active)
    }

    // ==========================================================================
    // Local Variables
    // ==========================================================================

    pub fn get_local(&self, name: &str) -> Option<&Variable> {
        self.locals.get(name)
    }

    pub fn set_local(&mut self, name: impl Into<String>, value: Variable) {
        self.locals.insert(name.into(), value);
    }

    pub fn delete_local(&mut self, name: &str) -> Option<Variable> {
        self.locals.remove(name)
    }

    /// Integer local, or 0 if absent or of another type.
    pub fn local_int(&self, name: &str) -> i32 {
        self.get_local(name)
            .and_then(|v| v.as_int().ok())
            .unwrap_or_default()
    }

    /// Float local, or 0.0 if absent or of another type.
    pub fn local_float(&self, name: &str) -> f32 {
        self.get_local(name)
            .and_then(|v| v.as_float().ok())
            .unwrap_or_default()
    }

    /// String local, or "" if absent or of another type.
    pub fn local_string(&self, name: &str) -> &str {
        self.get_local(name)
            .and_then(|v| v.as_str().ok())
            .unwrap_or_default()
    }

    /// Object local, or `OBJECT_INVALID` if absent or of another type.
    pub fn local_object(&self, name: &str) -> ObjectId {
        self.get_local(name)
            .and_then(|v| v.as_object().ok())
            .unwrap_or(ObjectId::INVALID)
    }

    pub fn locals(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.locals.iter().map(|(k, v)| (k.as_str(), v))
    }
}
