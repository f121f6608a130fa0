//! Live object registry for the NWScript runtime.
//!
//! - [`Object`]: a scripting entity with an id, tag, type, locals and
//!   optional components
//! - [`ObjectContainer`]: the single owner of all live objects, indexed by
//!   id, type and tag
//! - [`ObjectReference`]: a weak, id-based handle that resolves through the
//!   container
//! - [`ObjectSearch`]: a lazy single-pass cursor over one index
//! - [`ObjectDistanceSort`] / [`nearest_object`]: distance ranking for the
//!   `GetNearestObject` family
//!
//! Missing objects are never errors here. Lookups of removed or unknown ids
//! return `None`, and id-returning helpers return
//! [`ObjectId::INVALID`](nwscript_core::ObjectId::INVALID).

mod container;
mod distance;
mod object;
mod reference;
mod search;

pub use container::ObjectContainer;
pub use distance::{ObjectDistanceSort, nearest_object};
pub use object::{Inventory, Object, ObjectType, ObjectTypeMask, Relation, Trap};
pub use reference::ObjectReference;
pub use search::{ObjectSearch, SearchIter, SearchKey};
