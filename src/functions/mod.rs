//! The engine function table.
//!
//! Every entry binds a stable NWScript function id to its name, signature,
//! trailing defaults and (if implemented) its native callback. Ids and
//! signatures are the wire contract with compiled scripts and never change.
//!
//! Entries without a callback are still declared: calling them logs a
//! diagnostic and returns the zero value of the return type.
//!
//! The table is split by concern:
//!
//! - [`basic`]: math, strings, printing
//! - [`actions`]: deferred commands, nested scripts, destruction
//! - [`objects`]: object queries and local variables

mod actions;
mod basic;
mod objects;

use nwscript_core::{Defaults, FunctionId, NativeError, ObjectId, Signature, Variable, VariableType};
use nwscript_objects::ObjectReference;
use nwscript_registry::{FunctionContext, FunctionDef};

use crate::Runtime;

/// Stable engine function ids.
pub mod id {
    use nwscript_core::FunctionId;

    pub const RANDOM: FunctionId = FunctionId(0);
    pub const PRINT_STRING: FunctionId = FunctionId(1);
    pub const PRINT_FLOAT: FunctionId = FunctionId(2);
    pub const FLOAT_TO_STRING: FunctionId = FunctionId(3);
    pub const PRINT_INTEGER: FunctionId = FunctionId(4);
    pub const PRINT_OBJECT: FunctionId = FunctionId(5);
    pub const ASSIGN_COMMAND: FunctionId = FunctionId(6);
    pub const DELAY_COMMAND: FunctionId = FunctionId(7);
    pub const EXECUTE_SCRIPT: FunctionId = FunctionId(8);
    pub const CLEAR_ALL_ACTIONS: FunctionId = FunctionId(9);
    pub const SET_FACING: FunctionId = FunctionId(10);
    pub const GET_AREA: FunctionId = FunctionId(24);
    pub const GET_POSITION: FunctionId = FunctionId(27);
    pub const GET_DISTANCE_TO_OBJECT: FunctionId = FunctionId(41);
    pub const GET_IS_OBJECT_VALID: FunctionId = FunctionId(42);
    pub const GET_LOCAL_INT: FunctionId = FunctionId(51);
    pub const GET_LOCAL_FLOAT: FunctionId = FunctionId(52);
    pub const GET_LOCAL_STRING: FunctionId = FunctionId(53);
    pub const GET_LOCAL_OBJECT: FunctionId = FunctionId(54);
    pub const SET_LOCAL_INT: FunctionId = FunctionId(55);
    pub const SET_LOCAL_FLOAT: FunctionId = FunctionId(56);
    pub const SET_LOCAL_STRING: FunctionId = FunctionId(57);
    pub const SET_LOCAL_OBJECT: FunctionId = FunctionId(58);
    pub const GET_STRING_LENGTH: FunctionId = FunctionId(59);
    pub const INT_TO_STRING: FunctionId = FunctionId(92);
    pub const GET_OBJECT_TYPE: FunctionId = FunctionId(106);
    pub const GET_DISTANCE_BETWEEN: FunctionId = FunctionId(151);
    pub const GET_TAG: FunctionId = FunctionId(168);
    pub const GET_OBJECT_BY_TAG: FunctionId = FunctionId(200);
    pub const SPEAK_STRING: FunctionId = FunctionId(221);
    pub const GET_NEAREST_OBJECT: FunctionId = FunctionId(227);
    pub const GET_NEAREST_OBJECT_BY_TAG: FunctionId = FunctionId(229);
    pub const INT_TO_FLOAT: FunctionId = FunctionId(230);
    pub const FLOAT_TO_INT: FunctionId = FunctionId(231);
    pub const STRING_TO_INT: FunctionId = FunctionId(232);
    pub const DESTROY_OBJECT: FunctionId = FunctionId(241);
    pub const GET_MODULE: FunctionId = FunctionId(242);
    pub const DELETE_LOCAL_INT: FunctionId = FunctionId(265);
    pub const DELETE_LOCAL_FLOAT: FunctionId = FunctionId(266);
    pub const DELETE_LOCAL_STRING: FunctionId = FunctionId(267);
    pub const DELETE_LOCAL_OBJECT: FunctionId = FunctionId(268);
    pub const ACTION_DO_COMMAND: FunctionId = FunctionId(294);
}

/// `OBJECT_TYPE_INVALID`, returned by `GetObjectType` for missing objects.
pub const OBJECT_TYPE_INVALID: i32 = 32767;

/// The complete engine function table.
pub fn engine_functions() -> Vec<FunctionDef<Runtime>> {
    let mut table = Vec::new();
    basic::declare(&mut table);
    actions::declare(&mut table);
    objects::declare(&mut table);
    table.sort_by_key(|def| def.id);
    table
}

// ============================================================================
// Helpers
// ============================================================================

type Table = Vec<FunctionDef<Runtime>>;

fn def(
    id: FunctionId,
    name: &str,
    return_type: VariableType,
    params: &[VariableType],
    defaults: &[Variable],
) -> FunctionDef<Runtime> {
    FunctionDef::new(
        id.0,
        name,
        Signature::new(return_type, params),
        Defaults::new(defaults.to_vec()),
    )
}

/// Object argument `index`, resolved to a live id (`OBJECT_SELF` becomes the
/// caller). `INVALID` if the object does not exist.
fn object_arg(
    runtime: &Runtime,
    ctx: &FunctionContext<'_>,
    index: usize,
) -> Result<ObjectId, NativeError> {
    let id: ObjectId = ctx.arg(index)?;
    Ok(ObjectReference::new(id).resolve_id(runtime.objects(), ctx.caller()))
}

/// Script seconds to scheduler milliseconds; negative and NaN delays are 0.
fn seconds_to_ms(seconds: f32) -> u64 {
    if seconds > 0.0 {
        (f64::from(seconds) * 1000.0).round() as u64
    } else {
        0
    }
}
