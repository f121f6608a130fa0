//! Object queries, placement and local variables.
//!
//! Every object argument may be `OBJECT_SELF` (the caller) or name an object
//! that no longer exists. Missing objects yield the zero value of the return
//! type, never an error.

use nwscript_core::{NativeError, ObjectId, Variable, VariableType, Vector};
use nwscript_objects::{ObjectTypeMask, nearest_object};
use nwscript_registry::FunctionContext;

use super::{OBJECT_TYPE_INVALID, Table, def, id, object_arg};
use crate::Runtime;

use VariableType::{Float, Int, Object, String as Str, Vector as Vec3, Void};

pub(super) fn declare(table: &mut Table) {
    let self_ = Variable::Object(ObjectId::SELF);

    table.extend([
        def(id::SET_FACING, "SetFacing", Void, &[Float], &[]),
        def(id::GET_AREA, "GetArea", Object, &[Object], &[]).with_native(get_area),
        def(id::GET_POSITION, "GetPosition", Vec3, &[Object], &[]).with_native(get_position),
        def(id::GET_DISTANCE_TO_OBJECT, "GetDistanceToObject", Float, &[Object], &[])
            .with_native(get_distance_to_object),
        def(id::GET_IS_OBJECT_VALID, "GetIsObjectValid", Int, &[Object], &[])
            .with_native(get_is_object_valid),
        def(id::GET_LOCAL_INT, "GetLocalInt", Int, &[Object, Str], &[])
            .with_native(get_local_int),
        def(id::GET_LOCAL_FLOAT, "GetLocalFloat", Float, &[Object, Str], &[])
            .with_native(get_local_float),
        def(id::GET_LOCAL_STRING, "GetLocalString", Str, &[Object, Str], &[])
            .with_native(get_local_string),
        def(id::GET_LOCAL_OBJECT, "GetLocalObject", Object, &[Object, Str], &[])
            .with_native(get_local_object),
        def(id::SET_LOCAL_INT, "SetLocalInt", Void, &[Object, Str, Int], &[])
            .with_native(set_local),
        def(id::SET_LOCAL_FLOAT, "SetLocalFloat", Void, &[Object, Str, Float], &[])
            .with_native(set_local),
        def(id::SET_LOCAL_STRING, "SetLocalString", Void, &[Object, Str, Str], &[])
            .with_native(set_local),
        def(id::SET_LOCAL_OBJECT, "SetLocalObject", Void, &[Object, Str, Object], &[])
            .with_native(set_local),
        def(id::GET_OBJECT_TYPE, "GetObjectType", Int, &[Object], &[])
            .with_native(get_object_type),
        def(id::GET_DISTANCE_BETWEEN, "GetDistanceBetween", Float, &[Object, Object], &[])
            .with_native(get_distance_between),
        def(id::GET_TAG, "GetTag", Str, &[Object], &[]).with_native(get_tag),
        def(
            id::GET_OBJECT_BY_TAG,
            "GetObjectByTag",
            Object,
            &[Str, Int],
            &[Variable::Int(0)],
        )
        .with_native(get_object_by_tag),
        def(
            id::GET_NEAREST_OBJECT,
            "GetNearestObject",
            Object,
            &[Int, Object, Int],
            &[
                Variable::Int(ObjectTypeMask::ALL.bits() as i32),
                self_.clone(),
                Variable::Int(1),
            ],
        )
        .with_native(get_nearest_object),
        def(
            id::GET_NEAREST_OBJECT_BY_TAG,
            "GetNearestObjectByTag",
            Object,
            &[Str, Object, Int],
            &[self_, Variable::Int(1)],
        )
        .with_native(get_nearest_object_by_tag),
        def(id::GET_MODULE, "GetModule", Object, &[], &[]).with_native(get_module),
        def(id::DELETE_LOCAL_INT, "DeleteLocalInt", Void, &[Object, Str], &[])
            .with_native(delete_local),
        def(id::DELETE_LOCAL_FLOAT, "DeleteLocalFloat", Void, &[Object, Str], &[])
            .with_native(delete_local),
        def(id::DELETE_LOCAL_STRING, "DeleteLocalString", Void, &[Object, Str], &[])
            .with_native(delete_local),
        def(id::DELETE_LOCAL_OBJECT, "DeleteLocalObject", Void, &[Object, Str], &[])
            .with_native(delete_local),
    ]);
}

// ============================================================================
// Queries
// ============================================================================

fn get_area(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let area = runtime
        .objects()
        .get(target)
        .map_or(ObjectId::INVALID, |o| o.area().resolve_id(runtime.objects(), ctx.caller()));
    ctx.set_return(area);
    Ok(())
}

fn get_position(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let position = runtime
        .objects()
        .get(target)
        .and_then(|o| o.position())
        .unwrap_or(Vector::ZERO);
    ctx.set_return(position);
    Ok(())
}

fn get_is_object_valid(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    ctx.set_return(!target.is_invalid());
    Ok(())
}

fn get_object_type(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let ty = runtime
        .objects()
        .get(target)
        .map_or(OBJECT_TYPE_INVALID, |o| u32::from(o.object_type()) as i32);
    ctx.set_return(ty);
    Ok(())
}

fn get_tag(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let tag = runtime
        .objects()
        .get(target)
        .map(|o| o.tag().to_owned())
        .unwrap_or_default();
    ctx.set_return(tag);
    Ok(())
}

fn get_module(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    ctx.set_return(runtime.module().object());
    Ok(())
}

// ============================================================================
// Distances
// ============================================================================

/// Euclidean distance between two live, placed objects in the same area.
fn distance(runtime: &Runtime, a: ObjectId, b: ObjectId) -> Option<f32> {
    let a = runtime.objects().get(a)?;
    let b = runtime.objects().get(b)?;
    if a.area().id() != b.area().id() {
        return None;
    }
    Some(a.position()?.distance(&b.position()?))
}

/// Distance from the caller, or -1.0 if it cannot be measured.
fn get_distance_to_object(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    ctx.set_return(distance(runtime, ctx.caller(), target).unwrap_or(-1.0));
    Ok(())
}

/// Distance between two objects, or 0.0 if it cannot be measured.
fn get_distance_between(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let a = object_arg(runtime, ctx, 0)?;
    let b = object_arg(runtime, ctx, 1)?;
    ctx.set_return(distance(runtime, a, b).unwrap_or(0.0));
    Ok(())
}

// ============================================================================
// Searches
// ============================================================================

fn get_object_by_tag(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let tag: String = ctx.arg(0)?;
    let nth: i32 = ctx.arg(1)?;

    let found = usize::try_from(nth)
        .ok()
        .and_then(|nth| runtime.objects().find_object_by_tag(&tag, nth))
        .map_or(ObjectId::INVALID, |o| o.id());
    ctx.set_return(found);
    Ok(())
}

/// `nNth` is 1-based in scripts.
fn nearest(
    runtime: &Runtime,
    target: ObjectId,
    mask: ObjectTypeMask,
    nth: i32,
    tag: Option<&str>,
) -> ObjectId {
    let Some(index) = nth.checked_sub(1).and_then(|n| usize::try_from(n).ok()) else {
        return ObjectId::INVALID;
    };
    runtime
        .objects()
        .get(target)
        .and_then(|target| nearest_object(runtime.objects(), target, mask, index, tag))
        .map_or(ObjectId::INVALID, |o| o.id())
}

fn get_nearest_object(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let mask = ObjectTypeMask::from_script(ctx.arg(0)?);
    let target = object_arg(runtime, ctx, 1)?;
    let nth: i32 = ctx.arg(2)?;
    ctx.set_return(nearest(runtime, target, mask, nth, None));
    Ok(())
}

fn get_nearest_object_by_tag(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let tag: String = ctx.arg(0)?;
    let target = object_arg(runtime, ctx, 1)?;
    let nth: i32 = ctx.arg(2)?;
    ctx.set_return(nearest(runtime, target, ObjectTypeMask::ALL, nth, Some(&tag)));
    Ok(())
}

// ============================================================================
// Local Variables
// ============================================================================

fn get_local_int(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let name: String = ctx.arg(1)?;
    let value = runtime
        .objects()
        .get(target)
        .map_or(0, |o| o.local_int(&name));
    ctx.set_return(value);
    Ok(())
}

fn get_local_float(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let name: String = ctx.arg(1)?;
    let value = runtime
        .objects()
        .get(target)
        .map_or(0.0, |o| o.local_float(&name));
    ctx.set_return(value);
    Ok(())
}

fn get_local_string(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let name: String = ctx.arg(1)?;
    let value = runtime
        .objects()
        .get(target)
        .map(|o| o.local_string(&name).to_owned())
        .unwrap_or_default();
    ctx.set_return(value);
    Ok(())
}

fn get_local_object(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let name: String = ctx.arg(1)?;
    let value = runtime
        .objects()
        .get(target)
        .map_or(ObjectId::INVALID, |o| o.local_object(&name));
    ctx.set_return(value);
    Ok(())
}

/// Shared by the four `SetLocal*` functions; the signature fixes the type.
fn set_local(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let name: String = ctx.arg(1)?;
    let value = ctx.param(2)?.clone();

    if let Some(object) = runtime.objects_mut().get_mut(target) {
        object.set_local(name, value);
    }
    Ok(())
}

/// Shared by the four `DeleteLocal*` functions.
///
/// Only a variable of the function's own type is deleted.
fn delete_local(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    let name: String = ctx.arg(1)?;
    let expected = match ctx.name() {
        "DeleteLocalInt" => Int,
        "DeleteLocalFloat" => Float,
        "DeleteLocalString" => Str,
        _ => Object,
    };

    if let Some(object) = runtime.objects_mut().get_mut(target) {
        let matches = object
            .get_local(&name)
            .is_some_and(|v| v.variable_type() == expected);
        if matches {
            object.delete_local(&name);
        }
    }
    Ok(())
}
