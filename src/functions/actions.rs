//! Deferred commands, nested scripts and object destruction.
//!
//! `AssignCommand`, `DelayCommand` and `ActionDoCommand` never run anything
//! inline. They schedule a fresh invocation of the running script that
//! replays the captured `action` state later, so they need the running
//! script's name and fail without one.

use tracing::warn;

use nwscript_core::{NativeError, ObjectId, ScriptEnvironment, ScriptState, Variable, VariableType};
use nwscript_registry::FunctionContext;

use super::{Table, def, id, object_arg, seconds_to_ms};
use crate::Runtime;

use VariableType::{Float, Int, Object, ScriptState as Action, String as Str, Void};

pub(super) fn declare(table: &mut Table) {
    table.extend([
        def(id::ASSIGN_COMMAND, "AssignCommand", Void, &[Object, Action], &[])
            .with_native(assign_command),
        def(id::DELAY_COMMAND, "DelayCommand", Void, &[Float, Action], &[])
            .with_native(delay_command),
        def(id::EXECUTE_SCRIPT, "ExecuteScript", Void, &[Str, Object], &[])
            .with_native(execute_script),
        def(
            id::CLEAR_ALL_ACTIONS,
            "ClearAllActions",
            Void,
            &[Int],
            &[Variable::Int(0)],
        )
        .with_native(clear_all_actions),
        def(
            id::DESTROY_OBJECT,
            "DestroyObject",
            Void,
            &[Object, Float],
            &[Variable::Float(0.0)],
        )
        .with_native(destroy_object),
        def(id::ACTION_DO_COMMAND, "ActionDoCommand", Void, &[Action], &[])
            .with_native(action_do_command),
    ]);
}

/// Run the captured action on another object, on the next pump.
fn assign_command(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let script = ctx.require_script_name()?;

    let owner = object_arg(runtime, ctx, 0)?;
    if owner.is_invalid() {
        return Ok(());
    }

    let state: ScriptState = ctx.arg(1)?;
    runtime.delay_script(script, state, owner, ctx.triggerer(), 0);
    Ok(())
}

fn delay_command(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let script = ctx.require_script_name()?;

    let delay: f32 = ctx.arg(0)?;
    let state: ScriptState = ctx.arg(1)?;
    runtime.delay_script(
        script,
        state,
        ctx.caller(),
        ctx.triggerer(),
        seconds_to_ms(delay),
    );
    Ok(())
}

fn action_do_command(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    let script = ctx.require_script_name()?;

    let state: ScriptState = ctx.arg(0)?;
    runtime.delay_script(script, state, ctx.caller(), ctx.triggerer(), 0);
    Ok(())
}

/// Run another script right away, on `oTarget`.
///
/// The child inherits the running script's environment. A failing child is
/// logged and otherwise ignored; the calling script carries on.
fn execute_script(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let script: String = ctx.arg(0)?;
    let target = object_arg(runtime, ctx, 1)?;
    let environment = ctx
        .current_script()
        .map(|s| s.environment().clone())
        .unwrap_or_else(ScriptEnvironment::new);

    if let Err(err) = runtime.execute_script(&script, target, ctx.triggerer(), environment) {
        warn!(
            target: "nwscript",
            "Failed ExecuteScript(\"{}\", {}): {}",
            script,
            target,
            err
        );
    }
    Ok(())
}

fn clear_all_actions(
    runtime: &mut Runtime,
    ctx: &mut FunctionContext<'_>,
) -> Result<(), NativeError> {
    runtime.module_mut().clear_actions_for(ctx.caller());
    Ok(())
}

/// Destroy now, or after `fDelay` seconds.
///
/// The module object cannot be destroyed.
fn destroy_object(runtime: &mut Runtime, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
    let target = object_arg(runtime, ctx, 0)?;
    if target.is_invalid() || target == runtime.module().object() {
        return Ok(());
    }

    match seconds_to_ms(ctx.arg(1)?) {
        0 => {
            runtime.remove_object(target);
        }
        delay => {
            runtime.destroy_object_delayed(target, delay);
        }
    }
    Ok(())
}
