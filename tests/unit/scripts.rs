//! Nested script execution.

use nwscript::functions::id;
use nwscript::{
    CallSite, DispatchError, NativeError, Object, ObjectId, ObjectType, RuntimeConfig,
    ScriptError, Variable,
};

use crate::common::{Harness, call, owner_tag};

fn execute(name: &str, target: ObjectId) -> Vec<Variable> {
    vec![Variable::String(name.into()), Variable::Object(target)]
}

#[test]
fn child_inherits_parent_environment() {
    let builder = Harness::builder();
    let log = builder.log();
    let child_log = builder.log();
    let mut h = builder
        .script("parent", move |rt, inv| {
            // The interpreter's live environment for this run.
            let mut running = inv.script.clone();
            running.environment_mut().set("nGold", Variable::Int(250));
            let site = CallSite::new(inv.owner, inv.triggerer).with_script(&running);

            log.push("parent before");
            rt.call_function(id::EXECUTE_SCRIPT, execute("child", ObjectId::SELF), site)?;
            log.push("parent after");
            Ok(())
        })
        .script("child", move |rt, inv| {
            let gold = inv.script.environment().get("nGold").cloned();
            child_log.push(format!(
                "child on {} sees {:?} at depth {}",
                owner_tag(rt, &inv),
                gold,
                rt.depth()
            ));
            Ok(())
        })
        .build();

    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    h.runtime.run_script("parent", npc, ObjectId::INVALID).unwrap();

    assert_eq!(
        h.log.entries(),
        [
            "parent before",
            "child on npc sees Some(Int(250)) at depth 2",
            "parent after",
        ]
    );
}

#[test]
fn failing_child_does_not_abort_parent() {
    let builder = Harness::builder().broken_script("broken");
    let log = builder.log();
    let mut h = builder
        .script("parent", move |rt, inv| {
            call(rt, &inv, id::EXECUTE_SCRIPT, execute("broken", ObjectId::SELF))?;
            call(rt, &inv, id::EXECUTE_SCRIPT, execute("no_such_script", ObjectId::SELF))?;
            log.push("parent finished");
            Ok(())
        })
        .build();

    h.runtime.run_script("parent", ObjectId::INVALID, ObjectId::INVALID).unwrap();
    assert_eq!(h.log.entries(), ["parent finished"]);
    assert_eq!(h.runtime.depth(), 0);
}

#[test]
fn child_error_is_swallowed() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("parent", move |rt, inv| {
            call(rt, &inv, id::EXECUTE_SCRIPT, execute("child", ObjectId::SELF))?;
            log.push("parent finished");
            Ok(())
        })
        .script("child", |_, inv| {
            Err(ScriptError::execution(inv.script.name(), "division by zero"))
        })
        .build();

    h.runtime.run_script("parent", ObjectId::INVALID, ObjectId::INVALID).unwrap();
    assert_eq!(h.log.entries(), ["parent finished"]);
}

#[test]
fn runaway_recursion_is_cut_off() {
    let config = RuntimeConfig {
        max_script_depth: 4,
        ..RuntimeConfig::default()
    };
    let builder = Harness::builder().config(config);
    let log = builder.log();
    let mut h = builder
        .script("recurse", move |rt, inv| {
            log.push(format!("depth {}", rt.depth()));
            call(rt, &inv, id::EXECUTE_SCRIPT, execute("recurse", ObjectId::SELF))?;
            Ok(())
        })
        .build();

    h.runtime.run_script("recurse", ObjectId::INVALID, ObjectId::INVALID).unwrap();
    assert_eq!(h.log.entries(), ["depth 1", "depth 2", "depth 3", "depth 4"]);
    assert_eq!(h.runtime.depth(), 0);
}

#[test]
fn execute_script_runs_on_target() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("parent", move |rt, inv| {
            let door = rt
                .objects()
                .find_object_by_tag("door1", 0)
                .map_or(ObjectId::INVALID, |o| o.id());
            call(rt, &inv, id::EXECUTE_SCRIPT, execute("open", door))?;
            Ok(())
        })
        .script("open", move |rt, inv| {
            log.push(format!("opened {}", owner_tag(rt, &inv)));
            Ok(())
        })
        .build();

    h.runtime.add_object(Object::new(ObjectType::Door, "door1"));
    h.runtime.run_script("parent", ObjectId::INVALID, ObjectId::INVALID).unwrap();
    assert_eq!(h.log.entries(), ["opened door1"]);
}

#[test]
fn top_level_errors_reach_the_caller() {
    let mut h = Harness::builder()
        .broken_script("broken")
        .script("bad_call", |rt, inv| {
            call(rt, &inv, id::RANDOM, vec![])?;
            Ok(())
        })
        .build();

    assert!(matches!(
        h.runtime.run_script("missing", ObjectId::INVALID, ObjectId::INVALID),
        Err(ScriptError::ScriptNotFound { .. })
    ));
    assert!(matches!(
        h.runtime.run_script("broken", ObjectId::INVALID, ObjectId::INVALID),
        Err(ScriptError::ScriptNotFound { .. })
    ));
    assert!(matches!(
        h.runtime.run_script("bad_call", ObjectId::INVALID, ObjectId::INVALID),
        Err(ScriptError::Dispatch(DispatchError::TooFewArguments { .. }))
    ));
}

#[test]
fn deferred_command_outside_a_script_is_rejected() {
    let mut h = Harness::builder().build();
    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));

    let result = h.runtime.call_function(
        id::ASSIGN_COMMAND,
        vec![Variable::Object(npc), crate::common::action("x")],
        CallSite::new(npc, ObjectId::INVALID),
    );
    match result {
        Err(DispatchError::Native {
            source: NativeError::MissingScriptName { function },
            ..
        }) => assert_eq!(function, "AssignCommand"),
        other => panic!("expected MissingScriptName, got {other:?}"),
    }
}
