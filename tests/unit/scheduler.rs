//! Deferred commands and the per-tick pump.

use std::cell::RefCell;
use std::rc::Rc;

use nwscript::functions::id;
use nwscript::{Event, EventKind, Object, ObjectId, ObjectType, RuntimeConfig, Variable};

use crate::common::{Harness, action, call, owner_tag, replayed_tag};

/// A harness whose "main" script delays one action per `(tag, seconds)` and
/// logs each replay.
fn delaying(delays: &'static [(&'static str, f32)], config: RuntimeConfig) -> Harness {
    let builder = Harness::builder().config(config);
    let log = builder.log();
    builder
        .script("main", move |rt, inv| {
            if let Some(tag) = replayed_tag(&inv) {
                log.push(tag);
                return Ok(());
            }
            for (tag, seconds) in delays {
                call(rt, &inv, id::DELAY_COMMAND, vec![Variable::Float(*seconds), action(tag)])?;
            }
            Ok(())
        })
        .build()
}

#[test]
fn actions_fire_once_when_due() {
    let mut h = delaying(&[("A", 0.0), ("B", 0.01)], RuntimeConfig::default());
    h.runtime.run_script("main", ObjectId::INVALID, ObjectId::INVALID).unwrap();

    assert_eq!(h.pump_after(5), 1);
    assert_eq!(h.log.entries(), ["A"]);

    assert_eq!(h.pump_after(10), 1);
    assert_eq!(h.log.entries(), ["A", "B"]);

    assert_eq!(h.pump_after(100), 0);
    assert_eq!(h.log.entries(), ["A", "B"]);
}

#[test]
fn delay_zero_is_never_synchronous() {
    let mut h = delaying(&[("now", 0.0)], RuntimeConfig::default());
    h.runtime.run_script("main", ObjectId::INVALID, ObjectId::INVALID).unwrap();

    assert!(h.log.entries().is_empty());
    assert_eq!(h.runtime.module().pending_actions(), 1);
    h.runtime.pump();
    assert_eq!(h.log.entries(), ["now"]);
}

#[test]
fn equal_timestamps_fire_in_insertion_order() {
    let mut h = delaying(
        &[("first", 0.5), ("second", 0.5), ("third", 0.5), ("early", 0.25)],
        RuntimeConfig::default(),
    );
    h.runtime.run_script("main", ObjectId::INVALID, ObjectId::INVALID).unwrap();

    h.pump_after(500);
    assert_eq!(h.log.entries(), ["early", "first", "second", "third"]);
}

#[test]
fn pump_cap_preserves_order() {
    let config = RuntimeConfig {
        max_actions_per_pump: Some(2),
        ..RuntimeConfig::default()
    };
    let mut h = delaying(&[("a", 0.0), ("b", 0.0), ("c", 0.0)], config);
    h.runtime.run_script("main", ObjectId::INVALID, ObjectId::INVALID).unwrap();

    assert_eq!(h.runtime.pump(), 2);
    assert_eq!(h.log.entries(), ["a", "b"]);
    assert_eq!(h.runtime.pump(), 1);
    assert_eq!(h.log.entries(), ["a", "b", "c"]);
}

#[test]
fn assign_command_runs_on_the_assigned_object() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("main", move |rt, inv| {
            if replayed_tag(&inv).is_some() {
                log.push(format!("ran on {}", owner_tag(rt, &inv)));
                return Ok(());
            }
            let guard = rt.objects().find_object_by_tag("guard", 0).map(|o| o.id());
            let guard = guard.unwrap_or(ObjectId::INVALID);
            call(rt, &inv, id::ASSIGN_COMMAND, vec![Variable::Object(guard), action("x")])?;
            Ok(())
        })
        .build();

    let player = h.runtime.add_object(Object::new(ObjectType::Creature, "player"));
    h.runtime.add_object(Object::new(ObjectType::Creature, "guard"));

    h.runtime.run_script("main", player, ObjectId::INVALID).unwrap();
    h.runtime.pump();
    assert_eq!(h.log.entries(), ["ran on guard"]);
}

#[test]
fn action_do_command_targets_the_caller() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("main", move |rt, inv| {
            if replayed_tag(&inv).is_some() {
                log.push(owner_tag(rt, &inv));
                return Ok(());
            }
            call(rt, &inv, id::ACTION_DO_COMMAND, vec![action("x")])?;
            Ok(())
        })
        .build();

    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    h.runtime.run_script("main", npc, ObjectId::INVALID).unwrap();
    h.runtime.pump();
    assert_eq!(h.log.entries(), ["npc"]);
}

#[test]
fn destroyed_owner_skips_action() {
    let mut h = delaying(&[("doomed", 1.0)], RuntimeConfig::default());
    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    h.runtime.run_script("main", npc, ObjectId::INVALID).unwrap();

    h.runtime.remove_object(npc);
    assert_eq!(h.pump_after(1000), 1);
    assert!(h.log.entries().is_empty());
    assert_eq!(h.runtime.module().pending_actions(), 0);
}

#[test]
fn destroyed_triggerer_still_fires() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("main", move |rt, inv| {
            if replayed_tag(&inv).is_some() {
                log.push(format!("triggerer {}", inv.triggerer));
                return Ok(());
            }
            call(rt, &inv, id::DELAY_COMMAND, vec![Variable::Float(0.0), action("x")])?;
            Ok(())
        })
        .build();

    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    let lever = h.runtime.add_object(Object::new(ObjectType::Placeable, "lever"));
    h.runtime.run_script("main", npc, lever).unwrap();
    h.runtime.remove_object(lever);

    h.runtime.pump();
    assert_eq!(h.log.entries(), ["triggerer OBJECT_INVALID"]);
}

#[test]
fn repeating_requires_requeueing() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("heartbeat", move |rt, inv| {
            let beats = rt.objects().get(inv.owner).map_or(0, |o| o.local_int("beats"));
            if let Some(o) = rt.objects_mut().get_mut(inv.owner) {
                o.set_local("beats", Variable::Int(beats + 1));
            }
            log.push(format!("beat {}", beats + 1));
            if beats + 1 < 3 {
                call(rt, &inv, id::DELAY_COMMAND, vec![Variable::Float(6.0), action("beat")])?;
            }
            Ok(())
        })
        .build();

    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    h.runtime.run_script("heartbeat", npc, ObjectId::INVALID).unwrap();

    for _ in 0..5 {
        h.pump_after(6000);
    }
    assert_eq!(h.log.entries(), ["beat 1", "beat 2", "beat 3"]);
    assert_eq!(h.runtime.module().pending_actions(), 0);
}

#[test]
fn actions_queued_during_pump_wait_for_next_pump() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("chain", move |rt, inv| {
            match replayed_tag(&inv).as_deref() {
                None => {
                    call(rt, &inv, id::DELAY_COMMAND, vec![Variable::Float(0.0), action("one")])?;
                }
                Some("one") => {
                    log.push("one");
                    call(rt, &inv, id::DELAY_COMMAND, vec![Variable::Float(0.0), action("two")])?;
                }
                Some(tag) => log.push(tag),
            }
            Ok(())
        })
        .build();

    h.runtime.run_script("chain", ObjectId::INVALID, ObjectId::INVALID).unwrap();
    assert_eq!(h.runtime.pump(), 1);
    assert_eq!(h.log.entries(), ["one"]);
    assert_eq!(h.runtime.pump(), 1);
    assert_eq!(h.log.entries(), ["one", "two"]);
}

#[test]
fn clear_all_actions_cancels_pending_commands() {
    let builder = Harness::builder();
    let log = builder.log();
    let mut h = builder
        .script("main", move |rt, inv| {
            if let Some(tag) = replayed_tag(&inv) {
                log.push(tag);
                return Ok(());
            }
            call(rt, &inv, id::ACTION_DO_COMMAND, vec![action("cancelled")])?;
            call(rt, &inv, id::CLEAR_ALL_ACTIONS, vec![])?;
            call(rt, &inv, id::ACTION_DO_COMMAND, vec![action("kept")])?;
            Ok(())
        })
        .build();

    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    h.runtime.run_script("main", npc, ObjectId::INVALID).unwrap();
    h.runtime.pump();
    assert_eq!(h.log.entries(), ["kept"]);
}

#[test]
fn clear_all_actions_keeps_a_pending_destroy() {
    let mut h = Harness::builder()
        .script("main", |rt, inv| {
            let args = vec![Variable::Object(ObjectId::SELF), Variable::Float(1.0)];
            call(rt, &inv, id::DESTROY_OBJECT, args)?;
            call(rt, &inv, id::CLEAR_ALL_ACTIONS, vec![])?;
            Ok(())
        })
        .build();

    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    h.runtime.run_script("main", npc, ObjectId::INVALID).unwrap();
    assert!(h.runtime.objects().contains(npc));
    assert_eq!(h.runtime.module().pending_actions(), 1);

    h.pump_after(2000);
    assert!(!h.runtime.objects().contains(npc));
}

#[test]
fn events_drain_fifo_before_actions() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();

    let mut h = delaying(&[("action", 0.0)], RuntimeConfig::default());
    h.runtime = h
        .runtime
        .with_event_sink(move |event: &Event| sink.borrow_mut().push(event.kind.clone()));

    h.runtime.run_script("main", ObjectId::INVALID, ObjectId::INVALID).unwrap();
    h.runtime.add_event(Event::new(0, EventKind::KeyDown(30)));
    h.runtime.add_event(Event::new(0, EventKind::MouseMove { x: 4, y: 2 }));
    h.runtime.add_event(Event::new(0, EventKind::KeyUp(30)));

    h.runtime.pump();
    assert_eq!(
        *seen.borrow(),
        [
            EventKind::KeyDown(30),
            EventKind::MouseMove { x: 4, y: 2 },
            EventKind::KeyUp(30),
        ]
    );
    assert_eq!(h.log.entries(), ["action"]);
    assert_eq!(h.runtime.module().pending_events(), 0);
}

#[test]
fn quit_stops_the_module() {
    let mut h = delaying(&[("never", 0.0)], RuntimeConfig::default());
    h.runtime.run_script("main", ObjectId::INVALID, ObjectId::INVALID).unwrap();
    h.runtime.push_event(EventKind::Quit);

    assert_eq!(h.runtime.pump(), 0);
    assert!(!h.runtime.module().is_running());
    assert!(h.log.entries().is_empty());
}
