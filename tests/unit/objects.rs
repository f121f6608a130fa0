//! Object lookups and searches through the runtime.

use nwscript::functions::id;
use nwscript::{
    CallSite, Object, ObjectId, ObjectReference, ObjectType, ObjectTypeMask, Relation,
    ScriptState, Variable, Vector,
};

use crate::common::Harness;

fn placed(ty: ObjectType, tag: &str, area: ObjectId, x: f32, y: f32) -> Object {
    Object::new(ty, tag)
        .with_relation(Relation::Area, area)
        .with_position(Vector::new(x, y, 0.0))
}

#[test]
fn tag_search_yields_matches_in_id_order() {
    let mut h = Harness::builder().build();
    let first = h.runtime.add_object(Object::new(ObjectType::Door, "door1"));
    h.runtime.add_object(Object::new(ObjectType::Door, "door2"));
    let second = h.runtime.add_object(Object::new(ObjectType::Door, "door1"));

    let objects = h.runtime.objects();
    let mut search = objects.find_objects_by_tag("door1");
    assert_eq!(search.next_id(objects), first);
    assert_eq!(search.next_id(objects), second);
    assert_eq!(search.next_id(objects), ObjectId::INVALID);
    assert_eq!(search.next_id(objects), ObjectId::INVALID);
}

#[test]
fn search_survives_removal_of_pending_match() {
    let mut h = Harness::builder().build();
    let ids: Vec<_> = (0..4)
        .map(|_| h.runtime.add_object(Object::new(ObjectType::Placeable, "crate")))
        .collect();

    let mut search = h.runtime.objects().find_objects_by_tag("crate");
    assert_eq!(search.next_id(h.runtime.objects()), ids[0]);

    h.runtime.remove_object(ids[1]);
    h.runtime.add_object(Object::new(ObjectType::Placeable, "crate"));

    let rest: Vec<_> = search.iter(h.runtime.objects()).map(|o| o.id()).collect();
    assert_eq!(rest, [ids[2], ids[3]]);
}

#[test]
fn references_go_dead_after_removal() {
    let mut h = Harness::builder().build();
    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    let reference = ObjectReference::new(npc);

    assert!(reference.is_valid(h.runtime.objects(), ObjectId::INVALID));
    h.runtime.remove_object(npc);
    assert!(reference.resolve(h.runtime.objects(), ObjectId::INVALID).is_none());

    let valid = h
        .runtime
        .call_function(id::GET_IS_OBJECT_VALID, vec![Variable::Object(npc)], CallSite::default())
        .unwrap();
    assert_eq!(valid, Variable::Int(0));

    // Ids are never reused.
    let next = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    assert_ne!(next, npc);
}

#[test]
fn get_object_by_tag_counts_from_zero() {
    let mut h = Harness::builder().build();
    let first = h.runtime.add_object(Object::new(ObjectType::Waypoint, "wp"));
    let second = h.runtime.add_object(Object::new(ObjectType::Waypoint, "wp"));

    let lookup = |h: &mut Harness, nth: i32| {
        h.runtime
            .call_function(
                id::GET_OBJECT_BY_TAG,
                vec![Variable::String("wp".into()), Variable::Int(nth)],
                CallSite::default(),
            )
            .unwrap()
    };
    assert_eq!(lookup(&mut h, 0), Variable::Object(first));
    assert_eq!(lookup(&mut h, 1), Variable::Object(second));
    assert_eq!(lookup(&mut h, 2), Variable::Object(ObjectId::INVALID));
}

#[test]
fn nearest_object_stays_in_the_callers_area() {
    let mut h = Harness::builder().build();
    let town = h.runtime.add_object(Object::new(ObjectType::Area, "town"));
    let cave = h.runtime.add_object(Object::new(ObjectType::Area, "cave"));

    let player = h.runtime.add_object(placed(ObjectType::Creature, "player", town, 0.0, 0.0));
    let far = h.runtime.add_object(placed(ObjectType::Door, "gate", town, 10.0, 5.0));
    let near = h.runtime.add_object(placed(ObjectType::Creature, "guard", town, 1.0, 2.0));
    h.runtime.add_object(placed(ObjectType::Creature, "bat", cave, 0.5, 0.0));
    h.runtime.add_object(Object::new(ObjectType::Creature, "ghost"));

    let nearest = |h: &mut Harness, mask: i32, nth: i32| {
        h.runtime
            .call_function(
                id::GET_NEAREST_OBJECT,
                vec![Variable::Int(mask), Variable::Object(ObjectId::SELF), Variable::Int(nth)],
                CallSite::new(player, ObjectId::INVALID),
            )
            .unwrap()
    };

    let any = ObjectTypeMask::ALL.bits() as i32;
    assert_eq!(nearest(&mut h, any, 1), Variable::Object(near));
    assert_eq!(nearest(&mut h, any, 2), Variable::Object(far));
    assert_eq!(nearest(&mut h, any, 3), Variable::Object(ObjectId::INVALID));

    let doors = u32::from(ObjectType::Door) as i32;
    assert_eq!(nearest(&mut h, doors, 1), Variable::Object(far));
}

#[test]
fn nearest_object_by_tag_and_distance() {
    let mut h = Harness::builder().build();
    let town = h.runtime.add_object(Object::new(ObjectType::Area, "town"));
    let player = h.runtime.add_object(placed(ObjectType::Creature, "player", town, 0.0, 0.0));
    let far = h.runtime.add_object(placed(ObjectType::Placeable, "chest", town, 6.0, 8.0));
    let near = h.runtime.add_object(placed(ObjectType::Placeable, "chest", town, 3.0, 4.0));
    let site = || CallSite::new(player, ObjectId::INVALID);

    let found = h
        .runtime
        .call_function(
            id::GET_NEAREST_OBJECT_BY_TAG,
            vec![Variable::String("chest".into())],
            site(),
        )
        .unwrap();
    assert_eq!(found, Variable::Object(near));

    let second = h
        .runtime
        .call_function(
            id::GET_NEAREST_OBJECT_BY_TAG,
            vec![
                Variable::String("chest".into()),
                Variable::Object(ObjectId::SELF),
                Variable::Int(2),
            ],
            site(),
        )
        .unwrap();
    assert_eq!(second, Variable::Object(far));

    let distance = h
        .runtime
        .call_function(id::GET_DISTANCE_TO_OBJECT, vec![Variable::Object(far)], site())
        .unwrap();
    assert_eq!(distance, Variable::Float(10.0));
}

#[test]
fn locals_are_typed_per_slot() {
    let mut h = Harness::builder().build();
    let npc = h.runtime.add_object(Object::new(ObjectType::Creature, "npc"));
    let site = CallSite::default;
    let name = || Variable::String("quest".into());

    h.runtime
        .call_function(
            id::SET_LOCAL_INT,
            vec![Variable::Object(npc), name(), Variable::Int(3)],
            site(),
        )
        .unwrap();
    let as_string = h
        .runtime
        .call_function(id::GET_LOCAL_STRING, vec![Variable::Object(npc), name()], site())
        .unwrap();
    assert_eq!(as_string, Variable::String(String::new()));

    // Deleting through the wrong type leaves the int alone.
    h.runtime
        .call_function(id::DELETE_LOCAL_STRING, vec![Variable::Object(npc), name()], site())
        .unwrap();
    let as_int = h
        .runtime
        .call_function(id::GET_LOCAL_INT, vec![Variable::Object(npc), name()], site())
        .unwrap();
    assert_eq!(as_int, Variable::Int(3));

    h.runtime
        .call_function(id::DELETE_LOCAL_INT, vec![Variable::Object(npc), name()], site())
        .unwrap();
    let cleared = h
        .runtime
        .call_function(id::GET_LOCAL_INT, vec![Variable::Object(npc), name()], site())
        .unwrap();
    assert_eq!(cleared, Variable::Int(0));
}

#[test]
fn module_object_is_always_present() {
    let mut h = Harness::builder().build();
    let module = h
        .runtime
        .call_function(id::GET_MODULE, vec![], CallSite::default())
        .unwrap();
    assert_eq!(module, Variable::Object(h.runtime.module().object()));

    let ty = h
        .runtime
        .call_function(id::GET_OBJECT_TYPE, vec![module.clone()], CallSite::default())
        .unwrap();
    assert_eq!(ty, Variable::Int(u32::from(ObjectType::Module) as i32));

    h.runtime
        .call_function(id::DESTROY_OBJECT, vec![module], CallSite::default())
        .unwrap();
    assert!(h.runtime.objects().contains(h.runtime.module().object()));
}

#[test]
fn captured_state_serializes_object_ids() {
    let state = ScriptState::new(
        42,
        vec![Variable::Object(ObjectId(7))],
        vec![Variable::Int(1), Variable::Object(ObjectId::INVALID)],
    );

    let json = serde_json::to_string(&state).unwrap();
    let back: ScriptState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
    assert_eq!(back.globals[0], Variable::Object(ObjectId(7)));
}
