//! Engine function dispatch through the runtime.

use nwscript::functions::id;
use nwscript::{
    CallSite, Defaults, DispatchError, FunctionDef, FunctionManager, ObjectId, RuntimeConfig,
    Signature, Variable, VariableType,
};

use crate::common::Harness;

fn harness() -> Harness {
    Harness::builder().build()
}

#[test]
fn random_stays_in_half_open_range() {
    for seed in 0..32 {
        let mut h = Harness::builder()
            .config(RuntimeConfig::default().with_seed(seed))
            .build();
        for _ in 0..16 {
            let value = h
                .runtime
                .call_function(id::RANDOM, vec![Variable::Int(5)], CallSite::default())
                .unwrap();
            let value = value.as_int().unwrap();
            assert!((0..=4).contains(&value), "Random(5) returned {value}");
        }
    }
}

#[test]
fn random_by_name() {
    let mut h = harness();
    let value = h
        .runtime
        .call_function_by_name("Random", vec![Variable::Int(1)], CallSite::default())
        .unwrap();
    assert_eq!(value, Variable::Int(0));
}

#[test]
fn too_few_arguments_fail_fast() {
    let mut h = harness();
    let result = h.runtime.call_function(id::RANDOM, vec![], CallSite::default());
    assert!(matches!(
        result,
        Err(DispatchError::TooFewArguments { min: 1, supplied: 0, .. })
    ));
}

#[test]
fn too_many_arguments_fail_fast() {
    let mut h = harness();
    let result = h.runtime.call_function(
        id::GET_MODULE,
        vec![Variable::Int(1)],
        CallSite::default(),
    );
    assert!(matches!(result, Err(DispatchError::TooManyArguments { .. })));
}

#[test]
fn argument_tags_are_checked() {
    let mut h = harness();
    let result = h.runtime.call_function(
        id::RANDOM,
        vec![Variable::Float(5.0)],
        CallSite::default(),
    );
    assert!(matches!(
        result,
        Err(DispatchError::ArgumentTypeMismatch {
            index: 0,
            expected: VariableType::Int,
            actual: VariableType::Float,
            ..
        })
    ));
}

#[test]
fn omitted_trailing_arguments_use_defaults() {
    let mut h = harness();
    let short = h
        .runtime
        .call_function(id::FLOAT_TO_STRING, vec![Variable::Float(0.5)], CallSite::default())
        .unwrap();
    let full = h
        .runtime
        .call_function(
            id::FLOAT_TO_STRING,
            vec![Variable::Float(0.5), Variable::Int(18), Variable::Int(9)],
            CallSite::default(),
        )
        .unwrap();
    assert_eq!(short, full);

    let partial = h
        .runtime
        .call_function(
            id::FLOAT_TO_STRING,
            vec![Variable::Float(0.5), Variable::Int(0)],
            CallSite::default(),
        )
        .unwrap();
    assert_eq!(partial, Variable::String("0.500000000".into()));
}

#[test]
fn unimplemented_functions_are_idempotent_no_ops() {
    let mut h = harness();
    let objects_before = h.runtime.objects().len();

    let first = h
        .runtime
        .call_function(
            id::SPEAK_STRING,
            vec![Variable::String("hello".into())],
            CallSite::default(),
        )
        .unwrap();
    let second = h
        .runtime
        .call_function(
            id::SPEAK_STRING,
            vec![Variable::String("hello".into())],
            CallSite::default(),
        )
        .unwrap();

    assert_eq!(first, Variable::Void);
    assert_eq!(first, second);
    assert_eq!(h.runtime.objects().len(), objects_before);
    assert_eq!(h.runtime.module().pending_actions(), 0);
}

#[test]
fn unknown_function_id_is_an_error() {
    let mut h = harness();
    let result = h
        .runtime
        .call_function(nwscript::FunctionId(9000), vec![], CallSite::default());
    assert!(matches!(result, Err(DispatchError::UnknownFunction { .. })));
}

#[test]
fn conversions_round_trip_through_the_table() {
    let mut h = harness();
    let site = CallSite::default;

    let s = h
        .runtime
        .call_function(id::INT_TO_STRING, vec![Variable::Int(-12)], site())
        .unwrap();
    assert_eq!(s, Variable::String("-12".into()));

    let n = h.runtime.call_function(id::STRING_TO_INT, vec![s], site()).unwrap();
    assert_eq!(n, Variable::Int(-12));

    let f = h.runtime.call_function(id::INT_TO_FLOAT, vec![n], site()).unwrap();
    assert_eq!(f, Variable::Float(-12.0));

    let back = h
        .runtime
        .call_function(id::FLOAT_TO_INT, vec![Variable::Float(3.9)], site())
        .unwrap();
    assert_eq!(back, Variable::Int(3));

    let len = h
        .runtime
        .call_function(id::GET_STRING_LENGTH, vec![Variable::String("héllo".into())], site())
        .unwrap();
    assert_eq!(len, Variable::Int(5));
}

#[test]
fn print_functions_return_void() {
    let mut h = harness();
    for (fid, arg) in [
        (id::PRINT_STRING, Variable::String("text".into())),
        (id::PRINT_FLOAT, Variable::Float(1.0)),
        (id::PRINT_INTEGER, Variable::Int(3)),
        (id::PRINT_OBJECT, Variable::Object(ObjectId::SELF)),
    ] {
        let result = h.runtime.call_function(fid, vec![arg], CallSite::default()).unwrap();
        assert_eq!(result, Variable::Void);
    }
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut manager: FunctionManager<()> = FunctionManager::new();
    let random = || {
        FunctionDef::new(
            0,
            "Random",
            Signature::new(VariableType::Int, &[VariableType::Int]),
            Defaults::none(),
        )
    };
    manager.register_function(random()).unwrap();
    assert!(manager.register_function(random()).is_err());
    assert_eq!(manager.len(), 1);
}
