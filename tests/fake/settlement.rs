// Tests for settlement capture

use super::{error_message, init_tracing};
use promise_fake::{
    create_settlement_type, create_settlement_type_with, Combinator, Direction, FakeError,
    FakeOptions, Function, Stub, Value,
};
use serde_json::json;

#[test]
fn test_tracks_calls_to_resolve() {
    init_tracing();
    let promise_type = create_settlement_type();

    promise_type
        .new_promise(|resolve, _| resolve.call([Value::from("data")]))
        .unwrap();

    assert_eq!(promise_type.resolution().to_json(), json!(["data"]));
}

#[test]
fn test_throws_if_resolve_called_twice() {
    let promise_type = create_settlement_type();

    let result = promise_type.new_promise(|resolve, _| {
        resolve.call([Value::from("data")])?;
        resolve.call([Value::from("data")])
    });

    assert!(matches!(
        result,
        Err(FakeError::SettledTwice {
            direction: Direction::Resolve
        })
    ));
}

#[test]
fn test_tracks_calls_to_reject() {
    let promise_type = create_settlement_type();

    promise_type
        .new_promise(|_, reject| reject.call([Value::error("Reject error message")]))
        .unwrap();

    let args = promise_type.rejection().args().unwrap();
    assert_eq!(args.len(), 1);
    assert_eq!(error_message(&args).as_deref(), Some("Reject error message"));
}

#[test]
fn test_throws_if_reject_called_twice() {
    let promise_type = create_settlement_type();

    let result = promise_type.new_promise(|_, reject| {
        reject.call([Value::error("Reject called twice")])?;
        reject.call([Value::error("Reject called twice")])
    });

    assert!(matches!(
        result,
        Err(FakeError::SettledTwice {
            direction: Direction::Reject
        })
    ));
    assert_eq!(promise_type.rejection().call_count(), 1);
}

#[test]
fn test_second_instance_cannot_settle_same_direction() {
    let promise_type = create_settlement_type();
    promise_type
        .new_promise(|_, reject| reject.call([Value::from("first")]))
        .unwrap();

    let err = promise_type
        .new_promise(|_, reject| reject.call([Value::from("second")]))
        .unwrap_err();

    assert!(err.is_usage_error());
    assert_eq!(promise_type.rejection().first(), Some(Value::from("first")));
}

#[test]
fn test_records_every_argument() {
    let promise_type = create_settlement_type();
    promise_type
        .new_promise(|resolve, _| {
            resolve.call([Value::from(1), Value::Undefined, Value::from(json!({"ok": true}))])
        })
        .unwrap();

    assert_eq!(promise_type.resolution().to_json(), json!([1, null, {"ok": true}]));
    assert_eq!(promise_type.resolution().args().map(|a| a.len()), Some(3));
}

#[test]
fn test_unsettled_slot_is_null() {
    let promise_type = create_settlement_type();
    promise_type.new_promise(|_, _| Ok(())).unwrap();

    assert_eq!(promise_type.resolution().to_json(), serde_json::Value::Null);
    assert_eq!(promise_type.rejection().args(), None);
}

#[test]
fn test_capture_is_independent_of_chain() {
    let promise_type = create_settlement_type();
    let then = Stub::new();
    let mut promise = promise_type
        .new_promise(|resolve, _| resolve.call([Value::from("captured")]))
        .unwrap();
    promise.then(&then, Function::noop()).unwrap();

    // Capturing did not run the chain
    assert_eq!(then.call_count(), 0);

    promise.resolve(&[Value::from("replayed")]).unwrap();
    assert_eq!(then.args(0), Some(vec![Value::from("replayed")]));
    assert_eq!(promise_type.resolution().first(), Some(Value::from("captured")));
}

#[test]
fn test_driving_owned_resolver_directly() {
    let promise_type = create_settlement_type();
    let catch = Stub::new();
    let mut promise = promise_type.new_promise(|_, _| Ok(())).unwrap();
    promise.catch(&catch).unwrap();

    promise.resolver_mut().reject(Value::error("E")).unwrap();

    assert_eq!(error_message(&catch.args(0).unwrap()).as_deref(), Some("E"));
    assert!(promise.resolver().has_errored());
}

#[test]
fn test_combinator_resolvers() {
    let promise_type = create_settlement_type();
    let then = Stub::new();

    // Production code: Promise.all([...]).then(...).catch(...)
    promise_type
        .all()
        .borrow_mut()
        .then(&then, ())
        .unwrap()
        .catch(Function::noop())
        .unwrap();

    // Test: drive the chain the code registered
    let all = promise_type.combinator(Combinator::All).unwrap();
    all.borrow_mut()
        .resolve(&[Value::array([Value::from(1), Value::from(2)])])
        .unwrap();

    assert_eq!(
        then.args(0),
        Some(vec![Value::array([Value::from(1), Value::from(2)])])
    );
    assert!(!promise_type.resolution().is_settled());
}

#[test]
fn test_each_combinator_call_is_fresh() {
    let promise_type = create_settlement_type();
    let race = promise_type.race();
    race.borrow_mut().then(Function::noop(), Function::noop()).unwrap();

    let again = promise_type.race();

    assert_eq!(again.borrow().success_handler_count(), 0);
    assert_eq!(race.borrow().success_handler_count(), 1);
    assert!(promise_type.all_settled().borrow().requires_error_handler());
    assert!(promise_type.combinator(Combinator::Any).is_none());
    promise_type.any();
    assert!(promise_type.combinator(Combinator::Any).is_some());
}

#[test]
fn test_options_from_json() {
    let options = FakeOptions::from_json(r#"{"require_error_handler": false}"#).unwrap();
    let promise_type = create_settlement_type_with(options);
    let then = Stub::new();
    let mut promise = promise_type.new_promise(|_, _| Ok(())).unwrap();
    promise.then(&then, ()).unwrap();

    promise.resolve(&[]).unwrap();

    assert_eq!(then.call_count(), 1);
}
