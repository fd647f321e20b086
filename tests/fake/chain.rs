// Tests for the chainable resolver

use super::{add, error_message, init_tracing, multiply, throws};
use promise_fake::{create_chain_resolver, FakeError, Function, Stub, Value};

// ═══════════════════════════════════════════════════════════════════════════
// resolve
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_resolve_calls_then_action() {
    init_tracing();
    let then = Stub::new();

    create_chain_resolver()
        .then(&then, ())
        .unwrap()
        .catch(Function::noop())
        .unwrap()
        .resolve(&[])
        .unwrap();

    assert_eq!(then.call_count(), 1);
}

#[test]
fn test_resolve_passes_results_from_then_to_then() {
    init_tracing();
    let then = Stub::new();

    create_chain_resolver()
        .then(add(1.0), ())
        .unwrap()
        .then(multiply(2.0), ())
        .unwrap()
        .then(&then, ())
        .unwrap()
        .catch(Function::noop())
        .unwrap()
        .resolve(&[Value::from(5)])
        .unwrap();

    assert_eq!(then.args(0), Some(vec![Value::from(12)]));
}

#[test]
fn test_resolve_routes_thrown_error_to_every_catch() {
    init_tracing();
    let catch = Stub::new();

    create_chain_resolver()
        .then(throws("An error occurred!"), ())
        .unwrap()
        .catch(&catch)
        .unwrap()
        .catch(&catch)
        .unwrap()
        .resolve(&[])
        .unwrap();

    assert_eq!(catch.call_count(), 2);
    assert_eq!(
        error_message(&catch.args(0).unwrap()).as_deref(),
        Some("An error occurred!")
    );
}

#[test]
fn test_resolve_skips_then_after_throw() {
    let then = Stub::new();

    create_chain_resolver()
        .then(throws("An error occurred!"), ())
        .unwrap()
        .then(&then, ())
        .unwrap()
        .catch(Function::noop())
        .unwrap()
        .resolve(&[])
        .unwrap();

    assert_eq!(then.call_count(), 0);
}

#[test]
fn test_resolve_without_catch_fails() {
    let result = create_chain_resolver()
        .then(Function::noop(), ())
        .unwrap()
        .resolve(&[]);

    assert!(matches!(result, Err(FakeError::NoErrorHandling)));
}

#[test]
fn test_resolve_resumes_with_handlers_added_later() {
    let mut chain = create_chain_resolver();
    chain.disable_error_requirement();
    chain.then(add(1.0), ()).unwrap();
    assert_eq!(chain.resolve(&[Value::from(1)]).unwrap(), Value::from(2));

    let then = Stub::new();
    chain.then(&then, ()).unwrap();
    chain.resolve(&[Value::from(10)]).unwrap();

    assert_eq!(then.args(0), Some(vec![Value::from(10)]));
    assert_eq!(chain.cursor(), 2);
}

#[test]
fn test_finally_after_success() {
    let finally = Stub::new();

    create_chain_resolver()
        .then(Function::noop(), ())
        .unwrap()
        .catch(Function::noop())
        .unwrap()
        .finally(&finally)
        .unwrap()
        .finally(&finally)
        .unwrap()
        .resolve(&[])
        .unwrap();

    assert_eq!(finally.call_count(), 2);
}

#[test]
fn test_finally_after_error() {
    let finally = Stub::new();

    create_chain_resolver()
        .then(throws("Boom!"), ())
        .unwrap()
        .catch(Function::noop())
        .unwrap()
        .finally(&finally)
        .unwrap()
        .finally(&finally)
        .unwrap()
        .resolve(&[])
        .unwrap();

    assert_eq!(finally.call_count(), 2);
}

#[test]
fn test_finally_order() {
    let order = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut chain = create_chain_resolver();
    for label in ["first", "second", "third"] {
        let order = order.clone();
        chain
            .finally(Function::new(move |_| {
                order.borrow_mut().push(label);
                Ok(Value::Undefined)
            }))
            .unwrap();
    }
    chain.then(Function::noop(), Function::noop()).unwrap();

    chain.resolve(&[]).unwrap();

    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_throwing_finally_escapes() {
    let mut chain = create_chain_resolver();
    chain
        .then(Function::noop(), Function::noop())
        .unwrap()
        .finally(throws("cleanup failed"))
        .unwrap();

    let err = chain.resolve(&[]).unwrap_err();

    assert!(!err.is_usage_error());
    assert_eq!(err.to_string(), "Uncaught Error: cleanup failed");
}

// ═══════════════════════════════════════════════════════════════════════════
// reject
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_reject_folds_through_catch_handlers() {
    let seen = Stub::new();
    let mut chain = create_chain_resolver();
    chain
        .catch(Function::new(|args| {
            Ok(Value::from(format!(
                "wrapped({})",
                error_message(args).unwrap_or_default()
            )))
        }))
        .unwrap()
        .catch(&seen)
        .unwrap();

    chain.reject(Value::error("E")).unwrap();

    assert_eq!(seen.args(0), Some(vec![Value::from("wrapped(E)")]));
}

#[test]
fn test_catch_can_swallow_error() {
    let mut chain = create_chain_resolver();
    chain
        .catch(Function::new(|_| Ok(Value::Null)))
        .unwrap();

    assert_eq!(chain.reject(Value::error("E")).unwrap(), Value::Null);
}

#[test]
fn test_reject_marks_errored() {
    let then = Stub::new();
    let mut chain = create_chain_resolver();
    chain.then(&then, Function::noop()).unwrap();

    chain.reject(Value::from("nope")).unwrap();

    assert!(chain.has_errored());
    assert!(!chain.can_resolve());
    assert_eq!(chain.resolve(&[]).unwrap(), Value::Undefined);
    assert_eq!(then.call_count(), 0);
}

#[test]
fn test_reject_without_catch_fails() {
    let mut chain = create_chain_resolver();
    assert!(matches!(
        chain.reject(Value::error("E")),
        Err(FakeError::NoErrorHandling)
    ));
    assert!(!chain.has_errored());
}

// ═══════════════════════════════════════════════════════════════════════════
// registration
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_registration_rejects_non_functions() {
    let mut chain = create_chain_resolver();

    let err = chain.catch(Value::from(true)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Received unexpected value for then, catch or finally. Expected undefined or function, but got value of type boolean"
    );
}

#[test]
fn test_registration_accepts_function_values() {
    let then = Stub::new();
    let mut chain = create_chain_resolver();
    chain
        .then(Value::from(&then), Value::function(|_| Ok(Value::Undefined)))
        .unwrap();

    chain.resolve(&[Value::from(1)]).unwrap();

    assert!(then.called_with(&[Value::from(1)]));
}

#[test]
fn test_ensure_resolvable() {
    let mut chain = create_chain_resolver();
    assert!(matches!(
        chain.ensure_resolvable(),
        Err(FakeError::Unresolvable)
    ));

    chain.then(Function::noop(), Function::noop()).unwrap();
    assert!(chain.ensure_resolvable().is_ok());

    chain.resolve(&[]).unwrap();
    assert!(chain.ensure_resolvable().is_err());
}
