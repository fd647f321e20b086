//! Integration tests for the promise fake, organized by feature
//!
//! These tests exercise the fake through the public API only.
//!
//! Set `RUST_LOG` to see the resolver's trace output:
//!
//! ```bash
//! RUST_LOG=promise_fake=trace cargo test -- --nocapture
//! ```

mod chain;
mod settlement;

use promise_fake::{Function, Value};

/// Install a test-friendly tracing subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Handler returning its first argument plus `n`
pub fn add(n: f64) -> Function {
    Function::named("add", move |args| Ok(Value::from(number(args) + n)))
}

/// Handler returning its first argument times `n`
pub fn multiply(n: f64) -> Function {
    Function::named("multiply", move |args| Ok(Value::from(number(args) * n)))
}

/// Handler throwing an `Error` with `message`
pub fn throws(message: &'static str) -> Function {
    Function::named("throws", move |_| Err(Value::error(message)))
}

fn number(args: &[Value]) -> f64 {
    args.first().and_then(Value::as_number).unwrap_or(f64::NAN)
}

/// Message of the error passed as the first argument
pub fn error_message(args: &[Value]) -> Option<String> {
    args.first()
        .and_then(Value::as_error)
        .map(|err| err.message.clone())
}
