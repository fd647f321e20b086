//! Recording stubs for use as handlers
//!
//! A [`Stub`] remembers every argument list it was called with, so a test
//! can register it on a chain and assert on how it was invoked afterwards.
//!
//! ```
//! use promise_fake::{ChainResolver, Stub, Value};
//!
//! let spy = Stub::new();
//! let mut chain = ChainResolver::new();
//! chain.then(&spy, &spy)?;
//! chain.resolve(&[Value::from("data")])?;
//!
//! assert_eq!(spy.call_count(), 1);
//! assert_eq!(spy.last_args(), Some(vec![Value::from("data")]));
//! # Ok::<(), promise_fake::FakeError>(())
//! ```

use crate::error::FakeError;
use crate::handler::{Handler, IntoHandler};
use crate::prelude::*;
use crate::value::{CheapClone, Completion, Function, Value};

#[derive(Debug, Default)]
struct StubState {
    calls: Vec<Vec<Value>>,
    outcome: Outcome,
}

#[derive(Debug, Clone, Default)]
enum Outcome {
    #[default]
    Undefined,
    Return(Value),
    Throw(Value),
    PassThrough,
}

/// A spy that records its calls. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct Stub {
    name: Option<Rc<str>>,
    state: Rc<RefCell<StubState>>,
}

// Stub is an Rc handle
impl CheapClone for Stub {}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub whose name appears in debug output and logs
    pub fn named(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: Some(Rc::from(name)),
            state: Rc::default(),
        }
    }

    /// Make every call return `value`
    pub fn returning(self, value: impl Into<Value>) -> Self {
        self.state.borrow_mut().outcome = Outcome::Return(value.into());
        self
    }

    /// Make every call throw `value`
    pub fn throwing(self, value: impl Into<Value>) -> Self {
        self.state.borrow_mut().outcome = Outcome::Throw(value.into());
        self
    }

    /// Make every call return its first argument, so a stub registered as
    /// an error handler hands the error on to the next one unchanged
    pub fn passing_through(self) -> Self {
        self.state.borrow_mut().outcome = Outcome::PassThrough;
        self
    }

    /// A function that records into this stub
    pub fn handler(&self) -> Function {
        let state = self.state.cheap_clone();
        let name = self.name.as_deref().unwrap_or("stub").to_string();
        Function::named(name, move |args| record(&state, args))
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    pub fn called(&self) -> bool {
        self.call_count() > 0
    }

    /// All recorded argument lists, oldest first
    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.state.borrow().calls.clone()
    }

    /// Arguments of the `n`th call
    pub fn args(&self, n: usize) -> Option<Vec<Value>> {
        self.state.borrow().calls.get(n).cloned()
    }

    pub fn last_args(&self) -> Option<Vec<Value>> {
        self.state.borrow().calls.last().cloned()
    }

    /// Whether any call received exactly `args`
    pub fn called_with(&self, args: &[Value]) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|call| call.as_slice() == args)
    }

    /// Forget recorded calls, keeping the configured outcome
    pub fn reset(&self) {
        self.state.borrow_mut().calls.clear();
    }
}

fn record(state: &RefCell<StubState>, args: &[Value]) -> Completion {
    let mut state = state.borrow_mut();
    state.calls.push(args.to_vec());
    match &state.outcome {
        Outcome::Undefined => Ok(Value::Undefined),
        Outcome::Return(value) => Ok(value.cheap_clone()),
        Outcome::Throw(value) => Err(value.cheap_clone()),
        Outcome::PassThrough => Ok(args
            .first()
            .map_or(Value::Undefined, CheapClone::cheap_clone)),
    }
}

impl IntoHandler for &Stub {
    fn into_handler(self) -> Result<Handler, FakeError> {
        Ok(Handler::Callable(self.handler()))
    }
}

impl From<&Stub> for Value {
    fn from(stub: &Stub) -> Self {
        Value::Function(stub.handler())
    }
}
