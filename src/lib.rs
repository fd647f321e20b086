//! Deterministic test double for promise-like objects
//!
//! Production code receives a fake promise constructor; the test decides when
//! and how each chain settles, synchronously, and asserts on what the code
//! passed to `resolve`/`reject`.
//!
//! # Example
//!
//! ```
//! use promise_fake::{create_settlement_type, Function, Stub, Value};
//!
//! let promise_type = create_settlement_type();
//! let spy = Stub::new();
//!
//! // Code under test builds a promise and registers its continuations.
//! let mut promise = promise_type.new_promise(|resolve, _reject| {
//!     resolve.call([Value::from(5)])
//! })?;
//! promise
//!     .then(Function::new(|args| Ok(Value::from(args[0].as_number().unwrap_or(0.0) + 1.0))), ())?
//!     .then(&spy, ())?
//!     .catch(Function::noop())?;
//!
//! // The test replays the settlement it observed.
//! let observed = promise_type.resolution().args().unwrap_or_default();
//! promise.resolve(&observed)?;
//!
//! assert_eq!(spy.last_args(), Some(vec![Value::from(6)]));
//! # Ok::<(), promise_fake::FakeError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod error;
pub mod handler;
pub mod options;
pub mod prelude;
pub mod resolver;
pub mod settlement;
pub mod stub;
pub mod value;

pub use error::{Direction, FakeError};
pub use handler::{Handler, IntoHandler};
pub use options::FakeOptions;
pub use resolver::{ChainResolver, SharedResolver};
pub use settlement::{Combinator, Settle, SettlementCapturer, SettlementType, SlotView};
pub use stub::Stub;
pub use value::{CheapClone, Completion, ErrorValue, Function, Value};

/// Create a fresh chainable resolver
pub fn create_chain_resolver() -> ChainResolver {
    ChainResolver::new()
}

/// Create a fresh fake promise constructor with its own settlement slots.
///
/// Call once per test: slots and settlement counters are shared by every
/// promise built from the returned type.
pub fn create_settlement_type() -> SettlementType {
    SettlementType::new()
}

/// Like [`create_settlement_type`], with every resolver configured by `options`
pub fn create_settlement_type_with(options: FakeOptions) -> SettlementType {
    SettlementType::with_options(options)
}
