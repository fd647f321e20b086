//! Settlement capture: the constructible fake promise.
//!
//! A [`SettlementType`] plays the role of the `Promise` constructor handed to
//! production code. Every promise built from one type shares a pair of
//! settlement slots, so a test can assert on the last `resolve`/`reject` call
//! made anywhere through that type.
//!
//! ```
//! use promise_fake::{create_settlement_type, Value};
//!
//! let promise_type = create_settlement_type();
//! let _promise = promise_type.new_promise(|resolve, _reject| {
//!     resolve.call([Value::from("data")])
//! })?;
//!
//! assert_eq!(promise_type.resolution().args(), Some(vec![Value::from("data")]));
//! # Ok::<(), promise_fake::FakeError>(())
//! ```

use crate::error::{Direction, FakeError};
use crate::handler::IntoHandler;
use crate::options::FakeOptions;
use crate::prelude::*;
use crate::resolver::{ChainResolver, SharedResolver};
use crate::value::{CheapClone, Value};

// ═══════════════════════════════════════════════════════════════════════════════
// Shared slots
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct Slot {
    args: RefCell<Option<Vec<Value>>>,
    calls: Cell<u32>,
}

/// Capture state shared by every promise built from one settlement type
#[derive(Debug, Default)]
pub struct SettlementSlots {
    resolution: Slot,
    rejection: Slot,
}

impl SettlementSlots {
    fn slot(&self, direction: Direction) -> &Slot {
        match direction {
            Direction::Resolve => &self.resolution,
            Direction::Reject => &self.rejection,
        }
    }

    fn settle(&self, direction: Direction, args: Vec<Value>) -> Result<(), FakeError> {
        let slot = self.slot(direction);
        if slot.calls.get() > 0 {
            tracing::warn!(%direction, "promise settled twice");
            return Err(FakeError::SettledTwice { direction });
        }
        tracing::debug!(%direction, args = args.len(), "captured settlement");
        *slot.args.borrow_mut() = Some(args);
        slot.calls.set(slot.calls.get() + 1);
        Ok(())
    }
}

/// The resolve or reject callback handed to an executor.
///
/// Cheap to clone, so production code may keep it and settle later. Each
/// direction accepts one call across the whole settlement type.
#[derive(Debug, Clone)]
pub struct Settle {
    direction: Direction,
    slots: Rc<SettlementSlots>,
}

// Settle holds an Rc to the shared slots
impl CheapClone for Settle {}

impl Settle {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Record `args` as this direction's settlement arguments
    pub fn call(&self, args: impl IntoIterator<Item = Value>) -> Result<(), FakeError> {
        self.slots.settle(self.direction, args.into_iter().collect())
    }
}

/// Read-only view of one settlement slot
#[derive(Debug, Clone)]
pub struct SlotView {
    direction: Direction,
    slots: Rc<SettlementSlots>,
}

impl SlotView {
    fn slot(&self) -> &Slot {
        self.slots.slot(self.direction)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The recorded argument list, `None` until the callback is called
    pub fn args(&self) -> Option<Vec<Value>> {
        self.slot().args.borrow().clone()
    }

    /// First recorded argument, if any
    pub fn first(&self) -> Option<Value> {
        self.slot()
            .args
            .borrow()
            .as_ref()
            .and_then(|args| args.first().map(CheapClone::cheap_clone))
    }

    pub fn call_count(&self) -> u32 {
        self.slot().calls.get()
    }

    pub fn is_settled(&self) -> bool {
        self.call_count() > 0
    }

    /// The recorded arguments as a JSON array, `null` when not settled
    pub fn to_json(&self) -> serde_json::Value {
        match self.slot().args.borrow().as_ref() {
            Some(args) => Value::array(args.iter().map(CheapClone::cheap_clone))
                .to_json()
                .unwrap_or(serde_json::Value::Null),
            None => serde_json::Value::Null,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Settlement type
// ═══════════════════════════════════════════════════════════════════════════════

/// Static combinators of the promise constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    All,
    Race,
    AllSettled,
    Any,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::All => "all",
            Combinator::Race => "race",
            Combinator::AllSettled => "allSettled",
            Combinator::Any => "any",
        }
    }
}

/// A fresh fake promise constructor with its own settlement slots.
///
/// Create one per test; promises built from the same type share slots and
/// settlement counters.
#[derive(Debug)]
pub struct SettlementType {
    slots: Rc<SettlementSlots>,
    options: FakeOptions,
    combinators: RefCell<IndexMap<Combinator, SharedResolver>>,
}

impl Default for SettlementType {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementType {
    pub fn new() -> Self {
        Self::with_options(FakeOptions::default())
    }

    pub fn with_options(options: FakeOptions) -> Self {
        Self {
            slots: Rc::new(SettlementSlots::default()),
            options,
            combinators: RefCell::new(index_map_new()),
        }
    }

    pub fn options(&self) -> FakeOptions {
        self.options
    }

    /// Construct a promise: run `executor` once with the resolve and reject
    /// callbacks.
    ///
    /// Whatever the executor returns as an error propagates unchanged,
    /// including a second settlement in the same direction.
    pub fn new_promise<F>(&self, executor: F) -> Result<SettlementCapturer, FakeError>
    where
        F: FnOnce(Settle, Settle) -> Result<(), FakeError>,
    {
        let resolve = Settle {
            direction: Direction::Resolve,
            slots: self.slots.cheap_clone(),
        };
        let reject = Settle {
            direction: Direction::Reject,
            slots: self.slots.cheap_clone(),
        };

        executor(resolve, reject)?;

        Ok(SettlementCapturer {
            resolver: ChainResolver::with_options(self.options),
        })
    }

    /// Arguments of the most recent `resolve` call
    pub fn resolution(&self) -> SlotView {
        SlotView {
            direction: Direction::Resolve,
            slots: self.slots.cheap_clone(),
        }
    }

    /// Arguments of the most recent `reject` call
    pub fn rejection(&self) -> SlotView {
        SlotView {
            direction: Direction::Reject,
            slots: self.slots.cheap_clone(),
        }
    }

    /// A fresh resolver standing in for `Promise.all(...)`.
    ///
    /// Handlers on a combinator resolver cannot reach back into it while it
    /// is being driven; see [`SharedResolver`].
    pub fn all(&self) -> SharedResolver {
        self.create_combinator(Combinator::All)
    }

    /// A fresh resolver standing in for `Promise.race(...)`
    pub fn race(&self) -> SharedResolver {
        self.create_combinator(Combinator::Race)
    }

    pub fn all_settled(&self) -> SharedResolver {
        self.create_combinator(Combinator::AllSettled)
    }

    pub fn any(&self) -> SharedResolver {
        self.create_combinator(Combinator::Any)
    }

    /// The resolver most recently created for `kind`
    pub fn combinator(&self, kind: Combinator) -> Option<SharedResolver> {
        self.combinators.borrow().get(&kind).map(CheapClone::cheap_clone)
    }

    fn create_combinator(&self, kind: Combinator) -> SharedResolver {
        let resolver = ChainResolver::with_options(self.options).into_shared();
        tracing::trace!(combinator = kind.as_str(), "created combinator resolver");
        self.combinators
            .borrow_mut()
            .insert(kind, resolver.cheap_clone());
        resolver
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Capturer
// ═══════════════════════════════════════════════════════════════════════════════

/// A fake promise. Owns its resolver and forwards `then`, `catch` and
/// `finally` to it.
#[derive(Debug)]
pub struct SettlementCapturer {
    resolver: ChainResolver,
}

impl SettlementCapturer {
    pub fn then(
        &mut self,
        on_success: impl IntoHandler,
        on_error: impl IntoHandler,
    ) -> Result<&mut Self, FakeError> {
        self.resolver.then(on_success, on_error)?;
        Ok(self)
    }

    pub fn catch(&mut self, on_error: impl IntoHandler) -> Result<&mut Self, FakeError> {
        self.resolver.catch(on_error)?;
        Ok(self)
    }

    pub fn finally(&mut self, on_completion: impl IntoHandler) -> Result<&mut Self, FakeError> {
        self.resolver.finally(on_completion)?;
        Ok(self)
    }

    pub fn resolver(&self) -> &ChainResolver {
        &self.resolver
    }

    /// The owned resolver, for driving the chain
    pub fn resolver_mut(&mut self) -> &mut ChainResolver {
        &mut self.resolver
    }

    pub fn resolve(&mut self, args: &[Value]) -> Result<Value, FakeError> {
        self.resolver.resolve(args)
    }

    pub fn reject(&mut self, error: Value) -> Result<Value, FakeError> {
        self.resolver.reject(error)
    }
}
