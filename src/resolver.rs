//! The chainable resolver: a synchronous stand-in for a promise chain.
//!
//! Handlers are recorded in registration order and only run when the test
//! drives the chain through [`ChainResolver::resolve`] or
//! [`ChainResolver::reject`].
//!
//! ```
//! use promise_fake::{ChainResolver, Function, Value};
//!
//! let mut chain = ChainResolver::new();
//! chain
//!     .then(Function::new(|args| Ok(Value::from(args[0].as_number().unwrap_or(0.0) + 1.0))), ())?
//!     .catch(Function::noop())?;
//!
//! assert_eq!(chain.resolve(&[Value::from(5)])?, Value::from(6));
//! # Ok::<(), promise_fake::FakeError>(())
//! ```

use crate::error::FakeError;
use crate::handler::IntoHandler;
use crate::options::FakeOptions;
use crate::prelude::*;
use crate::value::{CheapClone, Function, Value};

/// A resolver shared between a settlement type and the test driving it.
///
/// The resolver sits in a `RefCell`, so a handler must not borrow the
/// resolver that is running it: `borrow_mut` from inside a handler panics
/// while `resolve` or `reject` holds the borrow. Register further handlers
/// before driving it, or between two `resolve` calls.
pub type SharedResolver = Rc<RefCell<ChainResolver>>;

/// Ordered success, error and completion handlers plus the cursor that
/// tracks how far resolution has progressed.
///
/// The cursor never rewinds and the errored flag never clears, so a handler
/// runs at most once for the lifetime of the resolver.
#[derive(Debug)]
pub struct ChainResolver {
    success_handlers: Vec<Function>,
    error_handlers: Vec<Function>,
    completion_handlers: Vec<Function>,
    cursor: usize,
    has_errored: bool,
    require_error_handler: bool,
}

impl Default for ChainResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::with_options(FakeOptions::default())
    }

    pub fn with_options(options: FakeOptions) -> Self {
        Self {
            success_handlers: Vec::new(),
            error_handlers: Vec::new(),
            completion_handlers: Vec::new(),
            cursor: 0,
            has_errored: false,
            require_error_handler: options.require_error_handler,
        }
    }

    /// Wrap into a shared handle, for combinator resolvers
    pub fn into_shared(self) -> SharedResolver {
        Rc::new(RefCell::new(self))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════════════════

    pub fn register_success(&mut self, handler: impl IntoHandler) -> Result<&mut Self, FakeError> {
        let handler = handler.into_handler()?;
        if let Some(func) = handler.into_function() {
            tracing::trace!(
                index = self.success_handlers.len(),
                handler = func.name(),
                "register success handler"
            );
            self.success_handlers.push(func);
        }
        Ok(self)
    }

    pub fn register_error(&mut self, handler: impl IntoHandler) -> Result<&mut Self, FakeError> {
        let handler = handler.into_handler()?;
        if let Some(func) = handler.into_function() {
            tracing::trace!(
                index = self.error_handlers.len(),
                handler = func.name(),
                "register error handler"
            );
            self.error_handlers.push(func);
        }
        Ok(self)
    }

    pub fn register_completion(
        &mut self,
        handler: impl IntoHandler,
    ) -> Result<&mut Self, FakeError> {
        let handler = handler.into_handler()?;
        if let Some(func) = handler.into_function() {
            tracing::trace!(
                index = self.completion_handlers.len(),
                handler = func.name(),
                "register completion handler"
            );
            self.completion_handlers.push(func);
        }
        Ok(self)
    }

    /// Register a success handler and an optional error handler.
    ///
    /// Both arguments are validated before either is registered.
    pub fn then(
        &mut self,
        on_success: impl IntoHandler,
        on_error: impl IntoHandler,
    ) -> Result<&mut Self, FakeError> {
        let on_success = on_success.into_handler()?;
        let on_error = on_error.into_handler()?;
        self.register_success(on_success)?.register_error(on_error)
    }

    pub fn catch(&mut self, on_error: impl IntoHandler) -> Result<&mut Self, FakeError> {
        self.register_error(on_error)
    }

    pub fn finally(&mut self, on_completion: impl IntoHandler) -> Result<&mut Self, FakeError> {
        self.register_completion(on_completion)
    }

    /// Allow resolution without any error handler. Cannot be undone.
    pub fn disable_error_requirement(&mut self) -> &mut Self {
        self.require_error_handler = false;
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════════

    /// Index of the next success handler to run
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_errored(&self) -> bool {
        self.has_errored
    }

    pub fn requires_error_handler(&self) -> bool {
        self.require_error_handler
    }

    pub fn success_handler_count(&self) -> usize {
        self.success_handlers.len()
    }

    pub fn error_handler_count(&self) -> usize {
        self.error_handlers.len()
    }

    pub fn completion_handler_count(&self) -> usize {
        self.completion_handlers.len()
    }

    /// Whether another success handler is waiting to run
    pub fn can_resolve(&self) -> bool {
        !self.has_errored && self.cursor < self.success_handlers.len()
    }

    /// Fail unless [`resolve`](Self::resolve) would run at least one handler
    pub fn ensure_resolvable(&self) -> Result<(), FakeError> {
        if self.can_resolve() {
            Ok(())
        } else {
            Err(FakeError::Unresolvable)
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Settlement
    // ═══════════════════════════════════════════════════════════════════════

    fn check_error_handling(&self) -> Result<(), FakeError> {
        if self.require_error_handler && self.error_handlers.is_empty() {
            tracing::warn!("resolver driven without an error handler");
            return Err(FakeError::NoErrorHandling);
        }
        Ok(())
    }

    /// Run the remaining success handlers, threading each return value into
    /// the next.
    ///
    /// A handler that throws sends its value through [`reject`](Self::reject)
    /// and stops the chain for good. Returns the last handler's return value,
    /// or `undefined` when nothing ran or a handler threw.
    pub fn resolve(&mut self, args: &[Value]) -> Result<Value, FakeError> {
        if !self.can_resolve() {
            return Ok(Value::Undefined);
        }

        tracing::debug!(
            cursor = self.cursor,
            pending = self.success_handlers.len() - self.cursor,
            "resolving chain"
        );

        let mut input: Vec<Value> = args.to_vec();

        while let Some(handler) = self.next_success_handler() {
            self.check_error_handling()?;

            let outcome = handler.call(&input);
            self.cursor += 1;

            match outcome {
                Ok(value) => input = vec![value],
                Err(thrown) => {
                    tracing::debug!(
                        handler = handler.name(),
                        error = %thrown,
                        "success handler threw"
                    );
                    self.has_errored = true;
                    self.reject(thrown)?;
                    return Ok(Value::Undefined);
                }
            }
        }

        self.run_completion_handlers()?;
        Ok(input.pop().unwrap_or(Value::Undefined))
    }

    fn next_success_handler(&self) -> Option<Function> {
        if self.has_errored {
            return None;
        }
        self.success_handlers
            .get(self.cursor)
            .map(CheapClone::cheap_clone)
    }

    /// Fold `error` through every error handler in registration order, then
    /// run the completion handlers.
    ///
    /// Marks the resolver as errored, so later calls to `resolve` do nothing.
    /// Returns the value produced by the last error handler.
    pub fn reject(&mut self, error: Value) -> Result<Value, FakeError> {
        self.check_error_handling()?;
        self.has_errored = true;

        tracing::debug!(handlers = self.error_handlers.len(), error = %error, "rejecting chain");

        let handlers: Vec<Function> = self
            .error_handlers
            .iter()
            .map(CheapClone::cheap_clone)
            .collect();
        let mut current = error;
        for handler in handlers {
            current = handler
                .call(core::slice::from_ref(&current))
                .map_err(|value| FakeError::Uncaught { value })?;
        }

        self.run_completion_handlers()?;
        Ok(current)
    }

    fn run_completion_handlers(&self) -> Result<(), FakeError> {
        tracing::debug!(handlers = self.completion_handlers.len(), "chain settled");
        for handler in &self.completion_handlers {
            handler
                .call(&[])
                .map_err(|value| FakeError::Uncaught { value })?;
        }
        Ok(())
    }
}
