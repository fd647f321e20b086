//! Handler arguments accepted by `then`, `catch` and `finally`

use crate::error::FakeError;
use crate::value::{Function, Value};

/// A registration argument: either nothing, or something to call.
#[derive(Debug, Clone, Default)]
pub enum Handler {
    #[default]
    Absent,
    Callable(Function),
}

impl Handler {
    /// Validate a dynamic value at the registration boundary.
    ///
    /// `undefined` means "no handler"; any value other than a function is
    /// rejected immediately rather than at resolution time.
    pub fn from_value(value: Value) -> Result<Self, FakeError> {
        match value {
            Value::Undefined => Ok(Handler::Absent),
            Value::Function(func) => Ok(Handler::Callable(func)),
            other => Err(FakeError::UnacceptableHandler {
                type_of: other.type_of(),
            }),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Handler::Absent)
    }

    pub fn into_function(self) -> Option<Function> {
        match self {
            Handler::Absent => None,
            Handler::Callable(func) => Some(func),
        }
    }
}

/// Conversion into a [`Handler`], failing for values that are neither
/// absent nor callable.
pub trait IntoHandler {
    fn into_handler(self) -> Result<Handler, FakeError>;
}

impl IntoHandler for Handler {
    fn into_handler(self) -> Result<Handler, FakeError> {
        Ok(self)
    }
}

impl IntoHandler for Function {
    fn into_handler(self) -> Result<Handler, FakeError> {
        Ok(Handler::Callable(self))
    }
}

impl IntoHandler for &Function {
    fn into_handler(self) -> Result<Handler, FakeError> {
        Ok(Handler::Callable(self.clone()))
    }
}

impl IntoHandler for Option<Function> {
    fn into_handler(self) -> Result<Handler, FakeError> {
        Ok(self.map_or(Handler::Absent, Handler::Callable))
    }
}

impl IntoHandler for Value {
    fn into_handler(self) -> Result<Handler, FakeError> {
        Handler::from_value(self)
    }
}

impl IntoHandler for () {
    fn into_handler(self) -> Result<Handler, FakeError> {
        Ok(Handler::Absent)
    }
}
