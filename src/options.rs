//! Configuration shared by resolvers and settlement types

use serde::{Deserialize, Serialize};

use crate::error::FakeError;
use crate::prelude::*;

/// Options applied to every resolver a fake creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FakeOptions {
    /// Fail resolution when no error handler is registered
    pub require_error_handler: bool,
}

impl Default for FakeOptions {
    fn default() -> Self {
        Self {
            require_error_handler: true,
        }
    }
}

impl FakeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object, e.g. `{"require_error_handler": false}`
    pub fn from_json(source: &str) -> Result<Self, FakeError> {
        serde_json::from_str(source).map_err(|e| FakeError::InvalidOptions(e.to_string()))
    }

    /// Set whether resolution requires an error handler
    pub fn set_require_error_handler(&mut self, required: bool) -> &mut Self {
        self.require_error_handler = required;
        self
    }
}
