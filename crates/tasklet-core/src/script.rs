//! Compiled script bodies
//!
//! A compiled script pairs a body closure with the source label it was
//! compiled under (configuration file and line), so diagnostics can point
//! back at the directive that defined it.

use core::fmt;

use crate::error::{ScriptError, SourceLocation};
use crate::namespace::Namespace;
use crate::value::Value;

/// The callable form of a script body.
///
/// Runs against the task's namespace and either produces a value or raises.
/// Consumed by its first (and only) evaluation.
pub type ScriptBody = Box<dyn FnOnce(&Namespace) -> Result<Value, ScriptError>>;

/// A script body ready to run, labeled with its origin.
pub struct CompiledScript {
    origin: SourceLocation,
    body: ScriptBody,
}

impl CompiledScript {
    pub fn new(origin: SourceLocation, body: ScriptBody) -> Self {
        Self { origin, body }
    }

    /// Compile-time labeling: `file:line` of the configuration directive
    /// the script text came from.
    pub fn labeled<F>(file: impl Into<String>, line: u32, body: F) -> Self
    where
        F: FnOnce(&Namespace) -> Result<Value, ScriptError> + 'static,
    {
        Self {
            origin: SourceLocation::new(file, line),
            body: Box::new(body),
        }
    }

    pub fn origin(&self) -> &SourceLocation {
        &self.origin
    }

    pub fn into_parts(self) -> (SourceLocation, ScriptBody) {
        (self.origin, self.body)
    }
}

impl fmt::Debug for CompiledScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledScript")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
