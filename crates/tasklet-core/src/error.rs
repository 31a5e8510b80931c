//! Error types for the tasklet engine
//!
//! Two layers: `EngineError` for failures of the engine machinery itself
//! (misuse, platform calls, lifecycle), and `ScriptError` for failures a
//! script body produces or observes. Engine failures that reach script code
//! convert into script errors so the body's own error handling runs.

use core::fmt;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the engine machinery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Suspend was called with no task active
    SuspendOutsideTask,

    /// The task was asked to unwind; delivered at its next suspend point
    Terminated,

    /// A completed task was stepped again
    AlreadyCompleted,

    /// First step of a task without a script body to run
    MissingScript,

    /// Stack mapping failed (errno)
    StackAllocationFailed(i32),

    /// Guard-page protection failed (errno)
    StackProtectionFailed(i32),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SuspendOutsideTask => {
                write!(f, "blocking calls are not allowed")
            }
            EngineError::Terminated => write!(f, "terminated"),
            EngineError::AlreadyCompleted => write!(f, "task already completed"),
            EngineError::MissingScript => write!(f, "no script body to run"),
            EngineError::StackAllocationFailed(errno) => {
                write!(f, "stack allocation failed (errno {})", errno)
            }
            EngineError::StackProtectionFailed(errno) => {
                write!(f, "stack protection failed (errno {})", errno)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Where a script came from: the label attached at compile time
/// (configuration file and line) or a frame position inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A failure produced or observed by a script body.
///
/// Replaces the usual interpreter type/value/traceback triple with one
/// tagged value: a message and an optional source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }

    /// The single formatted diagnostic handed to the host's log:
    /// `<message> [<file>:<line>]`, with empty message, empty file and
    /// line 0 when no structured information is available.
    pub fn diagnostic(&self) -> String {
        match &self.location {
            Some(loc) => format!("{} [{}:{}]", self.message, loc.file, loc.line),
            None => format!("{} [:0]", self.message),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ScriptError {}

impl From<EngineError> for ScriptError {
    fn from(e: EngineError) -> Self {
        ScriptError::new(e.to_string())
    }
}
