//! Task outcome tri-state

use crate::error::ScriptError;
use crate::value::Value;

/// What a task has produced so far.
///
/// Transitions only forward: `NotStarted` → `Pending` → `Complete`.
/// (Synchronous evaluation skips `Pending`.) Once `Complete`, the task is
/// never stepped again.
#[derive(Debug)]
pub enum TaskOutcome {
    /// Never stepped; no stack or context exists yet.
    NotStarted,

    /// Stepped at least once, body has not finished. Distinct from any
    /// real result value.
    Pending,

    /// Body ran to completion: its value, or the error already logged.
    Complete(Result<Value, ScriptError>),
}

impl TaskOutcome {
    #[inline]
    pub fn is_not_started(&self) -> bool {
        matches!(self, TaskOutcome::NotStarted)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskOutcome::Pending)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskOutcome::Complete(_))
    }

    /// Clone out the final result, if the task has one.
    pub fn result(&self) -> Option<Result<Value, ScriptError>> {
        match self {
            TaskOutcome::Complete(r) => Some(r.clone()),
            _ => None,
        }
    }
}

impl Default for TaskOutcome {
    fn default() -> Self {
        TaskOutcome::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(TaskOutcome::NotStarted.is_not_started());
        assert!(TaskOutcome::Pending.is_pending());
        assert!(TaskOutcome::Complete(Ok(Value::Null)).is_complete());
        assert!(!TaskOutcome::Pending.is_complete());
    }

    #[test]
    fn test_result_extraction() {
        assert_eq!(TaskOutcome::Pending.result(), None);

        let done = TaskOutcome::Complete(Ok(Value::Int(3)));
        assert_eq!(done.result(), Some(Ok(Value::Int(3))));

        let failed = TaskOutcome::Complete(Err(ScriptError::new("bad")));
        assert!(matches!(failed.result(), Some(Err(_))));
    }
}
