//! Minimal posted-event reactor glue
//!
//! Hosts embed the engine behind their own event loop; this module is the
//! small amount of glue a host (or a test) needs to be one: a queue of
//! posted task keys and a wake handle that pushes into it.
//!
//! The engine never touches any of this - it only calls `post`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_queue::SegQueue;

use tasklet_core::traits::WakeHandle;

/// Host-chosen identifier for one task.
pub type TaskKey = u64;

/// A queue of tasks whose wake fired and that should be stepped again.
pub struct Reactor {
    posted: Arc<SegQueue<TaskKey>>,
}

impl Reactor {
    pub fn new() -> Self {
        Self {
            posted: Arc::new(SegQueue::new()),
        }
    }

    /// Create the wake handle for one task key.
    pub fn register(&self, key: TaskKey) -> Arc<PostedWake> {
        Arc::new(PostedWake {
            key,
            posted: AtomicBool::new(false),
            queue: self.posted.clone(),
        })
    }

    /// Next task whose wake fired, in posting order.
    pub fn next_posted(&self) -> Option<TaskKey> {
        self.posted.pop()
    }

    pub fn is_idle(&self) -> bool {
        self.posted.is_empty()
    }

    pub fn pending_posts(&self) -> usize {
        self.posted.len()
    }
}

impl Default for Reactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Wake handle backed by the reactor's posted queue.
///
/// Posting is idempotent: once posted, further posts are no-ops until the
/// host rearms the handle (just before re-stepping the task, so a post
/// during the step queues a fresh round). Posting after the task is gone
/// only enqueues a stale key; the host skips keys it no longer knows.
pub struct PostedWake {
    key: TaskKey,
    posted: AtomicBool,
    queue: Arc<SegQueue<TaskKey>>,
}

impl PostedWake {
    pub fn key(&self) -> TaskKey {
        self.key
    }

    pub fn is_posted(&self) -> bool {
        self.posted.load(Ordering::Acquire)
    }

    /// Allow the next `post` to enqueue again. Call before stepping the
    /// task this handle belongs to.
    pub fn rearm(&self) {
        self.posted.store(false, Ordering::Release);
    }
}

impl WakeHandle for PostedWake {
    fn post(&self) {
        if !self.posted.swap(true, Ordering::AcqRel) {
            self.queue.push(self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{suspend, CompiledScript, EngineConfig, Namespace, ScriptError, Step, Task, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_post_is_idempotent_until_rearmed() {
        let reactor = Reactor::new();
        let wake = reactor.register(9);

        wake.post();
        wake.post();
        wake.post();
        assert_eq!(reactor.pending_posts(), 1);

        assert_eq!(reactor.next_posted(), Some(9));
        wake.rearm();
        wake.post();
        assert_eq!(reactor.pending_posts(), 1);
    }

    #[test]
    fn test_stale_post_after_task_gone_is_harmless() {
        let reactor = Reactor::new();
        let wake = reactor.register(3);

        {
            let task = Task::new(Namespace::new("gone"), &EngineConfig::new());
            let w = wake.clone();
            let step = task
                .step(
                    Some(CompiledScript::labeled("r", 1, move |_| {
                        w.post();
                        suspend().map_err(ScriptError::from)?;
                        Ok(Value::Null)
                    })),
                    Some(Box::new(wake.clone())),
                )
                .unwrap();
            assert_eq!(step, Step::Pending);
            // Task dropped here; drop forces termination.
        }

        // The event it posted is still queued, and posting again later
        // must not break anything.
        assert_eq!(reactor.next_posted(), Some(3));
        wake.rearm();
        wake.post();
        assert_eq!(reactor.next_posted(), Some(3));
    }

    #[test]
    fn test_interleaved_tasks_each_resume_in_order() {
        let reactor = Reactor::new();
        let trace: Rc<RefCell<Vec<(TaskKey, i64)>>> = Rc::new(RefCell::new(Vec::new()));

        let mut tasks = Vec::new();
        for key in 0..3u64 {
            let task = Task::new(Namespace::new(format!("ns{}", key)), &EngineConfig::new());
            let wake = reactor.register(key);

            let w = wake.clone();
            let t = trace.clone();
            let script = CompiledScript::labeled("reactor.conf", 1, move |_| {
                for round in 0..4i64 {
                    t.borrow_mut().push((key, round));
                    w.post();
                    suspend().map_err(ScriptError::from)?;
                }
                Ok(Value::Int(key as i64))
            });

            let step = task.step(Some(script), Some(Box::new(wake.clone()))).unwrap();
            assert_eq!(step, Step::Pending);
            tasks.push((task, wake));
        }

        // Drive until no wakes remain.
        while let Some(key) = reactor.next_posted() {
            let (task, wake) = &tasks[key as usize];
            if task.is_complete() {
                continue;
            }
            wake.rearm();
            task.step(None, None).unwrap();
        }

        for (key, (task, _)) in tasks.iter().enumerate() {
            assert_eq!(task.result(), Some(Ok(Value::Int(key as i64))));
        }

        // Per-task ordering: each task saw its rounds strictly in order,
        // however the tasks interleaved globally.
        for key in 0..3u64 {
            let rounds: Vec<i64> = trace
                .borrow()
                .iter()
                .filter(|(k, _)| *k == key)
                .map(|(_, r)| *r)
                .collect();
            assert_eq!(rounds, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_wakeup_goes_through_stored_handle() {
        let reactor = Reactor::new();
        let wake = reactor.register(1);

        let task = Task::new(Namespace::new("w"), &EngineConfig::new());
        let step = task
            .step(
                Some(CompiledScript::labeled("r", 1, |_| {
                    suspend().map_err(ScriptError::from)?;
                    Ok(Value::Bool(true))
                })),
                Some(Box::new(wake.clone())),
            )
            .unwrap();
        assert_eq!(step, Step::Pending);

        // The host-side readiness path: task.wakeup() posts the stored
        // handle, the reactor hands the key back.
        task.wakeup();
        assert_eq!(reactor.next_posted(), Some(1));

        wake.rearm();
        assert_eq!(task.step(None, None).unwrap(), Step::Complete(Ok(Value::Bool(true))));

        // After termination is requested, wakeup posts nothing.
        let lingering = Task::new(Namespace::new("w2"), &EngineConfig::new());
        let wake2 = reactor.register(2);
        lingering
            .step(
                Some(CompiledScript::labeled("r", 2, |_| {
                    suspend().map_err(ScriptError::from)?;
                    Ok(Value::Null)
                })),
                Some(Box::new(wake2)),
            )
            .unwrap();
        lingering.request_terminate();
        lingering.wakeup();
        assert!(reactor.is_idle());
    }
}
