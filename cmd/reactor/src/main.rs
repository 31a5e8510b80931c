//! Reactor-driven tasklet example
//!
//! Several scripts, each suspending a few times, driven to completion by
//! the posted-event reactor helper. Each body posts its own wake before
//! suspending, which stands in for a host event (timer, socket readiness)
//! becoming ready.
//!
//! Run with `TASKLET_LOG_LEVEL=debug` to watch the switches.

use tasklet::reactor::Reactor;
use tasklet::{
    suspend, CompiledScript, EngineConfig, Namespace, ScriptError, Step, Task, Value, WakeHandle,
};

fn main() {
    println!("=== tasklet reactor example ===\n");

    let config = EngineConfig::from_env();
    let reactor = Reactor::new();

    let mut tasks = Vec::new();
    for key in 0..4u64 {
        let task = Task::new(Namespace::new(format!("script{}", key)), &config);
        let wake = reactor.register(key);

        let w = wake.clone();
        let rounds = 2 + key as i64;
        let script = CompiledScript::labeled("scripts.conf", 10 + key as u32, move |ns| {
            let mut total = 0i64;
            for round in 0..rounds {
                total += round;
                ns.set("progress", Value::Int(round));
                w.post();
                suspend().map_err(ScriptError::from)?;
            }
            Ok(Value::Int(total))
        });

        match task.step(Some(script), Some(Box::new(wake.clone()))) {
            Ok(Step::Pending) => println!("task {} suspended", key),
            Ok(Step::Complete(r)) => println!("task {} finished early: {:?}", key, r),
            Err(e) => println!("task {} failed to start: {}", key, e),
        }
        tasks.push((task, wake));
    }

    println!();

    // The event loop: step whichever task's wake fired next.
    let mut steps = 0usize;
    while let Some(key) = reactor.next_posted() {
        let (task, wake) = &tasks[key as usize];
        if task.is_complete() {
            continue;
        }
        wake.rearm();
        steps += 1;
        if let Ok(Step::Complete(result)) = task.step(None, None) {
            println!("task {} completed: {:?}", key, result);
        }
    }

    println!("\n{} resume steps total", steps);
}
