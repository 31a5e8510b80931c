//! Basic tasklet example
//!
//! Evaluates one script synchronously, then drives a suspending script by
//! hand: first step returns Pending, the second completes it.
//!
//! # Environment Variables
//!
//! - `TASKLET_LOG_LEVEL=debug` - watch the suspend/resume trace
//! - `TASKLET_STACK_SIZE` - per-task stack size in bytes

use tasklet::{
    suspend, CompiledScript, EngineConfig, Namespace, ScriptError, Step, Task, Value, WakeHandle,
};

struct NoopWake;

impl WakeHandle for NoopWake {
    fn post(&self) {}
}

fn main() {
    println!("=== tasklet basic example ===\n");

    let config = EngineConfig::from_env();
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // Synchronous mode: configuration-time style evaluation, no stack,
    // no switching.
    let ns = Namespace::new("demo");
    ns.set("greeting", Value::Str("hello from config".into()));

    let sync_task = Task::new(ns.clone(), &config);
    let script = CompiledScript::labeled("demo.conf", 4, |ns| {
        Ok(ns.get("greeting").unwrap_or(Value::Null))
    });

    match sync_task.step(Some(script), None) {
        Ok(Step::Complete(Ok(v))) => println!("sync result: {}", v),
        other => println!("sync evaluation failed: {:?}", other),
    }

    // Resumable mode: the body suspends once mid-computation.
    let task = Task::new(ns, &config);
    let script = CompiledScript::labeled("demo.conf", 9, |ns| {
        let base = ns.get("base").and_then(|v| v.as_int()).unwrap_or(0);
        suspend().map_err(ScriptError::from)?;
        Ok(Value::Int(base + 1))
    });
    task.namespace().set("base", Value::Int(41));

    let first = task.step(Some(script), Some(Box::new(NoopWake)));
    println!("first step:  {:?}", first);

    let second = task.step(None, None);
    println!("second step: {:?}", second);
}
