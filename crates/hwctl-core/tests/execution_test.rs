//! Execution protocol tests.
//!
//! Covers the per-invocation signal ordering, the exactly-once terminal
//! pair, cancellation, and the slot's orphaning semantics.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::{sleep, timeout};

use hwctl_core::{
    spawn_execution, CommandSignal, ExecutionError, ExecutionSlot, ExecutionState, SignalEmitter,
    SignalKind, SignalReceiver,
};

async fn next_signal(rx: &mut SignalReceiver) -> CommandSignal {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for signal")
        .expect("signal channel closed")
}

#[tokio::test]
async fn successful_work_emits_reply_then_ready() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();

    let handle = spawn_execution(&emitter, "demo", async { Ok(json!(42)) }, Ok);

    let reply = next_signal(&mut rx).await;
    assert_eq!(reply.kind, SignalKind::Reply);
    assert_eq!(reply.command, "demo");
    assert_eq!(reply.result, Some(json!(42)));

    let ready = next_signal(&mut rx).await;
    assert_eq!(ready.kind, SignalKind::Ready);

    assert_eq!(handle.state(), ExecutionState::Completed);
    assert!(handle.is_finished());
}

#[tokio::test]
async fn failing_work_emits_failed_then_ready_and_no_reply() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();

    let handle = spawn_execution(
        &emitter,
        "demo",
        async { Err(ExecutionError::Failed("boom".into())) },
        Ok,
    );

    let failed = next_signal(&mut rx).await;
    assert_eq!(failed.kind, SignalKind::Failed);
    let ready = next_signal(&mut rx).await;
    assert_eq!(ready.kind, SignalKind::Ready);
    assert!(rx.try_recv().is_none());

    assert_eq!(handle.state(), ExecutionState::Failed);
}

#[tokio::test]
async fn resolve_error_is_reported_as_failed() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();

    spawn_execution(&emitter, "demo", async { Ok(Value::Null) }, |_| {
        Err(ExecutionError::Failed("post-processing".into()))
    });

    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Failed);
    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Ready);
}

async fn panicking_work() -> Result<Value, ExecutionError> {
    panic!("work panicked")
}

#[tokio::test]
async fn panicking_work_emits_failed_then_ready() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();

    let handle = spawn_execution(&emitter, "demo", panicking_work(), Ok);

    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Failed);
    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Ready);
    assert_eq!(handle.state(), ExecutionState::Failed);
}

#[tokio::test]
async fn panicking_resolve_still_emits_failed_then_ready() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();

    // A state read-back that panics must not swallow the terminal pair.
    let handle = spawn_execution(
        &emitter,
        "demo",
        async { Ok(Value::Null) },
        |_| -> Result<Value, ExecutionError> { panic!("read-back failed") },
    );

    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Failed);
    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Ready);
    assert!(rx.try_recv().is_none());
    assert_eq!(handle.state(), ExecutionState::Failed);
}

#[tokio::test]
async fn cancelled_work_emits_failed_then_ready() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();

    let handle = spawn_execution(
        &emitter,
        "demo",
        async {
            sleep(Duration::from_secs(60)).await;
            Ok(Value::Null)
        },
        Ok,
    );

    handle.cancel();

    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Failed);
    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Ready);
    assert_eq!(handle.state(), ExecutionState::Cancelled);
}

#[tokio::test]
async fn cancel_after_completion_is_a_noop() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();

    let handle = spawn_execution(&emitter, "demo", async { Ok(Value::Null) }, Ok);

    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Reply);
    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Ready);

    handle.cancel();
    handle.cancel();
    assert_eq!(handle.state(), ExecutionState::Completed);
    assert!(rx.try_recv().is_none());
}

#[tokio::test]
async fn slot_overwrite_orphans_but_does_not_silence_the_older_task() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();
    let slot = ExecutionSlot::new();

    // Older invocation, slow enough to be overtaken.
    let first = spawn_execution(
        &emitter,
        "demo",
        async {
            sleep(Duration::from_millis(100)).await;
            Ok(json!("first"))
        },
        Ok,
    );
    slot.store(first);

    let second = spawn_execution(&emitter, "demo", async { Ok(json!("second")) }, Ok);
    slot.store(second);

    // Aborting through the slot can only reach the second handle, which
    // may already be done; the first keeps running either way.
    slot.abort_current();

    let mut replies = Vec::new();
    let mut readies = 0;
    while readies < 2 {
        let signal = next_signal(&mut rx).await;
        match signal.kind {
            SignalKind::Reply => replies.push(signal.result.unwrap()),
            SignalKind::Failed => {}
            SignalKind::Ready => readies += 1,
            SignalKind::Begin => unreachable!("no begin emitted at this layer"),
        }
    }
    // The orphaned first task always completes and reports.
    assert!(replies.contains(&json!("first")));
}

#[tokio::test]
async fn slot_reflects_latest_execution_state() {
    let emitter = SignalEmitter::new();
    let mut rx = emitter.subscribe();
    let slot = ExecutionSlot::new();
    assert!(slot.current_state().is_none());

    let handle = spawn_execution(&emitter, "demo", async { Ok(Value::Null) }, Ok);
    slot.store(handle);

    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Reply);
    assert_eq!(next_signal(&mut rx).await.kind, SignalKind::Ready);
    assert_eq!(slot.current_state(), Some(ExecutionState::Completed));
}
