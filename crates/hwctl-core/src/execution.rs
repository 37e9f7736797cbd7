//! Execution handles and the shared completion protocol.
//!
//! Both command variants funnel their scheduled work through
//! [`spawn_execution`]: the work runs as its own tokio task, and a
//! watcher task bound to that specific task (not to the command's slot)
//! reports the outcome exactly once as `reply` or `failed`, followed
//! unconditionally by `ready`.

use std::future::Future;
use std::panic;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::error::ExecutionError;
use crate::signal::{CommandSignal, SignalEmitter};

/// Lifecycle of one scheduled execution. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExecutionState {
    /// Scheduled but not yet polled.
    Pending = 0,
    /// The work has started running.
    Running = 1,
    /// Finished normally; `reply` was emitted.
    Completed = 2,
    /// Raised or panicked; `failed` was emitted.
    Failed = 3,
    /// Terminated via `cancel()`; `failed` was emitted.
    Cancelled = 4,
}

impl ExecutionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Pending,
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Failed,
            _ => Self::Cancelled,
        }
    }
}

/// State shared between the handle, the work task, and the watcher.
#[derive(Clone, Default)]
struct StateCell(Arc<AtomicU8>);

impl StateCell {
    fn set(&self, state: ExecutionState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }

    fn get(&self) -> ExecutionState {
        ExecutionState::from_u8(self.0.load(Ordering::SeqCst))
    }
}

/// Handle to one in-flight execution.
///
/// One handle exists per invocation and is never reused. Dropping a
/// handle detaches it: the task keeps running and still reports
/// completion through its watcher.
pub struct ExecutionHandle {
    abort: AbortHandle,
    state: StateCell,
}

impl ExecutionHandle {
    /// Whether the execution has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.state.get().is_terminal()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExecutionState {
        self.state.get()
    }

    /// Request termination of the underlying task.
    ///
    /// Idempotent, non-blocking, and a no-op once the execution is
    /// terminal. Emits nothing itself: the watcher later reports the
    /// cancellation as `failed` + `ready`. This is a check-then-act
    /// request; if normal completion races it, either outcome may win,
    /// but exactly one terminal signal pair is emitted either way.
    pub fn cancel(&self) {
        if !self.is_finished() {
            self.abort.abort();
        }
    }
}

/// Schedule `work` and bind a completion watcher to it.
///
/// `resolve` post-processes the work's output into the reply payload
/// (the toggle command re-reads device state here; procedures pass the
/// output through). The watcher waits only on its own task, emits
/// exactly one of `reply`/`failed`, and arms `ready` with a scope guard
/// so it fires even if result resolution or the terminal emission
/// itself panics; a panicking `resolve` counts as a failure.
pub fn spawn_execution<F, R>(
    emitter: &SignalEmitter,
    name: &str,
    work: F,
    resolve: R,
) -> ExecutionHandle
where
    F: Future<Output = Result<Value, ExecutionError>> + Send + 'static,
    R: FnOnce(Value) -> Result<Value, ExecutionError> + Send + 'static,
{
    let state = StateCell::default();

    let run_state = state.clone();
    let task = tokio::spawn(async move {
        run_state.set(ExecutionState::Running);
        work.await
    });

    let handle = ExecutionHandle {
        abort: task.abort_handle(),
        state: state.clone(),
    };

    let emitter = emitter.clone();
    let name = name.to_string();
    tokio::spawn(async move {
        let outcome = match task.await {
            Ok(result) => result,
            Err(join) if join.is_cancelled() => Err(ExecutionError::Cancelled),
            Err(join) => Err(ExecutionError::Failed(join.to_string())),
        };

        // Armed before result resolution: `ready` must fire even if the
        // resolve step or a terminal emission unwinds.
        let ready = scopeguard::guard((emitter.clone(), name.clone()), |(emitter, name)| {
            emitter.emit(CommandSignal::ready(name));
        });

        let outcome = outcome.and_then(|value| {
            panic::catch_unwind(panic::AssertUnwindSafe(|| resolve(value))).unwrap_or_else(|_| {
                Err(ExecutionError::Failed("result resolution panicked".into()))
            })
        });
        match outcome {
            Ok(value) => {
                state.set(ExecutionState::Completed);
                debug!(command = %name, "command completed");
                emitter.emit(CommandSignal::reply(name.as_str(), value));
            }
            Err(ExecutionError::Cancelled) => {
                state.set(ExecutionState::Cancelled);
                warn!(command = %name, "command cancelled");
                emitter.emit(CommandSignal::failed(name.as_str()));
            }
            Err(err) => {
                state.set(ExecutionState::Failed);
                warn!(command = %name, error = %err, "command failed");
                emitter.emit(CommandSignal::failed(name.as_str()));
            }
        }
        drop(ready);
    });

    handle
}

/// Single overwritable slot holding the most recently started execution.
///
/// Overlapping invocations overwrite the slot: the superseded task
/// keeps running and still emits its own completion signals, but can no
/// longer be aborted through the command. Accepted hazard; callers that
/// need exclusivity must serialize invocations themselves.
#[derive(Default)]
pub struct ExecutionSlot {
    current: Mutex<Option<ExecutionHandle>>,
}

impl ExecutionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slotted handle with the latest one.
    pub fn store(&self, handle: ExecutionHandle) {
        *self.current.lock() = Some(handle);
    }

    /// Request cancellation of the slotted execution, if any.
    ///
    /// Silent no-op with an empty slot or a finished execution; never
    /// errors.
    pub fn abort_current(&self) {
        if let Some(handle) = self.current.lock().as_ref() {
            handle.cancel();
        }
    }

    /// State of the slotted execution, if any.
    pub fn current_state(&self) -> Option<ExecutionState> {
        self.current.lock().as_ref().map(ExecutionHandle::state)
    }
}
