//! Signal bus for command lifecycle notifications.
//!
//! Each command owns a [`SignalEmitter`]. Observers subscribe
//! independently of invocation; zero, one, or many subscribers each see
//! every emission in emission order. Outcomes are only ever reported
//! this way, never as return values from `invoke()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default buffer capacity for a command's signal channel.
pub const DEFAULT_SIGNAL_CAPACITY: usize = 64;

/// Lifecycle signal kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignalKind {
    /// Invocation accepted; work is about to be scheduled.
    Begin,
    /// Work finished normally; carries the result.
    Reply,
    /// Work raised an error, panicked, or was cancelled.
    Failed,
    /// Terminal marker, always emitted last for an invocation.
    Ready,
}

/// One lifecycle notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSignal {
    /// Unique signal id.
    pub id: Uuid,
    /// Signal kind.
    pub kind: SignalKind,
    /// Name of the command that emitted the signal.
    pub command: String,
    /// Result payload; present only on `Reply`.
    pub result: Option<Value>,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
}

impl CommandSignal {
    fn new(kind: SignalKind, command: impl Into<String>, result: Option<Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            command: command.into(),
            result,
            timestamp: Utc::now(),
        }
    }

    /// Invocation accepted.
    pub fn begin(command: impl Into<String>) -> Self {
        Self::new(SignalKind::Begin, command, None)
    }

    /// Work completed with `result`.
    pub fn reply(command: impl Into<String>, result: Value) -> Self {
        Self::new(SignalKind::Reply, command, Some(result))
    }

    /// Work failed or was cancelled.
    pub fn failed(command: impl Into<String>) -> Self {
        Self::new(SignalKind::Failed, command, None)
    }

    /// Command is done with this invocation.
    pub fn ready(command: impl Into<String>) -> Self {
        Self::new(SignalKind::Ready, command, None)
    }
}

/// Dispatch point for one command's signals.
#[derive(Clone)]
pub struct SignalEmitter {
    tx: broadcast::Sender<CommandSignal>,
}

impl SignalEmitter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SIGNAL_CAPACITY)
    }

    /// The capacity bounds how many signals are buffered for slow
    /// subscribers.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit a signal to all current subscribers.
    ///
    /// Synchronous and infallible: with no subscribers the signal is
    /// discarded.
    pub fn emit(&self, signal: CommandSignal) {
        let _ = self.tx.send(signal);
    }

    /// Register an observer.
    pub fn subscribe(&self) -> SignalReceiver {
        SignalReceiver {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SignalEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver half of a command's signal channel.
pub struct SignalReceiver {
    rx: broadcast::Receiver<CommandSignal>,
}

impl SignalReceiver {
    /// Receive the next signal.
    ///
    /// Returns `None` once the emitting command is gone. A lagged
    /// receiver skips to the oldest retained signal instead of erroring.
    pub async fn recv(&mut self) -> Option<CommandSignal> {
        loop {
            match self.rx.recv().await {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive without blocking, if a signal is pending.
    pub fn try_recv(&mut self) -> Option<CommandSignal> {
        self.rx.try_recv().ok()
    }
}
