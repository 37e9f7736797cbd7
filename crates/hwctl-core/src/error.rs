//! Error types shared across the workspace.

use thiserror::Error;

/// Actuator-side failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActuatorError {
    /// The device rejected or failed a transition request.
    #[error("actuator transition failed: {0}")]
    Transition(String),

    /// Communication with the device broke down.
    #[error("actuator communication error: {0}")]
    Communication(String),
}

/// Outcome errors for one scheduled execution.
///
/// Both variants are terminal inside the completion watcher: they are
/// converted to a `failed` signal and never reach the `invoke()`
/// caller, who has already returned by the time they occur.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The scheduled work raised an error or panicked.
    #[error("command execution failed: {0}")]
    Failed(String),

    /// The task was terminated through `cancel()` before completing.
    #[error("command execution was cancelled")]
    Cancelled,

    /// An actuator call inside the work failed.
    #[error(transparent)]
    Actuator(#[from] ActuatorError),
}
