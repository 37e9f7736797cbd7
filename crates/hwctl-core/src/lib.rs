//! Core abstractions for hwctl.
//!
//! This crate carries the machinery shared by every command variant:
//! the signal bus commands report through, the execution handle and
//! completion protocol, the actuator capability traits, and the error
//! taxonomy.

pub mod actuator;
pub mod error;
pub mod execution;
pub mod signal;

pub use actuator::{Actuator, StateReader, TargetState, is_active_state, ACTIVE_STATES};
pub use error::{ActuatorError, ExecutionError};
pub use execution::{spawn_execution, ExecutionHandle, ExecutionSlot, ExecutionState};
pub use signal::{
    CommandSignal, SignalEmitter, SignalKind, SignalReceiver, DEFAULT_SIGNAL_CAPACITY,
};
