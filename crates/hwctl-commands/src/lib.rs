//! Operator-triggerable commands over controlled devices.
//!
//! Two command variants share one execution core: [`ProcedureCommand`]
//! runs an arbitrary callable, [`ToggleCommand`] flips a two-state
//! actuator. Invocation is fire-and-forget; lifecycle and outcome
//! surface as `begin` / `reply` / `failed` / `ready` signals on the
//! command's bus, never as return values.
//!
//! Overlapping invocations of the same command are deliberately not
//! serialized; see [`hwctl_core::ExecutionSlot`] for the orphaning
//! contract.

pub mod command;
pub mod config;
pub mod descriptor;
pub mod procedure;
pub mod registry;
pub mod toggle;

pub use command::Command;
pub use config::{build_registry, CommandBindings, CommandConfig, CommandSetConfig, ConfigError};
pub use descriptor::{
    anneal_time_argument, ArgumentDescriptor, ArgumentSpec, ArgumentType, CommandDescriptor,
    CommandKind, ANNEAL,
};
pub use procedure::{Procedure, ProcedureCommand};
pub use registry::CommandRegistry;
pub use toggle::{ToggleCommand, UNKNOWN_STATE};
