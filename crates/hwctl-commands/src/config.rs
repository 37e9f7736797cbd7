//! Static configuration for building the command set at startup.
//!
//! The configuration describes command identities and argument
//! metadata; the runtime collaborators (procedures, actuators) are
//! bound by name when the registry is built.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use hwctl_core::{Actuator, StateReader};

use crate::command::Command;
use crate::descriptor::{ArgumentDescriptor, ArgumentSpec, CommandDescriptor, CommandKind};
use crate::procedure::{Procedure, ProcedureCommand};
use crate::registry::CommandRegistry;
use crate::toggle::ToggleCommand;

/// Errors raised while building the registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured procedure command has no callable bound to it.
    #[error("no procedure bound for command: {0}")]
    UnboundProcedure(String),

    /// A configured two-state command has no actuator bound to it.
    #[error("no actuator bound for command: {0}")]
    UnboundActuator(String),
}

/// One command entry in the static configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    pub name: String,
    pub kind: CommandKind,
    #[serde(default)]
    pub arguments: Vec<ArgumentDescriptor>,
}

/// The full command set loaded at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandSetConfig {
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

/// Runtime collaborators, bound to configured commands by name.
#[derive(Default)]
pub struct CommandBindings {
    procedures: HashMap<String, Arc<dyn Procedure>>,
    actuators: HashMap<String, (Arc<dyn Actuator>, Option<Arc<dyn StateReader>>)>,
}

impl CommandBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_procedure(&mut self, name: impl Into<String>, procedure: Arc<dyn Procedure>) {
        self.procedures.insert(name.into(), procedure);
    }

    pub fn bind_actuator(
        &mut self,
        name: impl Into<String>,
        actuator: Arc<dyn Actuator>,
        reader: Option<Arc<dyn StateReader>>,
    ) {
        self.actuators.insert(name.into(), (actuator, reader));
    }
}

/// Build the registry from static configuration plus runtime bindings.
pub fn build_registry(
    config: &CommandSetConfig,
    bindings: &CommandBindings,
) -> Result<CommandRegistry, ConfigError> {
    let mut registry = CommandRegistry::new();

    for entry in &config.commands {
        let descriptor = CommandDescriptor {
            name: entry.name.clone(),
            kind: entry.kind,
            arguments: ArgumentSpec::List(entry.arguments.clone()),
        };

        let command: Arc<dyn Command> = match entry.kind {
            CommandKind::Procedure => {
                let procedure = bindings
                    .procedures
                    .get(&entry.name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnboundProcedure(entry.name.clone()))?;
                Arc::new(ProcedureCommand::new(descriptor, procedure))
            }
            CommandKind::TwoState => {
                let (actuator, reader) = bindings
                    .actuators
                    .get(&entry.name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnboundActuator(entry.name.clone()))?;
                Arc::new(ToggleCommand::new(descriptor, actuator, reader))
            }
        };
        registry.register(command);
    }

    info!(commands = registry.len(), "command registry built");
    Ok(registry)
}
