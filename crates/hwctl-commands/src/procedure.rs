//! Procedure commands: arbitrary callables run asynchronously.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use hwctl_core::{
    spawn_execution, CommandSignal, ExecutionError, ExecutionSlot, SignalEmitter, SignalReceiver,
};

use crate::command::Command;
use crate::descriptor::{anneal_time_argument, ArgumentSpec, CommandDescriptor, CommandKind, ANNEAL};

/// The callable a procedure command wraps.
#[async_trait]
pub trait Procedure: Send + Sync {
    async fn run(&self, args: Vec<Value>) -> Result<Value, ExecutionError>;
}

/// Runs an arbitrary procedure asynchronously, reporting through
/// signals.
pub struct ProcedureCommand {
    name: String,
    arguments: Mutex<ArgumentSpec>,
    procedure: Arc<dyn Procedure>,
    emitter: SignalEmitter,
    slot: ExecutionSlot,
}

impl ProcedureCommand {
    pub fn new(descriptor: CommandDescriptor, procedure: Arc<dyn Procedure>) -> Self {
        Self {
            name: descriptor.name,
            arguments: Mutex::new(descriptor.arguments),
            procedure,
            emitter: SignalEmitter::new(),
            slot: ExecutionSlot::new(),
        }
    }

    /// Replace the argument metadata with an opaque JSON schema.
    pub fn set_argument_json_schema(&self, schema: Value) {
        *self.arguments.lock() = ArgumentSpec::JsonSchema(schema);
    }
}

impl Command for ProcedureCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> CommandKind {
        CommandKind::Procedure
    }

    fn invoke(&self, args: Vec<Value>) {
        debug!(command = %self.name, "invoking procedure");
        self.emitter.emit(CommandSignal::begin(self.name.as_str()));

        let procedure = self.procedure.clone();
        let handle = spawn_execution(
            &self.emitter,
            &self.name,
            async move { procedure.run(args).await },
            Ok,
        );
        self.slot.store(handle);
    }

    fn abort(&self) {
        self.slot.abort_current();
    }

    /// Returns a copy of the argument metadata. For the command named
    /// `"Anneal"` the copy gains the synthetic time descriptor; the
    /// stored metadata is left untouched. Contrast with
    /// [`crate::toggle::ToggleCommand::arguments`], which appends
    /// persistently.
    fn arguments(&self) -> ArgumentSpec {
        let mut spec = self.arguments.lock().clone();
        if self.name == ANNEAL {
            if let ArgumentSpec::List(entries) = &mut spec {
                entries.push(anneal_time_argument());
            }
        }
        spec
    }

    /// Procedures have no readable state.
    fn value(&self) -> Option<String> {
        None
    }

    fn subscribe(&self) -> SignalReceiver {
        self.emitter.subscribe()
    }
}
