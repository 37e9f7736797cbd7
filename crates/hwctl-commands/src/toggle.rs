//! Two-state actuator toggle commands.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use hwctl_core::{
    is_active_state, spawn_execution, Actuator, CommandSignal, ExecutionSlot, SignalEmitter,
    SignalReceiver, StateReader, TargetState,
};

use crate::command::Command;
use crate::descriptor::{
    anneal_time_argument, ArgumentDescriptor, ArgumentSpec, CommandDescriptor, CommandKind, ANNEAL,
};

/// Reported state when the device cannot be read.
pub const UNKNOWN_STATE: &str = "UNKNOWN";

/// Flips a two-state device between its logical positions.
///
/// Each invocation reads the current state, picks the opposite target,
/// and requests the transition asynchronously; the reply carries the
/// state name read back after the move.
pub struct ToggleCommand {
    name: String,
    arguments: Mutex<Vec<ArgumentDescriptor>>,
    actuator: Arc<dyn Actuator>,
    reader: Option<Arc<dyn StateReader>>,
    emitter: SignalEmitter,
    slot: ExecutionSlot,
}

impl ToggleCommand {
    /// The reading capability is bound here, not probed later; pass
    /// `None` for devices that cannot report their state.
    pub fn new(
        descriptor: CommandDescriptor,
        actuator: Arc<dyn Actuator>,
        reader: Option<Arc<dyn StateReader>>,
    ) -> Self {
        let arguments = match descriptor.arguments {
            ArgumentSpec::List(entries) => entries,
            ArgumentSpec::JsonSchema(_) => Vec::new(),
        };
        Self {
            name: descriptor.name,
            arguments: Mutex::new(arguments),
            actuator,
            reader,
            emitter: SignalEmitter::new(),
            slot: ExecutionSlot::new(),
        }
    }

    /// Pick the transition target from the current state: an engaged
    /// device goes out, anything else (including an unreadable one)
    /// goes in.
    fn target(&self) -> TargetState {
        let engaged = self
            .reader
            .as_ref()
            .is_some_and(|reader| is_active_state(&reader.current_state()));
        if engaged {
            TargetState::Out
        } else {
            TargetState::In
        }
    }
}

impl Command for ToggleCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> CommandKind {
        CommandKind::TwoState
    }

    fn invoke(&self, _args: Vec<Value>) {
        self.emitter.emit(CommandSignal::begin(self.name.as_str()));

        let target = self.target();
        debug!(command = %self.name, target = target.as_str(), "toggling actuator");

        let actuator = self.actuator.clone();
        let reader = self.reader.clone();
        let handle = spawn_execution(
            &self.emitter,
            &self.name,
            async move {
                actuator.request_state(target).await?;
                Ok(Value::Null)
            },
            move |_| {
                let state = reader
                    .map(|reader| reader.current_state().to_lowercase())
                    .unwrap_or_else(|| UNKNOWN_STATE.to_string());
                Ok(Value::String(state))
            },
        );
        self.slot.store(handle);
    }

    fn abort(&self) {
        self.slot.abort_current();
    }

    /// Returns the stored descriptor list. For the command named
    /// `"Anneal"` the synthetic time descriptor is appended to the
    /// STORED list first, on every qualifying call; the mutation
    /// persists, unlike the procedure command's per-call copy. Both
    /// behaviors are contractual.
    fn arguments(&self) -> ArgumentSpec {
        let mut entries = self.arguments.lock();
        if self.name == ANNEAL {
            entries.push(anneal_time_argument());
        }
        ArgumentSpec::List(entries.clone())
    }

    /// Current state name, or `"UNKNOWN"` without the reading
    /// capability.
    fn value(&self) -> Option<String> {
        let state = self
            .reader
            .as_ref()
            .map(|reader| reader.current_state())
            .unwrap_or_else(|| UNKNOWN_STATE.to_string());
        Some(state)
    }

    fn subscribe(&self) -> SignalReceiver {
        self.emitter.subscribe()
    }
}
