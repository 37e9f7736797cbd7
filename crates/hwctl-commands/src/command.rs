//! The object-safe command surface shared by both variants.

use serde_json::Value;

use hwctl_core::SignalReceiver;

use crate::descriptor::{ArgumentSpec, CommandKind};

/// A named action invokable asynchronously.
///
/// `invoke` never blocks and reports nothing directly: lifecycle and
/// outcome surface through the command's signals. Overlapping
/// invocations of the same command are not serialized; the most recent
/// one owns the abort slot and older ones run to completion orphaned
/// (see [`hwctl_core::ExecutionSlot`]).
pub trait Command: Send + Sync {
    /// Stable name used for dispatch.
    fn name(&self) -> &str;

    fn kind(&self) -> CommandKind;

    /// Emit `begin`, schedule the work, return immediately.
    fn invoke(&self, args: Vec<Value>);

    /// Best-effort cancellation of the most recently started
    /// invocation. Never errors; silent no-op when nothing is in
    /// flight or the execution already finished.
    fn abort(&self);

    /// Argument metadata. See each variant for the `"Anneal"`
    /// injection semantics.
    fn arguments(&self) -> ArgumentSpec;

    /// Current readable state, if the command has one.
    fn value(&self) -> Option<String>;

    /// Register an observer; every subscriber sees every emission in
    /// order.
    fn subscribe(&self) -> SignalReceiver;
}
