//! Actuator capability traits.
//!
//! An actuator is an external two-state device. The transition request
//! is the mandatory capability; state reading is optional and supplied
//! separately at construction time, so absence is visible in the type
//! rather than probed at runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ActuatorError;

/// State names signifying the device is currently engaged.
pub const ACTIVE_STATES: [&str; 3] = ["in", "on", "enabled"];

/// Case-insensitive membership test against [`ACTIVE_STATES`].
pub fn is_active_state(name: &str) -> bool {
    let name = name.to_lowercase();
    ACTIVE_STATES.iter().any(|active| *active == name)
}

/// Canonical transition targets for a two-state device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetState {
    In,
    Out,
}

impl TargetState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// A two-state device accepting transition requests.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Request a transition to `target`, resolving once the device
    /// acknowledges the move.
    async fn request_state(&self, target: TargetState) -> Result<(), ActuatorError>;
}

/// Optional capability: a device that can report its current logical
/// state. Commands fall back to `"UNKNOWN"` when it is absent.
pub trait StateReader: Send + Sync {
    /// Name of the current logical state, e.g. `"in"` or `"OUT"`.
    fn current_state(&self) -> String;
}
