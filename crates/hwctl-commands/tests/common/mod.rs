//! Shared fixtures for command integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::{sleep, timeout};

use hwctl_commands::Procedure;
use hwctl_core::{
    Actuator, ActuatorError, CommandSignal, ExecutionError, SignalReceiver, StateReader,
    TargetState,
};

/// Two-state device double: records transition requests and mirrors the
/// last accepted target as its state.
pub struct MockActuator {
    state: Mutex<String>,
    requests: Mutex<Vec<TargetState>>,
    delay: Option<Duration>,
    fail: bool,
}

impl MockActuator {
    pub fn new(state: &str) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state.to_string()),
            requests: Mutex::new(Vec::new()),
            delay: None,
            fail: false,
        })
    }

    /// A device whose transition takes `delay` to complete.
    pub fn slow(state: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state.to_string()),
            requests: Mutex::new(Vec::new()),
            delay: Some(delay),
            fail: false,
        })
    }

    /// A device that rejects every transition.
    pub fn failing(state: &str) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state.to_string()),
            requests: Mutex::new(Vec::new()),
            delay: None,
            fail: true,
        })
    }

    pub fn requested(&self) -> Vec<TargetState> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Actuator for MockActuator {
    async fn request_state(&self, target: TargetState) -> Result<(), ActuatorError> {
        self.requests.lock().unwrap().push(target);
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        if self.fail {
            return Err(ActuatorError::Transition("movement blocked".into()));
        }
        *self.state.lock().unwrap() = target.as_str().to_string();
        Ok(())
    }
}

impl StateReader for MockActuator {
    fn current_state(&self) -> String {
        self.state.lock().unwrap().clone()
    }
}

/// Procedure returning its arguments as an array.
pub struct EchoProcedure;

#[async_trait]
impl Procedure for EchoProcedure {
    async fn run(&self, args: Vec<Value>) -> Result<Value, ExecutionError> {
        Ok(Value::Array(args))
    }
}

/// Procedure that always raises.
pub struct FailingProcedure;

#[async_trait]
impl Procedure for FailingProcedure {
    async fn run(&self, _args: Vec<Value>) -> Result<Value, ExecutionError> {
        Err(ExecutionError::Failed("procedure raised".into()))
    }
}

/// Procedure that takes `delay` before finishing.
pub struct SlowProcedure {
    pub delay: Duration,
}

#[async_trait]
impl Procedure for SlowProcedure {
    async fn run(&self, _args: Vec<Value>) -> Result<Value, ExecutionError> {
        sleep(self.delay).await;
        Ok(json!("done"))
    }
}

/// Receive the next signal, failing the test after two seconds.
pub async fn next_signal(rx: &mut SignalReceiver) -> CommandSignal {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for signal")
        .expect("signal channel closed")
}
