//! Process-wide fault channel for create failures.
//!
//! A failed create is answered with 400 and then, under [`CreateFailurePolicy::Escalate`],
//! reported here; the server loop stops on the first reported fault.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CreateFailurePolicy {
    /// Answer the client, then stop the server.
    #[default]
    Escalate,
    /// Answer the client, log, keep serving.
    Continue,
}

impl FromStr for CreateFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "escalate" => Ok(CreateFailurePolicy::Escalate),
            "continue" => Ok(CreateFailurePolicy::Continue),
            other => Err(ConfigError::Validation(format!(
                "ON_CREATE_FAILURE: expected 'escalate' or 'continue', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Fault {
    pub schema: String,
    pub message: String,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "create {} failed: {}", self.schema, self.message)
    }
}

#[derive(Clone, Debug)]
pub struct FaultReporter {
    policy: CreateFailurePolicy,
    tx: mpsc::UnboundedSender<Fault>,
}

pub struct FaultReceiver {
    rx: mpsc::UnboundedReceiver<Fault>,
}

pub fn fault_channel(policy: CreateFailurePolicy) -> (FaultReporter, FaultReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FaultReporter { policy, tx }, FaultReceiver { rx })
}

impl FaultReporter {
    pub fn report(&self, fault: Fault) {
        match self.policy {
            CreateFailurePolicy::Escalate => {
                tracing::error!(schema = %fault.schema, message = %fault.message, "create failed, escalating");
                // Nobody listening means no server loop to stop.
                let _ = self.tx.send(fault);
            }
            CreateFailurePolicy::Continue => {
                tracing::warn!(schema = %fault.schema, message = %fault.message, "create failed");
            }
        }
    }
}

impl FaultReceiver {
    /// Next escalated fault; `None` once every reporter is dropped.
    pub async fn recv(&mut self) -> Option<Fault> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Fault> {
        self.rx.try_recv().ok()
    }
}
