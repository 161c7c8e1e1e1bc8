use crate::provider::{ActionReceipt, InstanceAction, LifecycleState, ProviderError};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Requested power state for batch commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LifecycleAction {
    Start,
    Stop,
}

impl LifecycleAction {
    pub fn instance_action(&self) -> InstanceAction {
        match self {
            LifecycleAction::Start => InstanceAction::Start,
            LifecycleAction::Stop => InstanceAction::SoftStop,
        }
    }

    /// States a MySQL DB system settles in once the action completes. The
    /// service reports a stopped DB system as `INACTIVE`.
    pub fn mysql_target_states(&self) -> &'static [&'static str] {
        match self {
            LifecycleAction::Start => &[LifecycleState::ACTIVE],
            LifecycleAction::Stop => &[LifecycleState::INACTIVE, LifecycleState::STOPPED],
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleAction::Start => f.write_str("start"),
            LifecycleAction::Stop => f.write_str("stop"),
        }
    }
}

/// Closed classification of command outcomes, used for exit codes and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    NotFound,
    NoOp,
    Service,
    Timeout,
    Config,
    Platform,
    Unexpected,
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Nothing to do: {0}")]
    NoOp(String),

    #[error("'{0}' is not an OCID")]
    InvalidTarget(String),

    #[error("OCI service error: {0}")]
    Service(#[from] ProviderError),

    #[error("Resource {target} entered state {state} while waiting for {expected}")]
    UnexpectedState {
        target: String,
        expected: String,
        state: LifecycleState,
    },

    #[error("Timed out after {waited:?} waiting for {target} to reach {expected} (last state: {last})")]
    Timeout {
        target: String,
        expected: String,
        last: String,
        waited: Duration,
    },

    #[error("Failed to read resource list {}: {source}", path.display())]
    ResourceList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LifecycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::NotFound(_) => ErrorKind::NotFound,
            LifecycleError::NoOp(_) => ErrorKind::NoOp,
            LifecycleError::InvalidTarget(_) => ErrorKind::Usage,
            LifecycleError::Service(e) if e.is_not_found() => ErrorKind::NotFound,
            LifecycleError::Service(e) if e.is_no_change() => ErrorKind::NoOp,
            LifecycleError::Service(ProviderError::Service { .. }) => ErrorKind::Service,
            LifecycleError::Service(_) => ErrorKind::Unexpected,
            LifecycleError::UnexpectedState { .. } => ErrorKind::Service,
            LifecycleError::Timeout { .. } => ErrorKind::Timeout,
            LifecycleError::ResourceList { .. } => ErrorKind::Usage,
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Result of a scale request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// The update was accepted; scaling continues on the service side.
    Initiated { previous: Option<u32>, requested: u32 },
    /// The database already runs with the requested ECPU count.
    AlreadyAtScale { current: u32 },
}

/// What happened to one target of a batch command.
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: String,
    pub result: LifecycleResult<String>,
}

impl TargetOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Progress notifications emitted while commands run.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    TargetsLoaded(Vec<String>),
    CurrentCapacity {
        target: String,
        ecpus: u32,
    },
    CurrentState {
        target: String,
        state: LifecycleState,
    },
    ScaleRequested {
        target: String,
        ecpus: u32,
    },
    ActionRequested {
        target: String,
        action: String,
    },
    ActionAccepted {
        target: String,
        receipt: ActionReceipt,
    },
    WaitAttempt {
        target: String,
        expected: String,
        attempt: u32,
        state: LifecycleState,
    },
    TargetCompleted {
        target: String,
        message: String,
    },
    TargetSkipped {
        target: String,
        reason: String,
    },
    TargetFailed {
        target: String,
        error: String,
    },
}

impl LifecycleEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, LifecycleEvent::TargetFailed { .. })
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::TargetsLoaded(targets) => write!(f, "{}", targets.join(", ")),
            LifecycleEvent::CurrentCapacity { ecpus, .. } => write!(f, "Current ECPU: {}", ecpus),
            LifecycleEvent::CurrentState { target, state } => {
                write!(f, "Current state of {}: {}", target, state)
            }
            LifecycleEvent::ScaleRequested { target, ecpus } => {
                write!(f, "Scaling database {} to {} ECPU ...", target, ecpus)
            }
            LifecycleEvent::ActionRequested { target, action } => {
                write!(f, "Sending {} to {} ...", action, target)
            }
            LifecycleEvent::ActionAccepted { target, receipt } => {
                write!(f, "Accepted for {} ({})", target, receipt)
            }
            LifecycleEvent::WaitAttempt {
                target,
                expected,
                attempt,
                state,
            } => write!(
                f,
                "Waiting for {} to reach {} (attempt {}, state {})",
                target, expected, attempt, state
            ),
            LifecycleEvent::TargetCompleted { message, .. } => f.write_str(message),
            LifecycleEvent::TargetSkipped { target, reason } => {
                write!(f, "Skipped {}: {}", target, reason)
            }
            LifecycleEvent::TargetFailed { target, error } => {
                write!(f, "Failed {}: {}", target, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let not_found = LifecycleError::Service(ProviderError::service(404, "NotFound", "gone"));
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let conflict =
            LifecycleError::Service(ProviderError::service(409, "IncorrectState", "busy"));
        assert_eq!(conflict.kind(), ErrorKind::Service);

        let signing = LifecycleError::Service(ProviderError::Signing("bad".into()));
        assert_eq!(signing.kind(), ErrorKind::Unexpected);

        let timeout = LifecycleError::Timeout {
            target: "db".into(),
            expected: "ACTIVE".into(),
            last: "UPDATING".into(),
            waited: Duration::from_secs(5),
        };
        assert_eq!(timeout.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(LifecycleAction::Stop.instance_action(), InstanceAction::SoftStop);
        assert_eq!(LifecycleAction::Start.instance_action().as_str(), "START");
        assert!(LifecycleAction::Stop
            .mysql_target_states()
            .contains(&LifecycleState::INACTIVE));
    }
}
