pub mod service;
pub mod targets;
pub mod types;
pub mod wait;

pub use service::LifecycleRunner;
pub use targets::ResourceList;
pub use types::{
    ErrorKind, LifecycleAction, LifecycleError, LifecycleEvent, LifecycleResult, ScaleOutcome,
    TargetOutcome,
};
pub use wait::WaitPolicy;
