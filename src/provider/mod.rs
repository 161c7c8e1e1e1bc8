pub mod client;
pub mod endpoints;
pub mod error;
pub mod signer;
pub mod traits;
pub mod types;

pub use client::OciClient;
pub use endpoints::{EndpointOverrides, ServiceEndpoints};
pub use error::{ProviderError, ProviderResult};
pub use signer::RequestSigner;
pub use traits::{ComputeService, DatabaseService, MySqlService};
pub use types::{
    ActionReceipt, AutonomousDatabase, DbSystem, Instance, InstanceAction, LifecycleState,
    ShutdownType,
};
