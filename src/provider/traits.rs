use async_trait::async_trait;

use super::error::ProviderResult;
use super::types::{
    ActionReceipt, AutonomousDatabase, DbSystem, Instance, InstanceAction, ShutdownType,
};

/// Autonomous Database operations (OCI Database service).
#[async_trait]
pub trait DatabaseService: Send + Sync {
    async fn get_autonomous_database(&self, id: &str) -> ProviderResult<AutonomousDatabase>;

    /// Request a new ECPU count. Scaling continues asynchronously on the service side.
    async fn update_compute_count(
        &self,
        id: &str,
        compute_count: u32,
    ) -> ProviderResult<AutonomousDatabase>;
}

/// Compute instance operations (OCI Core service).
#[async_trait]
pub trait ComputeService: Send + Sync {
    /// All instances of a compartment, every page.
    async fn list_instances(&self, compartment_id: &str) -> ProviderResult<Vec<Instance>>;

    async fn instance_action(&self, id: &str, action: InstanceAction) -> ProviderResult<Instance>;
}

/// MySQL HeatWave DB system operations.
#[async_trait]
pub trait MySqlService: Send + Sync {
    async fn get_db_system(&self, id: &str) -> ProviderResult<DbSystem>;

    async fn start_db_system(&self, id: &str) -> ProviderResult<ActionReceipt>;

    async fn stop_db_system(
        &self,
        id: &str,
        shutdown_type: ShutdownType,
    ) -> ProviderResult<ActionReceipt>;
}
