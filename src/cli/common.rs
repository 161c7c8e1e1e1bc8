use super::error::CliError;
use super::parser::Cli;
use crate::config::{
    default_oci_config_path, default_targets_path, expand_tilde, OciProfile, TargetMap,
};
use crate::provider::{OciClient, RequestSigner, ServiceEndpoints};
use tracing::{debug, info};

/// Everything a command needs to talk to OCI, built once per invocation.
#[derive(Debug)]
pub struct RunContext {
    pub profile: OciProfile,
    pub targets: TargetMap,
    pub region: String,
    pub client: OciClient,
}

impl RunContext {
    pub fn load(cli: &Cli, targets: TargetMap) -> Result<Self, CliError> {
        let config_path = match &cli.config_file {
            Some(path) => expand_tilde(path)?,
            None => default_oci_config_path()?,
        };
        let profile = OciProfile::load(&config_path, &cli.profile)?;
        profile.validate()?;
        info!(
            "Config validated (profile {}, {})",
            profile.name,
            config_path.display()
        );

        let region = cli
            .region
            .clone()
            .or_else(|| targets.region.clone())
            .unwrap_or_else(|| profile.region.clone());
        let endpoints = ServiceEndpoints::resolve(&region, &targets.endpoints)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        debug!(database = %endpoints.database, compute = %endpoints.compute, mysql = %endpoints.mysql, "Service endpoints");

        let signer = RequestSigner::from_key_file(
            profile.key_id(),
            &profile.key_file,
            profile.pass_phrase.as_deref(),
        )
        .map_err(|e| CliError::ConfigError(e.to_string()))?;
        let client = OciClient::new(signer, endpoints)
            .map_err(|e| CliError::OperationFailed(format!("Client initialization failed: {}", e)))?;
        info!("Client initialized for region {}", region);

        Ok(Self {
            profile,
            targets,
            region,
            client,
        })
    }

    /// Compartment to search: explicit flag, then target map, then the tenancy root.
    pub fn compartment_id(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.targets.compartment_id.clone())
            .unwrap_or_else(|| self.profile.tenancy.clone())
    }
}

/// Loads the target map. Without `--targets`, a missing default file means an empty map.
pub fn load_targets(cli: &Cli) -> Result<TargetMap, CliError> {
    if let Some(path) = &cli.targets_file {
        return Ok(TargetMap::load(&expand_tilde(path)?)?);
    }
    let path = default_targets_path()?;
    if path.exists() {
        Ok(TargetMap::load(&path)?)
    } else {
        debug!("No target map at {}, using an empty one", path.display());
        Ok(TargetMap::default())
    }
}

/// File stem of the running executable, used to name its log file.
pub fn program_stem() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "occctl".to_string())
}
