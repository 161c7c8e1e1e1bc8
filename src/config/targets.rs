use super::error::{ConfigError, ConfigResult};
use super::is_ocid;
use crate::provider::EndpointOverrides;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Site-specific lookup table: Autonomous Database names to OCIDs plus the
/// compartment, region and endpoint defaults for this installation.
///
/// ```yaml
/// compartment_id: ocid1.compartment.oc1..aaaa
/// region: us-ashburn-1
/// autonomous_databases:
///   MY_DEV_ADB: ocid1.autonomousdatabase.oc1.iad.aaaa
///   MY_PROD_ADB: ocid1.autonomousdatabase.oc1.iad.bbbb
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetMap {
    pub compartment_id: Option<String>,
    pub region: Option<String>,
    pub autonomous_databases: BTreeMap<String, String>,
    pub endpoints: EndpointOverrides,
}

impl TargetMap {
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let map: TargetMap = serde_yaml::from_str(content)?;
        map.validate()?;
        Ok(map)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file deserializes to `null`.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::parse(&content)
    }

    fn validate(&self) -> ConfigResult<()> {
        for (name, id) in &self.autonomous_databases {
            if !is_ocid(id) {
                return Err(ConfigError::invalid(
                    format!("autonomous_databases.{}", name),
                    format!("'{}' is not an OCID", id),
                ));
            }
        }
        if let Some(compartment) = &self.compartment_id {
            if !is_ocid(compartment) {
                return Err(ConfigError::invalid(
                    "compartment_id",
                    format!("'{}' is not an OCID", compartment),
                ));
            }
        }
        Ok(())
    }

    /// Resolves a database name to its OCID. A literal OCID resolves to itself.
    pub fn resolve_database(&self, name: &str) -> Option<String> {
        if is_ocid(name) {
            return Some(name.to_string());
        }
        self.autonomous_databases.get(name).cloned()
    }

    pub fn database_names(&self) -> Vec<String> {
        self.autonomous_databases.keys().cloned().collect()
    }
}
