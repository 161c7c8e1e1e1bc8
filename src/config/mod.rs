pub mod error;
pub mod oci;
pub mod targets;

pub use error::{ConfigError, ConfigResult};
pub use oci::OciProfile;
pub use targets::TargetMap;

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "DEFAULT";
pub const OCI_CONFIG_FILE: &str = "config";
pub const TARGETS_FILE: &str = "occctl-targets.yaml";

lazy_static! {
    /// `ocid1.<resource type>.<realm>.[region][.future use].<unique id>`
    static ref OCID_PATTERN: Regex =
        Regex::new(r"^ocid1\.[a-z0-9]+\.[a-z0-9]+\.[a-z0-9-]*(\.[a-z0-9-]*)?\.[a-z0-9]+$")
            .expect("OCID pattern is valid");
}

/// Whether `value` looks like an OCI resource identifier.
pub fn is_ocid(value: &str) -> bool {
    OCID_PATTERN.is_match(value)
}

fn home_dir() -> ConfigResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        ConfigError::UnsupportedPlatform(format!(
            "cannot determine the home directory on {}",
            std::env::consts::OS
        ))
    })
}

/// `~/.oci`, where the OCI tooling keeps its configuration.
pub fn oci_dir() -> ConfigResult<PathBuf> {
    Ok(home_dir()?.join(".oci"))
}

pub fn default_oci_config_path() -> ConfigResult<PathBuf> {
    Ok(oci_dir()?.join(OCI_CONFIG_FILE))
}

pub fn default_targets_path() -> ConfigResult<PathBuf> {
    Ok(oci_dir()?.join(TARGETS_FILE))
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> ConfigResult<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home_dir()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}
