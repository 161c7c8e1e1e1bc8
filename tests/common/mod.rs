#![allow(dead_code)]

use occctl::provider::{EndpointOverrides, OciClient, RequestSigner, ServiceEndpoints};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

pub const USER_OCID: &str = "ocid1.user.oc1..aaaatestuser";
pub const TENANCY_OCID: &str = "ocid1.tenancy.oc1..aaaatesttenancy";
pub const COMPARTMENT_OCID: &str = "ocid1.compartment.oc1..aaaatestcompartment";
/// MD5 fingerprint of the public half of `tests/fixtures/test_api_key.pem`.
pub const FINGERPRINT: &str = "f9:09:1c:85:ef:67:89:85:85:aa:a4:3d:3d:62:68:1f";
pub const DEV_ADB_OCID: &str = "ocid1.autonomousdatabase.oc1.iad.aaaadevadb";
pub const PROD_ADB_OCID: &str = "ocid1.autonomousdatabase.oc1.iad.aaaaprodadb";

pub fn fixture_key_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("test_api_key.pem")
}

pub fn key_id() -> String {
    format!("{}/{}/{}", TENANCY_OCID, USER_OCID, FINGERPRINT)
}

/// Signed client pointed at a mock server for all three services.
pub fn client_for(server_uri: &str) -> OciClient {
    let pem = std::fs::read_to_string(fixture_key_path()).expect("read test key");
    let signer = RequestSigner::from_pem(key_id(), &pem).expect("load test key");
    let overrides = EndpointOverrides {
        database: Some(server_uri.to_string()),
        compute: Some(server_uri.to_string()),
        mysql: Some(server_uri.to_string()),
    };
    let endpoints =
        ServiceEndpoints::resolve("us-ashburn-1", &overrides).expect("resolve endpoints");
    OciClient::new(signer, endpoints).expect("build client")
}

/// Temporary home with an OCI config, a target map and list files, for
/// running the `occctl` binary against a mock server.
pub struct TestEnv {
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub targets_path: PathBuf,
}

impl TestEnv {
    pub fn new(server_uri: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = dir.path().join("oci_config");
        let targets_path = dir.path().join("targets.yaml");

        let config = format!(
            "[DEFAULT]\nuser={}\nfingerprint={}\ntenancy={}\nregion=us-ashburn-1\nkey_file={}\n",
            USER_OCID,
            FINGERPRINT,
            TENANCY_OCID,
            fixture_key_path().display()
        );
        std::fs::write(&config_path, config).expect("write OCI config");

        let targets = format!(
            "compartment_id: {compartment}\n\
             autonomous_databases:\n  MY_DEV_ADB: {dev}\n  MY_PROD_ADB: {prod}\n\
             endpoints:\n  database: {uri}\n  compute: {uri}\n  mysql: {uri}\n",
            compartment = COMPARTMENT_OCID,
            dev = DEV_ADB_OCID,
            prod = PROD_ADB_OCID,
            uri = server_uri
        );
        std::fs::write(&targets_path, targets).expect("write target map");

        Self {
            dir,
            config_path,
            targets_path,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_list(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write list file");
        path
    }

    /// `occctl` with this environment's config and target map and HOME set to
    /// the temp dir, so default log paths stay inside it.
    pub fn occctl(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_occctl"));
        cmd.arg("--config")
            .arg(&self.config_path)
            .arg("--targets")
            .arg(&self.targets_path)
            .arg("--no-progress")
            .env("HOME", self.dir.path())
            .env_remove("OCCCTL_LOG")
            .kill_on_drop(true);
        cmd
    }
}

pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub async fn run(mut cmd: Command) -> RunOutput {
    let output = tokio::time::timeout(Duration::from_secs(60), cmd.output())
        .await
        .expect("occctl timed out")
        .expect("Failed to run occctl");
    RunOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
