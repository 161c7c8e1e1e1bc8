use std::env;
use std::process::Command;

/// Stamps `OCCCTL_BUILD_VERSION` with the package version, plus the short git
/// hash on release builds (or when `BUILD_VERSION_WITH_HASH` is set).
fn main() {
    let profile = env::var("PROFILE").unwrap_or_default();
    let with_hash = profile == "release" || env::var("BUILD_VERSION_WITH_HASH").is_ok();

    let base_version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let version_string = if with_hash {
        match git_short_hash() {
            Some(hash) => format!("{} ({})", base_version, hash),
            None => base_version,
        }
    } else {
        format!("{} (dev)", base_version)
    };

    println!("cargo:rustc-env=OCCCTL_BUILD_VERSION={}", version_string);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/packed-refs");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

fn git_short_hash() -> Option<String> {
    let output = match Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        Ok(output) => output,
        Err(_) => {
            println!("cargo:warning=Failed to execute git command. Is git installed and in PATH?");
            return None;
        }
    };

    if !output.status.success() {
        println!(
            "cargo:warning=Failed to get git hash: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!hash.is_empty()).then_some(hash)
}
