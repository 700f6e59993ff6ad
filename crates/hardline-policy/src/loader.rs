//! Policy loader - reads JSON policy documents from disk

use hardline_core::{Error, Policy, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Windows policy bundle filename
pub const WINDOWS_POLICY_FILE: &str = "annexure_a.json";
/// Linux-family policy bundle filename
pub const LINUX_POLICY_FILE: &str = "annexure_b.json";

/// Load a policy document from a file path.
///
/// The two failure stages are surfaced distinctly: `open` when the file
/// cannot be read, `decode` when the JSON is malformed. Unknown fields are
/// ignored; no semantic validation happens here.
pub fn load_policy(path: impl AsRef<Path>) -> Result<Policy> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|e| Error::PolicyLoad {
        stage: "open",
        message: format!("{}: {}", path.display(), e),
    })?;

    let policy: Policy = serde_json::from_str(&content).map_err(|e| Error::PolicyLoad {
        stage: "decode",
        message: format!("{}: {}", path.display(), e),
    })?;

    info!(
        "Loaded policy {} ({} rules) from {}",
        policy.version,
        policy.rules.len(),
        path.display()
    );
    Ok(policy)
}

/// Linux distribution family, as far as policy selection cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distro {
    CentOs,
    Ubuntu,
    Rhel,
    Debian,
    Generic,
}

impl Distro {
    pub fn as_str(&self) -> &'static str {
        match self {
            Distro::CentOs => "CentOS",
            Distro::Ubuntu => "Ubuntu",
            Distro::Rhel => "RHEL",
            Distro::Debian => "Debian",
            Distro::Generic => "Linux",
        }
    }
}

/// Classify the running Linux distribution from /etc/os-release
pub fn detect_distro() -> Distro {
    match std::fs::read_to_string("/etc/os-release") {
        Ok(content) => classify_os_release(&content),
        Err(_) => Distro::Generic,
    }
}

fn classify_os_release(content: &str) -> Distro {
    let content = content.to_lowercase();
    if content.contains("centos") {
        Distro::CentOs
    } else if content.contains("ubuntu") {
        Distro::Ubuntu
    } else if content.contains("rhel") || content.contains("red hat") {
        Distro::Rhel
    } else if content.contains("debian") {
        Distro::Debian
    } else {
        Distro::Generic
    }
}

/// Resolve the default policy file for the current platform.
///
/// Windows uses the annexure-A bundle, the Linux family annexure-B. On
/// CentOS a missing annexure-B gets a warning before the loader proceeds
/// with the same default path, so the eventual open error is what the
/// operator sees.
pub fn default_policy_path(dir: impl AsRef<Path>) -> PathBuf {
    let dir = dir.as_ref();

    if cfg!(windows) {
        return dir.join(WINDOWS_POLICY_FILE);
    }

    let preferred = dir.join(LINUX_POLICY_FILE);
    if detect_distro() == Distro::CentOs && !preferred.exists() {
        warn!(
            "CentOS detected but '{}' missing. Using default.",
            preferred.display()
        );
    }
    preferred
}
