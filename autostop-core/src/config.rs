use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_METADATA_FILE: &str = "/opt/ml/metadata/resource-metadata.json";
pub const DEFAULT_ENDPOINT_SCRIPT: &str = "/home/ec2-user/SageMaker/script-note.sh";

/// Settings read from the optional TOML file. Every section has defaults,
/// so an absent file behaves like an empty one.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub jupyter: JupyterSettings,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub aws: AwsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JupyterSettings {
    pub scheme: String,
    pub host: String,
    /// The notebook server uses a self-signed certificate.
    pub accept_invalid_certs: bool,
    pub timeout_seconds: u64,
}

impl Default for JupyterSettings {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "localhost".to_string(),
            accept_invalid_certs: true,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathsConfig {
    pub metadata_file: PathBuf,
    pub endpoint_script: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            metadata_file: PathBuf::from(DEFAULT_METADATA_FILE),
            endpoint_script: PathBuf::from(DEFAULT_ENDPOINT_SCRIPT),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AwsConfig {
    pub region: Option<String>,
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        s.try_deserialize()
    }
}

/// Immutable configuration for a single autostop pass.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub threshold: Duration,
    pub port: u16,
    pub ignore_connections: bool,
    pub settings: Settings,
}

impl RunConfig {
    pub fn new(
        threshold_seconds: u64,
        port: u16,
        ignore_connections: bool,
        settings: Settings,
    ) -> Self {
        Self {
            threshold: Duration::from_secs(threshold_seconds),
            port,
            ignore_connections,
            settings,
        }
    }
}
