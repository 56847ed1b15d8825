//! Configuration management

use serde::Deserialize;
use std::path::Path;
use tsqrest_tsq::MemoryBackendConfig;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiConfig {
    /// Answer PUT-on-missing with 404 and POST-on-existing with 409
    #[serde(default)]
    pub strict_status: bool,

    /// Allow cross-origin requests from any origin
    #[serde(default)]
    pub cors: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    #[serde(rename = "memory")]
    Memory(MemoryBackendConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Memory(MemoryBackendConfig::default())
    }
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Without an explicit path, `tsqrest.toml` in the working directory is
    /// read if present. Environment variables use the `TSQREST__` prefix and
    /// `__` between sections, e.g. `TSQREST__SERVER__PORT=9000`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("tsqrest").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("TSQREST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }
}
