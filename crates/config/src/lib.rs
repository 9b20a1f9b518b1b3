//! Flock agent configuration
//!
//! Locates the drone server and the central controller, and names the
//! vocabularies their hypermedia documents are written in.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{config_path, data_dir};

/// Errors in configuration handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG IO ERROR: {0}")]
    Io(#[from] std::io::Error),

    #[error("CONFIG PARSE ERROR: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CONFIG NOT FOUND: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Drone server: holds the authoritative drone record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneServerConfig {
    #[serde(default = "default_drone_url")]
    pub url: String,
    #[serde(default = "default_drone_iri")]
    pub iri: String,
    #[serde(default = "default_drone_namespace")]
    pub namespace: String,
}

impl Default for DroneServerConfig {
    fn default() -> Self {
        Self {
            url: default_drone_url(),
            iri: default_drone_iri(),
            namespace: default_drone_namespace(),
        }
    }
}

fn default_drone_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_drone_iri() -> String {
    "http://localhost:8081/api/Drone".to_string()
}

fn default_drone_namespace() -> String {
    "http://localhost:8081/api/vocab#".to_string()
}

/// Central controller: fleet-wide drone tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_controller_url")]
    pub url: String,
    #[serde(default = "default_controller_iri")]
    pub iri: String,
    #[serde(default = "default_controller_namespace")]
    pub namespace: String,
    #[serde(default = "default_collection_path")]
    pub collection_path: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: default_controller_url(),
            iri: default_controller_iri(),
            namespace: default_controller_namespace(),
            collection_path: default_collection_path(),
        }
    }
}

fn default_controller_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_controller_iri() -> String {
    "http://localhost:8080/api/Location".to_string()
}

fn default_controller_namespace() -> String {
    "http://localhost:8080/api/vocab#".to_string()
}

fn default_collection_path() -> String {
    "/api/DroneCollection/".to_string()
}

fn default_schema_namespace() -> String {
    "http://schema.org/".to_string()
}

/// Root agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drone: DroneServerConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default = "default_schema_namespace")]
    pub schema_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drone: DroneServerConfig::default(),
            controller: ControllerConfig::default(),
            schema_namespace: default_schema_namespace(),
        }
    }
}

impl Config {
    /// Load from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from specific location, falling back to defaults when absent
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("◆ NO CONFIG AT {:?}, USING DEFAULTS", path);
            return Ok(Config::default());
        }

        debug!("◆ READING CONFIG FROM {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load from specific location, failing when absent
    pub async fn load_existing(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load_from(path).await
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("◆ WRITING CONFIG TO {:?}", path);

        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// IRI of a drone entry in the controller's drone collection
    pub fn controller_drone_iri(&self, drone_id: i64) -> String {
        format!(
            "{}{}",
            self.controller.url.trim_end_matches('/'),
            self.controller_drone_path(drone_id)
        )
    }

    /// Collection-relative path of a drone entry at the controller
    pub fn controller_drone_path(&self, drone_id: i64) -> String {
        let mut path = self.controller.collection_path.clone();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }
        format!("{}{}", path, drone_id)
    }
}

/// Write the default configuration unless one already exists
pub async fn init_at(path: &Path) -> Result<Config> {
    if path.exists() {
        warn!("◆ CONFIG ALREADY PRESENT AT {:?}", path);
    } else {
        Config::default().save_to(path).await?;
        info!("◆ CONFIG WRITTEN TO {:?}", path);
    }

    Config::load_from(path).await
}

/// Initialize the default configuration location
pub async fn init() -> Result<Config> {
    init_at(&config_path()).await
}
