use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub categories: CategoryConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("arrshim.db")
}

/// Remote download engine connection settings.
///
/// `url` and `api_key` have no usable default: leaving either empty is
/// rejected by [`validate_config`](super::validate_config) and by the engine
/// client constructor.
#[derive(Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Base URL of the engine REST API (e.g. "http://localhost:20100").
    #[serde(default)]
    pub url: String,
    /// Value sent in the `X-Api-Key` header.
    #[serde(default)]
    pub api_key: String,
    /// Destination directory for new downloads. Also the save path of
    /// categories created implicitly.
    #[serde(default)]
    pub download_dir: String,
    /// Anonymity hops requested for new downloads.
    #[serde(default = "default_anon_hops")]
    pub anon_hops: u8,
    /// Whether new downloads seed through the anonymity network only.
    #[serde(default = "default_safe_seeding")]
    pub safe_seeding: bool,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Accept invalid TLS certificates. Never enable outside trusted networks.
    #[serde(default)]
    pub tls_skip_verify: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            download_dir: String::new(),
            anon_hops: default_anon_hops(),
            safe_seeding: default_safe_seeding(),
            timeout_secs: default_timeout(),
            tls_skip_verify: false,
        }
    }
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("url", &self.url)
            .field("api_key_configured", &!self.api_key.is_empty())
            .field("download_dir", &self.download_dir)
            .field("anon_hops", &self.anon_hops)
            .field("safe_seeding", &self.safe_seeding)
            .field("timeout_secs", &self.timeout_secs)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .finish()
    }
}

fn default_anon_hops() -> u8 {
    2
}

fn default_safe_seeding() -> bool {
    true
}

fn default_timeout() -> u32 {
    5
}

/// Category bookkeeping settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryConfig {
    /// Category assigned to downloads that have no local association, and to
    /// adds submitted without a category.
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
        }
    }
}

fn default_category() -> String {
    "tribler".to_string()
}

/// Reconciliation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconcileConfig {
    /// Import downloads unknown to the local store once at startup.
    #[serde(default = "default_on_startup")]
    pub on_startup: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            on_startup: default_on_startup(),
        }
    }
}

fn default_on_startup() -> bool {
    true
}
