//! Types for remote download engine operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur talking to the remote engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Endpoint or key missing/invalid. Raised before any request is sent.
    #[error("Engine configuration error: {0}")]
    Configuration(String),

    /// Connection refused, DNS failure, timeout, truncated body.
    #[error("Engine unreachable: {0}")]
    Transport(String),

    /// The engine answered with a non-2xx status.
    #[error("Engine returned {status_line}")]
    Remote { status: u16, status_line: String },

    /// The engine answered 2xx with a body we could not decode.
    #[error("Malformed engine response: {0}")]
    Decode(String),

    #[error("Download not found: {0}")]
    NotFound(String),
}

/// Download status as reported by the engine.
///
/// Only the values the mapper has a translation for are named; anything else
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EngineStatus {
    Seeding,
    Downloading,
    Paused,
    Other(String),
}

impl EngineStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EngineStatus::Seeding => "SEEDING",
            EngineStatus::Downloading => "DOWNLOADING",
            EngineStatus::Paused => "PAUSED",
            EngineStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for EngineStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "SEEDING" => EngineStatus::Seeding,
            "DOWNLOADING" => EngineStatus::Downloading,
            "PAUSED" => EngineStatus::Paused,
            _ => EngineStatus::Other(raw),
        }
    }
}

impl From<EngineStatus> for String {
    fn from(status: EngineStatus) -> Self {
        status.as_str().to_string()
    }
}

impl Default for EngineStatus {
    fn default() -> Self {
        EngineStatus::Other(String::new())
    }
}

/// A download as listed by `GET /downloads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDownload {
    pub infohash: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: EngineStatus,
    /// Save directory.
    #[serde(default)]
    pub destination: String,
    /// Total size in bytes.
    #[serde(default)]
    pub size: u64,
    /// 0.0 - 1.0
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub num_peers: u32,
    /// Bytes/second.
    #[serde(default)]
    pub speed_down: u64,
    /// Bytes/second.
    #[serde(default)]
    pub speed_up: u64,
    /// Seconds.
    #[serde(default)]
    pub eta: f64,
}

/// Engine checkpoint loading progress, reported alongside the download list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoints {
    #[serde(default)]
    pub loaded: u32,
    #[serde(default)]
    pub all_loaded: bool,
    #[serde(default)]
    pub total: u32,
}

/// Body of `GET /downloads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadsResponse {
    pub downloads: Vec<RemoteDownload>,
    #[serde(default)]
    pub checkpoints: Checkpoints,
}

/// A file within a download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFile {
    pub index: u32,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub included: bool,
    #[serde(default)]
    pub progress: f64,
}

/// Body of `GET /downloads/{hash}/files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadFiles {
    #[serde(default)]
    pub infohash: String,
    pub files: Vec<RemoteFile>,
}

/// Run state accepted by `PATCH /downloads/{hash}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Stop,
    Resume,
    Recheck,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Stop => "stop",
            RunState::Resume => "resume",
            RunState::Recheck => "recheck",
        }
    }
}

/// Trait for remote download engine backends.
#[async_trait]
pub trait DownloadEngine: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// List every download the engine knows about.
    async fn list_downloads(&self) -> Result<Vec<RemoteDownload>, EngineError>;

    /// Get one download by infohash. `NotFound` if the engine has no match.
    async fn get_download(&self, hash: &str) -> Result<RemoteDownload, EngineError>;

    /// Start a download from a magnet link or torrent URL. Returns the infohash.
    async fn add_download(&self, uri: &str) -> Result<String, EngineError>;

    /// Remove a download, optionally deleting its data.
    async fn delete_download(&self, hash: &str, remove_data: bool) -> Result<(), EngineError>;

    /// Change the run state of a download.
    async fn set_state(&self, hash: &str, state: RunState) -> Result<(), EngineError>;

    /// List the files of a download.
    async fn list_files(&self, hash: &str) -> Result<Vec<RemoteFile>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_status_parsing() {
        assert_eq!(EngineStatus::from("SEEDING".to_string()), EngineStatus::Seeding);
        assert_eq!(
            EngineStatus::from("DOWNLOADING".to_string()),
            EngineStatus::Downloading
        );
        assert_eq!(EngineStatus::from("PAUSED".to_string()), EngineStatus::Paused);
        assert_eq!(
            EngineStatus::from("HASHCHECKING".to_string()),
            EngineStatus::Other("HASHCHECKING".to_string())
        );
    }

    #[test]
    fn test_engine_status_keeps_unknown_value_verbatim() {
        let status: EngineStatus = serde_json::from_str("\"STOPPED_ON_ERROR\"").unwrap();
        assert_eq!(status.as_str(), "STOPPED_ON_ERROR");
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"STOPPED_ON_ERROR\"");
    }

    #[test]
    fn test_run_state_as_str() {
        assert_eq!(RunState::Stop.as_str(), "stop");
        assert_eq!(RunState::Resume.as_str(), "resume");
        assert_eq!(RunState::Recheck.as_str(), "recheck");
    }

    #[test]
    fn test_downloads_response_tolerates_missing_and_extra_fields() {
        let body = r#"{
            "downloads": [
                {
                    "infohash": "abc123",
                    "name": "Some.Show.S01E01",
                    "status": "DOWNLOADING",
                    "destination": "/downloads",
                    "size": 1000,
                    "progress": 0.25,
                    "num_peers": 4,
                    "speed_down": 2048,
                    "speed_up": 128,
                    "eta": 60.5,
                    "hops": 2,
                    "trackers": [{"url": "udp://t", "peers": 1, "status": "Working"}]
                },
                { "infohash": "def456" }
            ]
        }"#;

        let response: DownloadsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.downloads.len(), 2);

        let first = &response.downloads[0];
        assert_eq!(first.status, EngineStatus::Downloading);
        assert_eq!(first.size, 1000);
        assert_eq!(first.num_peers, 4);
        assert!((first.eta - 60.5).abs() < f64::EPSILON);

        let second = &response.downloads[1];
        assert_eq!(second.name, "");
        assert_eq!(second.status, EngineStatus::Other(String::new()));
        assert!(!response.checkpoints.all_loaded);
    }

    #[test]
    fn test_remote_error_display_carries_status_line() {
        let err = EngineError::Remote {
            status: 500,
            status_line: "500 Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "Engine returned 500 Internal Server Error");
    }
}
