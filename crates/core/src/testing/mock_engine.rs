//! Mock download engine for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::{DownloadEngine, EngineError, EngineStatus, RemoteDownload, RemoteFile, RunState};

/// A recorded add_download call.
#[derive(Debug, Clone)]
pub struct RecordedAdd {
    pub uri: String,
    pub timestamp: chrono::DateTime<Utc>,
}

/// A recorded delete_download call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelete {
    pub hash: String,
    pub remove_data: bool,
}

/// Mock implementation of the DownloadEngine trait.
///
/// Keeps downloads in memory, records every mutating call and can be told
/// to fail the next operation.
///
/// # Example
///
/// ```rust,ignore
/// let engine = MockEngine::new();
/// engine.add_mock_download(fixtures::remote_download("abc123", "Some.Show")).await;
///
/// let hash = engine.add_download("magnet:?xt=urn:btih:DEF456").await?;
/// assert_eq!(hash, "def456");
/// assert_eq!(engine.added().await.len(), 1);
///
/// engine.set_next_error(EngineError::Transport("down".into())).await;
/// assert!(engine.list_downloads().await.is_err());
/// ```
#[derive(Debug)]
pub struct MockEngine {
    /// Downloads in insertion order.
    downloads: Arc<RwLock<Vec<RemoteDownload>>>,
    files: Arc<RwLock<HashMap<String, Vec<RemoteFile>>>>,
    added: Arc<RwLock<Vec<RecordedAdd>>>,
    deleted: Arc<RwLock<Vec<RecordedDelete>>>,
    state_changes: Arc<RwLock<Vec<(String, RunState)>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<EngineError>>>,
    hash_counter: Arc<RwLock<u32>>,
    destination: String,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            downloads: Arc::new(RwLock::new(Vec::new())),
            files: Arc::new(RwLock::new(HashMap::new())),
            added: Arc::new(RwLock::new(Vec::new())),
            deleted: Arc::new(RwLock::new(Vec::new())),
            state_changes: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            hash_counter: Arc::new(RwLock::new(0)),
            destination: "/mock/downloads".to_string(),
        }
    }

    /// Create a mock engine that files new downloads under `destination`.
    pub fn with_destination(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::new()
        }
    }

    /// Pre-populate a download.
    pub async fn add_mock_download(&self, download: RemoteDownload) {
        let mut downloads = self.downloads.write().await;
        downloads.retain(|d| !d.infohash.eq_ignore_ascii_case(&download.infohash));
        downloads.push(download);
    }

    /// Set the file list reported for a download.
    pub async fn set_files(&self, hash: &str, files: Vec<RemoteFile>) {
        self.files.write().await.insert(hash.to_lowercase(), files);
    }

    /// Set the engine status of a download directly.
    pub async fn set_status(&self, hash: &str, status: EngineStatus) {
        let mut downloads = self.downloads.write().await;
        if let Some(download) = find_mut(&mut downloads, hash) {
            download.status = status;
        }
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: EngineError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn added(&self) -> Vec<RecordedAdd> {
        self.added.read().await.clone()
    }

    pub async fn deleted(&self) -> Vec<RecordedDelete> {
        self.deleted.read().await.clone()
    }

    pub async fn state_changes(&self) -> Vec<(String, RunState)> {
        self.state_changes.read().await.clone()
    }

    pub async fn has_download(&self, hash: &str) -> bool {
        let downloads = self.downloads.read().await;
        downloads.iter().any(|d| d.infohash.eq_ignore_ascii_case(hash))
    }

    pub async fn download_count(&self) -> usize {
        self.downloads.read().await.len()
    }

    async fn take_error(&self) -> Option<EngineError> {
        self.next_error.write().await.take()
    }

    async fn generate_hash(&self) -> String {
        let mut counter = self.hash_counter.write().await;
        *counter += 1;
        format!("{:040x}", *counter)
    }

    /// Extract the info hash from a magnet URI if present.
    fn extract_hash_from_magnet(uri: &str) -> Option<String> {
        uri.split(['?', '&'])
            .find_map(|part| part.strip_prefix("xt=urn:btih:"))
            .filter(|hash| !hash.is_empty())
            .map(|hash| hash.to_lowercase())
    }

    /// Extract the display name from a magnet URI if present.
    fn extract_name_from_magnet(uri: &str) -> Option<String> {
        uri.split(['?', '&'])
            .find_map(|part| part.strip_prefix("dn="))
            .map(|name| name.replace('+', " "))
    }
}

fn find_mut<'a>(downloads: &'a mut [RemoteDownload], hash: &str) -> Option<&'a mut RemoteDownload> {
    downloads
        .iter_mut()
        .find(|d| d.infohash.eq_ignore_ascii_case(hash))
}

#[async_trait]
impl DownloadEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_downloads(&self) -> Result<Vec<RemoteDownload>, EngineError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.downloads.read().await.clone())
    }

    async fn get_download(&self, hash: &str) -> Result<RemoteDownload, EngineError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.downloads
            .read()
            .await
            .iter()
            .find(|d| d.infohash.eq_ignore_ascii_case(hash))
            .cloned()
            .ok_or_else(|| EngineError::NotFound(hash.to_string()))
    }

    async fn add_download(&self, uri: &str) -> Result<String, EngineError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.added.write().await.push(RecordedAdd {
            uri: uri.to_string(),
            timestamp: Utc::now(),
        });

        let hash = match Self::extract_hash_from_magnet(uri) {
            Some(hash) => hash,
            None => self.generate_hash().await,
        };
        let name = Self::extract_name_from_magnet(uri)
            .unwrap_or_else(|| format!("Mock Download {}", &hash[..hash.len().min(8)]));

        self.add_mock_download(RemoteDownload {
            infohash: hash.clone(),
            name,
            status: EngineStatus::Downloading,
            destination: self.destination.clone(),
            size: 100 * 1024 * 1024,
            progress: 0.0,
            num_peers: 5,
            speed_down: 1024 * 1024,
            speed_up: 256 * 1024,
            eta: 100.0,
        })
        .await;

        Ok(hash)
    }

    async fn delete_download(&self, hash: &str, remove_data: bool) -> Result<(), EngineError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.deleted.write().await.push(RecordedDelete {
            hash: hash.to_string(),
            remove_data,
        });

        let mut downloads = self.downloads.write().await;
        let before = downloads.len();
        downloads.retain(|d| !d.infohash.eq_ignore_ascii_case(hash));
        if downloads.len() == before {
            return Err(EngineError::NotFound(hash.to_string()));
        }
        Ok(())
    }

    async fn set_state(&self, hash: &str, state: RunState) -> Result<(), EngineError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.state_changes
            .write()
            .await
            .push((hash.to_string(), state));

        let mut downloads = self.downloads.write().await;
        let download =
            find_mut(&mut downloads, hash).ok_or_else(|| EngineError::NotFound(hash.to_string()))?;

        match state {
            RunState::Stop => download.status = EngineStatus::Paused,
            RunState::Resume if download.progress >= 1.0 => download.status = EngineStatus::Seeding,
            RunState::Resume => download.status = EngineStatus::Downloading,
            RunState::Recheck => {}
        }
        Ok(())
    }

    async fn list_files(&self, hash: &str) -> Result<Vec<RemoteFile>, EngineError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if !self.has_download(hash).await {
            return Err(EngineError::NotFound(hash.to_string()));
        }

        Ok(self
            .files
            .read()
            .await
            .get(&hash.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}
