//! Testing utilities and mock implementations.
//!
//! `MockEngine` stands in for the remote engine so handlers and
//! reconciliation can run without a network. The association store needs no
//! mock: use `SqliteAssociationStore::in_memory()`.
//!
//! # Example
//!
//! ```rust,ignore
//! use arrshim_core::testing::{fixtures, MockEngine};
//!
//! let engine = MockEngine::new();
//! engine.add_mock_download(fixtures::remote_download("abc123", "Some.Show")).await;
//!
//! // Use in AppState...
//! ```

mod mock_engine;

pub use mock_engine::{MockEngine, RecordedAdd, RecordedDelete};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::engine::{EngineStatus, RemoteDownload, RemoteFile};

    /// Create a seeding download with reasonable defaults.
    pub fn remote_download(infohash: &str, name: &str) -> RemoteDownload {
        RemoteDownload {
            infohash: infohash.to_string(),
            name: name.to_string(),
            status: EngineStatus::Seeding,
            destination: "/downloads".to_string(),
            size: 1024 * 1024 * 100, // 100 MB
            progress: 1.0,
            num_peers: 4,
            speed_down: 0,
            speed_up: 2048,
            eta: 0.0,
        }
    }

    /// Create a download in the given engine status.
    pub fn remote_download_with_status(
        infohash: &str,
        name: &str,
        status: EngineStatus,
    ) -> RemoteDownload {
        RemoteDownload {
            status,
            ..remote_download(infohash, name)
        }
    }

    /// Create a file entry.
    pub fn remote_file(index: u32, name: &str, size: u64) -> RemoteFile {
        RemoteFile {
            index,
            name: name.to_string(),
            size,
            included: true,
            progress: 1.0,
        }
    }

    /// Magnet URI for a hash.
    pub fn magnet(infohash: &str, name: &str) -> String {
        format!(
            "magnet:?xt=urn:btih:{}&dn={}",
            infohash,
            name.replace(' ', "+")
        )
    }
}
