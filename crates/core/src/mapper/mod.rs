//! Translation from engine entities to qBittorrent Web API shapes.
//!
//! Everything here is pure: no I/O, no environment reads, and every engine
//! input maps to some client output.

pub mod defaults;
mod types;

pub use types::*;

use crate::config::Config;
use crate::engine::{EngineStatus, RemoteDownload, RemoteFile};

/// Map an engine status onto the client state table.
pub fn to_client_state(status: &EngineStatus) -> ClientState {
    match status {
        EngineStatus::Seeding => ClientState::PausedUp,
        EngineStatus::Downloading => ClientState::Downloading,
        EngineStatus::Paused => ClientState::PausedUp,
        EngineStatus::Other(_) => ClientState::Unmapped,
    }
}

/// Path of the downloaded content: `destination/name`.
pub fn content_path(destination: &str, name: &str) -> String {
    if destination.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", destination.trim_end_matches('/'), name)
}

/// Build the `torrents/info` element for a download.
pub fn to_client_view(download: &RemoteDownload, category: &str) -> ClientTorrentView {
    let peers = download.num_peers;

    ClientTorrentView {
        hash: download.infohash.clone(),
        name: download.name.clone(),
        state: to_client_state(&download.status),
        category: category.to_string(),
        tags: defaults::TORRENT.tags.to_string(),
        content_path: content_path(&download.destination, &download.name),
        save_path: download.destination.clone(),
        size: download.size,
        progress: download.progress,
        dlspeed: download.speed_down,
        upspeed: download.speed_up,
        eta: download.eta,
        // The engine only reports one peer count.
        num_seeds: peers,
        num_leechs: peers,
        num_complete: peers,
        num_incomplete: peers,
        priority: defaults::TORRENT.priority,
        ratio: defaults::TORRENT.ratio,
        f_l_piece_prio: defaults::TORRENT.f_l_piece_prio,
        seq_dl: defaults::TORRENT.seq_dl,
        super_seeding: defaults::TORRENT.super_seeding,
        force_start: defaults::TORRENT.force_start,
    }
}

/// Build the `torrents/properties` body for a download.
pub fn to_client_properties(download: &RemoteDownload) -> TorrentProperties {
    TorrentProperties {
        name: download.name.clone(),
        save_path: download.destination.clone(),
        ..defaults::PROPERTIES
    }
}

/// Build the `torrents/files` list for a download.
pub fn to_client_files(files: &[RemoteFile]) -> Vec<ClientFile> {
    files
        .iter()
        .map(|file| ClientFile {
            index: file.index,
            name: file.name.clone(),
            size: file.size,
            progress: file.progress,
            priority: defaults::FILE.priority,
            is_seed: defaults::FILE.is_seed,
            piece_range: Vec::new(),
            availability: defaults::FILE.availability,
        })
        .collect()
}

/// Mapper bound to the configured defaults.
#[derive(Debug, Clone)]
pub struct StateMapper {
    default_category: String,
    download_dir: String,
}

impl StateMapper {
    pub fn new(default_category: impl Into<String>, download_dir: impl Into<String>) -> Self {
        Self {
            default_category: default_category.into(),
            download_dir: download_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.categories.default_category.clone(),
            config.engine.download_dir.clone(),
        )
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    pub fn download_dir(&self) -> &str {
        &self.download_dir
    }

    /// Client view, filed under `category` or the default category.
    pub fn view(&self, download: &RemoteDownload, category: Option<&str>) -> ClientTorrentView {
        let category = match category {
            Some(name) if !name.is_empty() => name,
            _ => &self.default_category,
        };
        to_client_view(download, category)
    }

    pub fn preferences(&self) -> AppPreferences {
        AppPreferences {
            save_path: self.download_dir.clone(),
            max_ratio_enabled: false,
            max_ratio: 0.0,
            max_seeding_time_enabled: false,
            max_seeding_time: 0,
            max_ratio_act: defaults::MAX_RATIO_ACTION.to_string(),
            queueing_enabled: defaults::QUEUEING_ENABLED,
            dht: defaults::DHT_ENABLED,
            create_subfolder_enabled: false,
        }
    }
}
