//! Client-facing (qBittorrent Web API) shapes.

use serde::{Deserialize, Serialize};

/// Torrent state as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientState {
    #[serde(rename = "downloading")]
    Downloading,
    #[serde(rename = "pausedUP")]
    PausedUp,
    /// The engine reported a status with no client equivalent.
    #[serde(rename = "")]
    Unmapped,
}

impl ClientState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientState::Downloading => "downloading",
            ClientState::PausedUp => "pausedUP",
            ClientState::Unmapped => "",
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, ClientState::Unmapped)
    }
}

/// Element of `GET /api/v2/torrents/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientTorrentView {
    pub hash: String,
    pub name: String,
    pub state: ClientState,
    pub category: String,
    pub tags: String,
    pub content_path: String,
    pub save_path: String,
    pub size: u64,
    pub progress: f64,
    pub dlspeed: u64,
    pub upspeed: u64,
    pub eta: f64,
    pub num_seeds: u32,
    pub num_leechs: u32,
    pub num_complete: u32,
    pub num_incomplete: u32,
    pub priority: i64,
    pub ratio: f64,
    pub f_l_piece_prio: bool,
    pub seq_dl: bool,
    pub super_seeding: bool,
    pub force_start: bool,
}

/// Body of `GET /api/v2/torrents/properties`.
///
/// Only `name` and `save_path` carry engine data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentProperties {
    pub name: String,
    pub save_path: String,
    pub comment: String,
    pub created_by: String,
    pub share_ratio: f64,
    pub creation_date: i64,
    pub addition_date: i64,
    pub completion_date: i64,
    pub last_seen: i64,
    pub total_uploaded: i64,
    pub total_uploaded_session: i64,
    pub total_downloaded: i64,
    pub total_downloaded_session: i64,
    pub total_wasted: i64,
    pub total_size: i64,
    pub up_limit: i64,
    pub dl_limit: i64,
    pub up_speed: i64,
    pub up_speed_avg: i64,
    pub dl_speed: i64,
    pub dl_speed_avg: i64,
    pub time_elapsed: i64,
    pub seeding_time: i64,
    pub eta: i64,
    pub nb_connections: i64,
    pub nb_connections_limit: i64,
    pub peers: i64,
    pub peers_total: i64,
    pub seeds: i64,
    pub seeds_total: i64,
    pub piece_size: i64,
    pub pieces_have: i64,
    pub pieces_num: i64,
    pub reannounce: i64,
}

/// Element of `GET /api/v2/torrents/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientFile {
    pub index: u32,
    pub name: String,
    pub size: u64,
    pub progress: f64,
    pub priority: i64,
    pub is_seed: bool,
    pub piece_range: Vec<i64>,
    pub availability: f64,
}

/// Body of `GET /api/v2/app/preferences`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    pub save_path: String,
    pub max_ratio_enabled: bool,
    pub max_ratio: f64,
    pub max_seeding_time_enabled: bool,
    pub max_seeding_time: i64,
    pub max_ratio_act: String,
    pub queueing_enabled: bool,
    pub dht: bool,
    pub create_subfolder_enabled: bool,
}
