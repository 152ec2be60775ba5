//! Values reported for client fields the engine has no equivalent for.
//!
//! Every fixed value the mapper emits lives here.

use super::TorrentProperties;

/// Per-torrent fields in `torrents/info` with no engine source.
pub struct TorrentDefaults {
    pub tags: &'static str,
    pub priority: i64,
    pub ratio: f64,
    pub f_l_piece_prio: bool,
    pub seq_dl: bool,
    pub super_seeding: bool,
    pub force_start: bool,
}

pub const TORRENT: TorrentDefaults = TorrentDefaults {
    tags: "",
    priority: 0,
    ratio: 0.0,
    f_l_piece_prio: false,
    seq_dl: false,
    super_seeding: false,
    force_start: false,
};

/// Per-file fields in `torrents/files` with no engine source.
pub struct FileDefaults {
    pub priority: i64,
    pub is_seed: bool,
    pub availability: f64,
}

pub const FILE: FileDefaults = FileDefaults {
    priority: 0,
    is_seed: false,
    availability: 0.0,
};

/// Properties baseline; the mapper overwrites `name` and `save_path`.
pub const PROPERTIES: TorrentProperties = TorrentProperties {
    name: String::new(),
    save_path: String::new(),
    comment: String::new(),
    created_by: String::new(),
    share_ratio: 0.0,
    creation_date: 0,
    addition_date: 0,
    completion_date: 0,
    last_seen: 0,
    total_uploaded: 0,
    total_uploaded_session: 0,
    total_downloaded: 0,
    total_downloaded_session: 0,
    total_wasted: 0,
    total_size: 0,
    up_limit: 0,
    dl_limit: 0,
    up_speed: 0,
    up_speed_avg: 0,
    dl_speed: 0,
    dl_speed_avg: 0,
    time_elapsed: 0,
    seeding_time: 0,
    eta: 0,
    nb_connections: 0,
    nb_connections_limit: 0,
    peers: 0,
    peers_total: 0,
    seeds: 0,
    seeds_total: 0,
    piece_size: 0,
    pieces_have: 0,
    pieces_num: 0,
    reannounce: 0,
};

/// Fixed application preferences.
pub const MAX_RATIO_ACTION: &str = "pause";
pub const QUEUEING_ENABLED: bool = true;
pub const DHT_ENABLED: bool = true;
