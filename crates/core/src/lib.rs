pub mod config;
pub mod engine;
pub mod mapper;
pub mod reconcile;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, CategoryConfig, Config, ConfigError,
    DatabaseConfig, EngineConfig, ReconcileConfig, ServerConfig,
};
pub use engine::{
    DownloadEngine, EngineError, EngineStatus, HttpEngineClient, RemoteDownload, RemoteFile,
    RunState,
};
pub use mapper::{
    AppPreferences, ClientFile, ClientState, ClientTorrentView, StateMapper, TorrentProperties,
};
pub use reconcile::{reconcile, ReconcileError, ReconcileFailure, ReconcileReport};
pub use store::{
    AssociationStore, Category, Insertion, SqliteAssociationStore, StoreError, TorrentAssociation,
};
