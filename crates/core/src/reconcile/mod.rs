//! Reconciliation of the association store against the engine.
//!
//! Downloads added to the engine by other means have no local category.
//! A pass lists both sides once and files every unknown hash under the
//! default category.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::{DownloadEngine, EngineError};
use crate::store::{AssociationStore, Insertion, StoreError};

/// Errors that abort a reconciliation pass.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Failed to read local associations: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to list engine downloads: {0}")]
    Engine(#[from] EngineError),
}

/// A hash that could not be imported.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileFailure {
    pub hash: String,
    pub error: String,
}

/// Outcome of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// Downloads the engine reported.
    pub remote_total: usize,
    /// Associations in the store before the pass.
    pub known_locally: usize,
    /// Hashes filed under the default category by this pass.
    pub imported: Vec<String>,
    /// Hashes that were associated concurrently before this pass got to them.
    pub already_present: Vec<String>,
    pub failed: Vec<ReconcileFailure>,
    pub finished_at: DateTime<Utc>,
}

/// Run one reconciliation pass.
///
/// Reads every local association and one engine listing, then inserts the
/// missing hashes. Failing to read either side aborts; a failed insert is
/// recorded and the pass continues.
pub async fn reconcile(
    engine: &dyn DownloadEngine,
    store: &dyn AssociationStore,
    default_category: &str,
) -> Result<ReconcileReport, ReconcileError> {
    let known: HashSet<String> = store
        .list_all_torrents()?
        .into_iter()
        .map(|t| t.hash)
        .collect();

    let downloads = engine.list_downloads().await?;
    debug!(
        engine = engine.name(),
        remote = downloads.len(),
        local = known.len(),
        "Reconciling associations"
    );

    let mut imported = Vec::new();
    let mut already_present = Vec::new();
    let mut failed = Vec::new();

    for download in &downloads {
        let hash = download.infohash.to_lowercase();
        if known.contains(&hash) {
            continue;
        }

        match store.add_torrent(&hash, default_category) {
            Ok(Insertion::Created) => {
                info!("Imported {} ({}) into {}", hash, download.name, default_category);
                imported.push(hash);
            }
            Ok(Insertion::Existing) => already_present.push(hash),
            Err(e) => {
                warn!("Failed to import {}: {}", hash, e);
                failed.push(ReconcileFailure {
                    hash,
                    error: e.to_string(),
                });
            }
        }
    }

    let report = ReconcileReport {
        remote_total: downloads.len(),
        known_locally: known.len(),
        imported,
        already_present,
        failed,
        finished_at: Utc::now(),
    };

    info!(
        imported = report.imported.len(),
        failed = report.failed.len(),
        "Reconciliation finished"
    );

    Ok(report)
}
