//! qBittorrent torrent endpoints backed by the remote engine.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use arrshim_core::{
    mapper, ClientFile, ClientTorrentView, EngineError, RunState, TorrentProperties,
};

use super::{ApiError, FormFields, SuccessResponse};
use crate::state::AppState;

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InfoParams {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HashParams {
    #[serde(default)]
    pub hash: Option<String>,
}

impl HashParams {
    fn require(self) -> Result<String, ApiError> {
        self.hash
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Missing hash parameter".to_string()))
    }
}

/// Split a `hashes` parameter. Accepts `,` and `|` separators.
pub fn parse_hashes(raw: &str) -> Vec<String> {
    raw.split([',', '|'])
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Resolve the `hashes` field, expanding `all` to every engine download.
async fn selected_hashes(state: &AppState, form: &FormFields) -> Result<Vec<String>, ApiError> {
    let raw = form
        .non_empty("hashes")
        .ok_or_else(|| ApiError::BadRequest("Missing hashes parameter".to_string()))?;

    if raw.eq_ignore_ascii_case("all") {
        let downloads = state.engine().list_downloads().await?;
        return Ok(downloads
            .into_iter()
            .map(|d| d.infohash.to_lowercase())
            .collect());
    }

    Ok(parse_hashes(raw))
}

fn log_unmapped(view: &ClientTorrentView, raw_status: &str) {
    if view.state.is_unmapped() {
        warn!(
            "Engine status {:?} of {} has no client state",
            raw_status, view.hash
        );
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v2/torrents/info
///
/// With a category, only downloads filed under it; otherwise every engine
/// download with its local category.
pub async fn info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InfoParams>,
) -> Result<Json<Vec<ClientTorrentView>>, ApiError> {
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut views = Vec::new();

    match category {
        Some(category) => {
            let associations = state.store().list_torrents_by_category(category)?;
            if associations.is_empty() {
                return Ok(Json(views));
            }

            let downloads = state.engine().list_downloads().await?;
            let by_hash: HashMap<String, _> = downloads
                .iter()
                .map(|d| (d.infohash.to_lowercase(), d))
                .collect();

            // Associations whose download is gone from the engine are skipped.
            for association in &associations {
                if let Some(download) = by_hash.get(&association.hash) {
                    let view = state.mapper().view(download, Some(&association.category));
                    log_unmapped(&view, download.status.as_str());
                    views.push(view);
                }
            }
        }
        None => {
            let categories: HashMap<String, String> = state
                .store()
                .list_all_torrents()?
                .into_iter()
                .map(|t| (t.hash, t.category))
                .collect();

            for download in state.engine().list_downloads().await? {
                let category = categories
                    .get(&download.infohash.to_lowercase())
                    .map(String::as_str);
                let view = state.mapper().view(&download, category);
                log_unmapped(&view, download.status.as_str());
                views.push(view);
            }
        }
    }

    Ok(Json(views))
}

/// GET /api/v2/torrents/properties
pub async fn properties(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashParams>,
) -> Result<Json<TorrentProperties>, ApiError> {
    let hash = params.require()?;
    let download = state.engine().get_download(&hash).await?;
    Ok(Json(mapper::to_client_properties(&download)))
}

/// GET /api/v2/torrents/files
pub async fn files(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashParams>,
) -> Result<Json<Vec<ClientFile>>, ApiError> {
    let hash = params.require()?;
    let files = state.engine().list_files(&hash).await?;
    Ok(Json(mapper::to_client_files(&files)))
}

/// POST /api/v2/torrents/add
///
/// Only the first URL is submitted. The download is kept even if the
/// association cannot be written; the next reconciliation files it under the
/// default category.
pub async fn add(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<SuccessResponse>, ApiError> {
    let uri = form
        .get("urls")
        .and_then(|urls| urls.lines().map(str::trim).find(|l| !l.is_empty()))
        .ok_or_else(|| ApiError::BadRequest("Missing urls parameter".to_string()))?
        .to_string();

    let category = form
        .non_empty("category")
        .unwrap_or(state.default_category())
        .to_string();

    let hash = state.engine().add_download(&uri).await?;
    info!("Added {} to engine under category {}", hash, category);

    let store = state.store();
    let persisted = store
        .add_category(&category, state.download_dir())
        .and_then(|_| store.add_torrent(&hash, &category));
    if let Err(e) = persisted {
        warn!("Failed to record category of {}: {}", hash, e);
    }

    Ok(SuccessResponse::new("Torrent added"))
}

/// POST /api/v2/torrents/delete
///
/// A hash the engine no longer knows still has its association removed.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<SuccessResponse>, ApiError> {
    let delete_files = form.flag("deleteFiles");
    let hashes = selected_hashes(&state, &form).await?;

    for hash in &hashes {
        match state.engine().delete_download(hash, delete_files).await {
            Ok(()) => {}
            Err(EngineError::NotFound(_)) => {
                warn!("Download {} already gone from engine", hash);
            }
            Err(e) => return Err(e.into()),
        }
        state.store().delete_torrent(hash)?;
        info!("Deleted {} (files removed: {})", hash, delete_files);
    }

    Ok(SuccessResponse::new("Torrent deleted"))
}

async fn apply_state(
    state: &AppState,
    form: &FormFields,
    run_state: RunState,
) -> Result<(), ApiError> {
    for hash in selected_hashes(state, form).await? {
        state.engine().set_state(&hash, run_state).await?;
    }
    Ok(())
}

/// POST /api/v2/torrents/pause (also `stop`)
pub async fn pause(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<SuccessResponse>, ApiError> {
    apply_state(&state, &form, RunState::Stop).await?;
    Ok(SuccessResponse::new("Torrent paused"))
}

/// POST /api/v2/torrents/resume (also `start`)
pub async fn resume(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<SuccessResponse>, ApiError> {
    apply_state(&state, &form, RunState::Resume).await?;
    Ok(SuccessResponse::new("Torrent resumed"))
}

/// POST /api/v2/torrents/recheck
pub async fn recheck(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<SuccessResponse>, ApiError> {
    apply_state(&state, &form, RunState::Recheck).await?;
    Ok(SuccessResponse::new("Torrent rechecking"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hashes() {
        assert_eq!(parse_hashes("abc"), vec!["abc"]);
        assert_eq!(parse_hashes("ABC,def"), vec!["abc", "def"]);
        assert_eq!(parse_hashes("abc|def| ghi "), vec!["abc", "def", "ghi"]);
        assert!(parse_hashes(",|").is_empty());
    }

    #[test]
    fn test_hash_params_require() {
        let missing = HashParams { hash: None };
        assert!(matches!(missing.require(), Err(ApiError::BadRequest(_))));

        let blank = HashParams {
            hash: Some("  ".to_string()),
        };
        assert!(blank.require().is_err());

        let present = HashParams {
            hash: Some("abc".to_string()),
        };
        assert_eq!(present.require().unwrap(), "abc");
    }
}
