//! Category endpoints backed by the association store.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use super::{ApiError, FormFields, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(rename = "savePath")]
    pub save_path: String,
}

/// GET /api/v2/torrents/categories
///
/// Categories keyed by name.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, CategoryEntry>>, ApiError> {
    let categories = state
        .store()
        .list_categories()?
        .into_iter()
        .map(|c| {
            (
                c.name.clone(),
                CategoryEntry {
                    name: c.name,
                    save_path: c.save_path,
                },
            )
        })
        .collect();

    Ok(Json(categories))
}

/// POST /api/v2/torrents/createCategory
///
/// Creating an existing category succeeds and keeps its save path.
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<SuccessResponse>, ApiError> {
    let name = form
        .non_empty("category")
        .ok_or_else(|| ApiError::BadRequest("Missing category parameter".to_string()))?;
    let save_path = form.non_empty("savePath").unwrap_or(state.download_dir());

    if state.store().add_category(name, save_path)?.is_created() {
        info!("Created category {} at {}", name, save_path);
        Ok(SuccessResponse::new("Category created"))
    } else {
        Ok(SuccessResponse::new("Category already exists"))
    }
}
