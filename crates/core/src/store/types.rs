//! Types for the category/torrent association store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the association store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Category does not exist: {0}")]
    CategoryNotFound(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// A download category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "savePath")]
    pub save_path: String,
}

/// Link between an infohash and the category it was filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentAssociation {
    /// Info hash (lowercase hex).
    pub hash: String,
    pub category_id: i64,
    /// Resolved category name; empty if the category row is gone.
    pub category: String,
}

/// Outcome of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insertion {
    /// A new row was written.
    Created,
    /// A row with the same key already existed and was left untouched.
    Existing,
}

impl Insertion {
    pub fn is_created(&self) -> bool {
        matches!(self, Insertion::Created)
    }
}
