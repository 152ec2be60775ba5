//! Local association store.
//!
//! The remote engine has no notion of categories, so the category each
//! download was filed under is kept here, keyed by infohash.

mod sqlite;
mod types;

pub use sqlite::SqliteAssociationStore;
pub use types::*;

/// Trait for association storage.
pub trait AssociationStore: Send + Sync {
    /// All categories, ordered by name.
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Look up a category by name.
    fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError>;

    /// Create a category.
    ///
    /// Idempotent: if the name exists the call succeeds with
    /// [`Insertion::Existing`] and the stored save path is kept.
    fn add_category(&self, name: &str, save_path: &str) -> Result<Insertion, StoreError>;

    /// Associations whose category has the given name.
    fn list_torrents_by_category(&self, name: &str)
        -> Result<Vec<TorrentAssociation>, StoreError>;

    /// Every association.
    fn list_all_torrents(&self) -> Result<Vec<TorrentAssociation>, StoreError>;

    /// File a hash under an existing category.
    ///
    /// Fails with [`StoreError::CategoryNotFound`] without writing anything if
    /// the category is missing. A hash that is already associated is left as
    /// is and reported as [`Insertion::Existing`].
    fn add_torrent(&self, hash: &str, category: &str) -> Result<Insertion, StoreError>;

    /// Forget a hash. Unknown hashes are ignored.
    fn delete_torrent(&self, hash: &str) -> Result<(), StoreError>;
}
