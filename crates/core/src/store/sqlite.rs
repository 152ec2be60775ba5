//! SQLite-backed association store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{AssociationStore, Category, Insertion, StoreError, TorrentAssociation};

/// SQLite-backed association store.
pub struct SqliteAssociationStore {
    conn: Mutex<Connection>,
}

impl SqliteAssociationStore {
    /// Open (or create) the database file and apply the schema.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        // Table and column names match databases created by earlier
        // deployments; the unique indexes are added on top of them.
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                savePath TEXT NOT NULL DEFAULT ''
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_category_name ON category(name);

            CREATE TABLE IF NOT EXISTS torrent (
                hash TEXT NOT NULL,
                category_id INTEGER NOT NULL REFERENCES category(id)
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_torrent_hash ON torrent(hash);
            CREATE INDEX IF NOT EXISTS idx_torrent_category ON torrent(category_id);
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection mutex poisoned".to_string()))
    }

    fn row_to_association(row: &rusqlite::Row) -> rusqlite::Result<TorrentAssociation> {
        Ok(TorrentAssociation {
            hash: row.get(0)?,
            category_id: row.get(1)?,
            category: row.get(2)?,
        })
    }

    fn collect_associations(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<TorrentAssociation>, StoreError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_association)?;

        let mut torrents = Vec::new();
        for row in rows {
            torrents.push(row?);
        }
        Ok(torrents)
    }
}

impl AssociationStore for SqliteAssociationStore {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, savePath FROM category ORDER BY name ASC")?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                save_path: row.get(2)?,
            })
        })?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, savePath FROM category WHERE name = ?",
                params![name],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        save_path: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    fn add_category(&self, name: &str, save_path: &str) -> Result<Insertion, StoreError> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO category (name, savePath) VALUES (?, ?)
             ON CONFLICT(name) DO NOTHING",
            params![name, save_path],
        )?;

        if inserted == 0 {
            debug!(category = name, "category already exists");
            Ok(Insertion::Existing)
        } else {
            debug!(category = name, save_path, "category created");
            Ok(Insertion::Created)
        }
    }

    fn list_torrents_by_category(
        &self,
        name: &str,
    ) -> Result<Vec<TorrentAssociation>, StoreError> {
        let conn = self.conn()?;
        Self::collect_associations(
            &conn,
            "SELECT t.hash, t.category_id, c.name
             FROM torrent AS t
             INNER JOIN category AS c ON t.category_id = c.id
             WHERE c.name = ?
             ORDER BY t.hash",
            params![name],
        )
    }

    fn list_all_torrents(&self) -> Result<Vec<TorrentAssociation>, StoreError> {
        let conn = self.conn()?;
        Self::collect_associations(
            &conn,
            "SELECT t.hash, t.category_id, COALESCE(c.name, '')
             FROM torrent AS t
             LEFT JOIN category AS c ON t.category_id = c.id
             ORDER BY t.hash",
            [],
        )
    }

    fn add_torrent(&self, hash: &str, category: &str) -> Result<Insertion, StoreError> {
        let hash = hash.to_lowercase();
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let category_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM category WHERE name = ?",
                params![category],
                |row| row.get(0),
            )
            .optional()?;

        // Dropping the transaction rolls it back.
        let Some(category_id) = category_id else {
            return Err(StoreError::CategoryNotFound(category.to_string()));
        };

        let inserted = tx.execute(
            "INSERT INTO torrent (hash, category_id) VALUES (?, ?)
             ON CONFLICT(hash) DO NOTHING",
            params![&hash, category_id],
        )?;
        tx.commit()?;

        if inserted == 0 {
            Ok(Insertion::Existing)
        } else {
            Ok(Insertion::Created)
        }
    }

    fn delete_torrent(&self, hash: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM torrent WHERE hash = ?",
            params![hash.to_lowercase()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn create_test_store() -> SqliteAssociationStore {
        SqliteAssociationStore::in_memory().unwrap()
    }

    fn torrent_count(store: &SqliteAssociationStore) -> i64 {
        let conn = store.conn().unwrap();
        conn.query_row("SELECT COUNT(*) FROM torrent", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_list_categories_empty() {
        let store = create_test_store();
        assert!(store.list_categories().unwrap().is_empty());
    }

    #[test]
    fn test_list_categories_ordered_by_name() {
        let store = create_test_store();
        store.add_category("tv", "/data/tv").unwrap();
        store.add_category("books", "/data/books").unwrap();
        store.add_category("movies", "/data/movies").unwrap();

        let names: Vec<String> = store
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["books", "movies", "tv"]);
    }

    #[test]
    fn test_add_category_is_idempotent() {
        let store = create_test_store();

        assert_eq!(
            store.add_category("movies", "/data/movies").unwrap(),
            Insertion::Created
        );
        assert_eq!(
            store.add_category("movies", "/elsewhere").unwrap(),
            Insertion::Existing
        );

        let categories = store.list_categories().unwrap();
        assert_eq!(categories.len(), 1);
        // The first save path wins.
        assert_eq!(categories[0].save_path, "/data/movies");
    }

    #[test]
    fn test_add_category_concurrently_creates_one_row() {
        let store = Arc::new(create_test_store());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .add_category("racy", &format!("/data/{}", i))
                        .unwrap()
                })
            })
            .collect();

        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Insertion::is_created)
            .count();

        assert_eq!(created, 1);
        assert_eq!(store.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_find_category() {
        let store = create_test_store();
        store.add_category("books", "/data/books").unwrap();

        let found = store.find_category("books").unwrap().unwrap();
        assert_eq!(found.name, "books");
        assert_eq!(found.save_path, "/data/books");
        assert!(store.find_category("music").unwrap().is_none());
    }

    #[test]
    fn test_add_torrent_missing_category_writes_nothing() {
        let store = create_test_store();

        let result = store.add_torrent("abc123", "nonexistent");
        assert!(matches!(result, Err(StoreError::CategoryNotFound(ref name)) if name == "nonexistent"));
        assert_eq!(torrent_count(&store), 0);
        assert!(store.list_all_torrents().unwrap().is_empty());
    }

    #[test]
    fn test_add_torrent_duplicate_hash_keeps_first_category() {
        let store = create_test_store();
        store.add_category("movies", "/data/movies").unwrap();
        store.add_category("tv", "/data/tv").unwrap();

        assert_eq!(store.add_torrent("abc123", "movies").unwrap(), Insertion::Created);
        assert_eq!(store.add_torrent("abc123", "tv").unwrap(), Insertion::Existing);

        let all = store.list_all_torrents().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category, "movies");
    }

    #[test]
    fn test_hash_is_stored_lowercase() {
        let store = create_test_store();
        store.add_category("movies", "/data/movies").unwrap();
        store.add_torrent("ABC123", "movies").unwrap();

        let all = store.list_all_torrents().unwrap();
        assert_eq!(all[0].hash, "abc123");

        store.delete_torrent("ABC123").unwrap();
        assert!(store.list_all_torrents().unwrap().is_empty());
    }

    #[test]
    fn test_list_torrents_by_category_filters() {
        let store = create_test_store();
        store.add_category("movies", "/data/movies").unwrap();
        store.add_category("tv", "/data/tv").unwrap();
        store.add_torrent("aaa", "movies").unwrap();
        store.add_torrent("bbb", "tv").unwrap();
        store.add_torrent("ccc", "movies").unwrap();

        let movies = store.list_torrents_by_category("movies").unwrap();
        let hashes: Vec<&str> = movies.iter().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes, vec!["aaa", "ccc"]);
        assert!(movies.iter().all(|t| t.category == "movies"));
    }

    #[test]
    fn test_list_torrents_by_unused_category_is_empty() {
        let store = create_test_store();
        store.add_category("movies", "/data/movies").unwrap();

        assert!(store.list_torrents_by_category("movies").unwrap().is_empty());
        assert!(store.list_torrents_by_category("unknown").unwrap().is_empty());
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let store = create_test_store();
        assert!(store.delete_torrent("does-not-exist").is_ok());
    }

    #[test]
    fn test_books_lifecycle() {
        let store = create_test_store();
        store.add_category("books", "/data/books").unwrap();
        store.add_torrent("abc123", "books").unwrap();

        let books = store.list_torrents_by_category("books").unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].hash, "abc123");

        store.delete_torrent("abc123").unwrap();
        assert!(store.list_torrents_by_category("books").unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shim.db");

        {
            let store = SqliteAssociationStore::new(&path).unwrap();
            store.add_category("books", "/data/books").unwrap();
            store.add_torrent("abc123", "books").unwrap();
        }

        let reopened = SqliteAssociationStore::new(&path).unwrap();
        let all = reopened.list_all_torrents().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category, "books");
    }
}
