//! SQLite-backed document store.
//!
//! Each place is stored as a JSON document next to indexed `id` and `owner`
//! columns. `seq` preserves insertion order. rusqlite is blocking, so every
//! call runs on the blocking pool while holding the connection mutex.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use places_core::{OwnerId, Place, PlaceDraft, PlaceId, PlacePatch};

use super::{PlaceRepository, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS places (
    seq   INTEGER PRIMARY KEY AUTOINCREMENT,
    id    TEXT NOT NULL UNIQUE,
    owner TEXT NOT NULL,
    doc   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS places_owner ON places (owner);
";

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Backend(format!("corrupt document: {e}"))
    }
}

#[derive(Debug, Clone)]
pub struct SqlitePlaceStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePlaceStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!(path = %path.display(), "opening place database");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("storage task failed: {e}")))?
    }
}

fn load(conn: &Connection, id: PlaceId) -> Result<Place, StoreError> {
    let doc: Option<String> = conn
        .query_row("SELECT doc FROM places WHERE id = ?1", params![id.to_string()], |row| row.get(0))
        .optional()?;
    let doc = doc.ok_or(StoreError::NotFound(id))?;
    Ok(serde_json::from_str(&doc)?)
}

fn save(conn: &Connection, place: &Place) -> Result<(), StoreError> {
    let doc = serde_json::to_string(place)?;
    conn.execute(
        "UPDATE places SET doc = ?1 WHERE id = ?2 AND owner = ?3",
        params![doc, place.id.to_string(), place.owner.as_str()],
    )?;
    Ok(())
}

#[async_trait]
impl PlaceRepository for SqlitePlaceStore {
    async fn create(&self, owner: &OwnerId, draft: PlaceDraft) -> Result<Place, StoreError> {
        let place = Place::new(owner.clone(), draft);
        self.blocking(move |conn| {
            let doc = serde_json::to_string(&place)?;
            conn.execute(
                "INSERT INTO places (id, owner, doc) VALUES (?1, ?2, ?3)",
                params![place.id.to_string(), place.owner.as_str(), doc],
            )?;
            debug!(place_id = %place.id, "inserted place");
            Ok(place)
        })
        .await
    }

    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Place>, StoreError> {
        let owner = owner.clone();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare("SELECT doc FROM places WHERE owner = ?1 ORDER BY seq")?;
            let docs = stmt
                .query_map(params![owner.as_str()], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            docs.iter()
                .map(|doc| serde_json::from_str(doc).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    async fn find_by_id(&self, id: PlaceId) -> Result<Place, StoreError> {
        self.blocking(move |conn| load(conn, id)).await
    }

    async fn update_by_id(&self, id: PlaceId, patch: PlacePatch) -> Result<Place, StoreError> {
        self.blocking(move |conn| {
            let tx = conn.transaction()?;
            let mut place = load(&tx, id)?;
            place.apply(patch);
            save(&tx, &place)?;
            tx.commit()?;
            Ok(place)
        })
        .await
    }

    async fn delete_by_id(&self, id: PlaceId) -> Result<(), StoreError> {
        self.blocking(move |conn| {
            let removed = conn.execute("DELETE FROM places WHERE id = ?1", params![id.to_string()])?;
            if removed == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn update_owned(&self, id: PlaceId, owner: &OwnerId, patch: PlacePatch) -> Result<Place, StoreError> {
        let owner = owner.clone();
        self.blocking(move |conn| {
            let tx = conn.transaction()?;
            let mut place = load(&tx, id)?;
            if !place.is_owned_by(&owner) {
                return Err(StoreError::Forbidden(id));
            }
            place.apply(patch);
            save(&tx, &place)?;
            tx.commit()?;
            Ok(place)
        })
        .await
    }

    async fn delete_owned(&self, id: PlaceId, owner: &OwnerId) -> Result<(), StoreError> {
        let owner = owner.clone();
        self.blocking(move |conn| {
            let removed = conn.execute(
                "DELETE FROM places WHERE id = ?1 AND owner = ?2",
                params![id.to_string(), owner.as_str()],
            )?;
            if removed > 0 {
                return Ok(());
            }
            let exists: Option<i64> = conn
                .query_row("SELECT seq FROM places WHERE id = ?1", params![id.to_string()], |row| row.get(0))
                .optional()?;
            match exists {
                Some(_) => Err(StoreError::Forbidden(id)),
                None => Err(StoreError::NotFound(id)),
            }
        })
        .await
    }
}
