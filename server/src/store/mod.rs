//! Place persistence.
//!
//! # Design
//! `PlaceRepository` is the seam between handlers and storage. The plain
//! `*_by_id` operations do no authorization and rely on the caller having
//! checked ownership. The `*_owned` variants perform the check and the
//! mutation as one step ("where id = X and owner = Y"), so a record deleted
//! or re-owned between a handler's fetch and its write is never mutated.

use async_trait::async_trait;
use thiserror::Error;

use places_core::{OwnerId, Place, PlaceDraft, PlaceId, PlacePatch};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryPlaceStore;
pub use sqlite::SqlitePlaceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("place {0} not found")]
    NotFound(PlaceId),

    #[error("place {0} belongs to another user")]
    Forbidden(PlaceId),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// Inserts a new document owned by `owner`.
    async fn create(&self, owner: &OwnerId, draft: PlaceDraft) -> Result<Place, StoreError>;

    /// All documents of `owner`, in insertion order.
    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Place>, StoreError>;

    async fn find_by_id(&self, id: PlaceId) -> Result<Place, StoreError>;

    async fn update_by_id(&self, id: PlaceId, patch: PlacePatch) -> Result<Place, StoreError>;

    async fn delete_by_id(&self, id: PlaceId) -> Result<(), StoreError>;

    /// Applies `patch` only if the stored owner is `owner`.
    async fn update_owned(&self, id: PlaceId, owner: &OwnerId, patch: PlacePatch) -> Result<Place, StoreError>;

    /// Deletes only if the stored owner is `owner`.
    async fn delete_owned(&self, id: PlaceId, owner: &OwnerId) -> Result<(), StoreError>;
}
