use async_trait::async_trait;
use tokio::sync::RwLock;

use places_core::{OwnerId, Place, PlaceDraft, PlaceId, PlacePatch};

use super::{PlaceRepository, StoreError};

/// Process-local store. A `Vec` keeps insertion order for owner listings.
#[derive(Debug, Default)]
pub struct InMemoryPlaceStore {
    places: RwLock<Vec<Place>>,
}

impl InMemoryPlaceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaceRepository for InMemoryPlaceStore {
    async fn create(&self, owner: &OwnerId, draft: PlaceDraft) -> Result<Place, StoreError> {
        let place = Place::new(owner.clone(), draft);
        self.places.write().await.push(place.clone());
        Ok(place)
    }

    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Place>, StoreError> {
        let places = self.places.read().await;
        Ok(places.iter().filter(|p| p.is_owned_by(owner)).cloned().collect())
    }

    async fn find_by_id(&self, id: PlaceId) -> Result<Place, StoreError> {
        let places = self.places.read().await;
        places
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_by_id(&self, id: PlaceId, patch: PlacePatch) -> Result<Place, StoreError> {
        let mut places = self.places.write().await;
        let place = places
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        place.apply(patch);
        Ok(place.clone())
    }

    async fn delete_by_id(&self, id: PlaceId) -> Result<(), StoreError> {
        let mut places = self.places.write().await;
        let index = places
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        places.remove(index);
        Ok(())
    }

    async fn update_owned(&self, id: PlaceId, owner: &OwnerId, patch: PlacePatch) -> Result<Place, StoreError> {
        let mut places = self.places.write().await;
        let place = places
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        if !place.is_owned_by(owner) {
            return Err(StoreError::Forbidden(id));
        }
        place.apply(patch);
        Ok(place.clone())
    }

    async fn delete_owned(&self, id: PlaceId, owner: &OwnerId) -> Result<(), StoreError> {
        let mut places = self.places.write().await;
        let index = places
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        if !places[index].is_owned_by(owner) {
            return Err(StoreError::Forbidden(id));
        }
        places.remove(index);
        Ok(())
    }
}
