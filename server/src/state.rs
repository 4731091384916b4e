use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use places_core::CatalogClient;

use crate::{
    catalog::{Catalog, HttpCatalog},
    config::Config,
    store::{InMemoryPlaceStore, PlaceRepository, SqlitePlaceStore, StoreError},
    views::{JsonViews, ViewRenderer},
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not build catalog client: {0}")]
    Catalog(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlaceRepository>,
    pub catalog: Arc<dyn Catalog>,
    pub views: Arc<dyn ViewRenderer>,
}

impl AppState {
    pub fn new(
        places: Arc<dyn PlaceRepository>,
        catalog: Arc<dyn Catalog>,
        views: Arc<dyn ViewRenderer>,
    ) -> Self {
        Self { places, catalog, views }
    }

    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let places: Arc<dyn PlaceRepository> = match &config.database_path {
            Some(path) => Arc::new(SqlitePlaceStore::open(path)?),
            None => {
                info!("PLACES_DB not set, keeping places in memory");
                Arc::new(InMemoryPlaceStore::new())
            }
        };

        let client = CatalogClient::new(&config.country_api_url, &config.by_name_base_url);
        let catalog = Arc::new(HttpCatalog::new(client, config.catalog_timeout)?);

        Ok(Self::new(places, catalog, Arc::new(JsonViews)))
    }
}
