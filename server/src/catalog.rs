//! Remote catalog transport.
//!
//! `places_core::CatalogClient` decides what to send and how to read the
//! answer; `HttpCatalog` only moves bytes with reqwest. Handlers depend on
//! the `Catalog` trait so tests can substitute a fixed catalog.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use places_core::{CatalogClient, CatalogError, Country, HttpRequest, HttpResponse};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("could not reach the country catalog: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Country>, UpstreamError>;

    /// First country matching `name`, if any.
    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: CatalogClient,
    http: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(client: CatalogClient, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, http })
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        debug!(url = %req.url, "catalog request");
        let mut builder = self.http.get(&req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "catalog response");

        Ok(HttpResponse { status, headers, body })
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn list_all(&self) -> Result<Vec<Country>, UpstreamError> {
        let response = self.execute(self.client.build_list_all()).await?;
        Ok(self.client.parse_list_all(response)?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, UpstreamError> {
        let response = self.execute(self.client.build_find_by_name(name)).await?;
        Ok(self.client.parse_find_by_name(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn start_catalog() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(catalog_mock::run(listener));
        addr
    }

    fn catalog(list_all: String, by_name: String) -> HttpCatalog {
        HttpCatalog::new(CatalogClient::new(&list_all, &by_name), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn lists_and_searches_live_catalog() {
        let addr = start_catalog().await;
        let catalog = catalog(format!("http://{addr}/all"), format!("http://{addr}/name/"));

        let all = catalog.list_all().await.unwrap();
        assert_eq!(all.len(), 4);

        let found = catalog.find_by_name("ice").await.unwrap().unwrap();
        assert_eq!(found.common_name(), Some("Iceland"));

        assert!(catalog.find_by_name("atlantis").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upstream_status_is_an_error() {
        let addr = start_catalog().await;
        let catalog = catalog(format!("http://{addr}/unavailable"), format!("http://{addr}/name/"));

        let err = catalog.list_all().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Catalog(CatalogError::Http { status: 503, .. })));
    }

    #[tokio::test]
    async fn unreachable_catalog_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let catalog = catalog(format!("http://{addr}/all"), format!("http://{addr}/name/"));
        let err = catalog.list_all().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
    }
}
