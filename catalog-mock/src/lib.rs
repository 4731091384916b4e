//! In-process stand-in for the public countries API.
//!
//! Serves a small fixed catalog with the same shapes the real API uses:
//! `GET /all` returns every country, `GET /name/{name}` returns the countries
//! whose common or official name contains the fragment (case-insensitive),
//! or `404` with an error object when nothing matches.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub type Catalog = Arc<Vec<Value>>;

/// The fixture served by `app()`.
pub fn sample_countries() -> Vec<Value> {
    vec![
        json!({
            "name": {"common": "Peru", "official": "Republic of Peru"},
            "cca2": "PE",
            "capital": ["Lima"],
            "region": "Americas",
            "population": 32971846
        }),
        json!({
            "name": {"common": "Niger", "official": "Republic of Niger"},
            "cca2": "NE",
            "capital": ["Niamey"],
            "region": "Africa",
            "population": 24206636
        }),
        json!({
            "name": {"common": "Nigeria", "official": "Federal Republic of Nigeria"},
            "cca2": "NG",
            "capital": ["Abuja"],
            "region": "Africa",
            "population": 206139587
        }),
        json!({
            "name": {"common": "Iceland", "official": "Iceland"},
            "cca2": "IS",
            "capital": ["Reykjavik"],
            "region": "Europe",
            "population": 366425
        }),
    ]
}

pub fn app() -> Router {
    app_with(sample_countries())
}

pub fn app_with(countries: Vec<Value>) -> Router {
    let catalog: Catalog = Arc::new(countries);
    Router::new()
        .route("/all", get(list_all))
        .route("/name/{name}", get(find_by_name))
        .route("/unavailable", get(unavailable))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_all(State(catalog): State<Catalog>) -> Json<Vec<Value>> {
    Json(catalog.as_ref().clone())
}

async fn find_by_name(State(catalog): State<Catalog>, Path(name): Path<String>) -> Response {
    let needle = name.to_lowercase();
    let matches: Vec<Value> = catalog
        .iter()
        .filter(|country| {
            ["common", "official"].iter().any(|key| {
                country["name"][key]
                    .as_str()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status": 404, "message": "Not Found"})),
        )
            .into_response();
    }
    Json(matches).into_response()
}

async fn unavailable() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "catalog unavailable")
}
