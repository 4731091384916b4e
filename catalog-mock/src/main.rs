//! Standalone mock catalog for local runs of the places server.
//!
//! `CATALOG_FIXTURE` may point at a JSON array of country objects to serve
//! instead of the built-in sample.

use std::{env, fs, io};

use serde_json::Value;
use tokio::net::TcpListener;

fn load_fixture() -> io::Result<Vec<Value>> {
    match env::var("CATALOG_FIXTURE") {
        Ok(path) => {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{path}: {e}")))
        }
        Err(_) => Ok(catalog_mock::sample_countries()),
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let countries = load_fixture()?;
    let port: u16 = match env::var("PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("PORT={raw}: {e}")))?,
        Err(_) => 4000,
    };
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let addr = listener.local_addr()?;

    println!("serving {} countries", countries.len());
    println!("COUNTRY_API_URL=http://{addr}/all");
    println!("C_BY_NAME_BASE_URL=http://{addr}/name/");
    axum::serve(listener, catalog_mock::app_with(countries)).await
}
