//! Domain types and the catalog client core for the places service.
//!
//! # Overview
//! Holds the `Place` document model with its input normalization rules, and
//! a stateless client for the third-party countries API that builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network (host-does-IO pattern). The server crate executes the round-trip.
//!
//! # Design
//! - `CatalogClient` holds only its two endpoint URLs.
//! - Each catalog operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the parsing rules are testable against vectors.
//! - `PlaceInput` is the only way client payloads become documents. It strips
//!   identity fields and normalizes the status flags, so ownership can only be
//!   assigned from a session.

pub mod client;
pub mod error;
pub mod http;
pub mod place;
pub mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, InputError};
pub use http::{HttpRequest, HttpResponse};
pub use place::{truthy, OwnerId, Place, PlaceDraft, PlaceFlags, PlaceId, PlaceInput, PlacePatch};
pub use types::Country;
