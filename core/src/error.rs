//! Error types for the catalog client and payload normalization.
//!
//! # Design
//! Catalog failures keep the raw status and body so the server can log what
//! the upstream said. A `404` is not an error here: the countries API answers
//! unknown names with it, and callers treat that as "no match".

use thiserror::Error;

/// Errors returned by `CatalogClient` parse methods.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog returned a non-2xx status.
    #[error("catalog returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("catalog response could not be decoded: {0}")]
    Deserialization(String),
}

/// Errors raised while turning a client payload into a place document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("a place needs a name")]
    MissingName,

    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}
