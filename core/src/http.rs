//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe catalog requests and responses as plain data. The
//! core builds `HttpRequest` values and parses `HttpResponse` values; the
//! caller executes the actual I/O with whatever client it runs on. Catalog
//! calls are always `GET`, so the request carries no method or body.

/// An outbound catalog request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// A response described as plain data, constructed by the caller after
/// executing an `HttpRequest`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
