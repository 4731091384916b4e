//! Request identity.
//!
//! The session is owned by an external provider. This crate only reads a
//! `Session` from request extensions; a request without one is anonymous.
//! `header_session` is a provider for deployments behind an authenticating
//! proxy that forwards the user in `x-user-id` / `x-username`.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use places_core::OwnerId;

use crate::error::PlaceError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USERNAME_HEADER: &str = "x-username";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: Option<String>,
    pub logged_in: bool,
    pub user_id: Option<OwnerId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: OwnerId, username: Option<String>) -> Self {
        Self {
            username,
            logged_in: true,
            user_id: Some(user_id),
        }
    }

    /// The owner identity for mutating handlers.
    pub fn require_user(&self) -> Result<&OwnerId, PlaceError> {
        match (&self.user_id, self.logged_in) {
            (Some(id), true) => Ok(id),
            _ => Err(PlaceError::Unauthenticated),
        }
    }

    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(OwnerId::parse)?;
        let username = headers
            .get(USERNAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Some(Self::authenticated(user_id, username))
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().cloned().unwrap_or_default())
    }
}

pub async fn header_session(mut req: Request, next: Next) -> Response {
    if let Some(session) = Session::from_headers(req.headers()) {
        req.extensions_mut().insert(session);
    }
    next.run(req).await
}
