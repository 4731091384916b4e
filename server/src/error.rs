//! The error boundary for place handlers.
//!
//! Handlers return `Result<Response, PlaceError>`. `PlaceError` renders as a
//! status code with a JSON body and also tags the response with an
//! `ErrorReport`. When the app runs in `ErrorMode::Redirect`, the
//! `error_boundary` middleware swaps any tagged response for a redirect to
//! the shared error page.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use places_core::InputError;

use crate::catalog::UpstreamError;
use crate::config::ErrorMode;
use crate::store::StoreError;

pub const ERROR_PAGE: &str = "/error";

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("place {0} not found")]
    NotFound(String),

    #[error("invalid place: {0}")]
    Validation(String),

    #[error("you are not allowed to {action} this place")]
    Forbidden { action: &'static str },

    #[error("you must be logged in")]
    Unauthenticated,

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("could not render view: {0}")]
    Render(#[from] serde_json::Error),
}

impl PlaceError {
    pub fn kind(&self) -> &'static str {
        match self {
            PlaceError::Upstream(_) => "upstream",
            PlaceError::NotFound(_) => "not_found",
            PlaceError::Validation(_) => "validation",
            PlaceError::Forbidden { .. } => "forbidden",
            PlaceError::Unauthenticated => "unauthenticated",
            PlaceError::Storage(_) => "storage",
            PlaceError::Render(_) => "render",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PlaceError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PlaceError::NotFound(_) => StatusCode::NOT_FOUND,
            PlaceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PlaceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            PlaceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PlaceError::Storage(_) | PlaceError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InputError> for PlaceError {
    fn from(e: InputError) -> Self {
        PlaceError::Validation(e.to_string())
    }
}

impl From<StoreError> for PlaceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => PlaceError::NotFound(id.to_string()),
            StoreError::Forbidden(_) => PlaceError::Forbidden { action: "modify" },
            StoreError::Backend(msg) => PlaceError::Storage(msg),
        }
    }
}

/// Marker left on error responses for the boundary middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
}

impl IntoResponse for PlaceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = self.to_string();

        if status.is_server_error() {
            error!(kind, error = %message, "request failed");
        } else {
            warn!(kind, error = %message, "request rejected");
        }

        let mut response = (
            status,
            Json(json!({ "error": { "kind": kind, "message": message } })),
        )
            .into_response();
        response.extensions_mut().insert(ErrorReport { kind, message });
        response
    }
}

/// `/error?error=<percent-encoded message>`
pub fn error_page_location(message: &str) -> String {
    format!("{ERROR_PAGE}?error={}", utf8_percent_encode(message, NON_ALPHANUMERIC))
}

pub async fn error_boundary(State(mode): State<ErrorMode>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if mode != ErrorMode::Redirect {
        return response;
    }
    match response.extensions().get::<ErrorReport>() {
        Some(report) => Redirect::to(&error_page_location(&report.message)).into_response(),
        None => response,
    }
}
