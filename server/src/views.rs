//! View rendering seam.
//!
//! Templates live outside this crate. Handlers hand a view name and a data
//! bag to a `ViewRenderer`; the default `JsonViews` answers with the bag as
//! JSON so a separate front end can render it.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::session::Session;

pub const INDEX: &str = "places/index";
pub const MINE: &str = "places/mine";
pub const MY_SHOW: &str = "places/myShow";
pub const SHOW: &str = "places/show";
pub const ERROR: &str = "error";

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, bag: Value) -> Response;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViews;

impl ViewRenderer for JsonViews {
    fn render(&self, view: &str, bag: Value) -> Response {
        Json(json!({ "view": view, "data": bag })).into_response()
    }
}

/// `{ <key>: value, username, loggedIn, userId }`
pub fn bag<T: Serialize>(session: &Session, key: &str, value: &T) -> Result<Value, serde_json::Error> {
    let mut fields = match serde_json::to_value(session)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    fields.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(Value::Object(fields))
}
