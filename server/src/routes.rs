//! Place resource handlers, mounted at `/places`.

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use places_core::{PlaceId, PlaceInput};

use crate::{error::PlaceError, session::Session, state::AppState, views};

pub const MOUNT: &str = "/places";

/// The name route is registered last so it never shadows the fixed paths.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(all_countries))
        .route("/add", post(add_place))
        .route("/mine", get(my_places))
        .route("/mine/{id}", get(my_place))
        .route("/update/{id}", put(update_place).post(update_place_form))
        .route("/delete/{id}", delete(delete_place).post(delete_place_form))
        .route("/{name}", get(country_by_name))
}

/// A place payload from either an HTML form or a JSON body.
pub struct PlaceForm(pub PlaceInput);

impl<S> FromRequest<S> for PlaceForm
where
    S: Send + Sync,
{
    type Rejection = PlaceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(fields) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| PlaceError::Validation(e.body_text()))?;
            Ok(Self(PlaceInput::from_json(fields)))
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| PlaceError::Validation(e.body_text()))?;
            Ok(Self(PlaceInput::from_form(pairs)))
        }
    }
}

fn parse_id(raw: &str) -> Result<PlaceId, PlaceError> {
    raw.parse().map_err(|_| PlaceError::NotFound(raw.to_string()))
}

fn check_override(input: &PlaceInput, expected: &str) -> Result<(), PlaceError> {
    match input.method_override() {
        Some(method) if method.eq_ignore_ascii_case(expected) => Ok(()),
        other => Err(PlaceError::Validation(format!(
            "expected _method={expected}, got {}",
            other.unwrap_or("nothing")
        ))),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

async fn all_countries(State(state): State<AppState>, session: Session) -> Result<Response, PlaceError> {
    let countries = state.catalog.list_all().await?;
    info!(count = countries.len(), "fetched catalog");
    Ok(state.views.render(views::INDEX, views::bag(&session, "places", &countries)?))
}

/// Renders with `place: null` when nothing matches.
async fn country_by_name(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<Response, PlaceError> {
    let found = state.catalog.find_by_name(&name).await?;
    if found.is_none() {
        info!(%name, "no catalog match");
    }
    Ok(state.views.render(views::SHOW, views::bag(&session, "place", &found)?))
}

// ---------------------------------------------------------------------------
// Saved places
// ---------------------------------------------------------------------------

async fn add_place(
    State(state): State<AppState>,
    session: Session,
    PlaceForm(input): PlaceForm,
) -> Result<Response, PlaceError> {
    let owner = session.require_user()?;
    let place = state.places.create(owner, input.into_draft()?).await?;
    info!(place_id = %place.id, %owner, "place added");
    Ok(Redirect::to(&format!("{MOUNT}/mine")).into_response())
}

async fn my_places(State(state): State<AppState>, session: Session) -> Result<Response, PlaceError> {
    let owner = session.require_user()?;
    let places = state.places.find_by_owner(owner).await?;
    Ok(state.views.render(views::MINE, views::bag(&session, "places", &places)?))
}

// No ownership check: any session may view a place by id.
async fn my_place(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, PlaceError> {
    let place = state.places.find_by_id(parse_id(&id)?).await?;
    Ok(state.views.render(views::MY_SHOW, views::bag(&session, "place", &place)?))
}

async fn update_place(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    PlaceForm(input): PlaceForm,
) -> Result<Response, PlaceError> {
    let owner = session.require_user()?;
    let patch = input.into_patch()?;
    let id = parse_id(&id)?;

    let existing = state.places.find_by_id(id).await?;
    if !existing.is_owned_by(owner) {
        warn!(place_id = %id, %owner, "update by non-owner refused");
        return Err(PlaceError::Forbidden { action: "update" });
    }

    state.places.update_owned(id, owner, patch).await?;
    info!(place_id = %id, "place updated");
    Ok(Redirect::to(&format!("{MOUNT}/mine/{id}")).into_response())
}

async fn update_place_form(
    state: State<AppState>,
    session: Session,
    id: Path<String>,
    PlaceForm(input): PlaceForm,
) -> Result<Response, PlaceError> {
    check_override(&input, "PUT")?;
    update_place(state, session, id, PlaceForm(input)).await
}

async fn delete_place(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, PlaceError> {
    let owner = session.require_user()?;
    let id = parse_id(&id)?;

    let existing = state.places.find_by_id(id).await?;
    if !existing.is_owned_by(owner) {
        warn!(place_id = %id, %owner, "delete by non-owner refused");
        return Err(PlaceError::Forbidden { action: "delete" });
    }

    state.places.delete_owned(id, owner).await?;
    info!(place_id = %id, "place deleted");
    Ok(Redirect::to(&format!("{MOUNT}/mine")).into_response())
}

async fn delete_place_form(
    state: State<AppState>,
    session: Session,
    id: Path<String>,
    PlaceForm(input): PlaceForm,
) -> Result<Response, PlaceError> {
    check_override(&input, "DELETE")?;
    delete_place(state, session, id).await
}

// ---------------------------------------------------------------------------
// Error page
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    error: Option<String>,
}

pub async fn error_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ErrorQuery>,
) -> Result<Response, PlaceError> {
    let message = query.error.unwrap_or_else(|| "something went wrong".to_string());
    Ok(state.views.render(views::ERROR, views::bag(&session, "error", &message)?))
}
