//! Place handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::{parse_id, payload, MessageResponse};
use crate::app::{CreatePlace, UpdatePlace};
use crate::domain::entities::{Place, PlaceDetails, PlaceId, Review};
use crate::domain::Actor;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListPlacesQuery {
    /// Exact title match
    pub title: Option<String>,
}

/// GET /places
pub async fn list_places(
    State(state): State<AppState>,
    Query(query): Query<ListPlacesQuery>,
) -> Result<Json<Vec<Place>>, AppError> {
    let places = match query.title {
        Some(title) => state.catalog.places.with_title(&title).await?,
        None => state.catalog.places.list().await?,
    };
    Ok(Json(places))
}

/// GET /places/:id
///
/// The place with its owner, amenities and reviews expanded.
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaceDetails>, AppError> {
    let id: PlaceId = parse_id(&id, "Place")?;
    Ok(Json(state.catalog.places.details(&id).await?))
}

/// GET /places/:id/reviews
pub async fn place_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let id: PlaceId = parse_id(&id, "Place")?;
    Ok(Json(state.catalog.reviews.of_place(&id).await?))
}

/// POST /places
///
/// The owner defaults to the caller; only admins may name someone else.
pub async fn create_place(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreatePlace>, JsonRejection>,
) -> Result<(StatusCode, Json<Place>), AppError> {
    let input = payload(body)?;
    let place = state.catalog.places.create(Some(&actor), input).await?;
    Ok((StatusCode::CREATED, Json(place)))
}

/// PUT /places/:id
pub async fn update_place(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdatePlace>, JsonRejection>,
) -> Result<Json<Place>, AppError> {
    let id: PlaceId = parse_id(&id, "Place")?;
    let input = payload(body)?;
    Ok(Json(
        state.catalog.places.update(Some(&actor), &id, input).await?,
    ))
}

/// DELETE /places/:id
///
/// Removes the place and every review written about it.
pub async fn delete_place(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id: PlaceId = parse_id(&id, "Place")?;
    state.catalog.places.delete(Some(&actor), &id).await?;
    Ok(MessageResponse::new("Place deleted successfully"))
}
