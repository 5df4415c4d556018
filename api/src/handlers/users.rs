//! User handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use super::{parse_id, payload};
use crate::app::UpdateUser;
use crate::domain::entities::{Place, Review, User, UserId};
use crate::domain::Actor;
use crate::error::AppError;
use crate::AppState;

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.catalog.users.list().await?))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id: UserId = parse_id(&id, "User")?;
    Ok(Json(state.catalog.users.get(&id).await?))
}

/// GET /users/:id/places
pub async fn user_places(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Place>>, AppError> {
    let id: UserId = parse_id(&id, "User")?;
    Ok(Json(state.catalog.users.places_of(&id).await?))
}

/// GET /users/:id/reviews
pub async fn user_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let id: UserId = parse_id(&id, "User")?;
    Ok(Json(state.catalog.users.reviews_of(&id).await?))
}

/// PUT /users/:id
///
/// Users may change their own names. Email, password and the admin flag
/// are rejected here unless the caller is an admin.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let id: UserId = parse_id(&id, "User")?;
    let input = payload(body)?;
    Ok(Json(
        state.catalog.users.update(Some(&actor), &id, input).await?,
    ))
}
