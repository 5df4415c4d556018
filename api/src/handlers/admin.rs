//! Administrative endpoints
//!
//! Mounted under `/admin`. User, amenity and place operations share the
//! public handlers' rules; review mutations use the admin surface so admins
//! may edit or remove any review.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::{parse_id, payload, reviews, MessageResponse};
use crate::app::{CreateUser, UpdateReview, UpdateUser};
use crate::domain::entities::{Review, User, UserId};
use crate::domain::{Actor, Surface};
use crate::error::AppError;
use crate::AppState;

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let input = payload(body)?;
    let user = state.catalog.users.create(Some(&actor), input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /admin/users/:id
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

/// PUT /admin/reviews/:id
pub async fn update_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateReview>, JsonRejection>,
) -> Result<Json<Review>, AppError> {
    reviews::update_on(&state, &actor, &id, Surface::Admin, body).await
}

/// DELETE /admin/reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    reviews::delete_on(&state, &actor, &id, Surface::Admin).await
}
