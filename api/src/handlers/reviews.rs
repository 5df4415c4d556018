//! Review handlers
//!
//! Public mutations are restricted to the author; the admin variants in
//! [`super::admin`] also let admins through.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::{parse_id, payload, MessageResponse};
use crate::app::{CreateReview, UpdateReview};
use crate::domain::entities::{Review, ReviewId};
use crate::domain::{Actor, Surface};
use crate::error::AppError;
use crate::AppState;

/// GET /reviews
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.catalog.reviews.list().await?))
}

/// GET /reviews/:id
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Review>, AppError> {
    let id: ReviewId = parse_id(&id, "Review")?;
    Ok(Json(state.catalog.reviews.get(&id).await?))
}

/// POST /reviews
pub async fn create_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateReview>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let input = payload(body)?;
    let review = state.catalog.reviews.create(Some(&actor), input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub(super) async fn update_on(
    state: &AppState,
    actor: &Actor,
    id: &str,
    surface: Surface,
    body: Result<Json<UpdateReview>, JsonRejection>,
) -> Result<Json<Review>, AppError> {
    let id: ReviewId = parse_id(id, "Review")?;
    let input = payload(body)?;
    Ok(Json(
        state
            .catalog
            .reviews
            .update(Some(actor), &id, surface, input)
            .await?,
    ))
}

pub(super) async fn delete_on(
    state: &AppState,
    actor: &Actor,
    id: &str,
    surface: Surface,
) -> Result<Json<MessageResponse>, AppError> {
    let id: ReviewId = parse_id(id, "Review")?;
    state
        .catalog
        .reviews
        .delete(Some(actor), &id, surface)
        .await?;
    Ok(MessageResponse::new("Review deleted successfully"))
}

/// PUT /reviews/:id
pub async fn update_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateReview>, JsonRejection>,
) -> Result<Json<Review>, AppError> {
    update_on(&state, &actor, &id, Surface::Public, body).await
}

/// DELETE /reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_on(&state, &actor, &id, Surface::Public).await
}
