//! Amenity handlers
//!
//! Reads are public; writes need an admin token. The same write handlers
//! are mounted under `/admin/amenities`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::{parse_id, payload};
use crate::app::{CreateAmenity, UpdateAmenity};
use crate::domain::entities::{Amenity, AmenityId};
use crate::domain::Actor;
use crate::error::AppError;
use crate::AppState;

/// GET /amenities
pub async fn list_amenities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Amenity>>, AppError> {
    Ok(Json(state.catalog.amenities.list().await?))
}

/// GET /amenities/:id
pub async fn get_amenity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Amenity>, AppError> {
    let id: AmenityId = parse_id(&id, "Amenity")?;
    Ok(Json(state.catalog.amenities.get(&id).await?))
}

/// POST /amenities
///
/// 201 when stored, 200 when an amenity with that name already existed
pub async fn create_amenity(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateAmenity>, JsonRejection>,
) -> Result<(StatusCode, Json<Amenity>), AppError> {
    let input = payload(body)?;
    let (amenity, created) = state.catalog.amenities.create(Some(&actor), input).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(amenity)))
}

/// PUT /amenities/:id
pub async fn update_amenity(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateAmenity>, JsonRejection>,
) -> Result<Json<Amenity>, AppError> {
    let id: AmenityId = parse_id(&id, "Amenity")?;
    let input = payload(body)?;
    Ok(Json(
        state
            .catalog
            .amenities
            .update(Some(&actor), &id, input)
            .await?,
    ))
}
