//! HTTP handlers
//!
//! Axum request handlers for the `/api/v1` endpoints. Handlers only parse
//! input and shape output; every rule lives in the catalog services.

pub mod admin;
pub mod amenities;
pub mod auth;
pub mod places;
pub mod reviews;
pub mod users;

use std::str::FromStr;

use axum::{extract::rejection::JsonRejection, Json};
use serde::Serialize;

use crate::error::AppError;

pub use amenities::{create_amenity, get_amenity, list_amenities, update_amenity};
pub use auth::login;
pub use places::{create_place, delete_place, get_place, list_places, place_reviews, update_place};
pub use reviews::{create_review, delete_review, get_review, list_reviews, update_review};
pub use users::{get_user, list_users, update_user, user_places, user_reviews};

/// Body for operations that have nothing else to return
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Parse a path id. An id that cannot exist is reported as not found.
pub(crate) fn parse_id<I: FromStr>(raw: &str, kind: &str) -> Result<I, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{} {}", kind, raw)))
}

/// Unwrap a JSON body, reporting malformed payloads as bad requests
pub(crate) fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PlaceId;

    #[test]
    fn unparseable_id_is_not_found() {
        let err = parse_id::<PlaceId>("nonexistent-id", "Place").unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Place nonexistent-id"));

        let id = PlaceId::new();
        assert_eq!(parse_id::<PlaceId>(&id.to_string(), "Place").unwrap(), id);
    }
}
