//! Review service
//!
//! Enforces the cross-entity review rules: both references must resolve,
//! owners cannot review their own place, and a user reviews a place once.
//! Keeps the place's review list in step with creations and deletions.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::authorization::{authorize, require_actor, Actor, Operation, Surface};
use crate::domain::entities::{
    NewReview, Place, PlaceId, PlacePatch, RatingInput, Review, ReviewId, ReviewLookup,
    ReviewPatch, User, UserId,
};
use crate::domain::ports::{Repositories, Repository};
use crate::error::DomainError;

/// Payload for creating a review
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub text: String,
    pub rating: RatingInput,
    pub place_id: String,
    /// Defaults to the caller
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub rating: Option<RatingInput>,
}

/// Service for managing reviews
pub struct ReviewService {
    reviews: Arc<dyn Repository<Review>>,
    places: Arc<dyn Repository<Place>>,
    users: Arc<dyn Repository<User>>,
}

impl ReviewService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            reviews: repos.reviews.clone(),
            places: repos.places.clone(),
            users: repos.users.clone(),
        }
    }

    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: CreateReview,
    ) -> Result<Review, DomainError> {
        let caller = require_actor(actor)?;
        let user_id = match &input.user_id {
            Some(raw) => raw
                .parse::<UserId>()
                .map_err(|_| DomainError::InvalidReference(format!("User {}", raw)))?,
            None => caller.id,
        };
        authorize(actor, Operation::CreateReview, Some(&user_id))?;

        if self.users.get(&user_id).await?.is_none() {
            return Err(DomainError::InvalidReference(format!("User {}", user_id)));
        }
        let place = match input.place_id.parse::<PlaceId>() {
            Ok(place_id) => self.places.get(&place_id).await?,
            Err(_) => None,
        }
        .ok_or_else(|| DomainError::InvalidReference(format!("Place {}", input.place_id)))?;

        if place.is_owned_by(&user_id) {
            return Err(DomainError::SelfReview);
        }
        if self
            .reviews
            .get_by_attribute(&ReviewLookup::UserAndPlace(user_id, place.id()))
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateReview {
                user_id: user_id.to_string(),
                place_id: place.id().to_string(),
            });
        }

        let review = Review::new(NewReview {
            place_id: place.id(),
            user_id,
            rating: input.rating,
            text: input.text,
        })?;
        let review = self.reviews.add(review).await?;

        if self
            .places
            .update(&place.id(), &PlacePatch::link_review(review.id()))
            .await?
            .is_none()
        {
            tracing::warn!(place_id = %place.id(), "Place vanished before review was linked");
        }

        tracing::info!(
            review_id = %review.id(),
            place_id = %place.id(),
            user_id = %user_id,
            "Review created"
        );
        Ok(review)
    }

    /// Update text and rating. Author only on the public surface, author
    /// or admin on the admin surface.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &ReviewId,
        surface: Surface,
        input: UpdateReview,
    ) -> Result<Review, DomainError> {
        let existing = self.get(id).await?;
        authorize(actor, Operation::UpdateReview(surface), Some(&existing.user_id))?;

        let patch = ReviewPatch::new(input.text, input.rating)?;
        let updated = self
            .reviews
            .update(id, &patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(review_id = %id, "Review updated");
        Ok(updated)
    }

    pub async fn delete(
        &self,
        actor: Option<&Actor>,
        id: &ReviewId,
        surface: Surface,
    ) -> Result<(), DomainError> {
        let existing = self.get(id).await?;
        authorize(actor, Operation::DeleteReview(surface), Some(&existing.user_id))?;

        if !self.reviews.delete(id).await? {
            return Err(not_found(id));
        }
        self.places
            .update(&existing.place_id, &PlacePatch::unlink_review(*id))
            .await?;

        tracing::info!(review_id = %id, place_id = %existing.place_id, "Review deleted");
        Ok(())
    }

    pub async fn get(&self, id: &ReviewId) -> Result<Review, DomainError> {
        self.reviews.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Review>, DomainError> {
        self.reviews.get_all().await
    }

    /// Reviews written about a place
    pub async fn of_place(&self, place_id: &PlaceId) -> Result<Vec<Review>, DomainError> {
        if self.places.get(place_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("Place {}", place_id)));
        }
        self.reviews
            .get_all_by_attribute(&ReviewLookup::Place(*place_id))
            .await
    }
}

fn not_found(id: &ReviewId) -> DomainError {
    DomainError::NotFound(format!("Review {}", id))
}
