//! Place service
//!
//! Creation, update and deletion of places, plus the detailed read model.
//! Amenity and review references are linked best-effort: ids that do not
//! parse or do not resolve are skipped.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::authorization::{authorize, require_actor, Actor, Operation};
use crate::domain::entities::{
    Amenity, AmenityId, EmbeddedReview, NewPlace, NumericInput, Place, PlaceDetails, PlaceId,
    PlaceLookup, PlacePatch, Review, ReviewId, ReviewLookup, User, UserId,
};
use crate::domain::ports::{Repositories, Repository};
use crate::error::DomainError;

/// An owner reference: a bare id or an object carrying one
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(String),
    Object { id: String },
}

impl OwnerRef {
    fn raw(&self) -> &str {
        match self {
            OwnerRef::Id(id) | OwnerRef::Object { id } => id,
        }
    }

    fn parse(&self) -> Result<UserId, DomainError> {
        self.raw()
            .parse()
            .map_err(|_| DomainError::OwnerNotFound(self.raw().to_string()))
    }
}

/// Payload for creating a place
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlace {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: NumericInput,
    pub latitude: NumericInput,
    pub longitude: NumericInput,
    /// Defaults to the caller
    #[serde(default, alias = "owner")]
    pub owner_id: Option<OwnerRef>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<String>,
}

/// Payload for updating a place. Reference lists replace the current ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlace {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumericInput>,
    pub latitude: Option<NumericInput>,
    pub longitude: Option<NumericInput>,
    #[serde(default, alias = "owner")]
    pub owner_id: Option<OwnerRef>,
    pub amenities: Option<Vec<String>>,
    pub reviews: Option<Vec<String>>,
}

/// Service for managing places
pub struct PlaceService {
    places: Arc<dyn Repository<Place>>,
    users: Arc<dyn Repository<User>>,
    amenities: Arc<dyn Repository<Amenity>>,
    reviews: Arc<dyn Repository<Review>>,
}

impl PlaceService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            places: repos.places.clone(),
            users: repos.users.clone(),
            amenities: repos.amenities.clone(),
            reviews: repos.reviews.clone(),
        }
    }

    /// Create a place for the caller, or for another owner when the caller
    /// is an admin
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: CreatePlace,
    ) -> Result<Place, DomainError> {
        let caller = require_actor(actor)?;
        let owner_id = match &input.owner_id {
            Some(owner) => owner.parse()?,
            None => caller.id,
        };
        authorize(actor, Operation::CreatePlace, Some(&owner_id))?;
        self.require_owner(&owner_id).await?;

        let price = input.price.coerce("price")?;
        let latitude = input.latitude.coerce("latitude")?;
        let longitude = input.longitude.coerce("longitude")?;

        let amenities = self.resolve_amenities(&input.amenities).await?;
        let reviews = self.resolve_reviews(&input.reviews).await?;

        let place = Place::new(NewPlace {
            owner_id,
            title: input.title,
            description: input.description,
            price,
            latitude,
            longitude,
            amenities,
            reviews,
        })
        .map_err(DomainError::InvalidPlaceData)?;

        let place = self.places.add(place).await?;
        tracing::info!(place_id = %place.id(), owner_id = %owner_id, "Place created");
        Ok(place)
    }

    /// Update a place. Owner or admin; changing the owner is admin only.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &PlaceId,
        input: UpdatePlace,
    ) -> Result<Place, DomainError> {
        let existing = self.get(id).await?;
        authorize(actor, Operation::UpdatePlace, Some(&existing.owner_id))?;

        let owner_id = match &input.owner_id {
            Some(owner) => {
                let owner_id = owner.parse()?;
                if owner_id != existing.owner_id {
                    authorize(actor, Operation::ReassignPlaceOwner, None)?;
                    self.require_owner(&owner_id).await?;
                }
                Some(owner_id)
            }
            None => None,
        };

        let price = input.price.map(|p| p.coerce("price")).transpose()?;
        let latitude = input.latitude.map(|v| v.coerce("latitude")).transpose()?;
        let longitude = input.longitude.map(|v| v.coerce("longitude")).transpose()?;

        let amenities = match &input.amenities {
            Some(ids) => Some(self.resolve_amenities(ids).await?),
            None => None,
        };
        let reviews = match &input.reviews {
            Some(ids) => Some(self.resolve_reviews(ids).await?),
            None => None,
        };

        let patch = PlacePatch {
            owner_id,
            title: input.title,
            description: input.description,
            price,
            latitude,
            longitude,
            amenities,
            reviews,
            ..Default::default()
        }
        .validate()?;

        let updated = self
            .places
            .update(id, &patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(
            place_id = %id,
            actor_id = ?actor.map(|a| a.id.to_string()),
            "Place updated"
        );
        Ok(updated)
    }

    /// Delete a place and every review written about it
    pub async fn delete(&self, actor: Option<&Actor>, id: &PlaceId) -> Result<(), DomainError> {
        let existing = self.get(id).await?;
        authorize(actor, Operation::DeletePlace, Some(&existing.owner_id))?;

        let reviews = self
            .reviews
            .get_all_by_attribute(&ReviewLookup::Place(*id))
            .await?;
        for review in &reviews {
            self.reviews.delete(&review.id()).await?;
        }

        if !self.places.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(place_id = %id, reviews_removed = reviews.len(), "Place deleted");
        Ok(())
    }

    pub async fn get(&self, id: &PlaceId) -> Result<Place, DomainError> {
        self.places.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Place>, DomainError> {
        self.places.get_all().await
    }

    /// Places whose title matches exactly
    pub async fn with_title(&self, title: &str) -> Result<Vec<Place>, DomainError> {
        self.places
            .get_all_by_attribute(&PlaceLookup::Title(title.to_string()))
            .await
    }

    /// A place with owner, amenities and reviews resolved
    pub async fn details(&self, id: &PlaceId) -> Result<PlaceDetails, DomainError> {
        let place = self.get(id).await?;
        let owner = self.users.get(&place.owner_id).await?;

        let mut amenities = Vec::with_capacity(place.amenities.len());
        for amenity_id in &place.amenities {
            if let Some(amenity) = self.amenities.get(amenity_id).await? {
                amenities.push(amenity);
            }
        }

        let mut reviews = Vec::with_capacity(place.reviews.len());
        for review_id in &place.reviews {
            if let Some(review) = self.reviews.get(review_id).await? {
                let author = self.users.get(&review.user_id).await?;
                reviews.push(EmbeddedReview::new(review, author.as_ref()));
            }
        }

        Ok(PlaceDetails::new(place, owner.as_ref(), amenities, reviews))
    }

    async fn require_owner(&self, owner_id: &UserId) -> Result<(), DomainError> {
        match self.users.get(owner_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::OwnerNotFound(owner_id.to_string())),
        }
    }

    async fn resolve_amenities(&self, raw_ids: &[String]) -> Result<Vec<AmenityId>, DomainError> {
        let mut resolved = Vec::with_capacity(raw_ids.len());
        for raw in raw_ids {
            let Ok(id) = raw.parse::<AmenityId>() else {
                tracing::warn!(amenity_id = %raw, "Skipping malformed amenity reference");
                continue;
            };
            if self.amenities.get(&id).await?.is_some() {
                resolved.push(id);
            } else {
                tracing::warn!(amenity_id = %raw, "Skipping unknown amenity reference");
            }
        }
        Ok(resolved)
    }

    async fn resolve_reviews(&self, raw_ids: &[String]) -> Result<Vec<ReviewId>, DomainError> {
        let mut resolved = Vec::with_capacity(raw_ids.len());
        for raw in raw_ids {
            let Ok(id) = raw.parse::<ReviewId>() else {
                tracing::warn!(review_id = %raw, "Skipping malformed review reference");
                continue;
            };
            if self.reviews.get(&id).await?.is_some() {
                resolved.push(id);
            } else {
                tracing::warn!(review_id = %raw, "Skipping unknown review reference");
            }
        }
        Ok(resolved)
    }
}

fn not_found(id: &PlaceId) -> DomainError {
    DomainError::NotFound(format!("Place {}", id))
}
