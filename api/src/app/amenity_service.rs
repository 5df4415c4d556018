//! Amenity service

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::authorization::{authorize, Actor, Operation};
use crate::domain::entities::{Amenity, AmenityId, AmenityLookup, AmenityPatch};
use crate::domain::ports::{Repositories, Repository};
use crate::error::DomainError;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAmenity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAmenity {
    pub name: String,
}

/// Service for managing amenities. All mutations are admin only.
pub struct AmenityService {
    amenities: Arc<dyn Repository<Amenity>>,
}

impl AmenityService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            amenities: repos.amenities.clone(),
        }
    }

    /// Create an amenity. An existing amenity with the same name is
    /// returned instead of creating a duplicate; the flag is true only when
    /// a new amenity was stored.
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: CreateAmenity,
    ) -> Result<(Amenity, bool), DomainError> {
        authorize(actor, Operation::CreateAmenity, None)?;
        let amenity = Amenity::new(&input.name)?;

        if let Some(existing) = self
            .amenities
            .get_by_attribute(&AmenityLookup::Name(amenity.name.clone()))
            .await?
        {
            tracing::debug!(amenity_id = %existing.id(), "Amenity already exists");
            return Ok((existing, false));
        }

        let amenity = self.amenities.add(amenity).await?;
        tracing::info!(amenity_id = %amenity.id(), name = %amenity.name, "Amenity created");
        Ok((amenity, true))
    }

    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &AmenityId,
        input: UpdateAmenity,
    ) -> Result<Amenity, DomainError> {
        authorize(actor, Operation::UpdateAmenity, None)?;
        let patch = AmenityPatch {
            name: Some(input.name),
        }
        .validate()?;

        let updated = self
            .amenities
            .update(id, &patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(amenity_id = %id, "Amenity updated");
        Ok(updated)
    }

    pub async fn get(&self, id: &AmenityId) -> Result<Amenity, DomainError> {
        self.amenities.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Amenity>, DomainError> {
        self.amenities.get_all().await
    }
}

fn not_found(id: &AmenityId) -> DomainError {
    DomainError::NotFound(format!("Amenity {}", id))
}
