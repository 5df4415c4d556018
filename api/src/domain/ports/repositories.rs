//! Repository port
//!
//! One generic contract covers every entity type. Implementations are
//! provided by adapters (in-memory map, SeaORM).

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{Amenity, Place, Record, Review, User};
use crate::error::DomainError;

/// CRUD storage for one entity type
#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    /// Find an entity by ID
    async fn get(&self, id: &E::Id) -> Result<Option<E>, DomainError>;

    /// All entities in creation order
    async fn get_all(&self) -> Result<Vec<E>, DomainError>;

    /// First entity matching the lookup
    async fn get_by_attribute(&self, lookup: &E::Lookup) -> Result<Option<E>, DomainError> {
        Ok(self.get_all_by_attribute(lookup).await?.into_iter().next())
    }

    /// Every entity matching the lookup, in creation order
    async fn get_all_by_attribute(&self, lookup: &E::Lookup) -> Result<Vec<E>, DomainError>;

    /// Store a new entity. Fails with `AlreadyExists` when the id is taken
    /// and with the entity's uniqueness error when another record conflicts.
    async fn add(&self, entity: E) -> Result<E, DomainError>;

    /// Apply a validated patch. `None` when the id is unknown.
    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<Option<E>, DomainError>;

    /// Remove an entity. Returns whether it existed.
    async fn delete(&self, id: &E::Id) -> Result<bool, DomainError>;
}

/// One repository per entity type, all backed by the same storage
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn Repository<User>>,
    pub places: Arc<dyn Repository<Place>>,
    pub amenities: Arc<dyn Repository<Amenity>>,
    pub reviews: Arc<dyn Repository<Review>>,
}
