//! Adapters layer
//!
//! Implementations of port traits for storage backends.

pub mod database;
pub mod memory;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::entities::{Amenity, Place, Review, User};
use crate::domain::ports::Repositories;

pub use database::{DbAmenityRepository, DbPlaceRepository, DbReviewRepository, DbUserRepository};
pub use memory::InMemoryRepository;

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::<User>::new()),
            places: Arc::new(InMemoryRepository::<Place>::new()),
            amenities: Arc::new(InMemoryRepository::<Amenity>::new()),
            reviews: Arc::new(InMemoryRepository::<Review>::new()),
        }
    }

    pub fn database(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(DbUserRepository::new(db.clone())),
            places: Arc::new(DbPlaceRepository::new(db.clone())),
            amenities: Arc::new(DbAmenityRepository::new(db.clone())),
            reviews: Arc::new(DbReviewRepository::new(db)),
        }
    }
}
