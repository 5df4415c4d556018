//! Application layer
//!
//! The catalog facade: one service per entity type, each enforcing the
//! authorization policy and the cross-entity rules before touching storage.

pub mod amenity_service;
pub mod place_service;
pub mod review_service;
pub mod user_service;

use std::sync::Arc;

use crate::domain::ports::{PasswordHasher, Repositories};

pub use amenity_service::{AmenityService, CreateAmenity, UpdateAmenity};
pub use place_service::{CreatePlace, OwnerRef, PlaceService, UpdatePlace};
pub use review_service::{CreateReview, ReviewService, UpdateReview};
pub use user_service::{CreateUser, UpdateUser, UserService};

/// Every catalog service, built once at startup and shared by the handlers
pub struct Catalog {
    pub users: UserService,
    pub places: PlaceService,
    pub amenities: AmenityService,
    pub reviews: ReviewService,
}

impl Catalog {
    pub fn new(repos: Repositories, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users: UserService::new(&repos, hasher),
            places: PlaceService::new(&repos),
            amenities: AmenityService::new(&repos),
            reviews: ReviewService::new(&repos),
        }
    }
}
