//! SeaORM entities
//!
//! Table definitions for the relational backend. The domain never sees
//! these types; adapters convert them into domain entities.

pub mod amenities;
pub mod place_amenity;
pub mod place_review;
pub mod places;
pub mod reviews;
pub mod users;
