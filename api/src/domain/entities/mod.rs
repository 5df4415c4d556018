//! Domain entities
//!
//! Pure domain models representing the catalog: users, places, amenities
//! and reviews. These are separate from the SeaORM entities in the `entity`
//! module.

pub mod amenity;
pub mod identity;
pub mod place;
pub mod review;
pub mod user;
pub mod validation;
pub mod views;

pub use amenity::{Amenity, AmenityId, AmenityLookup, AmenityPatch};
pub use identity::{Identity, Record};
pub use place::{NewPlace, NumericInput, Place, PlaceId, PlaceLookup, PlacePatch};
pub use review::{NewReview, RatingInput, Review, ReviewId, ReviewLookup, ReviewPatch};
pub use user::{NewUser, User, UserId, UserLookup, UserPatch, UserSummary};
pub use views::{EmbeddedReview, PlaceDetails};
