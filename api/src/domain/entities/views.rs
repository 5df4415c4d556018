//! Read models that embed related entities

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::amenity::Amenity;
use super::place::{Place, PlaceId};
use super::review::Review;
use super::user::{User, UserId, UserSummary};

/// A review as shown inside a place, with its author's name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedReview {
    #[serde(flatten)]
    pub review: Review,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
}

impl EmbeddedReview {
    pub fn new(review: Review, author: Option<&User>) -> Self {
        Self {
            review,
            user_first_name: author.map(|u| u.first_name.clone()),
            user_last_name: author.map(|u| u.last_name.clone()),
        }
    }
}

/// A place with its owner, amenities and reviews resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetails {
    pub id: PlaceId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: UserId,
    pub owner: Option<UserSummary>,
    pub amenities: Vec<Amenity>,
    pub reviews: Vec<EmbeddedReview>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaceDetails {
    pub fn new(
        place: Place,
        owner: Option<&User>,
        amenities: Vec<Amenity>,
        reviews: Vec<EmbeddedReview>,
    ) -> Self {
        Self {
            id: place.identity.id,
            title: place.title,
            description: place.description,
            price: place.price,
            latitude: place.latitude,
            longitude: place.longitude,
            owner_id: place.owner_id,
            owner: owner.map(UserSummary::from),
            amenities,
            reviews,
            created_at: place.identity.created_at,
            updated_at: place.identity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewPlace, NewReview, NewUser, RatingInput};

    #[test]
    fn details_embed_owner_and_author_names() {
        let owner = User::new(NewUser {
            first_name: "Alice".to_string(),
            last_name: "Owner".to_string(),
            email: "alice@example.com".to_string(),
            is_admin: false,
            password_hash: "h".to_string(),
        })
        .unwrap();
        let guest = User::new(NewUser {
            first_name: "Bob".to_string(),
            last_name: "Guest".to_string(),
            email: "bob@example.com".to_string(),
            is_admin: false,
            password_hash: "h".to_string(),
        })
        .unwrap();
        let place = Place::new(NewPlace {
            owner_id: owner.id(),
            title: "Loft".to_string(),
            description: None,
            price: 80.0,
            latitude: 1.0,
            longitude: 2.0,
            amenities: vec![],
            reviews: vec![],
        })
        .unwrap();
        let review = Review::new(NewReview {
            place_id: place.id(),
            user_id: guest.id(),
            rating: RatingInput::Integer(4),
            text: "Nice".to_string(),
        })
        .unwrap();
        let amenity = Amenity::new("Wi-Fi").unwrap();

        let details = PlaceDetails::new(
            place,
            Some(&owner),
            vec![amenity],
            vec![EmbeddedReview::new(review, Some(&guest))],
        );
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(json["owner"]["first_name"], "Alice");
        assert!(json["owner"].get("password_hash").is_none());
        assert_eq!(json["amenities"][0]["name"], "Wi-Fi");
        assert_eq!(json["reviews"][0]["text"], "Nice");
        assert_eq!(json["reviews"][0]["user_first_name"], "Bob");
        assert_eq!(json["reviews"][0]["user_last_name"], "Guest");
    }
}
