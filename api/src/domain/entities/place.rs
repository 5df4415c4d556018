//! Place domain entity
//!
//! A listing owned by exactly one user. Holds ordered reference lists for
//! its amenities and reviews.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::amenity::AmenityId;
use super::identity::{entity_id, Identity, Record};
use super::review::ReviewId;
use super::user::UserId;
use super::validation;
use crate::error::{DomainError, ValidationError};

entity_id!(
    /// Unique identifier for a place
    PlaceId,
    "place"
);

const PRICE_DECIMALS: i32 = 2;
const COORDINATE_DECIMALS: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub identity: Identity<PlaceId>,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub amenities: Vec<AmenityId>,
    #[serde(default)]
    pub reviews: Vec<ReviewId>,
}

#[derive(Debug, Clone)]
pub struct NewPlace {
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub amenities: Vec<AmenityId>,
    pub reviews: Vec<ReviewId>,
}

impl Place {
    pub fn new(new_place: NewPlace) -> Result<Self, ValidationError> {
        let title = validation::required_text(
            "title",
            &new_place.title,
            Some(validation::PLACE_TITLE_MAX_CHARS),
        )?;
        let price = validate_price(new_place.price)?;
        let latitude = validate_latitude(new_place.latitude)?;
        let longitude = validate_longitude(new_place.longitude)?;

        Ok(Self {
            identity: Identity::new(PlaceId::new()),
            owner_id: new_place.owner_id,
            title,
            description: new_place.description,
            price,
            latitude,
            longitude,
            amenities: dedup_ordered(new_place.amenities),
            reviews: dedup_ordered(new_place.reviews),
        })
    }

    pub fn id(&self) -> PlaceId {
        self.identity.id
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id == *user_id
    }
}

fn validate_price(price: f64) -> Result<f64, ValidationError> {
    validation::non_negative("price", price).map(|p| validation::round_to(p, PRICE_DECIMALS))
}

fn validate_latitude(latitude: f64) -> Result<f64, ValidationError> {
    validation::in_range("latitude", latitude, validation::LATITUDE_RANGE)
        .map(|v| validation::round_to(v, COORDINATE_DECIMALS))
}

fn validate_longitude(longitude: f64) -> Result<f64, ValidationError> {
    validation::in_range("longitude", longitude, validation::LONGITUDE_RANGE)
        .map(|v| validation::round_to(v, COORDINATE_DECIMALS))
}

/// Drop repeated ids, keeping the first occurrence
pub fn dedup_ordered<T: Copy + Eq + Hash>(ids: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// A numeric field as it arrives in a request body: a JSON number, a
/// numeric string, or something else entirely
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumericInput {
    /// Convert to a float. Range rules are checked separately.
    pub fn coerce(&self, field: &'static str) -> Result<f64, DomainError> {
        match self {
            NumericInput::Number(n) => Ok(*n),
            NumericInput::Text(s) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| DomainError::InvalidNumericField {
                        field,
                        value: s.clone(),
                    })
            }
            NumericInput::Other(v) => Err(DomainError::InvalidNumericField {
                field,
                value: v.to_string(),
            }),
        }
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        NumericInput::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceLookup {
    Owner(UserId),
    Title(String),
}

/// Fields of a place that may change after creation. Reference lists, when
/// present, replace the existing ones. `link_review` and `unlink_review`
/// edit the review list in place, so they apply against the stored record
/// rather than a copy read earlier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacePatch {
    pub owner_id: Option<UserId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub amenities: Option<Vec<AmenityId>>,
    pub reviews: Option<Vec<ReviewId>>,
    pub link_review: Option<ReviewId>,
    pub unlink_review: Option<ReviewId>,
}

impl PlacePatch {
    /// Check present fields with the creation rules and normalize them
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = self
            .title
            .map(|t| {
                validation::required_text("title", &t, Some(validation::PLACE_TITLE_MAX_CHARS))
            })
            .transpose()?;
        let price = self.price.map(validate_price).transpose()?;
        let latitude = self.latitude.map(validate_latitude).transpose()?;
        let longitude = self.longitude.map(validate_longitude).transpose()?;

        Ok(Self {
            owner_id: self.owner_id,
            title,
            description: self.description,
            price,
            latitude,
            longitude,
            amenities: self.amenities.map(dedup_ordered),
            reviews: self.reviews.map(dedup_ordered),
            link_review: self.link_review,
            unlink_review: self.unlink_review,
        })
    }

    /// Append one review to the end of the list
    pub fn link_review(review_id: ReviewId) -> Self {
        Self {
            link_review: Some(review_id),
            ..Default::default()
        }
    }

    pub fn unlink_review(review_id: ReviewId) -> Self {
        Self {
            unlink_review: Some(review_id),
            ..Default::default()
        }
    }
}

impl Record for Place {
    type Id = PlaceId;
    type Lookup = PlaceLookup;
    type Patch = PlacePatch;

    const KIND: &'static str = "Place";

    fn id(&self) -> PlaceId {
        self.identity.id
    }

    fn matches(&self, lookup: &PlaceLookup) -> bool {
        match lookup {
            PlaceLookup::Owner(owner_id) => self.owner_id == *owner_id,
            PlaceLookup::Title(title) => self.title == *title,
        }
    }

    fn apply(&mut self, patch: &PlacePatch) {
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(amenities) = &patch.amenities {
            self.amenities = amenities.clone();
        }
        if let Some(reviews) = &patch.reviews {
            self.reviews = reviews.clone();
        }
        if let Some(review_id) = patch.link_review {
            if !self.reviews.contains(&review_id) {
                self.reviews.push(review_id);
            }
        }
        if let Some(review_id) = patch.unlink_review {
            self.reviews.retain(|existing| *existing != review_id);
        }
        self.identity.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_place(price: f64, latitude: f64, longitude: f64) -> NewPlace {
        NewPlace {
            owner_id: UserId::new(),
            title: "Cozy Apartment".to_string(),
            description: Some("A nice place to stay".to_string()),
            price,
            latitude,
            longitude,
            amenities: vec![],
            reviews: vec![],
        }
    }

    #[test]
    fn rounds_price_and_coordinates() {
        let place = Place::new(new_place(100.456, 37.7749, -122.4194)).unwrap();
        assert_eq!(place.price, 100.46);
        assert_eq!(place.latitude, 37.8);
        assert_eq!(place.longitude, -122.4);
    }

    #[test]
    fn boundaries_are_accepted() {
        assert!(Place::new(new_place(0.0, 90.0, 180.0)).is_ok());
        assert!(Place::new(new_place(0.0, -90.0, -180.0)).is_ok());
    }

    #[test]
    fn rejects_negative_price() {
        let err = Place::new(new_place(-1.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { field: "price", .. }));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(matches!(
            Place::new(new_place(10.0, 90.5, 0.0)),
            Err(ValidationError::OutOfRange {
                field: "latitude",
                ..
            })
        ));
        assert!(matches!(
            Place::new(new_place(10.0, 0.0, -181.0)),
            Err(ValidationError::OutOfRange {
                field: "longitude",
                ..
            })
        ));
    }

    #[test]
    fn first_violation_wins() {
        let mut data = new_place(-5.0, 100.0, 200.0);
        data.title = String::new();
        assert_eq!(
            Place::new(data).unwrap_err(),
            ValidationError::Empty { field: "title" }
        );
    }

    #[test]
    fn title_limit_counts_characters() {
        let mut data = new_place(1.0, 0.0, 0.0);
        data.title = "t".repeat(100);
        assert!(Place::new(data.clone()).is_ok());
        data.title = "t".repeat(101);
        assert!(Place::new(data).is_err());
    }

    #[test]
    fn reference_lists_are_deduplicated_in_order() {
        let a = AmenityId::new();
        let b = AmenityId::new();
        let mut data = new_place(1.0, 0.0, 0.0);
        data.amenities = vec![a, b, a];
        let place = Place::new(data).unwrap();
        assert_eq!(place.amenities, vec![a, b]);
    }

    #[test]
    fn round_trips_through_json() {
        let mut data = new_place(99.999, 12.34, 56.78);
        data.amenities = vec![AmenityId::new(), AmenityId::new()];
        data.reviews = vec![ReviewId::new()];
        let place = Place::new(data).unwrap();

        let json = serde_json::to_string(&place).unwrap();
        let restored: Place = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, place);
        assert_eq!(restored.price, 100.0);
        assert_eq!(restored.latitude, 12.3);
        assert_eq!(restored.longitude, 56.8);
    }

    #[test]
    fn huge_price_stays_finite() {
        let place = Place::new(new_place(1e307, 0.0, 0.0)).unwrap();
        assert!(place.price.is_finite());
        assert_eq!(place.price, 1e307);

        let json = serde_json::to_string(&place).unwrap();
        let restored: Place = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, place);

        let patch = PlacePatch {
            price: Some(f64::MAX),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.price, Some(f64::MAX));
    }

    #[test]
    fn numeric_input_coercion() {
        let text: NumericInput = serde_json::from_value(serde_json::json!(" 42.5 ")).unwrap();
        assert_eq!(text.coerce("price").unwrap(), 42.5);

        let int: NumericInput = serde_json::from_value(serde_json::json!(7)).unwrap();
        assert_eq!(int.coerce("price").unwrap(), 7.0);

        let bad: NumericInput = serde_json::from_value(serde_json::json!("abc")).unwrap();
        assert!(matches!(
            bad.coerce("price"),
            Err(DomainError::InvalidNumericField { field: "price", .. })
        ));

        let other: NumericInput = serde_json::from_value(serde_json::json!([1])).unwrap();
        assert!(other.coerce("latitude").is_err());
    }

    #[test]
    fn patch_replaces_lists_and_keeps_identity() {
        let mut place = Place::new(new_place(10.0, 1.0, 1.0)).unwrap();
        place.amenities = vec![AmenityId::new()];
        let id = place.id();
        let created = place.identity.created_at;

        let patch = PlacePatch {
            price: Some(20.567),
            amenities: Some(vec![]),
            ..Default::default()
        }
        .validate()
        .unwrap();
        place.apply(&patch);

        assert_eq!(place.id(), id);
        assert_eq!(place.identity.created_at, created);
        assert_eq!(place.price, 20.57);
        assert!(place.amenities.is_empty());
        assert_eq!(place.title, "Cozy Apartment");
    }

    #[test]
    fn review_links_edit_the_current_list() {
        let mut place = Place::new(new_place(10.0, 1.0, 1.0)).unwrap();
        let first = ReviewId::new();
        let second = ReviewId::new();

        place.apply(&PlacePatch::link_review(first));
        place.apply(&PlacePatch::link_review(second));
        place.apply(&PlacePatch::link_review(first));
        assert_eq!(place.reviews, vec![first, second]);

        place.apply(&PlacePatch::unlink_review(first));
        assert_eq!(place.reviews, vec![second]);
    }

    #[test]
    fn patch_rejects_invalid_values() {
        let patch = PlacePatch {
            latitude: Some(-91.0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn lookups() {
        let place = Place::new(new_place(1.0, 0.0, 0.0)).unwrap();
        assert!(place.matches(&PlaceLookup::Owner(place.owner_id)));
        assert!(!place.matches(&PlaceLookup::Owner(UserId::new())));
        assert!(place.matches(&PlaceLookup::Title("Cozy Apartment".to_string())));
    }
}
