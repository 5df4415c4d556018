//! Review domain entity
//!
//! A rating and comment left by a user on a place they do not own. At most
//! one review exists per (user, place) pair.

use serde::{Deserialize, Serialize};

use super::identity::{entity_id, Identity, Record};
use super::place::PlaceId;
use super::user::UserId;
use super::validation;
use crate::error::{DomainError, ValidationError};

entity_id!(
    /// Unique identifier for a review
    ReviewId,
    "review"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub identity: Identity<ReviewId>,
    pub place_id: PlaceId,
    pub user_id: UserId,
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub place_id: PlaceId,
    pub user_id: UserId,
    pub rating: RatingInput,
    pub text: String,
}

impl Review {
    pub fn new(new_review: NewReview) -> Result<Self, ValidationError> {
        let rating = new_review.rating.validate()?;
        let text = validation::required_text("text", &new_review.text, None)?;

        Ok(Self {
            identity: Identity::new(ReviewId::new()),
            place_id: new_review.place_id,
            user_id: new_review.user_id,
            rating,
            text,
        })
    }

    pub fn id(&self) -> ReviewId {
        self.identity.id
    }
}

/// A rating as it arrives in a request body. Only JSON integers are
/// accepted; floats, strings and booleans are kept so they can be reported.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Integer(i64),
    Other(serde_json::Value),
}

impl RatingInput {
    pub fn validate(&self) -> Result<u8, ValidationError> {
        match self {
            RatingInput::Integer(n) => validation::rating(*n),
            RatingInput::Other(v) => Err(ValidationError::InvalidRating(v.to_string())),
        }
    }
}

impl From<i64> for RatingInput {
    fn from(n: i64) -> Self {
        RatingInput::Integer(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewLookup {
    Place(PlaceId),
    User(UserId),
    UserAndPlace(UserId, PlaceId),
}

/// Author and place are fixed at creation; only these may change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub rating: Option<u8>,
}

impl ReviewPatch {
    pub fn new(text: Option<String>, rating: Option<RatingInput>) -> Result<Self, ValidationError> {
        Ok(Self {
            text: text
                .map(|t| validation::required_text("text", &t, None))
                .transpose()?,
            rating: rating.map(|r| r.validate()).transpose()?,
        })
    }
}

impl Record for Review {
    type Id = ReviewId;
    type Lookup = ReviewLookup;
    type Patch = ReviewPatch;

    const KIND: &'static str = "Review";

    fn id(&self) -> ReviewId {
        self.identity.id
    }

    fn matches(&self, lookup: &ReviewLookup) -> bool {
        match lookup {
            ReviewLookup::Place(place_id) => self.place_id == *place_id,
            ReviewLookup::User(user_id) => self.user_id == *user_id,
            ReviewLookup::UserAndPlace(user_id, place_id) => {
                self.user_id == *user_id && self.place_id == *place_id
            }
        }
    }

    fn apply(&mut self, patch: &ReviewPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        self.identity.touch();
    }

    fn conflict(&self, other: &Self) -> Option<DomainError> {
        (self.user_id == other.user_id && self.place_id == other.place_id).then(|| {
            DomainError::DuplicateReview {
                user_id: self.user_id.to_string(),
                place_id: self.place_id.to_string(),
            }
        })
    }
}
