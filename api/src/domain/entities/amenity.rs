//! Amenity domain entity

use serde::{Deserialize, Serialize};

use super::identity::{entity_id, Identity, Record};
use super::validation::AMENITY_NAME_MAX_CHARS;
use crate::error::ValidationError;

entity_id!(
    /// Unique identifier for an amenity
    AmenityId,
    "amenity"
);

/// A feature a place can offer (Wi-Fi, parking, ...). Not owned by anyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(flatten)]
    pub identity: Identity<AmenityId>,
    pub name: String,
}

impl Amenity {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            identity: Identity::new(AmenityId::new()),
            name: amenity_name(name)?,
        })
    }

    pub fn id(&self) -> AmenityId {
        self.identity.id
    }
}

/// Trimmed amenity name. Blank names are reported as `InvalidName`.
pub fn amenity_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    if trimmed.chars().count() > AMENITY_NAME_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "name",
            max: AMENITY_NAME_MAX_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmenityLookup {
    Name(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmenityPatch {
    pub name: Option<String>,
}

impl AmenityPatch {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: self.name.as_deref().map(amenity_name).transpose()?,
        })
    }
}

impl Record for Amenity {
    type Id = AmenityId;
    type Lookup = AmenityLookup;
    type Patch = AmenityPatch;

    const KIND: &'static str = "Amenity";

    fn id(&self) -> AmenityId {
        self.identity.id
    }

    fn matches(&self, lookup: &AmenityLookup) -> bool {
        match lookup {
            AmenityLookup::Name(name) => self.name == *name,
        }
    }

    fn apply(&mut self, patch: &AmenityPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        self.identity.touch();
    }
}
