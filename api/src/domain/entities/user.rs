//! User domain entity
//!
//! A person who can own places and author reviews. The password hash is
//! carried for authentication but never serialized.

use serde::{Deserialize, Serialize};

use super::identity::{entity_id, Identity, Record};
use super::validation;
use crate::error::{DomainError, ValidationError};

entity_id!(
    /// Unique identifier for a user
    UserId,
    "user"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub identity: Identity<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(skip)]
    pub password_hash: String,
}

/// Data needed to create a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub password_hash: String,
}

impl User {
    pub fn new(new_user: NewUser) -> Result<Self, ValidationError> {
        let first_name = validation::required_text(
            "first_name",
            &new_user.first_name,
            Some(validation::PERSON_NAME_MAX_CHARS),
        )?;
        let last_name = validation::required_text(
            "last_name",
            &new_user.last_name,
            Some(validation::PERSON_NAME_MAX_CHARS),
        )?;
        let email = validation::email(&new_user.email)?;

        Ok(Self {
            identity: Identity::new(UserId::new()),
            first_name,
            last_name,
            email,
            is_admin: new_user.is_admin,
            password_hash: new_user.password_hash,
        })
    }

    pub fn id(&self) -> UserId {
        self.identity.id
    }
}

/// Lookup keys for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Email(String),
}

/// Fields of a user that may change after creation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    /// Check present fields with the creation rules, returning the
    /// normalized patch
    pub fn validate(self) -> Result<Self, ValidationError> {
        let first_name = self
            .first_name
            .map(|v| {
                validation::required_text(
                    "first_name",
                    &v,
                    Some(validation::PERSON_NAME_MAX_CHARS),
                )
            })
            .transpose()?;
        let last_name = self
            .last_name
            .map(|v| {
                validation::required_text("last_name", &v, Some(validation::PERSON_NAME_MAX_CHARS))
            })
            .transpose()?;
        let email = self.email.map(|v| validation::email(&v)).transpose()?;

        Ok(Self {
            first_name,
            last_name,
            email,
            ..self
        })
    }
}

impl Record for User {
    type Id = UserId;
    type Lookup = UserLookup;
    type Patch = UserPatch;

    const KIND: &'static str = "User";

    fn id(&self) -> UserId {
        self.identity.id
    }

    fn matches(&self, lookup: &UserLookup) -> bool {
        match lookup {
            UserLookup::Email(email) => self.email == *email,
        }
    }

    fn apply(&mut self, patch: &UserPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(is_admin) = patch.is_admin {
            self.is_admin = is_admin;
        }
        if let Some(password_hash) = &patch.password_hash {
            self.password_hash = password_hash.clone();
        }
        self.identity.touch();
    }

    fn conflict(&self, other: &Self) -> Option<DomainError> {
        (self.email == other.email).then(|| DomainError::DuplicateEmail(self.email.clone()))
    }
}

/// Public view of a user embedded in other payloads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}
