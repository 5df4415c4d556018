//! User service
//!
//! Handles user registration, profile updates, authentication and the
//! derived "places of" / "reviews of" views.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::authorization::{authorize, Actor, Operation};
use crate::domain::entities::{
    NewUser, Place, PlaceLookup, Review, ReviewLookup, User, UserId, UserLookup, UserPatch,
};
use crate::domain::ports::{PasswordHasher, Repositories, Repository};
use crate::error::{DomainError, ValidationError};

/// Payload for creating a user
#[derive(Clone, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Payload for updating a user. Absent fields are left unchanged.
#[derive(Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UpdateUser {
    fn touches_credentials(&self) -> bool {
        self.email.is_some() || self.password.is_some() || self.is_admin.is_some()
    }
}

/// Service for managing users
pub struct UserService {
    users: Arc<dyn Repository<User>>,
    places: Arc<dyn Repository<Place>>,
    reviews: Arc<dyn Repository<Review>>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repos: &Repositories, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users: repos.users.clone(),
            places: repos.places.clone(),
            reviews: repos.reviews.clone(),
            hasher,
        }
    }

    /// Create a user. Admin only.
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: CreateUser,
    ) -> Result<User, DomainError> {
        authorize(actor, Operation::CreateUser, None)?;
        let user = self.register(input).await?;
        tracing::info!(
            user_id = %user.id(),
            actor_id = ?actor.map(|a| a.id.to_string()),
            "User created"
        );
        Ok(user)
    }

    /// Create the initial administrator. An existing account with the same
    /// email is promoted instead; its password is left alone.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, DomainError> {
        if let Some(existing) = self.find_by_email(email).await? {
            if existing.is_admin {
                tracing::info!(user_id = %existing.id(), "Bootstrap admin already present");
                return Ok(existing);
            }
            let patch = UserPatch {
                is_admin: Some(true),
                ..Default::default()
            };
            let promoted = self
                .users
                .update(&existing.id(), &patch)
                .await?
                .ok_or_else(|| not_found(&existing.id()))?;
            tracing::warn!(
                user_id = %promoted.id(),
                "Bootstrap email belongs to a regular user, promoted to admin"
            );
            return Ok(promoted);
        }
        let admin = self
            .register(CreateUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                is_admin: true,
            })
            .await?;
        tracing::info!(user_id = %admin.id(), "Bootstrap admin created");
        Ok(admin)
    }

    async fn register(&self, input: CreateUser) -> Result<User, DomainError> {
        let email = input.email.trim().to_string();
        if self.find_by_email(&email).await?.is_some() {
            return Err(DomainError::DuplicateEmail(email));
        }
        let password_hash = self.hash_password(&input.password)?;

        let user = User::new(NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email,
            is_admin: input.is_admin,
            password_hash,
        })?;

        self.users.add(user).await
    }

    fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        if password.trim().is_empty() {
            return Err(ValidationError::Empty { field: "password" }.into());
        }
        self.hasher.hash(password)
    }

    /// Update a user. Users may edit their own names; email, password and
    /// admin flag changes require an admin.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &UserId,
        input: UpdateUser,
    ) -> Result<User, DomainError> {
        let existing = self.get(id).await?;
        authorize(actor, Operation::UpdateUser, Some(&existing.id()))?;
        if input.touches_credentials() {
            authorize(actor, Operation::UpdateUserCredentials, None)?;
        }

        let password_hash = input
            .password
            .as_deref()
            .map(|p| self.hash_password(p))
            .transpose()?;
        let patch = UserPatch {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            is_admin: input.is_admin,
            password_hash,
        }
        .validate()?;

        if let Some(email) = &patch.email {
            if let Some(other) = self.find_by_email(email).await? {
                if other.id() != *id {
                    return Err(DomainError::DuplicateEmail(email.clone()));
                }
            }
        }

        let updated = self
            .users
            .update(id, &patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(user_id = %id, "User updated");
        Ok(updated)
    }

    pub async fn get(&self, id: &UserId) -> Result<User, DomainError> {
        self.users.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.get_all().await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.users
            .get_by_attribute(&UserLookup::Email(email.trim().to_string()))
            .await
    }

    /// Places owned by the user
    pub async fn places_of(&self, id: &UserId) -> Result<Vec<Place>, DomainError> {
        self.get(id).await?;
        self.places
            .get_all_by_attribute(&PlaceLookup::Owner(*id))
            .await
    }

    /// Reviews written by the user
    pub async fn reviews_of(&self, id: &UserId) -> Result<Vec<Review>, DomainError> {
        self.get(id).await?;
        self.reviews
            .get_all_by_attribute(&ReviewLookup::User(*id))
            .await
    }

    /// Check an email/password pair
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let invalid = || DomainError::Unauthorized("Invalid credentials".to_string());
        let user = self.find_by_email(email).await?.ok_or_else(invalid)?;
        if self.hasher.verify(password, &user.password_hash) {
            Ok(user)
        } else {
            tracing::warn!(user_id = %user.id(), "Failed login attempt");
            Err(invalid())
        }
    }
}

fn not_found(id: &UserId) -> DomainError {
    DomainError::NotFound(format!("User {}", id))
}
