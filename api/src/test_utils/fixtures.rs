//! Test fixtures
//!
//! Factory functions for a ready catalog and valid payloads with sensible
//! defaults. Each payload can be customized before use.

use std::sync::Arc;

use crate::app::{Catalog, CreatePlace, CreateUser};
use crate::auth::{Pbkdf2PasswordHasher, TokenIssuer};
use crate::config::{Config, StorageBackend};
use crate::domain::entities::{NumericInput, User, UserId};
use crate::domain::ports::Repositories;
use crate::domain::Actor;
use crate::AppState;

pub const TEST_PASSWORD: &str = "secret123";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin1234";

/// An in-memory catalog with a single-round hasher to keep tests fast
pub fn catalog() -> Catalog {
    Catalog::new(
        Repositories::in_memory(),
        Arc::new(Pbkdf2PasswordHasher::new(1)),
    )
}

/// In-memory settings with login rate limiting off
pub fn test_config() -> Config {
    Config {
        storage: StorageBackend::Memory,
        database_url: "sqlite::memory:".to_string(),
        token_secret: "test-token-secret".to_string(),
        token_ttl_seconds: 3600,
        password_hash_rounds: 1,
        admin: None,
        login_rate_limit: false,
        port: 0,
    }
}

/// Handler state around an existing catalog
pub fn app_state(catalog: Arc<Catalog>) -> AppState {
    let config = test_config();
    AppState {
        catalog,
        tokens: Arc::new(TokenIssuer::new(
            &config.token_secret,
            config.token_ttl_seconds,
        )),
        config,
    }
}

/// Create (or reuse) the administrator and return it as an actor
pub async fn seed_admin(catalog: &Catalog) -> Actor {
    let admin = catalog
        .users
        .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin", "User")
        .await
        .expect("seed admin");
    Actor::admin(admin.id())
}

/// Create a regular user with [`TEST_PASSWORD`] and return it with its actor
pub async fn seed_user(catalog: &Catalog, email: &str) -> (User, Actor) {
    let user = catalog
        .users
        .create(Some(&Actor::admin(UserId::new())), create_user_input(email))
        .await
        .expect("seed user");
    let actor = Actor::user(user.id());
    (user, actor)
}

/// A valid user payload
pub fn create_user_input(email: &str) -> CreateUser {
    CreateUser {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        is_admin: false,
    }
}

/// A valid place payload owned by the caller
pub fn create_place_input(price: f64, latitude: f64, longitude: f64) -> CreatePlace {
    CreatePlace {
        title: "Cozy Apartment".to_string(),
        description: Some("A nice place to stay".to_string()),
        price: NumericInput::Number(price),
        latitude: NumericInput::Number(latitude),
        longitude: NumericInput::Number(longitude),
        owner_id: None,
        amenities: Vec::new(),
        reviews: Vec::new(),
    }
}
