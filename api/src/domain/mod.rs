//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models for users, places, amenities and reviews
//! - `ports`: Trait definitions for storage and credential hashing
//! - `authorization`: Who may perform which mutation

pub mod authorization;
pub mod entities;
pub mod ports;

pub use authorization::{Actor, Surface};
