//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod credentials;
pub mod repositories;

pub use credentials::PasswordHasher;
#[cfg(test)]
pub use credentials::MockPasswordHasher;
pub use repositories::{Repositories, Repository};
