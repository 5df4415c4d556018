//! Authentication
//!
//! Password hashing, bearer token issuing and the middleware that turns a
//! token into the current [`Actor`](crate::domain::Actor).

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::auth_middleware;
pub use password::Pbkdf2PasswordHasher;
pub use token::TokenIssuer;
