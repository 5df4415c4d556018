//! Test utilities
//!
//! Fixtures build a fully wired in-memory [`Catalog`](crate::app::Catalog)
//! and seed it with users. The doubles in `mocks` stand in for storage that
//! fails, which the real adapters cannot be made to do on demand.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
