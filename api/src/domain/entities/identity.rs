//! Identity shared by every catalog record
//!
//! Each entity embeds an [`Identity`] value instead of inheriting from a base
//! record: an immutable id and creation time plus an update time refreshed on
//! every successful mutation.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Declares a UUID-backed identifier newtype for an entity
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub struct $name(pub ::uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| format!("Invalid {} id: {}", $label, s))
            }
        }
    };
}

pub(crate) use entity_id;

/// Id and timestamps of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity<I> {
    pub id: I,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<I: Copy> Identity<I> {
    /// Fresh identity stamped with the current time
    pub fn new(id: I) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an identity loaded from storage
    pub fn restore(id: I, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            updated_at,
        }
    }

    /// Record a mutation. Never moves `updated_at` backwards.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// A storable entity: what the generic repository needs to know about it
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Display + Send + Sync + 'static;
    /// Exact-match attribute lookups supported for this entity
    type Lookup: fmt::Debug + Send + Sync;
    /// Fields that may change after creation
    type Patch: fmt::Debug + Send + Sync;

    /// Human-readable entity name used in error messages
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    fn matches(&self, lookup: &Self::Lookup) -> bool;

    /// Apply an already-validated patch and refresh `updated_at`
    fn apply(&mut self, patch: &Self::Patch);

    /// Storage-level uniqueness rule between two distinct records
    fn conflict(&self, _other: &Self) -> Option<DomainError> {
        None
    }
}
