//! Repository doubles
//!
//! `FailingRepository` answers every call with a backend error so tests can
//! check that storage failures surface as internal errors instead of being
//! mistaken for missing records.

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::domain::entities::Record;
use crate::domain::ports::Repository;
use crate::error::DomainError;

pub struct FailingRepository<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> FailingRepository<E> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

fn backend_down<T>() -> Result<T, DomainError> {
    Err(DomainError::Database("connection refused".to_string()))
}

#[async_trait]
impl<E: Record> Repository<E> for FailingRepository<E> {
    async fn get(&self, _id: &E::Id) -> Result<Option<E>, DomainError> {
        backend_down()
    }

    async fn get_all(&self) -> Result<Vec<E>, DomainError> {
        backend_down()
    }

    async fn get_all_by_attribute(&self, _lookup: &E::Lookup) -> Result<Vec<E>, DomainError> {
        backend_down()
    }

    async fn add(&self, _entity: E) -> Result<E, DomainError> {
        backend_down()
    }

    async fn update(&self, _id: &E::Id, _patch: &E::Patch) -> Result<Option<E>, DomainError> {
        backend_down()
    }

    async fn delete(&self, _id: &E::Id) -> Result<bool, DomainError> {
        backend_down()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;
    use crate::app::Catalog;
    use crate::auth::Pbkdf2PasswordHasher;
    use crate::domain::entities::{Place, PlaceId, Review, UserId};
    use crate::domain::ports::Repositories;
    use crate::domain::Actor;
    use crate::error::AppError;
    use crate::test_utils::{create_place_input, create_user_input, seed_user};

    fn catalog_with_broken_places() -> Catalog {
        let mut repos = Repositories::in_memory();
        repos.places = Arc::new(FailingRepository::<Place>::new());
        repos.reviews = Arc::new(FailingRepository::<Review>::new());
        Catalog::new(repos, Arc::new(Pbkdf2PasswordHasher::new(1)))
    }

    #[tokio::test]
    async fn storage_failures_are_not_not_found() {
        let catalog = catalog_with_broken_places();

        let err = catalog.places.get(&PlaceId::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));

        let err = catalog.places.list().await.unwrap_err();
        assert_eq!(
            AppError::from(err).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn failures_propagate_through_mutations() {
        let catalog = catalog_with_broken_places();
        let (_, actor) = seed_user(&catalog, "owner@example.com").await;

        let err = catalog
            .places
            .create(Some(&actor), create_place_input(10.0, 0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));

        // Users live in a healthy repository but their derived views do not
        let err = catalog.users.places_of(&actor.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));
    }

    #[tokio::test]
    async fn failing_user_store_blocks_registration() {
        let mut repos = Repositories::in_memory();
        repos.users = Arc::new(FailingRepository::new());
        let catalog = Catalog::new(repos, Arc::new(Pbkdf2PasswordHasher::new(1)));

        let err = catalog
            .users
            .create(
                Some(&Actor::admin(UserId::new())),
                create_user_input("a@example.com"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));
    }
}
