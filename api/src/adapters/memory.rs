//! In-memory adapter
//!
//! A single generic map-backed repository used for every entity type.
//! Uniqueness rules are checked while holding the write lock, so two
//! concurrent inserts cannot both succeed.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::entities::Record;
use crate::domain::ports::Repository;
use crate::error::DomainError;

struct Store<E: Record> {
    by_id: HashMap<E::Id, E>,
    /// Insertion order for listings
    order: Vec<E::Id>,
}

impl<E: Record> Store<E> {
    fn ordered(&self) -> impl Iterator<Item = &E> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    fn find_conflict(&self, candidate: &E) -> Option<DomainError> {
        let candidate_id = candidate.id();
        self.by_id
            .values()
            .filter(|existing| existing.id() != candidate_id)
            .find_map(|existing| candidate.conflict(existing))
    }
}

pub struct InMemoryRepository<E: Record> {
    store: RwLock<Store<E>>,
}

impl<E: Record> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                by_id: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store<E>>, DomainError> {
        self.store.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store<E>>, DomainError> {
        self.store.write().map_err(poisoned)
    }
}

impl<E: Record> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::Internal("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl<E: Record> Repository<E> for InMemoryRepository<E> {
    async fn get(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        Ok(self.read()?.by_id.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.read()?.ordered().cloned().collect())
    }

    async fn get_all_by_attribute(&self, lookup: &E::Lookup) -> Result<Vec<E>, DomainError> {
        Ok(self
            .read()?
            .ordered()
            .filter(|e| e.matches(lookup))
            .cloned()
            .collect())
    }

    async fn add(&self, entity: E) -> Result<E, DomainError> {
        let mut store = self.write()?;
        let id = entity.id();
        if store.by_id.contains_key(&id) {
            return Err(DomainError::AlreadyExists(format!("{} {}", E::KIND, id)));
        }
        if let Some(conflict) = store.find_conflict(&entity) {
            return Err(conflict);
        }
        store.order.push(id);
        store.by_id.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<Option<E>, DomainError> {
        let mut store = self.write()?;
        let Some(existing) = store.by_id.get(id) else {
            return Ok(None);
        };
        let mut updated = existing.clone();
        updated.apply(patch);
        if let Some(conflict) = store.find_conflict(&updated) {
            return Err(conflict);
        }
        store.by_id.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &E::Id) -> Result<bool, DomainError> {
        let mut store = self.write()?;
        if store.by_id.remove(id).is_none() {
            return Ok(false);
        }
        store.order.retain(|existing| existing != id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Amenity, AmenityLookup, AmenityPatch, NewUser, User, UserLookup, UserPatch,
    };

    fn user(email: &str) -> User {
        User::new(NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            is_admin: false,
            password_hash: "hash".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn add_then_get() {
        let repo = InMemoryRepository::<User>::new();
        let stored = repo.add(user("a@example.com")).await.unwrap();

        let found = repo.get(&stored.id()).await.unwrap().unwrap();
        assert_eq!(found, stored);
        let by_email = repo
            .get_by_attribute(&UserLookup::Email("a@example.com".to_string()))
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id()), Some(stored.id()));
    }

    #[tokio::test]
    async fn add_rejects_taken_id() {
        let repo = InMemoryRepository::<Amenity>::new();
        let amenity = Amenity::new("Wi-Fi").unwrap();
        repo.add(amenity.clone()).await.unwrap();

        let err = repo.add(amenity).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn add_enforces_unique_email() {
        let repo = InMemoryRepository::<User>::new();
        repo.add(user("dup@example.com")).await.unwrap();

        let err = repo.add(user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEmail(_)));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_enforces_unique_email() {
        let repo = InMemoryRepository::<User>::new();
        repo.add(user("taken@example.com")).await.unwrap();
        let other = repo.add(user("free@example.com")).await.unwrap();

        let patch = UserPatch {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };
        let err = repo.update(&other.id(), &patch).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEmail(_)));

        // Unchanged on failure
        let stored = repo.get(&other.id()).await.unwrap().unwrap();
        assert_eq!(stored.email, "free@example.com");
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let repo = InMemoryRepository::<Amenity>::new();
        let patch = AmenityPatch {
            name: Some("Pool".to_string()),
        };
        let result = repo.update(&Amenity::new("x").unwrap().id(), &patch).await;
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_keeps_creation_order() {
        let repo = InMemoryRepository::<Amenity>::new();
        for name in ["Wi-Fi", "Pool", "Parking"] {
            repo.add(Amenity::new(name).unwrap()).await.unwrap();
        }

        let names: Vec<_> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Wi-Fi", "Pool", "Parking"]);
        assert_eq!(
            repo.get_all_by_attribute(&AmenityLookup::Name("Pool".to_string()))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let repo = InMemoryRepository::<Amenity>::new();
        let amenity = repo.add(Amenity::new("Sauna").unwrap()).await.unwrap();

        assert!(repo.delete(&amenity.id()).await.unwrap());
        assert!(!repo.delete(&amenity.id()).await.unwrap());
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
