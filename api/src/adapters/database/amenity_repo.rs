//! SeaORM adapter for amenities

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{db_err, utc};
use crate::domain::entities::{Amenity, AmenityId, AmenityLookup, AmenityPatch, Identity, Record};
use crate::domain::ports::Repository;
use crate::entity::amenities;
use crate::error::DomainError;

pub struct DbAmenityRepository {
    db: DatabaseConnection,
}

impl DbAmenityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(amenity: &Amenity) -> amenities::ActiveModel {
    amenities::ActiveModel {
        id: Set(amenity.id().0),
        name: Set(amenity.name.clone()),
        created_at: Set(amenity.identity.created_at.fixed_offset()),
        updated_at: Set(amenity.identity.updated_at.fixed_offset()),
    }
}

#[async_trait]
impl Repository<Amenity> for DbAmenityRepository {
    async fn get(&self, id: &AmenityId) -> Result<Option<Amenity>, DomainError> {
        let result = amenities::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn get_all(&self) -> Result<Vec<Amenity>, DomainError> {
        let results = amenities::Entity::find()
            .order_by_asc(amenities::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn get_all_by_attribute(
        &self,
        lookup: &AmenityLookup,
    ) -> Result<Vec<Amenity>, DomainError> {
        let query = match lookup {
            AmenityLookup::Name(name) => {
                amenities::Entity::find().filter(amenities::Column::Name.eq(name.as_str()))
            }
        };
        let results = query
            .order_by_asc(amenities::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn add(&self, amenity: Amenity) -> Result<Amenity, DomainError> {
        if self.get(&amenity.id()).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!("Amenity {}", amenity.id())));
        }
        let result = active_model(&amenity)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: &AmenityId,
        patch: &AmenityPatch,
    ) -> Result<Option<Amenity>, DomainError> {
        let Some(mut amenity) = self.get(id).await? else {
            return Ok(None);
        };
        amenity.apply(patch);

        let mut model = active_model(&amenity);
        model.id = Unchanged(id.0);
        let result = model.update(&self.db).await.map_err(db_err)?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: &AmenityId) -> Result<bool, DomainError> {
        let result = amenities::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

impl From<amenities::Model> for Amenity {
    fn from(model: amenities::Model) -> Self {
        Amenity {
            identity: Identity::restore(
                AmenityId(model.id),
                utc(model.created_at),
                utc(model.updated_at),
            ),
            name: model.name,
        }
    }
}
