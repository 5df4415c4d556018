//! SeaORM adapter for users

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{db_err, is_unique_violation, utc};
use crate::domain::entities::{Identity, Record, User, UserId, UserLookup, UserPatch};
use crate::domain::ports::Repository;
use crate::entity::users;
use crate::error::DomainError;

pub struct DbUserRepository {
    db: DatabaseConnection,
}

impl DbUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id().0),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        is_admin: Set(user.is_admin),
        created_at: Set(user.identity.created_at.fixed_offset()),
        updated_at: Set(user.identity.updated_at.fixed_offset()),
    }
}

fn write_err(user: &User, e: sea_orm::DbErr) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::DuplicateEmail(user.email.clone())
    } else {
        db_err(e)
    }
}

#[async_trait]
impl Repository<User> for DbUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn get_all(&self) -> Result<Vec<User>, DomainError> {
        let results = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn get_all_by_attribute(&self, lookup: &UserLookup) -> Result<Vec<User>, DomainError> {
        let query = match lookup {
            UserLookup::Email(email) => {
                users::Entity::find().filter(users::Column::Email.eq(email.as_str()))
            }
        };
        let results = query
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn add(&self, user: User) -> Result<User, DomainError> {
        if self.get(&user.id()).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!("User {}", user.id())));
        }
        let result = active_model(&user)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(&user, e))?;

        Ok(result.into())
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<Option<User>, DomainError> {
        let Some(mut user) = self.get(id).await? else {
            return Ok(None);
        };
        user.apply(patch);

        let mut model = active_model(&user);
        model.id = Unchanged(id.0);
        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_err(&user, e))?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = users::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            identity: Identity::restore(
                UserId(model.id),
                utc(model.created_at),
                utc(model.updated_at),
            ),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            is_admin: model.is_admin,
            password_hash: model.password_hash,
        }
    }
}
