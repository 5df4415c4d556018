//! SeaORM adapter for reviews

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{db_err, is_unique_violation, utc};
use crate::domain::entities::{
    Identity, PlaceId, Record, Review, ReviewId, ReviewLookup, ReviewPatch, UserId,
};
use crate::domain::ports::Repository;
use crate::entity::{place_review, reviews};
use crate::error::DomainError;

pub struct DbReviewRepository {
    db: DatabaseConnection,
}

impl DbReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(review: &Review) -> reviews::ActiveModel {
    reviews::ActiveModel {
        id: Set(review.id().0),
        place_id: Set(review.place_id.0),
        user_id: Set(review.user_id.0),
        rating: Set(i32::from(review.rating)),
        text: Set(review.text.clone()),
        created_at: Set(review.identity.created_at.fixed_offset()),
        updated_at: Set(review.identity.updated_at.fixed_offset()),
    }
}

#[async_trait]
impl Repository<Review> for DbReviewRepository {
    async fn get(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        let result = reviews::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        result.map(Review::try_from).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Review>, DomainError> {
        let results = reviews::Entity::find()
            .order_by_asc(reviews::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(Review::try_from).collect()
    }

    async fn get_all_by_attribute(
        &self,
        lookup: &ReviewLookup,
    ) -> Result<Vec<Review>, DomainError> {
        let query = match lookup {
            ReviewLookup::Place(place_id) => {
                reviews::Entity::find().filter(reviews::Column::PlaceId.eq(place_id.0))
            }
            ReviewLookup::User(user_id) => {
                reviews::Entity::find().filter(reviews::Column::UserId.eq(user_id.0))
            }
            ReviewLookup::UserAndPlace(user_id, place_id) => reviews::Entity::find()
                .filter(reviews::Column::UserId.eq(user_id.0))
                .filter(reviews::Column::PlaceId.eq(place_id.0)),
        };
        let results = query
            .order_by_asc(reviews::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(Review::try_from).collect()
    }

    async fn add(&self, review: Review) -> Result<Review, DomainError> {
        if self.get(&review.id()).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!("Review {}", review.id())));
        }
        let result = active_model(&review).insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateReview {
                    user_id: review.user_id.to_string(),
                    place_id: review.place_id.to_string(),
                }
            } else {
                db_err(e)
            }
        })?;

        Review::try_from(result)
    }

    async fn update(
        &self,
        id: &ReviewId,
        patch: &ReviewPatch,
    ) -> Result<Option<Review>, DomainError> {
        let Some(mut review) = self.get(id).await? else {
            return Ok(None);
        };
        review.apply(patch);

        let mut model = active_model(&review);
        model.id = Unchanged(id.0);
        let result = model.update(&self.db).await.map_err(db_err)?;

        Review::try_from(result).map(Some)
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        place_review::Entity::delete_many()
            .filter(place_review::Column::ReviewId.eq(id.0))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = reviews::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

impl TryFrom<reviews::Model> for Review {
    type Error = DomainError;

    fn try_from(model: reviews::Model) -> Result<Self, Self::Error> {
        let rating = u8::try_from(model.rating).map_err(|_| {
            DomainError::Database(format!(
                "review {} has out-of-range rating {}",
                model.id, model.rating
            ))
        })?;

        Ok(Review {
            identity: Identity::restore(
                ReviewId(model.id),
                utc(model.created_at),
                utc(model.updated_at),
            ),
            place_id: PlaceId(model.place_id),
            user_id: UserId(model.user_id),
            rating,
            text: model.text,
        })
    }
}
