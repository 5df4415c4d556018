//! SeaORM adapter for places
//!
//! A place row plus two ordered link tables: `place_amenity` and
//! `place_review`. Writes touching the links run in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{db_err, utc};
use crate::domain::entities::{
    AmenityId, Identity, Place, PlaceId, PlaceLookup, PlacePatch, Record, ReviewId, UserId,
};
use crate::domain::ports::Repository;
use crate::entity::{place_amenity, place_review, places};
use crate::error::DomainError;

pub struct DbPlaceRepository {
    db: DatabaseConnection,
}

impl DbPlaceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(place: &Place) -> places::ActiveModel {
    places::ActiveModel {
        id: Set(place.id().0),
        owner_id: Set(place.owner_id.0),
        title: Set(place.title.clone()),
        description: Set(place.description.clone()),
        price: Set(place.price),
        latitude: Set(place.latitude),
        longitude: Set(place.longitude),
        created_at: Set(place.identity.created_at.fixed_offset()),
        updated_at: Set(place.identity.updated_at.fixed_offset()),
    }
}

fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

async fn replace_amenity_links<C: ConnectionTrait>(
    conn: &C,
    place_id: Uuid,
    amenities: &[AmenityId],
) -> Result<(), DomainError> {
    place_amenity::Entity::delete_many()
        .filter(place_amenity::Column::PlaceId.eq(place_id))
        .exec(conn)
        .await
        .map_err(db_err)?;
    if amenities.is_empty() {
        return Ok(());
    }

    let links = amenities
        .iter()
        .enumerate()
        .map(|(i, amenity_id)| place_amenity::ActiveModel {
            place_id: Set(place_id),
            amenity_id: Set(amenity_id.0),
            position: Set(position(i)),
        });
    place_amenity::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn replace_review_links<C: ConnectionTrait>(
    conn: &C,
    place_id: Uuid,
    reviews: &[ReviewId],
) -> Result<(), DomainError> {
    place_review::Entity::delete_many()
        .filter(place_review::Column::PlaceId.eq(place_id))
        .exec(conn)
        .await
        .map_err(db_err)?;
    if reviews.is_empty() {
        return Ok(());
    }

    let links = reviews
        .iter()
        .enumerate()
        .map(|(i, review_id)| place_review::ActiveModel {
            place_id: Set(place_id),
            review_id: Set(review_id.0),
            position: Set(position(i)),
        });
    place_review::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Append one review link after the current last position. Linking a
/// review twice leaves the existing row alone.
async fn link_review<C: ConnectionTrait>(
    conn: &C,
    place_id: Uuid,
    review_id: ReviewId,
) -> Result<(), DomainError> {
    if place_review::Entity::find_by_id((place_id, review_id.0))
        .one(conn)
        .await
        .map_err(db_err)?
        .is_some()
    {
        return Ok(());
    }
    let last = place_review::Entity::find()
        .filter(place_review::Column::PlaceId.eq(place_id))
        .order_by_desc(place_review::Column::Position)
        .one(conn)
        .await
        .map_err(db_err)?;

    place_review::ActiveModel {
        place_id: Set(place_id),
        review_id: Set(review_id.0),
        position: Set(last.map_or(0, |link| link.position.saturating_add(1))),
    }
    .insert(conn)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Attach the ordered reference lists to place rows
async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    models: Vec<places::Model>,
) -> Result<Vec<Place>, DomainError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let amenity_links = place_amenity::Entity::find()
        .filter(place_amenity::Column::PlaceId.is_in(ids.clone()))
        .order_by_asc(place_amenity::Column::Position)
        .all(conn)
        .await
        .map_err(db_err)?;
    let review_links = place_review::Entity::find()
        .filter(place_review::Column::PlaceId.is_in(ids))
        .order_by_asc(place_review::Column::Position)
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut amenities: HashMap<Uuid, Vec<AmenityId>> = HashMap::new();
    for link in amenity_links {
        amenities
            .entry(link.place_id)
            .or_default()
            .push(AmenityId(link.amenity_id));
    }
    let mut reviews: HashMap<Uuid, Vec<ReviewId>> = HashMap::new();
    for link in review_links {
        reviews
            .entry(link.place_id)
            .or_default()
            .push(ReviewId(link.review_id));
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let amenities = amenities.remove(&model.id).unwrap_or_default();
            let reviews = reviews.remove(&model.id).unwrap_or_default();
            place_from_model(model, amenities, reviews)
        })
        .collect())
}

fn place_from_model(
    model: places::Model,
    amenities: Vec<AmenityId>,
    reviews: Vec<ReviewId>,
) -> Place {
    Place {
        identity: Identity::restore(
            PlaceId(model.id),
            utc(model.created_at),
            utc(model.updated_at),
        ),
        owner_id: UserId(model.owner_id),
        title: model.title,
        description: model.description,
        price: model.price,
        latitude: model.latitude,
        longitude: model.longitude,
        amenities,
        reviews,
    }
}

impl DbPlaceRepository {
    async fn find_one<C: ConnectionTrait>(
        conn: &C,
        id: &PlaceId,
    ) -> Result<Option<Place>, DomainError> {
        let Some(model) = places::Entity::find_by_id(id.0)
            .one(conn)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        Ok(hydrate(conn, vec![model]).await?.pop())
    }
}

#[async_trait]
impl Repository<Place> for DbPlaceRepository {
    async fn get(&self, id: &PlaceId) -> Result<Option<Place>, DomainError> {
        Self::find_one(&self.db, id).await
    }

    async fn get_all(&self) -> Result<Vec<Place>, DomainError> {
        let models = places::Entity::find()
            .order_by_asc(places::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, models).await
    }

    async fn get_all_by_attribute(&self, lookup: &PlaceLookup) -> Result<Vec<Place>, DomainError> {
        let query = match lookup {
            PlaceLookup::Owner(owner_id) => {
                places::Entity::find().filter(places::Column::OwnerId.eq(owner_id.0))
            }
            PlaceLookup::Title(title) => {
                places::Entity::find().filter(places::Column::Title.eq(title.as_str()))
            }
        };
        let models = query
            .order_by_asc(places::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, models).await
    }

    async fn add(&self, place: Place) -> Result<Place, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if places::Entity::find_by_id(place.id().0)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some()
        {
            return Err(DomainError::AlreadyExists(format!("Place {}", place.id())));
        }
        active_model(&place).insert(&txn).await.map_err(db_err)?;
        replace_amenity_links(&txn, place.id().0, &place.amenities).await?;
        replace_review_links(&txn, place.id().0, &place.reviews).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(place)
    }

    async fn update(&self, id: &PlaceId, patch: &PlacePatch) -> Result<Option<Place>, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(mut place) = Self::find_one(&txn, id).await? else {
            return Ok(None);
        };
        place.apply(patch);

        let mut model = active_model(&place);
        model.id = Unchanged(id.0);
        model.update(&txn).await.map_err(db_err)?;
        if patch.amenities.is_some() {
            replace_amenity_links(&txn, id.0, &place.amenities).await?;
        }
        if patch.reviews.is_some() {
            replace_review_links(&txn, id.0, &place.reviews).await?;
        } else {
            if let Some(review_id) = patch.unlink_review {
                place_review::Entity::delete_by_id((id.0, review_id.0))
                    .exec(&txn)
                    .await
                    .map_err(db_err)?;
            }
            if let Some(review_id) = patch.link_review {
                link_review(&txn, id.0, review_id).await?;
            }
        }

        txn.commit().await.map_err(db_err)?;
        Ok(Some(place))
    }

    async fn delete(&self, id: &PlaceId) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        replace_amenity_links(&txn, id.0, &[]).await?;
        replace_review_links(&txn, id.0, &[]).await?;
        let result = places::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
