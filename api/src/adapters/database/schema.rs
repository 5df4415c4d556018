//! Schema creation from the SeaORM entity definitions

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

use crate::entity::{amenities, place_amenity, place_review, places, reviews, users};

/// Create every table (parents first) and the review uniqueness index.
/// Safe to run against an existing database.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut tables = vec![
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(amenities::Entity),
        schema.create_table_from_entity(places::Entity),
        schema.create_table_from_entity(reviews::Entity),
        schema.create_table_from_entity(place_amenity::Entity),
        schema.create_table_from_entity(place_review::Entity),
    ];
    for table in tables.iter_mut() {
        table.if_not_exists();
        db.execute(backend.build(&*table)).await?;
    }

    // One review per (user, place)
    let index = Index::create()
        .name("idx_reviews_user_place")
        .table(reviews::Entity)
        .col(reviews::Column::UserId)
        .col(reviews::Column::PlaceId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&index)).await?;

    tracing::info!("Database schema ready");
    Ok(())
}
