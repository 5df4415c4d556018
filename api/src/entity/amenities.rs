use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "amenities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::place_amenity::Entity")]
    PlaceAmenity,
}

impl Related<super::place_amenity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaceAmenity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
