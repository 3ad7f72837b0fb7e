use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::vehicle::Entity as Vehicle;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "vehicle_images")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_id: i32,
    #[sea_orm(unique)]
    pub filename: String,
    pub url: String,
    pub thumbnail_url: String,
    pub display_order: i32,
    pub uploaded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Vehicle",
        from = "crate::entities::vehicle_image::Column::VehicleId",
        to = "crate::entities::vehicle::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade",
    )]
    Vehicle,
}

impl Related<Vehicle> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
