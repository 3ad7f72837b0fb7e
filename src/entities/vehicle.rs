use sea_orm::entity::prelude::*;

use crate::entities::category::Entity as Category;
use crate::entities::vehicle_image::Entity as VehicleImage;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub engine_type: Option<String>,
    pub length_mm: Option<i32>,
    pub width_mm: Option<i32>,
    pub height_mm: Option<i32>,
    pub condition: Option<String>,
    /// JSON-encoded ordered list of feature tags.
    #[sea_orm(column_type = "Text")]
    pub features: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_ja: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_en: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Category",
        from = "crate::entities::vehicle::Column::CategoryId",
        to = "crate::entities::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict",
    )]
    Category,
    #[sea_orm(has_many = "VehicleImage")]
    VehicleImage,
}

impl Related<Category> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<VehicleImage> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleImage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
