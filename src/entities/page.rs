use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "pages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub title_ja: String,
    pub title_en: String,
    #[sea_orm(column_type = "Text")]
    pub content_ja: String,
    #[sea_orm(column_type = "Text")]
    pub content_en: String,
    pub meta_description_ja: Option<String>,
    pub meta_description_en: Option<String>,
    pub is_published: bool,
    pub show_in_nav: bool,
    pub featured_image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
