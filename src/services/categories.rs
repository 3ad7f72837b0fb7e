use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::category::{self, Entity as Category};
use crate::entities::vehicle::{self, Entity as Vehicle};
use crate::error::ApiError;
use crate::validation::{FieldError, SLUG_REGEX};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name_ja: String,
    pub name_en: String,
    pub slug: String,
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ApiError> {
    let categories = Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;
    Ok(categories)
}

pub async fn get_category(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<category::Model>, ApiError> {
    Ok(Category::find_by_id(id).one(db).await?)
}

pub async fn get_category_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<category::Model>, ApiError> {
    Ok(Category::find()
        .filter(category::Column::Slug.eq(slug))
        .one(db)
        .await?)
}

/// Slug-to-record resolution for the vehicle write path. An unresolvable
/// slug is a domain error, not a 404: the missing thing is the client's
/// input, not the addressed resource.
pub async fn resolve_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<category::Model, ApiError> {
    get_category_by_slug(db, slug)
        .await?
        .ok_or_else(|| ApiError::Invalid(format!("invalid category: {}", slug)))
}

pub async fn create_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<category::Model, ApiError> {
    if !SLUG_REGEX.is_match(&input.slug) {
        return Err(ApiError::Validation(vec![FieldError::new(
            "slug",
            "must contain only lowercase letters, digits, and hyphens",
        )]));
    }
    if get_category_by_slug(db, &input.slug).await?.is_some() {
        return Err(ApiError::Invalid(format!(
            "category slug already exists: {}",
            input.slug
        )));
    }

    let created = category::ActiveModel {
        name_ja: Set(input.name_ja),
        name_en: Set(input.name_en),
        slug: Set(input.slug),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(created)
}

/// Categories are referenced, never owned; deletion is refused while any
/// vehicle still points at the record.
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
    let existing = get_category(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("category", id))?;

    let referencing = Vehicle::find()
        .filter(vehicle::Column::CategoryId.eq(existing.id))
        .count(db)
        .await?;
    if referencing > 0 {
        return Err(ApiError::Invalid(format!(
            "category {} is referenced by {} vehicle(s)",
            existing.slug, referencing
        )));
    }

    Category::delete_by_id(id).exec(db).await?;
    Ok(())
}
