use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::page::{self, Entity as Page};
use crate::error::ApiError;
use crate::storage::LocalStorage;
use crate::validation::{FieldError, SLUG_REGEX};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub slug: String,
    pub title_ja: String,
    pub title_en: String,
    pub content_ja: String,
    pub content_en: String,
    pub meta_description_ja: Option<String>,
    pub meta_description_en: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub show_in_nav: bool,
    pub featured_image: Option<String>,
}

/// Public listing: published pages only, optionally narrowed to the ones
/// flagged for navigation.
pub async fn list_published(
    db: &DatabaseConnection,
    nav_only: bool,
) -> Result<Vec<page::Model>, ApiError> {
    let mut query = Page::find().filter(page::Column::IsPublished.eq(true));
    if nav_only {
        query = query.filter(page::Column::ShowInNav.eq(true));
    }
    Ok(query.order_by_asc(page::Column::Id).all(db).await?)
}

pub async fn get_published_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<page::Model>, ApiError> {
    Ok(Page::find()
        .filter(page::Column::Slug.eq(slug))
        .filter(page::Column::IsPublished.eq(true))
        .one(db)
        .await?)
}

pub async fn list_pages(db: &DatabaseConnection) -> Result<Vec<page::Model>, ApiError> {
    Ok(Page::find().order_by_asc(page::Column::Id).all(db).await?)
}

pub async fn create_page(
    db: &DatabaseConnection,
    input: PageInput,
) -> Result<page::Model, ApiError> {
    check_slug(&input.slug)?;
    let clash = Page::find()
        .filter(page::Column::Slug.eq(input.slug.as_str()))
        .one(db)
        .await?;
    if clash.is_some() {
        return Err(ApiError::Invalid(format!(
            "page slug already exists: {}",
            input.slug
        )));
    }

    let created = active_model_from_input(input).insert(db).await?;
    Ok(created)
}

pub async fn update_page(
    db: &DatabaseConnection,
    storage: &LocalStorage,
    id: i32,
    input: PageInput,
) -> Result<page::Model, ApiError> {
    check_slug(&input.slug)?;
    let existing = Page::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("page", id))?;

    let clash = Page::find()
        .filter(page::Column::Slug.eq(input.slug.as_str()))
        .filter(page::Column::Id.ne(id))
        .one(db)
        .await?;
    if clash.is_some() {
        return Err(ApiError::Invalid(format!(
            "page slug already exists: {}",
            input.slug
        )));
    }

    // A replaced featured image leaves its old blob behind; drop it.
    if let Some(old) = &existing.featured_image {
        if input.featured_image.as_deref() != Some(old.as_str()) {
            remove_blob(storage, old);
        }
    }

    let mut model = active_model_from_input(input);
    model.id = Set(existing.id);
    let updated = model.update(db).await?;
    Ok(updated)
}

pub async fn delete_page(
    db: &DatabaseConnection,
    storage: &LocalStorage,
    id: i32,
) -> Result<(), ApiError> {
    let existing = Page::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("page", id))?;

    if let Some(featured) = &existing.featured_image {
        remove_blob(storage, featured);
    }

    Page::delete_by_id(id).exec(db).await?;
    Ok(())
}

fn check_slug(slug: &str) -> Result<(), ApiError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(ApiError::Validation(vec![FieldError::new(
            "slug",
            "must contain only lowercase letters, digits, and hyphens",
        )]))
    }
}

fn remove_blob(storage: &LocalStorage, filename: &str) {
    if let Err(err) = storage.remove(filename) {
        tracing::warn!(filename = %filename, error = %err, "failed to remove page asset");
    }
}

fn active_model_from_input(input: PageInput) -> page::ActiveModel {
    page::ActiveModel {
        slug: Set(input.slug),
        title_ja: Set(input.title_ja),
        title_en: Set(input.title_en),
        content_ja: Set(input.content_ja),
        content_en: Set(input.content_en),
        meta_description_ja: Set(input.meta_description_ja),
        meta_description_en: Set(input.meta_description_en),
        is_published: Set(input.is_published),
        show_in_nav: Set(input.show_in_nav),
        featured_image: Set(input.featured_image),
        ..Default::default()
    }
}
