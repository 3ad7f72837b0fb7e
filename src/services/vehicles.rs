use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::category::{self, Entity as Category};
use crate::entities::vehicle::{self, Entity as Vehicle};
use crate::entities::vehicle_image::{self, Entity as VehicleImage};
use crate::error::ApiError;
use crate::services::page_params;
use crate::validation::{check_vehicle_input, Dimensions, VehicleInput};

pub const DEFAULT_STATUS: &str = "available";
pub const DEFAULT_RELATED_LIMIT: u64 = 4;
pub const MAX_RELATED_LIMIT: u64 = 20;

/// Every field is independently optional; a present field contributes
/// exactly one AND-ed predicate and an absent one contributes nothing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilters {
    pub category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Fully hydrated vehicle: category resolved to its slug, images attached in
/// display order, feature tags decoded from their JSON column.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub id: i32,
    pub category_id: i32,
    pub category: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub engine_type: Option<String>,
    pub dimensions: Dimensions,
    pub condition: Option<String>,
    pub features: Vec<String>,
    pub description_ja: Option<String>,
    pub description_en: Option<String>,
    pub status: String,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
    pub images: Vec<vehicle_image::Model>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePage {
    pub items: Vec<VehicleDetails>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

pub async fn list_vehicles(
    db: &DatabaseConnection,
    filters: &VehicleFilters,
) -> Result<VehiclePage, ApiError> {
    let (page, page_size) = page_params(filters.page, filters.page_size);

    let mut condition = Condition::all();
    if let Some(slug) = &filters.category {
        condition = condition.add(category::Column::Slug.eq(slug.clone()));
    }
    if let Some(min_price) = filters.min_price {
        condition = condition.add(vehicle::Column::Price.gte(min_price));
    }
    if let Some(max_price) = filters.max_price {
        condition = condition.add(vehicle::Column::Price.lte(max_price));
    }
    if let Some(min_year) = filters.min_year {
        condition = condition.add(vehicle::Column::Year.gte(min_year));
    }
    if let Some(max_year) = filters.max_year {
        condition = condition.add(vehicle::Column::Year.lte(max_year));
    }

    let paginator = Vehicle::find()
        .find_also_related(Category)
        .filter(condition)
        .order_by_desc(vehicle::Column::CreatedAt)
        .order_by_desc(vehicle::Column::Id)
        .paginate(db, page_size);

    let total_count = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;
    let items = hydrate_rows(db, rows).await?;

    Ok(VehiclePage {
        items,
        total_count,
        page,
        page_size,
    })
}

pub async fn get_vehicle(db: &DatabaseConnection, id: i32) -> Result<VehicleDetails, ApiError> {
    let row = Vehicle::find_by_id(id)
        .find_also_related(Category)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("vehicle", id))?;

    let mut hydrated = hydrate_rows(db, vec![row]).await?;
    hydrated
        .pop()
        .ok_or_else(|| ApiError::Internal("hydration dropped a fetched vehicle".to_string()))
}

pub async fn create_vehicle(
    db: &DatabaseConnection,
    input: VehicleInput,
) -> Result<VehicleDetails, ApiError> {
    check_vehicle_input(&input)?;
    let category = crate::services::categories::resolve_slug(db, &input.category).await?;

    let now = Utc::now();
    let mut model = active_model_from_input(&input, category.id, now)?;
    model.created_at = Set(now);
    let created = model.insert(db).await?;

    // Re-read through the hydration path so the caller observes exactly what
    // was persisted.
    get_vehicle(db, created.id).await
}

pub async fn update_vehicle(
    db: &DatabaseConnection,
    id: i32,
    input: VehicleInput,
) -> Result<VehicleDetails, ApiError> {
    let existing = Vehicle::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("vehicle", id))?;

    check_vehicle_input(&input)?;
    let category = crate::services::categories::resolve_slug(db, &input.category).await?;

    let mut model = active_model_from_input(&input, category.id, Utc::now())?;
    model.id = Set(existing.id);
    model.created_at = Set(existing.created_at);
    model.update(db).await?;

    get_vehicle(db, id).await
}

/// Deletes the vehicle and its owned image metadata rows. Binary assets are
/// the image component's concern; callers invoke
/// [`crate::services::images::delete_vehicle_assets`] first when blobs must
/// go too.
pub async fn delete_vehicle(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
    Vehicle::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("vehicle", id))?;

    VehicleImage::delete_many()
        .filter(vehicle_image::Column::VehicleId.eq(id))
        .exec(db)
        .await?;
    Vehicle::delete_by_id(id).exec(db).await?;
    Ok(())
}

pub async fn search_vehicles(
    db: &DatabaseConnection,
    query: &str,
) -> Result<Vec<VehicleDetails>, ApiError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let condition = Condition::any()
        .add(vehicle::Column::Make.contains(query))
        .add(vehicle::Column::Model.contains(query))
        .add(vehicle::Column::DescriptionJa.contains(query))
        .add(vehicle::Column::DescriptionEn.contains(query))
        .add(category::Column::NameJa.contains(query))
        .add(category::Column::NameEn.contains(query));

    let rows = Vehicle::find()
        .find_also_related(Category)
        .filter(condition)
        .order_by_desc(vehicle::Column::CreatedAt)
        .order_by_desc(vehicle::Column::Id)
        .all(db)
        .await?;

    hydrate_rows(db, rows).await
}

pub async fn related_vehicles(
    db: &DatabaseConnection,
    id: i32,
    limit: Option<u64>,
) -> Result<Vec<VehicleDetails>, ApiError> {
    let vehicle = Vehicle::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("vehicle", id))?;

    let limit = limit
        .unwrap_or(DEFAULT_RELATED_LIMIT)
        .clamp(1, MAX_RELATED_LIMIT);

    let rows = Vehicle::find()
        .find_also_related(Category)
        .filter(vehicle::Column::CategoryId.eq(vehicle.category_id))
        .filter(vehicle::Column::Id.ne(id))
        .order_by_desc(vehicle::Column::CreatedAt)
        .order_by_desc(vehicle::Column::Id)
        .limit(limit)
        .all(db)
        .await?;

    hydrate_rows(db, rows).await
}

fn active_model_from_input(
    input: &VehicleInput,
    category_id: i32,
    now: chrono::DateTime<Utc>,
) -> Result<vehicle::ActiveModel, ApiError> {
    let features = serde_json::to_string(&input.features)
        .map_err(|err| ApiError::Internal(format!("failed to encode features: {err}")))?;
    let dimensions = input.dimensions.clone().unwrap_or(Dimensions {
        length: None,
        width: None,
        height: None,
    });

    Ok(vehicle::ActiveModel {
        category_id: Set(category_id),
        make: Set(input.make.trim().to_owned()),
        model: Set(input.model.trim().to_owned()),
        year: Set(input.year),
        mileage: Set(input.mileage),
        price: Set(input.price),
        engine_type: Set(input.engine_type.clone()),
        length_mm: Set(dimensions.length),
        width_mm: Set(dimensions.width),
        height_mm: Set(dimensions.height),
        condition: Set(input.condition.clone()),
        features: Set(features),
        description_ja: Set(input.description_ja.clone()),
        description_en: Set(input.description_en.clone()),
        status: Set(input
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_owned())),
        updated_at: Set(now),
        ..Default::default()
    })
}

/// Attaches images (one batched query, grouped per vehicle) and decodes the
/// features column. An unparsable features value degrades to an empty list.
async fn hydrate_rows(
    db: &DatabaseConnection,
    rows: Vec<(vehicle::Model, Option<category::Model>)>,
) -> Result<Vec<VehicleDetails>, ApiError> {
    let ids: Vec<i32> = rows.iter().map(|(vehicle, _)| vehicle.id).collect();

    let mut images_by_vehicle: HashMap<i32, Vec<vehicle_image::Model>> = HashMap::new();
    if !ids.is_empty() {
        let images = VehicleImage::find()
            .filter(vehicle_image::Column::VehicleId.is_in(ids))
            .order_by_asc(vehicle_image::Column::DisplayOrder)
            .order_by_asc(vehicle_image::Column::Id)
            .all(db)
            .await?;
        for image in images {
            images_by_vehicle
                .entry(image.vehicle_id)
                .or_default()
                .push(image);
        }
    }

    let details = rows
        .into_iter()
        .map(|(vehicle, category)| {
            let images = images_by_vehicle.remove(&vehicle.id).unwrap_or_default();
            hydrate(vehicle, category, images)
        })
        .collect();

    Ok(details)
}

fn hydrate(
    vehicle: vehicle::Model,
    category: Option<category::Model>,
    images: Vec<vehicle_image::Model>,
) -> VehicleDetails {
    let features: Vec<String> = serde_json::from_str(&vehicle.features).unwrap_or_default();

    VehicleDetails {
        id: vehicle.id,
        category_id: vehicle.category_id,
        category: category.map(|category| category.slug).unwrap_or_default(),
        make: vehicle.make,
        model: vehicle.model,
        year: vehicle.year,
        mileage: vehicle.mileage,
        price: vehicle.price,
        engine_type: vehicle.engine_type,
        dimensions: Dimensions {
            length: vehicle.length_mm,
            width: vehicle.width_mm,
            height: vehicle.height_mm,
        },
        condition: vehicle.condition,
        features,
        description_ja: vehicle.description_ja,
        description_en: vehicle.description_en,
        status: vehicle.status,
        created_at: vehicle.created_at,
        updated_at: vehicle.updated_at,
        images,
    }
}
