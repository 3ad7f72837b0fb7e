use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::inquiry::{self, Entity as Inquiry, InquiryStatus, InquiryType};
use crate::entities::vehicle::Entity as Vehicle;
use crate::error::ApiError;
use crate::services::page_params;
use crate::validation::{check_inquiry_input, FieldError, InquiryInput};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryFilters {
    pub status: Option<String>,
    pub vehicle_id: Option<i32>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPage {
    pub items: Vec<inquiry::Model>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

pub async fn create_inquiry(
    db: &DatabaseConnection,
    input: InquiryInput,
) -> Result<inquiry::Model, ApiError> {
    check_inquiry_input(&input)?;

    Vehicle::find_by_id(input.vehicle_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ApiError::Invalid(format!("vehicle {} does not exist", input.vehicle_id))
        })?;

    // Validation already vouched for the type string.
    let inquiry_type = InquiryType::from_str(&input.inquiry_type)
        .map_err(|_| ApiError::Internal("inquiry type slipped past validation".to_string()))?;

    let none_if_blank = |value: Option<String>| {
        value
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    };

    let created = inquiry::ActiveModel {
        vehicle_id: Set(input.vehicle_id),
        customer_name: Set(input.customer_name.trim().to_owned()),
        customer_email: Set(none_if_blank(input.customer_email)),
        customer_phone: Set(none_if_blank(input.customer_phone)),
        message: Set(input.message),
        inquiry_type: Set(inquiry_type),
        // Submissions always enter the pipeline as new, whatever the client
        // claims.
        status: Set(InquiryStatus::New),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(created)
}

pub async fn list_inquiries(
    db: &DatabaseConnection,
    filters: &InquiryFilters,
) -> Result<InquiryPage, ApiError> {
    let (page, page_size) = page_params(filters.page, filters.page_size);

    let mut condition = Condition::all();
    if let Some(status) = &filters.status {
        let status = InquiryStatus::from_str(status).map_err(|_| {
            ApiError::Invalid(format!("unknown inquiry status: {}", status))
        })?;
        condition = condition.add(inquiry::Column::Status.eq(status));
    }
    if let Some(vehicle_id) = filters.vehicle_id {
        condition = condition.add(inquiry::Column::VehicleId.eq(vehicle_id));
    }

    let paginator = Inquiry::find()
        .filter(condition)
        .order_by_desc(inquiry::Column::CreatedAt)
        .order_by_desc(inquiry::Column::Id)
        .paginate(db, page_size);

    let total_count = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(InquiryPage {
        items,
        total_count,
        page,
        page_size,
    })
}

pub async fn update_inquiry_status(
    db: &DatabaseConnection,
    id: i32,
    status: &str,
) -> Result<inquiry::Model, ApiError> {
    let parsed = InquiryStatus::from_str(status).map_err(|_| {
        ApiError::Validation(vec![FieldError::new(
            "status",
            "must be one of new, contacted, closed",
        )])
    })?;

    let existing = Inquiry::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("inquiry", id))?;

    let mut model: inquiry::ActiveModel = existing.into();
    model.status = Set(parsed);
    let updated = model.update(db).await?;

    Ok(updated)
}
