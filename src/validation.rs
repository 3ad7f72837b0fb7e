use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

use crate::entities::inquiry::InquiryType;
use crate::error::ApiError;

pub static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]{1,64}$").unwrap());
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const MIN_VEHICLE_YEAR: i32 = 1990;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> FieldError {
        FieldError {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub length: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    /// Category slug, resolved to a foreign key at write time.
    pub category: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub make: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub engine_type: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub condition: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description_ja: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description_en: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InquiryInput {
    pub vehicle_id: i32,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub message: String,
    pub inquiry_type: String,
}

/// Collects every field error instead of stopping at the first one, so a
/// client can render the whole form state from a single response.
pub fn validate_vehicle_input(input: &VehicleInput) -> Vec<FieldError> {
    let mut errors = flatten(input.validate());

    if input.make.trim().is_empty() {
        errors.push(FieldError::new("make", "is required"));
    }
    if input.model.trim().is_empty() {
        errors.push(FieldError::new("model", "is required"));
    }

    let max_year = Utc::now().year() + 1;
    if input.year < MIN_VEHICLE_YEAR {
        errors.push(FieldError::new(
            "year",
            format!("must be {} or later", MIN_VEHICLE_YEAR),
        ));
    }
    if input.year > max_year {
        errors.push(FieldError::new(
            "year",
            format!("must be {} or earlier", max_year),
        ));
    }

    if input.price <= 0 {
        errors.push(FieldError::new("price", "must be greater than 0"));
    }
    if input.mileage < 0 {
        errors.push(FieldError::new("mileage", "must not be negative"));
    }

    errors
}

pub fn validate_inquiry_input(input: &InquiryInput) -> Vec<FieldError> {
    let mut errors = flatten(input.validate());

    if input.customer_name.trim().is_empty() {
        errors.push(FieldError::new("customerName", "is required"));
    }
    if input.message.trim().is_empty() {
        errors.push(FieldError::new("message", "is required"));
    }
    if input.vehicle_id <= 0 {
        errors.push(FieldError::new("vehicleId", "must be a positive number"));
    }

    let email = input
        .customer_email
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let phone = input
        .customer_phone
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if email.is_none() && phone.is_none() {
        errors.push(FieldError::new("customerEmail", "email or phone is required"));
        errors.push(FieldError::new("customerPhone", "email or phone is required"));
    }

    if let Some(email) = email {
        if !EMAIL_REGEX.is_match(email) {
            errors.push(FieldError::new("customerEmail", "must be a valid email address"));
        }
    }

    if InquiryType::from_str(&input.inquiry_type).is_err() {
        errors.push(FieldError::new(
            "inquiryType",
            "must be one of phone, email, line",
        ));
    }

    errors
}

/// Fail-fast variant of [`validate_vehicle_input`] for callers on the write
/// path; carries the full error list.
pub fn check_vehicle_input(input: &VehicleInput) -> Result<(), ApiError> {
    let errors = validate_vehicle_input(input);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub fn check_inquiry_input(input: &InquiryInput) -> Result<(), ApiError> {
    let errors = validate_inquiry_input(input);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

fn flatten(result: Result<(), ValidationErrors>) -> Vec<FieldError> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut flattened = Vec::new();
    for (field, entries) in errors.field_errors() {
        for entry in entries {
            let message = entry
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| entry.code.to_string());
            flattened.push(FieldError::new(&snake_to_camel(field), message));
        }
    }
    flattened
}

fn snake_to_camel(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
