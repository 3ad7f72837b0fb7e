use chrono::Utc;
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;
use std::io::Cursor;
use uuid::Uuid;

use crate::entities::vehicle::Entity as Vehicle;
use crate::entities::vehicle_image::{self, Entity as VehicleImage};
use crate::error::ApiError;
use crate::storage::LocalStorage;

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const MAX_IMAGES_PER_VEHICLE: u64 = 20;

const THUMB_WIDTH: u32 = 300;
const THUMB_HEIGHT: u32 = 200;
const JPEG_QUALITY: u8 = 85;

fn allowed_content_types() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("image/jpeg", "jpg"),
        ("image/jpg", "jpg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
    ])
}

/// Removes registered blobs on drop unless the metadata write landed and the
/// guard was disarmed. Cleanup failures are logged, never surfaced: only the
/// original failure propagates to the caller.
struct CleanupGuard<'a> {
    storage: &'a LocalStorage,
    files: Vec<String>,
    armed: bool,
}

impl<'a> CleanupGuard<'a> {
    fn new(storage: &'a LocalStorage) -> CleanupGuard<'a> {
        CleanupGuard {
            storage,
            files: Vec::new(),
            armed: true,
        }
    }

    fn track(&mut self, filename: &str) {
        self.files.push(filename.to_owned());
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        for filename in &self.files {
            if let Err(err) = self.storage.remove(filename) {
                tracing::warn!(filename = %filename, error = %err, "failed to clean up orphaned asset");
            }
        }
    }
}

pub async fn upload_image(
    db: &DatabaseConnection,
    storage: &LocalStorage,
    vehicle_id: i32,
    content_type: &str,
    bytes: &[u8],
) -> Result<vehicle_image::Model, ApiError> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::PayloadTooLarge(format!(
            "file exceeds the {}MB upload limit",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }
    if !allowed_content_types().contains_key(content_type) {
        return Err(ApiError::Invalid(format!(
            "unsupported content type: {}",
            content_type
        )));
    }

    Vehicle::find_by_id(vehicle_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("vehicle", vehicle_id))?;

    let existing = VehicleImage::find()
        .filter(vehicle_image::Column::VehicleId.eq(vehicle_id))
        .count(db)
        .await?;
    if existing >= MAX_IMAGES_PER_VEHICLE {
        return Err(ApiError::Invalid(format!(
            "vehicle {} already has the maximum of {} images",
            vehicle_id, MAX_IMAGES_PER_VEHICLE
        )));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|err| ApiError::Invalid(format!("invalid image: {err}")))?;

    let full = encode_jpeg(&decoded)?;
    let thumbnail = encode_jpeg(&decoded.resize_to_fill(THUMB_WIDTH, THUMB_HEIGHT, FilterType::Triangle))?;

    // Timestamp plus a random suffix keeps concurrent uploads collision-free
    // without any shared counter.
    let filename = format!("{}-{}.jpg", Utc::now().timestamp_millis(), Uuid::new_v4());
    let thumb_filename = format!("thumb-{}", filename);

    let mut guard = CleanupGuard::new(storage);
    storage
        .write(&filename, &full)
        .map_err(|err| ApiError::Internal(format!("failed to store image: {err}")))?;
    guard.track(&filename);
    storage
        .write(&thumb_filename, &thumbnail)
        .map_err(|err| ApiError::Internal(format!("failed to store thumbnail: {err}")))?;
    guard.track(&thumb_filename);

    let next_order = VehicleImage::find()
        .filter(vehicle_image::Column::VehicleId.eq(vehicle_id))
        .order_by_desc(vehicle_image::Column::DisplayOrder)
        .one(db)
        .await?
        .map(|image| image.display_order + 1)
        .unwrap_or(0);

    let created = vehicle_image::ActiveModel {
        vehicle_id: Set(vehicle_id),
        filename: Set(filename.clone()),
        url: Set(format!("/api/images/{}", filename)),
        thumbnail_url: Set(format!("/api/images/{}", thumb_filename)),
        display_order: Set(next_order),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    guard.disarm();
    Ok(created)
}

/// Storage first, metadata second: the reverse of upload, so a crash between
/// the two steps leaves a removable row rather than an orphaned blob.
pub async fn delete_image(
    db: &DatabaseConnection,
    storage: &LocalStorage,
    id: i32,
) -> Result<(), ApiError> {
    let existing = VehicleImage::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("image", id))?;

    storage
        .remove(&existing.filename)
        .and_then(|_| storage.remove(&format!("thumb-{}", existing.filename)))
        .map_err(|err| ApiError::Internal(format!("failed to remove stored assets: {err}")))?;

    VehicleImage::delete_by_id(id).exec(db).await?;
    Ok(())
}

pub async fn list_vehicle_images(
    db: &DatabaseConnection,
    vehicle_id: i32,
) -> Result<Vec<vehicle_image::Model>, ApiError> {
    let images = VehicleImage::find()
        .filter(vehicle_image::Column::VehicleId.eq(vehicle_id))
        .order_by_asc(vehicle_image::Column::DisplayOrder)
        .order_by_asc(vehicle_image::Column::Id)
        .all(db)
        .await?;
    Ok(images)
}

/// Best-effort blob cleanup for a vehicle about to be deleted. Metadata rows
/// are owned by the vehicle delete itself; this only touches storage.
pub async fn delete_vehicle_assets(
    db: &DatabaseConnection,
    storage: &LocalStorage,
    vehicle_id: i32,
) -> Result<(), ApiError> {
    for image in list_vehicle_images(db, vehicle_id).await? {
        if let Err(err) = storage
            .remove(&image.filename)
            .and_then(|_| storage.remove(&format!("thumb-{}", image.filename)))
        {
            tracing::warn!(
                vehicle_id,
                filename = %image.filename,
                error = %err,
                "failed to remove asset during vehicle delete"
            );
        }
    }
    Ok(())
}

fn encode_jpeg(image: &image::DynamicImage) -> Result<Vec<u8>, ApiError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|err| ApiError::Internal(format!("failed to encode image: {err}")))?;
    Ok(buffer)
}
