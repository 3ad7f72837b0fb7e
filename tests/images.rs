mod common;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

use rust_kuruma::entities::vehicle_image;
use rust_kuruma::error::ApiError;
use rust_kuruma::services::{images, vehicles};

use common::{png_bytes, test_config, test_db, test_storage, vehicle_input};

#[tokio::test]
async fn upload_writes_both_assets_and_metadata() {
    let config = test_config();
    let db = test_db(&config).await;
    let storage = test_storage(&config);

    let vehicle = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create vehicle failed");

    let uploaded = images::upload_image(&db, &storage, vehicle.id, "image/png", &png_bytes())
        .await
        .expect("upload failed");

    assert_eq!(uploaded.vehicle_id, vehicle.id);
    assert_eq!(uploaded.display_order, 0);
    assert!(uploaded.filename.ends_with(".jpg"), "assets are normalized to jpeg");
    assert_eq!(uploaded.url, format!("/api/images/{}", uploaded.filename));
    assert_eq!(
        uploaded.thumbnail_url,
        format!("/api/images/thumb-{}", uploaded.filename)
    );

    let full = storage.path(&uploaded.filename).expect("bad filename");
    let thumb = storage
        .path(&format!("thumb-{}", uploaded.filename))
        .expect("bad thumbnail name");
    assert!(full.exists(), "full-size asset must be written");
    assert!(thumb.exists(), "thumbnail asset must be written");

    let thumbnail = image::open(&thumb).expect("thumbnail must decode").to_rgb8();
    assert_eq!(thumbnail.width(), 300);
    assert_eq!(thumbnail.height(), 200);
}

#[tokio::test]
async fn display_order_appends_at_the_end() {
    let config = test_config();
    let db = test_db(&config).await;
    let storage = test_storage(&config);

    let vehicle = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create vehicle failed");

    let first = images::upload_image(&db, &storage, vehicle.id, "image/png", &png_bytes())
        .await
        .expect("upload failed");
    let second = images::upload_image(&db, &storage, vehicle.id, "image/png", &png_bytes())
        .await
        .expect("upload failed");

    assert_eq!(first.display_order, 0);
    assert_eq!(second.display_order, 1);

    let listed = images::list_vehicle_images(&db, vehicle.id)
        .await
        .expect("listing failed");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
}

#[tokio::test]
async fn upload_rejects_unknown_vehicle_bad_type_and_oversize() {
    let config = test_config();
    let db = test_db(&config).await;
    let storage = test_storage(&config);

    let missing = images::upload_image(&db, &storage, 404, "image/png", &png_bytes())
        .await
        .expect_err("unknown vehicle must fail");
    assert!(matches!(missing, ApiError::NotFound(_)));

    let vehicle = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create vehicle failed");

    let bad_type = images::upload_image(&db, &storage, vehicle.id, "image/gif", &png_bytes())
        .await
        .expect_err("gif must be rejected");
    assert!(matches!(bad_type, ApiError::Invalid(_)));

    let oversize = vec![0u8; images::MAX_FILE_SIZE + 1];
    let too_big = images::upload_image(&db, &storage, vehicle.id, "image/jpeg", &oversize)
        .await
        .expect_err("oversize must be rejected");
    assert!(matches!(too_big, ApiError::PayloadTooLarge(_)));

    let garbage = images::upload_image(&db, &storage, vehicle.id, "image/jpeg", b"not an image")
        .await
        .expect_err("undecodable bytes must be rejected");
    assert!(matches!(garbage, ApiError::Invalid(_)));
}

#[tokio::test]
async fn the_twenty_first_upload_hits_the_quota() {
    let config = test_config();
    let db = test_db(&config).await;
    let storage = test_storage(&config);

    let vehicle = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create vehicle failed");

    // Metadata rows alone are enough to trip the quota check.
    for order in 0..images::MAX_IMAGES_PER_VEHICLE {
        vehicle_image::ActiveModel {
            vehicle_id: Set(vehicle.id),
            filename: Set(format!("seed-{}.jpg", order)),
            url: Set(format!("/api/images/seed-{}.jpg", order)),
            thumbnail_url: Set(format!("/api/images/thumb-seed-{}.jpg", order)),
            display_order: Set(order as i32),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("seeding image row failed");
    }

    let err = images::upload_image(&db, &storage, vehicle.id, "image/png", &png_bytes())
        .await
        .expect_err("21st image must be rejected");
    assert!(matches!(err, ApiError::Invalid(_)));

    let listed = images::list_vehicle_images(&db, vehicle.id)
        .await
        .expect("listing failed");
    assert_eq!(listed.len(), 20, "exactly twenty rows must remain");
}

#[tokio::test]
async fn delete_removes_assets_and_tolerates_missing_files() {
    let config = test_config();
    let db = test_db(&config).await;
    let storage = test_storage(&config);

    let vehicle = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create vehicle failed");
    let image = images::upload_image(&db, &storage, vehicle.id, "image/png", &png_bytes())
        .await
        .expect("upload failed");

    let full = storage.path(&image.filename).expect("bad filename");
    images::delete_image(&db, &storage, image.id).await.expect("delete failed");
    assert!(!full.exists(), "asset must be removed from storage");
    assert!(images::list_vehicle_images(&db, vehicle.id)
        .await
        .expect("listing failed")
        .is_empty());

    let gone = images::delete_image(&db, &storage, image.id)
        .await
        .expect_err("second delete must be a not-found");
    assert!(matches!(gone, ApiError::NotFound(_)));

    // A row whose files never existed still deletes cleanly.
    let orphan = vehicle_image::ActiveModel {
        vehicle_id: Set(vehicle.id),
        filename: Set("never-written.jpg".to_string()),
        url: Set("/api/images/never-written.jpg".to_string()),
        thumbnail_url: Set("/api/images/thumb-never-written.jpg".to_string()),
        display_order: Set(0),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("seeding image row failed");

    images::delete_image(&db, &storage, orphan.id)
        .await
        .expect("delete of a fileless row must succeed");
}
