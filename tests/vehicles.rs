mod common;

use rust_kuruma::error::ApiError;
use rust_kuruma::services::vehicles::{self, VehicleFilters};
use rust_kuruma::services::{categories, images};

use common::{test_config, test_db, vehicle_input};

#[tokio::test]
async fn create_then_get_round_trips_every_field() {
    let config = test_config();
    let db = test_db(&config).await;

    let input = common::vehicle_input("crane");
    let created = vehicles::create_vehicle(&db, input.clone())
        .await
        .expect("create failed");

    let fetched = vehicles::get_vehicle(&db, created.id).await.expect("get failed");

    assert_eq!(fetched.category, "crane");
    assert_eq!(fetched.make, input.make);
    assert_eq!(fetched.model, input.model);
    assert_eq!(fetched.year, input.year);
    assert_eq!(fetched.mileage, input.mileage);
    assert_eq!(fetched.price, input.price);
    assert_eq!(fetched.engine_type, input.engine_type);
    assert_eq!(fetched.condition, input.condition);
    assert_eq!(fetched.features, input.features, "feature order must survive");
    assert_eq!(fetched.description_ja, input.description_ja);
    assert_eq!(fetched.description_en, input.description_en);
    assert_eq!(fetched.status, "available");
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn create_with_unknown_category_slug_is_rejected() {
    let config = test_config();
    let db = test_db(&config).await;

    let err = vehicles::create_vehicle(&db, vehicle_input("hovercraft"))
        .await
        .expect_err("unknown slug must fail");
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn create_with_invalid_input_reports_fields() {
    let config = test_config();
    let db = test_db(&config).await;

    let mut input = vehicle_input("crane");
    input.year = 1900;
    input.price = 0;

    match vehicles::create_vehicle(&db, input).await {
        Err(ApiError::Validation(errors)) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert!(fields.contains(&"year"));
            assert!(fields.contains(&"price"));
        }
        other => panic!("expected validation error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn price_filter_is_inclusive_and_total_count_ignores_pagination() {
    let config = test_config();
    let db = test_db(&config).await;

    for price in [500_000, 1_000_000, 1_500_000, 2_000_000, 2_500_000] {
        let mut input = vehicle_input("dump");
        input.price = price;
        vehicles::create_vehicle(&db, input).await.expect("create failed");
    }

    let filters = VehicleFilters {
        min_price: Some(1_000_000),
        max_price: Some(2_000_000),
        page_size: Some(2),
        ..Default::default()
    };
    let page = vehicles::list_vehicles(&db, &filters).await.expect("list failed");

    assert_eq!(page.total_count, 3, "bounds are inclusive");
    assert_eq!(page.items.len(), 2, "page slice respects pageSize");
    assert!(page
        .items
        .iter()
        .all(|vehicle| (1_000_000..=2_000_000).contains(&vehicle.price)));
}

#[tokio::test]
async fn category_and_year_filters_combine() {
    let config = test_config();
    let db = test_db(&config).await;

    let mut crane = vehicle_input("crane");
    crane.year = 2015;
    vehicles::create_vehicle(&db, crane).await.expect("create failed");

    let mut dump = vehicle_input("dump");
    dump.year = 2021;
    vehicles::create_vehicle(&db, dump).await.expect("create failed");

    let filters = VehicleFilters {
        category: Some("crane".to_string()),
        min_year: Some(2010),
        max_year: Some(2018),
        ..Default::default()
    };
    let page = vehicles::list_vehicles(&db, &filters).await.expect("list failed");

    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].category, "crane");
    assert_eq!(page.items[0].year, 2015);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let config = test_config();
    let db = test_db(&config).await;

    let first = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create failed");
    let second = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create failed");

    let page = vehicles::list_vehicles(&db, &VehicleFilters::default())
        .await
        .expect("list failed");
    assert_eq!(page.items[0].id, second.id);
    assert_eq!(page.items[1].id, first.id);
}

#[tokio::test]
async fn update_replaces_fields_and_refreshes_updated_at() {
    let config = test_config();
    let db = test_db(&config).await;

    let created = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create failed");

    let mut input = vehicle_input("dump");
    input.make = "Hino".to_string();
    input.status = Some("sold".to_string());
    let updated = vehicles::update_vehicle(&db, created.id, input)
        .await
        .expect("update failed");

    assert_eq!(updated.make, "Hino");
    assert_eq!(updated.category, "dump");
    assert_eq!(updated.status, "sold");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let missing = vehicles::update_vehicle(&db, 9999, vehicle_input("crane"))
        .await
        .expect_err("updating a missing vehicle must fail");
    assert!(matches!(missing, ApiError::NotFound(_)));
}

#[tokio::test]
async fn delete_cascades_image_metadata() {
    let config = test_config();
    let db = test_db(&config).await;
    let storage = common::test_storage(&config);

    let created = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create failed");
    images::upload_image(&db, &storage, created.id, "image/png", &common::png_bytes())
        .await
        .expect("upload failed");

    vehicles::delete_vehicle(&db, created.id).await.expect("delete failed");

    let err = vehicles::get_vehicle(&db, created.id)
        .await
        .expect_err("vehicle must be gone");
    assert!(matches!(err, ApiError::NotFound(_)));

    let leftovers = images::list_vehicle_images(&db, created.id)
        .await
        .expect("image listing failed");
    assert!(leftovers.is_empty(), "image rows must cascade");
}

#[tokio::test]
async fn search_blank_is_empty_and_matches_are_case_insensitive() {
    let config = test_config();
    let db = test_db(&config).await;

    let mut crane = vehicle_input("crane");
    crane.make = "Kato".to_string();
    crane.description_en = Some("city crane, one owner".to_string());
    vehicles::create_vehicle(&db, crane).await.expect("create failed");

    let mut dump = vehicle_input("dump");
    dump.make = "Isuzu".to_string();
    dump.model = "Forward".to_string();
    dump.description_ja = None;
    dump.description_en = None;
    vehicles::create_vehicle(&db, dump).await.expect("create failed");

    assert!(vehicles::search_vehicles(&db, "").await.expect("search failed").is_empty());
    assert!(vehicles::search_vehicles(&db, "   ").await.expect("search failed").is_empty());

    // Hits the category name for the crane and nothing on the dump truck.
    let by_category = vehicles::search_vehicles(&db, "CRANE").await.expect("search failed");
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].category, "crane");

    let by_make = vehicles::search_vehicles(&db, "isuzu").await.expect("search failed");
    assert_eq!(by_make.len(), 1);
    assert_eq!(by_make[0].make, "Isuzu");

    assert!(vehicles::search_vehicles(&db, "bulldozer")
        .await
        .expect("search failed")
        .is_empty());
}

#[tokio::test]
async fn related_excludes_self_and_other_categories() {
    let config = test_config();
    let db = test_db(&config).await;

    let a = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create failed");
    let b = vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create failed");
    vehicles::create_vehicle(&db, vehicle_input("dump"))
        .await
        .expect("create failed");

    let related = vehicles::related_vehicles(&db, a.id, None)
        .await
        .expect("related failed");
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, b.id);
}

#[tokio::test]
async fn category_delete_is_refused_while_referenced() {
    let config = test_config();
    let db = test_db(&config).await;

    let crane = categories::get_category_by_slug(&db, "crane")
        .await
        .expect("lookup failed")
        .expect("seeded category missing");
    vehicles::create_vehicle(&db, vehicle_input("crane"))
        .await
        .expect("create failed");

    let err = categories::delete_category(&db, crane.id)
        .await
        .expect_err("referenced category must not be deletable");
    assert!(matches!(err, ApiError::Invalid(_)));
}
