// ==========================================
// ProductApi 集成测试
// ==========================================
// 测试目标: 商品搜索、批次登记、标记过期
// ==========================================

mod test_helpers;

use chrono::{Duration, Local};
use perishable_inventory::api::{ApiError, CreateEntryRequest, UploadRequest};
use perishable_inventory::app::AppState;
use test_helpers::{create_test_db, moderator};

async fn seeded_state(csv: &str) -> (tempfile::NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    state
        .import_api
        .upload_inventory(
            Some(&moderator()),
            UploadRequest {
                csv: Some(csv.to_string()),
                filename: None,
            },
        )
        .await
        .expect("seed upload");
    (temp_file, state)
}

fn entry_request(product_id: i64, date: &str, quantity: Option<i32>) -> CreateEntryRequest {
    CreateEntryRequest {
        product_id,
        expiration_date: date.to_string(),
        quantity,
        notes: None,
    }
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_capped() {
    let (_tmp, state) = seeded_state("nome\nLeite Integral\nLEITE Desnatado\nQueijo\nÁgua\n").await;

    let found = state.product_api.search_products("leite").unwrap();
    assert_eq!(found.len(), 2);

    let found = state.product_api.search_products("água").unwrap();
    assert_eq!(found.len(), 1);

    assert!(state.product_api.search_products("   ").unwrap().is_empty());

    state
        .config_manager
        .set_global_config_value("search_max_results", "1")
        .unwrap();
    assert_eq!(state.product_api.search_products("leite").unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_entry_defaults_and_snapshot() {
    let (_tmp, state) = seeded_state("nome\nIogurte\n").await;
    let product = &state.product_api.list_products().unwrap()[0];
    let today = Local::now().date_naive();

    let future = (today + Duration::days(10)).format("%Y-%m-%d").to_string();
    let entry = state
        .product_api
        .create_entry(entry_request(product.id, &future, None))
        .unwrap();
    assert_eq!(entry.quantity, 1);
    assert!(!entry.is_expired);

    let past = (today - Duration::days(1)).format("%d/%m/%Y").to_string();
    let entry = state
        .product_api
        .create_entry(entry_request(product.id, &past, Some(4)))
        .unwrap();
    assert_eq!(entry.quantity, 4);
    assert!(entry.is_expired);
}

#[tokio::test]
async fn test_create_entry_validation() {
    let (_tmp, state) = seeded_state("nome\nIogurte\n").await;
    let product_id = state.product_api.list_products().unwrap()[0].id;

    let err = state
        .product_api
        .create_entry(entry_request(product_id, "2030-01-01", Some(0)))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .product_api
        .create_entry(entry_request(product_id, "amanhã", None))
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = state
        .product_api
        .create_entry(entry_request(product_id + 100, "2030-01-01", None))
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_mark_entry_expired() {
    let (_tmp, state) = seeded_state("nome\nIogurte\n").await;
    let product_id = state.product_api.list_products().unwrap()[0].id;
    let entry = state
        .product_api
        .create_entry(entry_request(product_id, "2099-12-31", None))
        .unwrap();
    assert!(!entry.is_expired);

    let marked = state.product_api.mark_entry_expired(entry.id).unwrap();
    assert!(marked.is_expired);
    assert_eq!(marked.expiration_date, entry.expiration_date);

    let err = state.product_api.mark_entry_expired(entry.id + 1).unwrap_err();
    assert_eq!(err.status_code(), 404);
}
