// ==========================================
// InventoryImporter 集成测试
// ==========================================
// 测试目标: 验证从 CSV 到 SQLite 的完整导入流程
// ==========================================

mod test_helpers;

use perishable_inventory::config::{config_keys, ConfigManager};
use perishable_inventory::importer::{
    InventoryImporter, InventoryImporterImpl, SkipReason,
};
use perishable_inventory::logging;
use perishable_inventory::repository::{
    InventoryUploadRepository, ProductImportRepositoryImpl, ProductRepository,
};
use test_helpers::{create_test_db, fixture_path, read_fixture, set_config};

/// 创建测试用的 InventoryImporter 实例
fn create_test_importer(
    db_path: &str,
) -> InventoryImporterImpl<ProductImportRepositoryImpl, ConfigManager> {
    let import_repo =
        ProductImportRepositoryImpl::new(db_path).expect("Failed to create ProductImportRepository");
    let config = ConfigManager::new(db_path).expect("Failed to create ConfigManager");

    InventoryImporterImpl::with_defaults(import_repo, config)
}

#[tokio::test]
async fn test_import_vendor_tab_file() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let outcome = importer
        .import_csv_text(&read_fixture("vendor_tab.csv"), "spani.csv", 1)
        .await
        .expect("Import should succeed");

    assert_eq!(outcome.summary.total_rows, 5);
    assert_eq!(outcome.summary.inserted, 3);
    assert_eq!(outcome.upload.products_count, 3);

    let names: Vec<&str> = outcome.created.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Leite Integral", "Produto 1002", "Queijo Minas; fresco"]);
    assert_eq!(outcome.created[0].code.as_deref(), Some("1001"));
    assert_eq!(outcome.created[0].category.as_deref(), Some("Quantidade: 50"));

    let reasons: Vec<SkipReason> = outcome.diagnostics.iter().map(|d| d.reason).collect();
    assert!(reasons.contains(&SkipReason::NumericName));
    assert!(reasons.contains(&SkipReason::NonNumericCode));

    let products = ProductRepository::new(&db_path).unwrap();
    assert_eq!(products.count().unwrap(), 3);
}

#[tokio::test]
async fn test_reimport_inserts_nothing() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);
    let csv = read_fixture("vendor_tab.csv");

    importer.import_csv_text(&csv, "a.csv", 1).await.unwrap();
    let second = importer.import_csv_text(&csv, "b.csv", 1).await.unwrap();

    assert_eq!(second.summary.inserted, 0);
    assert_eq!(second.summary.existing, 3);
    assert_eq!(second.upload.products_count, 0);

    let uploads = InventoryUploadRepository::new(&db_path).unwrap().list_all().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_eq!(ProductRepository::new(&db_path).unwrap().count().unwrap(), 3);
}

#[tokio::test]
async fn test_import_generic_semicolon_header_comma_rows() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let outcome = importer
        .import_csv_text(&read_fixture("generic_semicolon_header.csv"), "loja.csv", 1)
        .await
        .unwrap();

    assert_eq!(outcome.summary.total_rows, 4);
    assert_eq!(outcome.created.len(), 3);
    assert_eq!(outcome.created[0].code.as_deref(), Some("1001"));
    assert_eq!(outcome.created[0].category.as_deref(), Some("Laticinios"));
    assert_eq!(outcome.created[1].name, "Pão Francês");
    assert_eq!(outcome.created[1].code, None);
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.reason == SkipReason::BlankName));
}

#[tokio::test]
async fn test_missing_name_column_rejects_file() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let result = importer
        .import_csv_text(&read_fixture("missing_name_column.csv"), "x.csv", 1)
        .await;

    let err = result.expect_err("Missing name column should fail");
    assert!(err.is_validation());
    assert_eq!(ProductRepository::new(&db_path).unwrap().count().unwrap(), 0);
    assert!(InventoryUploadRepository::new(&db_path)
        .unwrap()
        .list_all()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_in_file_dedup_config() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let csv = read_fixture("generic_comma.csv");

    // 默认不做文件内去重
    let outcome = create_test_importer(&db_path)
        .import_csv_text(&csv, "a.csv", 1)
        .await
        .unwrap();
    assert_eq!(outcome.summary.inserted, 3);

    let (_temp_file2, db_path2) = create_test_db().expect("Failed to create test db");
    set_config(&db_path2, config_keys::IMPORT_DEDUPE_WITHIN_FILE, "true").unwrap();
    let outcome = create_test_importer(&db_path2)
        .import_csv_text(&csv, "a.csv", 1)
        .await
        .unwrap();
    assert_eq!(outcome.summary.inserted, 2);
    assert_eq!(outcome.summary.duplicates_in_file, 1);
}

#[tokio::test]
async fn test_name_or_code_dedup_config() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    set_config(&db_path, config_keys::IMPORT_DEDUP_KEY, "NAME_OR_CODE").unwrap();
    let importer = create_test_importer(&db_path);

    importer
        .import_csv_text("nome,codigo\nLeite,1001\n", "a.csv", 1)
        .await
        .unwrap();
    let outcome = importer
        .import_csv_text("nome,codigo\nLeite Integral,1001\nPão,2002\n", "b.csv", 1)
        .await
        .unwrap();

    assert_eq!(outcome.summary.existing, 1);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].name, "Pão");
}

#[tokio::test]
async fn test_import_csv_file_uses_file_name() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let outcome = importer
        .import_csv_file(&fixture_path("generic_comma.csv"), 5)
        .await
        .unwrap();

    assert_eq!(outcome.upload.filename, "generic_comma.csv");
    assert_eq!(outcome.upload.uploaded_by, 5);
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let importer = create_test_importer(&db_path);

    let err = importer.import_csv_text("\n\n", "x.csv", 1).await.unwrap_err();
    assert!(err.is_validation());
}
