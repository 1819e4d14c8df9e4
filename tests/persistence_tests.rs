use std::fs;
use stock_ledger::persistence::{read_csv, read_json};
use stock_ledger::{
    load, save, save_on_exit, DataFiles, Inventory, LoadSource, PersistenceError, ProductStatus,
    StorageFormat,
};
use tempfile::TempDir;

// Test fixtures - sample data for testing

const HEADER: &str = "masp,ten_sp,gia_ban,so_luong,gia_tri_ton,trang_thai";

/// Row 1 is consistent, row 2 carries a stale stock value and status
fn create_sample_csv_content() -> String {
    format!(
        "{HEADER}\n\
         SP01,Bút bi,5000,3,15000,Cần nhập\n\
         SP02,\"Vở, 200 trang\",12000,80,1,Bình thường\n"
    )
}

fn create_sample_json_content() -> String {
    r#"[
  {
    "masp": "J1",
    "ten_sp": "Thước kẻ",
    "gia_ban": 7000,
    "so_luong": 20,
    "gia_tri_ton": 140000,
    "trang_thai": "Bình thường"
  }
]"#
    .to_string()
}

fn data_files(dir: &TempDir) -> DataFiles {
    DataFiles::new(dir.path().join("data.csv"), dir.path().join("data.json"))
}

fn sample_inventory() -> Inventory {
    let mut inventory = Inventory::new();
    inventory.create("P1", "Pen", 10, 3).unwrap();
    inventory.create("P2", "Sổ tay", 20, 60).unwrap();
    inventory
}

// ==================== load Tests ====================

#[test]
fn test_load_prefers_csv() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, create_sample_csv_content()).unwrap();
    fs::write(&files.json_path, create_sample_json_content()).unwrap();

    let outcome = load(&files);

    assert_eq!(outcome.source, LoadSource::Csv(files.csv_path.clone()));
    assert_eq!(outcome.products.len(), 2);
    assert_eq!(outcome.products[1].name(), "Vở, 200 trang");
}

#[test]
fn test_load_trusts_stale_derived_fields() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, create_sample_csv_content()).unwrap();

    let outcome = load(&files);
    let stale = &outcome.products[1];

    assert_eq!(stale.unit_price(), 12000);
    assert_eq!(stale.quantity(), 80);
    assert_eq!(stale.stock_value(), 1);
    assert_eq!(stale.status(), ProductStatus::Normal);
}

#[test]
fn test_load_falls_back_to_json_on_corrupt_csv() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, format!("{HEADER}\nSP01,Pen,abc,3,15,Cần nhập\n")).unwrap();
    fs::write(&files.json_path, create_sample_json_content()).unwrap();

    let outcome = load(&files);

    assert_eq!(outcome.source, LoadSource::Json(files.json_path.clone()));
    assert_eq!(outcome.products.len(), 1);
    assert_eq!(outcome.products[0].id(), "J1");
}

#[test]
fn test_load_falls_back_on_missing_column() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, "masp,ten_sp,gia_ban,so_luong\nSP01,Pen,1,1\n").unwrap();
    fs::write(&files.json_path, create_sample_json_content()).unwrap();

    let outcome = load(&files);

    assert!(matches!(outcome.source, LoadSource::Json(_)));
}

#[test]
fn test_load_falls_back_on_unknown_status() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, format!("{HEADER}\nSP01,Pen,1,1,1,Hết hàng\n")).unwrap();

    let outcome = load(&files);

    assert_eq!(outcome.source, LoadSource::Empty);
    assert!(outcome.products.is_empty());
}

#[test]
fn test_load_json_only() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.json_path, create_sample_json_content()).unwrap();

    let outcome = load(&files);

    assert!(matches!(outcome.source, LoadSource::Json(_)));
    assert_eq!(outcome.products[0].name(), "Thước kẻ");
}

#[test]
fn test_load_nothing_present() {
    let dir = TempDir::new().unwrap();
    let outcome = load(&data_files(&dir));
    assert_eq!(outcome.source, LoadSource::Empty);
    assert!(outcome.products.is_empty());
}

#[test]
fn test_load_both_corrupt() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, "not,a\nvalid,file,at,all").unwrap();
    fs::write(&files.json_path, "{ broken").unwrap();

    let outcome = load(&files);

    assert_eq!(outcome.source, LoadSource::Empty);
}

#[test]
fn test_load_header_only_csv_is_empty_success() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, format!("{HEADER}\n")).unwrap();
    fs::write(&files.json_path, create_sample_json_content()).unwrap();

    let outcome = load(&files);

    assert!(matches!(outcome.source, LoadSource::Csv(_)));
    assert!(outcome.products.is_empty());
}

#[test]
fn test_load_csv_with_spaces_around_fields() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(
        &files.csv_path,
        format!("{HEADER}\nP1, Pen, 10, 3, 30, Cần nhập\n P2 ,Book , 20,60 ,1200, Khó bán \n"),
    )
    .unwrap();

    let outcome = load(&files);

    assert_eq!(outcome.source, LoadSource::Csv(files.csv_path.clone()));
    assert_eq!(outcome.products.len(), 2);
    let pen = &outcome.products[0];
    assert_eq!(pen.id(), "P1");
    assert_eq!(pen.name(), "Pen");
    assert_eq!(pen.unit_price(), 10);
    assert_eq!(pen.stock_value(), 30);
    assert_eq!(pen.status(), ProductStatus::NeedsRestock);
    assert_eq!(outcome.products[1].id(), "P2");
    assert_eq!(outcome.products[1].status(), ProductStatus::SlowMoving);
}

// ==================== save Tests ====================

#[test]
fn test_save_csv_layout() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);

    let path = save(sample_inventory().products(), StorageFormat::Csv, &files).unwrap();

    assert_eq!(path, files.csv_path);
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[1], "P1,Pen,10,3,30,Cần nhập");
    assert_eq!(lines[2], "P2,Sổ tay,20,60,1200,Khó bán");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_save_empty_csv_writes_header() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);

    save(&[], StorageFormat::Csv, &files).unwrap();

    let content = fs::read_to_string(&files.csv_path).unwrap();
    assert_eq!(content.trim_end(), HEADER);
}

#[test]
fn test_save_json_keeps_non_ascii_and_indents() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);

    save(sample_inventory().products(), StorageFormat::Json, &files).unwrap();

    let content = fs::read_to_string(&files.json_path).unwrap();
    assert!(content.starts_with("[\n  {\n    \"masp\": \"P1\""));
    assert!(content.contains("\"ten_sp\": \"Sổ tay\""));
    assert!(content.contains("\"trang_thai\": \"Khó bán\""));
    assert!(!content.contains("\\u"));
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    let mut inventory = sample_inventory();
    save(inventory.products(), StorageFormat::Csv, &files).unwrap();

    inventory.delete("P1").unwrap();
    save(inventory.products(), StorageFormat::Csv, &files).unwrap();

    let reloaded = read_csv(&files.csv_path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].id(), "P2");
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let files = DataFiles::new(
        dir.path().join("missing").join("data.csv"),
        dir.path().join("missing").join("data.json"),
    );

    let result = save(sample_inventory().products(), StorageFormat::Json, &files);

    match result {
        Err(err @ PersistenceError::Io { .. }) => assert_eq!(err.path(), files.json_path),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn test_failed_save_leaves_destination_untouched() {
    let dir = TempDir::new().unwrap();
    let blocked = dir.path().join("data.csv");
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep.txt"), "keep").unwrap();
    let files = DataFiles::new(&blocked, dir.path().join("data.json"));

    let result = save(sample_inventory().products(), StorageFormat::Csv, &files);

    assert!(result.is_err());
    assert!(blocked.is_dir());
    assert_eq!(fs::read_to_string(blocked.join("keep.txt")).unwrap(), "keep");
}

#[cfg(unix)]
#[test]
fn test_save_keeps_existing_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    for format in [StorageFormat::Csv, StorageFormat::Json] {
        let path = files.path_for(format).to_path_buf();
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        save(sample_inventory().products(), format, &files).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640, "{} file mode changed", format.as_str());
    }
}

// ==================== Round-trip Tests ====================

#[test]
fn test_csv_round_trip_preserves_stale_fields() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, create_sample_csv_content()).unwrap();
    let original = load(&files).products;

    let out_dir = TempDir::new().unwrap();
    let out_files = data_files(&out_dir);
    save(&original, StorageFormat::Csv, &out_files).unwrap();
    let reloaded = load(&out_files).products;

    assert_eq!(reloaded, original);
    assert_eq!(reloaded[1].stock_value(), 1);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    let inventory = sample_inventory();

    save(inventory.products(), StorageFormat::Json, &files).unwrap();
    let reloaded = read_json(&files.json_path).unwrap();

    assert_eq!(reloaded, inventory.products());
}

#[test]
fn test_csv_to_json_migration() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, create_sample_csv_content()).unwrap();
    let from_csv = load(&files).products;

    save(&from_csv, StorageFormat::Json, &files).unwrap();

    assert_eq!(read_json(&files.json_path).unwrap(), from_csv);
}

// ==================== save_on_exit Tests ====================

#[test]
fn test_exit_save_skips_empty_list() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);

    assert_eq!(save_on_exit(&[], &files).unwrap(), None);
    assert!(!files.csv_path.exists());
    assert!(!files.json_path.exists());
}

#[test]
fn test_exit_save_prefers_existing_csv() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.csv_path, format!("{HEADER}\n")).unwrap();

    let format = save_on_exit(sample_inventory().products(), &files).unwrap();

    assert_eq!(format, Some(StorageFormat::Csv));
    assert_eq!(read_csv(&files.csv_path).unwrap().len(), 2);
    assert!(!files.json_path.exists());
}

#[test]
fn test_exit_save_defaults_to_json() {
    let dir = TempDir::new().unwrap();
    let files = data_files(&dir);
    fs::write(&files.json_path, create_sample_json_content()).unwrap();

    let format = save_on_exit(sample_inventory().products(), &files).unwrap();

    assert_eq!(format, Some(StorageFormat::Json));
    assert_eq!(read_json(&files.json_path).unwrap().len(), 2);
    assert!(!files.csv_path.exists());
}
