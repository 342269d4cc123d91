use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use erpfeed_core::{
    ProductEntry, ReferencePaths, ReferenceTables, BRAND_LOOKUP_FORMULA, COLUMNS,
    VENDOR_LOOKUP_FORMULA,
};
use erpfeed_normalize::{ingest_file, BatchBuilder, RowAssembler, SourceFile};

fn config_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
}

fn bundled_tables() -> ReferenceTables {
    let dir = config_dir();
    ReferenceTables::load(&ReferencePaths {
        brands: dir.join("brands.yaml"),
        categories: dir.join("categories.yaml"),
        shippers: dir.join("shippers.yaml"),
    })
    .expect("bundled reference tables should load")
}

fn shelf_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
}

#[test]
fn reference_scenario_with_empty_tables() {
    let entry: ProductEntry = serde_json::from_str(
        r#"{
            "global_info": {"寄件廠商": "示例廠商", "結單日期": "2025/12/15"},
            "product_data": {
                "品名": "POP RACE 1/64 保時捷",
                "起始進價": "100",
                "建議售價": "200",
                "預計發售月份": "2025-11"
            }
        }"#,
    )
    .unwrap();

    let tables = ReferenceTables::default();
    let batch = BatchBuilder::new(RowAssembler::new(&tables, shelf_date())).build(&[entry]);
    let row = &batch.rows[0];

    assert_eq!(row.release_month, "202511");
    assert_eq!(row.shipper, "示例廠商");
    assert_eq!(row.source_cutoff_date, "2025/12/15");
    assert_eq!(row.brand_code, BRAND_LOOKUP_FORMULA);
    assert_eq!(row.display_name, "POP RACE 1/64 保時捷");
    assert!(batch.diagnostics.is_empty());
}

#[test]
fn two_files_flow_through_bundled_tables_in_order() {
    let tables = bundled_tables();
    let today = shelf_date();

    let first = SourceFile {
        name: "1215 POP RACE.xlsx".to_string(),
        text: Some("POP RACE 訂單\n品名,東海成本,東海售價".to_string()),
        payload: r#"{
            "global_info": {"寄件廠商": "示例廠商", "結單日期": "2025/12/31"},
            "products": [
                {"品名": "1/64 保時捷 911", "貨號": "PR64-911", "起始進價": "100", "建議售價": "200", "預計發售月份": "2026-01"},
                {"品名": "1/64 GT-R", "起始進價": "110", "建議售價": "220", "預計發售月份": "2026年2月"}
            ]
        }"#
        .to_string(),
    };
    let second = SourceFile {
        name: "figures.xlsx".to_string(),
        text: Some("Good Smile Company / Kotobukiya".to_string()),
        payload: r#"{
            "global_info": {"寄件廠商": "山田商事", "結單日期": "2025年12月13日"},
            "products": [
                {"品名": "黏土人 初音未來", "起始進價": 800, "建議售價": 1500, "偵測到的品牌": "good smile company"}
            ]
        }"#
        .to_string(),
    };

    let mut entries = Vec::new();
    for source in [&first, &second] {
        entries.extend(ingest_file(source, &tables.brands, today).unwrap());
    }
    let batch = BatchBuilder::new(RowAssembler::new(&tables, today)).build_parallel(&entries, 2);
    assert_eq!(batch.rows.len(), 3);

    // File 1: cutoff from the file name, brand from the file text.
    let r0 = &batch.rows[0];
    assert_eq!(r0.source_cutoff_date, "2025/12/15");
    assert_eq!(r0.internal_cutoff_date, "2025/12/12");
    assert_eq!(r0.brand_code, "POPR");
    assert_eq!(r0.display_name, "POP RACE  保時捷 911 合金車");
    assert_eq!(r0.category1, "A01");
    assert_eq!(r0.release_month, "202601");
    assert_eq!(r0.sku, "PR64-911");

    let r1 = &batch.rows[1];
    assert_eq!(r1.release_month, "2026年2月");
    assert_eq!(r1.display_name, "POP RACE  GT-R 合金車");

    // File 2: two brand keywords in the text, so only the detected token counts.
    let r2 = &batch.rows[2];
    assert_eq!(r2.shipper, "山田商事");
    assert_eq!(r2.source_cutoff_date, "2025/12/13");
    assert_eq!(r2.internal_cutoff_date, "2025/12/11");
    assert_eq!(r2.brand_code, "GSC");
    assert_eq!(r2.display_name, "GSC 黏土人 初音未來");
    assert_eq!(r2.category1, "B01");
    assert_eq!(r2.cost_price, "800");
    assert_eq!(r2.vendor_code, VENDOR_LOOKUP_FORMULA);

    // Only the second product's month was off-format.
    assert_eq!(batch.rows_with_diagnostics(), 1);
    assert_eq!(batch.diagnostics[0].0, 1);
}

#[test]
fn rows_serialize_with_every_column() {
    let tables = ReferenceTables::default();
    let entry = ProductEntry::default();
    let batch = BatchBuilder::new(RowAssembler::new(&tables, shelf_date())).build(&[entry]);
    let value = serde_json::to_value(&batch.rows[0]).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), COLUMNS.len());
    for column in COLUMNS {
        assert!(object.get(column).is_some_and(serde_json::Value::is_string), "{column}");
    }
}
