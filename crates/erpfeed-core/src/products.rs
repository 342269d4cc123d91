use serde::{Deserialize, Serialize};

use crate::brands::BrandEntry;

/// Brand-code lookup the downstream sheet evaluates when no code was resolved.
///
/// Reads the display name in column M (up to the first `|`) and looks it up
/// in the `品牌對照資料查詢` sheet.
pub const BRAND_LOOKUP_FORMULA: &str = r#"=IFERROR(INDEX('品牌對照資料查詢'!A:A, MATCH(IFERROR(TRIM(LEFT(INDIRECT("M"&ROW())),FIND("|",INDIRECT("M"&ROW()))-1)),TRIM(INDIRECT("M"&ROW()))), '品牌對照資料查詢'!C:C, 0)), "")"#;

/// Vendor-code lookup keyed on the shipper name in column D.
pub const VENDOR_LOOKUP_FORMULA: &str =
    r#"=IFERROR(INDEX('廠商基本資料'!A:A, MATCH(INDIRECT("D"&ROW()), '廠商基本資料'!D:D, 0)), "")"#;

/// Output header, in the exact order the downstream sheet expects.
pub const COLUMNS: [&str; 31] = [
    "ERP",
    "GD",
    "平台前導",
    "寄件廠商",
    "暫代條碼",
    "型號",
    "貨號",
    "預計發售月份",
    "上架日期",
    "內部結單日期",
    "結單日期",
    "條碼",
    "品名",
    "品牌",
    "國際條碼",
    "起始進價",
    "建議售價",
    "廠商",
    "類1",
    "類2",
    "類3",
    "類4",
    "顏色",
    "季別",
    "尺1",
    "尺寸名稱",
    "特價",
    "批價",
    "建檔",
    "備註",
    "規格",
];

/// One product record as returned by the extraction step.
///
/// Unknown keys are ignored. Cost and suggested price are non-empty by the
/// time a product reaches the engine; the extraction filter drops the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(rename = "國際條碼", default, deserialize_with = "crate::lenient::opt_string")]
    pub barcode: Option<String>,
    #[serde(rename = "貨號", default, deserialize_with = "crate::lenient::opt_string")]
    pub sku: Option<String>,
    #[serde(rename = "品名", default, deserialize_with = "crate::lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "預計發售月份", default, deserialize_with = "crate::lenient::opt_string")]
    pub release_month: Option<String>,
    #[serde(rename = "備註", default, deserialize_with = "crate::lenient::opt_string")]
    pub note: Option<String>,
    #[serde(rename = "起始進價", default, deserialize_with = "crate::lenient::opt_string")]
    pub cost_price: Option<String>,
    #[serde(rename = "建議售價", default, deserialize_with = "crate::lenient::opt_string")]
    pub suggested_price: Option<String>,
    /// Brand keyword the extraction step picked out of the row.
    #[serde(rename = "偵測到的品牌", default, deserialize_with = "crate::lenient::opt_string")]
    pub detected_brand: Option<String>,
    #[serde(rename = "偵測到的類別", default, deserialize_with = "crate::lenient::opt_string")]
    pub detected_category: Option<String>,
}

/// Non-blank trimmed value of an optional field.
pub(crate) fn present(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl RawProduct {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn sku(&self) -> &str {
        self.sku.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn barcode(&self) -> &str {
        self.barcode.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn detected_brand(&self) -> Option<&str> {
        present(self.detected_brand.as_ref())
    }

    #[must_use]
    pub fn detected_category(&self) -> Option<&str> {
        present(self.detected_category.as_ref())
    }
}

/// File-level information shared by every product extracted from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInfo {
    #[serde(rename = "寄件廠商", default, deserialize_with = "crate::lenient::opt_string")]
    pub shipper: Option<String>,
    /// The vendor's literal cutoff date; normalized for display, never shifted.
    #[serde(rename = "結單日期", default, deserialize_with = "crate::lenient::opt_string")]
    pub source_cutoff: Option<String>,
    /// Cutoff used for internal scheduling; shifted back one business day on output.
    #[serde(rename = "內部結單日期", default, deserialize_with = "crate::lenient::opt_string")]
    pub internal_cutoff: Option<String>,
    /// Set when exactly one brand keyword occurs anywhere in the source file.
    #[serde(skip)]
    pub brand_override: Option<BrandEntry>,
}

impl GlobalInfo {
    #[must_use]
    pub fn shipper(&self) -> &str {
        self.shipper.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn source_cutoff(&self) -> Option<&str> {
        present(self.source_cutoff.as_ref())
    }

    /// Internal cutoff, falling back to the source cutoff when the file only
    /// stated one date.
    #[must_use]
    pub fn internal_cutoff(&self) -> Option<&str> {
        present(self.internal_cutoff.as_ref()).or_else(|| self.source_cutoff())
    }
}

/// A raw product paired with the global info of the file it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub global_info: GlobalInfo,
    pub product_data: RawProduct,
}

/// One row of the downstream order sheet. Every field is a string, including
/// the lookup formulas written in place of unresolved codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    #[serde(rename = "ERP")]
    pub erp: String,
    #[serde(rename = "GD")]
    pub gd: String,
    #[serde(rename = "平台前導")]
    pub platform_prefix: String,
    #[serde(rename = "寄件廠商")]
    pub shipper: String,
    #[serde(rename = "暫代條碼")]
    pub temp_barcode: String,
    #[serde(rename = "型號")]
    pub model: String,
    #[serde(rename = "貨號")]
    pub sku: String,
    /// `YYYYMM`
    #[serde(rename = "預計發售月份")]
    pub release_month: String,
    #[serde(rename = "上架日期")]
    pub shelf_date: String,
    #[serde(rename = "內部結單日期")]
    pub internal_cutoff_date: String,
    #[serde(rename = "結單日期")]
    pub source_cutoff_date: String,
    #[serde(rename = "條碼")]
    pub barcode: String,
    #[serde(rename = "品名")]
    pub display_name: String,
    #[serde(rename = "品牌")]
    pub brand_code: String,
    #[serde(rename = "國際條碼")]
    pub intl_barcode: String,
    #[serde(rename = "起始進價")]
    pub cost_price: String,
    #[serde(rename = "建議售價")]
    pub suggested_price: String,
    #[serde(rename = "廠商")]
    pub vendor_code: String,
    #[serde(rename = "類1")]
    pub category1: String,
    #[serde(rename = "類2")]
    pub category2: String,
    #[serde(rename = "類3")]
    pub category3: String,
    #[serde(rename = "類4")]
    pub category4: String,
    #[serde(rename = "顏色")]
    pub color: String,
    #[serde(rename = "季別")]
    pub season: String,
    #[serde(rename = "尺1")]
    pub size1: String,
    #[serde(rename = "尺寸名稱")]
    pub size_name: String,
    #[serde(rename = "特價")]
    pub special_price: String,
    #[serde(rename = "批價")]
    pub batch_price: String,
    #[serde(rename = "建檔")]
    pub filed: String,
    #[serde(rename = "備註")]
    pub note: String,
    #[serde(rename = "規格")]
    pub spec: String,
}

impl CanonicalRow {
    /// Field values in [`COLUMNS`] order.
    #[must_use]
    pub fn values(&self) -> [&str; 31] {
        [
            self.erp.as_str(),
            self.gd.as_str(),
            self.platform_prefix.as_str(),
            self.shipper.as_str(),
            self.temp_barcode.as_str(),
            self.model.as_str(),
            self.sku.as_str(),
            self.release_month.as_str(),
            self.shelf_date.as_str(),
            self.internal_cutoff_date.as_str(),
            self.source_cutoff_date.as_str(),
            self.barcode.as_str(),
            self.display_name.as_str(),
            self.brand_code.as_str(),
            self.intl_barcode.as_str(),
            self.cost_price.as_str(),
            self.suggested_price.as_str(),
            self.vendor_code.as_str(),
            self.category1.as_str(),
            self.category2.as_str(),
            self.category3.as_str(),
            self.category4.as_str(),
            self.color.as_str(),
            self.season.as_str(),
            self.size1.as_str(),
            self.size_name.as_str(),
            self.special_price.as_str(),
            self.batch_price.as_str(),
            self.filed.as_str(),
            self.note.as_str(),
            self.spec.as_str(),
        ]
    }
}
