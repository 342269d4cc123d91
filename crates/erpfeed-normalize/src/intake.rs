//! Turns one source file's extraction output into product entries.
//!
//! The extraction call itself happens elsewhere; this module only parses its
//! JSON answer and layers on what can be read from the file directly: a
//! cutoff date encoded in the file name and a file-wide brand.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use erpfeed_core::{BrandEntry, BrandTable, GlobalInfo, ProductEntry, RawProduct};
use regex::Regex;
use serde::Deserialize;

use crate::dates::DATE_FORMAT;
use crate::error::NormalizeError;

static FILENAME_MMDD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{3,4})").expect("valid filename date regex"));

/// How many years past the current one a file-name date may land in.
const FILENAME_YEAR_LOOKAHEAD: i32 = 5;

/// JSON object returned by the extraction step for one source file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub global_info: GlobalInfo,
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

/// One ingested source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name as the vendor sent it; may start with an `MMDD` cutoff.
    pub name: String,
    /// Full text of the source sheet, scanned for brand keywords. Without it
    /// no file-level brand is set; the extraction payload is never scanned
    /// because it echoes per-row brand tokens.
    pub text: Option<String>,
    /// Raw JSON answer from the extraction step.
    pub payload: String,
}

/// Parse the extraction step's JSON answer.
///
/// # Errors
///
/// Returns [`NormalizeError::ExtractionPayload`] if the payload is not the
/// expected JSON object.
pub fn parse_extraction(source_name: &str, payload: &str) -> Result<ExtractionResult, NormalizeError> {
    serde_json::from_str(payload).map_err(|e| NormalizeError::ExtractionPayload {
        source_name: source_name.to_string(),
        source: e,
    })
}

/// Cutoff date encoded as a leading `MMDD` (or `MDD`) in a file name.
///
/// Resolves to the first such calendar date strictly after `today`, trying
/// this year and the following five. Returns `None` when the name has no
/// leading digits or they never form a valid date.
#[must_use]
pub fn cutoff_from_filename(file_name: &str, today: NaiveDate) -> Option<NaiveDate> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    let digits = FILENAME_MMDD.captures(base)?.get(1)?.as_str();

    let (month, day) = digits.split_at(digits.len() - 2);
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;

    (0..=FILENAME_YEAR_LOOKAHEAD)
        .filter_map(|offset| NaiveDate::from_ymd_opt(today.year() + offset, month, day))
        .find(|candidate| *candidate > today)
}

/// The file-wide brand: set only when exactly one brand keyword occurs
/// anywhere in `text` (case-insensitive).
#[must_use]
pub fn detect_file_brand(text: &str, table: &BrandTable) -> Option<BrandEntry> {
    let haystack = text.to_lowercase();
    let mut hits = table.keywords().filter(|kw| haystack.contains(*kw));

    let keyword = hits.next()?;
    if let Some(other) = hits.next() {
        tracing::debug!(first = keyword, second = other, "several brands in file; no file-level brand");
        return None;
    }
    table.lookup(keyword).cloned()
}

/// Parse one file's extraction output into entries, in extraction order.
///
/// # Errors
///
/// Returns [`NormalizeError::ExtractionPayload`] if the payload is not valid;
/// the caller skips the file and moves on.
pub fn ingest_file(
    source: &SourceFile,
    brands: &BrandTable,
    today: NaiveDate,
) -> Result<Vec<ProductEntry>, NormalizeError> {
    let ExtractionResult {
        mut global_info,
        products,
    } = parse_extraction(&source.name, &source.payload)?;

    if let Some(cutoff) = cutoff_from_filename(&source.name, today) {
        let cutoff = cutoff.format(DATE_FORMAT).to_string();
        tracing::info!(file = %source.name, cutoff = %cutoff, "cutoff date taken from file name");
        global_info.source_cutoff = Some(cutoff.clone());
        global_info.internal_cutoff = Some(cutoff);
    }

    global_info.brand_override = source
        .text
        .as_deref()
        .and_then(|text| detect_file_brand(text, brands));
    if let Some(brand) = &global_info.brand_override {
        tracing::info!(file = %source.name, code = %brand.code, "file-level brand detected");
    }

    tracing::info!(file = %source.name, products = products.len(), "extraction ingested");

    Ok(products
        .into_iter()
        .map(|product_data| ProductEntry {
            global_info: global_info.clone(),
            product_data,
        })
        .collect())
}
