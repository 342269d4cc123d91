//! Assembly of one canonical row from a raw product and its file's global info.

use std::sync::LazyLock;

use chrono::NaiveDate;
use erpfeed_core::{CanonicalRow, ProductEntry, ReferenceTables, VENDOR_LOOKUP_FORMULA};
use regex::Regex;

use crate::brand::{resolve_brand, BrandSource};
use crate::category::classify;
use crate::dates::{cutoff_before, parse_date, parse_release_month, DATE_FORMAT};
use crate::error::{Diagnostic, DiagnosticKind};

/// Shape the extraction step is instructed to emit for release months.
static EXTRACTED_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("valid extracted month regex"));

/// Placeholder written to the ERP column for rows awaiting import.
const ERP_PENDING: &str = "待匯";
/// Free size, used for both size columns.
const FREE_SIZE: &str = "F";

/// A canonical row plus whatever went wrong while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledRow {
    pub row: CanonicalRow,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds canonical rows against a fixed set of reference tables and a fixed
/// shelf date, so the same input always yields the same row.
#[derive(Debug, Clone, Copy)]
pub struct RowAssembler<'a> {
    tables: &'a ReferenceTables,
    shelf_date: NaiveDate,
}

impl<'a> RowAssembler<'a> {
    #[must_use]
    pub fn new(tables: &'a ReferenceTables, shelf_date: NaiveDate) -> Self {
        Self { tables, shelf_date }
    }

    /// Build the row for one product. Never fails: unparseable values are
    /// carried through raw and reported in [`AssembledRow::diagnostics`].
    #[must_use]
    pub fn assemble(&self, entry: &ProductEntry) -> AssembledRow {
        let product = &entry.product_data;
        let global = &entry.global_info;
        let mut diagnostics = Vec::new();

        let release_month = release_month(product.release_month.as_deref(), &mut diagnostics);
        let source_cutoff_date = source_cutoff(global.source_cutoff(), &mut diagnostics);
        let internal_cutoff_date = internal_cutoff(global.internal_cutoff(), &mut diagnostics);

        let detected_brand = product.detected_brand();
        let brand = resolve_brand(
            detected_brand,
            global.brand_override.as_ref(),
            &self.tables.brands,
        );
        if let Some(token) = detected_brand {
            if !matches!(brand, BrandSource::AiMatch(_)) {
                diagnostics.push(Diagnostic::new("品牌", DiagnosticKind::LookupMiss, token));
            }
        }

        let name = match brand.prefix() {
            Some(prefix) => format!("{prefix} {}", product.name()),
            None => product.name().to_string(),
        };

        let hints: Vec<&str> = [detected_brand, product.detected_category()]
            .into_iter()
            .flatten()
            .collect();
        let classification = classify(&name, product.sku(), &hints, &self.tables.categories);

        for diagnostic in &diagnostics {
            tracing::warn!(
                product = %product.name(),
                field = diagnostic.field,
                kind = %diagnostic.kind,
                value = %diagnostic.value,
                "row assembled with fallback value"
            );
        }

        let row = CanonicalRow {
            erp: ERP_PENDING.to_string(),
            shipper: global.shipper().to_string(),
            model: product.barcode().to_string(),
            sku: product.sku().to_string(),
            release_month,
            shelf_date: self.shelf_date.format(DATE_FORMAT).to_string(),
            internal_cutoff_date,
            source_cutoff_date,
            barcode: product.barcode().to_string(),
            display_name: classification.display_name,
            brand_code: brand.code().to_string(),
            cost_price: product.cost_price.clone().unwrap_or_default(),
            suggested_price: product.suggested_price.clone().unwrap_or_default(),
            vendor_code: VENDOR_LOOKUP_FORMULA.to_string(),
            category1: classification.category_code,
            size1: FREE_SIZE.to_string(),
            size_name: FREE_SIZE.to_string(),
            note: product.note.clone().unwrap_or_default(),
            ..CanonicalRow::default()
        };

        AssembledRow { row, diagnostics }
    }
}

/// `YYYY-MM` passes straight through without its separator. Any other shape
/// is written verbatim and flagged; unreadable values are flagged twice.
fn release_month(value: Option<&str>, diagnostics: &mut Vec<Diagnostic>) -> String {
    const FIELD: &str = "預計發售月份";

    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return String::new();
    };

    if EXTRACTED_MONTH.is_match(value) {
        if let Ok((year, month)) = parse_release_month(value) {
            return format!("{year:04}{month:02}");
        }
    } else {
        diagnostics.push(Diagnostic::new(FIELD, DiagnosticKind::FormatMismatch, value));
    }

    if parse_release_month(value).is_err() {
        diagnostics.push(Diagnostic::new(FIELD, DiagnosticKind::ParseFailure, value));
    }
    value.to_string()
}

/// Vendor's literal cutoff, reformatted only.
fn source_cutoff(value: Option<&str>, diagnostics: &mut Vec<Diagnostic>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match parse_date(value) {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(_) => {
            diagnostics.push(Diagnostic::new("結單日期", DiagnosticKind::ParseFailure, value));
            value.to_string()
        }
    }
}

/// Internal cutoff: normalized, then moved back one business day.
fn internal_cutoff(value: Option<&str>, diagnostics: &mut Vec<Diagnostic>) -> String {
    const FIELD: &str = "內部結單日期";

    let Some(value) = value else {
        return String::new();
    };
    let date = match parse_date(value) {
        Ok(date) => date,
        Err(_) => {
            diagnostics.push(Diagnostic::new(FIELD, DiagnosticKind::ParseFailure, value));
            return value.to_string();
        }
    };
    if let Some(shifted) = cutoff_before(date) {
        shifted.format(DATE_FORMAT).to_string()
    } else {
        diagnostics.push(Diagnostic::new(FIELD, DiagnosticKind::AdjustmentFailed, value));
        date.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
#[path = "row_test.rs"]
mod tests;
