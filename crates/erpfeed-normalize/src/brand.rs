//! Brand resolution across the three possible sources.
//!
//! Priority is fixed: a brand token detected on the row that resolves in the
//! brand table, then the file-level override, then the downstream lookup
//! formula. When a package names both maker and distributor the extraction
//! step is expected to have picked the maker already; it is trusted as-is.

use erpfeed_core::{BrandEntry, BrandTable, BRAND_LOOKUP_FORMULA};

/// Where the final brand came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandSource<'a> {
    AiMatch(&'a BrandEntry),
    FileOverride(&'a BrandEntry),
    Default,
}

impl BrandSource<'_> {
    /// Brand column value: the resolved code, or the lookup formula.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            BrandSource::AiMatch(entry) | BrandSource::FileOverride(entry) => &entry.code,
            BrandSource::Default => BRAND_LOOKUP_FORMULA,
        }
    }

    /// Name to prepend to the product name, if the resolved entry has one.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        match self {
            BrandSource::AiMatch(entry) | BrandSource::FileOverride(entry) => entry.prefix(),
            BrandSource::Default => None,
        }
    }

    #[must_use]
    pub fn resolution(&self) -> BrandResolution {
        BrandResolution {
            code: self.code().to_string(),
            display_name: self.prefix().map(str::to_string),
        }
    }
}

/// Owned `(code, display name)` pair produced by [`BrandSource::resolution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandResolution {
    pub code: String,
    pub display_name: Option<String>,
}

/// Pick the brand for one product.
#[must_use]
pub fn resolve_brand<'a>(
    detected: Option<&str>,
    file_override: Option<&'a BrandEntry>,
    table: &'a BrandTable,
) -> BrandSource<'a> {
    if let Some(token) = detected {
        if let Some(entry) = table.lookup(token) {
            return BrandSource::AiMatch(entry);
        }
        tracing::debug!(token, "detected brand not in brand table");
    }

    match file_override {
        Some(entry) => BrandSource::FileOverride(entry),
        None => BrandSource::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, display_name: Option<&str>) -> BrandEntry {
        BrandEntry {
            code: code.to_string(),
            display_name: display_name.map(str::to_string),
        }
    }

    fn table() -> BrandTable {
        BrandTable::from_entries([
            ("Tomica", entry("TOMY", Some("多美"))),
            ("Mini GT", entry("MGT", None)),
        ])
    }

    #[test]
    fn detected_token_beats_file_override() {
        let table = table();
        let file_brand = entry("POPR", Some("POP RACE"));
        let source = resolve_brand(Some("TOMICA"), Some(&file_brand), &table);
        assert!(matches!(source, BrandSource::AiMatch(_)));
        assert_eq!(source.code(), "TOMY");
        assert_eq!(source.prefix(), Some("多美"));
    }

    #[test]
    fn file_override_used_without_detected_token() {
        let table = table();
        let file_brand = entry("POPR", Some("POP RACE"));
        let source = resolve_brand(None, Some(&file_brand), &table);
        assert_eq!(source, BrandSource::FileOverride(&file_brand));
        assert_eq!(source.code(), "POPR");
    }

    #[test]
    fn unknown_detected_token_falls_through_to_override() {
        let table = table();
        let file_brand = entry("POPR", None);
        let source = resolve_brand(Some("Hot Wheels"), Some(&file_brand), &table);
        assert_eq!(source, BrandSource::FileOverride(&file_brand));
    }

    #[test]
    fn nothing_resolves_to_placeholder_formula() {
        let table = table();
        let source = resolve_brand(Some("Hot Wheels"), None, &table);
        assert_eq!(source, BrandSource::Default);
        assert_eq!(source.code(), BRAND_LOOKUP_FORMULA);
        assert!(source.prefix().is_none());
    }

    #[test]
    fn empty_table_with_no_override_is_default() {
        let empty = BrandTable::default();
        let source = resolve_brand(Some("Tomica"), None, &empty);
        assert_eq!(source, BrandSource::Default);
    }

    #[test]
    fn entry_without_display_name_has_no_prefix() {
        let table = table();
        let resolution = resolve_brand(Some("mini gt"), None, &table).resolution();
        assert_eq!(
            resolution,
            BrandResolution {
                code: "MGT".to_string(),
                display_name: None,
            }
        );
    }
}
