use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Brand code plus the optional name prepended to product display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEntry {
    pub code: String,
    pub display_name: Option<String>,
}

impl BrandEntry {
    /// Display-name prefix, treating a blank value as absent.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandConfig {
    pub keyword: String,
    pub code: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<BrandConfig>,
}

/// Brand reference table keyed by lowercased keyword.
///
/// Keywords keep their file order so whole-file scans are deterministic.
#[derive(Debug, Clone, Default)]
pub struct BrandTable {
    keywords: Vec<String>,
    entries: HashMap<String, BrandEntry>,
}

impl BrandTable {
    /// Build a table from `(keyword, entry)` pairs. Later duplicates of a
    /// keyword (case-insensitive) are ignored.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, BrandEntry)>,
        K: AsRef<str>,
    {
        let mut table = Self::default();
        for (keyword, entry) in entries {
            let key = keyword.as_ref().to_lowercase();
            if table.entries.contains_key(&key) {
                continue;
            }
            table.keywords.push(key.clone());
            table.entries.insert(key, entry);
        }
        table
    }

    /// Exact, case-insensitive lookup.
    #[must_use]
    pub fn lookup(&self, keyword: &str) -> Option<&BrandEntry> {
        self.entries.get(&keyword.to_lowercase())
    }

    /// Lowercased keywords in table order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Load and validate the brand table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brand_table(path: &Path) -> Result<BrandTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReferenceFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let brands_file: BrandsFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ReferenceFileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_brands(&brands_file)?;

    Ok(BrandTable::from_entries(brands_file.brands.into_iter().map(
        |b| {
            (
                b.keyword,
                BrandEntry {
                    code: b.code.trim().to_string(),
                    display_name: b.display_name,
                },
            )
        },
    )))
}

fn validate_brands(brands_file: &BrandsFile) -> Result<(), ConfigError> {
    let mut seen_keywords = HashSet::new();

    for brand in &brands_file.brands {
        if brand.keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand keyword must be non-empty".to_string(),
            ));
        }

        if brand.code.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has an empty code",
                brand.keyword
            )));
        }

        if !seen_keywords.insert(brand.keyword.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand keyword: '{}'",
                brand.keyword
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "brands_test.rs"]
mod tests;
