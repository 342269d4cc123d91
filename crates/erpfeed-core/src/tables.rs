//! The three read-only reference tables, loaded once per batch run.

use std::path::{Path, PathBuf};

use crate::brands::{load_brand_table, BrandTable};
use crate::categories::{load_category_table, CategoryTable};
use crate::shippers::{load_shipper_list, ShipperList};
use crate::{AppConfig, ConfigError};

#[derive(Debug, Clone)]
pub struct ReferencePaths {
    pub brands: PathBuf,
    pub categories: PathBuf,
    pub shippers: PathBuf,
}

impl ReferencePaths {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            brands: config.brands_path.clone(),
            categories: config.categories_path.clone(),
            shippers: config.shippers_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub brands: BrandTable,
    pub categories: CategoryTable,
    pub shippers: ShipperList,
}

impl ReferenceTables {
    /// Load all tables from disk.
    ///
    /// A missing file leaves that table empty and logs a warning; the batch
    /// still runs with brand/category fields at their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a file exists but cannot be read, parsed, or validated.
    pub fn load(paths: &ReferencePaths) -> Result<Self, ConfigError> {
        let brands = load_optional(&paths.brands, "brand", load_brand_table)?;
        let categories = load_optional(&paths.categories, "category", load_category_table)?;
        let shippers = load_optional(&paths.shippers, "shipper", load_shipper_list)?;

        tracing::info!(
            brands = brands.len(),
            categories = categories.len(),
            shippers = shippers.len(),
            "reference tables loaded"
        );

        Ok(Self {
            brands,
            categories,
            shippers,
        })
    }
}

fn load_optional<T, F>(path: &Path, table: &str, load: F) -> Result<T, ConfigError>
where
    T: Default,
    F: FnOnce(&Path) -> Result<T, ConfigError>,
{
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            table,
            "reference table not found; continuing with an empty table"
        );
        return Ok(T::default());
    }
    load(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
    }

    #[test]
    fn load_reads_all_bundled_tables() {
        let dir = config_dir();
        let tables = ReferenceTables::load(&ReferencePaths {
            brands: dir.join("brands.yaml"),
            categories: dir.join("categories.yaml"),
            shippers: dir.join("shippers.yaml"),
        })
        .expect("bundled tables should load");
        assert!(!tables.brands.is_empty());
        assert!(!tables.categories.is_empty());
        assert!(!tables.shippers.is_empty());
    }

    #[test]
    fn load_degrades_missing_files_to_empty_tables() {
        let tables = ReferenceTables::load(&ReferencePaths {
            brands: PathBuf::from("/nonexistent/brands.yaml"),
            categories: PathBuf::from("/nonexistent/categories.yaml"),
            shippers: PathBuf::from("/nonexistent/shippers.yaml"),
        })
        .expect("missing tables must not fail the run");
        assert!(tables.brands.is_empty());
        assert!(tables.categories.is_empty());
        assert!(tables.shippers.is_empty());
    }
}
