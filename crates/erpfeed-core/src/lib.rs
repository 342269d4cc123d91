pub mod app_config;
pub mod brands;
pub mod categories;
pub mod config;
mod lenient;
pub mod products;
pub mod shippers;
pub mod tables;

pub use app_config::{AppConfig, Environment};
pub use brands::{load_brand_table, BrandEntry, BrandTable};
pub use categories::{load_category_table, CategoryCommand, CategoryRule, CategoryTable};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    CanonicalRow, GlobalInfo, ProductEntry, RawProduct, BRAND_LOOKUP_FORMULA, COLUMNS,
    VENDOR_LOOKUP_FORMULA,
};
pub use shippers::{load_shipper_list, ShipperList};
pub use tables::{ReferencePaths, ReferenceTables};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read reference table {path}: {source}")]
    ReferenceFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reference table {path}: {source}")]
    ReferenceFileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("reference table validation failed: {0}")]
    Validation(String),
}
