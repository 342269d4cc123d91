use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct ShippersFile {
    pub shippers: Vec<String>,
}

/// Known shipper names, comma-expanded and de-duplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipperList {
    names: Vec<String>,
}

impl ShipperList {
    /// Expand raw cells into a flat list.
    ///
    /// A single cell may hold several names separated by ASCII or full-width commas.
    pub fn from_raw<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for cell in cells {
            for name in cell.as_ref().split([',', '，']) {
                let name = name.trim();
                if name.is_empty() || !seen.insert(name.to_string()) {
                    continue;
                }
                names.push(name.to_string());
            }
        }
        Self { names }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Load the shipper list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_shipper_list(path: &Path) -> Result<ShipperList, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReferenceFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ShippersFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ReferenceFileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    Ok(ShipperList::from_raw(file.shippers))
}
