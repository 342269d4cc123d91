use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// What a matched category keyword does to the display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryCommand {
    /// Keep the keyword in the name and append the suffix.
    #[serde(alias = "KEEP", alias = "保留")]
    Keep,
    /// Remove the first occurrence of the keyword, then append the suffix.
    #[default]
    #[serde(alias = "STRIP", alias = "刪除")]
    Strip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub keyword: String,
    pub category_code: String,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub command: CategoryCommand,
}

impl CategoryRule {
    /// Suffix to append, treating a blank value as absent.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryRule>,
}

/// Category rules ordered by keyword length (in characters), longest first.
///
/// Rules with equal keyword length keep their original relative order.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    #[must_use]
    pub fn new(mut rules: Vec<CategoryRule>) -> Self {
        rules.sort_by_key(|r| std::cmp::Reverse(r.keyword.chars().count()));
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Load and validate the category table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_category_table(path: &Path) -> Result<CategoryTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReferenceFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CategoriesFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ReferenceFileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_categories(&file)?;

    Ok(CategoryTable::new(file.categories))
}

fn validate_categories(file: &CategoriesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for rule in &file.categories {
        if rule.keyword.is_empty() {
            return Err(ConfigError::Validation(
                "category keyword must be non-empty".to_string(),
            ));
        }
        if !seen.insert(rule.keyword.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category keyword: '{}'",
                rule.keyword
            )));
        }
    }

    Ok(())
}
