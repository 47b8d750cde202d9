use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One entry of the category catalog: a fixed catalog partition scanned
/// independently and merged globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Stable identifier used as the `category` field on published deals
    /// and in failed-category reports (e.g., `"dog_food"`).
    pub key: String,
    /// Human-readable label for logs and reports (e.g., `"Dog Food"`).
    pub label: String,
    /// Upstream search query string passed verbatim to the search endpoint.
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryConfig>,
}

/// Load and validate the category catalog from a YAML file.
///
/// The catalog is static configuration: scan order follows file order.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_categories(path: &Path) -> Result<CategoriesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_categories(&content)
}

/// Parse and validate a category catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` on YAML parse failure or validation failure.
pub fn parse_categories(content: &str) -> Result<CategoriesFile, ConfigError> {
    let file: CategoriesFile = serde_yaml::from_str(content)?;
    validate_categories(&file)?;
    Ok(file)
}

fn validate_categories(file: &CategoriesFile) -> Result<(), ConfigError> {
    if file.categories.is_empty() {
        return Err(ConfigError::Validation(
            "category catalog must contain at least one category".to_string(),
        ));
    }

    let mut seen_keys = HashSet::new();
    for category in &file.categories {
        if category.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category key must be non-empty".to_string(),
            ));
        }
        if category.query.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty query",
                category.key
            )));
        }
        if !seen_keys.insert(category.key.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category key: '{}'",
                category.key
            )));
        }
    }

    Ok(())
}
