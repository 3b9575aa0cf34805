use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::query::normalize_entry;
use crate::ConfigError;

/// Default product list, loaded once at startup.
#[derive(Debug, Deserialize)]
pub struct ProductsFile {
    pub products: Vec<String>,
}

/// Load and validate the products file (YAML).
///
/// Product names are whitespace-normalized; the list is deduplicated
/// case-insensitively, keeping the first spelling, and sorted
/// case-insensitively for display.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or contains no
/// usable product names.
pub fn load_products(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProductsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ProductsFile = serde_yaml::from_str(&content)?;

    let products = dedup_products(file.products);
    if products.is_empty() {
        return Err(ConfigError::Validation(format!(
            "products file {} contains no non-empty product names",
            path.display()
        )));
    }
    Ok(products)
}

/// Normalizes, deduplicates (case-insensitively), and sorts product names.
#[must_use]
pub fn dedup_products(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut products: Vec<String> = raw
        .into_iter()
        .map(|p| normalize_entry(&p))
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.to_lowercase()))
        .collect();
    products.sort_by_key(|p| p.to_uppercase());
    products
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_is_case_insensitive_and_keeps_first_spelling() {
        let products = dedup_products(vec![
            "iPhone".to_string(),
            "IPHONE".to_string(),
            "OnePlus".to_string(),
        ]);
        assert_eq!(products, vec!["iPhone".to_string(), "OnePlus".to_string()]);
    }

    #[test]
    fn dedup_normalizes_whitespace_and_drops_empties() {
        let products = dedup_products(vec![
            "  Samsung   Phone ".to_string(),
            "   ".to_string(),
        ]);
        assert_eq!(products, vec!["Samsung Phone".to_string()]);
    }

    #[test]
    fn dedup_sorts_case_insensitively() {
        let products = dedup_products(vec![
            "oneplus".to_string(),
            "iPhone".to_string(),
            "Galaxy".to_string(),
        ]);
        assert_eq!(
            products,
            vec![
                "Galaxy".to_string(),
                "iPhone".to_string(),
                "oneplus".to_string()
            ]
        );
    }

    #[test]
    fn load_products_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("products.yaml");
        assert!(
            path.exists(),
            "products.yaml missing at {path:?} — required for this test"
        );
        let products = load_products(&path).expect("failed to load products.yaml");
        assert!(!products.is_empty());
    }

    #[test]
    fn load_products_rejects_missing_file() {
        let result = load_products(Path::new("/nonexistent/products.yaml"));
        assert!(matches!(result, Err(ConfigError::ProductsFileIo { .. })));
    }
}
