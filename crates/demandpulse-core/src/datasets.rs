//! Read-only lookup datasets for the location and country selectors.
//!
//! Both files are plain CSVs with a header row; only the name column is
//! consumed. Loaded once at startup.

use std::path::Path;

use csv::Reader;

use crate::ConfigError;

/// Column header carrying city names in the world-cities dataset.
const CITIES_NAME_COLUMN: &str = "name";
/// Column header carrying country names in the countries dataset.
const COUNTRIES_NAME_COLUMN: &str = "Name";

/// Loads the selectable store locations, sorted case-insensitively.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or lacks a `name` column.
pub fn load_locations(path: &Path) -> Result<Vec<String>, ConfigError> {
    let mut locations = load_column(path, CITIES_NAME_COLUMN)?;
    locations.sort_by_key(|name| name.to_uppercase());
    Ok(locations)
}

/// Loads the selectable countries in file order.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or lacks a `Name` column.
pub fn load_countries(path: &Path) -> Result<Vec<String>, ConfigError> {
    load_column(path, COUNTRIES_NAME_COLUMN)
}

fn load_column(path: &Path, column: &str) -> Result<Vec<String>, ConfigError> {
    let io_err = |source: csv::Error| ConfigError::DatasetIo {
        path: path.display().to_string(),
        source,
    };

    let mut reader = Reader::from_path(path).map_err(io_err)?;
    let headers = reader.headers().map_err(io_err)?;
    let index = headers.iter().position(|h| h == column).ok_or_else(|| {
        ConfigError::DatasetMissingColumn {
            path: path.display().to_string(),
            column: column.to_string(),
        }
    })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(io_err)?;
        if let Some(value) = record.get(index) {
            let value = value.trim();
            if !value.is_empty() {
                values.push(value.to_string());
            }
        }
    }
    Ok(values)
}
