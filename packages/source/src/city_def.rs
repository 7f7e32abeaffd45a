//! Config-driven city definition.

use serde::{Deserialize, Serialize};

use crate::SourceError;

/// A city whose air quality is tracked.
///
/// Loaded from TOML files embedded at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityDefinition {
    /// Unique identifier (e.g., `"delhi"`).
    pub id: String,
    /// Human-readable name (e.g., `"Delhi"`).
    pub name: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// File name of the daily readings, relative to the data directory.
    pub data_file: String,
    /// Free-form provenance notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Parses a city definition from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if the TOML is malformed or a required
/// key is missing.
pub fn parse_city_toml(toml_str: &str) -> Result<CityDefinition, SourceError> {
    Ok(toml::de::from_str(toml_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_delhi_toml() {
        let def = parse_city_toml(include_str!("../cities/delhi.toml")).unwrap();
        assert_eq!(def.id, "delhi");
        assert_eq!(def.name, "Delhi");
        assert_eq!(def.country, "IN");
        assert_eq!(def.data_file, "delhi_data.csv");
    }

    #[test]
    fn notes_are_optional() {
        let def = parse_city_toml(
            r#"
id = "oslo"
name = "Oslo"
country = "NO"
data_file = "oslo_data.csv"
"#,
        )
        .unwrap();
        assert!(def.notes.is_none());
    }

    #[test]
    fn rejects_missing_data_file() {
        let result = parse_city_toml("id = \"x\"\nname = \"X\"\ncountry = \"XX\"\n");
        assert!(matches!(result, Err(SourceError::Toml(_))));
    }
}
