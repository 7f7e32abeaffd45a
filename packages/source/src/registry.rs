//! City registry — loads all city definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/cities/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a city means adding a TOML
//! file and listing it below.

use crate::SourceError;
use crate::city_def::{CityDefinition, parse_city_toml};

/// Environment variable holding a comma-separated list of city ids.
pub const CITIES_ENV_VAR: &str = "AIR_HEALTH_CITIES";

/// TOML configs embedded at compile time.
const CITY_TOMLS: &[(&str, &str)] = &[
    ("delhi", include_str!("../cities/delhi.toml")),
    ("helsinki", include_str!("../cities/helsinki.toml")),
    ("amsterdam", include_str!("../cities/amsterdam.toml")),
];

/// Returns all configured city definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is caught by the registry tests).
#[must_use]
pub fn all_cities() -> Vec<CityDefinition> {
    CITY_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_city_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the cities to report on, filtered by the `--cities` CLI flag or
/// the `AIR_HEALTH_CITIES` environment variable. If neither is set, all
/// cities are returned.
///
/// # Errors
///
/// Returns [`SourceError::UnknownCity`] if the filter names a city that is
/// not configured.
pub fn enabled_cities(cli_filter: Option<String>) -> Result<Vec<CityDefinition>, SourceError> {
    let filter = cli_filter.or_else(|| std::env::var(CITIES_ENV_VAR).ok());

    match filter {
        Some(filter_str) => filter_cities(&all_cities(), &filter_str),
        None => Ok(all_cities()),
    }
}

/// Resolves each id of a comma-separated filter string, in filter order.
/// Repeated ids are kept once.
///
/// # Errors
///
/// Returns [`SourceError::UnknownCity`] for the first id not in `all`.
pub fn filter_cities(
    all: &[CityDefinition],
    filter: &str,
) -> Result<Vec<CityDefinition>, SourceError> {
    let mut selected: Vec<CityDefinition> = Vec::new();

    for id in filter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let city = find_city(all, id).inspect_err(|_| {
            let available = all.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
            log::warn!("Unknown city {id:?}. Available: {}", available.join(", "));
        })?;
        if !selected.iter().any(|c| c.id == city.id) {
            selected.push(city.clone());
        }
    }

    Ok(selected)
}

/// Looks up one city by id, ignoring ASCII case.
///
/// # Errors
///
/// Returns [`SourceError::UnknownCity`] if no city has this id.
pub fn find_city<'a>(
    cities: &'a [CityDefinition],
    id: &str,
) -> Result<&'a CityDefinition, SourceError> {
    cities
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| SourceError::UnknownCity { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_cities() {
        assert_eq!(all_cities().len(), CITY_TOMLS.len());
    }

    #[test]
    fn city_ids_are_unique() {
        let cities = all_cities();
        let mut ids: Vec<&str> = cities.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cities.len());
    }

    #[test]
    fn registry_keys_match_ids() {
        for ((key, _), city) in CITY_TOMLS.iter().zip(all_cities()) {
            assert_eq!(*key, city.id);
        }
    }

    #[test]
    fn filters_by_comma_separated_ids() {
        let filtered = filter_cities(&all_cities(), "amsterdam, Delhi,").unwrap();
        let ids: Vec<&str> = filtered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["amsterdam", "delhi"]);
    }

    #[test]
    fn repeated_ids_are_kept_once() {
        let filtered = filter_cities(&all_cities(), "delhi,DELHI,delhi").unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn unknown_city_in_filter_is_an_error() {
        let result = filter_cities(&all_cities(), "helsinki,atlantis");
        assert!(matches!(
            result,
            Err(SourceError::UnknownCity { id }) if id == "atlantis"
        ));
    }

    #[test]
    fn blank_filter_selects_nothing() {
        assert!(filter_cities(&all_cities(), " , ").unwrap().is_empty());
    }

    #[test]
    fn explicit_filter_overrides_environment() {
        let cities = enabled_cities(Some("helsinki".to_string())).unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Helsinki");
    }

    #[test]
    fn finds_city_by_id() {
        let cities = all_cities();
        assert_eq!(find_city(&cities, "HELSINKI").unwrap().id, "helsinki");
        assert!(matches!(
            find_city(&cities, "atlantis"),
            Err(SourceError::UnknownCity { id }) if id == "atlantis"
        ));
    }
}
