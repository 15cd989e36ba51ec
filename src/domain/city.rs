//! Allow-list of cities the service forecasts for

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A supported city and the provider query that locates it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// Provider query, preferably `"lat,lon"` to avoid ambiguous names
    pub query: String,
}

impl City {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
        }
    }
}

pub fn default_cities() -> Vec<City> {
    vec![
        City::new("Montreal", "45.5017,-73.5673"),
        City::new("Trois-Rivieres", "46.3432,-72.5477"),
    ]
}

#[derive(Debug, Clone)]
pub struct CityRegistry {
    cities: Vec<City>,
}

impl CityRegistry {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Look a city up by name, ignoring case and surrounding whitespace
    pub fn resolve(&self, name: &str) -> Result<&City, DomainError> {
        let wanted = name.trim();

        self.cities
            .iter()
            .find(|city| city.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::unknown_city(wanted))
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self::new(default_cities())
    }
}
