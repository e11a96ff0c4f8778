//=========================================================================
// Pool Capacity Configuration
//=========================================================================
//
// Declarative starting capacity per pooled category.
//
// Supplied once at pool initialization. Can be built in code or read
// from a TOML table mapping category names to instance counts:
//
//   HexagonObstacle1 = 10
//   TriangleObstacle1 = 5
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::PoolKey;
use crate::core::error::ConfigError;

/// Starting capacity used for every category by [`CapacityConfig::default`].
pub const DEFAULT_STARTING_CAPACITY: usize = 20;

//=== CapacityConfig ======================================================

/// Starting instance count per pooled category.
///
/// Categories absent from the configuration are left unconfigured by the
/// pool, and every operation on them fails with `UnknownCategory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityConfig<P: PoolKey> {
    capacities: HashMap<P, usize>,
}

impl<P: PoolKey> CapacityConfig<P> {
    /// Creates an empty configuration (no category configured).
    pub fn empty() -> Self {
        Self {
            capacities: HashMap::new(),
        }
    }

    /// Configures every category with the same starting capacity.
    pub fn uniform(capacity: usize) -> Self {
        Self {
            capacities: P::all().iter().map(|&category| (category, capacity)).collect(),
        }
    }

    /// Sets the starting capacity of one category.
    pub fn with(mut self, category: P, capacity: usize) -> Self {
        self.capacities.insert(category, capacity);
        self
    }

    /// Starting capacity of a category, if configured.
    pub fn starting_capacity(&self, category: P) -> Option<usize> {
        self.capacities.get(&category).copied()
    }

    /// Returns true if every category of `P` is configured.
    pub fn is_complete(&self) -> bool {
        P::all().iter().all(|category| self.capacities.contains_key(category))
    }

    /// Configures every category left out with `capacity`, keeping the
    /// entries already present.
    pub fn fill_missing(mut self, capacity: usize) -> Self {
        for &category in P::all() {
            self.capacities.entry(category).or_insert(capacity);
        }
        self
    }

    //--- Loading ----------------------------------------------------------

    /// Parses a TOML table of `Category = count` entries.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError>
    where
        P: for<'de> Deserialize<'de>,
    {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML capacity file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError>
    where
        P: for<'de> Deserialize<'de>,
    {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        info!("Loaded pool capacities from {}", path.display());
        Ok(config)
    }
}

impl<P: PoolKey> Default for CapacityConfig<P> {
    fn default() -> Self {
        Self::uniform(DEFAULT_STARTING_CAPACITY)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    enum Kind {
        Hexagon,
        Triangle,
    }

    impl PoolKey for Kind {
        fn all() -> &'static [Self] {
            &[Kind::Hexagon, Kind::Triangle]
        }
    }

    #[test]
    fn default_configures_every_category() {
        let config = CapacityConfig::<Kind>::default();

        assert!(config.is_complete());
        assert_eq!(config.starting_capacity(Kind::Hexagon), Some(DEFAULT_STARTING_CAPACITY));
        assert_eq!(config.starting_capacity(Kind::Triangle), Some(DEFAULT_STARTING_CAPACITY));
    }

    #[test]
    fn partial_configuration_is_incomplete() {
        let config = CapacityConfig::empty().with(Kind::Hexagon, 2);

        assert!(!config.is_complete());
        assert_eq!(config.starting_capacity(Kind::Hexagon), Some(2));
        assert_eq!(config.starting_capacity(Kind::Triangle), None);
    }

    #[test]
    fn fill_missing_keeps_explicit_entries() {
        let config = CapacityConfig::empty()
            .with(Kind::Hexagon, 2)
            .fill_missing(DEFAULT_STARTING_CAPACITY);

        assert!(config.is_complete());
        assert_eq!(config.starting_capacity(Kind::Hexagon), Some(2));
        assert_eq!(config.starting_capacity(Kind::Triangle), Some(DEFAULT_STARTING_CAPACITY));
    }

    #[test]
    fn parses_toml_table() {
        let config = CapacityConfig::<Kind>::from_toml_str(
            r#"
Hexagon = 4
Triangle = 0
"#,
        )
        .unwrap();

        assert_eq!(config.starting_capacity(Kind::Hexagon), Some(4));
        assert_eq!(config.starting_capacity(Kind::Triangle), Some(0));
    }

    #[test]
    fn rejects_unknown_category_names() {
        let result = CapacityConfig::<Kind>::from_toml_str("Square = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = CapacityConfig::<Kind>::load("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
