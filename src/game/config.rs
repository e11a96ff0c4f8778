//=========================================================================
// Game Configuration
//=========================================================================
//
// Tunable gameplay values and the full session configuration.
//
// A session can be configured in code or from a TOML document:
//
//   [game]
//   max_lives = 5
//
//   [capacities]
//   HexagonObstacle1 = 10
//
//   [[templates]]
//   kind = "HexagonObstacle1"
//   name = "HexagonObstacle1"
//   spawn_height = 3.0
//   half_width = 0.6
//
// Every missing value falls back to its default.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::{ObstacleKind, ObstacleTemplate};
use crate::core::error::ConfigError;
use crate::core::object_pool::{
    CapacityConfig, PoolKey, TemplateCatalog, DEFAULT_STARTING_CAPACITY,
};

//=== GameSettings ========================================================

/// Gameplay tuning values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    //--- Starting values --------------------------------------------------
    pub start_speed: f32,
    pub start_min_spawn_interval: f32,
    pub start_max_spawn_interval: f32,

    //--- Difficulty -------------------------------------------------------
    pub max_lives: u32,
    /// Difficulty goes up every time the score is a multiple of this.
    pub difficulty_threshold: u32,
    pub speed_increment: f32,
    pub min_interval_decrement: f32,
    pub max_interval_decrement: f32,
    pub min_interval_floor: f32,
    pub max_interval_floor: f32,

    //--- Camera shake -----------------------------------------------------
    pub camera_shake_duration: f32,
    pub camera_shake_magnitude: f32,

    /// Hits are ignored while set.
    pub debug_mode: bool,

    //--- World geometry ---------------------------------------------------
    pub spawn_x: f32,
    pub player_x: f32,
    pub despawn_x: f32,
    /// Seconds between obstacle phase checks.
    pub obstacle_poll_interval: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            start_speed: 10.0,
            start_min_spawn_interval: 1.5,
            start_max_spawn_interval: 2.0,
            max_lives: 3,
            difficulty_threshold: 15,
            speed_increment: 1.0,
            min_interval_decrement: 0.1,
            max_interval_decrement: 0.2,
            min_interval_floor: 0.2,
            max_interval_floor: 0.4,
            camera_shake_duration: 0.5,
            camera_shake_magnitude: 0.5,
            debug_mode: false,
            spawn_x: 12.0,
            player_x: -6.0,
            despawn_x: -12.0,
            obstacle_poll_interval: 0.1,
        }
    }
}

//=== SessionConfig =======================================================

/// Everything needed to build a [`super::GameSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub settings: GameSettings,
    pub capacities: CapacityConfig<ObstacleKind>,
    pub templates: TemplateCatalog<ObstacleKind, ObstacleTemplate>,
    /// Fixed seed for the pool and spawner; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    /// Default settings, 20 instances per obstacle and one template each.
    fn default() -> Self {
        Self {
            settings: GameSettings::default(),
            capacities: CapacityConfig::default(),
            templates: default_templates(),
            seed: None,
        }
    }
}

#[derive(Deserialize)]
struct TemplateEntry {
    kind: ObstacleKind,
    name: String,
    spawn_height: f32,
    half_width: f32,
}

#[derive(Deserialize)]
struct SessionFile {
    #[serde(default)]
    game: GameSettings,
    #[serde(default)]
    capacities: Option<CapacityConfig<ObstacleKind>>,
    #[serde(default)]
    templates: Vec<TemplateEntry>,
    #[serde(default)]
    seed: Option<u64>,
}

impl SessionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses a TOML session document.
    ///
    /// Omitted sections use their defaults; an empty `templates` list keeps
    /// the built-in obstacle templates. Kinds missing from `[capacities]`
    /// get the default starting capacity.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: SessionFile = toml::from_str(source)?;

        let templates = if file.templates.is_empty() {
            default_templates()
        } else {
            file.templates
                .into_iter()
                .fold(TemplateCatalog::new(), |catalog, entry| {
                    catalog.with(
                        entry.kind,
                        ObstacleTemplate {
                            name: entry.name,
                            spawn_height: entry.spawn_height,
                            half_width: entry.half_width,
                        },
                    )
                })
        };

        let mut capacities = file.capacities.unwrap_or_default();
        if !capacities.is_complete() {
            warn!(
                "Session configuration leaves some obstacle kinds without capacity, using {} for them",
                DEFAULT_STARTING_CAPACITY
            );
            capacities = capacities.fill_missing(DEFAULT_STARTING_CAPACITY);
        }

        Ok(Self {
            settings: file.game,
            capacities,
            templates,
            seed: file.seed,
        })
    }

    /// Reads and parses a TOML session file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        info!("Loaded session configuration from {}", path.display());
        Ok(config)
    }
}

/// One template per obstacle kind, named after the kind.
fn default_templates() -> TemplateCatalog<ObstacleKind, ObstacleTemplate> {
    ObstacleKind::all()
        .iter()
        .fold(TemplateCatalog::new(), |catalog, &kind| {
            let (spawn_height, half_width) = match kind {
                ObstacleKind::HexagonObstacle1 => (3.0, 0.6),
                ObstacleKind::HexagonObstacle2 => (3.5, 0.8),
                ObstacleKind::HexagonObstacle3 => (4.0, 1.0),
                ObstacleKind::TriangleObstacle1 => (2.5, 0.5),
                ObstacleKind::TriangleObstacle2 => (3.0, 0.7),
                ObstacleKind::TriangleObstacle3 => (3.5, 0.9),
            };
            catalog.with(
                kind,
                ObstacleTemplate {
                    name: format!("{:?}", kind),
                    spawn_height,
                    half_width,
                },
            )
        })
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object_pool::TemplateSource;

    #[test]
    fn default_config_covers_every_kind() {
        let config = SessionConfig::default();

        assert!(config.capacities.is_complete());
        for &kind in ObstacleKind::all() {
            assert_eq!(config.templates.len_of(kind), 1);
        }
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();

        assert_eq!(config.settings, GameSettings::default());
        assert_eq!(config.capacities, CapacityConfig::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_game_section_keeps_other_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
seed = 11

[game]
max_lives = 5
debug_mode = true
"#,
        )
        .unwrap();

        assert_eq!(config.settings.max_lives, 5);
        assert!(config.settings.debug_mode);
        assert_eq!(config.settings.start_speed, 10.0);
        assert_eq!(config.seed, Some(11));
    }

    #[test]
    fn capacities_and_templates_are_read() {
        let config = SessionConfig::from_toml_str(
            r#"
[capacities]
HexagonObstacle1 = 2

[[templates]]
kind = "HexagonObstacle1"
name = "big-hex"
spawn_height = 4.5
half_width = 1.2
"#,
        )
        .unwrap();

        assert_eq!(config.capacities.starting_capacity(ObstacleKind::HexagonObstacle1), Some(2));
        assert_eq!(
            config.capacities.starting_capacity(ObstacleKind::TriangleObstacle1),
            Some(DEFAULT_STARTING_CAPACITY)
        );
        assert!(config.capacities.is_complete());

        let hexes = config.templates.templates(ObstacleKind::HexagonObstacle1);
        assert_eq!(hexes.len(), 1);
        assert_eq!(hexes[0].name, "big-hex");
        assert!(config.templates.templates(ObstacleKind::TriangleObstacle1).is_empty());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let result = SessionConfig::from_toml_str("[game]\nmax_lives = \"many\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
