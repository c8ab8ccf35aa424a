//! Configuration structs with sensible defaults and RON persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "teleport.ron";

const APP_NAME: &str = "wayfarer";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Random teleport search settings.
    pub teleport: TeleportConfig,
    /// Terrain resolution settings.
    pub terrain: TerrainConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// A persisted center point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CenterConfig {
    /// Name of the world the center lives in.
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

/// Center and range bounds for one scope (global or a single world).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldRangeConfig {
    /// Center of the search annulus. Computed from the world border when absent.
    pub center: Option<CenterConfig>,
    /// Inner radius. Defaults to 0.
    pub min_range: Option<f64>,
    /// Outer radius. Defaults to half the world border size.
    pub max_range: Option<f64>,
}

/// Random teleport settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeleportConfig {
    /// Use a separate center and range per world instead of one global set.
    pub per_world: bool,
    /// Settings used when `per_world` is off.
    pub global: WorldRangeConfig,
    /// Settings keyed by world name, used when `per_world` is on.
    pub worlds: BTreeMap<String, WorldRangeConfig>,
    /// Biome names that are never chosen as a destination.
    pub excluded_biomes: Vec<String>,
    /// Maximum candidate rounds per request, also the refill batch size.
    pub find_attempts: u32,
    /// Queue depth below which a refill is scheduled.
    pub cache_threshold: u32,
    /// Fill the cache as soon as the service starts.
    pub pre_cache: bool,
}

/// Terrain resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Added to the highest solid block when resolving standard-world elevation.
    pub ground_offset: i32,
    /// First height scanned in enclosed (ceiling-bound) worlds.
    pub enclosed_floor: i32,
    /// Seed for the simulated terrain.
    pub seed: u64,
    /// Artificial chunk-load latency of the simulated terrain, in milliseconds.
    pub chunk_load_latency_ms: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            per_world: false,
            global: WorldRangeConfig::default(),
            worlds: BTreeMap::new(),
            excluded_biomes: [
                "cold_ocean",
                "deep_cold_ocean",
                "deep_frozen_ocean",
                "deep_lukewarm_ocean",
                "deep_ocean",
                "deep_warm_ocean",
                "frozen_ocean",
                "frozen_river",
                "lukewarm_ocean",
                "ocean",
                "river",
                "warm_ocean",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            find_attempts: 10,
            cache_threshold: 10,
            pre_cache: false,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            ground_offset: 1,
            enclosed_floor: 32,
            seed: 0,
            chunk_load_latency_ms: 5,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Scope resolution ---

impl TeleportConfig {
    /// Returns the settings scope that applies to `world`.
    ///
    /// The global scope is used when `world` is `None` or `per_world` is off.
    /// Returns `None` for a per-world scope that has not been written yet.
    pub fn scope(&self, world: Option<&str>) -> Option<&WorldRangeConfig> {
        match world {
            Some(name) if self.per_world => self.worlds.get(name),
            _ => Some(&self.global),
        }
    }

    /// Mutable counterpart of [`TeleportConfig::scope`], creating the
    /// per-world scope on first write.
    pub fn scope_mut(&mut self, world: Option<&str>) -> &mut WorldRangeConfig {
        match world {
            Some(name) if self.per_world => self.worlds.entry(name.to_string()).or_default(),
            _ => &mut self.global,
        }
    }
}

/// Platform default config directory (`<config_dir>/wayfarer`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `teleport.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(world: &str) -> CenterConfig {
        CenterConfig {
            world: world.to_string(),
            x: 100.0,
            y: 64.0,
            z: -40.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(ron_str.contains("find_attempts: 10"));
        assert!(ron_str.contains("cache_threshold: 10"));
        assert!(ron_str.contains("ground_offset: 1"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.teleport.global.center = Some(center("overworld"));
        config.teleport.global.max_range = Some(2500.0);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(teleport: (per_world: true))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert!(config.teleport.per_world);
        assert_eq!(config.teleport.find_attempts, 10);
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_scope_global_when_per_world_off() {
        let mut teleport = TeleportConfig::default();
        teleport.global.min_range = Some(50.0);
        teleport.worlds.insert(
            "nether".to_string(),
            WorldRangeConfig {
                min_range: Some(7.0),
                ..Default::default()
            },
        );

        let scope = teleport.scope(Some("nether")).unwrap();
        assert_eq!(scope.min_range, Some(50.0));
    }

    #[test]
    fn test_scope_per_world() {
        let mut teleport = TeleportConfig {
            per_world: true,
            ..Default::default()
        };
        assert!(teleport.scope(Some("nether")).is_none());

        teleport.scope_mut(Some("nether")).min_range = Some(7.0);
        assert_eq!(teleport.scope(Some("nether")).unwrap().min_range, Some(7.0));
        assert_eq!(teleport.global.min_range, None);
        // No world still resolves to the global scope.
        assert!(std::ptr::eq(teleport.scope(None).unwrap(), &teleport.global));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.teleport.per_world = true;
        config.teleport.scope_mut(Some("overworld")).center = Some(center("overworld"));
        config.teleport.excluded_biomes = vec!["desert".to_string()];

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.teleport.cache_threshold = 3;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().teleport.cache_threshold, 3);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_reload_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
