//! Configuration-backed random teleport service.
//!
//! Resolves centers and ranges from the persisted [`Config`] (globally or per
//! world), snapshots search settings for every request, and clears the
//! location cache whenever the configuration is reloaded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use wayfarer_config::{CenterConfig, Config, ConfigError};
use wayfarer_world::{
    Biome, ElevationSettings, ElevationStrategy, Location, TerrainOracle, WorldId,
    parse_biome_set, resolve_column,
};

use crate::{CandidateGenerator, SearchEngine, SearchSettings, Validator};

/// Random teleport service over a terrain oracle and a config directory.
pub struct RandomTeleport<O> {
    engine: SearchEngine<O>,
    config: RwLock<Config>,
    config_dir: PathBuf,
}

impl<O: TerrainOracle> RandomTeleport<O> {
    /// Load (or create) the config in `config_dir` and build the service.
    pub fn load(
        oracle: Arc<O>,
        generator: CandidateGenerator,
        config_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();
        let config = Config::load_or_create(&config_dir)?;
        Ok(Self::with_config(oracle, generator, config, config_dir))
    }

    /// Build the service from an already loaded config.
    pub fn with_config(
        oracle: Arc<O>,
        generator: CandidateGenerator,
        config: Config,
        config_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine: SearchEngine::new(oracle, generator),
            config: RwLock::new(config),
            config_dir: config_dir.into(),
        }
    }

    pub fn engine(&self) -> &SearchEngine<O> {
        &self.engine
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Config> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` and persist the result.
    fn update(&self, change: impl FnOnce(&mut Config)) -> Result<(), ConfigError> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        change(&mut config);
        config.save(&self.config_dir)
    }

    /// Re-read the config file and clear the location cache.
    ///
    /// The cache is cleared even when the file is unchanged or unreadable.
    /// On error the current configuration is kept. Returns whether the
    /// configuration changed.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let reloaded = {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            config.reload(&self.config_dir).map(|fresh| match fresh {
                Some(fresh) => {
                    *config = fresh;
                    true
                }
                None => false,
            })
        };
        let dropped = self.engine.cache().clear();

        match reloaded {
            Ok(changed) => {
                tracing::info!(changed, dropped, "random teleport config reloaded");
                Ok(changed)
            }
            Err(err) => {
                tracing::warn!(%err, dropped, "config reload failed, keeping current settings");
                Err(err)
            }
        }
    }

    pub fn per_world(&self) -> bool {
        self.read().teleport.per_world
    }

    pub fn set_per_world(&self, per_world: bool) -> Result<(), ConfigError> {
        self.update(|c| c.teleport.per_world = per_world)
    }

    /// The search center for `world`.
    ///
    /// Without a usable configured center, falls back to the world border
    /// center of the requested world (per-world mode) or the default world,
    /// standing on its highest block, and persists that center. Returns
    /// `None` only when the oracle knows no worlds at all.
    pub async fn center(&self, world: Option<&WorldId>) -> Option<Location> {
        let configured = self
            .read()
            .teleport
            .scope(world.map(WorldId::name))
            .and_then(|scope| scope.center.clone());

        if let Some(center) = configured {
            let id = WorldId::new(&center.world);
            if self.engine.oracle().world(&id).is_some() {
                return Some(Location {
                    world: id,
                    x: center.x,
                    y: center.y,
                    z: center.z,
                    yaw: center.yaw,
                    pitch: center.pitch,
                });
            }
            tracing::warn!(world = %center.world, "configured center world not found");
        }

        let center = self.default_center(world).await?;
        if let Err(err) = self.set_center(world, &center) {
            tracing::warn!(%err, "failed to persist computed center");
        }
        Some(center)
    }

    async fn default_center(&self, world: Option<&WorldId>) -> Option<Location> {
        let oracle = self.engine.oracle();
        let target = match world {
            Some(id) if self.per_world() => oracle.world(id),
            _ => None,
        }
        .or_else(|| oracle.default_world())?;

        let strategy = ElevationStrategy::Surface {
            ground_offset: self.elevation_settings().ground_offset,
        };
        let (x, z) = (target.border.center_x, target.border.center_z);
        let column = resolve_column(&**oracle, &target.id, strategy, x, z).await;
        tracing::info!(world = %target.id, x, y = column.elevation, z, "computed default center");
        Some(Location::new(target.id, x, column.elevation, z))
    }

    pub fn set_center(
        &self,
        world: Option<&WorldId>,
        center: &Location,
    ) -> Result<(), ConfigError> {
        let stored = CenterConfig {
            world: center.world.name().to_string(),
            x: center.x,
            y: center.y,
            z: center.z,
            yaw: center.yaw,
            pitch: center.pitch,
        };
        self.update(|c| c.teleport.scope_mut(world.map(WorldId::name)).center = Some(stored))
    }

    /// Inner radius for `world` (0 when unset).
    pub fn min_range(&self, world: Option<&WorldId>) -> f64 {
        self.read()
            .teleport
            .scope(world.map(WorldId::name))
            .and_then(|scope| scope.min_range)
            .unwrap_or(0.0)
    }

    pub fn set_min_range(
        &self,
        world: Option<&WorldId>,
        min_range: f64,
    ) -> Result<(), ConfigError> {
        self.update(|c| {
            c.teleport.scope_mut(world.map(WorldId::name)).min_range = Some(min_range);
        })
    }

    /// Outer radius for `world`; half the border size of the center's world
    /// when unset.
    pub async fn max_range(&self, world: Option<&WorldId>) -> f64 {
        let configured = self
            .read()
            .teleport
            .scope(world.map(WorldId::name))
            .and_then(|scope| scope.max_range);
        if let Some(max_range) = configured {
            return max_range;
        }

        let Some(center) = self.center(world).await else {
            return 0.0;
        };
        self.engine
            .oracle()
            .world(&center.world)
            .map_or(0.0, |info| info.border.size / 2.0)
    }

    pub fn set_max_range(
        &self,
        world: Option<&WorldId>,
        max_range: f64,
    ) -> Result<(), ConfigError> {
        self.update(|c| {
            c.teleport.scope_mut(world.map(WorldId::name)).max_range = Some(max_range);
        })
    }

    /// Configured excluded biomes; unknown names are ignored.
    pub fn excluded_biomes(&self) -> HashSet<Biome> {
        parse_biome_set(&self.read().teleport.excluded_biomes)
    }

    pub fn find_attempts(&self) -> u32 {
        self.read().teleport.find_attempts
    }

    pub fn cache_threshold(&self) -> u32 {
        self.read().teleport.cache_threshold
    }

    pub fn pre_cache(&self) -> bool {
        self.read().teleport.pre_cache
    }

    fn elevation_settings(&self) -> ElevationSettings {
        let config = self.read();
        let terrain = &config.terrain;
        ElevationSettings {
            ground_offset: i64::from(terrain.ground_offset),
            enclosed_floor: i64::from(terrain.enclosed_floor),
        }
    }

    /// Read-only settings for one operation.
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            find_attempts: self.find_attempts(),
            cache_threshold: self.cache_threshold(),
            validator: Arc::new(Validator::new(self.excluded_biomes())),
            elevation: self.elevation_settings(),
        }
    }

    /// A random safe location around `center`; never fails.
    pub async fn get_random_location(
        &self,
        center: &Location,
        min_range: f64,
        max_range: f64,
    ) -> Location {
        let settings = self.search_settings();
        self.engine
            .request(center, min_range, max_range, &settings)
            .await
    }

    /// Prefetch a batch of locations for `(center, min_range, max_range)`.
    /// Returns `false` if no async runtime was available to run it.
    pub fn cache_random_locations(
        &self,
        center: &Location,
        min_range: f64,
        max_range: f64,
    ) -> bool {
        let settings = self.search_settings();
        self.engine
            .cache_random_locations(center, min_range, max_range, &settings)
    }

    /// When pre-caching is enabled, prefetch for the global scope, or for
    /// every world in per-world mode. Returns the number of scopes prefetched.
    pub async fn pre_cache_all(&self) -> usize {
        if !self.pre_cache() {
            return 0;
        }

        let scopes: Vec<Option<WorldId>> = if self.per_world() {
            self.engine
                .oracle()
                .worlds()
                .into_iter()
                .map(|info| Some(info.id))
                .collect()
        } else {
            vec![None]
        };

        let mut prefetched = 0;
        for scope in &scopes {
            let Some(center) = self.center(scope.as_ref()).await else {
                continue;
            };
            let min_range = self.min_range(scope.as_ref());
            let max_range = self.max_range(scope.as_ref()).await;
            if self.cache_random_locations(&center, min_range, max_range) {
                prefetched += 1;
            }
        }
        tracing::info!(scopes = prefetched, "pre-cached random locations");
        prefetched
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wayfarer_config::CONFIG_FILE_NAME;

    use super::*;
    use crate::CacheKey;
    use crate::test_oracle::{ScriptedOracle, WORLD};

    type Fixture = (RandomTeleport<ScriptedOracle>, tempfile::TempDir);

    fn service(oracle: ScriptedOracle, config: Config) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let service = RandomTeleport::with_config(
            Arc::new(oracle),
            CandidateGenerator::seeded(17),
            config,
            dir.path(),
        );
        (service, dir)
    }

    fn world() -> WorldId {
        WorldId::new(WORLD)
    }

    #[tokio::test]
    async fn test_default_center_from_world_border() {
        let (service, dir) = service(ScriptedOracle::flat(69), Config::default());

        let center = service.center(None).await.unwrap();

        assert_eq!(center.world, world());
        assert_eq!((center.x, center.y, center.z), (8.0, 70.0, -8.0));
        // Persisted back to the config file.
        let saved = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(saved.teleport.global.center.unwrap().y, 70.0);
    }

    #[tokio::test]
    async fn test_configured_center_used() {
        let mut config = Config::default();
        config.teleport.global.center = Some(CenterConfig {
            world: WORLD.to_string(),
            x: 100.0,
            y: 80.0,
            z: 200.0,
            yaw: 90.0,
            pitch: 0.0,
        });
        let (service, _dir) = service(ScriptedOracle::flat(69), config);

        let center = service.center(Some(&world())).await.unwrap();
        assert_eq!((center.x, center.y, center.z, center.yaw), (100.0, 80.0, 200.0, 90.0));
    }

    #[tokio::test]
    async fn test_unknown_center_world_recomputed() {
        let mut config = Config::default();
        config.teleport.global.center = Some(CenterConfig {
            world: "deleted_world".to_string(),
            x: 1.0,
            y: 2.0,
            z: 3.0,
            yaw: 0.0,
            pitch: 0.0,
        });
        let (service, _dir) = service(ScriptedOracle::flat(69), config);

        let center = service.center(None).await.unwrap();
        assert_eq!(center.world, world());
        assert_eq!(service.config().teleport.global.center.unwrap().world, WORLD);
    }

    #[tokio::test]
    async fn test_ranges_default_and_setters() {
        let (service, dir) = service(ScriptedOracle::flat(69), Config::default());

        assert_eq!(service.min_range(None), 0.0);
        assert_eq!(service.max_range(None).await, 1000.0);

        service.set_min_range(None, 25.0).unwrap();
        service.set_max_range(None, 400.0).unwrap();
        assert_eq!(service.min_range(None), 25.0);
        assert_eq!(service.max_range(None).await, 400.0);

        let saved = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(saved.teleport.global.min_range, Some(25.0));
        assert_eq!(saved.teleport.global.max_range, Some(400.0));
    }

    #[tokio::test]
    async fn test_per_world_ranges_do_not_inherit_global() {
        let mut config = Config::default();
        config.teleport.global.min_range = Some(50.0);
        let (service, _dir) = service(ScriptedOracle::flat(69), config);

        service.set_per_world(true).unwrap();
        assert_eq!(service.min_range(Some(&world())), 0.0);

        service.set_min_range(Some(&world()), 5.0).unwrap();
        assert_eq!(service.min_range(Some(&world())), 5.0);
        assert_eq!(service.min_range(None), 50.0);
    }

    #[test]
    fn test_excluded_biomes_skip_malformed() {
        let mut config = Config::default();
        config.teleport.excluded_biomes = vec!["ocean".into(), "lava_lake".into(), "Desert".into()];
        let (service, _dir) = service(ScriptedOracle::flat(69), config);

        let excluded = service.excluded_biomes();
        assert_eq!(excluded.len(), 2);
        assert!(excluded.contains(&Biome::Desert));
    }

    #[tokio::test]
    async fn test_reload_clears_cache() {
        let (service, dir) = service(ScriptedOracle::flat(69), Config::default());
        service.config().save(dir.path()).unwrap();
        let key = CacheKey::new(world(), 0.0, 10.0);
        service
            .engine()
            .cache()
            .put(&key, Location::new(world(), 1.0, 70.0, 1.0));

        assert!(!service.reload().unwrap());
        assert_eq!(service.engine().cache().take(&key), None);
    }

    #[tokio::test]
    async fn test_reload_picks_up_file_changes() {
        let (service, dir) = service(ScriptedOracle::flat(69), Config::default());
        let mut edited = Config::default();
        edited.teleport.find_attempts = 3;
        edited.save(dir.path()).unwrap();

        assert!(service.reload().unwrap());
        assert_eq!(service.find_attempts(), 3);
    }

    #[tokio::test]
    async fn test_reload_error_keeps_config() {
        let (service, dir) = service(ScriptedOracle::flat(69), Config::default());
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "((").unwrap();

        assert!(service.reload().is_err());
        assert_eq!(service.find_attempts(), 10);
    }

    #[tokio::test]
    async fn test_failed_reload_still_clears_cache() {
        let (service, dir) = service(ScriptedOracle::flat(69), Config::default());
        let key = CacheKey::new(world(), 0.0, 10.0);
        service
            .engine()
            .cache()
            .put(&key, Location::new(world(), 1.0, 70.0, 1.0));
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "((").unwrap();

        assert!(service.reload().is_err());
        assert_eq!(service.engine().cache().depth(&key), 0);
    }

    #[test]
    fn test_reload_racing_setters_keeps_memory_and_file_in_sync() {
        let (service, dir) = service(ScriptedOracle::flat(69), Config::default());
        service.config().save(dir.path()).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    service.set_min_range(None, f64::from(i)).unwrap();
                }
            });
            s.spawn(|| {
                for _ in 0..200 {
                    service.reload().unwrap();
                }
            });
        });

        let on_disk = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(service.config(), on_disk);
        assert_eq!(service.min_range(None), 199.0);
    }

    #[tokio::test]
    async fn test_get_random_location_uses_terrain_offset() {
        let mut config = Config::default();
        config.teleport.cache_threshold = 0;
        let (service, _dir) = service(ScriptedOracle::flat(69), config);
        let center = service.center(None).await.unwrap();

        let location = service.get_random_location(&center, 10.0, 50.0).await;
        assert_eq!(location.y, 70.0);
        assert_ne!((location.x, location.z), (center.x, center.z));
    }

    #[tokio::test]
    async fn test_pre_cache_disabled_does_nothing() {
        let (service, _dir) = service(ScriptedOracle::flat(69), Config::default());
        assert_eq!(service.pre_cache_all().await, 0);
        assert_eq!(service.engine().cache().key_count(), 0);
    }

    #[tokio::test]
    async fn test_pre_cache_fills_global_scope() {
        let mut config = Config::default();
        config.teleport.pre_cache = true;
        config.teleport.find_attempts = 4;
        config.teleport.global.max_range = Some(300.0);
        let (service, _dir) = service(ScriptedOracle::flat(69), config);

        assert_eq!(service.pre_cache_all().await, 1);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let key = CacheKey::new(world(), 0.0, 300.0);
        assert_eq!(service.engine().cache().depth(&key), 4);
    }
}
