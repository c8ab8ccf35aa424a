//! Procedural terrain oracle backed by simplex noise.
//!
//! Stands in for real world storage: standard worlds get an fBm surface with
//! oceans, beaches, rivers and a temperature/moisture biome table; enclosed
//! worlds get 3D noise caverns over a lava sea. Chunk loads are simulated with
//! a configurable async delay.

use std::time::Duration;

use noise::{NoiseFn, Simplex};

use crate::{
    Biome, Environment, HeightmapParams, HeightmapSampler, TerrainOracle, WorldBorder, WorldId,
    WorldInfo,
};

/// Sea level of standard worlds.
const SEA_LEVEL: i64 = 62;
/// Open caverns at or below this height are filled with lava.
const LAVA_LEVEL: i64 = 31;
/// Oceans deeper than this below sea level become deep oceans.
const DEEP_OCEAN_DEPTH: i64 = 15;
/// Land this far above sea level becomes windswept hills.
const HILLS_HEIGHT: i64 = 50;
const RIVER_WIDTH: f64 = 0.02;
const CAVERN_THRESHOLD: f64 = 0.15;

/// `(temp_min, temp_max, moisture_min, moisture_max, biome)`; first match wins.
const LAND_BIOMES: &[(f64, f64, f64, f64, Biome)] = &[
    (0.00, 0.25, 0.00, 0.50, Biome::SnowyPlains),
    (0.00, 0.25, 0.50, 1.01, Biome::SnowyTaiga),
    (0.25, 0.45, 0.00, 0.50, Biome::Taiga),
    (0.25, 0.45, 0.50, 1.01, Biome::BirchForest),
    (0.45, 0.65, 0.00, 0.35, Biome::Plains),
    (0.45, 0.65, 0.35, 0.70, Biome::Forest),
    (0.45, 0.65, 0.70, 1.01, Biome::Swamp),
    (0.65, 0.80, 0.00, 0.40, Biome::Savanna),
    (0.65, 0.80, 0.40, 1.01, Biome::DarkForest),
    (0.80, 1.01, 0.00, 0.30, Biome::Desert),
    (0.80, 1.01, 0.30, 0.55, Biome::Badlands),
    (0.80, 1.01, 0.55, 1.01, Biome::Jungle),
];

const ENCLOSED_BIOMES: [Biome; 5] = [
    Biome::NetherWastes,
    Biome::SoulSandValley,
    Biome::CrimsonForest,
    Biome::WarpedForest,
    Biome::BasaltDeltas,
];

/// What the surface of a standard-world column is made of.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Surface {
    top: i64,
    biome: Biome,
}

/// Noise-driven [`TerrainOracle`].
pub struct NoiseTerrain {
    worlds: Vec<WorldInfo>,
    relief: HeightmapSampler,
    temperature: Simplex,
    moisture: Simplex,
    rivers: Simplex,
    caverns: Simplex,
    latency: Duration,
}

impl NoiseTerrain {
    /// Create terrain for `seed` with a standard `world` and an enclosed
    /// `world_nether`, both 256 blocks tall with a 20 000 block border.
    pub fn new(seed: u64) -> Self {
        let border = WorldBorder {
            center_x: 0.0,
            center_z: 0.0,
            size: 20_000.0,
        };
        Self {
            worlds: vec![
                WorldInfo {
                    id: WorldId::new("world"),
                    environment: Environment::Standard,
                    max_height: 256,
                    border,
                },
                WorldInfo {
                    id: WorldId::new("world_nether"),
                    environment: Environment::Enclosed,
                    max_height: 256,
                    border,
                },
            ],
            relief: HeightmapSampler::new(HeightmapParams {
                seed,
                ..Default::default()
            }),
            temperature: Simplex::new(seed.wrapping_add(1) as u32),
            moisture: Simplex::new(seed.wrapping_add(0xDEAD_BEEF) as u32),
            rivers: Simplex::new(seed.wrapping_add(2) as u32),
            caverns: Simplex::new(seed.wrapping_add(3) as u32),
            latency: Duration::ZERO,
        }
    }

    /// Delay every chunk load by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add a world, replacing any existing world with the same id.
    pub fn with_world(mut self, info: WorldInfo) -> Self {
        self.worlds.retain(|w| w.id != info.id);
        self.worlds.push(info);
        self
    }

    fn environment(&self, world: &WorldId) -> Option<(Environment, i64)> {
        self.worlds
            .iter()
            .find(|w| &w.id == world)
            .map(|w| (w.environment, w.max_height))
    }

    fn climate(&self, x: i64, z: i64) -> (f64, f64) {
        let (fx, fz) = (x as f64, z as f64);
        let t = self.temperature.get([fx * 0.0015, fz * 0.0015]);
        let m = self.moisture.get([fx * 0.002, fz * 0.002]);
        (
            ((t + 1.0) * 0.5).clamp(0.0, 1.0),
            ((m + 1.0) * 0.5).clamp(0.0, 1.0),
        )
    }

    fn surface(&self, x: i64, z: i64, max_height: i64) -> Surface {
        let ground = (SEA_LEVEL + self.relief.sample(x as f64, z as f64).round() as i64)
            .clamp(1, max_height - 1);
        let (temperature, moisture) = self.climate(x, z);

        if ground < SEA_LEVEL {
            let deep = ground < SEA_LEVEL - DEEP_OCEAN_DEPTH;
            return Surface {
                top: SEA_LEVEL,
                biome: ocean_biome(temperature, deep),
            };
        }

        let river = self.rivers.get([x as f64 * 0.003, z as f64 * 0.003]);
        if river.abs() < RIVER_WIDTH && ground < SEA_LEVEL + HILLS_HEIGHT / 4 {
            let biome = if temperature < 0.25 {
                Biome::FrozenRiver
            } else {
                Biome::River
            };
            return Surface {
                top: SEA_LEVEL,
                biome,
            };
        }

        let biome = if ground <= SEA_LEVEL + 1 {
            Biome::Beach
        } else if ground > SEA_LEVEL + HILLS_HEIGHT {
            Biome::WindsweptHills
        } else {
            LAND_BIOMES
                .iter()
                .find(|(t0, t1, m0, m1, _)| {
                    (*t0..*t1).contains(&temperature) && (*m0..*m1).contains(&moisture)
                })
                .map_or(Biome::Plains, |region| region.4)
        };
        Surface { top: ground, biome }
    }

    fn cavern_solid(&self, x: i64, y: i64, z: i64, max_height: i64) -> bool {
        if y <= 0 || y >= max_height - 1 {
            return true;
        }
        let n = self
            .caverns
            .get([x as f64 * 0.03, y as f64 * 0.06, z as f64 * 0.03]);
        n > CAVERN_THRESHOLD
    }
}

fn ocean_biome(temperature: f64, deep: bool) -> Biome {
    match (temperature, deep) {
        (t, false) if t < 0.2 => Biome::FrozenOcean,
        (t, true) if t < 0.2 => Biome::DeepFrozenOcean,
        (t, false) if t < 0.4 => Biome::ColdOcean,
        (t, true) if t < 0.4 => Biome::DeepColdOcean,
        (t, false) if t < 0.6 => Biome::Ocean,
        (t, true) if t < 0.6 => Biome::DeepOcean,
        (t, false) if t < 0.8 => Biome::LukewarmOcean,
        (t, true) if t < 0.8 => Biome::DeepLukewarmOcean,
        (_, false) => Biome::WarmOcean,
        (_, true) => Biome::DeepWarmOcean,
    }
}

impl TerrainOracle for NoiseTerrain {
    fn worlds(&self) -> Vec<WorldInfo> {
        self.worlds.clone()
    }

    async fn load_chunk(&self, world: &WorldId, x: i64, z: i64) {
        tracing::trace!(%world, chunk_x = x >> 4, chunk_z = z >> 4, "loading chunk");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn highest_block_y(&self, world: &WorldId, x: i64, z: i64) -> i64 {
        match self.environment(world) {
            Some((Environment::Standard, max_height)) => self.surface(x, z, max_height).top,
            Some((Environment::Enclosed, max_height)) => max_height - 1,
            None => 0,
        }
    }

    fn is_block_unsafe(&self, world: &WorldId, x: i64, y: i64, z: i64) -> bool {
        match self.environment(world) {
            Some((Environment::Standard, max_height)) => {
                let surface = self.surface(x, z, max_height);
                surface.biome.is_aquatic() || y != surface.top + 1
            }
            Some((Environment::Enclosed, max_height)) => {
                // Open blocks at or below the lava sea are lava, so a
                // non-solid floor is never safe.
                !self.cavern_solid(x, y - 1, z, max_height)
                    || self.cavern_solid(x, y, z, max_height)
                    || self.cavern_solid(x, y + 1, z, max_height)
            }
            None => true,
        }
    }

    fn biome_at(&self, world: &WorldId, x: i64, z: i64) -> Biome {
        match self.environment(world) {
            Some((Environment::Standard, max_height)) => self.surface(x, z, max_height).biome,
            Some((Environment::Enclosed, _)) => {
                let (temperature, _) = self.climate(x, z);
                let index = ((temperature * ENCLOSED_BIOMES.len() as f64) as usize)
                    .min(ENCLOSED_BIOMES.len() - 1);
                ENCLOSED_BIOMES[index]
            }
            None => Biome::Plains,
        }
    }
}
