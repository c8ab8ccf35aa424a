//! Scripted terrain for unit tests.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use wayfarer_world::{Biome, Environment, TerrainOracle, WorldBorder, WorldId, WorldInfo};

pub(crate) const WORLD: &str = "world";

/// Every column has the same height and biome; counts chunk loads.
pub(crate) struct ScriptedOracle {
    highest: AtomicI64,
    biome: Biome,
    stall: bool,
    loads: AtomicUsize,
}

impl ScriptedOracle {
    pub(crate) fn flat(highest: i64) -> Self {
        Self {
            highest: AtomicI64::new(highest),
            biome: Biome::Plains,
            stall: false,
            loads: AtomicUsize::new(0),
        }
    }

    /// Chunk loads never complete.
    pub(crate) fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::flat(70)
        }
    }

    pub(crate) fn with_biome(mut self, biome: Biome) -> Self {
        self.biome = biome;
        self
    }

    pub(crate) fn set_highest(&self, highest: i64) {
        self.highest.store(highest, Ordering::SeqCst);
    }

    pub(crate) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl TerrainOracle for ScriptedOracle {
    fn worlds(&self) -> Vec<WorldInfo> {
        vec![WorldInfo {
            id: WorldId::new(WORLD),
            environment: Environment::Standard,
            max_height: 256,
            border: WorldBorder {
                center_x: 8.0,
                center_z: -8.0,
                size: 2000.0,
            },
        }]
    }

    async fn load_chunk(&self, _world: &WorldId, _x: i64, _z: i64) {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.stall {
            std::future::pending::<()>().await;
        }
    }

    fn highest_block_y(&self, _world: &WorldId, _x: i64, _z: i64) -> i64 {
        self.highest.load(Ordering::SeqCst)
    }

    fn is_block_unsafe(&self, _world: &WorldId, _x: i64, _y: i64, _z: i64) -> bool {
        false
    }

    fn biome_at(&self, _world: &WorldId, _x: i64, _z: i64) -> Biome {
        self.biome
    }
}
