//! The terrain oracle: the asynchronous boundary to world storage.

use std::future::Future;

use crate::{Biome, WorldId};

/// How a world's elevation must be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Open sky; the highest solid block is the ground.
    Standard,
    /// Enclosed by a ceiling (nether-like); ground is found by scanning upward.
    Enclosed,
}

/// Square world border centered on `(center_x, center_z)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBorder {
    pub center_x: f64,
    pub center_z: f64,
    /// Side length of the border square.
    pub size: f64,
}

/// Static metadata about a loaded world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldInfo {
    pub id: WorldId,
    pub environment: Environment,
    /// Exclusive upper build limit.
    pub max_height: i64,
    pub border: WorldBorder,
}

/// Read access to world terrain.
///
/// [`TerrainOracle::load_chunk`] is the only suspension point: it completes
/// once the chunk containing the column is resident. The block and biome
/// queries are synchronous and are only meaningful for a loaded column.
pub trait TerrainOracle: Send + Sync + 'static {
    /// All worlds known to the oracle. The first one is the default world.
    fn worlds(&self) -> Vec<WorldInfo>;

    /// Metadata for a single world, or `None` if the world does not exist.
    fn world(&self, id: &WorldId) -> Option<WorldInfo> {
        self.worlds().into_iter().find(|w| &w.id == id)
    }

    /// The world used when nothing else is specified.
    fn default_world(&self) -> Option<WorldInfo> {
        self.worlds().into_iter().next()
    }

    /// Make the chunk containing block column `(x, z)` resident.
    fn load_chunk(&self, world: &WorldId, x: i64, z: i64) -> impl Future<Output = ()> + Send;

    /// Y of the highest non-air block in the column.
    fn highest_block_y(&self, world: &WorldId, x: i64, z: i64) -> i64;

    /// Whether standing with feet at `(x, y, z)` would be unsafe (suffocation,
    /// falling, or damaging ground).
    fn is_block_unsafe(&self, world: &WorldId, x: i64, y: i64, z: i64) -> bool;

    /// Biome of the column.
    fn biome_at(&self, world: &WorldId, x: i64, z: i64) -> Biome;
}
