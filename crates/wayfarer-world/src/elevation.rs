//! Environment-specific elevation strategies and column resolution.

use crate::{Biome, Environment, TerrainOracle, WorldId, WorldInfo, block_coord};

/// Elevation reported when a column has no safe standing height.
pub const NO_SAFE_ELEVATION: f64 = -1.0;

/// Deployment constants used to build an [`ElevationStrategy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElevationSettings {
    /// Added to the highest block in standard worlds. 1 when the oracle's
    /// highest block is the top surface block itself, 0 otherwise.
    pub ground_offset: i64,
    /// First Y scanned in enclosed worlds.
    pub enclosed_floor: i64,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            ground_offset: 1,
            enclosed_floor: 32,
        }
    }
}

/// How the standing height of a column is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElevationStrategy {
    /// Highest block plus a fixed offset.
    Surface { ground_offset: i64 },
    /// First safe Y in `[floor, ceiling)`, or [`NO_SAFE_ELEVATION`].
    Enclosed { floor: i64, ceiling: i64 },
}

impl ElevationStrategy {
    /// Pick the strategy for a world's environment.
    pub fn for_world(world: &WorldInfo, settings: &ElevationSettings) -> Self {
        match world.environment {
            Environment::Standard => Self::Surface {
                ground_offset: settings.ground_offset,
            },
            Environment::Enclosed => Self::Enclosed {
                floor: settings.enclosed_floor,
                ceiling: world.max_height / 2,
            },
        }
    }

    /// Standing height of a loaded column.
    pub fn elevation<O>(&self, oracle: &O, world: &WorldId, x: i64, z: i64) -> f64
    where
        O: TerrainOracle + ?Sized,
    {
        match *self {
            Self::Surface { ground_offset } => {
                (oracle.highest_block_y(world, x, z) + ground_offset) as f64
            }
            Self::Enclosed { floor, ceiling } => (floor..ceiling)
                .find(|&y| !oracle.is_block_unsafe(world, x, y, z))
                .map_or(NO_SAFE_ELEVATION, |y| y as f64),
        }
    }
}

/// Elevation and biome of one world column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnInfo {
    pub elevation: f64,
    pub biome: Biome,
}

/// Load the column containing `(x, z)` and resolve it with `strategy`.
pub async fn resolve_column<O>(
    oracle: &O,
    world: &WorldId,
    strategy: ElevationStrategy,
    x: f64,
    z: f64,
) -> ColumnInfo
where
    O: TerrainOracle + ?Sized,
{
    let (bx, bz) = (block_coord(x), block_coord(z));
    oracle.load_chunk(world, bx, bz).await;
    ColumnInfo {
        elevation: strategy.elevation(oracle, world, bx, bz),
        biome: oracle.biome_at(world, bx, bz),
    }
}
