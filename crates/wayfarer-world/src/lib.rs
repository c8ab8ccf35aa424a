//! World model for random teleportation: locations, biomes, world metadata,
//! and the asynchronous terrain oracle with its elevation strategies.

mod biome;
mod elevation;
mod heightmap;
mod location;
mod noise_terrain;
mod oracle;

pub use biome::{Biome, UnknownBiome, parse_biome_set};
pub use elevation::{
    ColumnInfo, ElevationSettings, ElevationStrategy, NO_SAFE_ELEVATION, resolve_column,
};
pub use heightmap::{HeightmapParams, HeightmapSampler};
pub use location::{Location, WorldId, block_coord};
pub use noise_terrain::NoiseTerrain;
pub use oracle::{Environment, TerrainOracle, WorldBorder, WorldInfo};
