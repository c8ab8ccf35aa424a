//! Biome classification of world columns, with name-based lookup.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Categorical terrain/climate classification of a world column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Biome {
    Plains,
    Forest,
    BirchForest,
    DarkForest,
    Taiga,
    SnowyPlains,
    SnowyTaiga,
    Desert,
    Savanna,
    Jungle,
    Swamp,
    Badlands,
    WindsweptHills,
    Beach,
    River,
    FrozenRiver,
    Ocean,
    DeepOcean,
    ColdOcean,
    DeepColdOcean,
    FrozenOcean,
    DeepFrozenOcean,
    LukewarmOcean,
    DeepLukewarmOcean,
    WarmOcean,
    DeepWarmOcean,
    NetherWastes,
    SoulSandValley,
    CrimsonForest,
    WarpedForest,
    BasaltDeltas,
}

/// Error returned when a biome name does not match any known biome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown biome: {0}")]
pub struct UnknownBiome(pub String);

const NAMES: &[(Biome, &str)] = &[
    (Biome::Plains, "plains"),
    (Biome::Forest, "forest"),
    (Biome::BirchForest, "birch_forest"),
    (Biome::DarkForest, "dark_forest"),
    (Biome::Taiga, "taiga"),
    (Biome::SnowyPlains, "snowy_plains"),
    (Biome::SnowyTaiga, "snowy_taiga"),
    (Biome::Desert, "desert"),
    (Biome::Savanna, "savanna"),
    (Biome::Jungle, "jungle"),
    (Biome::Swamp, "swamp"),
    (Biome::Badlands, "badlands"),
    (Biome::WindsweptHills, "windswept_hills"),
    (Biome::Beach, "beach"),
    (Biome::River, "river"),
    (Biome::FrozenRiver, "frozen_river"),
    (Biome::Ocean, "ocean"),
    (Biome::DeepOcean, "deep_ocean"),
    (Biome::ColdOcean, "cold_ocean"),
    (Biome::DeepColdOcean, "deep_cold_ocean"),
    (Biome::FrozenOcean, "frozen_ocean"),
    (Biome::DeepFrozenOcean, "deep_frozen_ocean"),
    (Biome::LukewarmOcean, "lukewarm_ocean"),
    (Biome::DeepLukewarmOcean, "deep_lukewarm_ocean"),
    (Biome::WarmOcean, "warm_ocean"),
    (Biome::DeepWarmOcean, "deep_warm_ocean"),
    (Biome::NetherWastes, "nether_wastes"),
    (Biome::SoulSandValley, "soul_sand_valley"),
    (Biome::CrimsonForest, "crimson_forest"),
    (Biome::WarpedForest, "warped_forest"),
    (Biome::BasaltDeltas, "basalt_deltas"),
];

impl Biome {
    /// Every known biome.
    pub fn all() -> impl Iterator<Item = Biome> {
        NAMES.iter().map(|(biome, _)| *biome)
    }

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(biome, _)| *biome == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }

    /// Returns `true` for ocean and river biomes.
    pub fn is_aquatic(self) -> bool {
        let name = self.name();
        name.ends_with("ocean") || name.ends_with("river")
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Biome {
    type Err = UnknownBiome;

    /// Case-insensitive; accepts an optional `minecraft:` namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let key = trimmed
            .strip_prefix("minecraft:")
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        NAMES
            .iter()
            .find(|(_, name)| *name == key)
            .map(|(biome, _)| *biome)
            .ok_or_else(|| UnknownBiome(s.to_string()))
    }
}

/// Parse a list of biome names into a set, skipping names that do not parse.
pub fn parse_biome_set<S: AsRef<str>>(names: &[S]) -> HashSet<Biome> {
    names
        .iter()
        .filter_map(|name| match name.as_ref().parse::<Biome>() {
            Ok(biome) => Some(biome),
            Err(err) => {
                tracing::debug!(%err, "ignoring excluded biome entry");
                None
            }
        })
        .collect()
}
