//! Acceptance rules for resolved candidates.

use std::collections::HashSet;

use wayfarer_world::{Biome, Location, parse_biome_set};

/// Rejects locations without safe ground or inside an excluded biome.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Validator {
    excluded: HashSet<Biome>,
}

impl Validator {
    pub fn new(excluded: HashSet<Biome>) -> Self {
        Self { excluded }
    }

    /// Build from configured biome names; unknown names are skipped.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(parse_biome_set(names))
    }

    pub fn excluded(&self) -> &HashSet<Biome> {
        &self.excluded
    }

    /// `true` when the location stands above block 0 and `biome` is allowed.
    ///
    /// The no-safe-ground sentinel elevation always fails the first check.
    pub fn is_valid(&self, location: &Location, biome: Biome) -> bool {
        location.block_y() > 0 && !self.excluded.contains(&biome)
    }
}
