//! One candidate round: sample, resolve terrain, validate.

use std::sync::Arc;

use wayfarer_world::{
    ElevationSettings, ElevationStrategy, Location, TerrainOracle, resolve_column,
};

use crate::{CandidateGenerator, Validator};

/// Runs single generate → resolve → validate rounds against an oracle.
///
/// Shared by the retry search and by refill tasks.
pub struct Prober<O> {
    oracle: Arc<O>,
    generator: CandidateGenerator,
}

impl<O: TerrainOracle> Prober<O> {
    pub fn new(oracle: Arc<O>, generator: CandidateGenerator) -> Self {
        Self { oracle, generator }
    }

    pub fn oracle(&self) -> &Arc<O> {
        &self.oracle
    }

    /// Produce one validated location, or `None` if the candidate was rejected.
    ///
    /// A center in a world unknown to the oracle never yields a location.
    pub async fn probe(
        &self,
        center: &Location,
        min_range: f64,
        max_range: f64,
        validator: &Validator,
        elevation: &ElevationSettings,
    ) -> Option<Location> {
        let Some(world) = self.oracle.world(&center.world) else {
            tracing::debug!(world = %center.world, "center world unknown to terrain oracle");
            return None;
        };
        let candidate = self.generator.candidate(center, min_range, max_range);
        let strategy = ElevationStrategy::for_world(&world, elevation);
        let column =
            resolve_column(&*self.oracle, &world.id, strategy, candidate.x, candidate.z).await;
        let location = candidate.resolve(column.elevation);

        if validator.is_valid(&location, column.biome) {
            Some(location)
        } else {
            tracing::trace!(
                x = location.x,
                y = location.y,
                z = location.z,
                biome = %column.biome,
                "candidate rejected"
            );
            None
        }
    }
}
