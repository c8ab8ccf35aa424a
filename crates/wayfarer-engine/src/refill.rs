//! Background replenishment of cache queues.

use std::sync::Arc;

use tokio::runtime::Handle;
use wayfarer_world::{Location, TerrainOracle};

use crate::{CacheEntry, CacheKey, LocationCache, Prober, SearchSettings};

/// Schedules fire-and-forget batches of probes that feed a cache entry.
///
/// Overlapping batches for the same key are allowed and may over-fill the
/// queue; every location they add has passed validation.
///
/// Batches run on the Tokio runtime that was current when the controller was
/// built, so scheduling works from any thread. Without such a runtime the
/// runtime current at scheduling time is used, and if there is none the batch
/// is skipped.
pub struct RefillController<O> {
    prober: Arc<Prober<O>>,
    cache: Arc<LocationCache>,
    runtime: Option<Handle>,
}

impl<O: TerrainOracle> RefillController<O> {
    pub fn new(prober: Arc<Prober<O>>, cache: Arc<LocationCache>) -> Self {
        Self::with_runtime(prober, cache, Handle::try_current().ok())
    }

    /// Run batches on `runtime` instead of the runtime current at construction.
    pub fn with_runtime(
        prober: Arc<Prober<O>>,
        cache: Arc<LocationCache>,
        runtime: Option<Handle>,
    ) -> Self {
        Self {
            prober,
            cache,
            runtime,
        }
    }

    /// Schedule a batch if the queue for `key` is below the cache threshold.
    ///
    /// Returns whether a batch was scheduled. Never waits for the batch.
    pub fn maybe_refill(
        &self,
        key: &CacheKey,
        center: &Location,
        min_range: f64,
        max_range: f64,
        settings: &SearchSettings,
    ) -> bool {
        let entry = self.cache.queue_for(key);
        if entry.len() >= settings.cache_threshold as usize {
            return false;
        }
        self.schedule(entry, center, min_range, max_range, settings)
    }

    /// Spawn `find_attempts` independent probes that push into `entry`.
    ///
    /// Rejected candidates are dropped, not retried. Returns `false` when no
    /// runtime is available to run the batch.
    pub fn schedule(
        &self,
        entry: Arc<CacheEntry>,
        center: &Location,
        min_range: f64,
        max_range: f64,
        settings: &SearchSettings,
    ) -> bool {
        let Some(runtime) = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            tracing::warn!(world = %center.world, "no async runtime available, skipping cache refill");
            return false;
        };

        tracing::debug!(
            world = %center.world,
            min_range,
            max_range,
            depth = entry.len(),
            batch = settings.find_attempts,
            "scheduling cache refill"
        );

        for _ in 0..settings.find_attempts {
            let prober = Arc::clone(&self.prober);
            let entry = Arc::clone(&entry);
            let center = center.clone();
            let validator = Arc::clone(&settings.validator);
            let elevation = settings.elevation;

            runtime.spawn(async move {
                if let Some(location) = prober
                    .probe(&center, min_range, max_range, &validator, &elevation)
                    .await
                {
                    entry.push(location);
                }
            });
        }
        true
    }
}
