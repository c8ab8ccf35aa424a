//! The request-facing search: cache first, then a bounded retry loop.

use std::sync::Arc;

use wayfarer_world::{ElevationSettings, Location, TerrainOracle};

use crate::{CacheKey, CandidateGenerator, LocationCache, Prober, RefillController, Validator};

/// Read-only configuration snapshot for one request or refill batch.
#[derive(Clone, Debug)]
pub struct SearchSettings {
    /// Retry rounds per request and probes per refill batch.
    pub find_attempts: u32,
    /// Queue depth below which a refill is scheduled.
    pub cache_threshold: u32,
    pub validator: Arc<Validator>,
    pub elevation: ElevationSettings,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            find_attempts: 10,
            cache_threshold: 10,
            validator: Arc::new(Validator::default()),
            elevation: ElevationSettings::default(),
        }
    }
}

/// State of one uncached search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    pub center: Location,
    pub min_range: f64,
    pub max_range: f64,
    pub attempts_remaining: u32,
}

impl SearchRequest {
    pub fn new(center: Location, min_range: f64, max_range: f64, attempts: u32) -> Self {
        Self {
            center,
            min_range,
            max_range,
            attempts_remaining: attempts,
        }
    }

    /// Consume one attempt. Returns `false` once the budget is spent.
    pub fn next_attempt(&mut self) -> bool {
        if self.attempts_remaining == 0 {
            return false;
        }
        self.attempts_remaining -= 1;
        true
    }
}

/// Serves random locations from the cache, falling back to an on-demand
/// search and finally to the center itself.
pub struct SearchEngine<O> {
    prober: Arc<Prober<O>>,
    cache: Arc<LocationCache>,
    refill: RefillController<O>,
}

impl<O: TerrainOracle> SearchEngine<O> {
    pub fn new(oracle: Arc<O>, generator: CandidateGenerator) -> Self {
        let prober = Arc::new(Prober::new(oracle, generator));
        let cache = Arc::new(LocationCache::new());
        let refill = RefillController::new(Arc::clone(&prober), Arc::clone(&cache));
        Self {
            prober,
            cache,
            refill,
        }
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    pub fn refill(&self) -> &RefillController<O> {
        &self.refill
    }

    pub fn oracle(&self) -> &Arc<O> {
        self.prober.oracle()
    }

    /// A random safe location around `center`, or `center` itself when none
    /// is found within `find_attempts` rounds.
    ///
    /// Schedules a background refill when the queue is low, then serves a
    /// cached location if one is queued. Otherwise probes sequentially.
    pub async fn request(
        &self,
        center: &Location,
        min_range: f64,
        max_range: f64,
        settings: &SearchSettings,
    ) -> Location {
        let key = CacheKey::new(center.world.clone(), min_range, max_range);
        self.refill
            .maybe_refill(&key, center, min_range, max_range, settings);

        if let Some(location) = self.cache.take(&key) {
            tracing::debug!(world = %center.world, "served cached location");
            return location;
        }

        tracing::debug!(world = %center.world, "cache empty, searching on demand");
        let request = SearchRequest::new(
            center.clone(),
            min_range,
            max_range,
            settings.find_attempts,
        );
        self.search(request, settings).await
    }

    /// Probe until one candidate is valid or the attempt budget runs out.
    ///
    /// Attempts run strictly one after another.
    pub async fn search(&self, mut request: SearchRequest, settings: &SearchSettings) -> Location {
        let mut attempt = 0;
        while request.next_attempt() {
            attempt += 1;
            if let Some(location) = self
                .prober
                .probe(
                    &request.center,
                    request.min_range,
                    request.max_range,
                    &settings.validator,
                    &settings.elevation,
                )
                .await
            {
                tracing::debug!(attempt, "found random location");
                return location;
            }
        }

        tracing::debug!(attempts = attempt, "no safe location found, using center");
        request.center
    }

    /// Explicitly prefetch a batch for `(center, min_range, max_range)`,
    /// regardless of the current queue depth. Returns whether the batch was
    /// scheduled.
    pub fn cache_random_locations(
        &self,
        center: &Location,
        min_range: f64,
        max_range: f64,
        settings: &SearchSettings,
    ) -> bool {
        let key = CacheKey::new(center.world.clone(), min_range, max_range);
        let entry = self.cache.queue_for(&key);
        self.refill
            .schedule(entry, center, min_range, max_range, settings)
    }
}
