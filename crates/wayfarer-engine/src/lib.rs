//! Random safe-location discovery with a per-key prefetch cache.
//!
//! Candidates are sampled around a center with the rotated-rectangle
//! method, resolved through an asynchronous [`TerrainOracle`], and filtered
//! by elevation and excluded biomes. Validated locations are queued per
//! [`CacheKey`] and replenished in the background whenever a queue runs low.
//!
//! [`TerrainOracle`]: wayfarer_world::TerrainOracle

mod cache;
mod generator;
mod probe;
mod refill;
mod search;
mod service;
mod validator;

#[cfg(test)]
mod test_oracle;

pub use cache::{CacheEntry, CacheKey, LocationCache};
pub use generator::{Candidate, CandidateGenerator, Offset, Rotation};
pub use probe::Prober;
pub use refill::RefillController;
pub use search::{SearchEngine, SearchRequest, SearchSettings};
pub use service::RandomTeleport;
pub use validator::Validator;
