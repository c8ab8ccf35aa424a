//! Candidate offsets sampled with the rotated-rectangle method.
//!
//! A point is drawn uniformly from the rectangle
//! `[min, max) × [-min, max)` and rotated by a random quarter turn about the
//! center. The four rotated copies tile a square ring whose inner half-width
//! is `min` and outer half-width is `max`, so the result is uniform over that
//! square ring rather than over a circular annulus.

use std::sync::{Mutex, PoisonError};

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wayfarer_world::{Location, WorldId};

/// Quarter-turn applied to a rectangle sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// `(x, z)`
    Zero,
    /// `(-z, x)`
    Quarter,
    /// `(-x, -z)`
    Half,
    /// `(z, -x)`
    ThreeQuarter,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Zero,
        Rotation::Quarter,
        Rotation::Half,
        Rotation::ThreeQuarter,
    ];

    /// Map a rectangle point to an offset.
    pub fn apply(self, rect_x: f64, rect_z: f64) -> (f64, f64) {
        match self {
            Self::Zero => (rect_x, rect_z),
            Self::Quarter => (-rect_z, rect_x),
            Self::Half => (-rect_x, -rect_z),
            Self::ThreeQuarter => (rect_z, -rect_x),
        }
    }

    /// Map an offset back to its rectangle point.
    pub fn invert(self, offset_x: f64, offset_z: f64) -> (f64, f64) {
        match self {
            Self::Zero => (offset_x, offset_z),
            Self::Quarter => (offset_z, -offset_x),
            Self::Half => (-offset_x, -offset_z),
            Self::ThreeQuarter => (-offset_z, offset_x),
        }
    }
}

/// One horizontal offset together with the sample it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    pub rect_x: f64,
    pub rect_z: f64,
    pub rotation: Rotation,
    pub x: f64,
    pub z: f64,
}

/// A horizontal position whose elevation is not known yet.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub world: WorldId,
    pub x: f64,
    pub z: f64,
    pub yaw: f32,
}

impl Candidate {
    /// Attach a resolved elevation, producing a location with pitch 0.
    pub fn resolve(self, elevation: f64) -> Location {
        Location {
            world: self.world,
            x: self.x,
            y: elevation,
            z: self.z,
            yaw: self.yaw,
            pitch: 0.0,
        }
    }
}

/// Thread-safe candidate sampler over an injected random source.
pub struct CandidateGenerator {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl CandidateGenerator {
    /// Sample with the given random source.
    pub fn new(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Deterministic sampler for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Sampler seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Draw an offset in the square ring between `min_range` and `max_range`.
    ///
    /// `min_range > max_range` yields a degenerate sample rather than a panic.
    pub fn offset(&self, min_range: f64, max_range: f64) -> Offset {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let rect_x = rng.random::<f64>() * (max_range - min_range) + min_range;
        let rect_z = rng.random::<f64>() * (max_range + min_range) - min_range;
        let rotation = Rotation::ALL[rng.random_range(0..Rotation::ALL.len())];
        let (x, z) = rotation.apply(rect_x, rect_z);
        Offset {
            rect_x,
            rect_z,
            rotation,
            x,
            z,
        }
    }

    /// Draw a candidate around `center` with a random yaw in `[-180, 180)`.
    pub fn candidate(&self, center: &Location, min_range: f64, max_range: f64) -> Candidate {
        let offset = self.offset(min_range, max_range);
        let yaw = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            360.0 * rng.random::<f32>() - 180.0
        };
        Candidate {
            world: center.world.clone(),
            x: center.x + offset.x,
            z: center.z + offset.z,
            yaw,
        }
    }
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
