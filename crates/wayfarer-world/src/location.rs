//! World identity and positioned locations.

use std::fmt;
use std::sync::Arc;

/// Identity of a world, compared by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(Arc<str>);

impl WorldId {
    /// Create a world identity from its name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The world's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorldId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A fully resolved position and facing inside a world.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub world: WorldId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Horizontal facing in degrees, `[-180, 180)`.
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    /// Create a location facing yaw 0, pitch 0.
    pub fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Integer block X containing this location.
    pub fn block_x(&self) -> i64 {
        block_coord(self.x)
    }

    /// Integer block Y containing this location.
    pub fn block_y(&self) -> i64 {
        block_coord(self.y)
    }

    /// Integer block Z containing this location.
    pub fn block_z(&self) -> i64 {
        block_coord(self.z)
    }

    /// Horizontal distance to another point, ignoring the world.
    pub fn horizontal_distance(&self, x: f64, z: f64) -> f64 {
        (self.x - x).hypot(self.z - z)
    }
}

/// Block coordinate containing a continuous coordinate (floor toward negative infinity).
#[inline]
pub fn block_coord(v: f64) -> i64 {
    v.floor() as i64
}
