//! Fundamental identifiers and 2-D geometry helpers.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Stable handle of a star system (index into the system store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub usize);

/// Stable handle of a planet or station (index into the planet store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanetId(pub usize);

/// Faction identifier. Negative values mean "no faction".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub i32);

impl FactionId {
    pub const NONE: FactionId = FactionId(-1);

    pub fn is_none(self) -> bool {
        self.0 < 0
    }
}

impl Default for FactionId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for PlanetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Angle of a vector in radians, normalized to `[0, TAU)`.
pub fn heading_of(v: DVec2) -> f64 {
    v.y.atan2(v.x).rem_euclid(std::f64::consts::TAU)
}

/// Unit vector for an angle in radians.
pub fn unit(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Vector from polar coordinates (magnitude, angle).
pub fn polar(magnitude: f64, angle: f64) -> DVec2 {
    unit(angle) * magnitude
}
