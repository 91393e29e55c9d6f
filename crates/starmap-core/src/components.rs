//! ECS components for pilots living in the current system.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in the simulation crate, not here.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::FactionId;

/// Marks the player's ship.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// A non-player pilot spawned from a fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pilot {
    pub name: String,
    pub ship: String,
    pub faction: FactionId,
    /// Name of the fleet the pilot was spawned from.
    pub fleet: String,
}

/// Position in system space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec2);

/// Velocity in system space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec2);

/// Facing in radians, `[0, TAU)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading(pub f64);

/// Hull integrity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hull {
    pub armor: f64,
    pub armor_max: f64,
}

/// Index into the current system's fleet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetMembership {
    pub system_fleet: usize,
}

/// Pilot is finishing a hyperspace jump into the system.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HyperspaceArrival;

/// Pilot starts the visit sitting on a planet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Landed;
