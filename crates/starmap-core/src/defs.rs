//! Already-parsed galaxy and fleet definitions.
//!
//! On-disk formats are owned elsewhere; these records carry the attribute
//! values the runtime consumes. They deserialize from JSON for tests and tools.

use serde::{Deserialize, Serialize};

use crate::types::FactionId;

/// The whole universe as handed to the bulk loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyDef {
    pub planets: Vec<PlanetDef>,
    pub systems: Vec<SystemDef>,
}

impl GalaxyDef {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Presence seeded by a planet into its system and the neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceDef {
    pub value: f64,
    pub range: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetDef {
    pub name: String,
    /// Present only for real assets.
    pub pos: Option<[f64; 2]>,
    pub class: Option<char>,
    pub faction: Option<FactionId>,
    pub presence: PresenceDef,
    /// Service tags (`land`, `refuel`, `bar`, ...).
    pub services: Vec<String>,
    pub population: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NebulaDef {
    pub density: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpDef {
    /// Name of the destination system.
    pub target: String,
    pub radius: f64,
    /// Explicit position; ignored when `autopos` is set.
    pub pos: Option<[f64; 2]>,
    pub autopos: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemDef {
    pub name: String,
    pub pos: [f64; 2],
    pub radius: f64,
    pub stars: u32,
    pub asteroids: u32,
    pub interference: f64,
    pub nebula: Option<NebulaDef>,
    /// Names of attached planets, in declaration order.
    pub assets: Vec<String>,
    pub jumps: Vec<JumpDef>,
}

/// One ship slot of a fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetPilotSpec {
    pub name: String,
    pub ship: String,
    /// Cruise speed of the ship, used for approach spawns.
    pub speed: f64,
}

/// A fleet definition as drawn from the fleet factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSpec {
    pub name: String,
    pub faction: FactionId,
    /// Presence budget this fleet consumes while alive.
    pub strength: f64,
    pub pilots: Vec<FleetPilotSpec>,
}
