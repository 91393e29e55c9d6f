//! Runtime snapshot — the state a renderer reads after each tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::FactionId;

/// Background drawn behind the current system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Stars { count: u32 },
    Nebula { density: f64, volatility: f64 },
}

/// A jump point as the renderer needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpPointView {
    pub target: String,
    pub pos: DVec2,
    pub radius: f64,
    pub angle: f64,
    pub sprite: (u32, u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotView {
    pub name: String,
    pub faction: FactionId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub heading: f64,
    pub system_fleet: Option<usize>,
}

/// Complete visible state of the current system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeSnapshot {
    pub system: Option<String>,
    pub background: Option<Background>,
    pub interference_alpha: f64,
    pub jump_points: Vec<JumpPointView>,
    pub pilots: Vec<PilotView>,
    pub system_fleets: usize,
    pub player_armor: Option<f64>,
}
