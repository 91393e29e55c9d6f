//! Galaxy records: star systems, jump points, planets and presence rows.
//!
//! Records reference each other only through stable ids; live references
//! are taken at the point of use and never held across store growth.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::PRESENCE_EPSILON;
use crate::defs::FleetSpec;
use crate::enums::{AssetReality, ChainMode, PlanetClass, SysMarker};
use crate::flags::{JumpFlags, PlanetServices, SystemFlags};
use crate::types::{FactionId, PlanetId, SystemId};

/// A planet or station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    /// `None` when the source class was invalid.
    pub class: Option<PlanetClass>,
    pub reality: AssetReality,
    pub pos: DVec2,
    pub faction: FactionId,
    pub presence_amount: f64,
    pub presence_range: i32,
    pub services: PlanetServices,
    pub population: u64,
    /// System the planet is currently attached to.
    pub system: Option<SystemId>,
    pub bribed: bool,
}

impl Planet {
    pub fn new(id: PlanetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class: Some(PlanetClass::A),
            reality: AssetReality::Unreal,
            pos: DVec2::ZERO,
            faction: FactionId::NONE,
            presence_amount: 0.0,
            presence_range: 0,
            services: PlanetServices::empty(),
            population: 0,
            system: None,
            bribed: false,
        }
    }

    pub fn is_real(&self) -> bool {
        self.reality == AssetReality::Real
    }

    pub fn has_service(&self, service: PlanetServices) -> bool {
        self.services.contains(service)
    }
}

/// An edge endpoint owned by a star system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpPoint {
    /// Durable reference to the destination.
    pub target_id: SystemId,
    /// Validated destination, set by jump resolution.
    pub target: Option<SystemId>,
    pub flags: JumpFlags,
    /// Position relative to the owning system's centre.
    pub pos: DVec2,
    /// Arrival-detection radius.
    pub radius: f64,
    /// Heading toward the target system, `[0, TAU)`.
    pub heading: f64,
    /// `TAU - heading`, kept for the renderer.
    pub angle: f64,
    pub cosa: f64,
    pub sina: f64,
    /// Sprite sheet cell `(column, row)` for the heading.
    pub sprite: (u32, u32),
}

impl JumpPoint {
    pub fn new(target_id: SystemId, radius: f64) -> Self {
        Self {
            target_id,
            target: None,
            flags: JumpFlags::empty(),
            pos: DVec2::ZERO,
            radius,
            heading: 0.0,
            angle: 0.0,
            cosa: 1.0,
            sina: 0.0,
            sprite: (0, 0),
        }
    }

    pub fn is_autopos(&self) -> bool {
        self.flags.contains(JumpFlags::AUTOPOS)
    }
}

/// Fleet-spawn timer of one presence row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleState {
    /// Fleet chosen but not yet spawned.
    pub pending: Option<FleetSpec>,
    pub time_remaining: f64,
    pub chain: ChainMode,
    pub penalty: f64,
}

/// One faction's row in a system's presence table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPresence {
    pub faction: FactionId,
    pub value: f64,
    /// Portion of `value` committed to fleets currently in the system.
    pub cur_used: f64,
    pub schedule: ScheduleState,
}

impl SystemPresence {
    pub fn new(faction: FactionId) -> Self {
        Self {
            faction,
            value: 0.0,
            cur_used: 0.0,
            schedule: ScheduleState::default(),
        }
    }

    /// Clear per-visit spawn bookkeeping.
    pub fn reset_schedule(&mut self) {
        self.cur_used = 0.0;
        self.schedule = ScheduleState::default();
    }
}

/// Mission marker counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    pub misc: u32,
    pub rush: u32,
    pub cargo: u32,
}

impl Markers {
    pub fn counter_mut(&mut self, marker: SysMarker) -> &mut u32 {
        match marker {
            SysMarker::Misc => &mut self.misc,
            SysMarker::Rush => &mut self.rush,
            SysMarker::Cargo => &mut self.cargo,
        }
    }

    pub fn total(&self) -> u32 {
        self.misc + self.rush + self.cargo
    }
}

/// Nebula background parameters. Zero density means a starfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nebula {
    pub density: f64,
    pub volatility: f64,
}

/// A node of the galaxy graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub pos: DVec2,
    /// Radius of the boundary circle auto-positioned jump points sit on.
    pub radius: f64,
    pub stars: u32,
    pub asteroids: u32,
    pub interference: f64,
    pub nebula: Nebula,
    pub jumps: Vec<JumpPoint>,
    /// Attached planets, in attachment order.
    pub planets: Vec<PlanetId>,
    /// Faction of the first real planet with a positive faction id.
    pub faction: FactionId,
    pub presence: Vec<SystemPresence>,
    pub flags: SystemFlags,
    pub markers: Markers,
    /// Names of statically assigned fleets.
    pub fleets: Vec<String>,
    pub avg_pilots: f64,
}

impl StarSystem {
    pub fn new(id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pos: DVec2::ZERO,
            radius: 0.0,
            stars: 0,
            asteroids: 0,
            interference: 0.0,
            nebula: Nebula::default(),
            jumps: Vec::new(),
            planets: Vec::new(),
            faction: FactionId::NONE,
            presence: Vec::new(),
            flags: SystemFlags::empty(),
            markers: Markers::default(),
            fleets: Vec::new(),
            avg_pilots: 0.0,
        }
    }

    pub fn is_known(&self) -> bool {
        self.flags.contains(SystemFlags::KNOWN)
    }

    /// Direct neighbors through resolved jump points, in declaration order.
    pub fn neighbors(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.jumps.iter().filter_map(|jp| jp.target)
    }

    pub fn presence_row(&self, faction: FactionId) -> Option<&SystemPresence> {
        self.presence.iter().find(|row| row.faction == faction)
    }

    /// Find-or-create the presence row for `faction`.
    pub fn presence_row_mut(&mut self, faction: FactionId) -> &mut SystemPresence {
        let index = match self.presence.iter().position(|row| row.faction == faction) {
            Some(index) => index,
            None => {
                self.presence.push(SystemPresence::new(faction));
                self.presence.len() - 1
            }
        };
        &mut self.presence[index]
    }

    /// Presence value of `faction`, zero when absent.
    pub fn presence_value(&self, faction: FactionId) -> f64 {
        self.presence_row(faction).map_or(0.0, |row| row.value)
    }

    /// Drop presence rows whose value has returned to zero.
    pub fn prune_presence(&mut self) {
        self.presence
            .retain(|row| row.value.abs() >= PRESENCE_EPSILON);
    }
}

/// A fleet currently flying in the player's system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemFleet {
    pub faction: FactionId,
    /// Pilots of this fleet still alive.
    pub pilots: usize,
    /// Presence budget returned to the faction once the fleet is gone.
    pub presence_used: f64,
}
