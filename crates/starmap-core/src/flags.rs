//! Bit flags for systems, jump points and planet services.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Player-facing state of a star system.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SystemFlags: u32 {
        /// The player has visited or learned about the system.
        const KNOWN = 1 << 0;
        /// At least one mission marker is on the system.
        const MARKED = 1 << 1;
        /// Marked by the autonav computer.
        const CMARKED = 1 << 2;
    }
}

bitflags! {
    /// Jump point behavior flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct JumpFlags: u32 {
        /// Position is derived from the heading and the system radius.
        const AUTOPOS = 1 << 0;
    }
}

bitflags! {
    /// Services offered by a planet.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PlanetServices: u32 {
        const LAND = 1 << 0;
        const INHABITED = 1 << 1;
        const REFUEL = 1 << 2;
        const BAR = 1 << 3;
        const MISSIONS = 1 << 4;
        const COMMODITY = 1 << 5;
        const OUTFITS = 1 << 6;
        const SHIPYARD = 1 << 7;
    }
}

impl PlanetServices {
    /// Parse a service tag. Every service except landing implies inhabitants.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let service = match tag {
            "land" => PlanetServices::LAND,
            "refuel" => PlanetServices::REFUEL | PlanetServices::INHABITED,
            "bar" => PlanetServices::BAR | PlanetServices::INHABITED,
            "missions" => PlanetServices::MISSIONS | PlanetServices::INHABITED,
            "commodity" => PlanetServices::COMMODITY | PlanetServices::INHABITED,
            "outfits" => PlanetServices::OUTFITS | PlanetServices::INHABITED,
            "shipyard" => PlanetServices::SHIPYARD | PlanetServices::INHABITED,
            _ => return None,
        };
        Some(service)
    }
}
