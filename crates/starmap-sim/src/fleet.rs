//! Fleet factory seam.
//!
//! The scheduler asks a [`FleetFactory`] which fleet a faction sends and
//! hands the chosen fleet back to it to build pilot entities. Ship stats and
//! AI live behind this trait; [`FleetCatalog`] is a table-driven factory.

use glam::DVec2;
use hecs::{Entity, EntityBuilder, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starmap_core::components::*;
use starmap_core::constants::SHIP_ARMOR;
use starmap_core::defs::{FleetPilotSpec, FleetSpec};
use starmap_core::enums::ArrivalMode;
use starmap_core::types::FactionId;

/// Where a single pilot starts its visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotPlacement {
    pub pos: DVec2,
    pub vel: DVec2,
    pub heading: f64,
    pub arrival: ArrivalMode,
}

pub trait FleetFactory {
    /// Pick a fleet for `faction`, or `None` if it has nothing to send.
    fn draw(&mut self, faction: FactionId, rng: &mut ChaCha8Rng) -> Option<FleetSpec>;

    /// Spawn one pilot of `fleet` into `world`.
    fn instantiate(
        &mut self,
        world: &mut World,
        fleet: &FleetSpec,
        pilot: &FleetPilotSpec,
        placement: PilotPlacement,
        system_fleet: usize,
    ) -> Entity;
}

/// Fleets grouped by faction, drawn uniformly.
#[derive(Debug, Clone, Default)]
pub struct FleetCatalog {
    fleets: Vec<FleetSpec>,
}

impl FleetCatalog {
    pub fn new(fleets: Vec<FleetSpec>) -> Self {
        Self { fleets }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn push(&mut self, fleet: FleetSpec) {
        self.fleets.push(fleet);
    }

    pub fn fleets(&self) -> &[FleetSpec] {
        &self.fleets
    }
}

impl FleetFactory for FleetCatalog {
    fn draw(&mut self, faction: FactionId, rng: &mut ChaCha8Rng) -> Option<FleetSpec> {
        let candidates: Vec<&FleetSpec> =
            self.fleets.iter().filter(|f| f.faction == faction).collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..candidates.len());
        candidates.get(pick).map(|f| (*f).clone())
    }

    fn instantiate(
        &mut self,
        world: &mut World,
        fleet: &FleetSpec,
        pilot: &FleetPilotSpec,
        placement: PilotPlacement,
        system_fleet: usize,
    ) -> Entity {
        spawn_pilot(world, fleet, pilot, placement, system_fleet)
    }
}

/// Spawn a fleet pilot with the standard component bundle.
pub fn spawn_pilot(
    world: &mut World,
    fleet: &FleetSpec,
    pilot: &FleetPilotSpec,
    placement: PilotPlacement,
    system_fleet: usize,
) -> Entity {
    let mut builder = EntityBuilder::new();
    builder.add(Pilot {
        name: pilot.name.clone(),
        ship: pilot.ship.clone(),
        faction: fleet.faction,
        fleet: fleet.name.clone(),
    });
    builder.add(Position(placement.pos));
    builder.add(Velocity(placement.vel));
    builder.add(Heading(placement.heading));
    builder.add(Hull {
        armor: SHIP_ARMOR,
        armor_max: SHIP_ARMOR,
    });
    builder.add(FleetMembership { system_fleet });
    match placement.arrival {
        ArrivalMode::Hyperspace => {
            builder.add(HyperspaceArrival);
        }
        ArrivalMode::Landed => {
            builder.add(Landed);
        }
        ArrivalMode::Approach => {}
    }
    world.spawn(builder.build())
}
