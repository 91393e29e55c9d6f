//! Shared fixtures for unit tests.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use starmap_core::defs::*;
use starmap_core::types::FactionId;

use crate::factions::FactionTable;
use crate::fleet::{spawn_pilot, FleetFactory, PilotPlacement};

/// Build a fleet of `pilots` identical ships.
pub fn fleet(name: &str, faction: i32, strength: f64, pilots: usize) -> FleetSpec {
    FleetSpec {
        name: name.to_string(),
        faction: FactionId(faction),
        strength,
        pilots: (0..pilots)
            .map(|i| FleetPilotSpec {
                name: format!("{name} {i}"),
                ship: "Llama".to_string(),
                speed: 200.0,
            })
            .collect(),
    }
}

/// Factory that hands out pre-set fleets in order, regardless of faction.
pub struct ScriptedFactory {
    fleets: Vec<FleetSpec>,
    next: usize,
    pub draws: usize,
    pub spawned: Vec<PilotPlacement>,
}

impl ScriptedFactory {
    pub fn empty() -> Self {
        Self::cycle(Vec::new())
    }

    pub fn repeating(fleet: FleetSpec) -> Self {
        Self::cycle(vec![fleet])
    }

    pub fn cycle(fleets: Vec<FleetSpec>) -> Self {
        Self {
            fleets,
            next: 0,
            draws: 0,
            spawned: Vec::new(),
        }
    }
}

impl FleetFactory for ScriptedFactory {
    fn draw(&mut self, _faction: FactionId, _rng: &mut ChaCha8Rng) -> Option<FleetSpec> {
        self.draws += 1;
        if self.fleets.is_empty() {
            return None;
        }
        let fleet = self.fleets[self.next % self.fleets.len()].clone();
        self.next += 1;
        Some(fleet)
    }

    fn instantiate(
        &mut self,
        world: &mut World,
        fleet: &FleetSpec,
        pilot: &FleetPilotSpec,
        placement: PilotPlacement,
        system_fleet: usize,
    ) -> Entity {
        self.spawned.push(placement);
        spawn_pilot(world, fleet, pilot, placement, system_fleet)
    }
}

/// Player (0), Empire (1), Pirate (2); Empire and Pirate are enemies.
pub fn factions() -> FactionTable {
    let mut table = FactionTable::new();
    table.add("Player");
    let empire = table.add("Empire");
    let pirate = table.add("Pirate");
    table.set_enemies(empire, pirate);
    table
}

pub const EMPIRE: FactionId = FactionId(1);
pub const PIRATE: FactionId = FactionId(2);

fn jump(target: &str) -> JumpDef {
    JumpDef {
        target: target.to_string(),
        radius: 200.0,
        pos: None,
        autopos: true,
    }
}

fn system(name: &str, x: f64, jumps: &[&str]) -> SystemDef {
    SystemDef {
        name: name.to_string(),
        pos: [x, 0.0],
        radius: 5000.0,
        stars: 300,
        asteroids: 0,
        interference: 0.0,
        nebula: None,
        assets: Vec::new(),
        jumps: jumps.iter().map(|t| jump(t)).collect(),
    }
}

/// Linear chain `A - B - C` with auto-positioned jumps and one free planet.
pub fn chain_galaxy() -> GalaxyDef {
    GalaxyDef {
        planets: vec![PlanetDef {
            name: "Outpost".to_string(),
            pos: Some([1200.0, -300.0]),
            class: Some('M'),
            faction: Some(EMPIRE),
            presence: PresenceDef {
                value: 90.0,
                range: 2,
            },
            services: vec!["land".to_string(), "refuel".to_string()],
            population: 5000,
        }],
        systems: vec![
            system("A", 0.0, &["B"]),
            system("B", 100.0, &["A", "C"]),
            system("C", 200.0, &["B"]),
        ],
    }
}
