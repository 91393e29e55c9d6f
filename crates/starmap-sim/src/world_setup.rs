//! Entity spawn factories for the current system.
//!
//! Creates the player's ship and injects fleets handed out by the scheduler
//! with a placement that depends on the arrival mode.

use std::f64::consts::TAU;

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use starmap_core::components::*;
use starmap_core::config::SpawnConfig;
use starmap_core::constants::SHIP_ARMOR;
use starmap_core::defs::FleetSpec;
use starmap_core::entities::{Planet, SystemFleet};
use starmap_core::enums::{ArrivalMode, InitMode};
use starmap_core::flags::PlanetServices;
use starmap_core::types::{heading_of, polar, SystemId};

use crate::fleet::{FleetFactory, PilotPlacement};
use crate::galaxy::Galaxy;
use crate::jump_graph;

/// Spawn the player's ship at the system origin.
pub fn spawn_player(world: &mut World) -> Entity {
    world.spawn((
        Player,
        Position(DVec2::ZERO),
        Velocity(DVec2::ZERO),
        Heading(0.0),
        Hull {
            armor: SHIP_ARMOR,
            armor_max: SHIP_ARMOR,
        },
    ))
}

/// Inject `fleet` into the current system `sys`.
///
/// Registers a new system fleet and spawns one entity per pilot. Returns the
/// system fleet index, or `None` when the system offers no way in (no jump
/// points and no friendly inhabited planet).
#[allow(clippy::too_many_arguments)]
pub fn add_fleet(
    world: &mut World,
    galaxy: &Galaxy,
    sys: SystemId,
    fleet: &FleetSpec,
    mode: InitMode,
    factory: &mut dyn FleetFactory,
    system_fleets: &mut Vec<SystemFleet>,
    rng: &mut ChaCha8Rng,
) -> Option<usize> {
    let system = galaxy.system(sys)?;
    let targets: Vec<SystemId> = system.neighbors().collect();

    let mut arrival = if mode == InitMode::InitNoSpawn {
        if rng.gen_bool(0.5) {
            ArrivalMode::Approach
        } else {
            ArrivalMode::Landed
        }
    } else if targets.is_empty() {
        // No jump to arrive through; approach a planet instead if there is one.
        ArrivalMode::Approach
    } else {
        ArrivalMode::Hyperspace
    };

    let mut anchor = DVec2::ZERO;
    if arrival != ArrivalMode::Hyperspace {
        match friendly_planet(galaxy, sys, fleet) {
            Some(planet) if arrival == ArrivalMode::Landed => anchor = planet.pos,
            Some(planet) => {
                let hyperspace = &galaxy.config().hyperspace;
                let distance = if hyperspace.enter_max > hyperspace.enter_min {
                    rng.gen_range(hyperspace.enter_min..hyperspace.enter_max)
                } else {
                    hyperspace.enter_min
                };
                anchor = planet.pos + polar(distance, rng.gen_range(0.0..TAU));
            }
            None => arrival = ArrivalMode::Hyperspace,
        }
    }

    let mut jump_in = None;
    if arrival == ArrivalMode::Hyperspace {
        if targets.is_empty() {
            warn!(
                target: "starmap::runtime",
                system = %system.name,
                fleet = %fleet.name,
                "no jump points to enter from, fleet dropped"
            );
            return None;
        }
        let from = targets[rng.gen_range(0..targets.len())];
        let placement = jump_graph::calc_jump_in_pos(
            galaxy.store(),
            sys,
            from,
            &galaxy.config().hyperspace,
            rng,
        )
        .ok()?;
        anchor = placement.pos;
        jump_in = Some(placement);
    }

    system_fleets.push(SystemFleet {
        faction: fleet.faction,
        pilots: fleet.pilots.len(),
        presence_used: fleet.strength,
    });
    let index = system_fleets.len() - 1;

    let spawn = &galaxy.config().spawn;
    let mut pos = anchor;
    for pilot in &fleet.pilots {
        pos += formation_offset(spawn, rng);
        let placement = match jump_in {
            Some(jump_in) => PilotPlacement {
                pos,
                vel: jump_in.vel,
                heading: jump_in.heading,
                arrival,
            },
            None => {
                let heading = heading_of(pos);
                let vel = if arrival == ArrivalMode::Approach {
                    polar(pilot.speed * spawn.approach_speed_factor, heading)
                } else {
                    DVec2::ZERO
                };
                PilotPlacement {
                    pos,
                    vel,
                    heading,
                    arrival,
                }
            }
        };
        factory.instantiate(world, fleet, pilot, placement, index);
    }
    Some(index)
}

/// First inhabited planet of `sys` whose owner is not hostile to `fleet`.
fn friendly_planet<'a>(
    galaxy: &'a Galaxy,
    sys: SystemId,
    fleet: &FleetSpec,
) -> Option<&'a Planet> {
    let factions = galaxy.factions();
    galaxy
        .system(sys)?
        .planets
        .iter()
        .filter_map(|id| galaxy.planet(*id))
        .find(|p| {
            p.has_service(PlanetServices::INHABITED)
                && !factions.are_enemies(fleet.faction, p.faction)
        })
}

/// Random per-axis shift so fleet members do not stack.
fn formation_offset(spawn: &SpawnConfig, rng: &mut ChaCha8Rng) -> DVec2 {
    let min = spawn.formation_spread_min;
    let max = spawn.formation_spread_max.max(min);
    let mut axis = || {
        let magnitude = f64::from(rng.gen_range(min..=max));
        if rng.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    };
    let x = axis();
    let y = axis();
    DVec2::new(x, y)
}
