//! Current-system runtime.
//!
//! Holds the hecs world of the system the player is in, the system-local
//! fleet list and the environment effects (nebula radiation, sensor
//! interference). `enter` rebuilds everything for a new system; `update`
//! advances one tick.

use std::f64::consts::TAU;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use starmap_core::components::*;
use starmap_core::defs::FleetSpec;
use starmap_core::entities::SystemFleet;
use starmap_core::enums::InitMode;
use starmap_core::error::GalaxyError;
use starmap_core::state::{Background, JumpPointView, PilotView, RuntimeSnapshot};
use starmap_core::types::SystemId;

use crate::fleet::FleetFactory;
use crate::galaxy::Galaxy;
use crate::scheduler;
use crate::world_setup;

pub struct SystemRuntime {
    world: World,
    player: Entity,
    current: Option<SystemId>,
    spawn_enabled: bool,
    interference_alpha: f64,
    interference_target: f64,
    interference_timer: f64,
    system_fleets: Vec<SystemFleet>,
    factory: Box<dyn FleetFactory>,
}

impl SystemRuntime {
    pub fn new(factory: Box<dyn FleetFactory>) -> Self {
        let mut world = World::new();
        let player = world_setup::spawn_player(&mut world);
        Self {
            world,
            player,
            current: None,
            spawn_enabled: true,
            interference_alpha: 0.0,
            interference_target: 0.0,
            interference_timer: 0.0,
            system_fleets: Vec::new(),
            factory,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn current(&self) -> Option<SystemId> {
        self.current
    }

    pub fn system_fleets(&self) -> &[SystemFleet] {
        &self.system_fleets
    }

    pub fn interference_alpha(&self) -> f64 {
        self.interference_alpha
    }

    pub fn spawn_enabled(&self) -> bool {
        self.spawn_enabled
    }

    /// Toggle the spawn scheduler for the rest of the visit.
    pub fn set_spawn(&mut self, enabled: bool) {
        self.spawn_enabled = enabled;
    }

    // ---- System entry ----

    /// Enter `name`, or re-enter the current system when `None`.
    pub fn enter(
        &mut self,
        galaxy: &mut Galaxy,
        name: Option<&str>,
        rng: &mut ChaCha8Rng,
    ) -> Result<SystemId, GalaxyError> {
        let sys = match name {
            Some(name) => galaxy
                .system_id(name)
                .ok_or_else(|| GalaxyError::UnknownSystem(name.to_string()))?,
            None => self.current.ok_or(GalaxyError::NoCurrentSystem)?,
        };

        self.despawn_pilots();
        self.current = Some(sys);
        self.spawn_enabled = true;
        self.interference_timer = 0.0;
        self.system_fleets.clear();

        let planets = match galaxy.system_mut(sys) {
            Some(system) => {
                if system.interference == 0.0 {
                    self.interference_alpha = 0.0;
                }
                for row in &mut system.presence {
                    row.reset_schedule();
                }
                system.planets.clone()
            }
            None => return Err(GalaxyError::UnknownSystemIndex(sys.0)),
        };
        for id in planets {
            if let Some(planet) = galaxy.store_mut().planet_mut(id) {
                planet.bribed = false;
            }
        }

        // Pre-roll fleets already en route, then spawn what is due now.
        self.run_scheduler(galaxy, sys, 0.0, InitMode::InitSpawn, rng);
        self.run_scheduler(galaxy, sys, 0.0, InitMode::InitNoSpawn, rng);

        galaxy.set_known(sys);
        if let Some(system) = galaxy.system(sys) {
            info!(
                target: "starmap::runtime",
                system = %system.name,
                fleets = self.system_fleets.len(),
                "entered star system"
            );
        }
        Ok(sys)
    }

    /// Forget the current system and everything flying in it.
    pub fn leave(&mut self) {
        self.despawn_pilots();
        self.current = None;
        self.system_fleets.clear();
        self.interference_alpha = 0.0;
        self.interference_target = 0.0;
        self.interference_timer = 0.0;
    }

    /// Remove every pilot except the player.
    fn despawn_pilots(&mut self) {
        let pilots: Vec<Entity> = self
            .world
            .query::<&Pilot>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in pilots {
            let _ = self.world.despawn(entity);
        }
    }

    // ---- Tick ----

    /// Advance the current system by `dt` seconds.
    pub fn update(&mut self, galaxy: &mut Galaxy, dt: f64, rng: &mut ChaCha8Rng) {
        let Some(sys) = self.current else {
            return;
        };

        if self.spawn_enabled {
            self.run_scheduler(galaxy, sys, dt, InitMode::Normal, rng);
        }

        let Some(system) = galaxy.system(sys) else {
            return;
        };
        let environment = &galaxy.config().environment;

        if system.nebula.volatility > 0.0 {
            let damage =
                system.nebula.volatility.powi(2) / environment.volatility_damage_divisor * dt;
            if let Ok(mut hull) = self.world.get::<&mut Hull>(self.player) {
                hull.armor = (hull.armor - damage).max(0.0);
            }
        }

        let interference = system.interference;
        if interference > 0.0 {
            if interference >= environment.interference_max {
                self.interference_alpha = 1.0;
            } else {
                self.interference_timer -= dt;
                if self.interference_timer < 0.0 {
                    let share = interference / environment.interference_max;
                    self.interference_timer +=
                        (1.0 - share) * (environment.interference_timer_base + two_sigma(rng));
                    self.interference_target = share * 2.0 * (1.0 + two_sigma(rng));
                }
                let gap = self.interference_target - self.interference_alpha;
                if gap.abs() > environment.interference_epsilon {
                    self.interference_alpha = (self.interference_alpha + gap * dt).clamp(0.0, 1.0);
                }
            }
        }
    }

    fn run_scheduler(
        &mut self,
        galaxy: &mut Galaxy,
        sys: SystemId,
        dt: f64,
        mode: InitMode,
        rng: &mut ChaCha8Rng,
    ) {
        let spawn = galaxy.config().spawn.clone();
        let fired: Vec<FleetSpec> = match galaxy.system_mut(sys) {
            Some(system) => {
                scheduler::run(system, dt, mode, self.factory.as_mut(), rng, &spawn)
            }
            None => return,
        };
        for fleet in &fired {
            let injected = world_setup::add_fleet(
                &mut self.world,
                galaxy,
                sys,
                fleet,
                mode,
                self.factory.as_mut(),
                &mut self.system_fleets,
                rng,
            );
            if injected.is_none() {
                // The fleet never arrived: give its strength back to the row.
                refund_budget(galaxy, sys, fleet);
            }
        }
    }

    // ---- System fleets ----

    /// Inject `fleet` as if the scheduler had fired it.
    pub fn add_system_fleet(
        &mut self,
        galaxy: &Galaxy,
        fleet: &FleetSpec,
        rng: &mut ChaCha8Rng,
    ) -> Option<usize> {
        let sys = self.current?;
        world_setup::add_fleet(
            &mut self.world,
            galaxy,
            sys,
            fleet,
            InitMode::Normal,
            self.factory.as_mut(),
            &mut self.system_fleets,
            rng,
        )
    }

    /// Despawn a pilot, retiring its system fleet with the last member.
    pub fn remove_pilot(&mut self, galaxy: &mut Galaxy, entity: Entity) {
        let membership = self
            .world
            .get::<&FleetMembership>(entity)
            .ok()
            .map(|m| m.system_fleet);
        if self.world.despawn(entity).is_err() {
            warn!(target: "starmap::runtime", ?entity, "remove of unknown pilot");
            return;
        }
        let Some(index) = membership else {
            return;
        };
        let Some(fleet) = self.system_fleets.get_mut(index) else {
            return;
        };
        fleet.pilots = fleet.pilots.saturating_sub(1);
        if fleet.pilots == 0 {
            self.remove_system_fleet(galaxy, index);
        }
    }

    /// Drop system fleet `index`, returning its budget to the faction.
    pub fn remove_system_fleet(&mut self, galaxy: &mut Galaxy, index: usize) {
        if index >= self.system_fleets.len() {
            warn!(target: "starmap::runtime", index, "system fleet out of range");
            return;
        }
        let fleet = self.system_fleets.remove(index);

        if let Some(system) = self.current.and_then(|sys| galaxy.system_mut(sys)) {
            if let Some(row) = system
                .presence
                .iter_mut()
                .find(|row| row.faction == fleet.faction)
            {
                row.cur_used -= fleet.presence_used;
            }
        }

        for (_, membership) in self.world.query_mut::<&mut FleetMembership>() {
            if membership.system_fleet > index {
                membership.system_fleet -= 1;
            }
        }
        debug!(
            target: "starmap::runtime",
            index,
            faction = fleet.faction.0,
            returned = fleet.presence_used,
            "system fleet retired"
        );
    }

    // ---- Snapshot ----

    pub fn snapshot(&self, galaxy: &Galaxy) -> RuntimeSnapshot {
        let Some(system) = self.current.and_then(|sys| galaxy.system(sys)) else {
            return RuntimeSnapshot::default();
        };

        let background = if system.nebula.density > 0.0 {
            Background::Nebula {
                density: system.nebula.density,
                volatility: system.nebula.volatility,
            }
        } else {
            Background::Stars {
                count: system.stars,
            }
        };

        let jump_points = system
            .jumps
            .iter()
            .filter_map(|jp| {
                let target = galaxy.system(jp.target?)?;
                Some(JumpPointView {
                    target: target.name.clone(),
                    pos: jp.pos,
                    radius: jp.radius,
                    angle: jp.angle,
                    sprite: jp.sprite,
                })
            })
            .collect();

        let mut pilots: Vec<PilotView> = self
            .world
            .query::<(&Pilot, &Position, &Velocity, &Heading, Option<&FleetMembership>)>()
            .iter()
            .map(|(_, (pilot, pos, vel, heading, membership))| PilotView {
                name: pilot.name.clone(),
                faction: pilot.faction,
                pos: pos.0,
                vel: vel.0,
                heading: heading.0,
                system_fleet: membership.map(|m| m.system_fleet),
            })
            .collect();
        pilots.sort_by(|a, b| {
            a.system_fleet
                .cmp(&b.system_fleet)
                .then_with(|| a.name.cmp(&b.name))
        });

        let player_armor = self
            .world
            .get::<&Hull>(self.player)
            .ok()
            .map(|hull| hull.armor);

        RuntimeSnapshot {
            system: Some(system.name.clone()),
            background: Some(background),
            interference_alpha: self.interference_alpha,
            jump_points,
            pilots,
            system_fleets: self.system_fleets.len(),
            player_armor,
        }
    }
}

/// Return a dropped fleet's strength to its faction's row in `sys`.
fn refund_budget(galaxy: &mut Galaxy, sys: SystemId, fleet: &FleetSpec) {
    let Some(system) = galaxy.system_mut(sys) else {
        return;
    };
    if let Some(row) = system
        .presence
        .iter_mut()
        .find(|row| row.faction == fleet.faction)
    {
        row.cur_used = (row.cur_used - fleet.strength).max(0.0);
    }
}

/// Standard normal deviate truncated to two standard deviations.
///
/// Samples outside the range are redrawn, so the tails never pile up on
/// the bounds.
fn two_sigma(rng: &mut ChaCha8Rng) -> f64 {
    loop {
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen_range(0.0..1.0);
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        if (-2.0..=2.0).contains(&z) {
            return z;
        }
    }
}
