//! Space engine — the galaxy plus the system the player is flying in.
//!
//! `SpaceEngine` owns the galaxy, the current-system runtime and the seeded
//! RNG, and produces `RuntimeSnapshot`s. Headless, so the same seed and the
//! same calls give the same snapshots.

use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starmap_core::config::GalaxyConfig;
use starmap_core::defs::GalaxyDef;
use starmap_core::error::{GalaxyError, LoadError};
use starmap_core::state::RuntimeSnapshot;
use starmap_core::types::SystemId;

use crate::factions::FactionRegistry;
use crate::fleet::FleetFactory;
use crate::galaxy::Galaxy;
use crate::runtime::SystemRuntime;

/// Configuration for starting a new engine.
#[derive(Debug, Clone)]
pub struct SpaceConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub galaxy: GalaxyConfig,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            galaxy: GalaxyConfig::builtin(),
        }
    }
}

impl SpaceConfig {
    /// Default seed with the galaxy config read from `path` when given.
    pub fn with_config_file(path: Option<&Path>) -> Self {
        Self {
            galaxy: GalaxyConfig::load_or_builtin(path),
            ..Self::default()
        }
    }
}

pub struct SpaceEngine {
    galaxy: Galaxy,
    runtime: SystemRuntime,
    rng: ChaCha8Rng,
}

impl SpaceEngine {
    pub fn new(
        config: SpaceConfig,
        factions: Box<dyn FactionRegistry>,
        factory: Box<dyn FleetFactory>,
    ) -> Self {
        Self {
            galaxy: Galaxy::new(factions, config.galaxy),
            runtime: SystemRuntime::new(factory),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Load a galaxy definition. Returns the non-fatal data errors.
    pub fn load(&mut self, def: &GalaxyDef) -> Result<Vec<GalaxyError>, LoadError> {
        self.galaxy.load(def)
    }

    /// Parse and load a JSON galaxy definition.
    pub fn load_json(&mut self, json: &str) -> Result<Vec<GalaxyError>, LoadError> {
        let def = GalaxyDef::from_json_str(json)?;
        self.load(&def)
    }

    /// Enter `name`, or re-enter the current system when `None`.
    pub fn enter(&mut self, name: Option<&str>) -> Result<SystemId, GalaxyError> {
        self.runtime.enter(&mut self.galaxy, name, &mut self.rng)
    }

    /// Advance by `dt` seconds and return the resulting snapshot.
    pub fn update(&mut self, dt: f64) -> RuntimeSnapshot {
        self.runtime.update(&mut self.galaxy, dt, &mut self.rng);
        self.runtime.snapshot(&self.galaxy)
    }

    pub fn snapshot(&self) -> RuntimeSnapshot {
        self.runtime.snapshot(&self.galaxy)
    }

    pub fn galaxy(&self) -> &Galaxy {
        &self.galaxy
    }

    pub fn galaxy_mut(&mut self) -> &mut Galaxy {
        &mut self.galaxy
    }

    pub fn runtime(&self) -> &SystemRuntime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut SystemRuntime {
        &mut self.runtime
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Remove a pilot from the current system.
    pub fn remove_pilot(&mut self, entity: hecs::Entity) {
        self.runtime.remove_pilot(&mut self.galaxy, entity);
    }

    /// Drop the whole galaxy and the current-system state.
    pub fn clear(&mut self) {
        self.runtime.leave();
        self.galaxy.clear();
    }
}
