//! Entity store — growable planet and system collections with stable ids.
//!
//! Ids are indices and never change once handed out. Storage grows in
//! fixed chunks; every growth bumps a generation counter so owners can
//! re-run anything derived from the previous layout.

use std::collections::HashMap;

use starmap_core::entities::{Planet, StarSystem};
use starmap_core::error::GalaxyError;
use starmap_core::types::{PlanetId, SystemId};

/// Number of records storage grows by.
const CHUNK_SIZE: usize = 32;

#[derive(Debug, Default)]
pub struct EntityStore {
    systems: Vec<StarSystem>,
    planets: Vec<Planet>,
    system_names: HashMap<String, SystemId>,
    planet_names: HashMap<String, PlanetId>,
    generation: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped every time either collection reallocates.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn new_system(&mut self, name: &str) -> Result<SystemId, GalaxyError> {
        if self.system_names.contains_key(name) {
            return Err(GalaxyError::DuplicateSystem(name.to_string()));
        }
        if self.systems.len() == self.systems.capacity() {
            self.systems.reserve_exact(CHUNK_SIZE);
            self.generation += 1;
        }
        let id = SystemId(self.systems.len());
        self.systems.push(StarSystem::new(id, name));
        self.system_names.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn new_planet(&mut self, name: &str) -> Result<PlanetId, GalaxyError> {
        if self.planet_names.contains_key(name) {
            return Err(GalaxyError::DuplicatePlanet(name.to_string()));
        }
        if self.planets.len() == self.planets.capacity() {
            self.planets.reserve_exact(CHUNK_SIZE);
            self.generation += 1;
        }
        let id = PlanetId(self.planets.len());
        self.planets.push(Planet::new(id, name));
        self.planet_names.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id.0)
    }

    pub fn system_mut(&mut self, id: SystemId) -> Option<&mut StarSystem> {
        self.systems.get_mut(id.0)
    }

    pub fn system_id(&self, name: &str) -> Option<SystemId> {
        self.system_names.get(name).copied()
    }

    pub fn system_by_name(&self, name: &str) -> Option<&StarSystem> {
        self.system_id(name).and_then(|id| self.system(id))
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.0)
    }

    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.get_mut(id.0)
    }

    pub fn planet_id(&self, name: &str) -> Option<PlanetId> {
        self.planet_names.get(name).copied()
    }

    pub fn planet_by_name(&self, name: &str) -> Option<&Planet> {
        self.planet_id(name).and_then(|id| self.planet(id))
    }

    pub fn systems(&self) -> &[StarSystem] {
        &self.systems
    }

    pub fn systems_mut(&mut self) -> &mut [StarSystem] {
        &mut self.systems
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.systems = Vec::new();
        self.planets = Vec::new();
        self.system_names.clear();
        self.planet_names.clear();
        self.generation += 1;
    }
}
