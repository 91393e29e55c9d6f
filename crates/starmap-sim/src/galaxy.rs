//! Galaxy — the loaded universe and every mutation the game performs on it.
//!
//! Wraps the entity store with bulk loading, planet attach/detach (which
//! keeps presence and the system faction summary in step), player-facing
//! flags and markers, and the known-systems persistence payload.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use starmap_core::config::GalaxyConfig;
use starmap_core::defs::{FleetSpec, GalaxyDef, JumpDef, PlanetDef, SystemDef};
use starmap_core::entities::{JumpPoint, Markers, Nebula, Planet, StarSystem};
use starmap_core::enums::{AssetReality, PlanetClass, SysMarker};
use starmap_core::error::{GalaxyError, LoadError};
use starmap_core::flags::{JumpFlags, PlanetServices, SystemFlags};
use starmap_core::types::{FactionId, PlanetId, SystemId};

use crate::factions::FactionRegistry;
use crate::jump_graph;
use crate::presence;
use crate::store::EntityStore;

pub struct Galaxy {
    store: EntityStore,
    factions: Box<dyn FactionRegistry>,
    config: GalaxyConfig,
    /// While set, planet attachment does not seed presence.
    loading: bool,
}

impl Galaxy {
    /// An empty galaxy in the loading state. Until [`Galaxy::load`] runs,
    /// attaching and detaching planets only records membership and never
    /// touches presence.
    pub fn new(factions: Box<dyn FactionRegistry>, config: GalaxyConfig) -> Self {
        Self {
            store: EntityStore::new(),
            factions,
            config,
            loading: true,
        }
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn factions(&self) -> &dyn FactionRegistry {
        self.factions.as_ref()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ---- Lifecycle ----

    /// Build the whole universe from parsed definitions.
    ///
    /// Planets first, then systems with their assets, then jumps once every
    /// system exists. Presence is seeded after jump resolution. Returns the
    /// non-fatal data errors encountered. Loading into a galaxy that already
    /// holds systems is refused; call [`Galaxy::clear`] first.
    pub fn load(&mut self, def: &GalaxyDef) -> Result<Vec<GalaxyError>, LoadError> {
        if def.systems.is_empty() {
            return Err(LoadError::NoSystems);
        }
        if self.store.system_count() > 0 {
            return Err(LoadError::AlreadyLoaded(self.store.system_count()));
        }
        self.loading = true;
        let mut errors = Vec::new();

        for planet_def in &def.planets {
            if let Err(err) = self.load_planet(planet_def) {
                warn!(target: "starmap::galaxy", error = %err, "planet skipped");
                errors.push(err);
            }
        }

        let mut loaded = Vec::with_capacity(def.systems.len());
        for system_def in &def.systems {
            match self.load_system(system_def, &mut errors) {
                Ok(id) => loaded.push((id, system_def)),
                Err(err) => {
                    warn!(target: "starmap::galaxy", error = %err, "star system skipped");
                    errors.push(err);
                }
            }
        }

        for (id, system_def) in &loaded {
            for jump_def in &system_def.jumps {
                if let Err(err) = self.load_jump(*id, jump_def) {
                    warn!(target: "starmap::galaxy", error = %err, "jump skipped");
                    errors.push(err);
                }
            }
        }

        self.loading = false;
        errors.extend(self.reconstruct());

        for (id, _) in &loaded {
            // Isolated systems are already reported by the presence engine.
            let _ = presence::add_all_planets_presence(
                &mut self.store,
                self.factions.as_ref(),
                *id,
            );
        }

        debug!(
            target: "starmap::galaxy",
            systems = self.store.system_count(),
            planets = self.store.planet_count(),
            "loaded {} star system{} with {} planet{}",
            self.store.system_count(),
            if self.store.system_count() == 1 { "" } else { "s" },
            self.store.planet_count(),
            if self.store.planet_count() == 1 { "" } else { "s" },
        );
        Ok(errors)
    }

    fn load_planet(&mut self, def: &PlanetDef) -> Result<PlanetId, GalaxyError> {
        let id = self.store.new_planet(&def.name)?;
        let Some(planet) = self.store.planet_mut(id) else {
            return Err(GalaxyError::UnknownPlanet(def.name.clone()));
        };

        planet.class = match def.class.map(PlanetClass::try_from) {
            Some(Ok(class)) => Some(class),
            Some(Err(err)) => {
                warn!(target: "starmap::galaxy", planet = %def.name, error = %err, "bad planet class");
                None
            }
            None => None,
        };
        if let Some([x, y]) = def.pos {
            planet.reality = AssetReality::Real;
            planet.pos = DVec2::new(x, y);
        }
        planet.faction = def.faction.unwrap_or(FactionId::NONE);
        planet.presence_amount = def.presence.value;
        planet.presence_range = def.presence.range;
        planet.population = def.population;
        for tag in &def.services {
            match PlanetServices::from_tag(tag) {
                Some(service) => planet.services |= service,
                None => warn!(
                    target: "starmap::galaxy",
                    planet = %def.name,
                    tag = %tag,
                    "unknown services tag"
                ),
            }
        }

        if planet.is_real() {
            let missing = [
                ("class", planet.class.is_none()),
                (
                    "population",
                    planet.has_service(PlanetServices::INHABITED) && planet.population == 0,
                ),
                (
                    "faction",
                    planet.has_service(PlanetServices::INHABITED) && def.faction.is_none(),
                ),
                ("presence", def.faction.is_some() && planet.presence_amount == 0.0),
            ];
            for (element, is_missing) in missing {
                if is_missing {
                    warn!(target: "starmap::galaxy", planet = %def.name, element, "planet missing element");
                }
            }
        }
        Ok(id)
    }

    fn load_system(
        &mut self,
        def: &SystemDef,
        errors: &mut Vec<GalaxyError>,
    ) -> Result<SystemId, GalaxyError> {
        let id = self.store.new_system(&def.name)?;
        let Some(sys) = self.store.system_mut(id) else {
            return Err(GalaxyError::UnknownSystem(def.name.clone()));
        };

        sys.pos = DVec2::new(def.pos[0], def.pos[1]);
        sys.radius = def.radius;
        sys.stars = def.stars;
        sys.asteroids = def.asteroids;
        sys.interference = def.interference;
        if let Some(nebula) = &def.nebula {
            sys.nebula = Nebula {
                density: nebula.density,
                volatility: nebula.volatility,
            };
        }
        if sys.stars == 0 && sys.nebula.density == 0.0 {
            warn!(target: "starmap::galaxy", system = %def.name, "star system missing 'stars' element");
        }
        if sys.radius == 0.0 {
            warn!(target: "starmap::galaxy", system = %def.name, "star system missing 'radius' element");
        }

        for asset in &def.assets {
            if let Err(err) = self.attach_planet(id, asset) {
                errors.push(err);
            }
        }
        Ok(id)
    }

    fn load_jump(&mut self, sys: SystemId, def: &JumpDef) -> Result<(), GalaxyError> {
        let name = self.system_name(sys);
        let Some(target) = self.store.system_id(&def.target) else {
            return Err(GalaxyError::MissingTarget {
                system: name,
                target: def.target.clone(),
            });
        };
        let mut jp = JumpPoint::new(target, def.radius);
        if def.autopos {
            jp.flags |= JumpFlags::AUTOPOS;
        } else if let Some([x, y]) = def.pos {
            jp.pos = DVec2::new(x, y);
        } else {
            warn!(target: "starmap::galaxy", system = %name, "jump point has no position");
        }
        if let Some(system) = self.store.system_mut(sys) {
            system.jumps.push(jp);
        }
        Ok(())
    }

    /// Re-run jump resolution and geometry over the whole store.
    pub fn reconstruct(&mut self) -> Vec<GalaxyError> {
        jump_graph::reconstruct(&mut self.store, self.config.jump_sprite)
    }

    /// Create an empty system. Outside of loading, storage growth triggers
    /// a full jump reconstruction.
    pub fn new_system(&mut self, name: &str) -> Result<SystemId, GalaxyError> {
        let generation = self.store.generation();
        let id = self.store.new_system(name)?;
        if !self.loading && self.store.generation() != generation {
            self.reconstruct();
        }
        Ok(id)
    }

    pub fn new_planet(&mut self, name: &str) -> Result<PlanetId, GalaxyError> {
        self.store.new_planet(name)
    }

    /// Add a one-way jump from `from` to `to` and refresh the geometry.
    pub fn add_jump(&mut self, from: SystemId, to: SystemId, radius: f64) -> Result<(), GalaxyError> {
        if self.store.system(to).is_none() {
            return Err(GalaxyError::UnknownSystemIndex(to.0));
        }
        let Some(system) = self.store.system_mut(from) else {
            return Err(GalaxyError::UnknownSystemIndex(from.0));
        };
        let mut jp = JumpPoint::new(to, radius);
        jp.flags |= JumpFlags::AUTOPOS;
        system.jumps.push(jp);
        self.reconstruct();
        Ok(())
    }

    /// Drop every planet and system; the galaxy returns to its loading state.
    pub fn clear(&mut self) {
        self.store.clear();
        self.loading = true;
    }

    // ---- Queries ----

    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.store.system(id)
    }

    pub fn system_mut(&mut self, id: SystemId) -> Option<&mut StarSystem> {
        self.store.system_mut(id)
    }

    pub fn system_id(&self, name: &str) -> Option<SystemId> {
        self.store.system_id(name)
    }

    pub fn system_by_name(&self, name: &str) -> Option<&StarSystem> {
        self.store.system_by_name(name)
    }

    pub fn systems(&self) -> &[StarSystem] {
        self.store.systems()
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.store.planet(id)
    }

    pub fn planet_by_name(&self, name: &str) -> Option<&Planet> {
        self.store.planet_by_name(name)
    }

    pub fn planets(&self) -> &[Planet] {
        self.store.planets()
    }

    pub fn planet_exists(&self, name: &str) -> bool {
        self.store.planet_id(name).is_some()
    }

    /// Name of the system `planet` is attached to.
    pub fn planet_system(&self, planet: &str) -> Option<&str> {
        let system = self.store.planet_by_name(planet)?.system?;
        self.store.system(system).map(|s| s.name.as_str())
    }

    /// Whether `sys` has at least one real asset.
    pub fn has_planet(&self, sys: SystemId) -> bool {
        let Some(system) = self.store.system(sys) else {
            warn!(target: "starmap::galaxy", system = sys.0, "has_planet on unknown system");
            return false;
        };
        system
            .planets
            .iter()
            .filter_map(|id| self.store.planet(*id))
            .any(Planet::is_real)
    }

    /// Known, or adjacent to a known system.
    pub fn is_reachable(&self, sys: SystemId) -> bool {
        let Some(system) = self.store.system(sys) else {
            return false;
        };
        system.is_known()
            || system
                .neighbors()
                .filter_map(|n| self.store.system(n))
                .any(StarSystem::is_known)
    }

    pub fn is_known(&self, sys: SystemId) -> bool {
        self.store.system(sys).is_some_and(StarSystem::is_known)
    }

    /// Names of attached real planets owned by any of `factions`.
    pub fn faction_planets(&self, factions: &[FactionId]) -> Vec<&str> {
        self.attached_real_planets()
            .filter(|p| factions.contains(&p.faction))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Name of a random attached real planet.
    pub fn random_planet(&self, rng: &mut ChaCha8Rng) -> Option<&str> {
        let candidates: Vec<&Planet> = self.attached_real_planets().collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..candidates.len());
        candidates.get(pick).map(|p| p.name.as_str())
    }

    fn attached_real_planets(&self) -> impl Iterator<Item = &Planet> + '_ {
        self.store
            .systems()
            .iter()
            .flat_map(|s| s.planets.iter())
            .filter_map(|id| self.store.planet(*id))
            .filter(|p| p.is_real())
    }

    fn system_name(&self, sys: SystemId) -> String {
        self.store
            .system(sys)
            .map_or_else(|| sys.to_string(), |s| s.name.clone())
    }

    // ---- Presence ----

    pub fn presence(&self, sys: SystemId, faction: FactionId) -> f64 {
        presence::get_presence(&self.store, sys, faction)
    }

    pub fn add_presence(
        &mut self,
        sys: SystemId,
        faction: FactionId,
        amount: f64,
        range: i32,
    ) -> Result<(), GalaxyError> {
        presence::add_presence(&mut self.store, self.factions.as_ref(), sys, faction, amount, range)
    }

    pub fn add_all_planets_presence(&mut self, sys: SystemId) -> Result<(), GalaxyError> {
        presence::add_all_planets_presence(&mut self.store, self.factions.as_ref(), sys)
    }

    // ---- Planet membership ----

    /// Attach a planet to a system, seeding its presence unless loading.
    pub fn attach_planet(&mut self, sys: SystemId, planet_name: &str) -> Result<(), GalaxyError> {
        let Some(planet_id) = self.store.planet_id(planet_name) else {
            warn!(target: "starmap::galaxy", planet = %planet_name, "attach of unknown planet");
            return Err(GalaxyError::UnknownPlanet(planet_name.to_string()));
        };
        if self.store.system(sys).is_none() {
            warn!(target: "starmap::galaxy", planet = %planet_name, "attach to unknown system");
            return Err(GalaxyError::UnknownSystemIndex(sys.0));
        }
        if let Some(current) = self.store.planet(planet_id).and_then(|p| p.system) {
            return Err(GalaxyError::PlanetAlreadyAttached {
                planet: planet_name.to_string(),
                system: self.system_name(current),
            });
        }

        if let Some(system) = self.store.system_mut(sys) {
            system.planets.push(planet_id);
        }
        let Some(planet) = self.store.planet_mut(planet_id) else {
            return Err(GalaxyError::UnknownPlanet(planet_name.to_string()));
        };
        planet.system = Some(sys);
        let seed = (planet.is_real(), planet.faction, planet.presence_amount, planet.presence_range);
        self.refresh_faction(sys);

        let (real, faction, amount, range) = seed;
        if !self.loading && real {
            // Isolated systems keep the direct contribution.
            let _ = self.add_presence(sys, faction, amount, range);
        }
        Ok(())
    }

    /// Detach a planet, retracting exactly the presence it seeded.
    pub fn detach_planet(&mut self, sys: SystemId, planet_name: &str) -> Result<(), GalaxyError> {
        let system_name = self.system_name(sys);
        let Some(planet_id) = self.store.planet_id(planet_name) else {
            warn!(target: "starmap::galaxy", planet = %planet_name, "detach of unknown planet");
            return Err(GalaxyError::UnknownPlanet(planet_name.to_string()));
        };
        let Some(system) = self.store.system_mut(sys) else {
            warn!(target: "starmap::galaxy", planet = %planet_name, "detach from unknown system");
            return Err(GalaxyError::UnknownSystemIndex(sys.0));
        };
        let Some(index) = system.planets.iter().position(|id| *id == planet_id) else {
            warn!(
                target: "starmap::galaxy",
                planet = %planet_name,
                system = %system_name,
                "planet not found in system for removal"
            );
            return Err(GalaxyError::PlanetNotInSystem {
                planet: planet_name.to_string(),
                system: system_name,
            });
        };
        system.planets.remove(index);

        let Some(planet) = self.store.planet_mut(planet_id) else {
            return Err(GalaxyError::UnknownPlanet(planet_name.to_string()));
        };
        planet.system = None;
        let seed = (planet.is_real(), planet.faction, planet.presence_amount, planet.presence_range);

        // Nothing was seeded while loading, so there is nothing to retract.
        let (real, faction, amount, range) = seed;
        if !self.loading && real {
            let _ = self.add_presence(sys, faction, -amount, range);
        }
        self.refresh_faction(sys);
        Ok(())
    }

    /// Recompute the faction summary from the system's planets.
    fn refresh_faction(&mut self, sys: SystemId) {
        let Some(system) = self.store.system(sys) else {
            return;
        };
        let faction = system
            .planets
            .iter()
            .filter_map(|id| self.store.planet(*id))
            .find(|p| p.is_real() && p.faction.0 > 0)
            .map_or(FactionId::NONE, |p| p.faction);
        if let Some(system) = self.store.system_mut(sys) {
            system.faction = faction;
        }
    }

    // ---- Static fleets ----

    /// Assign a named fleet to a system.
    pub fn add_fleet(&mut self, sys: SystemId, fleet: &FleetSpec) -> Result<(), GalaxyError> {
        let system = self
            .store
            .system_mut(sys)
            .ok_or(GalaxyError::UnknownSystemIndex(sys.0))?;
        system.fleets.push(fleet.name.clone());
        system.avg_pilots += fleet.pilots.len() as f64;
        Ok(())
    }

    /// Remove the first fleet assignment matching `fleet`.
    pub fn rm_fleet(&mut self, sys: SystemId, fleet: &FleetSpec) -> Result<(), GalaxyError> {
        let system = self
            .store
            .system_mut(sys)
            .ok_or(GalaxyError::UnknownSystemIndex(sys.0))?;
        let Some(index) = system.fleets.iter().position(|name| *name == fleet.name) else {
            return Err(GalaxyError::FleetNotInSystem {
                fleet: fleet.name.clone(),
                system: system.name.clone(),
            });
        };
        system.fleets.remove(index);
        system.avg_pilots -= fleet.pilots.len() as f64;
        Ok(())
    }

    // ---- Flags and markers ----

    pub fn set_known(&mut self, sys: SystemId) {
        if let Some(system) = self.store.system_mut(sys) {
            system.flags |= SystemFlags::KNOWN;
        }
    }

    pub fn clear_known(&mut self) {
        for system in self.store.systems_mut() {
            system.flags.remove(SystemFlags::KNOWN);
        }
    }

    pub fn clear_markers(&mut self) {
        for system in self.store.systems_mut() {
            system.flags.remove(SystemFlags::MARKED);
            system.markers = Markers::default();
        }
    }

    pub fn set_computer_marker(&mut self, sys: SystemId) {
        if let Some(system) = self.store.system_mut(sys) {
            system.flags |= SystemFlags::CMARKED;
        }
    }

    pub fn clear_computer_markers(&mut self) {
        for system in self.store.systems_mut() {
            system.flags.remove(SystemFlags::CMARKED);
        }
    }

    pub fn add_marker(&mut self, name: &str, marker: SysMarker) -> Result<(), GalaxyError> {
        let system = self.named_system_mut(name)?;
        *system.markers.counter_mut(marker) += 1;
        system.flags |= SystemFlags::MARKED;
        Ok(())
    }

    pub fn rm_marker(&mut self, name: &str, marker: SysMarker) -> Result<(), GalaxyError> {
        let system = self.named_system_mut(name)?;
        let counter = system.markers.counter_mut(marker);
        *counter = counter.saturating_sub(1);
        if *counter == 0 {
            system.flags.remove(SystemFlags::MARKED);
        }
        Ok(())
    }

    fn named_system_mut(&mut self, name: &str) -> Result<&mut StarSystem, GalaxyError> {
        let id = self
            .store
            .system_id(name)
            .ok_or_else(|| GalaxyError::UnknownSystem(name.to_string()))?;
        self.store
            .system_mut(id)
            .ok_or(GalaxyError::UnknownSystemIndex(id.0))
    }

    // ---- Persistence payload ----

    /// Names of every known system, in store order.
    pub fn save_known(&self) -> Vec<String> {
        self.store
            .systems()
            .iter()
            .filter(|s| s.is_known())
            .map(|s| s.name.clone())
            .collect()
    }

    /// Replace the known set. Unknown names are skipped with a warning.
    pub fn load_known<S: AsRef<str>>(&mut self, names: &[S]) {
        self.clear_known();
        for name in names {
            let name = name.as_ref();
            match self.store.system_id(name) {
                Some(id) => self.set_known(id),
                None => warn!(target: "starmap::galaxy", system = %name, "known system does not exist"),
            }
        }
    }
}
