//! Faction oracle consumed by presence propagation and fleet injection.

use std::collections::HashSet;

use starmap_core::types::FactionId;

/// What the galaxy needs to know about factions.
pub trait FactionRegistry {
    /// Whether `id` names a real faction.
    fn is_faction(&self, id: FactionId) -> bool;

    /// Whether two factions are hostile to each other.
    fn are_enemies(&self, a: FactionId, b: FactionId) -> bool;
}

/// A simple table of named factions with a symmetric enemy relation.
#[derive(Debug, Clone, Default)]
pub struct FactionTable {
    names: Vec<String>,
    enemies: HashSet<(FactionId, FactionId)>,
}

impl FactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>) -> FactionId {
        self.names.push(name.into());
        FactionId(self.names.len() as i32 - 1)
    }

    pub fn id_of(&self, name: &str) -> Option<FactionId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| FactionId(i as i32))
    }

    pub fn name(&self, id: FactionId) -> Option<&str> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    pub fn set_enemies(&mut self, a: FactionId, b: FactionId) {
        self.enemies.insert((a, b));
        self.enemies.insert((b, a));
    }
}

impl FactionRegistry for FactionTable {
    fn is_faction(&self, id: FactionId) -> bool {
        self.name(id).is_some()
    }

    fn are_enemies(&self, a: FactionId, b: FactionId) -> bool {
        self.enemies.contains(&(a, b))
    }
}
