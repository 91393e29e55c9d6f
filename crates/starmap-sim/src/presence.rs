//! Presence engine — faction presence accumulation and spill.
//!
//! Adding presence to a system also spills a decaying share of it across
//! the jump graph, breadth-first, for `range` hops. Removal is the same
//! operation with a negated amount, so a removal must use exactly the
//! range of the matching add or the ledger drifts.

use std::collections::VecDeque;

use tracing::{trace, warn};

use starmap_core::constants::PRESENCE_SPILL_BASE;
use starmap_core::error::GalaxyError;
use starmap_core::types::{FactionId, SystemId};

use crate::factions::FactionRegistry;
use crate::store::EntityStore;

/// Add `amount` of `faction` presence to `sys` and spill it `range` hops out.
///
/// Invalid factions and zero amounts are ignored. A system without jump
/// points keeps its direct contribution and reports `NoJumpPoints`.
pub fn add_presence(
    store: &mut EntityStore,
    factions: &dyn FactionRegistry,
    sys: SystemId,
    faction: FactionId,
    amount: f64,
    range: i32,
) -> Result<(), GalaxyError> {
    let Some(origin) = store.system_mut(sys) else {
        warn!(target: "starmap::presence", system = sys.0, "presence on unknown system");
        return Err(GalaxyError::UnknownSystemIndex(sys.0));
    };
    if !factions.is_faction(faction) || amount == 0.0 {
        return Ok(());
    }

    origin.presence_row_mut(faction).value += amount;
    if range < 1 {
        origin.prune_presence();
        return Ok(());
    }

    let touched = spill(store, sys, faction, amount, range);
    for id in &touched {
        if let Some(system) = store.system_mut(*id) {
            system.prune_presence();
        }
    }

    if touched.len() == 1 {
        let name = store.system(sys).map(|s| s.name.clone()).unwrap_or_default();
        warn!(
            target: "starmap::presence",
            system = %name,
            "no adjacent systems to spill presence into"
        );
        return Err(GalaxyError::NoJumpPoints(name));
    }
    Ok(())
}

/// Breadth-first decay spill. Returns every system touched, origin first.
fn spill(
    store: &mut EntityStore,
    origin: SystemId,
    faction: FactionId,
    amount: f64,
    range: i32,
) -> Vec<SystemId> {
    let mut visited = vec![false; store.system_count()];
    let mut touched = vec![origin];
    let mut queue = VecDeque::new();
    let mut next = VecDeque::new();

    visited[origin.0] = true;
    enqueue_neighbors(store, origin, &mut visited, &mut queue);
    if queue.is_empty() {
        return touched;
    }

    let mut depth = 0;
    while depth < range {
        let Some(cur) = queue.pop_front() else {
            break;
        };
        enqueue_neighbors(store, cur, &mut visited, &mut next);

        let share = amount / (PRESENCE_SPILL_BASE + f64::from(depth));
        if let Some(system) = store.system_mut(cur) {
            system.presence_row_mut(faction).value += share;
            trace!(
                target: "starmap::presence",
                system = %system.name,
                faction = faction.0,
                depth,
                share,
                "presence spilled"
            );
        }
        touched.push(cur);

        if queue.is_empty() {
            depth += 1;
            std::mem::swap(&mut queue, &mut next);
        }
    }
    touched
}

/// Queue the unvisited neighbors of `sys`, marking them on enqueue.
fn enqueue_neighbors(
    store: &EntityStore,
    sys: SystemId,
    visited: &mut [bool],
    queue: &mut VecDeque<SystemId>,
) {
    let Some(system) = store.system(sys) else {
        return;
    };
    for neighbor in system.neighbors() {
        if let Some(seen) = visited.get_mut(neighbor.0) {
            if !*seen {
                *seen = true;
                queue.push_back(neighbor);
            }
        }
    }
}

/// Presence of `faction` in `sys`; zero when absent or the system is unknown.
pub fn get_presence(store: &EntityStore, sys: SystemId, faction: FactionId) -> f64 {
    match store.system(sys) {
        Some(system) => system.presence_value(faction),
        None => {
            warn!(target: "starmap::presence", system = sys.0, "presence query on unknown system");
            0.0
        }
    }
}

/// Seed presence from every real planet attached to `sys`.
pub fn add_all_planets_presence(
    store: &mut EntityStore,
    factions: &dyn FactionRegistry,
    sys: SystemId,
) -> Result<(), GalaxyError> {
    let Some(system) = store.system(sys) else {
        warn!(target: "starmap::presence", system = sys.0, "presence on unknown system");
        return Err(GalaxyError::UnknownSystemIndex(sys.0));
    };
    let seeds: Vec<(FactionId, f64, i32)> = system
        .planets
        .iter()
        .filter_map(|id| store.planet(*id))
        .filter(|planet| planet.is_real())
        .map(|planet| (planet.faction, planet.presence_amount, planet.presence_range))
        .collect();

    for (faction, amount, range) in seeds {
        // An isolated system keeps its direct presence; the warning is enough.
        let _ = add_presence(store, factions, sys, faction, amount, range);
    }
    Ok(())
}
