//! Spawn scheduler — per-faction fleet timers of the current system.
//!
//! Each presence row runs a small state machine: Idle (no pending fleet)
//! draws a fleet and arms a countdown; Armed counts down and fires when the
//! timer runs out. Fired fleets are returned to the caller for injection.
//!
//! A row's `value` is the faction's budget in the system. The delay before a
//! fleet arrives grows with the share of the budget it consumes, and a fleet
//! that leaves budget over may chain an immediate follow-up.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use starmap_core::config::SpawnConfig;
use starmap_core::defs::FleetSpec;
use starmap_core::entities::{StarSystem, SystemPresence};
use starmap_core::enums::{ChainMode, InitMode};

use crate::fleet::FleetFactory;

/// Advance every presence row of `system` by `dt` seconds.
///
/// Returns the fleets that fired this pass, in row order.
pub fn run(
    system: &mut StarSystem,
    dt: f64,
    mode: InitMode,
    factory: &mut dyn FleetFactory,
    rng: &mut ChaCha8Rng,
    config: &SpawnConfig,
) -> Vec<FleetSpec> {
    let mut fired = Vec::new();
    for row in &mut system.presence {
        if let Some(fleet) = tick_row(row, dt, mode, factory, rng, config) {
            debug!(
                target: "starmap::scheduler",
                system = %system.name,
                faction = row.faction.0,
                fleet = %fleet.name,
                "fleet spawn due"
            );
            fired.push(fleet);
        }
    }
    fired
}

/// Advance a single row. Returns the fleet if its timer expired.
pub fn tick_row(
    row: &mut SystemPresence,
    dt: f64,
    mode: InitMode,
    factory: &mut dyn FleetFactory,
    rng: &mut ChaCha8Rng,
    config: &SpawnConfig,
) -> Option<FleetSpec> {
    // Armed: count down and fire.
    if row.schedule.pending.is_some() {
        row.schedule.time_remaining -= dt;
        if row.schedule.time_remaining <= 0.0 {
            return row.schedule.pending.take();
        }
        return None;
    }

    // Idle: only draw while chaining or while budget is left.
    if row.schedule.chain == ChainMode::None && row.cur_used >= row.value {
        return None;
    }

    let Some(fleet) = factory.draw(row.faction, rng) else {
        // Nothing to send; stop asking for the rest of the visit.
        row.cur_used = row.value;
        debug!(
            target: "starmap::scheduler",
            faction = row.faction.0,
            "no fleet available, row frozen"
        );
        return None;
    };
    arm(row, fleet, mode, rng, config);
    None
}

/// Compute the countdown for a freshly drawn fleet and decide on chaining.
fn arm(
    row: &mut SystemPresence,
    fleet: FleetSpec,
    mode: InitMode,
    rng: &mut ChaCha8Rng,
    config: &SpawnConfig,
) {
    let strength = fleet.strength;
    let schedule = &mut row.schedule;

    let ratio = strength / row.value;
    let spread: f64 = rng.gen();
    let mut time = (ratio * config.time_factor + schedule.penalty)
        * (1.0 + config.jitter * (spread - 0.5));
    time += schedule.penalty;

    // Bootstrap rolls may place the fleet already in flight.
    let escalated = mode == InitMode::InitSpawn || schedule.chain == ChainMode::Init;
    if escalated {
        time *= rng.gen::<f64>() * 2.0 - 1.0;
        if time < 0.0 {
            time = 0.0;
        }
    }

    schedule.penalty = (ratio - 1.0).max(0.0);

    let chain_probability = (row.cur_used + strength) / row.value;
    if rng.gen::<f64>() > chain_probability {
        schedule.chain = if escalated {
            ChainMode::Init
        } else {
            ChainMode::Normal
        };
        schedule.penalty = time;
        time = 0.0;
    } else {
        schedule.chain = ChainMode::None;
    }

    row.cur_used += strength;
    schedule.time_remaining = time;
    schedule.pending = Some(fleet);
}
