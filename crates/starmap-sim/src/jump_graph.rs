//! Jump graph — target resolution and jump point geometry.
//!
//! Jump points store a durable `target_id`. After every bulk load, and
//! whenever the system store reallocates, [`reconstruct`] re-validates the
//! targets and re-derives headings, auto-positions and sprite cells.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use starmap_core::config::{HyperspaceConfig, SpriteSheetConfig};
use starmap_core::entities::JumpPoint;
use starmap_core::error::GalaxyError;
use starmap_core::types::{heading_of, polar, SystemId};

use crate::store::EntityStore;

/// Where and how a pilot drops out of hyperspace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpInPlacement {
    pub pos: DVec2,
    pub vel: DVec2,
    pub heading: f64,
}

/// Bind every jump point to its target. Edges whose target does not exist
/// are left unresolved and reported.
pub fn resolve(store: &mut EntityStore) -> Vec<GalaxyError> {
    let count = store.system_count();
    let mut errors = Vec::new();

    for sys in store.systems_mut() {
        for jp in &mut sys.jumps {
            if jp.target_id.0 < count {
                jp.target = Some(jp.target_id);
            } else {
                jp.target = None;
                warn!(
                    target: "starmap::graph",
                    system = %sys.name,
                    target_id = jp.target_id.0,
                    "jump target does not exist"
                );
                errors.push(GalaxyError::UnresolvedJump {
                    system: sys.name.clone(),
                    target_id: jp.target_id,
                });
            }
        }
    }
    errors
}

/// Derive heading, auto-position and sprite cell of every resolved jump.
pub fn derive_geometry(store: &mut EntityStore, sheet: SpriteSheetConfig) {
    let positions: Vec<DVec2> = store.systems().iter().map(|s| s.pos).collect();

    for sys in store.systems_mut() {
        let origin = sys.pos;
        let radius = sys.radius;
        for jp in &mut sys.jumps {
            let Some(target_pos) = jp.target.and_then(|t| positions.get(t.0)) else {
                continue;
            };
            let heading = heading_of(*target_pos - origin);
            if jp.is_autopos() {
                jp.pos = polar(radius, heading);
            }
            jp.heading = heading;
            jp.sprite = sprite_from_dir(sheet, heading);
            jp.angle = TAU - heading;
            jp.cosa = jp.angle.cos();
            jp.sina = jp.angle.sin();
        }
    }
}

/// Resolve targets then derive geometry.
pub fn reconstruct(store: &mut EntityStore, sheet: SpriteSheetConfig) -> Vec<GalaxyError> {
    let errors = resolve(store);
    derive_geometry(store, sheet);
    errors
}

/// Sprite sheet cell `(column, row)` for a direction.
///
/// Each cell covers an equal slice of the circle, centred on its angle.
pub fn sprite_from_dir(sheet: SpriteSheetConfig, dir: f64) -> (u32, u32) {
    let cells = (sheet.columns * sheet.rows).max(1);
    let columns = sheet.columns.max(1);
    let shard = TAU / f64::from(cells);
    let rdir = dir + shard / 2.0;
    let index = ((rdir / shard) as u32) % cells;
    (index % columns, index / columns)
}

/// The jump point in `from` leading to `to`.
pub fn find_jump(store: &EntityStore, from: SystemId, to: SystemId) -> Option<&JumpPoint> {
    store
        .system(from)?
        .jumps
        .iter()
        .find(|jp| jp.target == Some(to))
}

/// Whether a pilot at `pos` is close enough to `jp` to jump.
pub fn can_hyperspace(pos: DVec2, jp: &JumpPoint) -> bool {
    pos.distance_squared(jp.pos) <= jp.radius * jp.radius
}

/// Compute where a pilot entering `in_sys` from `out_sys` appears.
///
/// The pilot appears beyond the jump point along its outward heading, at a
/// distance drawn from the configured band plus a jitter of half the jump
/// radius, flying back toward the system centre at hyperspace speed.
pub fn calc_jump_in_pos(
    store: &EntityStore,
    in_sys: SystemId,
    out_sys: SystemId,
    hyperspace: &HyperspaceConfig,
    rng: &mut ChaCha8Rng,
) -> Result<JumpInPlacement, GalaxyError> {
    let name_of = |id: SystemId| {
        store
            .system(id)
            .map_or_else(|| id.to_string(), |s| s.name.clone())
    };

    let Some(jp) = find_jump(store, in_sys, out_sys) else {
        let err = GalaxyError::NotConnected {
            from: name_of(in_sys),
            to: name_of(out_sys),
        };
        warn!(target: "starmap::graph", error = %err, "jump in position unavailable");
        return Err(err);
    };

    let outward = TAU - jp.angle;
    let distance = if hyperspace.enter_max > hyperspace.enter_min {
        rng.gen_range(hyperspace.enter_min..hyperspace.enter_max)
    } else {
        hyperspace.enter_min
    };
    let error_angle = rng.gen_range(0.0..TAU);
    let pos = jp.pos + polar(distance, outward) + polar(jp.radius / 2.0, error_angle);

    let heading = (outward + PI).rem_euclid(TAU);
    let vel = polar(hyperspace.velocity, heading);

    Ok(JumpInPlacement { pos, vel, heading })
}
