//! Simulation constants and tuning defaults.
//!
//! Values that a galaxy config may override are mirrored in
//! `data/galaxy_config.json`; the config is the source of truth at runtime.

// --- Presence ---

/// Presence rows whose magnitude falls below this are pruned.
pub const PRESENCE_EPSILON: f64 = 1e-9;

/// Spill contribution at BFS depth `d` is `amount / (PRESENCE_SPILL_BASE + d)`.
pub const PRESENCE_SPILL_BASE: f64 = 2.0;

// --- Hyperspace ---

/// Minimum distance beyond a jump point at which fleets exit hyperspace.
pub const HYPERSPACE_ENTER_MIN: f64 = 1000.0;

/// Maximum distance beyond a jump point at which fleets exit hyperspace.
pub const HYPERSPACE_ENTER_MAX: f64 = 1500.0;

/// Speed of a pilot leaving hyperspace.
pub const HYPERSPACE_VEL: f64 = 2000.0;

// --- Spawn scheduling ---

/// Seconds of delay per unit of strength/presence ratio.
pub const SPAWN_TIME_FACTOR: f64 = 30.0;

/// Relative spread applied to each spawn delay (±half of this).
pub const SPAWN_TIME_JITTER: f64 = 0.4;

/// Formation spread per pilot, per axis.
pub const FORMATION_SPREAD_MIN: i32 = 75;
pub const FORMATION_SPREAD_MAX: i32 = 150;

/// Fraction of ship speed given to pilots spawned approaching a planet.
pub const APPROACH_SPEED_FACTOR: f64 = 0.5;

// --- Environment ---

/// Volatile nebula damage is `volatility² / VOLATILITY_DAMAGE_DIVISOR` per second.
pub const VOLATILITY_DAMAGE_DIVISOR: f64 = 500.0;

/// Interference level at (or above) which the display is always dark.
pub const INTERFERENCE_MAX: f64 = 1000.0;

/// Base interference re-roll interval (seconds) at zero interference.
pub const INTERFERENCE_TIMER_BASE: f64 = 3.0;

/// Alpha is considered settled once within this distance of its target.
pub const INTERFERENCE_EPSILON: f64 = 1e-5;

// --- Jump point sprite sheet ---

pub const JUMP_SPRITE_COLUMNS: u32 = 4;
pub const JUMP_SPRITE_ROWS: u32 = 4;

// --- Ships ---

/// Armor every ship starts a visit with.
pub const SHIP_ARMOR: f64 = 100.0;
