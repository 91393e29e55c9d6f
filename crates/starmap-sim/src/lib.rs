//! Galaxy runtime for STARMAP.
//!
//! Owns the star-system graph, propagates faction presence across it and
//! schedules fleet spawns in the player's current system. Pilots live in a
//! hecs world that is rebuilt on every system entry.

pub mod engine;
pub mod factions;
pub mod fleet;
pub mod galaxy;
pub mod jump_graph;
pub mod presence;
pub mod runtime;
pub mod scheduler;
pub mod store;
pub mod world_setup;

pub use engine::{SpaceConfig, SpaceEngine};
pub use galaxy::Galaxy;
pub use starmap_core as core;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod testing;
