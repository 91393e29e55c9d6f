//! Error types reported by the galaxy runtime.
//!
//! Nothing here unwinds across component boundaries: callers log the error
//! and carry on best-effort.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::SystemId;

/// A planet class character outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid planet class '{0}'")]
pub struct ClassParseError(pub char);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GalaxyError {
    #[error("star system '{0}' not found")]
    UnknownSystem(String),
    #[error("star system index {0} out of range")]
    UnknownSystemIndex(usize),
    #[error("planet '{0}' not found")]
    UnknownPlanet(String),
    #[error("star system '{0}' already exists")]
    DuplicateSystem(String),
    #[error("planet '{0}' already exists")]
    DuplicatePlanet(String),
    #[error("jump point in '{system}' targets unknown system {target_id}")]
    UnresolvedJump { system: String, target_id: SystemId },
    #[error("jump point in '{system}' has unknown target '{target}'")]
    MissingTarget { system: String, target: String },
    #[error("unable to find jump in point for '{to}' in '{from}': not connected")]
    NotConnected { from: String, to: String },
    #[error("planet '{planet}' not found in system '{system}'")]
    PlanetNotInSystem { planet: String, system: String },
    #[error("planet '{planet}' is already attached to system '{system}'")]
    PlanetAlreadyAttached { planet: String, system: String },
    #[error("fleet '{fleet}' not assigned to system '{system}'")]
    FleetNotInSystem { fleet: String, system: String },
    #[error("star system '{0}' has no jump points")]
    NoJumpPoints(String),
    #[error("no current system to re-enter")]
    NoCurrentSystem,
}

/// Fatal problems with a bulk galaxy definition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("galaxy definition contains no star systems")]
    NoSystems,
    #[error("galaxy already holds {0} star systems; clear it before loading")]
    AlreadyLoaded(usize),
    #[error("failed to parse galaxy definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Galaxy(#[from] GalaxyError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse galaxy config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read galaxy config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("hyperspace band is empty: enter_min {min} > enter_max {max}")]
    InvalidHyperspaceBand { min: f64, max: f64 },
}
