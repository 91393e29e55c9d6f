//! Enumeration types used throughout the galaxy runtime.

use serde::{Deserialize, Serialize};

use crate::error::ClassParseError;

/// Planet or station classification.
///
/// Planets use letters, stations use the digits `0`-`3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    X,
    Y,
    Z,
    StationA,
    StationB,
    StationC,
    StationD,
}

impl PlanetClass {
    /// The character this class is written as in galaxy data.
    pub fn as_char(self) -> char {
        match self {
            PlanetClass::A => 'A',
            PlanetClass::B => 'B',
            PlanetClass::C => 'C',
            PlanetClass::D => 'D',
            PlanetClass::E => 'E',
            PlanetClass::F => 'F',
            PlanetClass::G => 'G',
            PlanetClass::H => 'H',
            PlanetClass::I => 'I',
            PlanetClass::J => 'J',
            PlanetClass::K => 'K',
            PlanetClass::L => 'L',
            PlanetClass::M => 'M',
            PlanetClass::N => 'N',
            PlanetClass::O => 'O',
            PlanetClass::P => 'P',
            PlanetClass::Q => 'Q',
            PlanetClass::R => 'R',
            PlanetClass::S => 'S',
            PlanetClass::T => 'T',
            PlanetClass::X => 'X',
            PlanetClass::Y => 'Y',
            PlanetClass::Z => 'Z',
            PlanetClass::StationA => '0',
            PlanetClass::StationB => '1',
            PlanetClass::StationC => '2',
            PlanetClass::StationD => '3',
        }
    }

    pub fn is_station(self) -> bool {
        matches!(
            self,
            PlanetClass::StationA
                | PlanetClass::StationB
                | PlanetClass::StationC
                | PlanetClass::StationD
        )
    }
}

impl TryFrom<char> for PlanetClass {
    type Error = ClassParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let class = match c {
            'A' => PlanetClass::A,
            'B' => PlanetClass::B,
            'C' => PlanetClass::C,
            'D' => PlanetClass::D,
            'E' => PlanetClass::E,
            'F' => PlanetClass::F,
            'G' => PlanetClass::G,
            'H' => PlanetClass::H,
            'I' => PlanetClass::I,
            'J' => PlanetClass::J,
            'K' => PlanetClass::K,
            'L' => PlanetClass::L,
            'M' => PlanetClass::M,
            'N' => PlanetClass::N,
            'O' => PlanetClass::O,
            'P' => PlanetClass::P,
            'Q' => PlanetClass::Q,
            'R' => PlanetClass::R,
            'S' => PlanetClass::S,
            'T' => PlanetClass::T,
            'X' => PlanetClass::X,
            'Y' => PlanetClass::Y,
            'Z' => PlanetClass::Z,
            '0' => PlanetClass::StationA,
            '1' => PlanetClass::StationB,
            '2' => PlanetClass::StationC,
            '3' => PlanetClass::StationD,
            other => return Err(ClassParseError(other)),
        };
        Ok(class)
    }
}

/// Whether an asset exists in space or is a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetReality {
    /// Has a position; takes part in presence and graph logic.
    Real,
    /// Placeholder with no spatial presence.
    #[default]
    Unreal,
}

/// Chain state of a spawn schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainMode {
    #[default]
    None,
    /// Follow-up fleet during normal play.
    Normal,
    /// Follow-up fleet rolled during the system bootstrap.
    Init,
}

/// Mode a scheduler pass runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitMode {
    /// Regular per-tick pass.
    #[default]
    Normal,
    /// Second bootstrap pass: fire whatever the first pass armed.
    InitNoSpawn,
    /// First bootstrap pass: pre-roll a mid-simulation state.
    InitSpawn,
}

/// Kind of map marker placed on a system by missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SysMarker {
    Misc,
    Rush,
    Cargo,
}

/// How an injected fleet enters the current system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalMode {
    /// Arrives through a jump point.
    Hyperspace,
    /// Starts sitting on a friendly planet.
    Landed,
    /// Starts near a friendly planet, flying toward it.
    Approach,
}
