use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Screen point the phone taps to actuate a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    /// Creates a new `Coordinate`.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One of the four physical gates the bridge can open.
///
/// Serialized as its bare number (`1`..=`4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GateId {
    One,
    Two,
    Three,
    Four,
}

impl GateId {
    /// Every gate, in id order.
    pub const ALL: [GateId; 4] = [GateId::One, GateId::Two, GateId::Three, GateId::Four];

    /// Numeric id as it appears in URLs.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            GateId::One => 1,
            GateId::Two => 2,
            GateId::Three => 3,
            GateId::Four => 4,
        }
    }

    /// Fixed point sent to the phone for this gate.
    #[must_use]
    pub const fn coordinate(self) -> Coordinate {
        match self {
            GateId::One => Coordinate::new(300, 615),
            GateId::Two => Coordinate::new(300, 1050),
            GateId::Three => Coordinate::new(800, 615),
            GateId::Four => Coordinate::new(800, 1050),
        }
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl From<GateId> for u8 {
    fn from(gate: GateId) -> Self {
        gate.number()
    }
}

impl TryFrom<u8> for GateId {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GateId::One),
            2 => Ok(GateId::Two),
            3 => Ok(GateId::Three),
            4 => Ok(GateId::Four),
            other => Err(CoreError::UnknownGate { raw: other.to_string() }),
        }
    }
}

impl FromStr for GateId {
    type Err = CoreError;

    /// Parses a URL path segment such as `"2"`.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownGate`] for anything that is not an integer
    /// naming one of the four gates.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CoreError::UnknownGate { raw: s.to_owned() };
        let n: i64 = s.trim().parse().map_err(|_| unknown())?;
        u8::try_from(n)
            .ok()
            .and_then(|n| GateId::try_from(n).ok())
            .ok_or_else(unknown)
    }
}
