//! Drone domain records
//!
//! Field names follow the drone vocabulary on the wire (`DroneID`,
//! `DroneState`, ...). Numeric fields travel as text and decode from text or
//! JSON numbers. Fields the agent does not model are kept in `extra`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::codec::Entity;

/// Unparseable textual wire value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("INVALID POSITION {0:?}, EXPECTED \"x,y\"")]
    Position(String),

    #[error("INVALID DIRECTION {0:?}")]
    Direction(String),

    #[error("INVALID STATUS {0:?}")]
    Status(String),
}

/// Numbers written as text, read from text or JSON numbers
mod wire_number {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: fmt::Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: fmt::Display,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(serde_json::Number),
        }

        let text = match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text,
            Repr::Number(number) => number.to_string(),
        };
        text.trim().parse().map_err(de::Error::custom)
    }
}

/// Serialize through `Display`, deserialize through `FromStr`
macro_rules! textual_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }
    };
}

/// 2D coordinate, `"x,y"` on the wire
///
/// Coordinates are held as numbers, so re-encoding writes the shortest form:
/// `"1.50,+2"` reads back as `"1.5,2"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Position(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self { x, y })
    }
}

textual_serde!(Position);

/// Compass heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    N,
    E,
    S,
    W,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::N => "N",
            Self::E => "E",
            Self::S => "S",
            Self::W => "W",
        };
        f.write_str(letter)
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Self::N),
            "e" | "east" => Ok(Self::E),
            "s" | "south" => Ok(Self::S),
            "w" | "west" => Ok(Self::W),
            _ => Err(ParseError::Direction(s.to_string())),
        }
    }
}

textual_serde!(Direction);

/// Operating status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DroneStatus {
    #[default]
    Active,
    Charging,
    #[serde(rename = "Low Battery", alias = "LowBattery")]
    LowBattery,
    Scanning,
    Off,
}

impl fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "Active",
            Self::Charging => "Charging",
            Self::LowBattery => "Low Battery",
            Self::Scanning => "Scanning",
            Self::Off => "Off",
        };
        f.write_str(name)
    }
}

impl FromStr for DroneStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();
        match folded.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "charging" => Ok(Self::Charging),
            "lowbattery" => Ok(Self::LowBattery),
            "scanning" => Ok(Self::Scanning),
            "off" => Ok(Self::Off),
            _ => Err(ParseError::Status(s.to_string())),
        }
    }
}

/// Live state, embedded in [`Drone`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneState {
    #[serde(rename = "Speed", with = "wire_number")]
    pub speed: f64,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "Battery", with = "wire_number")]
    pub battery: u32,
    #[serde(rename = "Direction")]
    pub direction: Direction,
    #[serde(rename = "Status", alias = "SensorStatus")]
    pub status: DroneStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DroneState {
    pub fn new(
        speed: f64,
        position: Position,
        battery: u32,
        direction: Direction,
        status: DroneStatus,
    ) -> Self {
        Self {
            speed,
            position,
            battery,
            direction,
            status,
            extra: Map::new(),
        }
    }
}

/// Root aggregate held by the drone server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    #[serde(rename = "DroneID", with = "wire_number")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "MaxSpeed", with = "wire_number")]
    pub max_speed: f64,
    #[serde(rename = "Sensor")]
    pub sensor: String,
    #[serde(rename = "DroneState")]
    pub state: DroneState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Drone {
    /// Placeholder record pushed when the agent first registers
    pub fn bootstrap_default() -> Self {
        Self {
            id: -1000,
            name: "Drone 1".to_string(),
            model: "xyz".to_string(),
            max_speed: 130.0,
            sensor: "Temperature".to_string(),
            state: DroneState::new(100.0, Position::origin(), 100, Direction::N, DroneStatus::Active),
            extra: Map::new(),
        }
    }
}

impl Entity for Drone {
    const TYPE_TERM: &'static str = "Drone";
    const NESTED: &'static [(&'static str, &'static str)] = &[("DroneState", "State")];
}

/// Standalone state addressed to one drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneStateReport {
    #[serde(rename = "DroneID", with = "wire_number")]
    pub drone_id: i64,
    #[serde(flatten)]
    pub state: DroneState,
}

impl DroneStateReport {
    pub fn new(drone_id: i64, state: DroneState) -> Self {
        Self { drone_id, state }
    }

    /// The state without its drone id
    pub fn into_state(self) -> DroneState {
        self.state
    }
}

impl Entity for DroneStateReport {
    const TYPE_TERM: &'static str = "State";
}

/// Telemetry snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datastream {
    #[serde(rename = "Temperature", with = "wire_number")]
    pub temperature: f64,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "DroneID", with = "wire_number")]
    pub drone_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Datastream {
    pub fn new(temperature: f64, position: Position, drone_id: i64) -> Self {
        Self {
            temperature,
            position,
            drone_id,
            extra: Map::new(),
        }
    }
}

impl Entity for Datastream {
    const TYPE_TERM: &'static str = "Datastream";
}

/// Instruction for a drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "DroneID", with = "wire_number")]
    pub drone_id: i64,
    #[serde(rename = "State")]
    pub state: DroneState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Command {
    pub fn new(drone_id: i64, state: DroneState) -> Self {
        Self {
            drone_id,
            state,
            extra: Map::new(),
        }
    }
}

impl Entity for Command {
    const TYPE_TERM: &'static str = "Command";
    const NESTED: &'static [(&'static str, &'static str)] = &[("State", "State")];
}

/// Central controller position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerLocation {
    #[serde(rename = "Location")]
    pub location: Position,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ControllerLocation {
    const TYPE_TERM: &'static str = "Location";
}
