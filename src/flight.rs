use crate::airport::{PortCode, Region};
use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type FlightId = Arc<str>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Arrival,
    Departure,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Arrival => Direction::Departure,
            Direction::Departure => Direction::Arrival,
        }
    }

    pub fn tag(self) -> char {
        match self {
            Direction::Arrival => 'A',
            Direction::Departure => 'D',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Arrival => write!(f, "ARR"),
            Direction::Departure => write!(f, "DEP"),
        }
    }
}

/// One scheduled movement at a hub. `port_code` is the other end of the leg.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: FlightId,
    pub port_code: PortCode,
    pub direction: Direction,
    pub weekly_frequency: u8,
    pub seats: u32,
    pub passengers: Option<u32>,
    pub region: Region,
    pub airline: Option<Arc<str>>,
    pub flight_number: Option<Arc<str>>,
    pub hub_time: Time,
    pub is_manual: bool,
    pub original_anchor_time: Option<Time>,
    /// Imported flight this manual record replaces in its hub's slots.
    #[serde(default)]
    pub promoted_from: Option<FlightId>,
}

impl FlightRecord {
    pub const MAX_WEEKLY_FREQUENCY: u8 = 7;

    pub fn clamp_frequency(frequency: u32) -> u8 {
        frequency.min(Self::MAX_WEEKLY_FREQUENCY as u32) as u8
    }

    /// Identity of the physical service, used to pick one best pairing per flight:
    /// airline and flight number, or the record id when there is no number.
    pub fn service_key(&self) -> (Option<&str>, &str) {
        match self.flight_number.as_deref() {
            Some(number) => (self.airline.as_deref(), number),
            None => (None, &self.id),
        }
    }

    pub fn same_airline(&self, airline: Option<&str>) -> bool {
        match (self.airline.as_deref(), airline) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        }
    }

    pub fn label(&self) -> String {
        match (&self.airline, &self.flight_number) {
            (Some(airline), Some(number)) => format!("{}{}", airline, number),
            (None, Some(number)) => number.to_string(),
            (Some(airline), None) => airline.to_string(),
            (None, None) => self.id.to_string(),
        }
    }
}

/// Two or more automatic flights to the same port in the same slot and direction.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedBlock {
    pub id: FlightId,
    pub port_code: PortCode,
    pub direction: Direction,
    pub region: Region,
    pub weekly_frequency: u32,
    pub seats: u32,
    pub passengers: Option<u32>,
    pub flights: Vec<FlightRecord>,
}

impl MergedBlock {
    pub fn new(id: FlightId, flights: Vec<FlightRecord>) -> Option<MergedBlock> {
        let first = flights.first()?;
        let passengers = flights
            .iter()
            .filter_map(|f| f.passengers)
            .reduce(|a, b| a + b);
        Some(MergedBlock {
            id,
            port_code: first.port_code.clone(),
            direction: first.direction,
            region: first.region,
            weekly_frequency: flights.iter().map(|f| f.weekly_frequency as u32).sum(),
            seats: flights.iter().map(|f| f.seats).sum(),
            passengers,
            flights,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Single(FlightRecord),
    Merged(MergedBlock),
}

impl Block {
    pub fn id(&self) -> &FlightId {
        match self {
            Block::Single(f) => &f.id,
            Block::Merged(m) => &m.id,
        }
    }

    pub fn port_code(&self) -> &PortCode {
        match self {
            Block::Single(f) => &f.port_code,
            Block::Merged(m) => &m.port_code,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Block::Single(f) => f.direction,
            Block::Merged(m) => m.direction,
        }
    }

    pub fn weekly_frequency(&self) -> u32 {
        match self {
            Block::Single(f) => f.weekly_frequency as u32,
            Block::Merged(m) => m.weekly_frequency,
        }
    }

    pub fn seats(&self) -> u32 {
        match self {
            Block::Single(f) => f.seats,
            Block::Merged(m) => m.seats,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Block::Single(f) if f.is_manual)
    }

    /// Individual flights behind this block; connection analysis never looks at merged sums.
    pub fn flights(&self) -> &[FlightRecord] {
        match self {
            Block::Single(f) => std::slice::from_ref(f),
            Block::Merged(m) => &m.flights,
        }
    }
}
