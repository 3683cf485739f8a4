use crate::airport::{HubKey, PortCode, ReferenceData, base_code};
use crate::flight::{Direction, FlightId, FlightRecord};
use crate::time::{SLOTS_PER_DAY, Time};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// One half of an imported bank row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportLeg {
    pub port_code: PortCode,
    pub hub_time: Time,
    pub weekly_frequency: u8,
    #[serde(default)]
    pub seats: u32,
    #[serde(default)]
    pub passengers: Option<u32>,
    #[serde(default)]
    pub airline: Option<Arc<str>>,
    #[serde(default)]
    pub flight_number: Option<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub arrival: Option<ImportLeg>,
    #[serde(default)]
    pub departure: Option<ImportLeg>,
}

impl ImportRow {
    pub fn leg(&self, direction: Direction) -> Option<&ImportLeg> {
        match direction {
            Direction::Arrival => self.arrival.as_ref(),
            Direction::Departure => self.departure.as_ref(),
        }
    }
}

/// A hub and the rows imported for it. Read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AirportDataset {
    pub port_code: HubKey,
    pub rows: Vec<ImportRow>,
}

impl AirportDataset {
    pub fn new(port_code: HubKey, rows: Vec<ImportRow>) -> AirportDataset {
        AirportDataset { port_code, rows }
    }

    pub fn flight_id(&self, direction: Direction, row: usize) -> FlightId {
        Arc::from(format!("{}-{}{}", self.port_code, direction.tag(), row))
    }

    /// Every imported leg as an automatic flight, in row order.
    pub fn flights(&self, reference: &ReferenceData) -> Vec<FlightRecord> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(idx, row)| {
                [Direction::Arrival, Direction::Departure]
                    .into_iter()
                    .filter_map(move |d| row.leg(d).map(|leg| (idx, d, leg)))
            })
            .map(|(idx, direction, leg)| FlightRecord {
                id: self.flight_id(direction, idx),
                port_code: base_code(&leg.port_code),
                direction,
                weekly_frequency: leg.weekly_frequency.min(FlightRecord::MAX_WEEKLY_FREQUENCY),
                seats: leg.seats,
                passengers: leg.passengers,
                region: reference.region_of(&leg.port_code),
                airline: leg.airline.clone(),
                flight_number: leg.flight_number.clone(),
                hub_time: leg.hub_time,
                is_manual: false,
                original_anchor_time: None,
                promoted_from: None,
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawLeg {
    port_code: String,
    #[serde(default)]
    hub_time: Option<String>,
    /// Hour bucket the leg was filed under; used when `hub_time` is absent or malformed.
    #[serde(default)]
    slot: Option<usize>,
    #[serde(default)]
    weekly_frequency: u32,
    #[serde(default)]
    seats: u32,
    #[serde(default)]
    passengers: Option<u32>,
    #[serde(default)]
    airline: Option<String>,
    #[serde(default)]
    flight_number: Option<String>,
}

#[derive(Deserialize)]
struct RawRow {
    #[serde(default)]
    arrival: Option<RawLeg>,
    #[serde(default)]
    departure: Option<RawLeg>,
}

/// Importer-side shape of a hub dataset; legs keep their time as text until validated.
#[derive(Deserialize)]
pub struct RawDataset {
    port_code: String,
    #[serde(default)]
    rows: Vec<RawRow>,
}

impl RawLeg {
    fn validate(self, hub: &HubKey) -> Option<ImportLeg> {
        let hub_time = match (self.slot, self.hub_time.as_deref()) {
            (Some(slot), exact) if slot < SLOTS_PER_DAY => Time::minutes_of(slot, exact),
            (_, Some(exact)) => match Time::parse(exact) {
                Ok(t) => t,
                Err(e) => {
                    warn!(%hub, port = %self.port_code, "dropping import leg: {}", e);
                    return None;
                }
            },
            (_, None) => {
                warn!(%hub, port = %self.port_code, "dropping import leg without a time");
                return None;
            }
        };
        Some(ImportLeg {
            port_code: base_code(&self.port_code),
            hub_time,
            weekly_frequency: FlightRecord::clamp_frequency(self.weekly_frequency),
            seats: self.seats,
            passengers: self.passengers,
            airline: self.airline.map(Arc::from),
            flight_number: self.flight_number.map(Arc::from),
        })
    }
}

impl From<RawDataset> for AirportDataset {
    fn from(raw: RawDataset) -> Self {
        let hub = HubKey::new(&raw.port_code);
        let rows = raw
            .rows
            .into_iter()
            .map(|r| ImportRow {
                arrival: r.arrival.and_then(|l| l.validate(&hub)),
                departure: r.departure.and_then(|l| l.validate(&hub)),
            })
            .filter(|r| r.arrival.is_some() || r.departure.is_some())
            .collect();
        AirportDataset::new(hub, rows)
    }
}
