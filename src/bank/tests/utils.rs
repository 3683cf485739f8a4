use crate::airport::{HubKey, ReferenceData, base_code};
use crate::bank::bank::Bank;
use crate::bank::slots::{HubSlot, build_slots};
use crate::bank::store::ManualBlockStore;
use crate::config::SimulationParams;
use crate::dataset::{AirportDataset, ImportLeg, ImportRow};
use crate::flight::{Direction, FlightRecord};
use crate::time::Time;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn hub(code: &str) -> HubKey {
    HubKey::new(code)
}

pub fn t(s: &str) -> Time {
    Time::parse(s).unwrap()
}

pub fn flight(
    flight_id: &str,
    port: &str,
    direction: Direction,
    time: &str,
    weekly_frequency: u8,
    flight_number: Option<&str>,
) -> FlightRecord {
    FlightRecord {
        id: id(flight_id),
        port_code: base_code(port),
        direction,
        weekly_frequency,
        seats: 180,
        passengers: None,
        region: ReferenceData::default().region_of(port),
        airline: Some(id("6E")),
        flight_number: flight_number.map(id),
        hub_time: t(time),
        is_manual: false,
        original_anchor_time: None,
        promoted_from: None,
    }
}

pub fn manual(
    flight_id: &str,
    port: &str,
    direction: Direction,
    anchor: &str,
    time: &str,
    airline: &str,
) -> FlightRecord {
    FlightRecord {
        is_manual: true,
        original_anchor_time: Some(t(anchor)),
        airline: Some(id(airline)),
        ..flight(flight_id, port, direction, time, 7, None)
    }
}

pub fn slots_of(flights: &[FlightRecord]) -> Vec<HubSlot> {
    build_slots(&hub("BLR"), flights, &ManualBlockStore::default())
}

pub fn leg(port: &str, time: &str, airline: &str, flight_number: Option<&str>) -> ImportLeg {
    ImportLeg {
        port_code: base_code(port),
        hub_time: t(time),
        weekly_frequency: 7,
        seats: 180,
        passengers: Some(150),
        airline: Some(id(airline)),
        flight_number: flight_number.map(id),
    }
}

pub fn arrival(leg: ImportLeg) -> ImportRow {
    ImportRow {
        arrival: Some(leg),
        departure: None,
    }
}

pub fn departure(leg: ImportLeg) -> ImportRow {
    ImportRow {
        arrival: None,
        departure: Some(leg),
    }
}

pub fn dataset(code: &str, rows: Vec<ImportRow>) -> AirportDataset {
    AirportDataset::new(hub(code), rows)
}

pub fn bank(datasets: Vec<AirportDataset>) -> Bank {
    Bank::new(datasets, ReferenceData::default(), SimulationParams::default())
}

pub fn arb_port() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("DEL"), Just("BOM"), Just("DXB"), Just("COK"), Just("SIN")]
}

pub fn arb_flight() -> impl Strategy<Value = FlightRecord> {
    (
        arb_port(),
        prop_oneof![Just(Direction::Arrival), Just(Direction::Departure)],
        0..1440i64,
        0..8u8,
        prop_oneof![Just(None), Just(Some("100")), Just(Some("200"))],
    )
        .prop_map(|(port, direction, minutes, freq, number)| FlightRecord {
            hub_time: Time::new(minutes),
            ..flight("F", port, direction, "00:00", freq, number)
        })
}

/// Gives generated flights distinct ids in input order.
pub fn with_ids(flights: Vec<FlightRecord>) -> Vec<FlightRecord> {
    flights
        .into_iter()
        .enumerate()
        .map(|(i, f)| FlightRecord {
            id: id(&format!("F{}", i)),
            ..f
        })
        .collect()
}
