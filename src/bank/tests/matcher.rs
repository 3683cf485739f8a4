use crate::airport::{Market, ReferenceData, Region};
use crate::bank::matcher::{best_connections, transfer_time};
use crate::bank::tests::utils::{flight, id, slots_of, t};
use crate::config::ConnectionRules;
use crate::flight::Direction::{Arrival, Departure};
use crate::flight::FlightRecord;

const RULES: ConnectionRules = ConnectionRules { mct: 90, window: 360 };

fn connect(focal: &FlightRecord, others: &[FlightRecord]) -> Vec<(String, String, u16)> {
    let mut all = others.to_vec();
    all.push(focal.clone());
    best_connections(&[focal], &slots_of(&all), RULES, &ReferenceData::default())
        .into_iter()
        .map(|c| (c.port_code.to_string(), c.flight.id.to_string(), c.wait))
        .collect()
}

fn row(port: &str, id: &str, wait: u16) -> (String, String, u16) {
    (port.to_string(), id.to_string(), wait)
}

#[test]
fn test_mct_and_window_from_arrival() {
    let focal = flight("A1", "BOM", Arrival, "08:00", 7, None);
    let others = vec![
        flight("D1", "DEL", Departure, "10:00", 7, None),
        flight("D2", "COK", Departure, "09:00", 7, None),
    ];

    assert_eq!(vec![row("DEL", "D1", 120)], connect(&focal, &others));
}

#[test]
fn test_window_edges_are_inclusive() {
    let focal = flight("A1", "BOM", Arrival, "08:00", 7, None);
    let others = vec![
        flight("D1", "DEL", Departure, "09:30", 7, None),
        flight("D2", "COK", Departure, "15:30", 7, None),
        flight("D3", "DXB", Departure, "15:31", 7, None),
        flight("D4", "SIN", Departure, "09:29", 7, None),
    ];

    assert_eq!(
        vec![row("DEL", "D1", 90), row("COK", "D2", 450)],
        connect(&focal, &others)
    );
}

#[test]
fn test_arrival_connects_across_midnight() {
    let focal = flight("A1", "BOM", Arrival, "23:00", 7, None);
    let others = vec![
        flight("D1", "DEL", Departure, "01:00", 7, None),
        flight("D2", "DXB", Departure, "06:00", 7, None),
    ];

    assert_eq!(vec![row("DEL", "D1", 120), row("DXB", "D2", 420)], connect(&focal, &others));
}

#[test]
fn test_departure_looks_back_at_arrivals() {
    let focal = flight("D1", "DXB", Departure, "12:00", 7, None);
    let others = vec![
        flight("A1", "DEL", Arrival, "10:00", 7, None),
        flight("A2", "BOM", Arrival, "11:00", 7, None),
        flight("A3", "COK", Arrival, "04:00", 7, None),
        flight("A4", "SIN", Arrival, "04:30", 7, None),
    ];

    assert_eq!(
        vec![row("SIN", "A4", 450), row("DEL", "A1", 120)],
        connect(&focal, &others)
    );
}

#[test]
fn test_departure_window_wraps_before_midnight() {
    let focal = flight("D1", "DXB", Departure, "01:00", 7, None);
    let others = vec![flight("A1", "DEL", Arrival, "22:30", 7, None)];

    assert_eq!(vec![row("DEL", "A1", 150)], connect(&focal, &others));
}

#[test]
fn test_same_port_never_connects() {
    let focal = flight("A1", "DEL", Arrival, "08:00", 7, None);
    let others = vec![flight("D1", "DEL", Departure, "10:00", 7, None)];

    assert!(connect(&focal, &others).is_empty());
}

#[test]
fn test_best_per_flight_number_not_per_port() {
    let focal = flight("A1", "BOM", Arrival, "08:00", 7, None);
    let others = vec![
        flight("D1", "DXB", Departure, "10:10", 7, Some("1401")),
        flight("D2", "DXB", Departure, "09:40", 7, Some("1401")),
        flight("D3", "DXB", Departure, "11:00", 7, Some("1403")),
    ];

    assert_eq!(
        vec![row("DXB", "D2", 100), row("DXB", "D3", 180)],
        connect(&focal, &others)
    );
}

#[test]
fn test_shared_number_on_different_airlines_stays_apart() {
    let focal = flight("A1", "BOM", Arrival, "08:00", 7, None);
    let others = vec![
        FlightRecord { airline: Some(id("AI")), ..flight("D1", "DXB", Departure, "10:00", 7, Some("101")) },
        FlightRecord { airline: Some(id("EK")), ..flight("D2", "DXB", Departure, "12:00", 7, Some("101")) },
    ];

    assert_eq!(
        vec![row("DXB", "D1", 120), row("DXB", "D2", 240)],
        connect(&focal, &others)
    );
}

#[test]
fn test_ties_keep_first_encountered() {
    let focals = [
        flight("A1", "BOM", Arrival, "08:00", 7, None),
        flight("A2", "COK", Arrival, "08:00", 7, None),
    ];
    let departure = flight("D1", "DXB", Departure, "10:00", 7, None);
    let slots = slots_of(&[focals[0].clone(), focals[1].clone(), departure]);

    let connections = best_connections(
        &[&focals[0], &focals[1]],
        &slots,
        RULES,
        &ReferenceData::default(),
    );

    assert_eq!(1, connections.len());
    assert_eq!("A1", connections[0].focal_id.as_ref());
}

#[test]
fn test_merged_blocks_are_analysed_per_flight() {
    let focal = flight("A1", "BOM", Arrival, "08:00", 7, None);
    let others = vec![
        flight("D1", "DXB", Departure, "10:05", 7, Some("1401")),
        flight("D2", "DXB", Departure, "10:35", 3, Some("1403")),
    ];
    let mut all = others.clone();
    all.push(focal.clone());
    let slots = slots_of(&all);
    assert_eq!(1, slots[10].departures.len());

    let connections = best_connections(&[&focal], &slots, RULES, &ReferenceData::default());
    let freqs: Vec<u32> = connections.iter().map(|c| c.weekly_frequency()).collect();

    assert_eq!(vec![7, 3], freqs);
    assert_eq!(Region::MiddleEast, connections[0].region);
    assert_eq!(Market::International, connections[0].market);
}

#[test]
fn test_rescanning_is_idempotent() {
    let focal = flight("A1", "BOM", Arrival, "08:00", 7, None);
    let others = vec![
        flight("D1", "DXB", Departure, "10:05", 7, Some("1401")),
        flight("D2", "DEL", Departure, "12:35", 3, Some("1403")),
        flight("D3", "DEL", Departure, "12:35", 3, Some("1403")),
    ];

    let first = connect(&focal, &others);
    assert_eq!(first, connect(&focal, &others));
    assert_eq!(2, first.len());
}

#[test]
fn test_transfer_time_symmetry() {
    assert_eq!(Some(120), transfer_time(Arrival, t("08:00"), t("10:00"), RULES));
    assert_eq!(Some(120), transfer_time(Departure, t("10:00"), t("08:00"), RULES));
    assert_eq!(None, transfer_time(Arrival, t("08:00"), t("09:00"), RULES));
    assert_eq!(None, transfer_time(Departure, t("09:00"), t("08:00"), RULES));
}
