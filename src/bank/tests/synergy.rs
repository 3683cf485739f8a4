use crate::airport::{Market, ReferenceData};
use crate::bank::synergy::{ratio, summarize, synergy_score, two_way_summary};
use crate::bank::tests::utils::{flight, slots_of};
use crate::config::SimulationParams;
use crate::flight::Direction::{Arrival, Departure};
use crate::flight::{Block, FlightRecord};

fn hub_flights() -> Vec<FlightRecord> {
    vec![
        flight("A1", "DEL", Arrival, "08:00", 7, Some("101")),
        flight("D1", "DEL", Departure, "14:00", 7, Some("102")),
        flight("A2", "DXB", Arrival, "11:00", 7, Some("201")),
        flight("D2", "DXB", Departure, "10:00", 5, Some("202")),
        flight("D3", "COK", Departure, "11:30", 4, Some("301")),
        flight("D4", "BOM", Departure, "12:00", 2, Some("401")),
    ]
}

#[test]
fn test_balanced_port_outscores_one_directional() {
    assert_eq!(20.0, synergy_score(10, 10));
    assert_eq!(0.0, synergy_score(20, 0));
    assert_eq!(0.0, synergy_score(0, 0));
    assert!(synergy_score(10, 10) > synergy_score(15, 5));
    assert!(synergy_score(15, 5) > synergy_score(20, 0));
}

#[test]
fn test_ratio_of_nothing_is_zero() {
    assert_eq!(0.0, ratio(5.0, 0.0));
    assert_eq!(0.5, ratio(1.0, 2.0));
}

#[test]
fn test_two_way_summary_pairs_both_directions() {
    let slots = slots_of(&hub_flights());
    let two_way = two_way_summary("DEL", &slots, &SimulationParams::default(), &ReferenceData::default());

    let ports: Vec<&str> = two_way.iter().map(|t| t.port_code.as_ref()).collect();
    assert_eq!(vec!["DXB", "BOM", "COK"], ports);

    let dxb = &two_way[0];
    assert_eq!(5, dxb.outbound_volume());
    assert_eq!(7, dxb.inbound_volume());
    assert_eq!("D2", dxb.outbound_details[0].flight.id.as_ref());
    assert_eq!("A2", dxb.inbound_details[0].flight.id.as_ref());
    assert_eq!(synergy_score(7, 5), dxb.synergy_score);

    assert!(two_way[1..].iter().all(|t| t.synergy_score == 0.0 && t.inbound_details.is_empty()));
}

#[test]
fn test_two_way_summary_is_repeatable() {
    let slots = slots_of(&hub_flights());
    let params = SimulationParams::default();
    let reference = ReferenceData::default();

    assert_eq!(
        two_way_summary("DEL", &slots, &params, &reference),
        two_way_summary("DEL", &slots, &params, &reference)
    );
}

#[test]
fn test_summary_categories_and_window() {
    let flights = hub_flights();
    let slots = slots_of(&flights);
    let focal = Block::Single(flights[0].clone());
    let summary = summarize(&focal, &slots, &SimulationParams::default(), &ReferenceData::default());

    assert_eq!(3, summary.total.connections);
    assert_eq!(11, summary.total.weekly_frequency);
    assert_eq!(1, summary.catchment.ports);
    assert_eq!(4, summary.catchment.weekly_frequency);
    assert_eq!(2, summary.other_domestic.weekly_frequency);
    assert_eq!(5, summary.international.weekly_frequency);
    assert_eq!(5.0 * 100.0 / 11.0, summary.international_share);
    assert_eq!(7.0 / 11.0, summary.balance_ratio);
    assert_eq!("09:30", summary.window_start);
    assert_eq!("15:30", summary.window_end);
}

#[test]
fn test_summary_window_spans_merged_block() {
    let flights = vec![
        flight("D1", "DXB", Departure, "14:00", 7, Some("1")),
        flight("D2", "DXB", Departure, "14:40", 7, Some("2")),
    ];
    let slots = slots_of(&flights);
    let focal = slots[14].departures[0].clone();
    assert!(matches!(focal, Block::Merged(_)));

    let summary = summarize(&focal, &slots, &SimulationParams::default(), &ReferenceData::default());

    assert_eq!("06:30", summary.window_start);
    assert_eq!("13:10", summary.window_end);
}

#[test]
fn test_summary_without_connections_has_zero_shares() {
    let flights = vec![flight("A1", "DEL", Arrival, "08:00", 7, None)];
    let slots = slots_of(&flights);
    let summary = summarize(
        &Block::Single(flights[0].clone()),
        &slots,
        &SimulationParams::default(),
        &ReferenceData::default(),
    );

    assert_eq!(0, summary.total.connections);
    assert_eq!(0.0, summary.international_share);
    assert_eq!(0.0, summary.balance_ratio);
    assert!(summary.two_way.is_empty());
}

#[test]
fn test_market_filter_restricts_counted_ports() {
    let flights = hub_flights();
    let slots = slots_of(&flights);
    let params = SimulationParams {
        market_filter: Some(Market::International),
        ..SimulationParams::default()
    };
    let summary = summarize(&Block::Single(flights[0].clone()), &slots, &params, &ReferenceData::default());

    assert_eq!(1, summary.total.connections);
    assert_eq!(100.0, summary.international_share);
    assert_eq!(1, summary.two_way.len());
    assert_eq!("DXB", summary.two_way[0].port_code.as_ref());
}
