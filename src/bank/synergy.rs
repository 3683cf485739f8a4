use crate::airport::{Category, Market, PortCode, ReferenceData, Region, base_code};
use crate::bank::matcher::{Connection, best_connections};
use crate::bank::slots::HubSlot;
use crate::config::SimulationParams;
use crate::flight::{Block, Direction, FlightRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Balance-weighted strength of a two-way flow. One-directional traffic scores zero.
pub fn synergy_score(inbound: u32, outbound: u32) -> f64 {
    let (inbound, outbound) = (inbound as f64, outbound as f64);
    let max = inbound.max(outbound);
    if max == 0.0 {
        return 0.0;
    }
    (inbound * outbound).sqrt() * (1.0 + inbound.min(outbound) / max)
}

/// `part / whole`, or zero for an empty whole.
pub fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole }
}

/// Traffic between a focal port and one other port through the hub.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TwoWayConnection {
    pub port_code: PortCode,
    pub region: Region,
    pub market: Market,
    /// Focal arrivals continuing to this port.
    pub outbound_details: Vec<Connection>,
    /// Arrivals from this port continuing on focal departures.
    pub inbound_details: Vec<Connection>,
    pub synergy_score: f64,
}

impl TwoWayConnection {
    pub fn outbound_volume(&self) -> u32 {
        self.outbound_details.iter().map(Connection::weekly_frequency).sum()
    }

    pub fn inbound_volume(&self) -> u32 {
        self.inbound_details.iter().map(Connection::weekly_frequency).sum()
    }
}

fn individuals<'a>(slots: &'a [HubSlot], port: &PortCode, direction: Direction) -> Vec<&'a FlightRecord> {
    slots
        .iter()
        .flat_map(|s| s.blocks(direction))
        .flat_map(|b| b.flights())
        .filter(|f| f.port_code == *port)
        .collect()
}

fn admitted(connections: Vec<Connection>, params: &SimulationParams) -> Vec<Connection> {
    connections
        .into_iter()
        .filter(|c| params.admits(c.region, c.market))
        .collect()
}

/// Per-port two-way summary for every port reachable from `port` through the hub,
/// strongest first.
pub fn two_way_summary(
    port: &str,
    slots: &[HubSlot],
    params: &SimulationParams,
    reference: &ReferenceData,
) -> Vec<TwoWayConnection> {
    let focal_port = base_code(port);
    let rules = params.rules();
    let arrivals = individuals(slots, &focal_port, Direction::Arrival);
    let departures = individuals(slots, &focal_port, Direction::Departure);

    let outbound = admitted(best_connections(&arrivals, slots, rules, reference), params);
    let inbound = admitted(best_connections(&departures, slots, rules, reference), params);

    let mut summary: Vec<TwoWayConnection> = vec![];
    let tagged = outbound
        .into_iter()
        .map(|c| (true, c))
        .chain(inbound.into_iter().map(|c| (false, c)));
    for (is_outbound, connection) in tagged {
        let idx = match summary.iter().position(|t| t.port_code == connection.port_code) {
            Some(idx) => idx,
            None => {
                summary.push(TwoWayConnection {
                    port_code: connection.port_code.clone(),
                    region: connection.region,
                    market: connection.market,
                    outbound_details: vec![],
                    inbound_details: vec![],
                    synergy_score: 0.0,
                });
                summary.len() - 1
            }
        };
        if is_outbound {
            summary[idx].outbound_details.push(connection);
        } else {
            summary[idx].inbound_details.push(connection);
        }
    }

    summary.iter_mut().for_each(|t| {
        t.synergy_score = synergy_score(t.inbound_volume(), t.outbound_volume());
    });
    summary.sort_by(|a, b| {
        b.synergy_score
            .total_cmp(&a.synergy_score)
            .then_with(|| a.port_code.cmp(&b.port_code))
    });
    summary
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub ports: usize,
    pub connections: usize,
    pub weekly_frequency: u32,
    pub seats: u32,
}

impl CategoryTotals {
    fn of<'a>(connections: impl Iterator<Item = &'a Connection>) -> CategoryTotals {
        let mut ports = HashSet::new();
        let mut totals = CategoryTotals::default();
        for c in connections {
            ports.insert(c.port_code.clone());
            totals.connections += 1;
            totals.weekly_frequency += c.weekly_frequency();
            totals.seats += c.seats();
        }
        totals.ports = ports.len();
        totals
    }
}

/// Everything the presentation layer shows for one focal block.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub port_code: PortCode,
    pub direction: Direction,
    pub total: CategoryTotals,
    pub catchment: CategoryTotals,
    pub other_domestic: CategoryTotals,
    pub international: CategoryTotals,
    /// Percentage of connecting frequency going to international ports.
    pub international_share: f64,
    /// min/max of the focal port's inbound and outbound volume, in `0..=1`.
    pub balance_ratio: f64,
    pub window_start: String,
    pub window_end: String,
    pub connections: Vec<Connection>,
    pub two_way: Vec<TwoWayConnection>,
}

pub fn summarize(
    focal: &Block,
    slots: &[HubSlot],
    params: &SimulationParams,
    reference: &ReferenceData,
) -> Summary {
    let rules = params.rules();
    let flights: Vec<&FlightRecord> = focal.flights().iter().collect();
    let connections = admitted(best_connections(&flights, slots, rules, reference), params);
    let two_way = two_way_summary(focal.port_code(), slots, params, reference);

    let in_category = |category: Category| {
        CategoryTotals::of(
            connections
                .iter()
                .filter(move |c| reference.category_of(&c.port_code) == category),
        )
    };
    let total = CategoryTotals::of(connections.iter());
    let catchment = in_category(Category::Catchment);
    let other_domestic = in_category(Category::OtherDomestic);
    let international = in_category(Category::International);

    let (inbound, outbound) = two_way.iter().fold((0u32, 0u32), |(i, o), t| {
        (i + t.inbound_volume(), o + t.outbound_volume())
    });

    let earliest = flights.iter().map(|f| f.hub_time).min();
    let latest = flights.iter().map(|f| f.hub_time).max();
    let (window_start, window_end) = match (earliest, latest) {
        (Some(earliest), Some(latest)) => match focal.direction() {
            Direction::Arrival => (earliest + rules.mct, latest + rules.mct + rules.window),
            Direction::Departure => (earliest - rules.mct - rules.window, latest - rules.mct),
        },
        _ => return empty_summary(focal, two_way),
    };

    Summary {
        port_code: focal.port_code().clone(),
        direction: focal.direction(),
        international_share: ratio(
            international.weekly_frequency as f64 * 100.0,
            total.weekly_frequency as f64,
        ),
        balance_ratio: ratio(
            inbound.min(outbound) as f64,
            inbound.max(outbound) as f64,
        ),
        total,
        catchment,
        other_domestic,
        international,
        window_start: window_start.to_string(),
        window_end: window_end.to_string(),
        connections,
        two_way,
    }
}

fn empty_summary(focal: &Block, two_way: Vec<TwoWayConnection>) -> Summary {
    Summary {
        port_code: focal.port_code().clone(),
        direction: focal.direction(),
        total: CategoryTotals::default(),
        catchment: CategoryTotals::default(),
        other_domestic: CategoryTotals::default(),
        international: CategoryTotals::default(),
        international_share: 0.0,
        balance_ratio: 0.0,
        window_start: String::new(),
        window_end: String::new(),
        connections: vec![],
        two_way,
    }
}
