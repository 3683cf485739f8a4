use crate::airport::{Market, PortCode, ReferenceData, Region};
use crate::bank::slots::HubSlot;
use crate::config::ConnectionRules;
use crate::flight::{Direction, FlightId, FlightRecord};
use crate::time::Time;
use serde::Serialize;

/// A feasible transfer between a focal flight and one flight at another port.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Connection {
    pub port_code: PortCode,
    pub region: Region,
    pub market: Market,
    pub focal_id: FlightId,
    pub focal_time: Time,
    pub flight: FlightRecord,
    pub connecting_time: Time,
    /// Minutes between the arrival and the departure of the pair.
    pub wait: u16,
}

impl Connection {
    pub fn weekly_frequency(&self) -> u32 {
        self.flight.weekly_frequency as u32
    }

    pub fn seats(&self) -> u32 {
        self.flight.seats
    }
}

/// Elapsed transfer time when `candidate` connects with the focal movement.
///
/// Arrivals look forward: the departure must fall within `window` minutes after
/// `focal + mct`. Departures look back: `candidate + mct` must open a window that
/// still contains the focal departure. Both edges are inclusive and all tests go
/// through [`Time::in_wraparound_window`].
pub fn transfer_time(
    direction: Direction,
    focal: Time,
    candidate: Time,
    rules: ConnectionRules,
) -> Option<u16> {
    let (arrival, departure) = match direction {
        Direction::Arrival => (focal, candidate),
        Direction::Departure => (candidate, focal),
    };
    let valid_start = arrival + rules.mct;
    Time::in_wraparound_window(departure, valid_start, rules.window)
        .then(|| rules.mct + valid_start.forward_to(departure))
}

/// Best connection per individual connecting flight for a set of focal flights.
///
/// Candidates are the individual flights (merged blocks expanded) moving in the
/// opposite direction at any port other than the focal one. For every
/// `(port, service)` the pairing with the shortest transfer wins; ties keep the
/// first one encountered. Output order is first-encounter order.
pub fn best_connections(
    focals: &[&FlightRecord],
    slots: &[HubSlot],
    rules: ConnectionRules,
    reference: &ReferenceData,
) -> Vec<Connection> {
    let mut best: Vec<Connection> = vec![];

    for focal in focals {
        let opposite = focal.direction.opposite();
        let candidates = slots
            .iter()
            .flat_map(|s| s.blocks(opposite))
            .flat_map(|b| b.flights())
            .filter(|c| c.port_code != focal.port_code);

        for candidate in candidates {
            let Some(wait) = transfer_time(focal.direction, focal.hub_time, candidate.hub_time, rules)
            else {
                continue;
            };

            let existing = best.iter_mut().find(|c| {
                c.port_code == candidate.port_code
                    && c.flight.service_key() == candidate.service_key()
            });
            match existing {
                Some(current) if wait < current.wait => {
                    current.focal_id = focal.id.clone();
                    current.focal_time = focal.hub_time;
                    current.flight = candidate.clone();
                    current.connecting_time = candidate.hub_time;
                    current.wait = wait;
                }
                Some(_) => {}
                None => best.push(Connection {
                    port_code: candidate.port_code.clone(),
                    region: reference.region_of(&candidate.port_code),
                    market: reference.market_of(&candidate.port_code),
                    focal_id: focal.id.clone(),
                    focal_time: focal.hub_time,
                    flight: candidate.clone(),
                    connecting_time: candidate.hub_time,
                    wait,
                }),
            }
        }
    }

    best
}
