use crate::airport::{HubKey, PortCode};
use crate::bank::store::ManualBlockStore;
use crate::flight::{Block, Direction, FlightRecord, MergedBlock};
use crate::time::SLOTS_PER_DAY;
use std::sync::Arc;

/// One hour of a hub's bank.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HubSlot {
    pub hour: usize,
    pub arrivals: Vec<Block>,
    pub departures: Vec<Block>,
}

impl HubSlot {
    pub fn blocks(&self, direction: Direction) -> &[Block] {
        match direction {
            Direction::Arrival => &self.arrivals,
            Direction::Departure => &self.departures,
        }
    }

    /// Every individual flight in the slot, merged blocks expanded.
    pub fn flights(&self) -> impl Iterator<Item = &FlightRecord> {
        self.arrivals
            .iter()
            .chain(self.departures.iter())
            .flat_map(|b| b.flights())
    }

    /// Ephemeral key for re-rendering; not an identity.
    pub fn render_key(&self, direction: Direction, index: usize) -> String {
        let id = self
            .blocks(direction)
            .get(index)
            .map(|b| b.id().to_string())
            .unwrap_or_default();
        format!("{}:{}:{}:{}", self.hour, direction.tag(), index, id)
    }
}

fn merged_id(hub: &HubKey, slot: usize, direction: Direction, port: &PortCode) -> Arc<str> {
    Arc::from(format!("{}-X{}{}-{}", hub, slot, direction.tag(), port))
}

/// Groups automatic flights per port into merged blocks; manual flights stay individual.
/// Automatic blocks come first, then manual ones, each in source order.
pub fn consolidate(
    hub: &HubKey,
    slot: usize,
    direction: Direction,
    flights: Vec<FlightRecord>,
) -> Vec<Block> {
    let (manual, automatic): (Vec<FlightRecord>, Vec<FlightRecord>) =
        flights.into_iter().partition(|f| f.is_manual);

    let mut groups: Vec<(PortCode, Vec<FlightRecord>)> = vec![];
    for flight in automatic {
        match groups.iter_mut().find(|(port, _)| *port == flight.port_code) {
            Some((_, group)) => group.push(flight),
            None => groups.push((flight.port_code.clone(), vec![flight])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(port, mut group)| {
            if group.len() == 1 {
                group.pop().map(Block::Single)
            } else {
                MergedBlock::new(merged_id(hub, slot, direction, &port), group).map(Block::Merged)
            }
        })
        .chain(manual.into_iter().map(Block::Single))
        .collect()
}

/// Derives all 24 slots from imported flights and the hub's manual store.
/// Imported flights that have been promoted into the store are hidden.
pub fn build_slots(
    hub: &HubKey,
    imported: &[FlightRecord],
    store: &ManualBlockStore,
) -> Vec<HubSlot> {
    let mut buckets: Vec<(Vec<FlightRecord>, Vec<FlightRecord>)> =
        vec![(vec![], vec![]); SLOTS_PER_DAY];

    let visible = imported.iter().filter(|f| !store.is_promoted(&f.id));
    let manual = (0..SLOTS_PER_DAY).flat_map(|s| store.slot(s).iter());

    for flight in visible.chain(manual) {
        let (arrivals, departures) = &mut buckets[flight.hub_time.slot()];
        match flight.direction {
            Direction::Arrival => arrivals.push(flight.clone()),
            Direction::Departure => departures.push(flight.clone()),
        }
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(hour, (arrivals, departures))| HubSlot {
            hour,
            arrivals: consolidate(hub, hour, Direction::Arrival, arrivals),
            departures: consolidate(hub, hour, Direction::Departure, departures),
        })
        .collect()
}
