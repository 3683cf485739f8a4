use crate::airport::{HubKey, ReferenceData, ReferenceOverrides, base_code};
use crate::bank::slots::{HubSlot, build_slots};
use crate::bank::store::ManualBlockStore;
use crate::bank::sync::SyncOutcome;
use crate::bank::synergy::{Summary, TwoWayConnection, summarize, two_way_summary};
use crate::config::SimulationParams;
use crate::dataset::{AirportDataset, RawDataset};
use crate::error::{BankError, Result};
use crate::flight::{Block, Direction, FlightId, FlightRecord};
use crate::time::Time;
use crate::workspace::WorkspaceSnapshot;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Operator input for a flight dropped onto a hub's bank.
#[derive(Clone, Debug)]
pub struct NewFlight {
    pub port_code: String,
    pub direction: Direction,
    pub hub_time: Time,
    pub weekly_frequency: u8,
    pub seats: u32,
    pub passengers: Option<u32>,
    pub airline: Option<String>,
    pub flight_number: Option<String>,
}

/// All hub datasets plus the manual edits layered on top of them.
pub struct Bank {
    pub(crate) datasets: BTreeMap<HubKey, AirportDataset>,
    pub(crate) stores: BTreeMap<HubKey, ManualBlockStore>,
    pub reference: ReferenceData,
    pub params: SimulationParams,
}

impl Bank {
    pub fn new(
        datasets: Vec<AirportDataset>,
        reference: ReferenceData,
        params: SimulationParams,
    ) -> Bank {
        let datasets: BTreeMap<HubKey, AirportDataset> = datasets
            .into_iter()
            .map(|d| (d.port_code.clone(), d))
            .collect();
        let stores = datasets
            .keys()
            .map(|hub| (hub.clone(), ManualBlockStore::default()))
            .collect();
        Bank {
            datasets,
            stores,
            reference,
            params,
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawScenario {
            hubs: Vec<RawDataset>,
            #[serde(default)]
            params: SimulationParams,
            #[serde(default)]
            reference: ReferenceOverrides,
        }
        let raw: RawScenario = serde_json::from_str(&data)?;

        let mut reference = ReferenceData::default();
        reference.extend(raw.reference);
        let datasets = raw.hubs.into_iter().map(AirportDataset::from).collect();

        Ok(Bank::new(datasets, reference, raw.params))
    }

    pub fn hubs(&self) -> impl Iterator<Item = &HubKey> {
        self.datasets.keys()
    }

    pub fn dataset(&self, hub: &HubKey) -> Result<&AirportDataset> {
        self.datasets
            .get(hub)
            .ok_or_else(|| BankError::UnknownHub(hub.clone()))
    }

    pub fn store(&self, hub: &HubKey) -> Result<&ManualBlockStore> {
        self.stores
            .get(hub)
            .ok_or_else(|| BankError::UnknownHub(hub.clone()))
    }

    fn store_mut(&mut self, hub: &HubKey) -> Result<&mut ManualBlockStore> {
        if !self.datasets.contains_key(hub) {
            return Err(BankError::UnknownHub(hub.clone()));
        }
        Ok(self.stores.entry(hub.clone()).or_default())
    }

    /// Imported flights of a hub, promoted ones included.
    pub fn imported(&self, hub: &HubKey) -> Result<Vec<FlightRecord>> {
        Ok(self.dataset(hub)?.flights(&self.reference))
    }

    pub fn slots(&self, hub: &HubKey) -> Result<Vec<HubSlot>> {
        let imported = self.imported(hub)?;
        Ok(build_slots(hub, &imported, self.store(hub)?))
    }

    /// The block with `id`, or the single flight with `id` inside a merged block.
    pub fn find_block(&self, hub: &HubKey, id: &str) -> Result<Block> {
        let slots = self.slots(hub)?;
        let blocks = || slots.iter().flat_map(|s| s.arrivals.iter().chain(&s.departures));
        blocks()
            .find(|b| **b.id() == *id)
            .cloned()
            .or_else(|| {
                blocks()
                    .flat_map(|b| b.flights())
                    .find(|f| *f.id == *id)
                    .cloned()
                    .map(Block::Single)
            })
            .ok_or_else(|| BankError::UnknownFlight {
                hub: hub.clone(),
                id: Arc::from(id),
            })
    }

    pub fn summary(&self, hub: &HubKey, id: &str) -> Result<Summary> {
        let focal = self.find_block(hub, id)?;
        let slots = self.slots(hub)?;
        Ok(summarize(&focal, &slots, &self.params, &self.reference))
    }

    pub fn two_way(&self, hub: &HubKey, port: &str) -> Result<Vec<TwoWayConnection>> {
        let slots = self.slots(hub)?;
        Ok(two_way_summary(port, &slots, &self.params, &self.reference))
    }

    /// Adds an operator flight. Its anchor is the matching imported leg's time
    /// when one exists, the drop time otherwise.
    pub fn drop_flight(&mut self, hub: &HubKey, flight: NewFlight) -> Result<(FlightId, SyncOutcome)> {
        let port_code = base_code(&flight.port_code);
        let anchor = self
            .imported(hub)?
            .into_iter()
            .find(|f| {
                f.port_code == port_code
                    && f.direction == flight.direction
                    && f.same_airline(flight.airline.as_deref())
                    && flight.flight_number.is_some()
                    && f.flight_number.as_deref() == flight.flight_number.as_deref()
            })
            .map(|f| f.hub_time)
            .unwrap_or(flight.hub_time);

        let region = self.reference.region_of(&port_code);
        let store = self.store_mut(hub)?;
        let record = FlightRecord {
            id: store.next_id(hub),
            port_code,
            direction: flight.direction,
            weekly_frequency: flight.weekly_frequency.min(FlightRecord::MAX_WEEKLY_FREQUENCY),
            seats: flight.seats,
            passengers: flight.passengers,
            region,
            airline: flight.airline.map(Arc::from),
            flight_number: flight.flight_number.map(Arc::from),
            hub_time: flight.hub_time,
            is_manual: true,
            original_anchor_time: Some(anchor),
            promoted_from: None,
        };
        let id = record.id.clone();
        store.insert(record.clone());
        info!(%hub, %id, time = %record.hub_time, "dropped manual flight");

        let outcome = self.propagate(hub, &record);
        Ok((id, outcome))
    }

    /// Moves a flight to `time`. Imported flights are promoted into the manual
    /// store first, anchored at their imported time.
    pub fn retime(&mut self, hub: &HubKey, id: &str, time: Time) -> Result<SyncOutcome> {
        let existing = self.store(hub)?.get(id).is_some();
        let record = if existing {
            self.store_mut(hub)?.retime(id, time).cloned()
        } else {
            let store = self.store(hub)?;
            let imported = self
                .imported(hub)?
                .into_iter()
                .find(|f| *f.id == *id)
                .filter(|f| !store.is_promoted(&f.id));
            match imported {
                Some(imported) => {
                    let store = self.store_mut(hub)?;
                    let record = FlightRecord {
                        id: store.next_id(hub),
                        is_manual: true,
                        original_anchor_time: Some(imported.hub_time),
                        promoted_from: Some(imported.id.clone()),
                        hub_time: time,
                        ..imported
                    };
                    store.insert(record.clone());
                    Some(record)
                }
                None => None,
            }
        };

        let record = record.ok_or_else(|| BankError::UnknownFlight {
            hub: hub.clone(),
            id: Arc::from(id),
        })?;
        info!(%hub, id = %record.id, %time, "retimed flight");
        Ok(self.propagate(hub, &record))
    }

    /// Removes a manual flight; a promoted flight's imported original reappears.
    pub fn delete(&mut self, hub: &HubKey, id: &str) -> Result<FlightRecord> {
        let removed = self
            .store_mut(hub)?
            .remove(id)
            .ok_or_else(|| BankError::UnknownFlight {
                hub: hub.clone(),
                id: Arc::from(id),
            })?;
        info!(%hub, %id, "deleted manual flight");
        Ok(removed)
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            params: self.params.clone(),
            stores: self
                .stores
                .iter()
                .filter(|(_, store)| !store.is_empty())
                .map(|(hub, store)| (hub.clone(), store.clone()))
                .collect(),
        }
    }

    /// Replaces params and manual stores. Stores for hubs without a dataset are ignored.
    pub fn restore(&mut self, snapshot: WorkspaceSnapshot) {
        self.params = snapshot.params;
        self.stores = self
            .datasets
            .keys()
            .map(|hub| (hub.clone(), ManualBlockStore::default()))
            .collect();
        for (hub, store) in snapshot.stores {
            if let Some(slot) = self.stores.get_mut(&hub) {
                *slot = store.normalized();
            }
        }
    }
}
