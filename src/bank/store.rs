use crate::airport::HubKey;
use crate::flight::{FlightId, FlightRecord};
use crate::time::{SLOTS_PER_DAY, Time};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Manually created or promoted flights of one hub, bucketed by hour slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualBlockStore {
    slots: [Vec<FlightRecord>; SLOTS_PER_DAY],
    next_id: u64,
}

impl ManualBlockStore {
    /// Fresh persisted identity, never reused within this store.
    pub fn next_id(&mut self, hub: &HubKey) -> FlightId {
        self.next_id += 1;
        Arc::from(format!("{}-M{}", hub, self.next_id))
    }

    pub fn insert(&mut self, mut record: FlightRecord) {
        debug_assert!(!record.id.is_empty(), "manual record without id");
        record.is_manual = true;
        self.slots[record.hub_time.slot()].push(record);
    }

    pub fn slot(&self, slot: usize) -> &[FlightRecord] {
        &self.slots[slot % SLOTS_PER_DAY]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlightRecord> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    pub fn get(&self, id: &str) -> Option<&FlightRecord> {
        self.iter().find(|f| *f.id == *id)
    }

    fn position(&self, id: &str) -> Option<(usize, usize)> {
        self.slots.iter().enumerate().find_map(|(slot, records)| {
            records
                .iter()
                .position(|f| *f.id == *id)
                .map(|idx| (slot, idx))
        })
    }

    pub fn remove(&mut self, id: &str) -> Option<FlightRecord> {
        self.position(id)
            .map(|(slot, idx)| self.slots[slot].remove(idx))
    }

    /// Moves a record to `time`, re-bucketing it when the hour changes.
    pub fn retime(&mut self, id: &str, time: Time) -> Option<&FlightRecord> {
        let (slot, idx) = self.position(id)?;
        if time.slot() == slot {
            let record = &mut self.slots[slot][idx];
            record.hub_time = time;
            return Some(&*record);
        }
        let mut record = self.slots[slot].remove(idx);
        record.hub_time = time;
        let target = time.slot();
        self.slots[target].push(record);
        self.slots[target].last()
    }

    pub fn is_promoted(&self, imported_id: &str) -> bool {
        self.iter()
            .any(|f| f.promoted_from.as_deref() == Some(imported_id))
    }

    /// Re-establishes bucket and manual-flag invariants on restored data.
    pub fn normalized(self) -> ManualBlockStore {
        let mut store = ManualBlockStore {
            next_id: self.next_id,
            ..ManualBlockStore::default()
        };
        self.slots
            .into_iter()
            .flatten()
            .filter(|f| !f.id.is_empty())
            .for_each(|f| store.insert(f));
        store
    }
}
