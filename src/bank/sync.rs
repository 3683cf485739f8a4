use crate::airport::{HubKey, base_code};
use crate::bank::bank::Bank;
use crate::flight::{FlightId, FlightRecord};
use crate::time::Time;
use tracing::debug;

/// Where a flight stands in the manual-edit lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorState {
    /// Imported flight, never touched.
    Unanchored,
    /// Manual flight with an anchor but no counterpart at its reciprocal hub.
    Anchored,
    /// Manual flight with a counterpart in the reciprocal hub's manual store.
    Synced,
}

/// Result of replaying an edit onto the reciprocal hub. Never an error:
/// the local edit has already been committed when this is produced.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncOutcome {
    /// The flight's port has no dataset of its own.
    NoReciprocalHub,
    /// Anchor or hub time missing; nothing to replay yet.
    NotAnchored,
    /// Neither a manual counterpart nor an imported leg matches.
    NoCounterpart { hub: HubKey },
    Updated { hub: HubKey, delta: i32, ids: Vec<FlightId> },
    Created { hub: HubKey, delta: i32, id: FlightId },
}

/// The other leg of `flight`'s pairing: opposite direction, serving the origin hub,
/// same airline, and the same flight number unless either side lacks one.
fn is_counterpart(candidate: &FlightRecord, origin_hub: &HubKey, flight: &FlightRecord) -> bool {
    let same_number = match (&candidate.flight_number, &flight.flight_number) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => true,
    };
    candidate.direction == flight.direction.opposite()
        && base_code(&candidate.port_code) == *origin_hub.code()
        && candidate.same_airline(flight.airline.as_deref())
        && same_number
}

impl Bank {
    fn reciprocal_hub(&self, hub: &HubKey, flight: &FlightRecord) -> Option<HubKey> {
        let other = HubKey::new(&flight.port_code);
        (other != *hub && self.datasets.contains_key(&other)).then_some(other)
    }

    /// Replays `flight`'s shift from its anchor onto its counterpart at the hub
    /// named by its port code. Counterparts already in that hub's manual store are
    /// moved relative to their own anchors; otherwise the matching imported leg is
    /// promoted. Unrelated manual flights there are left alone.
    pub(crate) fn propagate(&mut self, hub: &HubKey, flight: &FlightRecord) -> SyncOutcome {
        let Some(other) = self.reciprocal_hub(hub, flight) else {
            debug!(%hub, id = %flight.id, port = %flight.port_code, "no reciprocal hub");
            return SyncOutcome::NoReciprocalHub;
        };
        let Some(anchor) = flight.original_anchor_time else {
            debug!(%hub, id = %flight.id, "flight has no anchor");
            return SyncOutcome::NotAnchored;
        };
        let delta = Time::delta(anchor, flight.hub_time);

        let store = self.stores.entry(other.clone()).or_default();
        let linked: Vec<(FlightId, Time)> = store
            .iter()
            .filter(|f| is_counterpart(f, hub, flight))
            .filter_map(|f| f.original_anchor_time.map(|a| (f.id.clone(), a)))
            .collect();

        if !linked.is_empty() {
            for (id, own_anchor) in &linked {
                store.retime(id, *own_anchor + delta);
            }
            let ids: Vec<FlightId> = linked.into_iter().map(|(id, _)| id).collect();
            debug!(from = %hub, to = %other, delta, count = ids.len(), "updated synced flights");
            return SyncOutcome::Updated { hub: other, delta, ids };
        }

        let imported = match self.datasets.get(&other) {
            Some(dataset) => dataset
                .flights(&self.reference)
                .into_iter()
                .filter(|f| !store.is_promoted(&f.id))
                .find(|f| is_counterpart(f, hub, flight)),
            None => None,
        };
        let Some(imported) = imported else {
            debug!(from = %hub, to = %other, "no counterpart to synchronise");
            return SyncOutcome::NoCounterpart { hub: other };
        };

        let record = FlightRecord {
            id: store.next_id(&other),
            is_manual: true,
            original_anchor_time: Some(imported.hub_time),
            hub_time: imported.hub_time + delta,
            promoted_from: Some(imported.id.clone()),
            ..imported
        };
        let id = record.id.clone();
        store.insert(record);
        debug!(from = %hub, to = %other, delta, %id, "created synced flight");
        SyncOutcome::Created { hub: other, delta, id }
    }

    pub fn anchor_state(&self, hub: &HubKey, id: &str) -> Option<AnchorState> {
        let store = self.stores.get(hub)?;
        let Some(flight) = store.get(id) else {
            return self
                .datasets
                .get(hub)?
                .flights(&self.reference)
                .iter()
                .any(|f| *f.id == *id && !store.is_promoted(&f.id))
                .then_some(AnchorState::Unanchored);
        };
        let synced = self
            .reciprocal_hub(hub, flight)
            .and_then(|other| self.stores.get(&other))
            .is_some_and(|other| other.iter().any(|f| is_counterpart(f, hub, flight)));
        Some(if synced {
            AnchorState::Synced
        } else {
            AnchorState::Anchored
        })
    }
}
