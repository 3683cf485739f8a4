use crate::airport::HubKey;
use crate::bank::bank::Bank;
use crate::bank::store::ManualBlockStore;
use crate::config::SimulationParams;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::info;

/// Everything an operator changed: manual stores and simulation knobs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub params: SimulationParams,
    #[serde(default)]
    pub stores: BTreeMap<HubKey, ManualBlockStore>,
}

/// Opaque blob storage. The core does not care where values end up.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: String) -> Result<()>;
}

/// One `<key>.json` file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> FileStore {
        FileStore { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: String) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

pub fn save_workspace(kv: &mut dyn KeyValueStore, key: &str, bank: &Bank) -> Result<()> {
    let blob = serde_json::to_string_pretty(&bank.snapshot())?;
    kv.save(key, blob)?;
    info!(key, "workspace saved");
    Ok(())
}

/// Restores `key` into `bank`; `false` when nothing was saved under it.
pub fn restore_workspace(kv: &dyn KeyValueStore, key: &str, bank: &mut Bank) -> Result<bool> {
    let Some(blob) = kv.load(key)? else {
        return Ok(false);
    };
    let snapshot: WorkspaceSnapshot = serde_json::from_str(&blob)?;
    bank.restore(snapshot);
    info!(key, "workspace restored");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airport::{Market, ReferenceData};
    use crate::bank::bank::NewFlight;
    use crate::dataset::AirportDataset;
    use crate::flight::Direction;
    use crate::time::Time;

    fn bank() -> Bank {
        Bank::new(
            vec![AirportDataset::new(HubKey::new("BLR"), vec![])],
            ReferenceData::default(),
            SimulationParams::default(),
        )
    }

    fn drop_at(bank: &mut Bank, time: Time) {
        bank.drop_flight(
            &HubKey::new("BLR"),
            NewFlight {
                port_code: "DXB".to_string(),
                direction: Direction::Departure,
                hub_time: time,
                weekly_frequency: 7,
                seats: 180,
                passengers: None,
                airline: Some("6E".to_string()),
                flight_number: Some("1481".to_string()),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_snapshot_round_trip_through_memory() {
        let mut original = bank();
        drop_at(&mut original, Time::hm(10, 15));
        original.params.mct_hours = 2.0;
        original.params.market_filter = Some(Market::International);

        let mut kv = MemoryStore::default();
        save_workspace(&mut kv, "session", &original).unwrap();

        let mut restored = bank();
        assert!(restore_workspace(&kv, "session", &mut restored).unwrap());
        assert_eq!(original.snapshot(), restored.snapshot());

        // ids keep counting from where the saved store stopped
        drop_at(&mut restored, Time::hm(11, 0));
        let hub = HubKey::new("BLR");
        assert!(restored.store(&hub).unwrap().get("BLR-M2").is_some());
    }

    #[test]
    fn test_restore_missing_key() {
        let kv = MemoryStore::default();
        let mut bank = bank();
        assert!(!restore_workspace(&kv, "nothing", &mut bank).unwrap());
    }

    #[test]
    fn test_restore_ignores_unknown_hubs() {
        let mut snapshot = WorkspaceSnapshot::default();
        snapshot
            .stores
            .insert(HubKey::new("ZZZ"), ManualBlockStore::default());
        let mut bank = bank();
        bank.restore(snapshot);
        assert!(bank.store(&HubKey::new("ZZZ")).is_err());
    }

    #[test]
    fn test_file_store_sanitises_keys() {
        let dir = std::env::temp_dir().join(format!("bankview-test-{}", std::process::id()));
        let mut kv = FileStore::new(&dir);
        kv.save("a/b", "{}".to_string()).unwrap();
        assert_eq!(Some("{}".to_string()), kv.load("a/b").unwrap());
        assert!(dir.join("a_b.json").exists());
        assert_eq!(None, kv.load("missing").unwrap());
        let _ = std::fs::remove_dir_all(dir);
    }
}
