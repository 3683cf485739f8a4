use crate::airport::{Market, Region};
use serde::{Deserialize, Serialize};

/// Operator-tunable simulation knobs, persisted with the workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub mct_hours: f64,
    pub window_hours: f64,
    pub region_filter: Option<Region>,
    pub market_filter: Option<Market>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            mct_hours: 1.5,
            window_hours: 6.0,
            region_filter: None,
            market_filter: None,
        }
    }
}

impl SimulationParams {
    pub fn rules(&self) -> ConnectionRules {
        ConnectionRules {
            mct: hours_to_minutes(self.mct_hours),
            window: hours_to_minutes(self.window_hours),
        }
    }

    pub fn admits(&self, region: Region, market: Market) -> bool {
        self.region_filter.is_none_or(|r| r == region)
            && self.market_filter.is_none_or(|m| m == market)
    }
}

fn hours_to_minutes(hours: f64) -> u16 {
    if hours.is_finite() && hours > 0.0 {
        (hours * 60.0).round().min(1439.0) as u16
    } else {
        0
    }
}

/// MCT and window in whole minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionRules {
    pub mct: u16,
    pub window: u16,
}
