use crate::airport::HubKey;
use crate::bank::synergy::Summary;
use crate::error::Result;
use serde::Serialize;
use std::fmt::Write;

/// Plain numbers handed to a commentary writer for one selected flight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlightBrief {
    pub hub: String,
    pub flight: String,
    pub port_code: String,
    pub direction: String,
    pub connections: usize,
    pub weekly_frequency: u32,
    pub catchment_frequency: u32,
    pub domestic_frequency: u32,
    pub international_frequency: u32,
    pub international_share: f64,
    pub balance_ratio: f64,
    pub window: String,
    /// Best two-way partners as `(port, synergy score)`.
    pub top_partners: Vec<(String, f64)>,
}

impl FlightBrief {
    pub const TOP_PARTNERS: usize = 3;

    pub fn new(hub: &HubKey, flight: &str, summary: &Summary) -> FlightBrief {
        FlightBrief {
            hub: hub.to_string(),
            flight: flight.to_string(),
            port_code: summary.port_code.to_string(),
            direction: summary.direction.to_string(),
            connections: summary.total.connections,
            weekly_frequency: summary.total.weekly_frequency,
            catchment_frequency: summary.catchment.weekly_frequency,
            domestic_frequency: summary.other_domestic.weekly_frequency,
            international_frequency: summary.international.weekly_frequency,
            international_share: summary.international_share,
            balance_ratio: summary.balance_ratio,
            window: format!("{}-{}", summary.window_start, summary.window_end),
            top_partners: summary
                .two_way
                .iter()
                .take(Self::TOP_PARTNERS)
                .map(|t| (t.port_code.to_string(), t.synergy_score))
                .collect(),
        }
    }
}

/// External writer turning briefs into prose. Its output is shown verbatim.
pub trait CommentaryProvider {
    fn commentary(&self, briefs: &[FlightBrief]) -> Result<String>;
}

/// Offline stand-in that lays the numbers out as sentences.
pub struct TemplateCommentary;

impl CommentaryProvider for TemplateCommentary {
    fn commentary(&self, briefs: &[FlightBrief]) -> Result<String> {
        let mut out = String::new();
        for b in briefs {
            let _ = write!(
                out,
                "{} {} {} {}: {} connections ({}/wk) inside {}, {:.0}% international",
                b.hub,
                b.direction,
                b.flight,
                b.port_code,
                b.connections,
                b.weekly_frequency,
                b.window,
                b.international_share
            );
            if let Some((port, score)) = b.top_partners.first() {
                let _ = write!(out, "; strongest two-way flow with {} ({:.1})", port, score);
            }
            out.push_str(".\n");
        }
        if out.is_empty() {
            out.push_str("No flights selected.\n");
        }
        Ok(out)
    }
}
