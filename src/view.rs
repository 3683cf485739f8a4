use crate::bank::matcher::Connection;
use crate::bank::slots::HubSlot;
use crate::bank::synergy::{CategoryTotals, Summary, TwoWayConnection};
use crate::flight::{Block, Direction};
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct BlockRow {
    key: String,
    slot: String,
    dir: Direction,
    id: String,
    port: String,
    time: String,
    flights: String,
    freq: u32,
    seats: u32,
    kind: &'static str,
}

impl BlockRow {
    fn new(slot: &HubSlot, block: &Block, index: usize) -> BlockRow {
        let times: Vec<String> = block
            .flights()
            .iter()
            .map(|f| f.hub_time.to_string())
            .collect();
        let labels: Vec<String> = block.flights().iter().map(|f| f.label()).collect();
        let kind = match block {
            Block::Merged(_) => "merged",
            b if b.is_manual() => "manual",
            Block::Single(_) => "import",
        };
        BlockRow {
            key: slot.render_key(block.direction(), index),
            slot: format!("{:02}:00", slot.hour),
            dir: block.direction(),
            id: block.id().to_string(),
            port: block.port_code().to_string(),
            time: times.join(" "),
            flights: labels.join(" "),
            freq: block.weekly_frequency(),
            seats: block.seats(),
            kind,
        }
    }
}

#[derive(Tabled)]
pub struct ConnectionRow {
    port: String,
    region: String,
    market: String,
    focal: String,
    flight: String,
    time: String,
    wait: String,
    freq: u32,
}

impl From<&Connection> for ConnectionRow {
    fn from(c: &Connection) -> Self {
        ConnectionRow {
            port: c.port_code.to_string(),
            region: c.region.to_string(),
            market: c.market.to_string(),
            focal: format!("{} {}", c.focal_id, c.focal_time),
            flight: c.flight.label(),
            time: c.connecting_time.to_string(),
            wait: format!("{}h{:02}", c.wait / 60, c.wait % 60),
            freq: c.weekly_frequency(),
        }
    }
}

#[derive(Tabled)]
pub struct TwoWayRow {
    port: String,
    region: String,
    market: String,
    outbound: usize,
    out_freq: u32,
    inbound: usize,
    in_freq: u32,
    synergy: String,
}

impl From<&TwoWayConnection> for TwoWayRow {
    fn from(t: &TwoWayConnection) -> Self {
        TwoWayRow {
            port: t.port_code.to_string(),
            region: t.region.to_string(),
            market: t.market.to_string(),
            outbound: t.outbound_details.len(),
            out_freq: t.outbound_volume(),
            inbound: t.inbound_details.len(),
            in_freq: t.inbound_volume(),
            synergy: format!("{:.2}", t.synergy_score),
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    category: &'static str,
    ports: usize,
    connections: usize,
    freq: u32,
    seats: u32,
}

impl CategoryRow {
    fn new(category: &'static str, t: &CategoryTotals) -> CategoryRow {
        CategoryRow {
            category,
            ports: t.ports,
            connections: t.connections,
            freq: t.weekly_frequency,
            seats: t.seats,
        }
    }
}

fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.with(Alignment::left());
    table.to_string()
}

pub fn block_rows(slots: &[HubSlot], direction: Option<Direction>) -> Vec<BlockRow> {
    slots
        .iter()
        .flat_map(|s| {
            [Direction::Arrival, Direction::Departure]
                .into_iter()
                .filter(move |d| direction.is_none_or(|wanted| wanted == *d))
                .flat_map(move |d| {
                    s.blocks(d)
                        .iter()
                        .enumerate()
                        .map(move |(index, b)| BlockRow::new(s, b, index))
                })
        })
        .collect()
}

pub fn blocks_table(rows: Vec<BlockRow>) -> String {
    render(rows)
}

pub fn two_way_table(two_way: &[TwoWayConnection]) -> String {
    render(two_way.iter().map(TwoWayRow::from))
}

pub fn summary_text(summary: &Summary) -> String {
    let categories = render([
        CategoryRow::new("catchment", &summary.catchment),
        CategoryRow::new("other domestic", &summary.other_domestic),
        CategoryRow::new("international", &summary.international),
        CategoryRow::new("total", &summary.total),
    ]);
    let mut out = format!(
        "{} {}  window {} - {}  international {:.1}%  balance {:.2}\n{}\n",
        summary.direction,
        summary.port_code,
        summary.window_start,
        summary.window_end,
        summary.international_share,
        summary.balance_ratio,
        categories
    );
    if !summary.connections.is_empty() {
        out.push_str(&render(summary.connections.iter().map(ConnectionRow::from)));
        out.push('\n');
    }
    if !summary.two_way.is_empty() {
        out.push_str(&two_way_table(&summary.two_way));
        out.push('\n');
    }
    out
}
