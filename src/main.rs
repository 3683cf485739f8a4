use crate::airport::{HubKey, Market, Region};
use crate::bank::bank::{Bank, NewFlight};
use crate::bank::sync::SyncOutcome;
use crate::commentary::{CommentaryProvider, FlightBrief, TemplateCommentary};
use crate::flight::Direction;
use crate::time::Time;
use crate::workspace::{FileStore, KeyValueStore, MemoryStore, restore_workspace, save_workspace};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing_subscriber::EnvFilter;

mod airport;
mod bank;
mod commentary;
mod config;
mod dataset;
mod error;
mod flight;
mod time;
mod view;
mod workspace;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Directory holding saved workspaces
    #[arg(short, long, value_name = "DIR", default_value = ".bankview")]
    workspace: PathBuf,

    /// Keep saved workspaces in memory for this session only
    #[arg(long)]
    ephemeral: bool,

    /// Minimum connection time in hours, overriding the scenario
    #[arg(long, value_name = "HOURS")]
    mct: Option<f64>,

    /// Connection window in hours, overriding the scenario
    #[arg(long, value_name = "HOURS")]
    window: Option<f64>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();
        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let spawned = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let Ok(mut pager) = spawned else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn show(content: String, rows: usize) {
    if rows > 20 {
        paginate(content);
    } else {
        println!("{}", content);
    }
}

fn parse_direction(s: &str) -> Option<Direction> {
    match s.to_ascii_lowercase().as_str() {
        "a" | "arr" | "arrival" => Some(Direction::Arrival),
        "d" | "dep" | "departure" => Some(Direction::Departure),
        _ => None,
    }
}

fn report_sync(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Updated { hub, delta, ids } => println!(
            "{} {} flight(s) at {} shifted {:+} min",
            "synced".green(),
            ids.len(),
            hub,
            delta
        ),
        SyncOutcome::Created { hub, delta, id } => println!(
            "{} {} at {} ({:+} min from its anchor)",
            "created".green(),
            id,
            hub,
            delta
        ),
        SyncOutcome::NoCounterpart { hub } => {
            println!("{}", format!("no counterpart at {}, nothing propagated", hub).yellow())
        }
        SyncOutcome::NoReciprocalHub | SyncOutcome::NotAnchored => {}
    }
}

fn drop_command(bank: &mut Bank, parts: &[&str]) {
    let (Some(hub), Some(dir), Some(port), Some(time)) =
        (parts.get(1), parts.get(2), parts.get(3), parts.get(4))
    else {
        println!("Usage: drop <hub> <a|d> <port> <HH:mm> [airline] [number] [freq] [seats]");
        return;
    };
    let Some(direction) = parse_direction(dir) else {
        println!("Direction must be a or d");
        return;
    };
    let hub_time = match Time::parse(time) {
        Ok(t) => t,
        Err(e) => {
            println!("{}", e.to_string().red());
            return;
        }
    };
    let flight = NewFlight {
        port_code: port.to_string(),
        direction,
        hub_time,
        airline: parts.get(5).map(|s| s.to_string()),
        flight_number: parts.get(6).map(|s| s.to_string()),
        weekly_frequency: parts.get(7).and_then(|s| s.parse().ok()).unwrap_or(7),
        seats: parts.get(8).and_then(|s| s.parse().ok()).unwrap_or(0),
        passengers: None,
    };
    match bank.drop_flight(&HubKey::new(hub), flight) {
        Ok((id, outcome)) => {
            println!("Dropped {}.", id.to_string().bold());
            report_sync(&outcome);
        }
        Err(e) => println!("{}", e.to_string().red()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenario = args.scenario.to_string_lossy().to_string();
    let mut bank = Bank::load_from_file(&scenario)?;
    if let Some(mct) = args.mct {
        bank.params.mct_hours = mct;
    }
    if let Some(window) = args.window {
        bank.params.window_hours = window;
    }
    let mut kv: Box<dyn KeyValueStore> = if args.ephemeral {
        Box::new(MemoryStore::default())
    } else {
        Box::new(FileStore::new(args.workspace))
    };
    println!(
        "Bank online. Loaded {} hub(s) from {}",
        bank.hubs().count(),
        args.scenario.display()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "hubs", "ls", "conn", "twoway", "drop", "retime", "rm", "state", "set", "filter", "save",
            "restore", "brief", "help", "exit",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "hubs" => {
                        for hub in bank.hubs() {
                            let manual = bank.store(hub).map(|s| s.len()).unwrap_or(0);
                            let flights: usize = bank
                                .slots(hub)
                                .map(|slots| slots.iter().map(|s| s.flights().count()).sum())
                                .unwrap_or(0);
                            println!("  {}  ({} flights, {} manual)", hub.to_string().bold(), flights, manual);
                        }
                    },
                    "ls" => {
                        let Some(hub) = parts.get(1) else {
                            println!("Usage: ls <hub> [a|d]");
                            continue;
                        };
                        let direction = parts.get(2).and_then(|d| parse_direction(d));
                        match bank.slots(&HubKey::new(hub)) {
                            Ok(slots) => {
                                let rows = view::block_rows(&slots, direction);
                                if rows.is_empty() {
                                    println!("No flights at {}.", hub);
                                } else {
                                    let n = rows.len();
                                    show(view::blocks_table(rows), n);
                                }
                            }
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    },
                    "conn" => {
                        if let (Some(hub), Some(id)) = (parts.get(1), parts.get(2)) {
                            match bank.summary(&HubKey::new(hub), id) {
                                Ok(summary) => {
                                    let n = summary.connections.len() + summary.two_way.len();
                                    show(view::summary_text(&summary), n);
                                }
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: conn <hub> <flight_id>");
                        }
                    },
                    "twoway" => {
                        if let (Some(hub), Some(port)) = (parts.get(1), parts.get(2)) {
                            match bank.two_way(&HubKey::new(hub), port) {
                                Ok(two_way) if two_way.is_empty() => println!("No two-way traffic for {}.", port),
                                Ok(two_way) => show(view::two_way_table(&two_way), two_way.len()),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: twoway <hub> <port>");
                        }
                    },
                    "drop" => drop_command(&mut bank, &parts),
                    "retime" => {
                        if let (Some(hub), Some(id), Some(time)) = (parts.get(1), parts.get(2), parts.get(3)) {
                            let result = Time::parse(time)
                                .and_then(|t| bank.retime(&HubKey::new(hub), id, t));
                            match result {
                                Ok(outcome) => {
                                    println!("Retimed {} to {}.", id, time);
                                    report_sync(&outcome);
                                }
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: retime <hub> <flight_id> <HH:mm>");
                        }
                    },
                    "rm" => {
                        if let (Some(hub), Some(id)) = (parts.get(1), parts.get(2)) {
                            match bank.delete(&HubKey::new(hub), id) {
                                Ok(removed) => println!("Removed {} ({}).", removed.id, removed.label()),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: rm <hub> <flight_id>");
                        }
                    },
                    "state" => {
                        if let (Some(hub), Some(id)) = (parts.get(1), parts.get(2)) {
                            match bank.anchor_state(&HubKey::new(hub), id) {
                                Some(state) => println!("{} is {:?}.", id, state),
                                None => println!("No flight {} at {}.", id, hub),
                            }
                        } else {
                            println!("Usage: state <hub> <flight_id>");
                        }
                    },
                    "set" => {
                        let value = parts.get(2).and_then(|v| v.parse::<f64>().ok());
                        match (parts.get(1).copied(), value) {
                            (Some("mct"), Some(hours)) => bank.params.mct_hours = hours,
                            (Some("window"), Some(hours)) => bank.params.window_hours = hours,
                            _ => println!("Usage: set mct|window <hours>"),
                        }
                        let rules = bank.params.rules();
                        println!("MCT {} min, window {} min.", rules.mct, rules.window);
                    },
                    "filter" => {
                        match (parts.get(1).copied(), parts.get(2).copied()) {
                            (Some("region"), Some("none")) => bank.params.region_filter = None,
                            (Some("market"), Some("none")) => bank.params.market_filter = None,
                            (Some("region"), Some(v)) => match v.parse::<Region>() {
                                Ok(r) => bank.params.region_filter = Some(r),
                                Err(e) => println!("{}", e.red()),
                            },
                            (Some("market"), Some(v)) => match v.parse::<Market>() {
                                Ok(m) => bank.params.market_filter = Some(m),
                                Err(e) => println!("{}", e.red()),
                            },
                            _ => println!("Usage: filter region|market <value|none>"),
                        }
                    },
                    "save" => {
                        let key = parts.get(1).copied().unwrap_or("default");
                        match save_workspace(&mut *kv, key, &bank) {
                            Ok(()) => println!("Saved workspace {}.", key),
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    },
                    "restore" => {
                        let key = parts.get(1).copied().unwrap_or("default");
                        match restore_workspace(&*kv, key, &mut bank) {
                            Ok(true) => println!("Restored workspace {}.", key),
                            Ok(false) => println!("No workspace named {}.", key),
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    },
                    "brief" => {
                        let (Some(hub), ids) = (parts.get(1), parts.get(2..).unwrap_or(&[])) else {
                            println!("Usage: brief <hub> <flight_id>...");
                            continue;
                        };
                        let hub = HubKey::new(hub);
                        let briefs: Vec<FlightBrief> = ids
                            .iter()
                            .filter_map(|id| match bank.summary(&hub, id) {
                                Ok(summary) => Some(FlightBrief::new(&hub, id, &summary)),
                                Err(e) => {
                                    println!("{}", e.to_string().red());
                                    None
                                }
                            })
                            .collect();
                        match TemplateCommentary.commentary(&briefs) {
                            Ok(text) => print!("{}", text),
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  hubs                            - List loaded hubs");
                        println!("  ls <hub> [a|d]                  - Show the hub's bank by hour slot");
                        println!("  conn <hub> <id>                 - Connection summary for a block or flight");
                        println!("  twoway <hub> <port>             - Two-way synergy between <port> and every other port");
                        println!("  drop <hub> <a|d> <port> <HH:mm> [airline] [number] [freq] [seats]");
                        println!("                                  - Inject a manual flight");
                        println!("  retime <hub> <id> <HH:mm>       - Move a flight and sync its reciprocal hub");
                        println!("  rm <hub> <id>                   - Delete a manual flight");
                        println!("  state <hub> <id>                - Show a flight's anchor state");
                        println!("  set mct|window <hours>          - Change connection rules");
                        println!("  filter region|market <v|none>   - Restrict counted connections");
                        println!("  save [name] / restore [name]    - Persist or reload the workspace");
                        println!("  brief <hub> <id>...             - Commentary for selected flights");
                        println!("  help / ?                        - Show this help menu");
                        println!("  exit / quit                     - Exit\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
