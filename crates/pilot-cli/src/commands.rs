use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell as TableCell, CellAlignment, Color, ContentArrangement, Table};
use pilot_core::{CacheStats, Pilot, Route, RouteObserver};
use tracing::{debug, info, info_span};

use crate::config::CliConfig;
use crate::demo::{AppRoute, DemoAction};
use crate::host::TextHost;
use crate::script::{Command, parse_script};

const COUNTER_OBSERVER_ID: &str = "event-counter";

/// Number of notifications each hook received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub pushes: u64,
    pub pops: u64,
    pub pop_tos: u64,
    pub changes: u64,
}

#[derive(Default)]
struct EventCounter {
    pushes: Cell<u64>,
    pops: Cell<u64>,
    pop_tos: Cell<u64>,
    changes: Cell<u64>,
}

impl EventCounter {
    fn counts(&self) -> EventCounts {
        EventCounts {
            pushes: self.pushes.get(),
            pops: self.pops.get(),
            pop_tos: self.pop_tos.get(),
            changes: self.changes.get(),
        }
    }
}

fn bump(counter: &Cell<u64>) {
    counter.set(counter.get() + 1);
}

impl<T> RouteObserver<T> for EventCounter {
    fn id(&self) -> &str {
        COUNTER_OBSERVER_ID
    }

    fn on_push(&self, _route: &T) {
        bump(&self.pushes);
    }

    fn on_pop(&self, _route: &T) {
        bump(&self.pops);
    }

    fn on_pop_to(&self, _route: &T, _inclusive: bool) {
        bump(&self.pop_tos);
    }

    fn on_route_change(&self, _old_routes: &[T], _new_routes: &[T]) {
        bump(&self.changes);
    }
}

/// The drawn view after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub view: String,
}

/// Everything a replay or demo run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub steps: Vec<Step>,
    pub events: EventCounts,
    pub cache: CacheStats,
    pub builds: u64,
}

impl Session {
    /// Each step as a `$ label` line followed by the drawn view.
    pub fn transcript(&self) -> String {
        self.steps
            .iter()
            .map(|step| format!("$ {}\n{}", step.label, step.view))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Drives a pilot through labelled steps and records what the host drew.
struct Recorder<T: Route> {
    host: TextHost<T>,
    counter: Rc<EventCounter>,
    steps: Vec<Step>,
}

impl<T: Route> Recorder<T> {
    fn new(pilot: Pilot<T>, config: &CliConfig, title: impl Fn(&T) -> String + 'static) -> Self {
        let counter = Rc::new(EventCounter::default());
        pilot.add_observer(counter.clone());
        let host = TextHost::new(pilot, config.render.clone(), title);
        let steps = vec![Step {
            label: "start".to_string(),
            view: host.render(),
        }];
        Self {
            host,
            counter,
            steps,
        }
    }

    fn record(&mut self, label: String) {
        debug!(step = %label, depth = self.host.pilot().len(), "step applied");
        self.steps.push(Step {
            label,
            view: self.host.render(),
        });
    }

    fn finish(self) -> Session {
        Session {
            steps: self.steps,
            events: self.counter.counts(),
            cache: self.host.cache_stats(),
            builds: self.host.builds(),
        }
    }
}

/// Replay parsed commands on a fresh, empty stack of string routes.
pub fn replay(commands: &[Command], config: &CliConfig) -> Session {
    let pilot = Pilot::new(config.pilot.clone());
    let mut recorder = Recorder::new(pilot, config, String::clone);
    for command in commands {
        let host = &recorder.host;
        match command {
            Command::Push(route) => host.pilot().push(route.clone()),
            Command::Pop => host.pilot().pop(),
            Command::PopTo { route, inclusive } => host.pilot().pop_to(route, *inclusive),
            Command::Back => {
                if !host.back() {
                    debug!("back ignored, nothing to dismiss");
                }
            }
        }
        recorder.record(command.to_string());
    }
    recorder.finish()
}

/// Run the sign-in walkthrough.
pub fn demo(config: &CliConfig) -> Session {
    let pilot = Pilot::with_initial(AppRoute::Start, config.pilot.clone());
    let mut recorder = Recorder::new(pilot, config, |route: &AppRoute| {
        route.name().to_string()
    });
    for action in DemoAction::SCRIPT {
        action.apply(recorder.host.pilot());
        recorder.record(action.label().to_string());
    }
    recorder.finish()
}

pub fn run_replay(path: &Path, config: &CliConfig) -> Result<()> {
    let span = info_span!("replay", script = %path.display());
    let _guard = span.enter();
    let text =
        fs::read_to_string(path).with_context(|| format!("read script {}", path.display()))?;
    let commands = parse_script(&text).with_context(|| format!("parse {}", path.display()))?;
    info!(commands = commands.len(), "replaying script");
    let session = replay(&commands, config);
    print_session(&session);
    Ok(())
}

pub fn run_demo(config: &CliConfig) -> Result<()> {
    let session = demo(config);
    print_session(&session);
    Ok(())
}

fn print_session(session: &Session) {
    println!("{}", session.transcript());
    println!();
    println!("{}", summary_table(session));
}

/// Notification and cache counters as a table.
pub fn summary_table(session: &Session) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Counter"), header_cell("Value")]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    let events = session.events;
    let cache = session.cache;
    let rows: [(&str, String); 8] = [
        ("push", events.pushes.to_string()),
        ("pop", events.pops.to_string()),
        ("pop to", events.pop_tos.to_string()),
        ("route change", events.changes.to_string()),
        ("screens built", session.builds.to_string()),
        ("cache hits", cache.hits.to_string()),
        ("cache evictions", cache.evictions.to_string()),
        ("hit rate", format!("{:.0}%", cache.hit_rate() * 100.0)),
    ];
    for (label, value) in rows {
        table.add_row(vec![TableCell::new(label), TableCell::new(value)]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn header_cell(label: &str) -> TableCell {
    TableCell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
