#![allow(dead_code)]

use escalator::{Cells, EscalatorConfig, EscalatorUpdater, Row, Spacer, SpacerUpdater};
use parking_lot::Mutex;
use std::sync::Arc;

/// A shared call log.
#[derive(Debug, Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    /// Returns everything logged so far and clears the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }
}

fn visit(cells: &mut Cells<'_>) -> Vec<usize> {
    let mut columns = Vec::new();
    while let Some(cell) = cells.next_cell() {
        columns.push(cell.column());
    }
    columns
}

/// Logs every call with the visited columns, and writes `row:column` into cells on update if
/// `fill` is set.
pub struct Recorder {
    pub log: Log,
    pub fill: bool,
}

impl Recorder {
    pub fn new(log: &Log) -> Box<Recorder> {
        Box::new(Recorder {
            log: log.clone(),
            fill: true,
        })
    }

    pub fn lazy(log: &Log) -> Box<Recorder> {
        Box::new(Recorder {
            log: log.clone(),
            fill: false,
        })
    }
}

impl EscalatorUpdater for Recorder {
    fn update(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let mut columns = Vec::new();
        while let Some(mut cell) = cells.next_cell() {
            columns.push(cell.column());
            if self.fill {
                cell.set_text(format!("{}:{}", row.row(), cell.column()));
            }
        }
        self.log.push(format!("update {} {:?}", row.row(), columns));
    }

    fn pre_attach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let columns = visit(cells);
        self.log.push(format!("pre_attach {} {:?}", row.row(), columns));
    }

    fn post_attach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let columns = visit(cells);
        self.log.push(format!("post_attach {} {:?}", row.row(), columns));
    }

    fn pre_detach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let columns = visit(cells);
        self.log.push(format!("pre_detach {} {:?}", row.row(), columns));
    }

    fn post_detach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let columns = visit(cells);
        self.log.push(format!("post_detach {} {:?}", row.row(), columns));
    }
}

/// Logs spacer calls, prefixed with a name, and writes the name into initialized spacers.
pub struct SpacerRecorder {
    pub name: &'static str,
    pub log: Log,
}

impl SpacerRecorder {
    pub fn new(name: &'static str, log: &Log) -> Box<SpacerRecorder> {
        Box::new(SpacerRecorder {
            name,
            log: log.clone(),
        })
    }
}

impl SpacerUpdater for SpacerRecorder {
    fn init(&mut self, spacer: &mut Spacer<'_>) {
        let element = spacer.element();
        let text = format!("{} {}", self.name, spacer.row());
        spacer.document_mut().set_text(element, text);
        self.log.push(format!("{} init {}", self.name, spacer.row()));
    }

    fn destroy(&mut self, spacer: &mut Spacer<'_>) {
        self.log.push(format!("{} destroy {}", self.name, spacer.row()));
    }
}

/// Sends engine logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config(viewport_height: f64) -> EscalatorConfig {
    init_tracing();
    EscalatorConfig {
        viewport_height,
        ..EscalatorConfig::default()
    }
}
