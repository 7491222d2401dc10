//! The escalator.

use crate::body::{BodyRows, BodySection};
use crate::columns::ColumnConfiguration;
use crate::config::EscalatorConfig;
use crate::container::{Env, Section, SectionKind, StaticRows, StaticSection};
use crate::events::{EventHandler, HandlerRegistration, RowVisibilityChangeEvent};
use crate::position::{self, PositionBookkeeper};
use crate::scroll::ScrollDestination;
use crossbeam::channel::Receiver;
use escalator_core::error::check_column_range;
use escalator_core::{Document, ElementId, Result, Tag};
use std::ops::Range;
use tracing::debug;

/// A virtualized grid with a header, a body and a footer.
///
/// The escalator owns the element tree everything is rendered into. Sections are accessed
/// through [`header`](Self::header), [`body`](Self::body) and [`footer`](Self::footer), which
/// borrow the escalator for as long as they're used.
#[derive(Debug)]
pub struct Escalator {
    document: Document,
    root: ElementId,
    columns: ColumnConfiguration,
    positions: PositionBookkeeper,
    header: StaticSection,
    body: BodySection,
    footer: StaticSection,
}

impl Escalator {
    /// Creates an escalator with the default configuration.
    pub fn new() -> Escalator {
        match Escalator::with_config(EscalatorConfig::default()) {
            Ok(escalator) => escalator,
            Err(err) => panic!("default configuration rejected: {}", err),
        }
    }

    pub fn with_config(config: EscalatorConfig) -> Result<Escalator> {
        Section::check_row_height(config.default_row_height)?;
        BodySection::check_viewport_height(config.viewport_height)?;

        let mut document = Document::new();
        let root = document.create_element(Tag::Other);
        document.add_class_name(root, &config.style_primary_name);

        let mut section = |kind| {
            Section::new(
                &mut document,
                root,
                kind,
                &config.style_primary_name,
                config.default_row_height,
            )
        };
        let header = StaticSection::new(section(SectionKind::Header)?);
        let body = BodySection::new(section(SectionKind::Body)?, config.viewport_height);
        let footer = StaticSection::new(section(SectionKind::Footer)?);

        let positions = PositionBookkeeper::new(position::detect(config.capabilities));
        debug!(target: "escalator", ?config, "escalator created");

        Ok(Escalator {
            document,
            root,
            columns: ColumnConfiguration::new(),
            positions,
            header,
            body,
            footer,
        })
    }

    /// The element tree.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The element all sections are in.
    pub fn element(&self) -> ElementId {
        self.root
    }

    pub fn column_configuration(&self) -> &ColumnConfiguration {
        &self.columns
    }

    pub fn positions(&self) -> &PositionBookkeeper {
        &self.positions
    }

    pub fn header(&mut self) -> StaticRows<'_> {
        StaticRows {
            section: &mut self.header,
            env: Env {
                doc: &mut self.document,
                columns: &self.columns,
                positions: &mut self.positions,
            },
        }
    }

    pub fn body(&mut self) -> BodyRows<'_> {
        BodyRows {
            body: &mut self.body,
            env: Env {
                doc: &mut self.document,
                columns: &self.columns,
                positions: &mut self.positions,
            },
        }
    }

    pub fn footer(&mut self) -> StaticRows<'_> {
        StaticRows {
            section: &mut self.footer,
            env: Env {
                doc: &mut self.document,
                columns: &self.columns,
                positions: &mut self.positions,
            },
        }
    }

    /// Adds `count` columns of unknown width at `index` to every section.
    pub fn insert_columns(&mut self, index: usize, count: usize) -> Result<()> {
        let had_columns = self.columns.column_count() > 0;
        self.columns.insert(index, count)?;
        debug!(target: "escalator", index, count, "inserting columns");

        let Escalator {
            document,
            columns,
            positions,
            header,
            body,
            footer,
            ..
        } = self;
        let mut env = Env {
            doc: document,
            columns,
            positions,
        };

        for section in [&mut header.section, &mut body.section, &mut footer.section] {
            section.flyweight.add_cells(index, count);
        }

        if !had_columns {
            for section in [&mut *header, &mut *footer] {
                let row_count = section.section.row_count;
                if row_count > 0 {
                    section.paint_insert_rows(&mut env, 0, row_count)?;
                }
            }
            body.verify_row_count(&mut env)?;
        } else {
            for (row, tr) in header.materialized(env.doc) {
                header.section.insert_cells(&mut env, tr, row, index, count)?;
            }
            for (row, tr) in body.materialized() {
                body.section.insert_cells(&mut env, tr, row, index, count)?;
            }
            for (row, tr) in footer.materialized(env.doc) {
                footer.section.insert_cells(&mut env, tr, row, index, count)?;
            }
        }
        body.spacers.reapply_widths(&mut env);
        Ok(())
    }

    /// Removes `count` columns starting at `index` from every section.
    pub fn remove_columns(&mut self, index: usize, count: usize) -> Result<()> {
        check_column_range(index, count, self.columns.column_count())?;
        debug!(target: "escalator", index, count, "removing columns");
        let removes_all = count == self.columns.column_count();

        {
            let Escalator {
                document,
                columns,
                positions,
                header,
                body,
                footer,
                ..
            } = &mut *self;
            let mut env = Env {
                doc: document,
                columns,
                positions,
            };

            if removes_all {
                for section in [&mut *header, &mut *footer] {
                    let row_count = section.section.row_count;
                    if row_count > 0 {
                        section.paint_remove_rows(&mut env, 0, row_count)?;
                    }
                }
                body.detach_all(&mut env)?;
            } else {
                for (row, tr) in header.materialized(env.doc) {
                    header.section.remove_cells(&mut env, tr, row, index, count)?;
                }
                for (row, tr) in body.materialized() {
                    body.section.remove_cells(&mut env, tr, row, index, count)?;
                }
                for (row, tr) in footer.materialized(env.doc) {
                    footer.section.remove_cells(&mut env, tr, row, index, count)?;
                }
            }

            for section in [&mut header.section, &mut body.section, &mut footer.section] {
                section.flyweight.remove_cells(index, count);
            }
        }

        self.columns.remove(index, count)?;
        self.reapply_column_widths();
        Ok(())
    }

    /// Sets the width of a column and applies it to every materialized cell.
    pub fn set_column_width(&mut self, index: usize, px: f64) -> Result<()> {
        self.columns.set_width(index, px)?;
        debug!(target: "escalator", index, px, "column width changed");
        self.reapply_column_widths();
        Ok(())
    }

    /// The width of a column, or a negative value if unknown.
    pub fn column_width(&self, index: usize) -> Result<f64> {
        self.columns.column_width(index)
    }

    pub fn column_count(&self) -> usize {
        self.columns.column_count()
    }

    fn reapply_column_widths(&mut self) {
        let rows: Vec<(&Section, ElementId)> = self
            .header
            .materialized(&self.document)
            .into_iter()
            .map(|(_, tr)| (&self.header.section, tr))
            .chain(
                self.body
                    .materialized()
                    .into_iter()
                    .map(|(_, tr)| (&self.body.section, tr)),
            )
            .chain(
                self.footer
                    .materialized(&self.document)
                    .into_iter()
                    .map(|(_, tr)| (&self.footer.section, tr)),
            )
            .collect();
        for (section, tr) in rows {
            section.reapply_column_widths(&mut self.document, &self.columns, tr);
        }

        let mut env = Env {
            doc: &mut self.document,
            columns: &self.columns,
            positions: &mut self.positions,
        };
        self.body.spacers.reapply_widths(&mut env);
    }

    /// Scrolls the body, recycling row elements as needed.
    pub fn set_scroll_top(&mut self, px: f64) {
        let mut env = Env {
            doc: &mut self.document,
            columns: &self.columns,
            positions: &mut self.positions,
        };
        self.body.set_scroll_top(&mut env, px);
    }

    pub fn scroll_top(&self) -> f64 {
        self.body.scroll_top()
    }

    /// Resizes the body viewport, adding or removing row elements to fill it.
    pub fn set_viewport_height(&mut self, px: f64) -> Result<()> {
        let mut env = Env {
            doc: &mut self.document,
            columns: &self.columns,
            positions: &mut self.positions,
        };
        self.body.set_viewport_height(&mut env, px)
    }

    pub fn viewport_height(&self) -> f64 {
        self.body.viewport_height()
    }

    /// Scrolls the body so that a row ends up at `destination`, `padding` pixels away from the
    /// viewport's edge.
    ///
    /// The scroll position is clamped as with [`set_scroll_top`](Self::set_scroll_top), so rows
    /// near either end may not reach the requested spot.
    pub fn scroll_to_row(
        &mut self,
        row: usize,
        destination: ScrollDestination,
        padding: f64,
    ) -> Result<()> {
        let mut env = Env {
            doc: &mut self.document,
            columns: &self.columns,
            positions: &mut self.positions,
        };
        self.body.scroll_to_row(&mut env, row, destination, padding)
    }

    /// Scrolls the body so that the spacer below `row` ends up at `destination`.
    pub fn scroll_to_spacer(
        &mut self,
        row: usize,
        destination: ScrollDestination,
        padding: f64,
    ) -> Result<()> {
        let mut env = Env {
            doc: &mut self.document,
            columns: &self.columns,
            positions: &mut self.positions,
        };
        self.body.scroll_to_spacer(&mut env, row, destination, padding)
    }

    /// Scrolls the body so that a row and its spacer, if any, end up at `destination` together.
    pub fn scroll_to_row_and_spacer(
        &mut self,
        row: usize,
        destination: ScrollDestination,
        padding: f64,
    ) -> Result<()> {
        let mut env = Env {
            doc: &mut self.document,
            columns: &self.columns,
            positions: &mut self.positions,
        };
        self.body.scroll_to_row_and_spacer(&mut env, row, destination, padding)
    }

    /// The logical body rows that currently have row elements.
    pub fn visible_row_range(&self) -> Range<usize> {
        self.body.visible_row_range()
    }

    pub fn add_row_visibility_change_handler<F>(&mut self, handler: F) -> HandlerRegistration
    where
        F: 'static + FnMut(RowVisibilityChangeEvent) + Send,
    {
        self.body.events.add_handler(EventHandler::new(handler))
    }

    pub fn remove_row_visibility_change_handler(
        &mut self,
        registration: HandlerRegistration,
    ) -> bool {
        self.body.events.remove_handler(registration)
    }

    /// A channel receiving every visibility change from now on.
    pub fn subscribe_row_visibility(&mut self) -> Receiver<RowVisibilityChangeEvent> {
        self.body.events.subscribe()
    }

    /// Finds the cell an element belongs to, in any section.
    pub fn get_cell(&self, element: ElementId) -> Option<(SectionKind, escalator_core::Cell)> {
        if let Some(cell) = self.header.get_cell(&self.document, element) {
            return Some((SectionKind::Header, cell));
        }
        if let Some(cell) = self.body.get_cell(&self.document, element) {
            return Some((SectionKind::Body, cell));
        }
        self.footer
            .get_cell(&self.document, element)
            .map(|cell| (SectionKind::Footer, cell))
    }
}

impl Default for Escalator {
    fn default() -> Self {
        Escalator::new()
    }
}

#[test]
fn test_rejects_invalid_row_height() {
    let config = EscalatorConfig {
        default_row_height: 0.5,
        ..EscalatorConfig::default()
    };
    assert_eq!(
        Escalator::with_config(config).err(),
        Some(escalator_core::Error::InvalidRowHeight(0.5))
    );

    let config = EscalatorConfig {
        default_row_height: f64::INFINITY,
        ..EscalatorConfig::default()
    };
    assert_eq!(
        Escalator::with_config(config).err(),
        Some(escalator_core::Error::InvalidRowHeight(f64::INFINITY))
    );
}

#[test]
fn test_rejects_infinite_viewport() {
    let config = EscalatorConfig {
        viewport_height: f64::INFINITY,
        ..EscalatorConfig::default()
    };
    assert_eq!(
        Escalator::with_config(config).err(),
        Some(escalator_core::Error::InvalidViewportHeight(f64::INFINITY))
    );
}
