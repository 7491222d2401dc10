//! Row containers.
//!
//! The escalator is split into three sections: a header, a body and a footer. Each one is a
//! [`RowContainer`]; the body additionally handles spacers and only materializes the rows that
//! fit into its viewport.
//!
//! Sections only create, move and destroy elements. Everything that goes into the cells comes
//! from the section's [`EscalatorUpdater`].

use crate::columns::ColumnConfiguration;
use crate::position::PositionBookkeeper;
use escalator_core::dom::HEIGHT;
use escalator_core::dom::WIDTH;
use escalator_core::error::check_row_range;
use escalator_core::{
    Cell, Document, ElementId, Error, EscalatorUpdater, FlyweightRow, Result, SpacerUpdater, Tag,
};
use std::fmt;
use tracing::{debug, trace};

/// The shared state sections operate on.
pub(crate) struct Env<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) columns: &'a ColumnConfiguration,
    pub(crate) positions: &'a mut PositionBookkeeper,
}

/// Host-facing API of a section.
pub trait RowContainer {
    /// Adds `count` rows at `index`.
    ///
    /// Only the new rows are rendered. Rows after them keep their content, so if what they show
    /// depends on their index, they have to be refreshed separately.
    fn insert_rows(&mut self, index: usize, count: usize) -> Result<()>;

    /// Removes `count` rows starting at `index`.
    fn remove_rows(&mut self, index: usize, count: usize) -> Result<()>;

    /// Asks the updater to render the given rows again, if they're materialized.
    fn refresh_rows(&mut self, index: usize, count: usize) -> Result<()>;

    /// The number of logical rows.
    fn row_count(&self) -> usize;

    /// Sets the height of every row. Must be at least one pixel.
    fn set_default_row_height(&mut self, px: f64) -> Result<()>;

    fn default_row_height(&self) -> f64;

    /// Replaces the updater and renders all rows with the new one.
    fn set_escalator_updater(&mut self, updater: Box<dyn EscalatorUpdater>);

    fn escalator_updater(&self) -> &dyn EscalatorUpdater;

    /// Finds the cell an element belongs to.
    ///
    /// Returns `None` for the section element itself, row elements, and anything outside this
    /// section.
    fn get_cell(&self, element: ElementId) -> Option<Cell>;

    /// The element of a logical row.
    ///
    /// Fails if the index is out of range, or if the row is not materialized at the moment.
    fn get_row_element(&self, index: usize) -> Result<ElementId>;

    /// The section element.
    fn element(&self) -> ElementId;
}

/// The body's additional API.
pub trait BodyRowContainer: RowContainer {
    /// Creates or resizes the spacer beneath a row, or removes it if `height` is negative.
    fn set_spacer(&mut self, row_index: usize, height: f64) -> Result<()>;

    /// Destroys all spacers with the current updater and initializes them again with the new one.
    fn set_spacer_updater(&mut self, updater: Box<dyn SpacerUpdater>);

    fn spacer_updater(&self) -> &dyn SpacerUpdater;
}

/// Kinds of sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Header,
    Body,
    Footer,
}

impl SectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Body => "body",
            SectionKind::Footer => "footer",
        }
    }

    fn cell_tag(&self) -> Tag {
        match self {
            SectionKind::Header => Tag::HeaderCell,
            SectionKind::Body | SectionKind::Footer => Tag::Cell,
        }
    }
}

/// Updater calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    PreAttach,
    PostAttach,
    Update,
    PreDetach,
    PostDetach,
}

/// How new cell elements of a section look.
pub(crate) struct CellTemplate {
    tag: Tag,
    height: f64,
    class_name: String,
}

impl CellTemplate {
    pub(crate) fn create(&self, doc: &mut Document, width: f64) -> ElementId {
        let cell = doc.create_element(self.tag);
        doc.set_px(cell, HEIGHT, self.height);
        if width >= 0. {
            doc.set_px(cell, WIDTH, width);
        }
        doc.add_class_name(cell, &self.class_name);
        cell
    }
}

/// What all sections have in common: a section element, a row count, an updater and the
/// flyweight row used to talk to it.
pub(crate) struct Section {
    pub(crate) kind: SectionKind,
    pub(crate) root: ElementId,
    pub(crate) row_count: usize,
    pub(crate) default_row_height: f64,
    pub(crate) updater: Box<dyn EscalatorUpdater>,
    pub(crate) flyweight: FlyweightRow,
    pub(crate) style_name: String,
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Section")
            .field("kind", &self.kind)
            .field("root", &self.root)
            .field("row_count", &self.row_count)
            .field("default_row_height", &self.default_row_height)
            .finish()
    }
}

impl Section {
    pub(crate) fn new(
        doc: &mut Document,
        parent: ElementId,
        kind: SectionKind,
        style_primary_name: &str,
        default_row_height: f64,
    ) -> Result<Section> {
        let style_name = format!("{}-{}", style_primary_name, kind.name());
        let root = doc.create_element(Tag::Section);
        doc.add_class_name(root, &style_name);
        doc.append_child(parent, root)?;

        Ok(Section {
            kind,
            root,
            row_count: 0,
            default_row_height,
            updater: Box::new(()),
            flyweight: FlyweightRow::new(),
            style_name,
        })
    }

    /// Runs one updater call over a fresh traversal of the bound row.
    pub(crate) fn run(
        &mut self,
        doc: &mut Document,
        pass: Pass,
        offset: usize,
        count: usize,
        attached: bool,
    ) {
        let (row, mut cells) = if attached {
            self.flyweight.cells_range(doc, offset, count)
        } else {
            self.flyweight.unattached_cells(doc, offset, count)
        };
        let updater = &mut *self.updater;
        match pass {
            Pass::PreAttach => updater.pre_attach(row, &mut cells),
            Pass::PostAttach => updater.post_attach(row, &mut cells),
            Pass::Update => updater.update(row, &mut cells),
            Pass::PreDetach => updater.pre_detach(row, &mut cells),
            Pass::PostDetach => updater.post_detach(row, &mut cells),
        }
    }

    fn run_all(&mut self, doc: &mut Document, pass: Pass) {
        let count = self.flyweight.column_count();
        self.run(doc, pass, 0, count, true);
    }

    pub(crate) fn cell_template(&self) -> CellTemplate {
        CellTemplate {
            tag: self.kind.cell_tag(),
            height: self.default_row_height,
            class_name: format!("{}-cell", self.style_name),
        }
    }

    /// Creates a detached row element with one cell per column.
    pub(crate) fn create_row_element(&self, env: &mut Env) -> Result<ElementId> {
        let tr = env.doc.create_element(Tag::Row);
        env.doc.add_class_name(tr, &format!("{}-row", self.style_name));
        let template = self.cell_template();
        for column in 0..env.columns.column_count() {
            let width = env.columns.column_width(column)?;
            let cell = template.create(env.doc, width);
            env.doc.append_child(tr, cell)?;
        }
        Ok(tr)
    }

    /// Inserts a row element at `dom_index` in the section element, calling the updater around
    /// it.
    pub(crate) fn attach_row(
        &mut self,
        env: &mut Env,
        tr: ElementId,
        logical_row: usize,
        dom_index: usize,
    ) -> Result<()> {
        trace!(
            target: "escalator::container",
            section = self.kind.name(),
            logical_row,
            "attaching row"
        );
        self.flyweight.setup(tr, logical_row, env.columns.widths());
        self.run_all(env.doc, Pass::PreAttach);
        let inserted = env.doc.insert_child(self.root, dom_index, tr);
        if inserted.is_ok() {
            self.run_all(env.doc, Pass::PostAttach);
            self.run_all(env.doc, Pass::Update);
        }
        self.flyweight.teardown();
        inserted
    }

    /// Removes a row element from the section, calling the updater around it, and destroys it.
    pub(crate) fn detach_row(
        &mut self,
        env: &mut Env,
        tr: ElementId,
        logical_row: usize,
    ) -> Result<()> {
        trace!(
            target: "escalator::container",
            section = self.kind.name(),
            logical_row,
            "detaching row"
        );
        self.flyweight.setup(tr, logical_row, env.columns.widths());
        self.run_all(env.doc, Pass::PreDetach);
        let removed = env.doc.remove_from_parent(tr);
        if removed.is_ok() {
            self.run_all(env.doc, Pass::PostDetach);
        }
        self.flyweight.teardown();
        removed?;

        env.positions.remove(tr);
        env.doc.destroy(tr)
    }

    /// Renders a materialized row again, possibly as a different logical row.
    pub(crate) fn refresh_row(&mut self, env: &mut Env, tr: ElementId, logical_row: usize) {
        self.flyweight.setup(tr, logical_row, env.columns.widths());
        self.run_all(env.doc, Pass::Update);
        self.flyweight.teardown();
    }

    /// Adds cell elements for new columns to a materialized row.
    ///
    /// The flyweight must already have slots for the new columns.
    pub(crate) fn insert_cells(
        &mut self,
        env: &mut Env,
        tr: ElementId,
        logical_row: usize,
        offset: usize,
        count: usize,
    ) -> Result<()> {
        self.flyweight.setup(tr, logical_row, env.columns.widths());

        let template = self.cell_template();
        let mut created = Vec::with_capacity(count);
        {
            let (_, mut cells) = self.flyweight.unattached_cells(env.doc, offset, count);
            while let Some(mut cell) = cells.next_cell() {
                let width = env.columns.column_width(cell.column()).unwrap_or(-1.);
                let element = template.create(cell.document_mut(), width);
                cell.set_element(element);
                created.push(element);
            }
        }

        self.run(env.doc, Pass::PreAttach, offset, count, false);
        let mut inserted = Ok(());
        for (i, cell) in created.iter().enumerate() {
            inserted = env.doc.insert_child(tr, offset + i, *cell);
            if inserted.is_err() {
                break;
            }
        }
        if inserted.is_ok() {
            self.run(env.doc, Pass::PostAttach, offset, count, false);
            self.run(env.doc, Pass::Update, offset, count, false);
        }
        self.flyweight.teardown();
        inserted
    }

    /// Removes the cell elements of removed columns from a materialized row.
    ///
    /// The flyweight must still have slots for the removed columns.
    pub(crate) fn remove_cells(
        &mut self,
        env: &mut Env,
        tr: ElementId,
        logical_row: usize,
        offset: usize,
        count: usize,
    ) -> Result<()> {
        self.flyweight.setup(tr, logical_row, env.columns.widths());
        self.run(env.doc, Pass::PreDetach, offset, count, true);

        let removed: Vec<ElementId> = env.doc.children(tr)[offset..offset + count].to_vec();
        for cell in &removed {
            env.doc.remove_from_parent(*cell)?;
        }
        self.run(env.doc, Pass::PostDetach, offset, count, false);
        self.flyweight.teardown();

        for cell in removed {
            env.doc.destroy(cell)?;
        }
        Ok(())
    }

    pub(crate) fn reapply_row_height(&self, doc: &mut Document, tr: ElementId) {
        for cell in doc.children(tr).to_vec() {
            doc.set_px(cell, HEIGHT, self.default_row_height);
        }
    }

    /// Applies the column widths to a row's cells, widening cells that span several columns.
    pub(crate) fn reapply_column_widths(
        &self,
        doc: &mut Document,
        columns: &ColumnConfiguration,
        tr: ElementId,
    ) {
        let widths = columns.widths();
        let cells = doc.children(tr).to_vec();
        let mut column = 0;
        while column < cells.len() {
            let cell = cells[column];
            let span = doc.col_span(cell).max(1);
            let end = (column + span).min(widths.len());
            let known: Vec<f64> = widths[column.min(end)..end]
                .iter()
                .copied()
                .filter(|w| *w >= 0.)
                .collect();
            if !known.is_empty() {
                doc.set_px(cell, WIDTH, known.iter().sum());
            }
            column += span;
        }
    }

    /// Walks up from an element to the cell and row elements it belongs to.
    pub(crate) fn find_cell(
        &self,
        doc: &Document,
        element: ElementId,
    ) -> Option<(ElementId, ElementId)> {
        let mut cell = element;
        loop {
            let row = doc.parent(cell)?;
            if doc.parent(row) == Some(self.root) && doc.get(row)?.tag() == Tag::Row {
                return Some((row, cell));
            }
            cell = row;
        }
    }

    pub(crate) fn check_row_height(px: f64) -> Result<()> {
        if px.is_finite() && px >= 1. {
            Ok(())
        } else {
            Err(Error::InvalidRowHeight(px))
        }
    }

    pub(crate) fn check_insert(&self, index: usize, count: usize) -> Result<()> {
        if index > self.row_count {
            return Err(Error::RowIndexOutOfBounds {
                index,
                row_count: self.row_count,
            });
        }
        if count < 1 {
            return Err(Error::InvalidRowCount(count));
        }
        Ok(())
    }
}

/// A header or footer: every row is materialized, in order.
#[derive(Debug)]
pub struct StaticSection {
    pub(crate) section: Section,
}

impl StaticSection {
    pub(crate) fn new(section: Section) -> StaticSection {
        StaticSection { section }
    }

    fn is_painted(&self, env: &Env) -> bool {
        env.columns.column_count() > 0
    }

    /// Materialized rows with their logical indices.
    pub(crate) fn materialized(&self, doc: &Document) -> Vec<(usize, ElementId)> {
        doc.children(self.section.root)
            .iter()
            .copied()
            .enumerate()
            .collect()
    }

    pub(crate) fn insert_rows(&mut self, env: &mut Env, index: usize, count: usize) -> Result<()> {
        self.section.check_insert(index, count)?;
        self.section.row_count += count;
        debug!(
            target: "escalator::container",
            section = self.section.kind.name(),
            index,
            count,
            "inserting rows"
        );

        if self.is_painted(env) {
            self.paint_insert_rows(env, index, count)?;
        }
        Ok(())
    }

    pub(crate) fn paint_insert_rows(
        &mut self,
        env: &mut Env,
        index: usize,
        count: usize,
    ) -> Result<()> {
        for row in index..index + count {
            let tr = self.section.create_row_element(env)?;
            self.section.attach_row(env, tr, row, row)?;
        }
        Ok(())
    }

    pub(crate) fn remove_rows(&mut self, env: &mut Env, index: usize, count: usize) -> Result<()> {
        check_row_range(index, count, self.section.row_count)?;
        debug!(
            target: "escalator::container",
            section = self.section.kind.name(),
            index,
            count,
            "removing rows"
        );

        if self.is_painted(env) {
            self.paint_remove_rows(env, index, count)?;
        }
        self.section.row_count -= count;
        Ok(())
    }

    pub(crate) fn paint_remove_rows(
        &mut self,
        env: &mut Env,
        index: usize,
        count: usize,
    ) -> Result<()> {
        for row in index..index + count {
            let tr = env
                .doc
                .child(self.section.root, index)
                .ok_or(Error::RowNotInDom(row))?;
            self.section.detach_row(env, tr, row)?;
        }
        Ok(())
    }

    pub(crate) fn refresh_rows(&mut self, env: &mut Env, index: usize, count: usize) -> Result<()> {
        check_row_range(index, count, self.section.row_count)?;
        for row in index..index + count {
            if let Some(tr) = env.doc.child(self.section.root, row) {
                self.section.refresh_row(env, tr, row);
            }
        }
        Ok(())
    }

    pub(crate) fn set_default_row_height(&mut self, env: &mut Env, px: f64) -> Result<()> {
        Section::check_row_height(px)?;
        self.section.default_row_height = px;
        for (_, tr) in self.materialized(env.doc) {
            self.section.reapply_row_height(env.doc, tr);
        }
        Ok(())
    }

    pub(crate) fn set_escalator_updater(
        &mut self,
        env: &mut Env,
        updater: Box<dyn EscalatorUpdater>,
    ) {
        debug!(
            target: "escalator::container",
            section = self.section.kind.name(),
            "updater replaced"
        );
        self.section.updater = updater;
        for (row, tr) in self.materialized(env.doc) {
            self.section.refresh_row(env, tr, row);
        }
    }

    pub(crate) fn get_cell(&self, doc: &Document, element: ElementId) -> Option<Cell> {
        let (tr, cell) = self.section.find_cell(doc, element)?;
        Some(Cell {
            row: doc.index_in_parent(tr)?,
            column: doc.index_in_parent(cell)?,
            element: cell,
        })
    }

    pub(crate) fn get_row_element(&self, doc: &Document, index: usize) -> Result<ElementId> {
        if index >= self.section.row_count {
            return Err(Error::RowIndexOutOfBounds {
                index,
                row_count: self.section.row_count,
            });
        }
        doc.child(self.section.root, index)
            .ok_or(Error::RowNotInDom(index))
    }
}

/// A header or footer bound to the escalator's shared state.
pub struct StaticRows<'a> {
    pub(crate) section: &'a mut StaticSection,
    pub(crate) env: Env<'a>,
}

impl<'a> RowContainer for StaticRows<'a> {
    fn insert_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.section.insert_rows(&mut self.env, index, count)
    }

    fn remove_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.section.remove_rows(&mut self.env, index, count)
    }

    fn refresh_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.section.refresh_rows(&mut self.env, index, count)
    }

    fn row_count(&self) -> usize {
        self.section.section.row_count
    }

    fn set_default_row_height(&mut self, px: f64) -> Result<()> {
        self.section.set_default_row_height(&mut self.env, px)
    }

    fn default_row_height(&self) -> f64 {
        self.section.section.default_row_height
    }

    fn set_escalator_updater(&mut self, updater: Box<dyn EscalatorUpdater>) {
        self.section.set_escalator_updater(&mut self.env, updater)
    }

    fn escalator_updater(&self) -> &dyn EscalatorUpdater {
        &*self.section.section.updater
    }

    fn get_cell(&self, element: ElementId) -> Option<Cell> {
        self.section.get_cell(self.env.doc, element)
    }

    fn get_row_element(&self, index: usize) -> Result<ElementId> {
        self.section.get_row_element(self.env.doc, index)
    }

    fn element(&self) -> ElementId {
        self.section.section.root
    }
}
