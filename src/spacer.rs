//! Spacers.
//!
//! A spacer is an extra, height-bearing element anchored beneath a body row. Rows and spacers
//! below it are pushed down by its height.

use crate::container::Env;
use escalator_core::dom::{HEIGHT, WIDTH};
use escalator_core::{Document, ElementId, Rect, Result, Spacer, SpacerUpdater, Tag};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct SpacerElements {
    root: ElementId,
    cell: ElementId,
    deco: ElementId,
    height: f64,
}

/// Spacers of the body, keyed by the logical row they are anchored to.
pub(crate) struct SpacerContainer {
    spacers: BTreeMap<usize, SpacerElements>,
    updater: Box<dyn SpacerUpdater>,
    style_name: String,
}

impl fmt::Debug for SpacerContainer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SpacerContainer")
            .field("spacers", &self.spacers)
            .finish()
    }
}

impl SpacerContainer {
    pub(crate) fn new(style_name: &str) -> SpacerContainer {
        SpacerContainer {
            spacers: BTreeMap::new(),
            updater: Box::new(()),
            style_name: format!("{}-spacer", style_name),
        }
    }

    pub(crate) fn height(&self, row: usize) -> Option<f64> {
        self.spacers.get(&row).map(|s| s.height)
    }

    /// Rows that have a spacer, ascending.
    pub(crate) fn rows(&self) -> Vec<usize> {
        self.spacers.keys().copied().collect()
    }

    pub(crate) fn element(&self, row: usize) -> Option<ElementId> {
        self.spacers.get(&row).map(|s| s.root)
    }

    pub(crate) fn heights_sum(&self) -> f64 {
        self.spacers.values().map(|s| s.height).sum()
    }

    /// Sum of the heights of spacers anchored above `row`.
    pub(crate) fn heights_sum_until(&self, row: usize) -> f64 {
        self.spacers.range(..row).map(|(_, s)| s.height).sum()
    }

    pub(crate) fn updater(&self) -> &dyn SpacerUpdater {
        &*self.updater
    }

    /// Creates, resizes or (for a negative height) removes a spacer. Does not validate the row.
    pub(crate) fn set_spacer(
        &mut self,
        env: &mut Env,
        parent: ElementId,
        row: usize,
        height: f64,
    ) -> Result<()> {
        if height < 0. {
            if let Some(spacer) = self.spacers.remove(&row) {
                debug!(target: "escalator::spacer", row, "removing spacer");
                self.destroy(env, row, spacer)?;
            }
        } else if let Some(spacer) = self.spacers.get_mut(&row) {
            spacer.height = height;
            set_height(env.doc, spacer, height);
        } else {
            debug!(target: "escalator::spacer", row, height, "creating spacer");
            let spacer = self.create(env, parent, height)?;
            self.spacers.insert(row, spacer);
            self.init(env.doc, row, spacer);
        }
        Ok(())
    }

    fn create(&self, env: &mut Env, parent: ElementId, height: f64) -> Result<SpacerElements> {
        let doc = &mut *env.doc;
        let root = doc.create_element(Tag::Spacer);
        doc.add_class_name(root, &self.style_name);
        doc.set_px(root, WIDTH, env.columns.calculate_row_width());

        let cell = doc.create_element(Tag::Cell);
        doc.set_col_span(cell, env.columns.column_count().max(1));
        doc.append_child(root, cell)?;

        let deco = doc.create_element(Tag::Deco);
        doc.add_class_name(deco, &format!("{}-deco", self.style_name));

        doc.append_child(parent, root)?;
        doc.append_child(parent, deco)?;

        let spacer = SpacerElements {
            root,
            cell,
            deco,
            height,
        };
        set_height(doc, &spacer, height);
        Ok(spacer)
    }

    fn init(&mut self, doc: &mut Document, row: usize, spacer: SpacerElements) {
        let mut view = Spacer::new(doc, row, spacer.root, spacer.cell, spacer.deco);
        self.updater.init(&mut view);
    }

    fn destroy_content(&mut self, doc: &mut Document, row: usize, spacer: SpacerElements) {
        let mut view = Spacer::new(doc, row, spacer.root, spacer.cell, spacer.deco);
        self.updater.destroy(&mut view);
    }

    fn destroy(&mut self, env: &mut Env, row: usize, spacer: SpacerElements) -> Result<()> {
        self.destroy_content(env.doc, row, spacer);
        env.positions.remove(spacer.root);
        env.positions.remove(spacer.deco);
        env.doc.destroy(spacer.root)?;
        env.doc.destroy(spacer.deco)
    }

    /// Moves spacers at and after `index` by `delta` rows.
    pub(crate) fn shift_by_rows(&mut self, index: usize, delta: isize) {
        let tail = self.spacers.split_off(&index);
        for (row, spacer) in tail {
            self.spacers.insert(row.saturating_add_signed(delta), spacer);
        }
    }

    /// Removes the spacers of removed rows and moves the ones below up.
    pub(crate) fn remove_rows(&mut self, env: &mut Env, index: usize, count: usize) -> Result<()> {
        let mut removed = self.spacers.split_off(&index);
        let mut tail = removed.split_off(&(index + count));
        self.spacers.append(&mut tail);
        for (row, spacer) in removed {
            debug!(target: "escalator::spacer", row, "removing spacer of removed row");
            self.destroy(env, row, spacer)?;
        }
        self.shift_by_rows(index + count, -(count as isize));
        Ok(())
    }

    /// Destroys every spacer with the old updater and initializes it again with the new one.
    pub(crate) fn set_updater(&mut self, doc: &mut Document, updater: Box<dyn SpacerUpdater>) {
        let spacers: Vec<_> = self.spacers.iter().map(|(r, s)| (*r, *s)).collect();
        for (row, spacer) in &spacers {
            self.destroy_content(doc, *row, *spacer);
        }
        self.updater = updater;
        debug!(target: "escalator::spacer", "spacer updater replaced");
        for (row, spacer) in spacers {
            self.init(doc, row, spacer);
        }
    }

    /// Places every spacer beneath its row and hides the ones outside the viewport.
    pub(crate) fn reposition(
        &self,
        env: &mut Env,
        row_top: impl Fn(usize) -> f64,
        row_height: f64,
        viewport: Rect,
    ) {
        for (row, spacer) in &self.spacers {
            let top = row_top(*row) + row_height;
            env.positions.set(env.doc, spacer.root, 0., top);
            env.positions.set(env.doc, spacer.deco, 0., top);

            let visible = viewport.intersects(Rect::band(top, spacer.height));
            env.doc.set_hidden(spacer.root, !visible);
            env.doc.set_hidden(spacer.deco, !visible);
        }
    }

    /// Makes the spacer cells span all columns again.
    pub(crate) fn reapply_widths(&self, env: &mut Env) {
        let column_count = env.columns.column_count().max(1);
        let row_width = env.columns.calculate_row_width();
        for spacer in self.spacers.values() {
            env.doc.set_px(spacer.root, WIDTH, row_width);
            env.doc.set_col_span(spacer.cell, column_count);
        }
    }
}

fn set_height(doc: &mut Document, spacer: &SpacerElements, height: f64) {
    doc.set_px(spacer.root, HEIGHT, height);
    doc.set_px(spacer.cell, HEIGHT, height);
    doc.set_px(spacer.deco, HEIGHT, height);
}
