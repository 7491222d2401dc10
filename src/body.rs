//! The body section.
//!
//! Only the rows inside the viewport (plus one) are backed by row elements. These are kept in
//! visual order, starting at logical row `top_row`. When the window moves, row elements leaving
//! it are moved to the other end and rendered again as the rows entering it.

use crate::container::{BodyRowContainer, Env, RowContainer, Section};
use crate::events::{EventBus, RowVisibilityChangeEvent};
use crate::scroll::ScrollDestination;
use crate::spacer::SpacerContainer;
use escalator_core::error::check_row_range;
use escalator_core::{
    Cell, Document, ElementId, Error, EscalatorUpdater, Rect, Result, SpacerUpdater,
};
use std::collections::VecDeque;
use std::ops::Range;
use tracing::{debug, trace};

/// The body section.
#[derive(Debug)]
pub struct BodySection {
    pub(crate) section: Section,
    rows: VecDeque<ElementId>,
    top_row: usize,
    viewport_height: f64,
    scroll_top: f64,
    pub(crate) spacers: SpacerContainer,
    pub(crate) events: EventBus,
}

impl BodySection {
    pub(crate) fn new(section: Section, viewport_height: f64) -> BodySection {
        let spacers = SpacerContainer::new(&section.style_name);
        BodySection {
            section,
            rows: VecDeque::new(),
            top_row: 0,
            viewport_height: viewport_height.max(0.),
            scroll_top: 0.,
            spacers,
            events: EventBus::new(),
        }
    }

    fn row_height(&self) -> f64 {
        self.section.default_row_height
    }

    /// How many row elements fit into the viewport, plus one for partially visible rows.
    pub fn max_row_capacity(&self) -> usize {
        let fitting = (self.viewport_height / self.row_height()).ceil().max(0.) as usize;
        fitting.saturating_add(1)
    }

    pub(crate) fn check_viewport_height(px: f64) -> Result<()> {
        if px.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidViewportHeight(px))
        }
    }

    /// Top of a logical row, counting the spacers above it.
    pub fn row_top(&self, row: usize) -> f64 {
        row as f64 * self.row_height() + self.spacers.heights_sum_until(row)
    }

    /// Height of all rows and spacers.
    pub fn content_height(&self) -> f64 {
        self.section.row_count as f64 * self.row_height() + self.spacers.heights_sum()
    }

    fn max_scroll_top(&self) -> f64 {
        (self.content_height() - self.viewport_height).max(0.)
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// The first logical row that is at least partially below `px`.
    fn first_row_below(&self, px: f64) -> usize {
        let h = self.row_height();
        let (mut low, mut high) = (0, self.section.row_count);
        while low < high {
            let mid = low + (high - low) / 2;
            if self.row_top(mid) + h > px {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        low
    }

    /// The logical rows that currently have row elements.
    pub fn visible_row_range(&self) -> Range<usize> {
        if self.rows.is_empty() {
            0..0
        } else {
            self.top_row..self.top_row + self.rows.len()
        }
    }

    /// Materialized rows with their logical indices.
    pub(crate) fn materialized(&self) -> Vec<(usize, ElementId)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(pos, tr)| (self.top_row + pos, *tr))
            .collect()
    }

    fn is_painted(&self, env: &Env) -> bool {
        env.columns.column_count() > 0
    }

    fn viewport(&self) -> Rect {
        Rect::band(self.scroll_top, self.viewport_height)
    }

    /// Puts rows from visual position `from` onwards, and all spacers, where they belong.
    fn reposition(&self, env: &mut Env, from: usize) {
        for (pos, tr) in self.rows.iter().enumerate().skip(from) {
            let top = self.row_top(self.top_row + pos);
            env.positions.set(env.doc, *tr, 0., top);
        }
        self.spacers
            .reposition(env, |row| self.row_top(row), self.row_height(), self.viewport());
    }

    fn fire_visibility(&mut self) {
        let range = self.visible_row_range();
        self.events
            .fire_if_changed(RowVisibilityChangeEvent::new(range.start, range.len()));
    }

    /// Moves the window to match the scroll position, clamping the scroll position first.
    fn update_window(&mut self, env: &mut Env) {
        self.scroll_top = self.scroll_top.clamp(0., self.max_scroll_top());

        let len = self.rows.len();
        if len == 0 {
            self.top_row = 0;
        } else {
            let target = self
                .first_row_below(self.scroll_top)
                .min(self.section.row_count - len);
            self.move_window(env, target);
        }
        self.reposition(env, 0);
        self.fire_visibility();
    }

    /// Recycles row elements so that the window starts at `target`.
    fn move_window(&mut self, env: &mut Env, target: usize) {
        let len = self.rows.len();
        let top = self.top_row;
        if target == top {
            return;
        }
        trace!(target: "escalator::body", from = top, to = target, "moving window");

        if target.abs_diff(top) >= len {
            self.top_row = target;
            for (pos, tr) in self.rows.clone().into_iter().enumerate() {
                self.section.refresh_row(env, tr, target + pos);
            }
        } else if target > top {
            for k in 0..target - top {
                if let Some(tr) = self.rows.pop_front() {
                    self.section.refresh_row(env, tr, top + len + k);
                    self.rows.push_back(tr);
                }
            }
            self.top_row = target;
        } else {
            for k in 0..top - target {
                if let Some(tr) = self.rows.pop_back() {
                    self.section.refresh_row(env, tr, top - 1 - k);
                    self.rows.push_front(tr);
                }
            }
            self.top_row = target;
        }
    }

    /// Makes the number of row elements match the capacity, reusing `spare` row elements first.
    ///
    /// Spare rows carry the logical row they showed last; the ones left over are detached.
    fn sync_row_count(&mut self, env: &mut Env, mut spare: Vec<(usize, ElementId)>) -> Result<()> {
        let wanted = if self.is_painted(env) {
            self.max_row_capacity().min(self.section.row_count)
        } else {
            0
        };

        while self.rows.len() < wanted {
            let bottom = self.top_row + self.rows.len();
            let at_front = bottom >= self.section.row_count;
            let logical = if at_front {
                self.top_row -= 1;
                self.top_row
            } else {
                bottom
            };

            let tr = match spare.pop() {
                Some((_, tr)) => {
                    self.section.refresh_row(env, tr, logical);
                    tr
                }
                None => {
                    let tr = self.section.create_row_element(env)?;
                    let dom_index = env.doc.child_count(self.section.root);
                    self.section.attach_row(env, tr, logical, dom_index)?;
                    tr
                }
            };
            if at_front {
                self.rows.push_front(tr);
            } else {
                self.rows.push_back(tr);
            }
        }

        while self.rows.len() > wanted {
            let logical = self.top_row + self.rows.len() - 1;
            if let Some(tr) = self.rows.pop_back() {
                spare.push((logical, tr));
            }
        }

        for (logical, tr) in spare {
            self.section.detach_row(env, tr, logical)?;
        }
        if self.rows.is_empty() {
            self.top_row = 0;
        }
        Ok(())
    }

    pub(crate) fn insert_rows(&mut self, env: &mut Env, index: usize, count: usize) -> Result<()> {
        self.section.check_insert(index, count)?;
        debug!(target: "escalator::body", index, count, "inserting rows");
        self.section.row_count += count;
        self.spacers.shift_by_rows(index, count as isize);

        if !self.is_painted(env) {
            return Ok(());
        }

        let top = self.top_row;
        let len = self.rows.len();
        if index < top {
            // keep showing the same rows
            self.top_row += count;
            self.scroll_top += count as f64 * self.row_height();
        } else if index <= top + len {
            let capacity = self.max_row_capacity();
            let pos = index - top;
            let visible = count.min(top.saturating_add(capacity) - index);
            let fresh = visible.min(capacity.saturating_sub(len));
            let recycled = visible - fresh;

            let mut reused = Vec::with_capacity(recycled);
            for _ in 0..recycled {
                if let Some(tr) = self.rows.pop_back() {
                    reused.push(tr);
                }
            }

            for i in 0..visible {
                let logical = index + i;
                let tr = match reused.pop() {
                    Some(tr) => {
                        self.section.refresh_row(env, tr, logical);
                        tr
                    }
                    None => {
                        let tr = self.section.create_row_element(env)?;
                        let dom_index = env.doc.child_count(self.section.root);
                        self.section.attach_row(env, tr, logical, dom_index)?;
                        tr
                    }
                };
                self.rows.insert(pos + i, tr);
            }
        }

        self.update_window(env);
        Ok(())
    }

    pub(crate) fn remove_rows(&mut self, env: &mut Env, index: usize, count: usize) -> Result<()> {
        check_row_range(index, count, self.section.row_count)?;
        debug!(target: "escalator::body", index, count, "removing rows");

        let old_top_px = self.row_top(self.top_row);
        self.spacers.remove_rows(env, index, count)?;
        self.section.row_count -= count;

        if !self.is_painted(env) {
            return Ok(());
        }

        let top = self.top_row;
        let len = self.rows.len();
        let end = index + count;
        if end <= top {
            self.top_row -= count;
            self.scroll_top -= old_top_px - self.row_top(self.top_row);
        } else if index < top + len {
            let p0 = index.max(top) - top;
            let p1 = end.min(top + len) - top;
            let removed: Vec<(usize, ElementId)> = self
                .rows
                .drain(p0..p1)
                .enumerate()
                .map(|(i, tr)| (top + p0 + i, tr))
                .collect();
            self.top_row = top.min(index);
            self.sync_row_count(env, removed)?;
        }

        self.update_window(env);
        Ok(())
    }

    pub(crate) fn refresh_rows(&mut self, env: &mut Env, index: usize, count: usize) -> Result<()> {
        check_row_range(index, count, self.section.row_count)?;
        let visible = self.visible_row_range();
        let start = index.max(visible.start);
        let end = (index + count).min(visible.end);
        for row in start..end {
            let tr = self.rows[row - self.top_row];
            self.section.refresh_row(env, tr, row);
        }
        Ok(())
    }

    pub(crate) fn set_scroll_top(&mut self, env: &mut Env, px: f64) {
        self.scroll_top = px;
        self.update_window(env);
    }

    pub(crate) fn set_viewport_height(&mut self, env: &mut Env, px: f64) -> Result<()> {
        BodySection::check_viewport_height(px)?;
        self.viewport_height = px.max(0.);
        self.sync_row_count(env, Vec::new())?;
        self.update_window(env);
        Ok(())
    }

    /// Scrolls so that the pixel range `start..end` ends up at `destination`.
    fn scroll_to_range(
        &mut self,
        env: &mut Env,
        start: f64,
        end: f64,
        destination: ScrollDestination,
        padding: f64,
    ) {
        let viewport = self.viewport();
        let px = destination.scroll_pos(start, end, viewport.top(), viewport.bottom(), padding);
        trace!(target: "escalator::body", ?destination, start, end, px, "scrolling to range");
        self.set_scroll_top(env, px);
    }

    pub(crate) fn scroll_to_row(
        &mut self,
        env: &mut Env,
        row: usize,
        destination: ScrollDestination,
        padding: f64,
    ) -> Result<()> {
        destination.check_padding(padding)?;
        self.check_row_index(row)?;
        let top = self.row_top(row);
        self.scroll_to_range(env, top, top + self.row_height(), destination, padding);
        Ok(())
    }

    pub(crate) fn scroll_to_spacer(
        &mut self,
        env: &mut Env,
        row: usize,
        destination: ScrollDestination,
        padding: f64,
    ) -> Result<()> {
        destination.check_padding(padding)?;
        let height = self.spacers.height(row).ok_or(Error::NoSuchSpacer(row))?;
        let top = self.row_top(row) + self.row_height();
        self.scroll_to_range(env, top, top + height, destination, padding);
        Ok(())
    }

    /// Like [`scroll_to_row`](Self::scroll_to_row), but keeps the row's spacer in view too.
    pub(crate) fn scroll_to_row_and_spacer(
        &mut self,
        env: &mut Env,
        row: usize,
        destination: ScrollDestination,
        padding: f64,
    ) -> Result<()> {
        destination.check_padding(padding)?;
        self.check_row_index(row)?;
        let top = self.row_top(row);
        let bottom = top + self.row_height() + self.spacers.height(row).unwrap_or(0.);
        self.scroll_to_range(env, top, bottom, destination, padding);
        Ok(())
    }

    fn check_row_index(&self, index: usize) -> Result<()> {
        if index < self.section.row_count {
            Ok(())
        } else {
            Err(Error::RowIndexOutOfBounds {
                index,
                row_count: self.section.row_count,
            })
        }
    }

    /// Materializes or drops rows after the columns changed from or to none.
    pub(crate) fn verify_row_count(&mut self, env: &mut Env) -> Result<()> {
        self.sync_row_count(env, Vec::new())?;
        self.update_window(env);
        Ok(())
    }

    /// Detaches every row element, e.g. before the last columns go away.
    pub(crate) fn detach_all(&mut self, env: &mut Env) -> Result<()> {
        let rows = self.materialized();
        self.rows.clear();
        self.top_row = 0;
        for (logical, tr) in rows {
            self.section.detach_row(env, tr, logical)?;
        }
        self.update_window(env);
        Ok(())
    }

    pub(crate) fn set_default_row_height(&mut self, env: &mut Env, px: f64) -> Result<()> {
        Section::check_row_height(px)?;
        self.section.default_row_height = px;
        for tr in self.rows.iter().copied() {
            self.section.reapply_row_height(env.doc, tr);
        }
        self.sync_row_count(env, Vec::new())?;
        self.update_window(env);
        Ok(())
    }

    pub(crate) fn set_escalator_updater(
        &mut self,
        env: &mut Env,
        updater: Box<dyn EscalatorUpdater>,
    ) {
        debug!(target: "escalator::body", "updater replaced");
        self.section.updater = updater;
        for (row, tr) in self.materialized() {
            self.section.refresh_row(env, tr, row);
        }
    }

    pub(crate) fn set_spacer(&mut self, env: &mut Env, row: usize, height: f64) -> Result<()> {
        if row >= self.section.row_count {
            return Err(Error::InvalidSpacerIndex {
                index: row,
                row_count: self.section.row_count,
            });
        }
        self.spacers.set_spacer(env, self.section.root, row, height)?;
        self.update_window(env);
        Ok(())
    }

    pub fn spacer_height(&self, row: usize) -> Option<f64> {
        self.spacers.height(row)
    }

    pub fn spacer_element(&self, row: usize) -> Option<ElementId> {
        self.spacers.element(row)
    }

    pub fn spacers(&self) -> Vec<usize> {
        self.spacers.rows()
    }

    pub fn spacer_heights_sum(&self) -> f64 {
        self.spacers.heights_sum()
    }

    pub fn spacer_heights_sum_until(&self, row: usize) -> f64 {
        self.spacers.heights_sum_until(row)
    }

    pub(crate) fn get_cell(&self, doc: &Document, element: ElementId) -> Option<Cell> {
        let (tr, cell) = self.section.find_cell(doc, element)?;
        let pos = self.rows.iter().position(|r| *r == tr)?;
        Some(Cell {
            row: self.top_row + pos,
            column: doc.index_in_parent(cell)?,
            element: cell,
        })
    }

    pub(crate) fn get_row_element(&self, index: usize) -> Result<ElementId> {
        self.check_row_index(index)?;
        if self.visible_row_range().contains(&index) {
            Ok(self.rows[index - self.top_row])
        } else {
            Err(Error::RowNotInDom(index))
        }
    }
}

/// The body bound to the escalator's shared state.
pub struct BodyRows<'a> {
    pub(crate) body: &'a mut BodySection,
    pub(crate) env: Env<'a>,
}

impl<'a> BodyRows<'a> {
    pub fn spacer_height(&self, row: usize) -> Option<f64> {
        self.body.spacer_height(row)
    }

    pub fn spacer_element(&self, row: usize) -> Option<ElementId> {
        self.body.spacer_element(row)
    }

    /// Rows that have a spacer, ascending.
    pub fn spacers(&self) -> Vec<usize> {
        self.body.spacers()
    }

    pub fn spacer_heights_sum(&self) -> f64 {
        self.body.spacer_heights_sum()
    }

    pub fn spacer_heights_sum_until(&self, row: usize) -> f64 {
        self.body.spacer_heights_sum_until(row)
    }

    pub fn row_top(&self, row: usize) -> f64 {
        self.body.row_top(row)
    }

    pub fn visible_row_range(&self) -> Range<usize> {
        self.body.visible_row_range()
    }
}

impl<'a> RowContainer for BodyRows<'a> {
    fn insert_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.body.insert_rows(&mut self.env, index, count)
    }

    fn remove_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.body.remove_rows(&mut self.env, index, count)
    }

    fn refresh_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.body.refresh_rows(&mut self.env, index, count)
    }

    fn row_count(&self) -> usize {
        self.body.section.row_count
    }

    fn set_default_row_height(&mut self, px: f64) -> Result<()> {
        self.body.set_default_row_height(&mut self.env, px)
    }

    fn default_row_height(&self) -> f64 {
        self.body.section.default_row_height
    }

    fn set_escalator_updater(&mut self, updater: Box<dyn EscalatorUpdater>) {
        self.body.set_escalator_updater(&mut self.env, updater)
    }

    fn escalator_updater(&self) -> &dyn EscalatorUpdater {
        &*self.body.section.updater
    }

    fn get_cell(&self, element: ElementId) -> Option<Cell> {
        self.body.get_cell(self.env.doc, element)
    }

    fn get_row_element(&self, index: usize) -> Result<ElementId> {
        self.body.get_row_element(index)
    }

    fn element(&self) -> ElementId {
        self.body.section.root
    }
}

impl<'a> BodyRowContainer for BodyRows<'a> {
    fn set_spacer(&mut self, row_index: usize, height: f64) -> Result<()> {
        self.body.set_spacer(&mut self.env, row_index, height)
    }

    fn set_spacer_updater(&mut self, updater: Box<dyn SpacerUpdater>) {
        self.body.spacers.set_updater(self.env.doc, updater)
    }

    fn spacer_updater(&self) -> &dyn SpacerUpdater {
        self.body.spacers.updater()
    }
}
