//! Cell handles.

use crate::dom::{Document, ElementId, WIDTH};
use crate::error::{Error, Result};
use crate::row::RowBinding;
use std::ops::Range;

/// Per-column state kept by a [`FlyweightRow`](crate::FlyweightRow).
#[derive(Debug, Clone)]
pub(crate) struct CellSlot {
    pub(crate) column: usize,
    pub(crate) element: Option<ElementId>,
    /// The traversal this slot was last reset in.
    pub(crate) pass: u64,
}

impl CellSlot {
    pub(crate) fn new(column: usize) -> CellSlot {
        CellSlot {
            column,
            element: None,
            pass: 0,
        }
    }

    pub(crate) fn teardown(&mut self) {
        self.element = None;
        self.pass = 0;
    }

    /// Prepares the slot for being exposed in traversal `pass`.
    ///
    /// Attached cells are located in the row element by their column and reset to a plain,
    /// visible single-column cell. This only happens once per traversal, so a sibling that was
    /// already peeked at (and possibly hidden) keeps its state.
    ///
    /// # Panics
    /// If the row element has no cell at this column.
    pub(crate) fn setup(
        &mut self,
        doc: &mut Document,
        row: &RowBinding,
        pass: u64,
        attached: bool,
    ) {
        if !attached || self.pass == pass {
            return;
        }
        self.pass = pass;

        let element = match doc.child(row.element, self.column) {
            Some(element) => element,
            None => panic!(
                "cell {} for logical row {} doesn't exist in the row element",
                self.column, row.row
            ),
        };
        doc.set_col_span(element, 1);
        let width = row.column_width(self.column);
        if width >= 0. {
            doc.set_px(element, WIDTH, width);
        }
        doc.set_hidden(element, false);
        self.element = Some(element);
    }
}

/// A cell address that can be kept around safely.
///
/// Unlike a [`FlyweightCell`], a key may outlive the traversal it came from; resolving it with
/// [`FlyweightRow::cell_element`](crate::FlyweightRow::cell_element) fails once the row has been
/// torn down or rebound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub(crate) column: usize,
    pub(crate) generation: u64,
}

impl CellKey {
    pub fn column(&self) -> usize {
        self.column
    }
}

/// A plain cell address, as returned by reverse lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub element: ElementId,
}

/// A cell handle lent out by a [`Cells`](crate::Cells) traversal.
///
/// The handle borrows the traversal, so it cannot be kept past the next call to
/// [`Cells::next_cell`](crate::Cells::next_cell). Use [`key`](Self::key) to remember a cell.
pub struct FlyweightCell<'c> {
    pub(crate) doc: &'c mut Document,
    pub(crate) binding: &'c RowBinding,
    pub(crate) slots: &'c mut [CellSlot],
    pub(crate) skip_next: &'c mut usize,
    pub(crate) index: usize,
    pub(crate) pass: u64,
    pub(crate) attached: bool,
}

impl<'c> FlyweightCell<'c> {
    /// The logical row index.
    pub fn row(&self) -> usize {
        self.binding.row
    }

    /// The column index.
    pub fn column(&self) -> usize {
        self.slots[self.index].column
    }

    /// The backing cell element.
    ///
    /// # Panics
    /// For an unattached cell whose element has not been assigned yet.
    pub fn element(&self) -> ElementId {
        match self.slots[self.index].element {
            Some(element) => element,
            None => panic!(
                "cell {} of row {} has no element",
                self.column(),
                self.binding.row
            ),
        }
    }

    /// Assigns the backing element. Inserting it into the row is up to the caller.
    pub fn set_element(&mut self, element: ElementId) {
        self.slots[self.index].element = Some(element);
    }

    pub fn col_span(&self) -> usize {
        self.doc.col_span(self.element())
    }

    /// A key that can be used to find this cell again while the row stays bound.
    pub fn key(&self) -> CellKey {
        CellKey {
            column: self.column(),
            generation: self.binding.generation,
        }
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.doc
    }

    pub fn text(&self) -> &str {
        self.doc.text(self.element())
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let element = self.element();
        self.doc.set_text(element, text);
    }

    /// Makes this cell cover `col_span` columns.
    ///
    /// The covered sibling cells are hidden, siblings that are no longer covered are revealed,
    /// the cell is widened to the sum of the covered column widths, and the traversal will skip
    /// the covered cells.
    pub fn set_col_span(&mut self, col_span: usize) -> Result<()> {
        if col_span < 1 {
            return Err(Error::InvalidColSpan(col_span));
        }

        let element = self.element();
        let prev_col_span = self.doc.col_span(element);
        if col_span == 1 && prev_col_span == 1 {
            return Ok(());
        }

        self.doc.set_col_span(element, col_span);
        self.adjust_width_for_span(col_span);
        self.hide_or_reveal_adjacent_cells(col_span, prev_col_span);
        *self.skip_next = col_span - 1;
        Ok(())
    }

    fn adjust_width_for_span(&mut self, col_span: usize) {
        let covered = self.raw_peek_next(col_span - 1);
        let mut width = self.binding.column_width(self.column()).max(0.);
        for slot in &self.slots[covered] {
            width += self.binding.column_width(slot.column).max(0.);
        }
        let element = self.element();
        self.doc.set_px(element, WIDTH, width);
    }

    fn hide_or_reveal_adjacent_cells(&mut self, col_span: usize, prev_col_span: usize) {
        let affected = self.raw_peek_next(col_span.max(prev_col_span) - 1);
        let (hidden, revealed) = if prev_col_span < col_span {
            (affected, 0..0)
        } else {
            let first_revealed = (affected.start + col_span - 1).min(affected.end);
            (0..0, first_revealed..affected.end)
        };
        for slot in &self.slots[hidden] {
            if let Some(element) = slot.element {
                self.doc.set_hidden(element, true);
            }
        }
        for slot in &self.slots[revealed] {
            if let Some(element) = slot.element {
                self.doc.set_hidden(element, false);
            }
        }
    }

    /// Sets up and returns (as slot indices) up to `n` cells following this one, without regard
    /// to pending skips.
    fn raw_peek_next(&mut self, n: usize) -> Range<usize> {
        let start = self.index + 1;
        let end = (start + n).min(self.slots.len());
        for slot in &mut self.slots[start..end] {
            slot.setup(self.doc, self.binding, self.pass, self.attached);
        }
        start..end
    }
}
