//! Cell traversal.

use crate::cell::{CellSlot, FlyweightCell};
use crate::dom::{Document, ElementId};
use crate::row::{Row, RowBinding};

/// A traversal over a contiguous range of cells in one row.
///
/// This is a lending iterator: each [`FlyweightCell`] borrows the traversal mutably and has to be
/// dropped before the next one can be obtained. When a cell is given a column span larger than
/// one, the cells it covers are skipped by the following call to [`next_cell`](Self::next_cell).
///
/// ```ignore
/// while let Some(mut cell) = cells.next_cell() {
///     cell.set_text(format!("{},{}", cell.row(), cell.column()));
/// }
/// ```
pub struct Cells<'a> {
    doc: &'a mut Document,
    binding: &'a RowBinding,
    slots: &'a mut [CellSlot],
    /// Index of the next slot, not counting pending skips.
    cursor: usize,
    skip_next: usize,
    pass: u64,
    attached: bool,
}

impl<'a> Cells<'a> {
    pub(crate) fn new(
        doc: &'a mut Document,
        binding: &'a RowBinding,
        slots: &'a mut [CellSlot],
        pass: u64,
        attached: bool,
    ) -> Cells<'a> {
        Cells {
            doc,
            binding,
            slots,
            cursor: 0,
            skip_next: 0,
            pass,
            attached,
        }
    }

    /// The row being traversed.
    pub fn row(&self) -> Row<'a> {
        Row::new(self.binding)
    }

    /// Whether the cells are expected to exist in the row element already.
    pub fn are_attached(&self) -> bool {
        self.attached
    }

    /// Number of cells in the traversed range, including ones that will be skipped.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if there is another cell after pending skips.
    pub fn has_next(&self) -> bool {
        self.cursor + self.skip_next < self.slots.len()
    }

    /// Advances to the next cell, skipping the cells covered by the previous cell's column span.
    pub fn next_cell(&mut self) -> Option<FlyweightCell<'_>> {
        if !self.has_next() {
            self.cursor = self.slots.len();
            self.skip_next = 0;
            return None;
        }

        self.cursor += self.skip_next;
        self.skip_next = 0;
        let index = self.cursor;
        self.cursor += 1;

        self.slots[index].setup(self.doc, self.binding, self.pass, self.attached);
        Some(FlyweightCell {
            doc: self.doc,
            binding: self.binding,
            slots: self.slots,
            skip_next: &mut self.skip_next,
            index,
            pass: self.pass,
            attached: self.attached,
        })
    }

    /// Sets up up to `n` cells after the current one, ignoring pending skips and not advancing
    /// the traversal.
    ///
    /// Returns the column of each peeked cell with its element. Unattached cells that haven't
    /// been given an element yet come back as `None`.
    pub fn raw_peek_next(&mut self, n: usize) -> Vec<(usize, Option<ElementId>)> {
        let start = self.cursor.min(self.slots.len());
        let end = (start + n).min(self.slots.len());
        let mut peeked = Vec::with_capacity(end - start);
        for slot in &mut self.slots[start..end] {
            slot.setup(self.doc, self.binding, self.pass, self.attached);
            peeked.push((slot.column, slot.element));
        }
        peeked
    }

    /// Makes the next `n` calls' worth of cells be skipped.
    pub fn set_skip_next(&mut self, n: usize) {
        self.skip_next = n;
    }

    /// Calls `f` with every remaining cell.
    pub fn for_each_cell(&mut self, mut f: impl FnMut(FlyweightCell<'_>)) {
        while let Some(cell) = self.next_cell() {
            f(cell);
        }
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{Document, ElementId, Tag, WIDTH};
    use crate::error::Error;
    use crate::row::FlyweightRow;
    use std::sync::Arc;

    fn setup(columns: usize) -> (Document, ElementId, FlyweightRow) {
        let mut doc = Document::new();
        let tr = doc.create_element(Tag::Row);
        for _ in 0..columns {
            let td = doc.create_element(Tag::Cell);
            doc.append_child(tr, td).unwrap();
        }
        let mut row = FlyweightRow::with_columns(columns);
        let widths: Arc<[f64]> = (0..columns).map(|_| 100.).collect();
        row.setup(tr, 0, widths);
        (doc, tr, row)
    }

    fn visited(row: &mut FlyweightRow, doc: &mut Document, spans: &[(usize, usize)]) -> Vec<usize> {
        let (_, mut cells) = row.cells(doc);
        let mut visited = Vec::new();
        while let Some(mut cell) = cells.next_cell() {
            visited.push(cell.column());
            if let Some((_, span)) = spans.iter().find(|(c, _)| *c == cell.column()) {
                cell.set_col_span(*span).unwrap();
            }
        }
        visited
    }

    #[test]
    fn test_plain_traversal() {
        let (mut doc, tr, mut row) = setup(4);
        assert_eq!(visited(&mut row, &mut doc, &[]), vec![0, 1, 2, 3]);

        let (_, mut cells) = row.cells_range(&mut doc, 1, 2);
        assert_eq!(cells.len(), 2);
        let first = cells.next_cell().unwrap();
        assert_eq!(first.column(), 1);
        assert_eq!(first.element(), first.document().child(tr, 1).unwrap());
        assert_eq!(cells.next_cell().unwrap().column(), 2);
        assert!(!cells.has_next());
        assert!(cells.next_cell().is_none());
    }

    #[test]
    fn test_col_span_skips_covered_cells() {
        let (mut doc, tr, mut row) = setup(5);
        assert_eq!(visited(&mut row, &mut doc, &[(1, 3)]), vec![0, 1, 4]);

        let cell = doc.child(tr, 1).unwrap();
        assert_eq!(doc.col_span(cell), 3);
        assert_eq!(doc.px(cell, WIDTH), Some(300.));
        for hidden in 2..4 {
            assert!(doc.is_hidden(doc.child(tr, hidden).unwrap()));
        }
        assert!(!doc.is_hidden(doc.child(tr, 4).unwrap()));
    }

    #[test]
    fn test_col_span_clamped_at_range_end() {
        let (mut doc, tr, mut row) = setup(3);
        assert_eq!(visited(&mut row, &mut doc, &[(1, 5)]), vec![0, 1]);
        assert_eq!(doc.px(doc.child(tr, 1).unwrap(), WIDTH), Some(200.));
    }

    #[test]
    fn test_col_span_decrease_reveals_uncovered_cells() {
        let (mut doc, tr, mut row) = setup(5);
        let (_, mut cells) = row.cells(&mut doc);
        let mut cell = cells.next_cell().unwrap();
        cell.set_col_span(4).unwrap();
        cell.set_col_span(2).unwrap();
        drop(cell);
        assert_eq!(cells.next_cell().unwrap().column(), 2);

        let doc = cells.document();
        assert!(doc.is_hidden(doc.child(tr, 1).unwrap()));
        assert!(!doc.is_hidden(doc.child(tr, 2).unwrap()));
        assert!(!doc.is_hidden(doc.child(tr, 3).unwrap()));
        assert_eq!(doc.px(doc.child(tr, 0).unwrap(), WIDTH), Some(200.));
    }

    #[test]
    fn test_col_span_reset_on_next_traversal() {
        let (mut doc, tr, mut row) = setup(3);
        visited(&mut row, &mut doc, &[(0, 3)]);
        assert!(doc.is_hidden(doc.child(tr, 2).unwrap()));

        assert_eq!(visited(&mut row, &mut doc, &[]), vec![0, 1, 2]);
        for i in 0..3 {
            let cell = doc.child(tr, i).unwrap();
            assert_eq!(doc.col_span(cell), 1);
            assert!(!doc.is_hidden(cell));
            assert_eq!(doc.px(cell, WIDTH), Some(100.));
        }
    }

    #[test]
    fn test_invalid_col_span() {
        let (mut doc, _, mut row) = setup(2);
        let (_, mut cells) = row.cells(&mut doc);
        let mut cell = cells.next_cell().unwrap();
        assert_eq!(cell.set_col_span(0), Err(Error::InvalidColSpan(0)));
    }

    #[test]
    fn test_raw_peek_and_manual_skip() {
        let (mut doc, tr, mut row) = setup(4);
        let (_, mut cells) = row.cells(&mut doc);
        cells.next_cell().unwrap();
        let peeked = cells.raw_peek_next(2);
        assert_eq!(
            peeked,
            vec![
                (1, Some(doc_child(&cells, tr, 1))),
                (2, Some(doc_child(&cells, tr, 2))),
            ]
        );
        cells.set_skip_next(2);
        assert_eq!(cells.next_cell().unwrap().column(), 3);
        assert!(cells.next_cell().is_none());
    }

    #[test]
    fn test_unattached_cells() {
        let mut doc = Document::new();
        let tr = doc.create_element(Tag::Row);
        let mut row = FlyweightRow::with_columns(2);
        row.setup(tr, 0, vec![50., 60.].into());

        {
            let (_, mut cells) = row.unattached_cells(&mut doc, 0, 2);
            assert!(!cells.are_attached());
            assert_eq!(cells.raw_peek_next(5), vec![(0, None), (1, None)]);
            while let Some(mut cell) = cells.next_cell() {
                let td = cell.document_mut().create_element(Tag::Cell);
                cell.set_element(td);
                cell.set_text(format!("new {}", cell.column()));
            }
        }
        let keys = {
            let (_, mut cells) = row.unattached_cells(&mut doc, 0, 2);
            let mut keys = Vec::new();
            cells.for_each_cell(|cell| keys.push(cell.key()));
            keys
        };
        let texts: Vec<_> = keys
            .iter()
            .map(|k| doc.text(row.cell_element(*k).unwrap()).to_string())
            .collect();
        assert_eq!(texts, vec!["new 0", "new 1"]);
    }

    fn doc_child(cells: &super::Cells<'_>, row: ElementId, i: usize) -> ElementId {
        cells.document().child(row, i).unwrap()
    }
}
