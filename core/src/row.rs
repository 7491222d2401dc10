//! Row handles.

use crate::cell::{CellKey, CellSlot};
use crate::cells::Cells;
use crate::dom::{Document, ElementId};
use std::sync::Arc;
use tracing::trace;

/// What a [`FlyweightRow`] is currently bound to.
#[derive(Debug)]
pub(crate) struct RowBinding {
    pub(crate) element: ElementId,
    pub(crate) row: usize,
    pub(crate) column_widths: Arc<[f64]>,
    pub(crate) generation: u64,
}

impl RowBinding {
    /// Width of a column, or a negative value if it is unknown.
    pub(crate) fn column_width(&self, column: usize) -> f64 {
        self.column_widths.get(column).copied().unwrap_or(-1.)
    }
}

/// A reusable handle for one row of cells.
///
/// A row container owns one of these and binds it to a concrete row element for the duration of
/// a single pass (`setup` … `teardown`). During that pass the row hands out [`Cells`] traversals,
/// which in turn lend out short-lived cell handles to the updater.
///
/// Every `setup` and `teardown` bumps the row's generation; [`CellKey`]s minted in an earlier
/// generation no longer resolve.
#[derive(Debug, Default)]
pub struct FlyweightRow {
    binding: Option<RowBinding>,
    generation: u64,
    /// Traversal counter; cells are reset once per traversal.
    pass: u64,
    cells: Vec<CellSlot>,
}

/// A borrowed view of the row a [`FlyweightRow`] is bound to, as handed to updaters.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    binding: &'a RowBinding,
}

impl<'a> Row<'a> {
    pub(crate) fn new(binding: &'a RowBinding) -> Row<'a> {
        Row { binding }
    }

    /// The logical index of the row.
    pub fn row(&self) -> usize {
        self.binding.row
    }

    /// The backing row element.
    pub fn element(&self) -> ElementId {
        self.binding.element
    }

    /// The calculated width of a column, or a negative value if unknown.
    pub fn column_width(&self, column: usize) -> f64 {
        self.binding.column_width(column)
    }
}

impl FlyweightRow {
    pub fn new() -> FlyweightRow {
        FlyweightRow::default()
    }

    /// Creates a row handle with one cell slot per column.
    pub fn with_columns(columns: usize) -> FlyweightRow {
        let mut row = FlyweightRow::new();
        row.add_cells(0, columns);
        row
    }

    /// Binds this handle to a row element and a logical row index.
    ///
    /// Any previous binding is discarded, including cell elements bound by earlier traversals.
    pub fn setup(&mut self, element: ElementId, row: usize, column_widths: Arc<[f64]>) {
        self.generation += 1;
        for cell in &mut self.cells {
            cell.teardown();
        }
        self.binding = Some(RowBinding {
            element,
            row,
            column_widths,
            generation: self.generation,
        });
        trace!(target: "escalator::row", row, ?element, "flyweight row set up");
    }

    /// Clears the binding so that stale accesses fail loudly.
    ///
    /// Always returns true.
    pub fn teardown(&mut self) -> bool {
        self.generation += 1;
        self.binding = None;
        for cell in &mut self.cells {
            cell.teardown();
        }
        true
    }

    /// Returns true between `setup` and `teardown`.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    fn binding(&self) -> &RowBinding {
        match &self.binding {
            Some(binding) => binding,
            None => panic!("FlyweightRow accessed outside of setup/teardown"),
        }
    }

    /// The logical index of the bound row.
    ///
    /// # Panics
    /// If the row is not set up.
    pub fn row(&self) -> usize {
        self.binding().row
    }

    /// The bound row element.
    ///
    /// # Panics
    /// If the row is not set up.
    pub fn element(&self) -> ElementId {
        self.binding().element
    }

    /// The column widths the row was set up with.
    ///
    /// # Panics
    /// If the row is not set up.
    pub fn column_widths(&self) -> &[f64] {
        &self.binding().column_widths
    }

    /// Number of cell slots, which always equals the column count of the owning container.
    pub fn column_count(&self) -> usize {
        self.cells.len()
    }

    /// The column index each slot currently carries, in slot order.
    pub fn slot_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().map(|c| c.column)
    }

    /// Inserts `count` cell slots at `index` and renumbers the slots after them.
    ///
    /// # Panics
    /// If `index` is past the end.
    pub fn add_cells(&mut self, index: usize, count: usize) {
        assert!(
            index <= self.cells.len(),
            "cannot add cells at {} to a row of {} cells",
            index,
            self.cells.len()
        );
        self.cells
            .splice(index..index, (0..count).map(|i| CellSlot::new(index + i)));
        self.reindex(index + count);
    }

    /// Removes `count` cell slots starting at `index` and renumbers the rest.
    ///
    /// # Panics
    /// If the range is out of bounds.
    pub fn remove_cells(&mut self, index: usize, count: usize) {
        assert!(
            index + count <= self.cells.len(),
            "cannot remove cells {}..{} from a row of {} cells",
            index,
            index + count,
            self.cells.len()
        );
        self.cells.drain(index..index + count);
        self.reindex(index);
    }

    fn reindex(&mut self, from: usize) {
        for (column, cell) in self.cells.iter_mut().enumerate().skip(from) {
            *cell = CellSlot::new(column);
        }
    }

    /// Traverses all cells, which are expected to exist as children of the row element.
    pub fn cells<'a>(&'a mut self, doc: &'a mut Document) -> (Row<'a>, Cells<'a>) {
        let count = self.cells.len();
        self.traverse(doc, 0, count, true)
    }

    /// Traverses `count` cells starting at column `offset`, which are expected to exist as
    /// children of the row element.
    ///
    /// # Panics
    /// If the range is out of bounds or the row is not set up.
    pub fn cells_range<'a>(
        &'a mut self,
        doc: &'a mut Document,
        offset: usize,
        count: usize,
    ) -> (Row<'a>, Cells<'a>) {
        self.traverse(doc, offset, count, true)
    }

    /// Traverses cells that don't have backing elements in the row (yet, or anymore).
    ///
    /// Their elements have to be assigned with `set_element` in a first traversal; later
    /// traversals in the same setup see the assigned elements.
    ///
    /// # Panics
    /// If the range is out of bounds or the row is not set up.
    pub fn unattached_cells<'a>(
        &'a mut self,
        doc: &'a mut Document,
        offset: usize,
        count: usize,
    ) -> (Row<'a>, Cells<'a>) {
        self.traverse(doc, offset, count, false)
    }

    fn traverse<'a>(
        &'a mut self,
        doc: &'a mut Document,
        offset: usize,
        count: usize,
        attached: bool,
    ) -> (Row<'a>, Cells<'a>) {
        assert!(
            offset + count <= self.cells.len(),
            "cell range {}..{} is out of bounds for a row of {} cells",
            offset,
            offset + count,
            self.cells.len()
        );
        self.pass += 1;

        let FlyweightRow {
            binding,
            cells,
            pass,
            ..
        } = self;
        let binding: &'a RowBinding = match binding {
            Some(binding) => binding,
            None => panic!("FlyweightRow accessed outside of setup/teardown"),
        };

        let row = Row { binding };
        let cells = Cells::new(
            doc,
            binding,
            &mut cells[offset..offset + count],
            *pass,
            attached,
        );
        (row, cells)
    }

    /// Resolves a key handed out by an earlier traversal to its element.
    ///
    /// Returns `None` if the key is stale, i.e. the row has been torn down or set up again since.
    pub fn cell_element(&self, key: CellKey) -> Option<ElementId> {
        let binding = self.binding.as_ref()?;
        if binding.generation != key.generation {
            return None;
        }
        self.cells.get(key.column).and_then(|c| c.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Tag, WIDTH};

    fn row_with_cells(doc: &mut Document, columns: usize) -> ElementId {
        let tr = doc.create_element(Tag::Row);
        for i in 0..columns {
            let td = doc.create_element(Tag::Cell);
            doc.set_text(td, format!("cell {}", i));
            doc.append_child(tr, td).unwrap();
        }
        tr
    }

    fn widths(columns: usize) -> Arc<[f64]> {
        (0..columns).map(|i| 10. * (i + 1) as f64).collect()
    }

    #[test]
    fn test_reindex_after_insert_and_remove() {
        let mut row = FlyweightRow::with_columns(3);
        row.add_cells(1, 2);
        assert_eq!(row.slot_columns().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        row.add_cells(5, 1);
        row.add_cells(0, 1);
        assert_eq!(row.column_count(), 7);
        row.remove_cells(2, 3);
        assert_eq!(row.slot_columns().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        row.remove_cells(0, 4);
        assert_eq!(row.column_count(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_cells_range_out_of_bounds() {
        let mut doc = Document::new();
        let tr = row_with_cells(&mut doc, 2);
        let mut row = FlyweightRow::with_columns(2);
        row.setup(tr, 0, widths(2));
        let _ = row.cells_range(&mut doc, 1, 2);
    }

    #[test]
    #[should_panic(expected = "outside of setup/teardown")]
    fn test_stale_row_access() {
        let mut doc = Document::new();
        let tr = row_with_cells(&mut doc, 2);
        let mut row = FlyweightRow::with_columns(2);
        row.setup(tr, 4, widths(2));
        assert_eq!(row.row(), 4);
        assert!(row.teardown());
        row.row();
    }

    #[test]
    fn test_stale_cell_key() {
        let mut doc = Document::new();
        let tr = row_with_cells(&mut doc, 3);
        let mut row = FlyweightRow::with_columns(3);
        row.setup(tr, 0, widths(3));

        let key = {
            let (_, mut cells) = row.cells(&mut doc);
            cells.next_cell().unwrap().key()
        };
        assert_eq!(row.cell_element(key), doc.child(tr, 0));

        row.teardown();
        assert_eq!(row.cell_element(key), None);

        row.setup(tr, 1, widths(3));
        assert_eq!(
            row.cell_element(key),
            None,
            "a key from an earlier binding must not resolve after a new setup"
        );
    }

    #[test]
    fn test_setup_teardown_setup_leaves_no_residue() {
        let mut doc = Document::new();
        let first = row_with_cells(&mut doc, 2);
        let second = row_with_cells(&mut doc, 2);
        let mut row = FlyweightRow::with_columns(2);

        row.setup(first, 3, widths(2));
        {
            let (_, mut cells) = row.cells(&mut doc);
            while cells.next_cell().is_some() {}
        }
        row.teardown();

        let second_widths: Arc<[f64]> = vec![7., 8.].into();
        row.setup(second, 9, second_widths);
        assert_eq!(row.row(), 9);
        assert_eq!(row.element(), second);
        assert_eq!(row.column_widths(), &[7., 8.]);

        let (r, mut cells) = row.cells(&mut doc);
        assert_eq!(r.row(), 9);
        let mut seen = Vec::new();
        while let Some(cell) = cells.next_cell() {
            seen.push((cell.element(), cell.document().px(cell.element(), WIDTH)));
        }
        assert_eq!(
            seen,
            vec![
                (doc_child(&cells, second, 0), Some(7.)),
                (doc_child(&cells, second, 1), Some(8.)),
            ]
        );
    }

    fn doc_child(cells: &Cells<'_>, row: ElementId, i: usize) -> ElementId {
        cells.document().child(row, i).unwrap()
    }
}
