//! Update contracts.
//!
//! Row containers never put content into cells themselves. Whenever rows or cells are added,
//! removed or need new content, the installed [`EscalatorUpdater`] is called with the affected
//! row and a traversal over the affected cells. The same goes for spacers and the
//! [`SpacerUpdater`].
//!
//! In particular, content is never cleared automatically. A recycled cell keeps showing whatever
//! the previous row put into it until the updater replaces it, so updaters that can't provide
//! content right away must put a placeholder into the cell.

use crate::cells::Cells;
use crate::dom::{Document, ElementId};
use crate::row::Row;

/// Fills rows with content.
///
/// For a batch of rows being attached, the calls happen in the order `pre_attach`, (insertion),
/// `post_attach`, `update`; for rows being detached, `pre_detach`, (removal), `post_detach`.
/// Rows that stay attached but show a different logical row only get `update`.
///
/// The row and cell handles are only valid during the call.
pub trait EscalatorUpdater {
    /// Renders content into the cells.
    fn update(&mut self, row: Row<'_>, cells: &mut Cells<'_>);

    /// Called before the cells are inserted into the row element.
    ///
    /// The traversal is in unattached mode when the cells are new.
    fn pre_attach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let _ = (row, cells);
    }

    /// Called after the cells have been inserted into the row element.
    fn post_attach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let _ = (row, cells);
    }

    /// Called before the cells are removed from the row element.
    fn pre_detach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let _ = (row, cells);
    }

    /// Called after the cells have been removed from the row element.
    fn post_detach(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let _ = (row, cells);
    }
}

/// The updater that does nothing. Installed by default.
impl EscalatorUpdater for () {
    fn update(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
        let _ = (row, cells);
    }
}

/// A spacer as seen by a [`SpacerUpdater`].
pub struct Spacer<'a> {
    pub(crate) row: usize,
    pub(crate) root: ElementId,
    pub(crate) element: ElementId,
    pub(crate) deco: ElementId,
    pub(crate) doc: &'a mut Document,
}

impl<'a> Spacer<'a> {
    pub fn new(
        doc: &'a mut Document,
        row: usize,
        root: ElementId,
        element: ElementId,
        deco: ElementId,
    ) -> Spacer<'a> {
        Spacer {
            row,
            root,
            element,
            deco,
            doc,
        }
    }

    /// The logical row the spacer is anchored beneath.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The row-like element wrapping the spacer.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The cell element content should be put into.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The decoration element.
    pub fn deco(&self) -> ElementId {
        self.deco
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.doc
    }
}

/// Fills spacers with content.
pub trait SpacerUpdater {
    /// Called after a spacer has been created and attached.
    fn init(&mut self, spacer: &mut Spacer<'_>);

    /// Called before a spacer is removed.
    fn destroy(&mut self, spacer: &mut Spacer<'_>);
}

/// The spacer updater that does nothing. Installed by default.
impl SpacerUpdater for () {
    fn init(&mut self, spacer: &mut Spacer<'_>) {
        let _ = spacer;
    }

    fn destroy(&mut self, spacer: &mut Spacer<'_>) {
        let _ = spacer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Tag;
    use crate::row::FlyweightRow;

    struct Numbering;

    impl EscalatorUpdater for Numbering {
        fn update(&mut self, row: Row<'_>, cells: &mut Cells<'_>) {
            while let Some(mut cell) = cells.next_cell() {
                cell.set_text(format!("{}:{}", row.row(), cell.column()));
            }
        }
    }

    #[test]
    fn test_null_updater_leaves_content_alone() {
        let mut doc = Document::new();
        let tr = doc.create_element(Tag::Row);
        let td = doc.create_element(Tag::Cell);
        doc.append_child(tr, td).unwrap();
        doc.set_text(td, "old");

        let mut row = FlyweightRow::with_columns(1);
        row.setup(tr, 0, vec![10.].into());
        let mut updater: Box<dyn EscalatorUpdater> = Box::new(());
        {
            let (r, mut cells) = row.cells(&mut doc);
            updater.pre_attach(r, &mut cells);
            updater.update(r, &mut cells);
            updater.post_detach(r, &mut cells);
        }
        assert_eq!(doc.text(td), "old");

        let mut updater: Box<dyn EscalatorUpdater> = Box::new(Numbering);
        row.setup(tr, 7, vec![10.].into());
        {
            let (r, mut cells) = row.cells(&mut doc);
            updater.update(r, &mut cells);
        }
        assert_eq!(doc.text(td), "7:0");
    }
}
