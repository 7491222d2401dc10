//! Column configuration.

use escalator_core::error::{check_column_range, Error, Result};
use std::sync::Arc;

/// Column count and calculated widths, shared by all sections.
///
/// The widths are handed to row handles as a shared slice, so changing them replaces the slice
/// instead of mutating it.
#[derive(Debug, Clone)]
pub struct ColumnConfiguration {
    widths: Arc<[f64]>,
}

impl Default for ColumnConfiguration {
    fn default() -> Self {
        ColumnConfiguration {
            widths: Arc::from(Vec::new()),
        }
    }
}

impl ColumnConfiguration {
    pub fn new() -> ColumnConfiguration {
        ColumnConfiguration::default()
    }

    pub fn column_count(&self) -> usize {
        self.widths.len()
    }

    /// Width of a column, or a negative value if it hasn't been calculated.
    pub fn column_width(&self, index: usize) -> Result<f64> {
        self.widths
            .get(index)
            .copied()
            .ok_or(Error::ColumnIndexOutOfBounds {
                index,
                column_count: self.column_count(),
            })
    }

    pub fn widths(&self) -> Arc<[f64]> {
        Arc::clone(&self.widths)
    }

    /// Sum of all known column widths.
    pub fn calculate_row_width(&self) -> f64 {
        self.widths.iter().filter(|w| **w >= 0.).sum()
    }

    /// Inserts columns of unknown width.
    pub(crate) fn insert(&mut self, index: usize, count: usize) -> Result<()> {
        if count < 1 {
            return Err(Error::InvalidColumnCount(count));
        }
        if index > self.column_count() {
            return Err(Error::ColumnIndexOutOfBounds {
                index,
                column_count: self.column_count(),
            });
        }
        let mut widths = self.widths.to_vec();
        widths.splice(index..index, std::iter::repeat(-1.).take(count));
        self.widths = widths.into();
        Ok(())
    }

    pub(crate) fn remove(&mut self, index: usize, count: usize) -> Result<()> {
        check_column_range(index, count, self.column_count())?;
        let mut widths = self.widths.to_vec();
        widths.drain(index..index + count);
        self.widths = widths.into();
        Ok(())
    }

    pub(crate) fn set_width(&mut self, index: usize, px: f64) -> Result<()> {
        self.column_width(index)?;
        let mut widths = self.widths.to_vec();
        widths[index] = px;
        self.widths = widths.into();
        Ok(())
    }
}

#[test]
fn test_column_configuration() {
    let mut columns = ColumnConfiguration::new();
    assert_eq!(
        columns.insert(1, 1),
        Err(Error::ColumnIndexOutOfBounds { index: 1, column_count: 0 })
    );
    columns.insert(0, 3).unwrap();
    columns.set_width(0, 50.).unwrap();
    columns.set_width(2, 30.).unwrap();
    assert_eq!(columns.calculate_row_width(), 80.);

    let before = columns.widths();
    columns.insert(1, 1).unwrap();
    assert_eq!(&*before, &[50., -1., 30.], "handed out widths stay unchanged");
    assert_eq!(&*columns.widths(), &[50., -1., -1., 30.]);

    assert_eq!(columns.insert(0, 0), Err(Error::InvalidColumnCount(0)));
    columns.remove(0, 2).unwrap();
    assert_eq!(&*columns.widths(), &[-1., 30.]);
    assert!(columns.remove(1, 2).is_err());
    assert!(columns.column_width(2).is_err());
}
