//! Errors.

use crate::dom::ElementId;
use thiserror::Error;

/// Errors returned by the public mutating API.
///
/// All of these are programmer errors: they are reported as soon as an invalid request is
/// made and leave the engine untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A row count of zero was given.
    #[error("number of rows must be 1 or greater (was {0})")]
    InvalidRowCount(usize),

    /// An insertion index past the end of the rows.
    #[error(
        "the given index ({index}) was outside of the current number of rows (0..{row_count})"
    )]
    RowIndexOutOfBounds { index: usize, row_count: usize },

    /// A row range reaching past the end of the rows.
    #[error(
        "the given row range ({start}..{end}) was outside of the current number of rows \
         ({row_count})"
    )]
    RowRangeOutOfBounds {
        start: usize,
        end: usize,
        row_count: usize,
    },

    /// The row exists logically but has no backing element right now.
    #[error("row with logical index {0} is currently not available in the DOM")]
    RowNotInDom(usize),

    /// Column spans start at 1.
    #[error("column span must be 1 or greater (was {0})")]
    InvalidColSpan(usize),

    /// Row heights must be finite and at least one pixel.
    #[error("height must be positive ({0} was given)")]
    InvalidRowHeight(f64),

    /// The viewport can't be infinitely tall.
    #[error("viewport height must be finite ({0} was given)")]
    InvalidViewportHeight(f64),

    /// Spacers can only be anchored to existing rows.
    #[error("invalid row index: {index}, while the body only has {row_count} rows")]
    InvalidSpacerIndex { index: usize, row_count: usize },

    /// Scrolling to a spacer that isn't there.
    #[error("no spacer open at index {0}")]
    NoSuchSpacer(usize),

    /// Scroll padding must be finite.
    #[error("padding must be finite ({0} was given)")]
    InvalidPadding(f64),

    /// Centering leaves no room for padding.
    #[error("you cannot have a padding with a middle destination (was {0})")]
    PaddingWithMiddle(f64),

    /// A column count of zero was given.
    #[error("number of columns must be 1 or greater (was {0})")]
    InvalidColumnCount(usize),

    /// A single column index out of range.
    #[error(
        "column index {index} was outside of the current number of columns ({column_count})"
    )]
    ColumnIndexOutOfBounds { index: usize, column_count: usize },

    /// A column range reaching past the end of the columns.
    #[error(
        "the given column range ({start}..{end}) was outside of the current number of columns \
         ({column_count})"
    )]
    ColumnRangeOutOfBounds {
        start: usize,
        end: usize,
        column_count: usize,
    },

    /// The element has been destroyed or never existed.
    #[error("no such element: {0:?}")]
    NoSuchElement(ElementId),

    /// An element would become its own ancestor.
    #[error("inserting {0:?} would create a cycle")]
    Cycle(ElementId),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Checks that `count` rows starting at `index` exist among `row_count` rows.
pub fn check_row_range(index: usize, count: usize, row_count: usize) -> Result<()> {
    if count < 1 {
        return Err(Error::InvalidRowCount(count));
    }
    if index + count > row_count {
        return Err(Error::RowRangeOutOfBounds {
            start: index,
            end: index + count,
            row_count,
        });
    }
    Ok(())
}

/// Checks that `count` columns starting at `index` exist among `column_count` columns.
pub fn check_column_range(index: usize, count: usize, column_count: usize) -> Result<()> {
    if count < 1 {
        return Err(Error::InvalidColumnCount(count));
    }
    if index + count > column_count {
        return Err(Error::ColumnRangeOutOfBounds {
            start: index,
            end: index + count,
            column_count,
        });
    }
    Ok(())
}
