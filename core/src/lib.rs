//! Flyweight rows and cells.
//!
//! # Conceptual overview
//! A virtualized grid shows a window onto a potentially huge number of logical rows. Only the
//! rows inside the window are backed by actual row elements, and those elements are recycled as
//! the window moves: an element that showed logical row 10 a moment ago may show row 42 now.
//!
//! ## Backing structure
//! Rows and cells are materialized into a [`Document`], an arena of elements with a style map,
//! a column span attribute and text content. Element ids are generational, so an id that
//! outlives its element never resolves to a different one.
//!
//! ## Flyweights
//! Instead of one object per logical row, a row container keeps a single [`FlyweightRow`] that
//! is bound to one row element at a time (`setup`), handed to an updater, and unbound again
//! (`teardown`). Its cells are exposed through a [`Cells`] traversal that lends out one
//! [`FlyweightCell`] at a time.
//!
//! Handles must not be retained. Here, this is mostly enforced by lifetimes: a cell handle
//! borrows the traversal, and a traversal borrows the row. Keys ([`CellKey`]) can be kept, but
//! stop resolving once the row is rebound, and accessing an unbound row panics.
//!
//! ## Column spans
//! A cell may cover several columns. Setting a span hides the covered sibling cells, widens the
//! cell, and makes the traversal skip the covered cells. Spans are reset every time a traversal
//! visits a cell for the first time, so each pass starts from a plain grid.
//!
//! ## Updaters
//! Content is provided by an [`EscalatorUpdater`] (and a [`SpacerUpdater`] for spacers). The
//! engine never clears content on its own; see [`updater`] for the call order.
//!
//! ## Coordinate System
//! The origin is at the top left corner of a section. The y-axis is oriented such that
//! positive y points down.

pub mod cell;
pub mod cells;
pub mod dom;
pub mod error;
pub mod rect;
pub mod row;
pub mod updater;

pub use cell::{Cell, CellKey, FlyweightCell};
pub use cells::Cells;
pub use dom::{Document, Element, ElementId, Tag};
pub use error::{Error, Result};
pub use rect::Rect;
pub use row::{FlyweightRow, Row};
pub use updater::{EscalatorUpdater, Spacer, SpacerUpdater};
