//! A virtualized grid of rows and cells.
//!
//! # Conceptual overview
//! An [`Escalator`] renders a grid into an element tree ([`Document`]) and keeps the number of
//! elements proportional to what is visible rather than to the number of rows. It has three
//! sections: a header and a footer, where every row is materialized, and a body, where only the
//! rows inside the viewport are.
//!
//! ## Sections
//! Every section is a [`RowContainer`]. Rows are inserted, removed and refreshed by logical
//! index; the section decides which of them need elements and asks its [`EscalatorUpdater`] to
//! fill those with content. The body is a [`BodyRowContainer`] and can also show spacers beneath
//! rows.
//!
//! ## Recycling
//! When the body scrolls, row elements that leave the viewport are moved to the other end and
//! rendered again as the rows that enter it. Nothing is cleared in between: an updater that
//! doesn't overwrite a cell leaves the previous row's content in it.
//!
//! ## Positioning
//! Body rows and spacers are positioned absolutely with a [`PositionFunction`], picked from the
//! host's [`Capabilities`]. All position functions behave the same as far as the escalator is
//! concerned.
//!
//! ## Scrolling
//! The body scrolls by pixel with [`Escalator::set_scroll_top`], or to a row or spacer with
//! [`Escalator::scroll_to_row`] and [`Escalator::scroll_to_spacer`], which place the target at a
//! [`ScrollDestination`].
//!
//! ## Events
//! Whenever the range of materialized body rows changes, a [`RowVisibilityChangeEvent`] is sent
//! to registered handlers and subscribed channels.

mod body;
pub mod columns;
pub mod config;
mod container;
mod escalator;
pub mod events;
pub mod position;
pub mod scroll;
mod spacer;

pub use body::{BodyRows, BodySection};
pub use columns::ColumnConfiguration;
pub use config::{Capabilities, EscalatorConfig, DEFAULT_ROW_HEIGHT};
pub use container::{BodyRowContainer, RowContainer, SectionKind, StaticRows, StaticSection};
pub use escalator::Escalator;
pub use events::{EventHandler, HandlerRegistration, RowVisibilityChangeEvent};
pub use position::{PositionBookkeeper, PositionFunction};
pub use scroll::ScrollDestination;

pub use escalator_core::*;
