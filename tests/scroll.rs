mod common;

use common::config;
use escalator::{BodyRowContainer, Error, Escalator, RowContainer, ScrollDestination};

fn escalator_with_rows(rows: usize) -> Escalator {
    let mut escalator = Escalator::with_config(config(40.)).unwrap();
    escalator.insert_columns(0, 1).unwrap();
    escalator.body().insert_rows(0, rows).unwrap();
    escalator
}

#[test]
fn test_scroll_to_row() {
    let mut escalator = escalator_with_rows(20);

    escalator.scroll_to_row(10, ScrollDestination::Start, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 200.);
    assert_eq!(escalator.visible_row_range(), 10..13);

    escalator.scroll_to_row(10, ScrollDestination::Start, 5.).unwrap();
    assert_eq!(escalator.scroll_top(), 195.);

    escalator.scroll_to_row(10, ScrollDestination::End, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 180.);

    escalator.scroll_to_row(10, ScrollDestination::End, 5.).unwrap();
    assert_eq!(escalator.scroll_top(), 185.);

    escalator.scroll_to_row(10, ScrollDestination::Middle, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 190.);
    assert_eq!(escalator.visible_row_range(), 9..12);
}

#[test]
fn test_scroll_to_row_any() {
    let mut escalator = escalator_with_rows(20);
    escalator.set_scroll_top(190.);

    escalator.scroll_to_row(10, ScrollDestination::Any, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 190., "visible rows don't scroll");

    escalator.scroll_to_row(15, ScrollDestination::Any, 5.).unwrap();
    assert_eq!(escalator.scroll_top(), 285., "rows below end up at the bottom");

    escalator.scroll_to_row(2, ScrollDestination::Any, 5.).unwrap();
    assert_eq!(escalator.scroll_top(), 35., "rows above end up at the top");

    escalator.scroll_to_row(2, ScrollDestination::Any, 30.).unwrap();
    assert_eq!(escalator.scroll_top(), 10., "padding that doesn't fit scrolls anyway");
}

#[test]
fn test_scroll_to_row_is_clamped() {
    let mut escalator = escalator_with_rows(20);

    escalator.scroll_to_row(19, ScrollDestination::Start, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 360.);
    assert_eq!(escalator.visible_row_range(), 17..20);

    escalator.scroll_to_row(0, ScrollDestination::End, 10.).unwrap();
    assert_eq!(escalator.scroll_top(), 0.);
    assert_eq!(escalator.visible_row_range(), 0..3);
}

#[test]
fn test_scroll_to_spacer() {
    let mut escalator = escalator_with_rows(20);
    escalator.body().set_spacer(5, 30.).unwrap();

    escalator.scroll_to_spacer(5, ScrollDestination::Start, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 120.);

    escalator.scroll_to_spacer(5, ScrollDestination::End, 2.).unwrap();
    assert_eq!(escalator.scroll_top(), 112.);

    escalator.scroll_to_spacer(5, ScrollDestination::Middle, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 115.);

    escalator.scroll_to_row_and_spacer(5, ScrollDestination::End, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 110.);

    escalator.scroll_to_row_and_spacer(7, ScrollDestination::Start, 0.).unwrap();
    assert_eq!(escalator.scroll_top(), 170., "rows below a spacer are pushed down");
    assert_eq!(escalator.body().row_top(7), 170.);
}

#[test]
fn test_invalid_scroll_requests() {
    let mut escalator = escalator_with_rows(20);
    escalator.body().set_spacer(5, 30.).unwrap();
    escalator.set_scroll_top(50.);

    assert_eq!(
        escalator.scroll_to_row(3, ScrollDestination::Middle, 1.),
        Err(Error::PaddingWithMiddle(1.))
    );
    assert_eq!(
        escalator.scroll_to_spacer(5, ScrollDestination::Middle, -4.),
        Err(Error::PaddingWithMiddle(-4.))
    );
    assert_eq!(
        escalator.scroll_to_row(20, ScrollDestination::Middle, 1.),
        Err(Error::PaddingWithMiddle(1.)),
        "the destination is checked first"
    );
    assert_eq!(
        escalator.scroll_to_row(20, ScrollDestination::Start, 0.),
        Err(Error::RowIndexOutOfBounds { index: 20, row_count: 20 })
    );
    assert_eq!(
        escalator.scroll_to_row_and_spacer(20, ScrollDestination::Any, 0.),
        Err(Error::RowIndexOutOfBounds { index: 20, row_count: 20 })
    );
    assert_eq!(
        escalator.scroll_to_spacer(3, ScrollDestination::Start, 0.),
        Err(Error::NoSuchSpacer(3))
    );
    assert_eq!(
        escalator.scroll_to_row(3, ScrollDestination::End, f64::INFINITY),
        Err(Error::InvalidPadding(f64::INFINITY))
    );
    assert_eq!(escalator.scroll_top(), 50., "rejected requests don't scroll");
}
