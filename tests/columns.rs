mod common;

use common::{config, Log, Recorder};
use escalator::dom::WIDTH;
use escalator::{Error, Escalator, RowContainer};

#[test]
fn test_insert_and_remove_columns() {
    let log = Log::default();
    let mut escalator = Escalator::with_config(config(200.)).unwrap();
    escalator.insert_columns(0, 2).unwrap();
    escalator.header().insert_rows(0, 1).unwrap();
    escalator.body().set_escalator_updater(Recorder::new(&log));
    escalator.body().insert_rows(0, 2).unwrap();
    log.take();

    escalator.insert_columns(1, 2).unwrap();
    assert_eq!(
        log.take(),
        vec![
            "pre_attach 0 [1, 2]",
            "post_attach 0 [1, 2]",
            "update 0 [1, 2]",
            "pre_attach 1 [1, 2]",
            "post_attach 1 [1, 2]",
            "update 1 [1, 2]",
        ]
    );
    let tr = escalator.body().get_row_element(0).unwrap();
    let header = escalator.header().get_row_element(0).unwrap();
    let doc = escalator.document();
    let texts: Vec<&str> = doc.children(tr).iter().map(|c| doc.text(*c)).collect();
    assert_eq!(texts, vec!["0:0", "0:1", "0:2", "0:1"], "old cells aren't rendered again");
    assert_eq!(doc.child_count(header), 4);

    escalator.remove_columns(0, 1).unwrap();
    assert_eq!(
        log.take(),
        vec!["pre_detach 0 [0]", "post_detach 0 [0]", "pre_detach 1 [0]", "post_detach 1 [0]"]
    );
    assert_eq!(escalator.column_count(), 3);
    let doc = escalator.document();
    let texts: Vec<&str> = doc.children(tr).iter().map(|c| doc.text(*c)).collect();
    assert_eq!(texts, vec!["0:1", "0:2", "0:1"]);
    assert_eq!(doc.child_count(header), 3);

    escalator.set_column_width(0, 50.).unwrap();
    assert_eq!(escalator.column_width(0), Ok(50.));
    assert_eq!(escalator.column_width(1), Ok(-1.));
    let doc = escalator.document();
    assert_eq!(doc.px(doc.children(tr)[0], WIDTH), Some(50.));
    assert_eq!(doc.px(doc.children(header)[0], WIDTH), Some(50.));
    assert_eq!(doc.px(doc.children(tr)[1], WIDTH), None);
}

#[test]
fn test_remove_all_columns() {
    let log = Log::default();
    let mut escalator = Escalator::with_config(config(200.)).unwrap();
    escalator.insert_columns(0, 3).unwrap();
    escalator.header().insert_rows(0, 1).unwrap();
    escalator.body().set_escalator_updater(Recorder::new(&log));
    escalator.body().insert_rows(0, 2).unwrap();
    log.take();

    escalator.remove_columns(0, 3).unwrap();
    assert_eq!(
        log.take(),
        vec![
            "pre_detach 0 [0, 1, 2]",
            "post_detach 0 [0, 1, 2]",
            "pre_detach 1 [0, 1, 2]",
            "post_detach 1 [0, 1, 2]",
        ]
    );
    assert_eq!(escalator.column_count(), 0);
    assert_eq!(escalator.visible_row_range(), 0..0);
    assert_eq!(escalator.body().row_count(), 2);
    assert_eq!(escalator.body().get_row_element(0), Err(Error::RowNotInDom(0)));
    assert_eq!(escalator.header().get_row_element(0), Err(Error::RowNotInDom(0)));

    escalator.insert_columns(0, 1).unwrap();
    assert_eq!(
        log.take(),
        vec![
            "pre_attach 0 [0]",
            "post_attach 0 [0]",
            "update 0 [0]",
            "pre_attach 1 [0]",
            "post_attach 1 [0]",
            "update 1 [0]",
        ]
    );
    assert_eq!(escalator.visible_row_range(), 0..2);
    assert!(escalator.header().get_row_element(0).is_ok());
}
