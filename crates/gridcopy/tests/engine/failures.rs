use crate::common::{at, engine, insert_book, rect};
use gridcopy::{CopyError, CopyJob, DocumentHandle, ErrorKind, SpreadsheetDocument};

#[test]
fn bad_formula_fails_the_job_and_skips_finishing() {
    let engine = engine(8);
    let src = insert_book(&engine, |book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        for row in 1..=1000u32 {
            for col in 1..=10u32 {
                sh.get_cell_mut((col, row)).set_value_number(row as f64);
            }
        }
        // Stored raw, bypassing validation.
        sh.get_cell_mut((5, 500)).set_formula("SUM(");
        sh.add_merge_cells("A1:B2");
        sh.get_column_dimension_by_number_mut(&3).set_width(25.0);
        sh.get_row_dimension_mut(&4).set_height(33.0);
    });
    let dst = engine.create();

    let job = CopyJob::new(src, dst, "Sheet1", "Out", rect("A1:J1000"), at("A1"))
        .prefer_formulas(true);
    let err = engine.copy_range(&job).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CellWriteFailed);
    match err {
        CopyError::CellWriteFailed { row, col, .. } => assert_eq!((row, col), (500, 5)),
        other => panic!("unexpected error {other:?}"),
    }

    let doc = engine.store().get(dst).unwrap();
    assert!(doc.merge_regions("Out").unwrap().is_empty());
    assert_ne!(doc.column_width("Out", 3).unwrap(), Some(25.0));
    assert!(!matches!(doc.row_height("Out", 4).unwrap(), Some(h) if h > 0.0));
}

#[test]
fn unknown_destination_is_not_found() {
    let engine = engine(2);
    let src = insert_book(&engine, |book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value_string("keep");
    });
    let before = engine.read_sheet(src, "Sheet1").unwrap();

    let never_opened = DocumentHandle::from_raw(4242);
    let job = CopyJob::new(src, never_opened, "Sheet1", "Sheet1", rect("A1:B2"), at("A1"));
    match engine.copy_range(&job).unwrap_err() {
        CopyError::DocumentNotFound(h) => assert_eq!(h, never_opened),
        other => panic!("unexpected error {other:?}"),
    }

    let closed = engine.create();
    engine.close(closed).unwrap();
    let job = CopyJob::new(src, closed, "Sheet1", "Sheet1", rect("A1:B2"), at("A1"));
    assert_eq!(
        engine.copy_range(&job).unwrap_err().kind(),
        ErrorKind::DocumentNotFound
    );

    assert_eq!(engine.read_sheet(src, "Sheet1").unwrap(), before);
    assert_eq!(engine.sheet_names(src).unwrap(), vec!["Sheet1".to_string()]);
}

#[test]
fn out_of_bounds_target_is_a_write_failure() {
    // One worker runs rows in order, so row 1 lands before row 2 fails.
    let engine = engine(1);
    let src = insert_book(&engine, |book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value_string("a");
        sh.get_cell_mut((1, 2)).set_value_string("b");
    });
    let dst = engine.create();
    let job = CopyJob::new(src, dst, "Sheet1", "Sheet1", rect("A1:A2"), at("A1048576"));
    let err = engine.copy_range(&job).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CellWriteFailed);
    // Row 1 fits on the last grid row.
    let doc = engine.store().get(dst).unwrap();
    assert_eq!(doc.cell_value("Sheet1", 1_048_576, 1).unwrap(), "a");
}

#[test]
fn missing_source_sheet_touches_nothing() {
    let engine = engine(2);
    let src = engine.create();
    let dst = engine.create();
    let job = CopyJob::new(src, dst, "Ghost", "Out", rect("A1:A1"), at("A1"));
    assert_eq!(
        engine.copy_range(&job).unwrap_err().kind(),
        ErrorKind::SheetNotFound
    );
    assert_eq!(engine.sheet_names(dst).unwrap(), vec!["Sheet1".to_string()]);
}
