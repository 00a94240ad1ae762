use crate::common::{engine, insert_book};
use gridcopy::{ErrorKind, LiteralValue, SpreadsheetDocument};

#[test]
fn save_then_open_round_trip() {
    let engine = engine(2);
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("book.xlsx");

    let doc = engine.create();
    engine.write_cell(doc, "Sheet1", "A1", "42").unwrap();
    engine.write_cell(doc, "Sheet1", "B1", "=A1+1").unwrap();
    engine.write_cell(doc, "Sheet1", "C1", "hello").unwrap();
    engine.save(doc, &path).unwrap();
    engine.close(doc).unwrap();

    let reopened = engine.open(&path).unwrap();
    assert!(reopened.get() > doc.get());
    let d = engine.store().get(reopened).unwrap();
    assert_eq!(d.read_value("Sheet1", 1, 1).unwrap(), LiteralValue::Int(42));
    assert_eq!(
        d.cell_formula("Sheet1", 1, 2).unwrap().as_deref(),
        Some("=A1+1")
    );
    assert_eq!(engine.read_sheet(reopened, "Sheet1").unwrap()[0][2], "hello");
}

#[test]
fn open_and_save_failures_have_their_own_kind() {
    let engine = engine(1);
    let tmp = tempfile::tempdir().unwrap();
    let err = engine.open(tmp.path().join("nope.xlsx")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OpenFailed);

    let doc = engine.create();
    let err = engine
        .save(doc, tmp.path().join("missing-dir").join("out.xlsx"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SaveFailed);

    engine.close(doc).unwrap();
    let err = engine.save(doc, tmp.path().join("out.xlsx")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DocumentNotFound);
}

#[test]
fn close_all_releases_every_document() {
    let engine = engine(1);
    let a = engine.create();
    let b = engine.create();
    assert_eq!(engine.close_all(), 2);
    assert!(engine.store().is_empty());
    assert_eq!(engine.sheet_names(a).unwrap_err().kind(), ErrorKind::DocumentNotFound);
    assert_eq!(engine.sheet_names(b).unwrap_err().kind(), ErrorKind::DocumentNotFound);
}

#[test]
fn write_cell_validates_address_and_formula() {
    let engine = engine(1);
    let doc = engine.create();
    assert_eq!(
        engine.write_cell(doc, "Sheet1", "1A", "x").unwrap_err().kind(),
        ErrorKind::InvalidRange
    );
    assert_eq!(
        engine.write_cell(doc, "Sheet1", "A1", "=SUM(").unwrap_err().kind(),
        ErrorKind::CellWriteFailed
    );
    assert_eq!(
        engine.write_cell(doc, "Nope", "A1", "x").unwrap_err().kind(),
        ErrorKind::SheetNotFound
    );
    engine.write_cell(doc, "Sheet1", "$b$2", "-3.5").unwrap();
    let d = engine.store().get(doc).unwrap();
    assert_eq!(d.read_value("Sheet1", 2, 2).unwrap(), LiteralValue::Number(-3.5));
}

#[test]
fn unmerge_range_by_corner_addresses() {
    let engine = engine(1);
    let doc = insert_book(&engine, |book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.add_merge_cells("A1:B2");
        sh.add_merge_cells("D1:D3");
    });
    assert_eq!(engine.unmerge_range(doc, "Sheet1", "B2", "A1").unwrap(), 1);
    let d = engine.store().get(doc).unwrap();
    assert_eq!(d.merge_regions("Sheet1").unwrap().len(), 1);
    assert_eq!(
        engine.unmerge_range(doc, "Sheet1", "A1", "??").unwrap_err().kind(),
        ErrorKind::InvalidRange
    );
}
