use gridcopy_io::{CellRect, LiteralValue, SpreadsheetDocument, UmyaDocument};

#[test]
fn save_and_reopen_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("saved.xlsx");

    let doc = UmyaDocument::new_blank();
    doc.set_cell_value("Sheet1", 1, 1, LiteralValue::Int(123)).unwrap();
    doc.set_cell_formula("Sheet1", 1, 2, "=A1+1").unwrap();
    doc.merge("Sheet1", CellRect::parse_a1("C1:D1").unwrap())
        .unwrap();
    doc.save_as(&path).unwrap();

    let reopened = UmyaDocument::open_path(&path).unwrap();
    assert_eq!(reopened.original_path(), Some(path.as_path()));
    assert_eq!(
        reopened.read_value("Sheet1", 1, 1).unwrap(),
        LiteralValue::Int(123)
    );
    assert_eq!(
        reopened.cell_formula("Sheet1", 1, 2).unwrap().as_deref(),
        Some("=A1+1")
    );
    assert_eq!(reopened.merge_regions("Sheet1").unwrap().len(), 1);
}

#[test]
fn opening_a_missing_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(UmyaDocument::open_path(tmp.path().join("absent.xlsx")).is_err());
}
