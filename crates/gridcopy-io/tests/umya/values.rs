use gridcopy_io::{IoError, LiteralValue, SpreadsheetDocument, UmyaDocument};

#[test]
fn typed_values_survive_write_and_read() {
    let doc = UmyaDocument::new_blank();
    doc.set_cell_value("Sheet1", 1, 1, LiteralValue::Int(42)).unwrap();
    doc.set_cell_value("Sheet1", 1, 2, LiteralValue::Number(3.14)).unwrap();
    doc.set_cell_value("Sheet1", 1, 3, LiteralValue::Text("abc".into()))
        .unwrap();
    doc.set_cell_value("Sheet1", 1, 4, LiteralValue::Boolean(true))
        .unwrap();

    assert_eq!(doc.read_value("Sheet1", 1, 1).unwrap(), LiteralValue::Int(42));
    assert_eq!(
        doc.read_value("Sheet1", 1, 2).unwrap(),
        LiteralValue::Number(3.14)
    );
    assert_eq!(
        doc.read_value("Sheet1", 1, 3).unwrap(),
        LiteralValue::Text("abc".into())
    );
    assert_eq!(
        doc.read_value("Sheet1", 1, 4).unwrap(),
        LiteralValue::Boolean(true)
    );
    assert_eq!(doc.cell_value("Sheet1", 1, 1).unwrap(), "42");
    assert_eq!(doc.cell_value("Sheet1", 1, 3).unwrap(), "abc");
}

#[test]
fn missing_cells_read_as_empty() {
    let doc = UmyaDocument::new_blank();
    assert_eq!(doc.cell_value("Sheet1", 7, 7).unwrap(), "");
    assert_eq!(doc.read_value("Sheet1", 7, 7).unwrap(), LiteralValue::Empty);
    assert!(doc.cell_style("Sheet1", 7, 7).unwrap().is_none());
    assert!(doc.cell_formula("Sheet1", 7, 7).unwrap().is_none());
}

#[test]
fn empty_literal_blanks_the_cell() {
    let doc = UmyaDocument::new_blank();
    doc.set_cell_value("Sheet1", 2, 2, LiteralValue::Text("x".into()))
        .unwrap();
    doc.set_cell_value("Sheet1", 2, 2, LiteralValue::Empty).unwrap();
    assert_eq!(doc.cell_value("Sheet1", 2, 2).unwrap(), "");
}

#[test]
fn unknown_sheet_is_reported() {
    let doc = UmyaDocument::new_blank();
    let err = doc
        .set_cell_value("Nope", 1, 1, LiteralValue::Int(1))
        .unwrap_err();
    assert!(matches!(err, IoError::SheetNotFound(ref s) if s == "Nope"));
    assert!(matches!(
        doc.read_rows("Nope"),
        Err(IoError::SheetNotFound(_))
    ));
}

#[test]
fn writes_outside_sheet_bounds_fail() {
    let doc = UmyaDocument::new_blank();
    let err = doc
        .set_cell_value("Sheet1", 1_048_577, 1, LiteralValue::Int(1))
        .unwrap_err();
    assert!(matches!(err, IoError::OutOfBounds { row: 1_048_577, .. }));
    let err = doc
        .set_cell_value("Sheet1", 1, 16_385, LiteralValue::Int(1))
        .unwrap_err();
    assert!(matches!(err, IoError::OutOfBounds { col: 16_385, .. }));
}

#[test]
fn read_rows_is_trimmed_like_a_grid() {
    let doc = UmyaDocument::new_blank();
    doc.set_cell_value("Sheet1", 1, 1, LiteralValue::Text("a".into()))
        .unwrap();
    doc.set_cell_value("Sheet1", 1, 3, LiteralValue::Text("c".into()))
        .unwrap();
    doc.set_cell_value("Sheet1", 3, 2, LiteralValue::Int(5)).unwrap();

    let rows = doc.read_rows("Sheet1").unwrap();
    assert_eq!(
        rows,
        vec![
            vec!["a".to_string(), String::new(), "c".to_string()],
            Vec::<String>::new(),
            vec![String::new(), "5".to_string()],
        ]
    );
}

#[test]
fn create_sheet_is_idempotent() {
    let doc = UmyaDocument::new_blank();
    doc.create_sheet("Data").unwrap();
    doc.create_sheet("Data").unwrap();
    assert_eq!(doc.sheet_names(), vec!["Sheet1".to_string(), "Data".to_string()]);
    assert!(doc.has_sheet("Data"));
}

#[test]
fn integers_beyond_f64_precision_keep_their_digits() {
    let doc = UmyaDocument::new_blank();
    let raw = "9007199254740993";
    doc.set_cell_value("Sheet1", 1, 1, LiteralValue::from_raw(raw))
        .unwrap();
    assert_eq!(doc.cell_value("Sheet1", 1, 1).unwrap(), raw);
    assert_eq!(
        doc.read_value("Sheet1", 1, 1).unwrap(),
        LiteralValue::Text(raw.into())
    );

    doc.set_cell_value("Sheet1", 1, 2, LiteralValue::Int(1 << 53))
        .unwrap();
    assert_eq!(
        doc.read_value("Sheet1", 1, 2).unwrap(),
        LiteralValue::Int(1 << 53)
    );
}

#[test]
fn debug_lists_sheets() {
    let doc = UmyaDocument::new_blank();
    doc.create_sheet("Data").unwrap();
    let shown = format!("{doc:?}");
    assert!(shown.starts_with("UmyaDocument"), "{shown}");
    assert!(shown.contains("\"Data\""), "{shown}");
}
