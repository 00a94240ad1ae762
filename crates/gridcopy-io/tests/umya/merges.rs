use gridcopy_io::{CellRect, IoError, SpreadsheetDocument, UmyaDocument};

fn rect(a1: &str) -> CellRect {
    CellRect::parse_a1(a1).unwrap()
}

#[test]
fn merge_is_idempotent() {
    let doc = UmyaDocument::new_blank();
    doc.merge("Sheet1", rect("A1:B2")).unwrap();
    doc.merge("Sheet1", rect("A1:B2")).unwrap();
    assert_eq!(doc.merge_regions("Sheet1").unwrap(), vec![rect("A1:B2")]);
}

#[test]
fn overlapping_merge_conflicts() {
    let doc = UmyaDocument::new_blank();
    doc.merge("Sheet1", rect("A1:B2")).unwrap();
    let err = doc.merge("Sheet1", rect("B2:C3")).unwrap_err();
    match err {
        IoError::MergeConflict {
            requested,
            existing,
        } => {
            assert_eq!(requested, rect("B2:C3"));
            assert_eq!(existing, rect("A1:B2"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    // Disjoint merges are fine.
    doc.merge("Sheet1", rect("D4:E4")).unwrap();
    assert_eq!(doc.merge_regions("Sheet1").unwrap().len(), 2);
}

#[test]
fn unmerge_removes_overlapping_regions() {
    let doc = UmyaDocument::new_blank();
    doc.merge("Sheet1", rect("A1:B2")).unwrap();
    doc.merge("Sheet1", rect("D1:E1")).unwrap();
    doc.merge("Sheet1", rect("A10:C10")).unwrap();

    let removed = doc.unmerge("Sheet1", rect("B2:D1")).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(doc.merge_regions("Sheet1").unwrap(), vec![rect("A10:C10")]);

    assert_eq!(doc.unmerge("Sheet1", rect("Z1:Z2")).unwrap(), 0);
}

#[test]
fn merges_read_from_file() {
    let path = crate::common::build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.add_merge_cells("B2:C4");
    });
    let doc = UmyaDocument::open_path(&path).unwrap();
    assert_eq!(doc.merge_regions("Sheet1").unwrap(), vec![rect("B2:C4")]);
}
