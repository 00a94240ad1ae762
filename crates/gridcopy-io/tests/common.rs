use std::path::PathBuf;

/// Build an xlsx on disk with umya, starting from a blank book with `Sheet1`.
///
/// The temp dir is leaked so the file outlives the helper.
#[allow(dead_code)]
pub fn build_workbook<F>(f: F) -> PathBuf
where
    F: FnOnce(&mut umya_spreadsheet::Spreadsheet),
{
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fixture.xlsx");
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write fixture");
    std::mem::forget(dir);
    path
}
