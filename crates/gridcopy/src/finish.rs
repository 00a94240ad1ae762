//! Sequential finishing pass run after every row task of a job succeeded.
//!
//! Every step is best effort: a merge or dimension that cannot be applied is
//! logged and skipped, never turned into a job failure.

use gridcopy_common::Offset;
use gridcopy_io::SpreadsheetDocument;
use tracing::debug;

use crate::copy::CopyJob;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Finished {
    pub merges: usize,
    pub columns: usize,
    pub heights: usize,
}

pub(crate) fn run<D: SpreadsheetDocument>(
    src: &D,
    dst: &D,
    job: &CopyJob,
    offset: Offset,
) -> Finished {
    let _span = tracing::info_span!("finishing").entered();
    Finished {
        merges: copy_merges(src, dst, job, offset),
        columns: copy_column_widths(src, dst, job, offset),
        heights: copy_row_heights(src, dst, job, offset),
    }
}

/// Re-merge every region lying wholly inside the source rectangle.
/// Regions that only overlap it are dropped, not clipped.
fn copy_merges<D: SpreadsheetDocument>(src: &D, dst: &D, job: &CopyJob, offset: Offset) -> usize {
    let regions = match src.merge_regions(&job.src_sheet) {
        Ok(regions) => regions,
        Err(e) => {
            debug!(error = %e, "merge regions unavailable; skipping");
            return 0;
        }
    };

    let mut merged = 0;
    for region in regions {
        if !job.rect.contains_rect(&region) {
            if job.rect.intersects(&region) {
                debug!(%region, "partial merge dropped");
            }
            continue;
        }
        let Some(target) = region.translate(offset) else {
            debug!(%region, "merge falls off the grid");
            continue;
        };
        match dst.merge(&job.dst_sheet, target) {
            Ok(()) => merged += 1,
            Err(e) => debug!(%target, error = %e, "merge skipped"),
        }
    }
    merged
}

fn copy_column_widths<D: SpreadsheetDocument>(
    src: &D,
    dst: &D,
    job: &CopyJob,
    offset: Offset,
) -> usize {
    let mut copied = 0;
    for col in job.rect.start_col..=job.rect.end_col {
        let width = match src.column_width(&job.src_sheet, col) {
            Ok(Some(width)) if width > 0.0 => width,
            Ok(_) => continue,
            Err(e) => {
                debug!(col, error = %e, "column width unreadable");
                continue;
            }
        };
        let Some(dst_col) = offset.apply_col(col) else {
            continue;
        };
        match dst.set_column_width(&job.dst_sheet, dst_col, width) {
            Ok(()) => copied += 1,
            Err(e) => debug!(col = dst_col, error = %e, "column width skipped"),
        }
    }
    copied
}

fn copy_row_heights<D: SpreadsheetDocument>(
    src: &D,
    dst: &D,
    job: &CopyJob,
    offset: Offset,
) -> usize {
    let mut copied = 0;
    for row in job.rect.start_row..=job.rect.end_row {
        let height = match src.row_height(&job.src_sheet, row) {
            Ok(Some(height)) if height > 0.0 => height,
            Ok(_) => continue,
            Err(e) => {
                debug!(row, error = %e, "row height unreadable");
                continue;
            }
        };
        let Some(dst_row) = offset.apply_row(row) else {
            continue;
        };
        match dst.set_row_height(&job.dst_sheet, dst_row, height) {
            Ok(()) => copied += 1,
            Err(e) => debug!(row = dst_row, error = %e, "row height skipped"),
        }
    }
    copied
}
