//! Range copy engine.
//!
//! A job runs `Resolving -> Copying -> Finishing -> Done | Failed`. Copying fans
//! out one task per source row onto the shared [`WorkerPool`]; the finishing
//! pass (merges, column widths, row heights) runs on the calling thread only
//! after every row task has returned, and only if none of them failed.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gridcopy_common::{CellCoord, CellRect, LiteralValue, Offset};
use gridcopy_io::SpreadsheetDocument;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::error::{CopyError, Result};
use crate::finish;
use crate::pool::WorkerPool;
use crate::store::{DocumentHandle, DocumentStore};

/// Lifecycle of one copy job, reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Resolving,
    Copying,
    Finishing,
    Done,
    Failed,
}

/// One range copy, fully described by its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    pub src: DocumentHandle,
    pub dst: DocumentHandle,
    pub src_sheet: String,
    pub dst_sheet: String,
    /// Source rectangle, 1-based and inclusive.
    pub rect: CellRect,
    /// Destination of the rectangle's top-left cell.
    pub anchor: CellCoord,
    /// Copy formulas instead of their cached values when a cell has one.
    pub prefer_formulas: bool,
}

impl CopyJob {
    pub fn new(
        src: DocumentHandle,
        dst: DocumentHandle,
        src_sheet: impl Into<String>,
        dst_sheet: impl Into<String>,
        rect: CellRect,
        anchor: CellCoord,
    ) -> Self {
        Self {
            src,
            dst,
            src_sheet: src_sheet.into(),
            dst_sheet: dst_sheet.into(),
            rect,
            anchor,
            prefer_formulas: false,
        }
    }

    pub fn prefer_formulas(mut self, prefer: bool) -> Self {
        self.prefer_formulas = prefer;
        self
    }

    /// Destination rectangle covered by the copy.
    pub fn target(&self) -> CellRect {
        self.rect.at_anchor(self.anchor)
    }

    pub fn offset(&self) -> Offset {
        Offset::between(self.rect.start(), self.anchor)
    }

    fn validate(&self) -> Result<()> {
        let r = &self.rect;
        if r.start_row == 0 || r.start_col == 0 || self.anchor.row == 0 || self.anchor.col == 0 {
            return Err(CopyError::InvalidRange(format!(
                "zero coordinate in rect ({}, {})-({}, {}) or anchor ({}, {})",
                r.start_row, r.start_col, r.end_row, r.end_col, self.anchor.row, self.anchor.col
            )));
        }
        if r.start_row > r.end_row || r.start_col > r.end_col {
            return Err(CopyError::InvalidRange(format!(
                "inverted rect ({}, {})-({}, {})",
                r.start_row, r.start_col, r.end_row, r.end_col
            )));
        }
        Ok(())
    }
}

/// Summary of a successful copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    /// Cells whose value or formula was written.
    pub cells: u64,
    /// Row tasks that ran.
    pub rows: u32,
    /// Merge regions reproduced at the destination.
    pub merges: usize,
    /// Column widths copied.
    pub columns: usize,
    /// Row heights copied.
    pub heights: usize,
}

struct Workers {
    pool: WorkerPool,
    config: EngineConfig,
}

/// Copies cell ranges between documents of one [`DocumentStore`].
pub struct CopyEngine<D: SpreadsheetDocument> {
    store: Arc<DocumentStore<D>>,
    // Jobs hold the read side for their whole run; resizing takes the write side.
    workers: RwLock<Workers>,
}

impl<D: SpreadsheetDocument> CopyEngine<D> {
    /// Engine over a fresh, empty store.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_store(Arc::new(DocumentStore::new()), config)
    }

    pub fn with_store(store: Arc<DocumentStore<D>>, config: EngineConfig) -> Result<Self> {
        let pool = WorkerPool::new(config.workers, config.queue_capacity())?;
        Ok(Self {
            store,
            workers: RwLock::new(Workers { pool, config }),
        })
    }

    pub fn store(&self) -> &Arc<DocumentStore<D>> {
        &self.store
    }

    pub fn config(&self) -> EngineConfig {
        self.workers.read().config
    }

    pub fn pool_size(&self) -> usize {
        self.workers.read().pool.size()
    }

    /// Replace the worker pool with one of `workers` threads.
    ///
    /// Waits for running jobs to finish, then swaps the pool and drains the old
    /// one before returning.
    pub fn resize_pool(&self, workers: usize) -> Result<()> {
        let mut slot = self.workers.write();
        let config = slot.config.with_workers(workers);
        let fresh = WorkerPool::new(config.workers, config.queue_capacity())?;
        let old = std::mem::replace(&mut slot.pool, fresh);
        slot.config = config;
        old.close();
        info!(workers, "worker pool resized");
        Ok(())
    }

    /// Copy `job.rect` from the source sheet so its top-left cell lands on
    /// `job.anchor` in the destination sheet.
    ///
    /// Cells written before a failure stay written; merges, widths and heights
    /// are only applied when every cell succeeded.
    pub fn copy_range(&self, job: &CopyJob) -> Result<CopyReport> {
        let span = tracing::info_span!(
            "copy_range",
            src = %job.src,
            dst = %job.dst,
            src_sheet = %job.src_sheet,
            dst_sheet = %job.dst_sheet,
            rect = %job.rect,
            anchor = %job.anchor,
        );
        let _enter = span.enter();

        debug!(phase = ?JobPhase::Resolving, "job phase");
        job.validate()?;
        let src = self.store.get(job.src)?;
        let dst = self.store.get(job.dst)?;
        if !src.has_sheet(&job.src_sheet) {
            return Err(CopyError::SheetNotFound(job.src_sheet.clone()));
        }
        let target = job.target();
        // Copying a range onto itself rewrites each cell in place, so only a
        // shifted overlap is rejected.
        let same_sheet = job.src == job.dst && job.src_sheet == job.dst_sheet;
        if same_sheet && target != job.rect && target.intersects(&job.rect) {
            return Err(CopyError::OverlappingRanges {
                sheet: job.src_sheet.clone(),
                src: job.rect,
                dst: target,
            });
        }
        // Before any row task runs, so tasks never race to create it.
        dst.create_sheet(&job.dst_sheet)?;

        let workers = self.workers.read();
        let offset = job.offset();

        debug!(phase = ?JobPhase::Copying, workers = workers.pool.size(), "job phase");
        let ctx = Arc::new(RowContext {
            src: Arc::clone(&src),
            dst: Arc::clone(&dst),
            job: job.clone(),
            offset,
            token: CancellationToken::new(),
            cells: AtomicU64::new(0),
        });
        let rows = match run_rows(&workers.pool, &ctx) {
            Ok(rows) => rows,
            Err(err) => {
                debug!(phase = ?JobPhase::Failed, "job phase");
                warn!(error = %err, "copy failed");
                return Err(err);
            }
        };

        debug!(phase = ?JobPhase::Finishing, "job phase");
        let finished = finish::run(&*src, &*dst, job, offset);

        let report = CopyReport {
            cells: ctx.cells.load(Ordering::Relaxed),
            rows,
            merges: finished.merges,
            columns: finished.columns,
            heights: finished.heights,
        };
        debug!(phase = ?JobPhase::Done, "job phase");
        info!(
            cells = report.cells,
            merges = report.merges,
            columns = report.columns,
            heights = report.heights,
            "copy complete"
        );
        Ok(report)
    }

    /// Copy the used area of `src_sheet` to `dst_sheet` at `A1`.
    ///
    /// The used area spans every row up to the last non-empty one and every
    /// column up to the longest such row. An empty sheet only ensures the
    /// destination sheet exists.
    pub fn copy_sheet(
        &self,
        src: DocumentHandle,
        dst: DocumentHandle,
        src_sheet: &str,
        dst_sheet: &str,
        prefer_formulas: bool,
    ) -> Result<CopyReport> {
        let source = self.store.get(src)?;
        let destination = self.store.get(dst)?;
        if !source.has_sheet(src_sheet) {
            return Err(CopyError::SheetNotFound(src_sheet.to_string()));
        }
        let rows = source.read_rows(src_sheet)?;
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            destination.create_sheet(dst_sheet)?;
            debug!(src_sheet, dst_sheet, "source sheet empty; nothing to copy");
            return Ok(CopyReport::default());
        }

        let rect = u32::try_from(height)
            .ok()
            .zip(u32::try_from(width).ok())
            .and_then(|(h, w)| CellRect::new(1, h, 1, w).ok())
            .ok_or_else(|| CopyError::InvalidRange(format!("used area {height}x{width}")))?;
        let anchor = CellCoord { row: 1, col: 1 };
        let job = CopyJob::new(src, dst, src_sheet, dst_sheet, rect, anchor)
            .prefer_formulas(prefer_formulas);
        self.copy_range(&job)
    }

    /// Duplicate a whole sheet, including everything the backend keeps on it,
    /// replacing any sheet already named `dst_sheet` in the destination.
    pub fn duplicate_sheet(
        &self,
        src: DocumentHandle,
        dst: DocumentHandle,
        src_sheet: &str,
        dst_sheet: &str,
    ) -> Result<()> {
        let source = self.store.get(src)?;
        let destination = self.store.get(dst)?;
        if !source.has_sheet(src_sheet) {
            return Err(CopyError::SheetNotFound(src_sheet.to_string()));
        }
        let snapshot = source.sheet_snapshot(src_sheet)?;
        destination.put_sheet(dst_sheet, snapshot)?;
        info!(%src, %dst, src_sheet, dst_sheet, "sheet duplicated");
        Ok(())
    }

    /// Open a document into the engine's store.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<DocumentHandle> {
        self.store.open(path)
    }

    pub fn create(&self) -> DocumentHandle {
        self.store.create()
    }

    pub fn insert(&self, doc: D) -> DocumentHandle {
        self.store.insert(doc)
    }

    pub fn close(&self, handle: DocumentHandle) -> Result<()> {
        self.store.close(handle)
    }

    pub fn close_all(&self) -> usize {
        self.store.close_all()
    }

    pub fn save<P: AsRef<Path>>(&self, handle: DocumentHandle, path: P) -> Result<()> {
        self.store.save(handle, path)
    }
}

/// State shared by the row tasks of one job.
struct RowContext<D> {
    src: Arc<D>,
    dst: Arc<D>,
    job: CopyJob,
    offset: Offset,
    token: CancellationToken,
    cells: AtomicU64,
}

/// Submit one task per source row and wait for all of them.
///
/// Returns the number of rows that ran, or the first failure.
fn run_rows<D: SpreadsheetDocument>(pool: &WorkerPool, ctx: &Arc<RowContext<D>>) -> Result<u32> {
    let rect = ctx.job.rect;
    // Each task holds a sender; the channel disconnects once every task is gone,
    // whether it finished or unwound.
    let (done_tx, done_rx) = crossbeam_channel::unbounded::<()>();
    let mut submitted = 0usize;
    for row in rect.start_row..=rect.end_row {
        if ctx.token.is_cancelled() {
            break;
        }
        let task_ctx = Arc::clone(ctx);
        let done = done_tx.clone();
        let submit = pool.submit(move || {
            if !task_ctx.token.is_cancelled() {
                if let Err(err) = task_ctx.copy_row(row) {
                    if task_ctx.token.cancel(err) {
                        warn!(row, "row failed; cancelling remaining rows");
                    }
                }
            }
            let _ = done.send(());
        });
        if let Err(err) = submit {
            ctx.token.cancel(err.into());
            break;
        }
        submitted += 1;
    }
    drop(done_tx);

    let completed = done_rx.iter().count();
    if let Some(cause) = ctx.token.take_cause() {
        return Err(cause);
    }
    if completed < submitted {
        return Err(CopyError::RowTaskPanicked(submitted - completed));
    }
    Ok(u32::try_from(completed).unwrap_or(u32::MAX))
}

impl<D: SpreadsheetDocument> RowContext<D> {
    fn copy_row(&self, row: u32) -> Result<()> {
        let job = &self.job;
        // Off the grid only on u32 overflow; the backend rejects u32::MAX.
        let dst_row = self.offset.apply_row(row).unwrap_or(u32::MAX);
        for col in job.rect.start_col..=job.rect.end_col {
            if self.token.is_cancelled() {
                return Ok(());
            }
            let dst_col = self.offset.apply_col(col).unwrap_or(u32::MAX);
            self.copy_cell(row, col, dst_row, dst_col)?;
        }
        Ok(())
    }

    fn copy_cell(&self, row: u32, col: u32, dst_row: u32, dst_col: u32) -> Result<()> {
        let job = &self.job;
        let (src, dst) = (&*self.src, &*self.dst);
        let style = src.cell_style(&job.src_sheet, row, col)?;

        let formula = if job.prefer_formulas {
            src.cell_formula(&job.src_sheet, row, col)?
        } else {
            None
        };
        match formula {
            Some(formula) => dst
                .set_cell_formula(&job.dst_sheet, dst_row, dst_col, &formula)
                .map_err(|e| CopyError::cell_write(&job.dst_sheet, dst_row, dst_col, e))?,
            None => {
                let raw = src.cell_value(&job.src_sheet, row, col)?;
                dst.set_cell_value(&job.dst_sheet, dst_row, dst_col, LiteralValue::from_raw(&raw))
                    .map_err(|e| CopyError::cell_write(&job.dst_sheet, dst_row, dst_col, e))?;
            }
        }
        self.cells.fetch_add(1, Ordering::Relaxed);

        if let Some(style) = style {
            if let Err(source) = dst.set_cell_style(&job.dst_sheet, dst_row, dst_col, style) {
                let err = CopyError::StyleCopyFailed {
                    sheet: job.dst_sheet.clone(),
                    row: dst_row,
                    col: dst_col,
                    source,
                };
                debug!(error = %err, "style not copied");
            }
        }
        Ok(())
    }
}
