//! Fixed-size worker pool over the bounded task queue. One run partitions
//! the image into row-blocks, feeds them to the workers, and joins the pool
//! once the sentinel has propagated to every thread. All run state lives in
//! this call frame and is borrowed by the workers; nothing survives between
//! runs.

use std::cell::UnsafeCell;
use std::cmp;
use std::thread;

use thiserror::Error;
use tracing::debug;

use crate::core::buffer::PixelBuffer;
use crate::core::filters::{invert_rows, slice_rows};
use crate::core::queue::{Task, TaskQueue};
use crate::core::FilterMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("thread count must be at least 1")]
    InvalidThreadCount,
}

/// Rows per task: roughly four blocks per thread, so faster threads pull
/// more work and the schedule balances itself without dynamic resizing.
pub fn block_rows(height: u32, threads: usize) -> u32 {
    cmp::max(1, height / (threads as u32 * 4))
}

/// Split `[0, height)` into consecutive half-open row ranges of `block`
/// rows; the final block may be shorter. The blocks are a disjoint,
/// order-preserving cover of the image.
pub fn partition(height: u32, block: u32) -> Vec<Task> {
    assert!(block > 0, "block size must be at least 1");
    let mut tasks = Vec::new();
    let mut row = 0;
    while row < height {
        let end = cmp::min(height, row + block);
        tasks.push(Task::rows(row, end));
        row = end;
    }
    tasks
}

/// Destination samples shared by the pool. Tasks carry disjoint row ranges,
/// so each cell is written by exactly one worker; the queue's mutex orders
/// every write before the dispatcher's final join.
struct OutputRows {
    samples: UnsafeCell<Vec<u8>>,
}

// Workers only touch rows owned by the task they popped; see `rows_mut`.
unsafe impl Sync for OutputRows {}

impl OutputRows {
    fn new(len: usize) -> Self {
        Self { samples: UnsafeCell::new(vec![0u8; len]) }
    }

    /// The destination slice for `rows`.
    ///
    /// SAFETY: the caller must hold a task for `rows`, and the task set must
    /// partition the image into non-overlapping ranges. Each task is popped
    /// by exactly one worker, so no two live slices ever alias.
    #[allow(clippy::mut_from_ref)]
    unsafe fn rows_mut(&self, rows: std::ops::Range<usize>, width: usize) -> &mut [u8] {
        let samples = &mut *self.samples.get();
        &mut samples[rows.start * width..rows.end * width]
    }

    fn into_samples(self) -> Vec<u8> {
        self.samples.into_inner()
    }
}

/// Filter `source` with `mode` across `threads` workers using the default
/// block-size heuristic. Returns the fully populated destination buffer.
pub fn run(source: &PixelBuffer, mode: FilterMode, threads: usize) -> Result<PixelBuffer, EngineError> {
    if threads == 0 {
        return Err(EngineError::InvalidThreadCount);
    }
    run_with_blocks(source, mode, threads, block_rows(source.height(), threads))
}

/// Same as [`run`] with an explicit rows-per-task granularity, so alternate
/// partitioning policies can be exercised without touching the engine.
pub fn run_with_blocks(
    source: &PixelBuffer,
    mode: FilterMode,
    threads: usize,
    block: u32,
) -> Result<PixelBuffer, EngineError> {
    if threads == 0 {
        return Err(EngineError::InvalidThreadCount);
    }
    let width = source.width() as usize;
    let tasks = partition(source.height(), block);
    debug!(
        "dispatching {} blocks of <= {} rows to {} workers",
        tasks.len(),
        block,
        threads
    );

    let queue = TaskQueue::new();
    let out = OutputRows::new(source.len());

    // Scope joins every worker before returning, so the destination is
    // complete and exclusively owned again once we leave it.
    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| worker_loop(&queue, source, &out, mode, width));
        }
        for task in &tasks {
            queue.push(*task);
        }
        // One sentinel covers the whole pool: each worker that meets it
        // re-enqueues it for the next before exiting.
        queue.push(Task::SENTINEL);
    });

    Ok(PixelBuffer::new(
        source.width(),
        source.height(),
        source.max_value(),
        out.into_samples(),
    ))
}

fn worker_loop(queue: &TaskQueue, src: &PixelBuffer, out: &OutputRows, mode: FilterMode, width: usize) {
    loop {
        let task = queue.pop();
        if task.is_sentinel() {
            queue.push(task);
            break;
        }
        let rows = task.range();
        // SAFETY: `rows` comes from the partition, which never hands the
        // same row to two tasks, and this worker alone popped this task.
        let dst = unsafe { out.rows_mut(rows.clone(), width) };
        match mode {
            FilterMode::Negative => invert_rows(src, rows, dst),
            FilterMode::Slice { t1, t2 } => slice_rows(src, rows, dst, t1, t2),
        }
    }
}
