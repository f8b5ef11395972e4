//! Bounded FIFO of row-range tasks shared between the dispatching thread and
//! the worker pool. Producers block while the queue is full, consumers block
//! while it is empty; termination is signaled in-band by the sentinel task.

use std::sync::{Condvar, Mutex};

/// Fixed queue capacity.
pub const QMAX: usize = 128;

/// A contiguous half-open range of image rows assigned as one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub row_start: i32,
    pub row_end: i32,
}

impl Task {
    /// Distinguished "no more work" value. A worker that dequeues it
    /// re-enqueues it before exiting, so every worker eventually sees it.
    pub const SENTINEL: Task = Task { row_start: -1, row_end: -1 };

    pub fn rows(row_start: u32, row_end: u32) -> Self {
        Self {
            row_start: row_start as i32,
            row_end: row_end as i32,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.row_start < 0
    }

    /// The row range as usize indices. Meaningless for the sentinel.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.row_start as usize..self.row_end as usize
    }
}

struct Ring {
    slots: Box<[Task]>,
    head: usize,
    tail: usize,
    count: usize,
}

/// Fixed-capacity circular buffer with blocking push/pop, safe for any
/// number of concurrent producers and consumers. Head, tail, and count only
/// move inside the mutex, so no caller ever observes a torn state.
pub struct TaskQueue {
    ring: Mutex<Ring>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::with_capacity(QMAX)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        Self {
            ring: Mutex::new(Ring {
                slots: vec![Task::SENTINEL; capacity].into_boxed_slice(),
                head: 0,
                tail: 0,
                count: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Append a task at the tail, blocking while the queue is at capacity,
    /// then wake one blocked popper. Tasks are never dropped or reordered.
    pub fn push(&self, task: Task) {
        let mut ring = self.ring.lock().unwrap();
        while ring.count == ring.slots.len() {
            ring = self.not_full.wait(ring).unwrap();
        }
        let cap = ring.slots.len();
        let tail = ring.tail;
        ring.slots[tail] = task;
        ring.tail = (tail + 1) % cap;
        ring.count += 1;
        self.not_empty.notify_one();
    }

    /// Remove the task at the head, blocking while the queue is empty, then
    /// wake one blocked pusher.
    pub fn pop(&self) -> Task {
        let mut ring = self.ring.lock().unwrap();
        while ring.count == 0 {
            ring = self.not_empty.wait(ring).unwrap();
        }
        let cap = ring.slots.len();
        let head = ring.head;
        let task = ring.slots[head];
        ring.head = (head + 1) % cap;
        ring.count -= 1;
        self.not_full.notify_one();
        task
    }

    /// Number of buffered tasks at this instant.
    pub fn len(&self) -> usize {
        self.ring.lock().unwrap().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
