//! Fixed-size pool of OS threads draining a bounded FIFO queue.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, error, info, warn};

use crate::error::PoolError;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Worker threads sharing one bounded queue.
///
/// `submit` blocks while the queue is full. Closing (or dropping) the pool stops
/// intake, lets the workers drain whatever is queued, and joins them.
pub struct WorkerPool {
    sender: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(workers: usize, queue_capacity: usize) -> Result<Self, PoolError> {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        let capacity = queue_capacity.max(1);
        let (sender, receiver) = bounded::<Task>(capacity);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let receiver = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("gridcopy-worker-{id}"))
                .spawn(move || worker_loop(id, receiver));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!("failed to spawn worker {}: {}", id, e);
                    drop(sender);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        info!(workers, capacity, "worker pool started");
        Ok(Self {
            sender: Some(sender),
            workers: handles,
            capacity,
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Enqueue a task, blocking while the queue is full.
    pub fn submit<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::Closed)?;
        sender.send(Box::new(task)).map_err(|_| PoolError::Closed)
    }

    /// Stop accepting work, drain the queue and join every worker.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.sender.take().is_none() {
            return;
        }
        let workers = self.workers.len();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread exited abnormally");
            }
        }
        info!(workers, "worker pool closed");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(id: usize, receiver: Receiver<Task>) {
    debug!(worker = id, "worker started");
    // Ends once every sender is gone and the queue is empty.
    for task in receiver.iter() {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            error!(worker = id, "task panicked");
        }
    }
    debug!(worker = id, "worker stopped");
}
