use serde::{Deserialize, Serialize};

/// Worker pool sizing for a [`CopyEngine`](crate::CopyEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Queue slots per worker; submission blocks once the queue is full.
    pub queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            queue_depth: 2,
        }
    }
}

impl EngineConfig {
    pub fn single_threaded() -> Self {
        Self {
            workers: 1,
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    /// Total bounded queue capacity, never zero.
    pub fn queue_capacity(&self) -> usize {
        self.workers.saturating_mul(self.queue_depth).max(1)
    }
}
