/// Configuration for the analysis pipeline.
///
/// The defaults bound the resource use of the original unbounded design: a
/// small fixed worker pool and short queues whose fullness back-pressures
/// the receive loop.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    workers: usize,
    dispatch_capacity: usize,
    completed_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            dispatch_capacity: 8,
            completed_capacity: 8,
        }
    }
}

impl PipelineConfig {
    /// Set the number of analysis worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the capacity of the dispatch queue; `dispatch()` blocks when full.
    pub fn with_dispatch_capacity(mut self, capacity: usize) -> Self {
        self.dispatch_capacity = capacity.max(1);
        self
    }

    /// Set the capacity of the completed-results queue feeding the display.
    pub fn with_completed_capacity(mut self, capacity: usize) -> Self {
        self.completed_capacity = capacity.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn dispatch_capacity(&self) -> usize {
        self.dispatch_capacity
    }

    pub fn completed_capacity(&self) -> usize {
        self.completed_capacity
    }
}
