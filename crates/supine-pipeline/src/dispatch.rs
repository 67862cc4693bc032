//! Bounded analysis dispatch over a fixed worker pool.
//!
//! Each accepted frame is tagged with a monotonically increasing sequence
//! number and handed to one of a fixed number of worker threads through a
//! bounded channel. A full channel blocks `dispatch()`, back-pressuring the
//! receive loop instead of letting in-flight analyses grow without bound.
//!
//! Workers are plain `std::thread`s because pose inference is blocking CPU
//! work; they bridge back into async through tokio channels, the same
//! pattern the capture side uses for its device thread.

use crate::reorder::{Completion, DisplayQueue};
use crate::{PipelineConfig, PipelineError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use supine_image::RgbFrame;
use supine_pose::{Analyzer, PoseError};
use tokio::sync::mpsc;

struct Job {
    seq: u64,
    frame: RgbFrame,
}

pub struct AnalysisDispatcher {
    tx: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    next_seq: u64,
}

impl AnalysisDispatcher {
    /// Spawn the worker pool and return the dispatcher plus the display
    /// queue its completions feed.
    ///
    /// `make_analyzer` is called once per worker, so every worker owns its
    /// own detector and no analysis state is shared between threads.
    pub fn spawn(
        config: &PipelineConfig,
        mut make_analyzer: impl FnMut() -> Result<Analyzer, PoseError>,
    ) -> Result<(Self, DisplayQueue), PipelineError> {
        let (job_tx, job_rx) = mpsc::channel::<Job>(config.dispatch_capacity());
        let (done_tx, done_rx) = mpsc::channel::<Completion>(config.completed_capacity());

        // Workers pull jobs from the shared receiver one at a time; the lock
        // is held only while waiting for the next job, never during analysis.
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut workers = Vec::with_capacity(config.workers());
        for worker_id in 0..config.workers() {
            let analyzer = make_analyzer()?;
            let rx = job_rx.clone();
            let tx = done_tx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("analysis-{worker_id}"))
                .spawn(move || worker_loop(rx, tx, analyzer))
                .map_err(PipelineError::Thread)?;
            workers.push(handle);
        }

        Ok((
            Self {
                tx: job_tx,
                workers,
                next_seq: 0,
            },
            DisplayQueue::new(done_rx),
        ))
    }

    /// Hand one accepted frame to the worker pool.
    ///
    /// Blocks while the dispatch queue is full. Returns
    /// `PipelineError::Closed` if every worker has exited.
    pub async fn dispatch(&mut self, frame: RgbFrame) -> Result<(), PipelineError> {
        // Reserve the queue slot before consuming a sequence number, so a
        // dispatch cancelled while waiting leaves no hole in the ordering.
        let permit = self
            .tx
            .reserve()
            .await
            .map_err(|_| PipelineError::Closed)?;

        let seq = self.next_seq;
        self.next_seq += 1;
        permit.send(Job { seq, frame });

        Ok(())
    }

    /// Number of frames dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.next_seq
    }

    /// Close the dispatch queue and join every worker thread.
    ///
    /// In-flight analyses run to completion; nothing is leaked.
    pub fn shutdown(self) {
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    tx: mpsc::Sender<Completion>,
    mut analyzer: Analyzer,
) {
    loop {
        let job = {
            let mut rx = rx.lock().unwrap_or_else(|e| e.into_inner());
            rx.blocking_recv()
        };
        let Some(job) = job else {
            // Dispatcher dropped the sender: shutdown
            break;
        };

        // An analysis failure drops the frame; the sequence number is still
        // reported so ordering can advance past the hole.
        let result = match analyzer.analyze(job.frame) {
            Ok(analyzed) => Some(analyzed),
            Err(e) => {
                log::warn!("analysis failed for frame {}: {}", job.seq, e);
                None
            }
        };

        if tx
            .blocking_send(Completion {
                seq: job.seq,
                result,
            })
            .is_err()
        {
            // Display queue dropped: nobody is watching, stop working
            break;
        }
    }
}
