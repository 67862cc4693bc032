//! The display queue: ordered hand-off of completed analyses.
//!
//! Workers finish out of dispatch order, so completions are buffered and
//! released strictly by sequence number. A frame that produced no result
//! (analysis error) still completes with its sequence number, which lets the
//! cursor advance past the hole instead of stalling the queue.

use std::collections::BTreeMap;
use supine_pose::AnalyzedFrame;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

pub(crate) struct Completion {
    pub seq: u64,
    pub result: Option<AnalyzedFrame>,
}

pub struct DisplayQueue {
    rx: mpsc::Receiver<Completion>,
    pending: BTreeMap<u64, Option<AnalyzedFrame>>,
    next_seq: u64,
    closed: bool,
}

impl DisplayQueue {
    pub(crate) fn new(rx: mpsc::Receiver<Completion>) -> Self {
        Self {
            rx,
            pending: BTreeMap::new(),
            next_seq: 0,
            closed: false,
        }
    }

    /// Pop the oldest completed result, if it is ready.
    ///
    /// Non-blocking: the presentation loop calls this once per receive
    /// iteration and keeps showing the previous frame on `None`. Results are
    /// released in dispatch order regardless of completion order.
    pub fn try_pop(&mut self) -> Option<AnalyzedFrame> {
        self.drain();
        self.release_next()
    }

    /// Await the next in-order result.
    ///
    /// Returns `None` once the pipeline has shut down and everything
    /// releasable has been drained.
    pub async fn pop(&mut self) -> Option<AnalyzedFrame> {
        loop {
            if let Some(frame) = self.release_next() {
                return Some(frame);
            }
            match self.rx.recv().await {
                Some(completion) => {
                    self.pending.insert(completion.seq, completion.result);
                }
                None => {
                    self.closed = true;
                    return self.release_next();
                }
            }
        }
    }

    /// Stop accepting completions.
    ///
    /// Workers blocked handing over a result fail their send and exit, so
    /// `close()` must run before the pool is joined during teardown.
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// True once the pipeline has shut down and no result remains.
    pub fn is_finished(&mut self) -> bool {
        self.drain();
        self.closed && self.pending.values().all(|result| result.is_none())
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(completion) => {
                    self.pending.insert(completion.seq, completion.result);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
    }

    fn release_next(&mut self) -> Option<AnalyzedFrame> {
        while let Some(result) = self.pending.remove(&self.next_seq) {
            self.next_seq += 1;
            if let Some(frame) = result {
                return Some(frame);
            }
        }
        None
    }
}
