//! Live-video frame dispatch.
//!
//! Face crops are handed to a fixed pool of worker threads through a bounded
//! queue. When every worker is busy and the queue is full, new frames are
//! dropped rather than queued, so a slow classifier never makes a live
//! stream fall behind.
//!
//! # Lifecycle
//! 1. Create with `new()`; workers start immediately
//! 2. Submit faces with `submit()` and collect outcomes with `try_recv()`
//! 3. Shut down with `shutdown()`; queued frames are finished first

use crate::{classifier::EmotionClassifier, emotion::EmotionResult, face_image::FaceImage, Error, Result};
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct FrameJob {
    frame_id: u64,
    face: FaceImage,
}

/// Classification outcome of one submitted frame
#[derive(Debug)]
pub struct FrameOutcome {
    pub frame_id: u64,
    pub result: Result<EmotionResult>,
}

/// Snapshot of dispatcher counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Frames offered to `submit`
    pub submitted: u64,
    /// Frames rejected because the queue was full
    pub dropped: u64,
    /// Frames a worker has finished classifying
    pub processed: u64,
}

#[derive(Default)]
struct DispatchCounters {
    submitted: AtomicU64,
    dropped: AtomicU64,
    processed: AtomicU64,
}

impl DispatchCounters {
    fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            submitted: self.submitted.load(Ordering::SeqCst),
            dropped: self.dropped.load(Ordering::SeqCst),
            processed: self.processed.load(Ordering::SeqCst),
        }
    }
}

/// Bounded worker pool around a shared classifier
pub struct FrameDispatcher {
    job_tx: Option<SyncSender<FrameJob>>,
    outcome_rx: Receiver<FrameOutcome>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<DispatchCounters>,
    next_frame_id: u64,
}

impl FrameDispatcher {
    /// Start `workers` threads sharing `classifier`
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if `workers` or `queue_capacity` is zero and
    /// `Io` if a thread cannot be spawned
    pub fn new(classifier: Arc<dyn EmotionClassifier>, workers: usize, queue_capacity: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::DispatchError("Worker count must be greater than 0".to_string()));
        }
        if queue_capacity == 0 {
            return Err(Error::DispatchError("Queue capacity must be greater than 0".to_string()));
        }

        let (job_tx, job_rx) = mpsc::sync_channel::<FrameJob>(queue_capacity);
        let (outcome_tx, outcome_rx) = mpsc::channel();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let counters = Arc::new(DispatchCounters::default());

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let outcome_tx = outcome_tx.clone();
            let classifier = Arc::clone(&classifier);
            let counters = Arc::clone(&counters);
            let handle = thread::Builder::new()
                .name(format!("emotion-worker-{index}"))
                .spawn(move || worker_loop(&*classifier, &job_rx, &outcome_tx, &counters))?;
            handles.push(handle);
        }
        debug!("Frame dispatcher started: {workers} workers, queue capacity {queue_capacity}");

        Ok(Self {
            job_tx: Some(job_tx),
            outcome_rx,
            workers: handles,
            counters,
            next_frame_id: 0,
        })
    }

    /// Offer a face to the pool. Returns the frame id, or `None` if the
    /// frame was dropped because the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if the workers have shut down
    pub fn submit(&mut self, face: FaceImage) -> Result<Option<u64>> {
        let job_tx = self
            .job_tx
            .as_ref()
            .ok_or_else(|| Error::DispatchError("Dispatcher is shut down".to_string()))?;

        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;
        self.counters.submitted.fetch_add(1, Ordering::SeqCst);

        match job_tx.try_send(FrameJob { frame_id, face }) {
            Ok(()) => Ok(Some(frame_id)),
            Err(TrySendError::Full(_)) => {
                self.counters.dropped.fetch_add(1, Ordering::SeqCst);
                warn!("Dropping frame {frame_id}: queue full");
                Ok(None)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.counters.submitted.fetch_sub(1, Ordering::SeqCst);
                Err(Error::DispatchError("All workers have stopped".to_string()))
            }
        }
    }

    /// Next finished outcome, if one is ready
    #[must_use]
    pub fn try_recv(&self) -> Option<FrameOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next finished outcome
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FrameOutcome> {
        self.outcome_rx.recv_timeout(timeout).ok()
    }

    /// Get current counters
    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot()
    }

    /// Stop accepting frames, finish the queue and return every outcome not
    /// yet received
    pub fn shutdown(mut self) -> Vec<FrameOutcome> {
        self.close();
        self.outcome_rx.try_iter().collect()
    }

    fn close(&mut self) {
        // Workers exit once the queue is drained and the sender is gone
        self.job_tx = None;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Emotion worker panicked");
            }
        }
    }
}

impl Drop for FrameDispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

fn worker_loop(
    classifier: &dyn EmotionClassifier,
    job_rx: &Mutex<Receiver<FrameJob>>,
    outcome_tx: &mpsc::Sender<FrameOutcome>,
    counters: &DispatchCounters,
) {
    loop {
        let job = match job_rx.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };
        let Ok(job) = job else {
            break;
        };

        let result = classifier.classify(&job.face);
        counters.processed.fetch_add(1, Ordering::SeqCst);
        if outcome_tx
            .send(FrameOutcome {
                frame_id: job.frame_id,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classifier::HeuristicClassifier, config::Config};

    fn classifier() -> Arc<dyn EmotionClassifier> {
        Arc::new(HeuristicClassifier::new(&Config::regional()).unwrap())
    }

    #[test]
    fn test_rejects_empty_pool() {
        assert!(matches!(
            FrameDispatcher::new(classifier(), 0, 4),
            Err(Error::DispatchError(_))
        ));
        assert!(FrameDispatcher::new(classifier(), 2, 0).is_err());
    }

    #[test]
    fn test_processes_submitted_frames() {
        let mut dispatcher = FrameDispatcher::new(classifier(), 2, 16).unwrap();
        let mut accepted = Vec::new();
        for _ in 0..8 {
            if let Some(id) = dispatcher.submit(FaceImage::uniform(48, 48, 128.0)).unwrap() {
                accepted.push(id);
            }
        }

        let outcomes = dispatcher.shutdown();
        let mut ids: Vec<u64> = outcomes.iter().map(|o| o.frame_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, accepted);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[test]
    fn test_per_frame_errors_are_reported() {
        let mut dispatcher = FrameDispatcher::new(classifier(), 1, 4).unwrap();
        dispatcher.submit(FaceImage::uniform(32, 32, 128.0)).unwrap();
        let outcomes = dispatcher.shutdown();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].result, Err(Error::InputShape { .. })));
    }
}
