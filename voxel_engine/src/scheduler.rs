//! Adaptive coalescing scheduler for interactive preview requests.
//! Spec.md §4.8.
//!
//! The teacher crate has no equivalent (it renders synchronously to a
//! CLI bitmap), so this module is grounded on the general
//! worker-thread-plus-channel shape `rerun-io-rerun` uses for its
//! background ingestion pipeline: an explicit message-passing worker
//! rather than a shared `Lazy<Mutex<..>>` global, so the scheduler's
//! state has exactly one owner and is trivially testable in isolation
//! from the thread that runs it.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Where a render request originated. `Immediate` and `Manual` requests
/// bypass the adaptive throttle entirely — they represent a single
/// deliberate action (a resize, an explicit "render now"), not a
/// continuous stream that needs coalescing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestSource {
    Interactive,
    Immediate,
    Manual,
}

impl RequestSource {
    pub fn bypasses_throttle(self) -> bool {
        matches!(self, RequestSource::Immediate | RequestSource::Manual)
    }
}

/// A pending request with its assigned sequence number.
#[derive(Clone, Copy, Debug)]
pub struct RequestKey<T> {
    pub seq: u64,
    pub source: RequestSource,
    pub payload: T,
}

/// Pure scheduling/throttle logic: holds a single coalesced pending
/// slot (the latest submission always wins) and a bounded ring buffer
/// of recent render latencies used to size the throttle interval.
pub struct PreviewScheduler<T> {
    latencies: VecDeque<Duration>,
    latency_window: usize,
    min_interval: Duration,
    max_interval: Duration,
    pending: Option<RequestKey<T>>,
    next_seq: u64,
    last_dispatch_at: Option<Instant>,
}

impl<T> PreviewScheduler<T> {
    pub fn new(min_ms: u64, max_ms: u64, latency_window: usize) -> Self {
        PreviewScheduler {
            latencies: VecDeque::with_capacity(latency_window.max(1)),
            latency_window: latency_window.max(1),
            min_interval: Duration::from_millis(min_ms),
            max_interval: Duration::from_millis(max_ms.max(min_ms)),
            pending: None,
            next_seq: 0,
            last_dispatch_at: None,
        }
    }

    /// Assigns a new sequence number and replaces any currently-pending
    /// request — coalescing is "latest always wins", a request with an
    /// identical key is simply the trivial case of this general rule.
    pub fn enqueue(&mut self, source: RequestSource, payload: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending = Some(RequestKey { seq, source, payload });
        seq
    }

    pub fn record_latency(&mut self, latency: Duration) {
        if self.latencies.len() >= self.latency_window {
            self.latencies.pop_front();
        }
        self.latencies.push_back(latency);
    }

    /// The 75th percentile of recently observed render latencies, or
    /// `None` if no samples have been recorded yet.
    pub fn percentile_75(&self) -> Option<Duration> {
        if self.latencies.is_empty() {
            return None;
        }
        let mut sorted: Vec<Duration> = self.latencies.iter().copied().collect();
        sorted.sort();
        let idx = ((sorted.len() - 1) * 75) / 100;
        Some(sorted[idx])
    }

    /// The current adaptive throttle interval: the observed p75
    /// latency, clamped to `[min, max]`. Before any sample exists, this
    /// is the minimum interval (optimistic until latency is observed).
    pub fn throttle_interval(&self) -> Duration {
        match self.percentile_75() {
            Some(p75) => p75.clamp(self.min_interval, self.max_interval),
            None => self.min_interval,
        }
    }

    /// Takes the pending request if it is eligible to dispatch `now`:
    /// throttle-bypassing sources dispatch immediately; others must
    /// wait at least `throttle_interval()` since the last dispatch.
    pub fn try_dispatch(&mut self, now: Instant) -> Option<RequestKey<T>> {
        let req = self.pending.as_ref()?;
        let eligible = req.source.bypasses_throttle()
            || match self.last_dispatch_at {
                None => true,
                Some(last) => now.duration_since(last) >= self.throttle_interval(),
            };
        if !eligible {
            return None;
        }
        self.last_dispatch_at = Some(now);
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Monotonic stale-result filter: accepts only results whose sequence
/// number is the newest seen so far, rejecting late-arriving results
/// for requests that have since been superseded.
#[derive(Default)]
pub struct DeliveryGate {
    highest_accepted: Option<u64>,
}

impl DeliveryGate {
    pub fn accept(&mut self, seq: u64) -> bool {
        let fresh = self.highest_accepted.map_or(true, |h| seq > h);
        if fresh {
            self.highest_accepted = Some(seq);
        }
        fresh
    }
}

pub struct SchedulerResult<R> {
    pub seq: u64,
    pub payload: R,
}

enum WorkerMessage<T> {
    Submit { source: RequestSource, payload: T },
    Shutdown,
}

/// A running scheduler worker thread: owns a `PreviewScheduler`,
/// repeatedly polling for new submissions and dispatching the pending
/// request once it clears the adaptive throttle.
pub struct SchedulerHandle<T, R> {
    request_tx: Sender<WorkerMessage<T>>,
    result_rx: Receiver<SchedulerResult<R>>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl<T, R> SchedulerHandle<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    pub fn spawn<F>(min_ms: u64, max_ms: u64, latency_window: usize, render: F) -> Self
    where
        F: Fn(T) -> R + Send + 'static,
    {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<WorkerMessage<T>>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<SchedulerResult<R>>();

        let join_handle = thread::spawn(move || {
            let mut scheduler = PreviewScheduler::new(min_ms, max_ms, latency_window);
            loop {
                let poll = scheduler.throttle_interval().min(Duration::from_millis(20)).max(Duration::from_millis(1));
                match request_rx.recv_timeout(poll) {
                    Ok(WorkerMessage::Submit { source, payload }) => {
                        scheduler.enqueue(source, payload);
                    }
                    Ok(WorkerMessage::Shutdown) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }

                if let Some(req) = scheduler.try_dispatch(Instant::now()) {
                    let start = Instant::now();
                    let output = render(req.payload);
                    scheduler.record_latency(start.elapsed());
                    if result_tx.send(SchedulerResult { seq: req.seq, payload: output }).is_err() {
                        break;
                    }
                }
            }
        });

        SchedulerHandle { request_tx, result_rx, join_handle: Some(join_handle) }
    }

    pub fn submit(&self, source: RequestSource, payload: T) {
        let _ = self.request_tx.send(WorkerMessage::Submit { source, payload });
    }

    pub fn try_recv(&self) -> Option<SchedulerResult<R>> {
        self.result_rx.try_recv().ok()
    }

    pub fn recv_blocking(&self) -> Option<SchedulerResult<R>> {
        self.result_rx.recv().ok()
    }
}

impl<T, R> Drop for SchedulerHandle<T, R> {
    fn drop(&mut self) {
        let _ = self.request_tx.send(WorkerMessage::Shutdown);
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_requests_bypass_the_throttle() {
        let mut s: PreviewScheduler<()> = PreviewScheduler::new(50, 500, 8);
        s.record_latency(Duration::from_millis(400));
        let t0 = Instant::now();
        s.enqueue(RequestSource::Interactive, ());
        assert!(s.try_dispatch(t0).is_some());

        s.enqueue(RequestSource::Immediate, ());
        assert!(s.try_dispatch(t0).is_some());
    }

    #[test]
    fn interactive_requests_wait_out_the_throttle_interval() {
        let mut s: PreviewScheduler<()> = PreviewScheduler::new(50, 500, 8);
        for _ in 0..4 {
            s.record_latency(Duration::from_millis(200));
        }
        let interval = s.throttle_interval();
        assert_eq!(interval, Duration::from_millis(200));

        let t0 = Instant::now();
        s.enqueue(RequestSource::Interactive, ());
        assert!(s.try_dispatch(t0).is_some());

        s.enqueue(RequestSource::Interactive, ());
        assert!(s.try_dispatch(t0 + Duration::from_millis(50)).is_none());
        assert!(s.try_dispatch(t0 + interval + Duration::from_millis(1)).is_some());
    }

    #[test]
    fn throttle_interval_is_clamped_to_bounds() {
        let mut s: PreviewScheduler<()> = PreviewScheduler::new(50, 300, 4);
        s.record_latency(Duration::from_millis(10));
        assert_eq!(s.throttle_interval(), Duration::from_millis(50));
        s.record_latency(Duration::from_millis(10000));
        s.record_latency(Duration::from_millis(10000));
        s.record_latency(Duration::from_millis(10000));
        assert_eq!(s.throttle_interval(), Duration::from_millis(300));
    }

    #[test]
    fn new_submission_coalesces_and_replaces_the_pending_one() {
        let mut s: PreviewScheduler<i32> = PreviewScheduler::new(50, 500, 8);
        s.enqueue(RequestSource::Interactive, 1);
        s.enqueue(RequestSource::Interactive, 2);
        let dispatched = s.try_dispatch(Instant::now()).unwrap();
        assert_eq!(dispatched.payload, 2);
        assert!(!s.has_pending());
    }

    #[test]
    fn delivery_gate_rejects_stale_sequence_numbers() {
        let mut gate = DeliveryGate::default();
        assert!(gate.accept(3));
        assert!(gate.accept(5));
        assert!(!gate.accept(4));
        assert!(gate.accept(6));
    }
}
