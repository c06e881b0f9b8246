//! Deferred work for the trigger router.
//!
//! Delayed triggers are fire-and-forget: once scheduled they always run, and
//! nothing cancels them.

use std::sync::Mutex;
use std::time::Duration;

/// A unit of deferred work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs a job once after a delay without blocking the caller.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, job: Job);
}

/// Scheduler backed by a tokio runtime (`tokio::time::sleep` on a spawned task).
///
/// Under a paused test runtime the delay follows tokio's virtual clock.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on, if any.
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, job: Job) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            job();
        });
    }
}

/// Scheduler driven by explicit time advancement.
///
/// Jobs run on the thread that calls [`ManualScheduler::advance`], in due order.
#[derive(Default)]
pub struct ManualScheduler {
    inner: Mutex<ManualQueue>,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    /// (due, sequence, job); sequence keeps equal-due jobs in schedule order
    jobs: Vec<(Duration, u64, Job)>,
    next_seq: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting to run
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).jobs.len()
    }

    /// Move time forward and run every job that has come due. Returns how many ran.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            queue.now += by;
            let now = queue.now;

            let mut due = Vec::new();
            let mut i = 0;
            while i < queue.jobs.len() {
                if queue.jobs[i].0 <= now {
                    due.push(queue.jobs.swap_remove(i));
                } else {
                    i += 1;
                }
            }
            due.sort_by_key(|(at, seq, _)| (*at, *seq));
            due
        };

        // Run outside the lock so jobs may schedule more work
        let count = due.len();
        for (_, _, job) in due {
            job();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, job: Job) {
        let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let due = queue.now + delay;
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue.jobs.push((due, seq, job));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn manual_scheduler_runs_jobs_when_due() {
        let scheduler = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        scheduler.schedule(
            Duration::from_millis(1000),
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(999)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn manual_scheduler_keeps_order() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for (i, ms) in [(0, 500u64), (1, 100), (2, 100)] {
            let order = Arc::clone(&order);
            scheduler.schedule(
                Duration::from_millis(ms),
                Box::new(move || order.lock().unwrap().push(i)),
            );
        }
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_follows_virtual_time() {
        let scheduler = TokioScheduler::current().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        scheduler.schedule(
            Duration::from_millis(1000),
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
