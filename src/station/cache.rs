// src/station/cache.rs

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::ReadingSnapshot;

/// Longest single sleep of the refresh thread, so `stop` is noticed promptly.
const STOP_POLL: Duration = Duration::from_millis(50);

/// Latest published snapshot, shared between the refresh thread and readers.
///
/// Snapshots are swapped whole; a reader never sees a half-updated one.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    current: Arc<Mutex<Arc<ReadingSnapshot>>>,
}

impl SnapshotCache {
    /// A cache holding the "first fetch pending" placeholder.
    pub fn new() -> Self {
        SnapshotCache { current: Arc::new(Mutex::new(Arc::new(ReadingSnapshot::pending()))) }
    }

    pub fn publish(&self, snapshot: ReadingSnapshot) {
        let next = Arc::new(snapshot);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn latest(&self) -> Arc<ReadingSnapshot> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the background refresh thread.
#[derive(Debug)]
pub struct RefreshHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Asks the thread to finish after its current fetch and waits for it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Refresh thread panicked");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Starts a thread that calls `source` serially and publishes each result,
/// pausing `interval` between fetches.
pub fn spawn_refresh<F>(
    mut source: F,
    cache: SnapshotCache,
    interval: Duration,
) -> io::Result<RefreshHandle>
where
    F: FnMut() -> ReadingSnapshot + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name("vantage-refresh".into())
        .spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                info!("Fetching new weather data...");
                cache.publish(source());
                debug!("Cache updated, sleeping for {:?}", interval);
                sleep_unless_stopped(&thread_stop, interval);
            }
        })?;

    Ok(RefreshHandle { stop, thread: Some(thread) })
}

fn sleep_unless_stopped(stop: &AtomicBool, interval: Duration) {
    let deadline = Instant::now() + interval;
    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(STOP_POLL));
    }
}
