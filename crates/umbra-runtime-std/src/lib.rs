//! Standard event beats backed by Rust's `std` library.
//!
//! This crate provides concrete implementations of the beat abstraction
//! defined in `umbra-events`. Hosts that drive their own loop construct a
//! [`ManualEventBeat`] per queue and call [`ManualEventBeat::beat`] at the
//! point in their frame where that queue should drain; single-threaded hosts
//! and tests can use [`ImmediateEventBeat`] to drain on every dispatch.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use umbra_events::{BeatCallback, EventBeat, EventBeatFactory};

/// Beat driven by the owner's loop.
///
/// `request` arms the beat and invokes the registered waker (if any) so a
/// parked host loop can wake up; the actual drain happens when the owner
/// calls [`ManualEventBeat::beat`], or immediately through `induce` for
/// synchronous queues.
pub struct ManualEventBeat {
    callback: BeatCallback,
    requested: AtomicBool,
    waker: RwLock<Option<Arc<dyn Fn() + Send + Sync + 'static>>>,
}

impl ManualEventBeat {
    pub fn new(callback: BeatCallback) -> Self {
        Self {
            callback,
            requested: AtomicBool::new(false),
            waker: RwLock::new(None),
        }
    }

    /// Returns whether a flush has been requested since the last beat.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Registers a waker invoked whenever a flush is requested.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.write().unwrap() = Some(Arc::new(waker));
    }

    /// Clears any registered waker.
    pub fn clear_waker(&self) {
        *self.waker.write().unwrap() = None;
    }

    /// Drains the owning queue if a flush is pending. Call once per host
    /// cycle.
    pub fn beat(&self) {
        if self.requested.swap(false, Ordering::SeqCst) {
            (self.callback)();
        }
    }

    fn wake(&self) {
        let waker = self.waker.read().unwrap().clone();
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl EventBeat for ManualEventBeat {
    fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.wake();
    }

    fn induce(&self) {
        self.beat();
    }
}

impl fmt::Debug for ManualEventBeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualEventBeat")
            .field("requested", &self.requested.load(Ordering::SeqCst))
            .finish()
    }
}

/// Beat that drains on every request. For tests and single-threaded hosts
/// where dispatch and delivery share one thread.
pub struct ImmediateEventBeat {
    callback: BeatCallback,
}

impl ImmediateEventBeat {
    pub fn new(callback: BeatCallback) -> Self {
        Self { callback }
    }
}

impl EventBeat for ImmediateEventBeat {
    fn request(&self) {
        (self.callback)();
    }

    fn induce(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for ImmediateEventBeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ImmediateEventBeat")
    }
}

/// Factory producing [`ManualEventBeat`]s and collecting them into `sink` in
/// construction order, so the host can drive each queue's beat itself.
pub fn manual_beat_factory(sink: Arc<RwLock<Vec<Arc<ManualEventBeat>>>>) -> EventBeatFactory {
    Box::new(move |callback| {
        let beat = Arc::new(ManualEventBeat::new(callback));
        sink.write().unwrap().push(beat.clone());
        beat
    })
}

/// Factory producing [`ImmediateEventBeat`]s.
pub fn immediate_beat_factory() -> EventBeatFactory {
    Box::new(|callback| Arc::new(ImmediateEventBeat::new(callback)))
}

/// Monotonic clock used by telemetry-driven hosts.
#[derive(Debug, Default, Clone)]
pub struct StdClock;

impl StdClock {
    pub fn now(&self) -> Instant {
        Instant::now()
    }

    pub fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed()
    }

    pub fn elapsed_millis(&self, since: Instant) -> u64 {
        since.elapsed().as_millis() as u64
    }
}
