use std::sync::Arc;

/// Host-supplied scheduling primitive that triggers queue drains.
///
/// A queue requests a beat whenever it has work; the host fires the bound
/// callback on its own schedule. The core never blocks here; a beat either
/// delivers inline or defers, the host's choice.
pub trait EventBeat: Send + Sync {
    /// Ask the host to schedule a flush of the owning queue.
    fn request(&self);

    /// Flush immediately if a flush has been requested. Synchronous queues
    /// call this to drain before the next input cycle; beats whose host
    /// cannot deliver inline leave it a no-op.
    fn induce(&self) {}
}

/// Callback a beat fires to drain its owning queue.
pub type BeatCallback = Arc<dyn Fn() + Send + Sync>;

/// Builds one beat per queue, binding that queue's flush callback.
pub type EventBeatFactory = Box<dyn Fn(BeatCallback) -> Arc<dyn EventBeat> + Send + Sync>;
