use std::sync::{Arc, Mutex, Weak};

use crate::beat::{EventBeat, EventBeatFactory};
use crate::event::{EventPipe, RawEvent, StatePipe, StateUpdate};

/// Batching policy of one queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QueuePolicy {
    /// Every enqueued item is delivered independently.
    Unbatched,
    /// Consecutive state updates targeting the same family coalesce; the
    /// newest payload wins and keeps the original queue position.
    Batched,
}

#[derive(Default)]
struct Buffers {
    events: Vec<RawEvent>,
    state_updates: Vec<StateUpdate>,
}

/// One FIFO delivery queue bound to a host beat.
///
/// Enqueues are cheap and lock only the buffers; delivery happens on the
/// beat, outside the buffer lock, so a pipe callback may safely enqueue more
/// work (it lands in the next beat).
pub struct EventQueue {
    policy: QueuePolicy,
    event_pipe: EventPipe,
    state_pipe: StatePipe,
    buffers: Mutex<Buffers>,
    beat: Arc<dyn EventBeat>,
}

impl EventQueue {
    pub(crate) fn new(
        policy: QueuePolicy,
        event_pipe: EventPipe,
        state_pipe: StatePipe,
        beat_factory: &EventBeatFactory,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let flush_target = weak.clone();
            let beat = beat_factory(Arc::new(move || {
                if let Some(queue) = flush_target.upgrade() {
                    queue.on_beat();
                }
            }));
            Self {
                policy,
                event_pipe,
                state_pipe,
                buffers: Mutex::new(Buffers::default()),
                beat,
            }
        })
    }

    pub fn enqueue_event(&self, event: RawEvent) {
        self.buffers.lock().unwrap().events.push(event);
        self.beat.request();
    }

    /// Replaces a previously enqueued event with the same name and target;
    /// appends otherwise. Used for scroll-style events where only the latest
    /// sample matters.
    pub fn enqueue_unique_event(&self, event: RawEvent) {
        {
            let mut buffers = self.buffers.lock().unwrap();
            let existing = buffers.events.iter_mut().find(|queued| {
                queued.name == event.name
                    && match (&queued.target, &event.target) {
                        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                        (None, None) => true,
                        _ => false,
                    }
            });
            match existing {
                Some(slot) => *slot = event,
                None => buffers.events.push(event),
            }
        }
        self.beat.request();
    }

    pub fn enqueue_state_update(&self, update: StateUpdate) {
        {
            let mut buffers = self.buffers.lock().unwrap();
            if self.policy == QueuePolicy::Batched {
                if let Some(last) = buffers.state_updates.last_mut() {
                    if Arc::ptr_eq(&last.family, &update.family) {
                        *last = update;
                        drop(buffers);
                        self.beat.request();
                        return;
                    }
                }
            }
            buffers.state_updates.push(update);
        }
        self.beat.request();
    }

    /// Drains both buffers in FIFO order: state updates first so the tree
    /// reconciles before the events that depend on it are delivered. Called
    /// by the beat.
    pub fn on_beat(&self) {
        let (events, state_updates) = {
            let mut buffers = self.buffers.lock().unwrap();
            (
                std::mem::take(&mut buffers.events),
                std::mem::take(&mut buffers.state_updates),
            )
        };
        if events.is_empty() && state_updates.is_empty() {
            return;
        }
        log::trace!(
            "queue flush: {} state updates, {} events",
            state_updates.len(),
            events.len()
        );
        for update in state_updates {
            (self.state_pipe)(update);
        }
        for event in events {
            (self.event_pipe)(event);
        }
    }

    /// Forwards to the bound beat; synchronous callers drain through here.
    pub fn induce_beat(&self) {
        self.beat.induce();
    }
}

#[cfg(test)]
#[path = "tests/queue_tests.rs"]
mod tests;
