use std::sync::Arc;

use crate::beat::EventBeatFactory;
use crate::event::{EventPipe, EventPriority, RawEvent, StatePipe, StateUpdate};
use crate::queue::{EventQueue, QueuePolicy};

/// Dispatch-boundary policy knobs.
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatcherOptions {
    /// Forces every dispatch onto the asynchronous-batched queue regardless
    /// of the requested priority. A deliberate downgrade for hosts that
    /// cannot deliver synchronously; applied here, never by callers, and
    /// never reported as an error.
    pub force_asynchronous_batched: bool,
}

/// Routes raw events and state updates into four priority queues.
///
/// The queues are constructed once at startup, each bound to a beat from the
/// matching factory. Within one queue delivery is FIFO; across queues there
/// is no ordering guarantee. Synchronous queues are expected to drain before
/// the next input cycle; asynchronous queues drain on the host's schedule.
pub struct EventDispatcher {
    queues: [Arc<EventQueue>; EventPriority::COUNT],
    options: DispatcherOptions,
}

impl EventDispatcher {
    pub fn new(
        event_pipe: EventPipe,
        state_pipe: StatePipe,
        synchronous_beat_factory: EventBeatFactory,
        asynchronous_beat_factory: EventBeatFactory,
        options: DispatcherOptions,
    ) -> Self {
        let queues = [
            // SynchronousUnbatched
            EventQueue::new(
                QueuePolicy::Unbatched,
                event_pipe.clone(),
                state_pipe.clone(),
                &synchronous_beat_factory,
            ),
            // SynchronousBatched
            EventQueue::new(
                QueuePolicy::Batched,
                event_pipe.clone(),
                state_pipe.clone(),
                &synchronous_beat_factory,
            ),
            // AsynchronousUnbatched
            EventQueue::new(
                QueuePolicy::Unbatched,
                event_pipe.clone(),
                state_pipe.clone(),
                &asynchronous_beat_factory,
            ),
            // AsynchronousBatched
            EventQueue::new(
                QueuePolicy::Batched,
                event_pipe,
                state_pipe,
                &asynchronous_beat_factory,
            ),
        ];
        Self { queues, options }
    }

    pub fn dispatch_event(&self, event: RawEvent, priority: EventPriority) {
        self.queue_for(priority).enqueue_event(event);
    }

    /// Coalescing dispatch for events where only the latest sample matters;
    /// always routed through the asynchronous-batched queue.
    pub fn dispatch_unique_event(&self, event: RawEvent) {
        self.queues[EventPriority::AsynchronousBatched.index()].enqueue_unique_event(event);
    }

    pub fn dispatch_state_update(&self, update: StateUpdate, priority: EventPriority) {
        self.queue_for(priority).enqueue_state_update(update);
    }

    /// The queue a given priority resolves to after policy overrides.
    pub fn queue_for(&self, priority: EventPriority) -> &Arc<EventQueue> {
        let effective = if self.options.force_asynchronous_batched {
            EventPriority::AsynchronousBatched
        } else {
            priority
        };
        &self.queues[effective.index()]
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
