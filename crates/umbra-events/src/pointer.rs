use std::sync::{Arc, Mutex, Weak};

use indexmap::IndexMap;
use umbra_core::collections::map::HashMap;
use umbra_core::{ShadowNode, ShadowNodeFamily, SharedShadowNode};

use crate::event::{EventPriority, PointerEvent, PointerEventKind, PointerId};
use crate::hover::PointerHoverTracker;

/// Read-only view of the committed tree, implemented by the tree owner. The
/// pointer pipeline resolves targets against the newest committed revision,
/// never against the revision a stale hit-test captured.
pub trait TreeNavigator: Send + Sync {
    /// Newest committed node for `family`; `None` once the element left the
    /// tree.
    fn newest_node_for_family(&self, family: &ShadowNodeFamily) -> Option<SharedShadowNode>;

    /// Root→node chain for a committed node, inclusive; empty when the node
    /// is no longer reachable.
    fn ancestor_chain(&self, node: &SharedShadowNode) -> Vec<SharedShadowNode>;
}

/// Sink for resolved pointer dispatches: target, event name, priority, and
/// payload, all passed through unchanged from the intercept call.
pub type PointerDispatch<'a> =
    &'a mut dyn FnMut(&SharedShadowNode, &'static str, EventPriority, &PointerEvent);

/// Per-pointer record kept from the first event of a pointer until its
/// release or cancellation.
#[derive(Clone, Copy, Debug)]
pub struct ActivePointer {
    pub event: PointerEvent,
    /// When set, releasing the pointer is treated as the pointer leaving the
    /// surface entirely.
    pub should_leave_when_released: bool,
}

#[derive(Default)]
struct ProcessorState {
    active_pointers: IndexMap<PointerId, ActivePointer>,
    /// Externally requested capture target, before it takes effect.
    pending_captures: HashMap<PointerId, Weak<ShadowNode>>,
    /// Capture target currently in force.
    active_captures: HashMap<PointerId, Weak<ShadowNode>>,
    hover_trackers: HashMap<PointerId, PointerHoverTracker>,
}

/// Per-pointer state machine: capture overrides, hover bookkeeping, and
/// target resolution for every incoming pointer event.
///
/// All dispatch work is queued while the registries are locked and delivered
/// after the lock is released, so a dispatch callback may reenter the
/// processor. Capture requests made mid-dispatch land in the pending registry
/// and take effect only at the end of the current event, never mid-cycle.
#[derive(Default)]
pub struct PointerEventsProcessor {
    state: Mutex<ProcessorState>,
}

fn event_name(kind: PointerEventKind) -> &'static str {
    match kind {
        PointerEventKind::Down => "pointerdown",
        PointerEventKind::Move => "pointermove",
        PointerEventKind::Up => "pointerup",
        PointerEventKind::Cancel => "pointercancel",
    }
}

impl PointerEventsProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes one raw pointer event: resolves the effective target, updates
    /// the active-pointer record, emits hover transitions, delivers the
    /// event, and promotes pending capture overrides at the cycle boundary.
    ///
    /// `hit_target` may be `None` (pointer over empty space); that is a valid
    /// outcome producing only leave transitions.
    pub fn intercept(
        &self,
        event: PointerEvent,
        hit_target: Option<SharedShadowNode>,
        priority: EventPriority,
        navigator: &dyn TreeNavigator,
        dispatch: PointerDispatch<'_>,
    ) {
        let mut plan: Vec<(SharedShadowNode, &'static str)> = Vec::new();

        {
            let mut state = self.state.lock().unwrap();

            // An active capture override wins over the hit-test result. A
            // dead override target clears itself.
            let mut target = hit_target.clone();
            if let Some(weak) = state.active_captures.get(&event.pointer_id).cloned() {
                match weak.upgrade() {
                    Some(captured) => target = Some(captured),
                    None => {
                        state.active_captures.remove(&event.pointer_id);
                    }
                }
            }

            match state.active_pointers.entry(event.pointer_id) {
                indexmap::map::Entry::Occupied(mut entry) => {
                    let active = entry.get_mut();
                    active.event = event;
                    active.should_leave_when_released =
                        event.leaves_surface_on_release() || hit_target.is_none();
                }
                indexmap::map::Entry::Vacant(entry) => {
                    entry.insert(ActivePointer {
                        event,
                        should_leave_when_released: event.leaves_surface_on_release(),
                    });
                }
            }

            // Hover transitions against the newest committed chain of the
            // effective target.
            let next_chain = match &target {
                Some(node) => {
                    let newest = navigator
                        .newest_node_for_family(node.family())
                        .unwrap_or_else(|| Arc::clone(node));
                    navigator.ancestor_chain(&newest)
                }
                None => Vec::new(),
            };
            let tracker = state
                .hover_trackers
                .entry(event.pointer_id)
                .or_insert_with(PointerHoverTracker::new);
            let transition = tracker.transition(next_chain);
            for node in transition.leaves {
                plan.push((node, "pointerleave"));
            }
            for node in transition.enters {
                plan.push((node, "pointerenter"));
            }

            if let Some(target) = target {
                plan.push((target, event_name(event.kind)));
            }

            if matches!(event.kind, PointerEventKind::Up | PointerEventKind::Cancel) {
                let released = state.active_pointers.shift_remove(&event.pointer_id);
                if released.is_some_and(|active| active.should_leave_when_released) {
                    if let Some(tracker) = state.hover_trackers.get_mut(&event.pointer_id) {
                        let transition = tracker.transition(Vec::new());
                        for node in transition.leaves {
                            plan.push((node, "pointerleave"));
                        }
                    }
                    state.hover_trackers.remove(&event.pointer_id);
                }
                state.active_captures.remove(&event.pointer_id);
                state.pending_captures.remove(&event.pointer_id);
            }
        }

        for (node, name) in plan {
            dispatch(&node, name, priority, &event);
        }

        self.process_pending_captures(&event, priority, dispatch);
    }

    /// Requests exclusive routing of `pointer_id`'s events to `node`. Takes
    /// effect at the end of the current event cycle, not mid-dispatch.
    pub fn set_pointer_capture(&self, pointer_id: PointerId, node: &SharedShadowNode) {
        self.state
            .lock()
            .unwrap()
            .pending_captures
            .insert(pointer_id, Arc::downgrade(node));
    }

    /// Withdraws a capture request targeting `node`. An override already in
    /// force is released at the next event boundary.
    pub fn release_pointer_capture(&self, pointer_id: PointerId, node: &ShadowNode) {
        let mut state = self.state.lock().unwrap();
        let matches_node = state
            .pending_captures
            .get(&pointer_id)
            .and_then(Weak::upgrade)
            .is_some_and(|pending| ShadowNode::family_eq(&pending, node));
        if matches_node {
            state.pending_captures.remove(&pointer_id);
        }
    }

    /// Whether `node` holds (or has requested) the capture for `pointer_id`.
    pub fn has_pointer_capture(&self, pointer_id: PointerId, node: &ShadowNode) -> bool {
        self.state
            .lock()
            .unwrap()
            .pending_captures
            .get(&pointer_id)
            .and_then(Weak::upgrade)
            .is_some_and(|pending| ShadowNode::family_eq(&pending, node))
    }

    /// Snapshot of the active-pointer record, if the pointer is live.
    pub fn active_pointer(&self, pointer_id: PointerId) -> Option<ActivePointer> {
        self.state
            .lock()
            .unwrap()
            .active_pointers
            .get(&pointer_id)
            .copied()
    }

    /// Promotes this pointer's pending override to active. Runs after the
    /// event's own delivery so a capture requested while handling an event
    /// never alters that same event's routing; synthesizes the capture
    /// transition pair on a change of holder.
    fn process_pending_captures(
        &self,
        event: &PointerEvent,
        priority: EventPriority,
        dispatch: PointerDispatch<'_>,
    ) {
        let mut plan: Vec<(SharedShadowNode, &'static str)> = Vec::new();

        {
            let mut state = self.state.lock().unwrap();
            let pending_node = state
                .pending_captures
                .get(&event.pointer_id)
                .and_then(Weak::upgrade);
            let active_node = state
                .active_captures
                .get(&event.pointer_id)
                .and_then(Weak::upgrade);

            let unchanged = match (&pending_node, &active_node) {
                (Some(pending), Some(active)) => Arc::ptr_eq(pending, active),
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                return;
            }

            if let Some(active) = active_node {
                plan.push((active, "lostpointercapture"));
            }
            match pending_node {
                Some(pending) => {
                    plan.push((Arc::clone(&pending), "gotpointercapture"));
                    state
                        .active_captures
                        .insert(event.pointer_id, Arc::downgrade(&pending));
                }
                None => {
                    state.active_captures.remove(&event.pointer_id);
                    state.pending_captures.remove(&event.pointer_id);
                }
            }
        }

        for (node, name) in plan {
            dispatch(&node, name, priority, event);
        }
    }
}

#[cfg(test)]
#[path = "tests/pointer_tests.rs"]
mod tests;
