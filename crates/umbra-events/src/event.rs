use std::any::Any;
use std::fmt;
use std::sync::Arc;

use umbra_core::{ShadowNodeFamily, StateData};

/// Priority class of a dispatched event or state update.
///
/// The numeric values are part of the scripting-bridge contract; hosts pass
/// the raw discriminant across the boundary.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventPriority {
    SynchronousUnbatched = 0,
    SynchronousBatched = 1,
    AsynchronousUnbatched = 2,
    AsynchronousBatched = 3,
}

impl EventPriority {
    pub const COUNT: usize = 4;

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn is_synchronous(self) -> bool {
        matches!(
            self,
            Self::SynchronousUnbatched | Self::SynchronousBatched
        )
    }

    pub fn is_batched(self) -> bool {
        matches!(
            self,
            Self::SynchronousBatched | Self::AsynchronousBatched
        )
    }
}

/// Pointer position in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

pub type PointerId = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Input device class behind a pointer. Touch pointers leave the surface
/// entirely when released; mice and pens keep hovering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDeviceKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerEventKind,
    pub device: PointerDeviceKind,
    pub position: Point,
    pub is_primary: bool,
}

impl PointerEvent {
    /// Whether releasing this pointer means it has left the interactive
    /// surface (there is no hover position to return to).
    pub fn leaves_surface_on_release(&self) -> bool {
        matches!(self.device, PointerDeviceKind::Touch)
    }
}

/// Discriminated event payload. The core never inspects `Generic` payloads;
/// they travel to the dispatch sink untouched.
#[derive(Clone)]
pub enum EventPayload {
    Pointer(PointerEvent),
    Generic(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventPayload::Pointer(event) => f.debug_tuple("Pointer").field(event).finish(),
            EventPayload::Generic(_) => f.write_str("Generic(..)"),
        }
    }
}

/// A raw UI event created at input-origin time. Enqueued into exactly one
/// priority queue and delivered at most once.
#[derive(Clone)]
pub struct RawEvent {
    /// Event name as the application layer sees it ("pointermove", ...).
    pub name: String,
    /// Family of the element the event targets; `None` for surface-level
    /// events with no element target.
    pub target: Option<Arc<ShadowNodeFamily>>,
    pub payload: EventPayload,
}

impl RawEvent {
    pub fn new(
        name: impl Into<String>,
        target: Option<Arc<ShadowNodeFamily>>,
        payload: EventPayload,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            payload,
        }
    }
}

impl fmt::Debug for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawEvent")
            .field("name", &self.name)
            .field("target", &self.target.as_ref().map(|family| family.tag()))
            .finish()
    }
}

/// A pending tree-state mutation routed through the event queues so it lands
/// in the same reconciliation cycle as the events around it.
#[derive(Clone)]
pub struct StateUpdate {
    pub family: Arc<ShadowNodeFamily>,
    pub data: Arc<dyn StateData>,
}

impl fmt::Debug for StateUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateUpdate")
            .field("family", &self.family.tag())
            .finish()
    }
}

/// Delivery sink for drained events.
pub type EventPipe = Arc<dyn Fn(RawEvent) + Send + Sync>;

/// Delivery sink for drained state updates.
pub type StatePipe = Arc<dyn Fn(StateUpdate) + Send + Sync>;
