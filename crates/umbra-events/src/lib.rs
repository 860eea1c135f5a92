//! Priority-classified event dispatch and the pointer pipeline.
//!
//! Raw UI events and pending state updates enter through the
//! [`EventDispatcher`], which routes them into one of four queues by
//! [`EventPriority`]. Each queue drains on a host-supplied [`EventBeat`].
//! Pointer events additionally pass through the [`PointerEventsProcessor`],
//! which resolves capture overrides and hover transitions before delivery.

pub mod beat;
pub mod dispatcher;
pub mod event;
pub mod hover;
pub mod pointer;
pub mod queue;

pub use beat::{BeatCallback, EventBeat, EventBeatFactory};
pub use dispatcher::{DispatcherOptions, EventDispatcher};
pub use event::{
    EventPayload, EventPipe, EventPriority, Point, PointerDeviceKind, PointerEvent,
    PointerEventKind, PointerId, RawEvent, StatePipe, StateUpdate,
};
pub use pointer::{ActivePointer, PointerDispatch, PointerEventsProcessor, TreeNavigator};
pub use queue::EventQueue;
