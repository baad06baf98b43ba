// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event values carried through a dispatch.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use ui_events::pointer::PointerType;

use crate::dispatcher::Phase;
use crate::node::NodeId;

/// The kinds of event a [`Document`](crate::Document) can dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A pointer became active (button pressed, finger or pen down).
    PointerDown,
    /// A pointer was released.
    PointerUp,
    /// The platform cancelled the pointer (for example a touch turned into a scroll).
    PointerCancel,
    /// The pointer left the element's hit area.
    PointerLeave,
    /// Custom notification: a pointer-down happened outside an element.
    ClickOutside,
    /// Custom notification: a pointer was held down past a threshold.
    LongPress,
}

impl EventType {
    /// Whether the event continues into the bubble phase after the target.
    ///
    /// Pointer leave and the custom notifications are target-only.
    #[must_use]
    pub const fn bubbles(self) -> bool {
        matches!(self, Self::PointerDown | Self::PointerUp | Self::PointerCancel)
    }

    /// Whether events of this type carry [`PointerEvent`] data.
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::PointerDown | Self::PointerUp | Self::PointerCancel | Self::PointerLeave
        )
    }

    /// The platform event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
            Self::PointerLeave => "pointerleave",
            Self::ClickOutside => "clickoutside",
            Self::LongPress => "longpress",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw pointer input attached to pointer events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Identifier of the pointer that produced the event.
    pub pointer_id: u64,
    /// Input modality.
    pub pointer_type: PointerType,
    /// Position in document coordinates.
    pub position: Point,
    /// Whether this is the primary pointer of its type.
    pub is_primary: bool,
}

impl PointerEvent {
    /// A primary pointer of the given type at the origin.
    #[must_use]
    pub fn new(pointer_type: PointerType) -> Self {
        Self {
            pointer_id: 1,
            pointer_type,
            position: Point::ZERO,
            is_primary: true,
        }
    }

    /// Shorthand for a primary mouse pointer.
    #[must_use]
    pub fn mouse() -> Self {
        Self::new(PointerType::Mouse)
    }

    /// Shorthand for a primary touch pointer.
    #[must_use]
    pub fn touch() -> Self {
        Self::new(PointerType::Touch)
    }

    /// Shorthand for a primary pen pointer.
    #[must_use]
    pub fn pen() -> Self {
        Self::new(PointerType::Pen)
    }

    /// Returns a copy positioned at `position`.
    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Returns a copy with the given pointer id.
    #[must_use]
    pub fn with_pointer_id(mut self, pointer_id: u64) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}

/// Payload of the custom notification events.
#[derive(Clone, Debug, PartialEq)]
pub enum EventDetail {
    /// Carried by [`EventType::ClickOutside`].
    ClickOutside {
        /// The pointer-down that triggered the notification, as seen by the
        /// document-level capture listener: its target and composed path are
        /// filled in.
        original_event: Box<Event>,
    },
    /// Carried by [`EventType::LongPress`].
    LongPress {
        /// Modality of the pointer that was held.
        pointer_type: PointerType,
    },
}

/// An event in flight.
///
/// Build one with [`Event::pointer`] or [`Event::custom`] and hand it to
/// [`Document::dispatch`](crate::Document::dispatch). During dispatch the
/// document fills in the target, the composed path, the current phase and the
/// current target.
///
/// Pointer event types always carry pointer data, whichever constructor built
/// them.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    event_type: EventType,
    pointer: Option<PointerEvent>,
    detail: Option<EventDetail>,
    pub(crate) target: Option<NodeId>,
    pub(crate) current_target: Option<NodeId>,
    pub(crate) phase: Option<Phase>,
    pub(crate) path: SmallVec<[NodeId; 8]>,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
    default_prevented: bool,
}

impl Event {
    fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            pointer: None,
            detail: None,
            target: None,
            current_target: None,
            phase: None,
            path: SmallVec::new(),
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// A pointer event of the given type.
    #[must_use]
    pub fn pointer(event_type: EventType, pointer: PointerEvent) -> Self {
        let mut ev = Self::new(event_type);
        ev.pointer = Some(pointer);
        ev
    }

    /// A custom notification event carrying `detail`.
    ///
    /// A pointer event type still gets pointer data, from a primary pointer of
    /// unknown type at the origin, so listeners never see a pointer-down they
    /// cannot interpret.
    #[must_use]
    pub fn custom(event_type: EventType, detail: EventDetail) -> Self {
        let mut ev = Self::new(event_type);
        ev.detail = Some(detail);
        if event_type.is_pointer() {
            ev.pointer = Some(PointerEvent::new(PointerType::Unknown));
        }
        ev
    }

    /// The event type.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Pointer data, for pointer events.
    #[must_use]
    pub fn pointer_data(&self) -> Option<&PointerEvent> {
        self.pointer.as_ref()
    }

    /// Custom payload, for notification events.
    #[must_use]
    pub fn detail(&self) -> Option<&EventDetail> {
        self.detail.as_ref()
    }

    /// The node the event was dispatched to.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The node whose listener is currently running.
    #[must_use]
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    /// The phase of the listener that is currently running.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// The propagation path, target first and document root last.
    ///
    /// Unlike an ancestor walk, the path crosses shadow roots into their hosts.
    #[must_use]
    pub fn composed_path(&self) -> &[NodeId] {
        &self.path
    }

    /// Whether `node` lies on the propagation path.
    #[must_use]
    pub fn path_contains(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }

    /// Stop after the listeners on the current node have run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop immediately; no further listeners run, even on the current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Whether propagation was stopped.
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Mark the default action as cancelled.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a listener called [`Event::prevent_default`].
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
