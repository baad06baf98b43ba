// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-click detection.
//!
//! Attaching registers one capture-phase pointer-down listener on the document
//! node. Capture on the document runs before any listener on the way down to
//! the target, so a descendant calling `stop_propagation` in the bubble phase
//! cannot hide the click.
//!
//! For every pointer-down, the element is tested against the event's composed
//! path, not against the target's ancestors: content rendered into a shadow
//! tree or another subtree is not a light-DOM descendant, but the path still
//! records every node the event crossed. If the element is absent, a
//! [`EventType::ClickOutside`] event is dispatched on the element carrying a
//! copy of the original pointer-down, target and composed path included.
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use tether_action::Teardown;
//! use tether_action::outside_click;
//! use tether_dom::{Document, Event, EventType, ListenerOptions, PointerEvent};
//!
//! let doc = Document::new();
//! let dropdown = doc.create_element();
//! doc.append_child(doc.body(), dropdown).unwrap();
//!
//! let hits = Rc::new(Cell::new(0));
//! let h = hits.clone();
//! doc.add_listener(dropdown, EventType::ClickOutside, ListenerOptions::empty(), move |_, _| {
//!     h.set(h.get() + 1);
//! })
//! .unwrap();
//!
//! let mut handle = outside_click::attach(&doc, dropdown);
//! let down = || Event::pointer(EventType::PointerDown, PointerEvent::mouse());
//!
//! doc.dispatch(dropdown, down()).unwrap();
//! assert_eq!(hits.get(), 0);
//! doc.dispatch(doc.body(), down()).unwrap();
//! assert_eq!(hits.get(), 1);
//!
//! handle.destroy();
//! doc.dispatch(doc.body(), down()).unwrap();
//! assert_eq!(hits.get(), 1);
//! ```

use alloc::boxed::Box;

use tether_dom::{
    Document, Event, EventDetail, EventType, ListenerId, ListenerOptions, NodeId,
};
use tracing::{debug, trace, warn};

use crate::{Action, ActionHandle, Teardown};

/// The outside-click action. Takes no configuration.
#[derive(Copy, Clone, Debug, Default)]
pub struct OutsideClick;

impl Action for OutsideClick {
    type Config = ();
    type Handle = OutsideClickHandle;

    fn attach(&self, doc: &Document, element: NodeId, _config: ()) -> OutsideClickHandle {
        attach(doc, element)
    }
}

/// Watches for pointer-downs outside `element`.
pub fn attach(doc: &Document, element: NodeId) -> OutsideClickHandle {
    let root = doc.root();
    let listener = doc.add_listener(
        root,
        EventType::PointerDown,
        ListenerOptions::CAPTURE,
        move |doc, event| on_pointer_down(doc, element, event),
    );
    let listener = match listener {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(%err, "outside-click listener could not be registered");
            None
        }
    };
    debug!(?element, ?listener, "outside-click attached");
    OutsideClickHandle {
        doc: doc.clone(),
        element,
        listener,
    }
}

fn on_pointer_down(doc: &Document, element: NodeId, event: &Event) {
    if event.path_contains(element) {
        return;
    }
    trace!(?element, target = ?event.target(), "pointer-down outside element");
    let notification = Event::custom(
        EventType::ClickOutside,
        EventDetail::ClickOutside {
            original_event: Box::new(event.clone()),
        },
    );
    if let Err(err) = doc.dispatch(element, notification) {
        warn!(%err, "clickoutside could not be dispatched");
    }
}

/// Live outside-click attachment.
///
/// Owns exactly one document-level listener. Dropping the handle destroys it.
#[derive(Debug)]
pub struct OutsideClickHandle {
    doc: Document,
    element: NodeId,
    listener: Option<ListenerId>,
}

impl OutsideClickHandle {
    /// The watched element.
    #[must_use]
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// The document-level listener owned by this attachment, until destroyed.
    #[must_use]
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }
}

impl Teardown for OutsideClickHandle {
    fn destroy(&mut self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        self.doc.remove_listener(self.doc.root(), id);
        debug!(element = ?self.element, "outside-click destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.listener.is_none()
    }
}

impl ActionHandle for OutsideClickHandle {
    type Config = ();
}

impl Drop for OutsideClickHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use tether_dom::{PointerEvent, PointerType};

    fn setup() -> (Document, NodeId, Rc<RefCell<Vec<EventDetail>>>) {
        let doc = Document::new();
        let el = doc.create_element();
        doc.append_child(doc.body(), el).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        doc.add_listener(el, EventType::ClickOutside, ListenerOptions::empty(), move |_, ev| {
            s.borrow_mut().push(ev.detail().cloned().unwrap());
        })
        .unwrap();
        (doc, el, seen)
    }

    fn down(pointer: PointerEvent) -> Event {
        Event::pointer(EventType::PointerDown, pointer)
    }

    #[test]
    fn fires_once_for_body_click() {
        let (doc, el, seen) = setup();
        let _handle = attach(&doc, el);
        doc.dispatch(doc.body(), down(PointerEvent::mouse())).unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn click_on_element_or_descendant_is_inside() {
        let (doc, el, seen) = setup();
        let child = doc.create_element();
        doc.append_child(el, child).unwrap();
        let _handle = attach(&doc, el);
        doc.dispatch(el, down(PointerEvent::mouse())).unwrap();
        doc.dispatch(child, down(PointerEvent::mouse())).unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn detail_carries_original_event() {
        let (doc, el, seen) = setup();
        let other = doc.create_element();
        doc.append_child(doc.body(), other).unwrap();
        let _handle = attach(&doc, el);
        let pointer = PointerEvent::pen().with_pointer_id(7);
        doc.dispatch(other, down(pointer)).unwrap();

        let EventDetail::ClickOutside { original_event } = &seen.borrow()[0] else {
            panic!("expected a clickoutside detail");
        };
        assert_eq!(original_event.event_type(), EventType::PointerDown);
        assert_eq!(original_event.target(), Some(other));
        assert_eq!(original_event.composed_path(), [other, doc.body(), doc.root()]);
        assert_eq!(original_event.pointer_data(), Some(&pointer));
        assert_eq!(original_event.pointer_data().map(|p| p.pointer_type), Some(PointerType::Pen));
    }

    #[test]
    fn listener_can_ignore_its_own_toggle() {
        let doc = Document::new();
        let toggle = doc.create_element();
        let menu = doc.create_element();
        doc.append_child(doc.body(), toggle).unwrap();
        doc.append_child(doc.body(), menu).unwrap();
        let closes = Rc::new(RefCell::new(0));
        let c = closes.clone();
        doc.add_listener(menu, EventType::ClickOutside, ListenerOptions::empty(), move |_, ev| {
            if let Some(EventDetail::ClickOutside { original_event }) = ev.detail() {
                if !original_event.path_contains(toggle) {
                    *c.borrow_mut() += 1;
                }
            }
        })
        .unwrap();
        let _handle = attach(&doc, menu);

        doc.dispatch(toggle, down(PointerEvent::mouse())).unwrap();
        assert_eq!(*closes.borrow(), 0);
        doc.dispatch(doc.body(), down(PointerEvent::mouse())).unwrap();
        assert_eq!(*closes.borrow(), 1);
    }

    #[test]
    fn custom_built_pointer_down_is_still_reported() {
        let (doc, el, seen) = setup();
        let _handle = attach(&doc, el);
        let detail = EventDetail::LongPress {
            pointer_type: PointerType::Mouse,
        };
        doc.dispatch(el, Event::custom(EventType::PointerDown, detail.clone()))
            .unwrap();
        assert!(seen.borrow().is_empty());
        doc.dispatch(doc.body(), Event::custom(EventType::PointerDown, detail))
            .unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn sibling_stop_propagation_cannot_hide_click() {
        let (doc, el, seen) = setup();
        let sibling = doc.create_element();
        doc.append_child(doc.body(), sibling).unwrap();
        doc.add_listener(sibling, EventType::PointerDown, ListenerOptions::empty(), |_, ev| {
            ev.stop_propagation();
        })
        .unwrap();
        let _handle = attach(&doc, el);
        doc.dispatch(sibling, down(PointerEvent::mouse())).unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn shadow_content_of_element_counts_as_inside() {
        let (doc, el, seen) = setup();
        let shadow = doc.attach_shadow(el).unwrap();
        let inner = doc.create_element();
        doc.append_child(shadow, inner).unwrap();
        let _handle = attach(&doc, el);

        // Not a light-DOM descendant, but on the composed path.
        assert!(!doc.contains(el, inner));
        doc.dispatch(inner, down(PointerEvent::touch())).unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn destroy_removes_only_own_listener() {
        let (doc, el, seen) = setup();
        let other = doc.create_element();
        doc.append_child(doc.body(), other).unwrap();

        let mut a = attach(&doc, el);
        let _b = attach(&doc, other);
        assert_eq!(doc.listener_count(doc.root()), 2);

        a.destroy();
        assert!(a.is_destroyed());
        assert_eq!(doc.listener_count(doc.root()), 1);
        a.destroy();
        assert_eq!(doc.listener_count(doc.root()), 1);

        doc.dispatch(doc.body(), down(PointerEvent::mouse())).unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn drop_destroys() {
        let (doc, el, _seen) = setup();
        {
            let _handle = attach(&doc, el);
            assert_eq!(doc.listener_count_for(doc.root(), EventType::PointerDown), 1);
        }
        assert_eq!(doc.listener_count(doc.root()), 0);
    }

    #[test]
    fn update_is_a_noop() {
        let (doc, el, seen) = setup();
        let mut handle = OutsideClick.attach(&doc, el, ());
        handle.update(());
        doc.dispatch(doc.body(), down(PointerEvent::mouse())).unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(handle.element(), el);
        assert!(handle.listener().is_some());
    }
}
