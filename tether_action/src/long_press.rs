// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-press detection.
//!
//! ## States
//!
//! One state machine per attachment (pointers are not tracked separately):
//!
//! - `Idle → Pressing` on pointer-down: any pending timer is cancelled, text
//!   selection on the element is suppressed, and a timer for the configured
//!   threshold starts.
//! - `Pressing → Idle` when the timer elapses: a [`EventType::LongPress`]
//!   event carrying the pointer type of the triggering pointer-down is
//!   dispatched on the element.
//! - `Pressing → Idle` on pointer-up, pointer-cancel or pointer-leave: the
//!   timer is cancelled and text selection is restored.
//!
//! A pointer-down while already pressing restarts the timer from zero.
//! [`ActionHandle::update`] changes the threshold for later presses only.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use tether_action::long_press::{self, LongPressConfig};
//! use tether_dom::{Document, Event, EventType, ListenerOptions, PointerEvent};
//!
//! let doc = Document::new();
//! let card = doc.create_element();
//! doc.append_child(doc.body(), card).unwrap();
//!
//! let presses = Rc::new(Cell::new(0));
//! let p = presses.clone();
//! doc.add_listener(card, EventType::LongPress, ListenerOptions::empty(), move |_, _| {
//!     p.set(p.get() + 1);
//! })
//! .unwrap();
//!
//! let _handle = long_press::attach(&doc, card, LongPressConfig::default());
//! doc.dispatch(card, Event::pointer(EventType::PointerDown, PointerEvent::touch()))
//!     .unwrap();
//! doc.advance_by(599);
//! assert_eq!(presses.get(), 0);
//! doc.advance_by(1);
//! assert_eq!(presses.get(), 1);
//! ```

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use smallvec::SmallVec;
use tether_dom::{
    Document, DomError, Event, EventDetail, EventType, ListenerId, ListenerOptions, NodeId,
    PointerType, TimerId, UserSelect,
};
use tracing::{debug, trace, warn};

use crate::{Action, ActionHandle, Teardown};

/// Default hold duration before a press counts as long.
pub const DEFAULT_THRESHOLD_MS: u64 = 600;

/// Events that end a press without firing.
const INTERRUPTIONS: [EventType; 3] = [
    EventType::PointerUp,
    EventType::PointerCancel,
    EventType::PointerLeave,
];

/// Long-press configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LongPressConfig {
    /// Hold duration in milliseconds. Zero is treated as 1 ms.
    pub threshold_ms: u64,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            threshold_ms: DEFAULT_THRESHOLD_MS,
        }
    }
}

impl LongPressConfig {
    /// A configuration with the given threshold.
    #[must_use]
    pub const fn new(threshold_ms: u64) -> Self {
        Self { threshold_ms }
    }

    /// The threshold actually used for scheduling, at least 1 ms.
    #[must_use]
    pub const fn effective_threshold_ms(self) -> u64 {
        if self.threshold_ms == 0 {
            1
        } else {
            self.threshold_ms
        }
    }
}

/// Observable state of a long-press attachment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LongPressState {
    /// No press timer is running.
    Idle,
    /// A press timer is running.
    Pressing,
}

/// The long-press action.
#[derive(Copy, Clone, Debug, Default)]
pub struct LongPress;

impl Action for LongPress {
    type Config = LongPressConfig;
    type Handle = LongPressHandle;

    fn attach(&self, doc: &Document, element: NodeId, config: LongPressConfig) -> LongPressHandle {
        attach(doc, element, config)
    }
}

#[derive(Debug)]
struct Shared {
    config: LongPressConfig,
    timer: Option<TimerId>,
    // Selection value to restore; `Some` while selection is suppressed.
    saved_select: Option<UserSelect>,
    active: bool,
}

/// Watches `element` for long presses.
pub fn attach(doc: &Document, element: NodeId, config: LongPressConfig) -> LongPressHandle {
    let shared = Rc::new(RefCell::new(Shared {
        config,
        timer: None,
        saved_select: None,
        active: true,
    }));

    let mut listeners: SmallVec<[ListenerId; 4]> = SmallVec::new();
    let mut keep = |registered: Result<ListenerId, DomError>| match registered {
        Ok(id) => listeners.push(id),
        Err(err) => warn!(%err, "long-press listener could not be registered"),
    };

    let down_state = shared.clone();
    keep(doc.add_listener(
        element,
        EventType::PointerDown,
        ListenerOptions::empty(),
        move |doc, event| {
            let pointer_type = event
                .pointer_data()
                .map(|p| p.pointer_type)
                .unwrap_or_default();
            press(doc, element, &down_state, pointer_type);
        },
    ));
    for event_type in INTERRUPTIONS {
        let shared = shared.clone();
        keep(doc.add_listener(
            element,
            event_type,
            ListenerOptions::empty(),
            move |doc, _| release(doc, element, &shared),
        ));
    }

    debug!(?element, threshold_ms = config.threshold_ms, "long-press attached");
    LongPressHandle {
        doc: doc.clone(),
        element,
        shared,
        listeners,
        destroyed: false,
    }
}

fn press(doc: &Document, element: NodeId, shared: &Rc<RefCell<Shared>>, pointer_type: PointerType) {
    let mut state = shared.borrow_mut();
    if !state.active {
        return;
    }
    if let Some(previous) = state.timer.take() {
        doc.clear_timeout(previous);
    }
    if state.saved_select.is_none() {
        state.saved_select = Some(doc.user_select(element).unwrap_or_default());
        doc.set_user_select(element, UserSelect::None);
    }
    let threshold = state.config.effective_threshold_ms();
    let weak = Rc::downgrade(shared);
    state.timer = Some(doc.set_timeout(threshold, move |doc| {
        fire(doc, element, &weak, pointer_type);
    }));
    trace!(?element, threshold, ?pointer_type, "long-press pressing");
}

fn fire(doc: &Document, element: NodeId, shared: &Weak<RefCell<Shared>>, pointer_type: PointerType) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    {
        let mut state = shared.borrow_mut();
        if !state.active || state.timer.take().is_none() {
            return;
        }
    }
    debug!(?element, ?pointer_type, "long-press fired");
    let notification = Event::custom(EventType::LongPress, EventDetail::LongPress { pointer_type });
    if let Err(err) = doc.dispatch(element, notification) {
        warn!(%err, "longpress could not be dispatched");
    }
}

fn release(doc: &Document, element: NodeId, shared: &RefCell<Shared>) {
    let mut state = shared.borrow_mut();
    if let Some(timer) = state.timer.take() {
        doc.clear_timeout(timer);
        trace!(?element, "long-press interrupted");
    }
    if let Some(previous) = state.saved_select.take() {
        doc.set_user_select(element, previous);
    }
}

/// Live long-press attachment.
///
/// Owns four element listeners (down, up, cancel, leave) and at most one
/// pending timer. Dropping the handle destroys it.
#[derive(Debug)]
pub struct LongPressHandle {
    doc: Document,
    element: NodeId,
    shared: Rc<RefCell<Shared>>,
    listeners: SmallVec<[ListenerId; 4]>,
    destroyed: bool,
}

impl LongPressHandle {
    /// The watched element.
    #[must_use]
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Whether a press timer is running.
    #[must_use]
    pub fn state(&self) -> LongPressState {
        if self.shared.borrow().timer.is_some() {
            LongPressState::Pressing
        } else {
            LongPressState::Idle
        }
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> LongPressConfig {
        self.shared.borrow().config
    }
}

impl Teardown for LongPressHandle {
    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for id in self.listeners.drain(..) {
            self.doc.remove_listener(self.element, id);
        }
        release(&self.doc, self.element, &self.shared);
        self.shared.borrow_mut().active = false;
        debug!(element = ?self.element, "long-press destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl ActionHandle for LongPressHandle {
    type Config = LongPressConfig;

    fn update(&mut self, config: LongPressConfig) {
        if self.destroyed {
            return;
        }
        trace!(element = ?self.element, threshold_ms = config.threshold_ms, "long-press updated");
        self.shared.borrow_mut().config = config;
    }
}

impl Drop for LongPressHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use tether_dom::PointerEvent;

    struct Fixture {
        doc: Document,
        el: NodeId,
        fired: Rc<RefCell<Vec<(u64, PointerType)>>>,
    }

    fn fixture() -> Fixture {
        let doc = Document::new();
        let el = doc.create_element();
        doc.append_child(doc.body(), el).unwrap();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let f = fired.clone();
        doc.add_listener(el, EventType::LongPress, ListenerOptions::empty(), move |doc, ev| {
            if let Some(EventDetail::LongPress { pointer_type }) = ev.detail() {
                f.borrow_mut().push((doc.now(), *pointer_type));
            }
        })
        .unwrap();
        Fixture { doc, el, fired }
    }

    impl Fixture {
        fn send(&self, event_type: EventType, pointer: PointerEvent) {
            self.doc
                .dispatch(self.el, Event::pointer(event_type, pointer))
                .unwrap();
        }

        fn down(&self) {
            self.send(EventType::PointerDown, PointerEvent::mouse());
        }
    }

    #[test]
    fn fires_after_threshold_with_pointer_type() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::default());
        f.send(EventType::PointerDown, PointerEvent::touch());
        f.doc.advance_by(599);
        assert!(f.fired.borrow().is_empty());
        f.doc.advance_by(1);
        assert_eq!(*f.fired.borrow(), [(600, PointerType::Touch)]);
        f.doc.advance_by(5_000);
        assert_eq!(f.fired.borrow().len(), 1);
    }

    #[test]
    fn release_before_threshold_cancels() {
        let f = fixture();
        let h = attach(&f.doc, f.el, LongPressConfig::default());
        f.down();
        f.doc.advance_by(300);
        f.send(EventType::PointerUp, PointerEvent::mouse());
        assert_eq!(h.state(), LongPressState::Idle);
        f.doc.advance_by(1_000);
        assert!(f.fired.borrow().is_empty());
        assert_eq!(f.doc.pending_timers(), 0);
    }

    #[test]
    fn cancel_and_leave_also_interrupt() {
        for interruption in [EventType::PointerCancel, EventType::PointerLeave] {
            let f = fixture();
            let _h = attach(&f.doc, f.el, LongPressConfig::default());
            f.down();
            f.doc.advance_by(100);
            f.send(interruption, PointerEvent::mouse());
            f.doc.advance_by(1_000);
            assert!(f.fired.borrow().is_empty(), "{interruption} should interrupt");
        }
    }

    #[test]
    fn second_press_restarts_timer() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::default());
        f.down();
        f.doc.advance_by(100);
        f.send(EventType::PointerUp, PointerEvent::mouse());
        f.down();
        f.doc.advance_by(599);
        assert!(f.fired.borrow().is_empty());
        f.doc.advance_by(1);
        assert_eq!(*f.fired.borrow(), [(700, PointerType::Mouse)]);
    }

    #[test]
    fn re_press_while_pressing_restarts_instead_of_queuing() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::default());
        f.down();
        f.doc.advance_by(400);
        f.send(EventType::PointerDown, PointerEvent::pen());
        f.doc.advance_by(599);
        assert!(f.fired.borrow().is_empty());
        f.doc.advance_by(1);
        assert_eq!(*f.fired.borrow(), [(1_000, PointerType::Pen)]);
        assert_eq!(f.doc.pending_timers(), 0);
    }

    #[test]
    fn selection_suppressed_while_pressing() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::default());
        f.down();
        assert_eq!(f.doc.user_select(f.el), Some(UserSelect::None));
        // A second press must not overwrite the saved value with `None`.
        f.down();
        f.send(EventType::PointerUp, PointerEvent::mouse());
        assert_eq!(f.doc.user_select(f.el), Some(UserSelect::Auto));
    }

    #[test]
    fn release_restores_selection_that_was_already_disabled() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::default());
        f.doc.set_user_select(f.el, UserSelect::None);
        f.down();
        f.send(EventType::PointerUp, PointerEvent::mouse());
        assert_eq!(f.doc.user_select(f.el), Some(UserSelect::None));
    }

    #[test]
    fn firing_returns_to_idle_and_keeps_selection_disabled() {
        let f = fixture();
        let h = attach(&f.doc, f.el, LongPressConfig::default());
        f.down();
        assert_eq!(h.state(), LongPressState::Pressing);
        f.doc.advance_by(600);
        assert_eq!(f.fired.borrow().len(), 1);
        assert_eq!(h.state(), LongPressState::Idle);
        assert_eq!(f.doc.user_select(f.el), Some(UserSelect::None));

        f.send(EventType::PointerUp, PointerEvent::mouse());
        assert_eq!(h.state(), LongPressState::Idle);
        assert_eq!(f.doc.user_select(f.el), Some(UserSelect::Auto));
    }

    #[test]
    fn custom_built_pointer_down_starts_a_press() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::default());
        let detail = EventDetail::LongPress {
            pointer_type: PointerType::Mouse,
        };
        f.doc
            .dispatch(f.el, Event::custom(EventType::PointerDown, detail))
            .unwrap();
        f.doc.advance_by(1_000);
        assert_eq!(*f.fired.borrow(), [(600, PointerType::Unknown)]);
    }

    #[test]
    fn update_applies_to_next_press_only() {
        let f = fixture();
        let mut h = attach(&f.doc, f.el, LongPressConfig::default());
        f.down();
        h.update(LongPressConfig::new(100));
        assert_eq!(h.config(), LongPressConfig::new(100));
        f.doc.advance_by(599);
        assert!(f.fired.borrow().is_empty());
        f.doc.advance_by(1);
        assert_eq!(f.fired.borrow().len(), 1);

        f.send(EventType::PointerUp, PointerEvent::mouse());
        f.down();
        f.doc.advance_by(100);
        assert_eq!(f.fired.borrow().len(), 2);
    }

    #[test]
    fn zero_threshold_fires_on_next_tick() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::new(0));
        f.down();
        f.doc.advance_by(0);
        assert!(f.fired.borrow().is_empty());
        f.doc.advance_by(1);
        assert_eq!(f.fired.borrow().len(), 1);
    }

    #[test]
    fn destroy_removes_all_listeners_and_timer() {
        let f = fixture();
        let mut h = attach(&f.doc, f.el, LongPressConfig::default());
        // The fixture's own LongPress listener plus down/up/cancel/leave.
        assert_eq!(f.doc.listener_count(f.el), 5);
        f.down();
        assert_eq!(h.state(), LongPressState::Pressing);

        h.destroy();
        assert!(h.is_destroyed());
        assert_eq!(f.doc.listener_count(f.el), 1);
        assert_eq!(f.doc.pending_timers(), 0);
        assert_eq!(f.doc.user_select(f.el), Some(UserSelect::Auto));

        h.destroy();
        h.update(LongPressConfig::new(1));
        f.down();
        f.doc.advance_by(1_000);
        assert!(f.fired.borrow().is_empty());
    }

    #[test]
    fn repeated_interruptions_are_harmless() {
        let f = fixture();
        let _h = attach(&f.doc, f.el, LongPressConfig::default());
        f.send(EventType::PointerUp, PointerEvent::mouse());
        f.send(EventType::PointerLeave, PointerEvent::mouse());
        f.send(EventType::PointerCancel, PointerEvent::mouse());
        assert_eq!(f.doc.user_select(f.el), Some(UserSelect::Auto));
    }

    #[test]
    fn two_watchers_on_one_element_are_independent() {
        let f = fixture();
        let _short = attach(&f.doc, f.el, LongPressConfig::new(100));
        let mut long = attach(&f.doc, f.el, LongPressConfig::default());
        long.destroy();
        assert_eq!(f.doc.listener_count(f.el), 5);
        f.down();
        f.doc.advance_by(100);
        assert_eq!(f.fired.borrow().len(), 1);
    }

    #[test]
    fn effective_threshold_clamps_zero() {
        assert_eq!(LongPressConfig::new(0).effective_threshold_ms(), 1);
        assert_eq!(LongPressConfig::new(5).effective_threshold_ms(), 5);
        assert_eq!(LongPressConfig::default().threshold_ms, 600);
    }
}
