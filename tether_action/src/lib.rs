// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Action: element-attached behaviors with leak-free teardown.
//!
//! An *action* is a reusable piece of event-driven logic bound to one element
//! for a bounded lifetime. Every action follows the same contract:
//!
//! ```text
//! attach(document, element, config) -> handle
//! handle.update(config)   // optional, behavior-dependent
//! handle.destroy()        // idempotent; also runs on drop
//! ```
//!
//! The crate ships three actions:
//!
//! - [`outside_click`]: notify when a pointer-down lands outside an element.
//! - [`long_press`]: notify when a pointer is held on an element past a threshold.
//! - [`tooltip`]: keep exactly one external tooltip instance bound to an element.
//!
//! Notifications are custom events dispatched on the element itself
//! ([`EventType::ClickOutside`](tether_dom::EventType::ClickOutside),
//! [`EventType::LongPress`](tether_dom::EventType::LongPress)), so callers
//! subscribe with ordinary listeners.
//!
//! ## Wiring into a UI layer
//!
//! Call `attach` when an element mounts, `update` whenever reactive
//! configuration changes, and `destroy` (or drop the handle) on unmount.
//! Several actions may share an element; each one removes only the
//! listeners, timers and instances it created. [`AttachmentSet`] collects the
//! handles for one element so they can be torn down together.
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use tether_action::{AttachmentSet, Teardown};
//! use tether_action::long_press::{self, LongPressConfig};
//! use tether_action::outside_click;
//! use tether_dom::{Document, Event, EventType, ListenerOptions, PointerEvent};
//!
//! let doc = Document::new();
//! let menu = doc.create_element();
//! doc.append_child(doc.body(), menu).unwrap();
//!
//! let closed = Rc::new(Cell::new(false));
//! let c = closed.clone();
//! doc.add_listener(menu, EventType::ClickOutside, ListenerOptions::empty(), move |_, _| {
//!     c.set(true);
//! })
//! .unwrap();
//!
//! let mut attachments = AttachmentSet::new();
//! attachments.push(outside_click::attach(&doc, menu));
//! attachments.push(long_press::attach(&doc, menu, LongPressConfig::default()));
//!
//! doc.dispatch(doc.body(), Event::pointer(EventType::PointerDown, PointerEvent::mouse()))
//!     .unwrap();
//! assert!(closed.get());
//!
//! // Unmount: everything the actions registered is gone.
//! attachments.destroy_all();
//! assert_eq!(doc.listener_count(doc.root()), 0);
//! assert_eq!(doc.listener_count(menu), 1); // only our own ClickOutside listener
//! ```
//!
//! ## Errors
//!
//! Nothing here surfaces errors to the host UI. Malformed configuration is
//! clamped, external tooltip failures are contained and logged, and double
//! destroy or use-after-destroy is a no-op.
//!
//! ## Logging
//!
//! Actions emit [`tracing`] events: `debug` for attach, destroy and
//! notifications, `trace` for state transitions, `warn` for contained
//! failures.
//!
//! ## Features
//!
//! - `outside_click`, `long_press`, `tooltip`: one per action, all on by default.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use tether_dom::{Document, NodeId};

#[cfg(feature = "long_press")]
pub mod long_press;
#[cfg(feature = "outside_click")]
pub mod outside_click;
#[cfg(feature = "tooltip")]
pub mod tooltip;

/// Teardown half of the action contract.
///
/// This trait is object safe so handles of different actions can be stored
/// together (see [`AttachmentSet`]).
pub trait Teardown {
    /// Releases everything the attachment created.
    ///
    /// Must be idempotent: a second call does nothing.
    fn destroy(&mut self);

    /// Whether [`Teardown::destroy`] has run.
    fn is_destroyed(&self) -> bool;
}

/// A live attachment of an action to an element.
pub trait ActionHandle: Teardown {
    /// Configuration accepted by [`ActionHandle::update`].
    type Config;

    /// Replaces the configuration. After destroy this is a no-op.
    ///
    /// Actions without reconfigurable state keep the default, which ignores
    /// the value.
    fn update(&mut self, config: Self::Config) {
        let _ = config;
    }
}

/// A behavior that can be attached to an element.
pub trait Action {
    /// Configuration supplied at attach time and on update.
    type Config;
    /// Handle returned by [`Action::attach`].
    type Handle: ActionHandle<Config = Self::Config>;

    /// Attaches the behavior to `element` in `doc`.
    fn attach(&self, doc: &Document, element: NodeId, config: Self::Config) -> Self::Handle;
}

/// Handles attached to one element, torn down together.
#[derive(Default)]
pub struct AttachmentSet {
    handles: Vec<Box<dyn Teardown>>,
}

impl fmt::Debug for AttachmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentSet")
            .field("len", &self.handles.len())
            .finish()
    }
}

impl AttachmentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `handle`.
    pub fn push(&mut self, handle: impl Teardown + 'static) {
        self.handles.push(Box::new(handle));
    }

    /// Attaches `action` and keeps its handle.
    pub fn attach<A>(&mut self, action: &A, doc: &Document, element: NodeId, config: A::Config)
    where
        A: Action,
        A::Handle: 'static,
    {
        self.push(action.attach(doc, element, config));
    }

    /// Number of handles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` when no handles are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Destroys every handle, most recently attached first, and empties the set.
    pub fn destroy_all(&mut self) {
        while let Some(mut handle) = self.handles.pop() {
            handle.destroy();
        }
    }
}

impl Drop for AttachmentSet {
    fn drop(&mut self) {
        self.destroy_all();
    }
}
