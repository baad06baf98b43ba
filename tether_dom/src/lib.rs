// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether DOM: a small, deterministic event document for element behaviors.
//!
//! ## Overview
//!
//! This crate models just enough of a browser document to host element-bound
//! behaviors and test them without a browser:
//!
//! - A node tree with a document node, a body, elements and shadow roots.
//! - Per-node listener lists keyed by [`EventType`], registered for the
//!   capture or bubble phase via [`ListenerOptions`].
//! - Dispatch along the **composed path** in capture → target → bubble order,
//!   honoring `stop_propagation` and `stop_immediate_propagation`.
//! - Per-node text-selection state ([`UserSelect`]).
//! - A virtual millisecond clock driving a [`tether_timing::TimerQueue`].
//!
//! Everything is single-threaded. [`Document`] is a cheap `Rc` handle with
//! interior mutability, so callbacks can call back into it while an event is
//! in flight.
//!
//! ## Composed paths vs. containment
//!
//! [`Document::contains`] answers the light-DOM question and stops at shadow
//! roots. [`Event::composed_path`] is the chain an event actually travels and
//! crosses shadow roots into their hosts. Behaviors that care whether an
//! interaction happened "inside" an element should test path membership.
//!
//! ```rust
//! use tether_dom::{Document, Event, EventType, PointerEvent};
//!
//! let doc = Document::new();
//! let host = doc.create_element();
//! doc.append_child(doc.body(), host).unwrap();
//! let shadow = doc.attach_shadow(host).unwrap();
//! let button = doc.create_element();
//! doc.append_child(shadow, button).unwrap();
//!
//! let ev = doc
//!     .dispatch(button, Event::pointer(EventType::PointerDown, PointerEvent::mouse()))
//!     .unwrap();
//! assert!(ev.path_contains(host));
//! assert!(!doc.contains(host, button));
//! ```
//!
//! ## Timers
//!
//! Time only moves when the host calls [`Document::advance_by`] or
//! [`Document::advance_to`]; due timers run in deadline order.
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use tether_dom::Document;
//!
//! let doc = Document::new();
//! let fired = Rc::new(Cell::new(false));
//! let f = fired.clone();
//! doc.set_timeout(600, move |_| f.set(true));
//! doc.advance_by(599);
//! assert!(!fired.get());
//! doc.advance_by(1);
//! assert!(fired.get());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
mod document;
mod error;
mod event;
mod listener;
mod node;

pub use dispatcher::Phase;
pub use document::{Document, MAX_NODES, TimerCallback};
pub use error::DomError;
pub use event::{Event, EventDetail, EventType, PointerEvent};
pub use listener::{Callback, ListenerId, ListenerOptions};
pub use node::{NodeId, NodeKind, UserSelect};
pub use tether_timing::TimerId;
pub use ui_events::pointer::PointerType;
