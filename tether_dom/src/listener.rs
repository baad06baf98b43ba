// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registration types.

use alloc::rc::Rc;
use core::fmt;

use bitflags::bitflags;

use crate::Document;
use crate::event::{Event, EventType};

/// Identifier of a registered listener, unique within its document.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}

bitflags! {
    /// Options for [`Document::add_listener`](crate::Document::add_listener).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ListenerOptions: u8 {
        /// Run during the capture phase instead of the bubble phase.
        const CAPTURE = 1 << 0;
        /// Remove the listener after its first invocation.
        const ONCE = 1 << 1;
    }
}

/// Listener callback.
///
/// Callbacks receive the document so they can mutate it (dispatch further
/// events, schedule timers, add or remove listeners) while the current event
/// is in flight.
pub type Callback = Rc<dyn Fn(&Document, &mut Event)>;

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) event_type: EventType,
    pub(crate) options: ListenerOptions,
    pub(crate) callback: Callback,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
