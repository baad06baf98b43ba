// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;
use tether_timing::{TimerId, TimerQueue};

use crate::dispatcher::{self, Dispatch, Outcome, Phase};
use crate::error::DomError;
use crate::event::{Event, EventType};
use crate::listener::{Callback, Listener, ListenerId, ListenerOptions};
use crate::node::{NodeId, NodeKind, UserSelect};

/// Timer callback. Runs once, with the document's clock set to its deadline.
pub type TimerCallback = Box<dyn FnOnce(&Document)>;

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    shadow_root: Option<NodeId>,
    user_select: UserSelect,
    listeners: Vec<Listener>,
}

impl NodeData {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            shadow_root: None,
            user_select: UserSelect::Auto,
            listeners: Vec::new(),
        }
    }
}

struct Inner {
    nodes: RefCell<Vec<NodeData>>,
    node_limit: usize,
    next_listener: Cell<u64>,
    now: Cell<u64>,
    timers: RefCell<TimerQueue<TimerCallback>>,
}

/// A single-threaded event document with a virtual clock.
///
/// `Document` is a cheap handle; clones share the same tree, listeners and
/// timers. Every method takes `&self`, so listener and timer callbacks may
/// call back into the document while an event is in flight.
#[derive(Clone)]
pub struct Document {
    inner: Rc<Inner>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.inner.nodes.borrow().len())
            .field("now", &self.inner.now.get())
            .field("pending_timers", &self.pending_timers())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Node ids are `u32` indices, so a document holds at most this many nodes.
pub const MAX_NODES: usize = u32::MAX as usize;

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

impl Document {
    /// Creates a document containing the document node and an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::with_node_limit(MAX_NODES)
    }

    fn with_node_limit(node_limit: usize) -> Self {
        let nodes = alloc::vec![
            NodeData::new(NodeKind::Document, None),
            NodeData::new(NodeKind::Element, Some(ROOT)),
        ];
        Self {
            inner: Rc::new(Inner {
                nodes: RefCell::new(nodes),
                node_limit: node_limit.min(MAX_NODES),
                next_listener: Cell::new(0),
                now: Cell::new(0),
                timers: RefCell::new(TimerQueue::new()),
            }),
        }
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The body element.
    #[must_use]
    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Returns `true` if both handles refer to the same document.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn check(&self, node: NodeId) -> Result<(), DomError> {
        if node.index() < self.inner.nodes.borrow().len() {
            Ok(())
        } else {
            Err(DomError::UnknownNode(node))
        }
    }

    fn push_node(&self, data: NodeData) -> Result<NodeId, DomError> {
        let mut nodes = self.inner.nodes.borrow_mut();
        if nodes.len() >= self.inner.node_limit {
            return Err(DomError::NodeLimit);
        }
        let index = u32::try_from(nodes.len()).map_err(|_| DomError::NodeLimit)?;
        nodes.push(data);
        Ok(NodeId(index))
    }

    // ---- tree ----

    /// Creates a detached element.
    ///
    /// # Panics
    ///
    /// Panics if the document already holds [`MAX_NODES`] nodes, the way
    /// `Vec::push` panics on capacity overflow. Use
    /// [`Document::try_create_element`] to handle that case.
    pub fn create_element(&self) -> NodeId {
        match self.try_create_element() {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a detached element, or fails with [`DomError::NodeLimit`].
    pub fn try_create_element(&self) -> Result<NodeId, DomError> {
        self.push_node(NodeData::new(NodeKind::Element, None))
    }

    /// Moves `child` under `parent`.
    ///
    /// Only elements can be inserted, and never under themselves or their
    /// own descendants.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        let hierarchy = DomError::HierarchyRequest { parent, child };
        if self.kind(child) != Some(NodeKind::Element) {
            return Err(hierarchy);
        }
        let mut cur = Some(parent);
        while let Some(node) = cur {
            if node == child {
                return Err(hierarchy);
            }
            cur = self.parent(node);
        }
        self.inner.nodes.borrow_mut()[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Attaches a shadow root to `host` and returns it.
    ///
    /// Nodes appended under the shadow root are not light-DOM descendants of
    /// the host (see [`Document::contains`]), but events dispatched inside
    /// still propagate through the host.
    pub fn attach_shadow(&self, host: NodeId) -> Result<NodeId, DomError> {
        self.check(host)?;
        {
            let nodes = self.inner.nodes.borrow();
            let data = &nodes[host.index()];
            if data.kind != NodeKind::Element || data.shadow_root.is_some() {
                return Err(DomError::ShadowRootUnsupported(host));
            }
        }
        let shadow = self.push_node(NodeData::new(NodeKind::ShadowRoot, Some(host)))?;
        self.inner.nodes.borrow_mut()[host.index()].shadow_root = Some(shadow);
        Ok(shadow)
    }

    /// The shadow root attached to `host`, if any.
    #[must_use]
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.inner
            .nodes
            .borrow()
            .get(host.index())
            .and_then(|n| n.shadow_root)
    }

    /// Node kind, or `None` for a foreign id.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.inner.nodes.borrow().get(node.index()).map(|n| n.kind)
    }

    /// Event parent of `node`. For a shadow root this is its host.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner
            .nodes
            .borrow()
            .get(node.index())
            .and_then(|n| n.parent)
    }

    /// Light-DOM containment: is `node` an inclusive descendant of `ancestor`?
    ///
    /// The walk stops at shadow roots, so content inside a shadow tree is not
    /// "contained" by the host or anything above it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            if self.kind(n) != Some(NodeKind::Element) {
                return false;
            }
            cur = self.parent(n);
        }
        false
    }

    /// The propagation path of an event targeted at `target`: target first,
    /// then each event parent up to the top, crossing shadow roots.
    #[must_use]
    pub fn composed_path(&self, target: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut path = SmallVec::new();
        let nodes = self.inner.nodes.borrow();
        let mut cur = nodes.get(target.index()).map(|_| target);
        while let Some(n) = cur {
            path.push(n);
            cur = nodes[n.index()].parent;
        }
        path
    }

    /// Whether `node`'s composed path reaches the document node.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.composed_path(node).last() == Some(&ROOT)
    }

    // ---- listeners ----

    /// Registers `callback` for `event_type` on `node`.
    ///
    /// Each call registers a distinct listener, even for the same callback.
    pub fn add_listener(
        &self,
        node: NodeId,
        event_type: EventType,
        options: ListenerOptions,
        callback: impl Fn(&Self, &mut Event) + 'static,
    ) -> Result<ListenerId, DomError> {
        self.check(node)?;
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        let callback: Callback = Rc::new(callback);
        self.inner.nodes.borrow_mut()[node.index()]
            .listeners
            .push(Listener {
                id,
                event_type,
                options,
                callback,
            });
        Ok(id)
    }

    /// Removes exactly the listener `id` from `node`.
    ///
    /// Returns `false` if it was not registered there, which includes a
    /// second removal of the same id.
    pub fn remove_listener(&self, node: NodeId, id: ListenerId) -> bool {
        let mut nodes = self.inner.nodes.borrow_mut();
        let Some(data) = nodes.get_mut(node.index()) else {
            return false;
        };
        let before = data.listeners.len();
        data.listeners.retain(|l| l.id != id);
        data.listeners.len() != before
    }

    /// Whether listener `id` is registered on `node`.
    #[must_use]
    pub fn has_listener(&self, node: NodeId, id: ListenerId) -> bool {
        self.inner
            .nodes
            .borrow()
            .get(node.index())
            .is_some_and(|n| n.listeners.iter().any(|l| l.id == id))
    }

    /// Number of listeners registered on `node`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner
            .nodes
            .borrow()
            .get(node.index())
            .map_or(0, |n| n.listeners.len())
    }

    /// Number of listeners for `event_type` registered on `node`.
    #[must_use]
    pub fn listener_count_for(&self, node: NodeId, event_type: EventType) -> usize {
        self.inner
            .nodes
            .borrow()
            .get(node.index())
            .map_or(0, |n| {
                n.listeners
                    .iter()
                    .filter(|l| l.event_type == event_type)
                    .count()
            })
    }

    // ---- dispatch ----

    /// Dispatches `event` at `target` and returns it after propagation.
    ///
    /// The event visits its composed path in capture → target → bubble order.
    /// Listener lists are snapshotted per node: listeners added during the
    /// dispatch do not see this event, and listeners removed before their
    /// turn are skipped.
    pub fn dispatch(&self, target: NodeId, mut event: Event) -> Result<Event, DomError> {
        self.check(target)?;
        event.path = self.composed_path(target);
        event.target = Some(target);
        event.propagation_stopped = false;
        event.immediate_propagation_stopped = false;

        let seq = dispatcher::sequence(&event.path, event.event_type().bubbles());
        dispatcher::run(&seq, &mut event, |step, event| {
            self.invoke(step, event);
            if event.propagation_stopped {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });

        event.phase = None;
        event.current_target = None;
        Ok(event)
    }

    fn invoke(&self, step: &Dispatch<NodeId>, event: &mut Event) {
        let mut batch: SmallVec<[Listener; 4]> = {
            let nodes = self.inner.nodes.borrow();
            nodes[step.node.index()]
                .listeners
                .iter()
                .filter(|l| l.event_type == event.event_type())
                .filter(|l| match step.phase {
                    Phase::Capture => l.options.contains(ListenerOptions::CAPTURE),
                    Phase::Bubble => !l.options.contains(ListenerOptions::CAPTURE),
                    Phase::Target => true,
                })
                .cloned()
                .collect()
        };
        if step.phase == Phase::Target {
            // Capture listeners on the target run before its bubble listeners.
            batch.sort_by_key(|l| !l.options.contains(ListenerOptions::CAPTURE));
        }

        event.current_target = Some(step.node);
        event.phase = Some(step.phase);
        for listener in batch {
            if !self.has_listener(step.node, listener.id) {
                continue;
            }
            if listener.options.contains(ListenerOptions::ONCE) {
                self.remove_listener(step.node, listener.id);
            }
            (listener.callback)(self, event);
            if event.immediate_propagation_stopped {
                break;
            }
        }
    }

    // ---- text selection ----

    /// Text selection state of `node`.
    #[must_use]
    pub fn user_select(&self, node: NodeId) -> Option<UserSelect> {
        self.inner
            .nodes
            .borrow()
            .get(node.index())
            .map(|n| n.user_select)
    }

    /// Sets the text selection state of `node`. Returns `false` for a foreign id.
    pub fn set_user_select(&self, node: NodeId, value: UserSelect) -> bool {
        match self.inner.nodes.borrow_mut().get_mut(node.index()) {
            Some(data) => {
                data.user_select = value;
                true
            }
            None => false,
        }
    }

    // ---- clock & timers ----

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.inner.now.get()
    }

    /// Runs `callback` once `delay_ms` milliseconds from now.
    pub fn set_timeout(&self, delay_ms: u64, callback: impl FnOnce(&Self) + 'static) -> TimerId {
        let deadline = self.now().saturating_add(delay_ms);
        self.inner
            .timers
            .borrow_mut()
            .schedule(deadline, Box::new(callback))
    }

    /// Cancels a pending timer. Returns `false` if it already ran or was cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.timers.borrow_mut().cancel(id).is_some()
    }

    /// Whether timer `id` is still pending.
    #[must_use]
    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.inner.timers.borrow().contains(id)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Advances the clock by `ms`, running every timer that becomes due.
    pub fn advance_by(&self, ms: u64) {
        self.advance_to(self.now().saturating_add(ms));
    }

    /// Advances the clock to `time`, running due timers in deadline order.
    ///
    /// The clock reads each timer's deadline while its callback runs. Timers
    /// scheduled by a callback run in the same call if they fall due by
    /// `time`. The clock never moves backwards.
    pub fn advance_to(&self, time: u64) {
        loop {
            let due = self.inner.timers.borrow_mut().pop_due(time);
            let Some((_, deadline, callback)) = due else {
                break;
            };
            if deadline > self.now() {
                self.inner.now.set(deadline);
            }
            callback(self);
        }
        if time > self.now() {
            self.inner.now.set(time);
        }
    }
}
