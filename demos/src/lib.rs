// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared setup for the Tether demos.

use tether_dom::{Document, Event, EventType, NodeId, PointerEvent};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or `default` when unset.
pub fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Creates an element and appends it to `parent`.
pub fn mount(doc: &Document, parent: NodeId) -> NodeId {
    let el = doc.create_element();
    doc.append_child(parent, el)
        .unwrap_or_else(|err| panic!("demo tree is well formed: {err}"));
    el
}

/// Dispatches a pointer event of `event_type` at `target`.
pub fn pointer(doc: &Document, target: NodeId, event_type: EventType, data: PointerEvent) {
    if let Err(err) = doc.dispatch(target, Event::pointer(event_type, data)) {
        tracing::warn!(%err, "demo dispatch failed");
    }
}
