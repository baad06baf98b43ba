// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity and per-node state.

use core::fmt;

/// Identifier of a node inside one [`Document`](crate::Document).
///
/// Ids are plain `Copy` keys: holding one does not keep the node alive or
/// imply ownership.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What a node is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node, root of every composed path.
    Document,
    /// A regular element.
    Element,
    /// A shadow root; its parent is its host element.
    ShadowRoot,
}

/// Text selection behavior of a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UserSelect {
    /// Platform default selection behavior.
    #[default]
    Auto,
    /// Text selection is suppressed.
    None,
}
