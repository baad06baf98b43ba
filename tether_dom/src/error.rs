// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::node::NodeId;

/// Errors from tree and listener operations on a [`Document`](crate::Document).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// The id does not name a node of this document.
    UnknownNode(NodeId),
    /// The insertion would make a node its own ancestor, or move the
    /// document node or a shadow root.
    HierarchyRequest {
        /// Intended parent.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },
    /// The host already has a shadow root, or is not an element.
    ShadowRootUnsupported(NodeId),
    /// The document already holds [`MAX_NODES`](crate::MAX_NODES) nodes.
    NodeLimit,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "{node:?} does not belong to this document"),
            Self::HierarchyRequest { parent, child } => {
                write!(f, "cannot insert {child:?} under {parent:?}")
            }
            Self::ShadowRootUnsupported(host) => {
                write!(f, "{host:?} cannot host another shadow root")
            }
            Self::NodeLimit => write!(f, "document node limit of {} reached", crate::MAX_NODES),
        }
    }
}

impl core::error::Error for DomError {}
