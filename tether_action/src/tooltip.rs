// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip instance management.
//!
//! The tooltip renderer is an external capability described by
//! [`TooltipBackend`] (create an instance for an element) and
//! [`TooltipInstance`] (destroy it). The controller keeps at most one live
//! instance per attachment:
//!
//! - attach creates one instance from the initial configuration;
//! - [`ActionHandle::update`] destroys the current instance, then creates a
//!   new one from the new configuration (no partial patching);
//! - destroy releases the current instance, if any.
//!
//! A failed creation leaves the attachment with no instance and the error
//! available from [`TooltipHandle::last_error`]; the next `update` retries.
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use tether_action::{ActionHandle, Teardown};
//! use tether_action::tooltip::{self, TooltipBackend, TooltipConfig, TooltipError, TooltipInstance};
//! use tether_dom::{Document, NodeId};
//!
//! #[derive(Clone, Default)]
//! struct Counter(Rc<Cell<usize>>);
//!
//! struct Tip(Rc<Cell<usize>>);
//!
//! impl TooltipInstance for Tip {
//!     fn destroy(self) {
//!         self.0.set(self.0.get() - 1);
//!     }
//! }
//!
//! impl TooltipBackend for Counter {
//!     type Instance = Tip;
//!     fn create(&self, _: NodeId, _: &TooltipConfig) -> Result<Tip, TooltipError> {
//!         self.0.set(self.0.get() + 1);
//!         Ok(Tip(self.0.clone()))
//!     }
//! }
//!
//! let doc = Document::new();
//! let live = Counter::default();
//! let mut handle = tooltip::attach(&doc, doc.body(), live.clone(), TooltipConfig::new("Hello"));
//! handle.update(TooltipConfig::new("Hello again"));
//! assert_eq!(live.0.get(), 1);
//! handle.destroy();
//! assert_eq!(live.0.get(), 0);
//! ```

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use tether_dom::{Document, NodeId};
use tracing::{debug, trace, warn};

use crate::{Action, ActionHandle, Teardown};

/// Where the tooltip is placed relative to its element.
///
/// Names follow the conventional kebab-case placement strings of tooltip
/// libraries (`"top"`, `"bottom-start"`, `"auto-end"`, ...).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Above, centered.
    #[default]
    Top,
    /// Above, aligned to the start edge.
    TopStart,
    /// Above, aligned to the end edge.
    TopEnd,
    /// Below, centered.
    Bottom,
    /// Below, aligned to the start edge.
    BottomStart,
    /// Below, aligned to the end edge.
    BottomEnd,
    /// Left, centered.
    Left,
    /// Left, aligned to the start edge.
    LeftStart,
    /// Left, aligned to the end edge.
    LeftEnd,
    /// Right, centered.
    Right,
    /// Right, aligned to the start edge.
    RightStart,
    /// Right, aligned to the end edge.
    RightEnd,
    /// Side with the most space.
    Auto,
    /// Side with the most space, aligned to the start edge.
    AutoStart,
    /// Side with the most space, aligned to the end edge.
    AutoEnd,
}

impl Placement {
    /// Every placement, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Top,
        Self::TopStart,
        Self::TopEnd,
        Self::Bottom,
        Self::BottomStart,
        Self::BottomEnd,
        Self::Left,
        Self::LeftStart,
        Self::LeftEnd,
        Self::Right,
        Self::RightStart,
        Self::RightEnd,
        Self::Auto,
        Self::AutoStart,
        Self::AutoEnd,
    ];

    /// The kebab-case placement string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
            Self::Auto => "auto",
            Self::AutoStart => "auto-start",
            Self::AutoEnd => "auto-end",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown placement string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePlacementError {
    input: String,
}

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tooltip placement {:?}", self.input)
    }
}

impl core::error::Error for ParsePlacementError {}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePlacementError {
                input: s.to_string(),
            })
    }
}

/// Tooltip configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TooltipConfig {
    /// Text shown in the tooltip.
    pub content: String,
    /// Placement relative to the element.
    pub placement: Placement,
}

impl TooltipConfig {
    /// A configuration with `content` and the default placement.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            placement: Placement::default(),
        }
    }

    /// Returns a copy with `placement`.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// Failure reported by a [`TooltipBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipError {
    message: String,
}

impl TooltipError {
    /// An error with a human-readable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TooltipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tooltip creation failed: {}", self.message)
    }
}

impl core::error::Error for TooltipError {}

/// A live tooltip owned by the controller.
pub trait TooltipInstance {
    /// Tears the tooltip down. Consumes the instance, so it runs at most once.
    fn destroy(self);
}

/// The external tooltip renderer.
pub trait TooltipBackend {
    /// Instance type produced by [`TooltipBackend::create`].
    type Instance: TooltipInstance;

    /// Creates a tooltip bound to `element`.
    fn create(
        &self,
        element: NodeId,
        config: &TooltipConfig,
    ) -> Result<Self::Instance, TooltipError>;
}

impl<B: TooltipBackend + ?Sized> TooltipBackend for Rc<B> {
    type Instance = B::Instance;

    fn create(
        &self,
        element: NodeId,
        config: &TooltipConfig,
    ) -> Result<Self::Instance, TooltipError> {
        (**self).create(element, config)
    }
}

/// The tooltip action, holding the backend that creates instances.
pub struct Tooltip<B> {
    backend: B,
}

impl<B> fmt::Debug for Tooltip<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tooltip").finish_non_exhaustive()
    }
}

impl<B: TooltipBackend + Clone> Tooltip<B> {
    /// Wraps a backend. Each attachment gets its own clone, so share state
    /// through `Rc` or references.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: TooltipBackend + Clone> Action for Tooltip<B> {
    type Config = TooltipConfig;
    type Handle = TooltipHandle<B>;

    fn attach(&self, doc: &Document, element: NodeId, config: TooltipConfig) -> TooltipHandle<B> {
        attach(doc, element, self.backend.clone(), config)
    }
}

/// Binds one tooltip instance to `element`.
///
/// The document is not consulted; it is accepted so every action shares the
/// same attach shape.
pub fn attach<B: TooltipBackend>(
    _doc: &Document,
    element: NodeId,
    backend: B,
    config: TooltipConfig,
) -> TooltipHandle<B> {
    let mut handle = TooltipHandle {
        backend,
        element,
        config,
        instance: None,
        last_error: None,
        destroyed: false,
    };
    handle.recreate();
    debug!(?element, created = handle.instance.is_some(), "tooltip attached");
    handle
}

/// Live tooltip attachment. Dropping the handle destroys it.
pub struct TooltipHandle<B: TooltipBackend> {
    backend: B,
    element: NodeId,
    config: TooltipConfig,
    instance: Option<B::Instance>,
    last_error: Option<TooltipError>,
    destroyed: bool,
}

impl<B: TooltipBackend> fmt::Debug for TooltipHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipHandle")
            .field("element", &self.element)
            .field("config", &self.config)
            .field("has_instance", &self.instance.is_some())
            .field("last_error", &self.last_error)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<B: TooltipBackend> TooltipHandle<B> {
    fn recreate(&mut self) {
        if let Some(old) = self.instance.take() {
            old.destroy();
        }
        match self.backend.create(self.element, &self.config) {
            Ok(instance) => {
                self.instance = Some(instance);
                self.last_error = None;
            }
            Err(err) => {
                warn!(element = ?self.element, %err, "tooltip not shown");
                self.last_error = Some(err);
            }
        }
    }

    /// The element the tooltip is bound to.
    #[must_use]
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// The configuration most recently applied.
    #[must_use]
    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    /// The live instance, if creation succeeded and the handle is not destroyed.
    #[must_use]
    pub fn instance(&self) -> Option<&B::Instance> {
        self.instance.as_ref()
    }

    /// Whether a tooltip instance is currently live.
    #[must_use]
    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// The error from the most recent failed creation, cleared on success.
    #[must_use]
    pub fn last_error(&self) -> Option<&TooltipError> {
        self.last_error.as_ref()
    }
}

impl<B: TooltipBackend> Teardown for TooltipHandle<B> {
    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(instance) = self.instance.take() {
            instance.destroy();
        }
        debug!(element = ?self.element, "tooltip destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl<B: TooltipBackend> ActionHandle for TooltipHandle<B> {
    type Config = TooltipConfig;

    fn update(&mut self, config: TooltipConfig) {
        if self.destroyed {
            return;
        }
        trace!(element = ?self.element, placement = %config.placement, "tooltip updated");
        self.config = config;
        self.recreate();
    }
}

impl<B: TooltipBackend> Drop for TooltipHandle<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}
