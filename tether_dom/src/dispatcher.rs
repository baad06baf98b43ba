// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propagation sequences: capture → target → bubble.
//!
//! [`sequence`] turns a composed path into the ordered list of
//! [`Dispatch`] steps an event visits, and [`run`] walks such a sequence
//! while honoring stop outcomes:
//!
//! - Process entries in order.
//! - [`Outcome::Stop`] aborts propagation immediately (no target/bubble if raised in capture).
//! - Returns `true` if propagation was stopped before the end of the sequence.
//!
//! ## Minimal example
//!
//! ```
//! use tether_dom::dispatcher::{self, Dispatch, Outcome, Phase};
//!
//! // Composed path, target first: 3 is inside 2, which is inside 1.
//! let seq = dispatcher::sequence(&[3_u32, 2, 1], true);
//! assert_eq!(
//!     seq,
//!     vec![
//!         Dispatch::capture(1),
//!         Dispatch::capture(2),
//!         Dispatch::target(3),
//!         Dispatch::bubble(2),
//!         Dispatch::bubble(1),
//!     ]
//! );
//!
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     if d.phase == Phase::Target { Outcome::Stop } else { Outcome::Continue }
//! });
//! assert!(stopped);
//! assert_eq!(seen.len(), 3);
//! ```

use alloc::vec::Vec;

/// Propagation phase of a dispatch step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → target, excluding the target.
    Capture,
    /// At the target itself.
    Target,
    /// Target → root, excluding the target.
    Bubble,
}

/// One step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node visited by this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture step.
    pub const fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// A target step.
    pub const fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble step.
    pub const fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// What a handler wants to happen after its step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep propagating.
    Continue,
    /// Abort propagation; no later steps run.
    Stop,
}

/// Build the propagation sequence for a composed path given target first.
///
/// An empty path yields an empty sequence. When `bubbles` is `false` the
/// sequence ends at the target.
pub fn sequence<K: Copy>(path: &[K], bubbles: bool) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_first() else {
        return Vec::new();
    };
    let mut seq = Vec::with_capacity(ancestors.len() * 2 + 1);
    seq.extend(ancestors.iter().rev().map(|&k| Dispatch::capture(k)));
    seq.push(Dispatch::target(target));
    if bubbles {
        seq.extend(ancestors.iter().map(|&k| Dispatch::bubble(k)));
    }
    seq
}

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// `event` is a mutable payload carried across handler calls. Returns `true`
/// if some handler returned [`Outcome::Stop`].
pub fn run<K, E>(
    seq: &[Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> bool {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn mk_seq() -> Vec<Dispatch<u32>> {
        sequence(&[2, 1], true)
    }

    #[test]
    fn sequence_orders_capture_target_bubble() {
        assert_eq!(
            mk_seq(),
            vec![
                Dispatch::capture(1),
                Dispatch::target(2),
                Dispatch::bubble(1),
            ]
        );
    }

    #[test]
    fn non_bubbling_sequence_ends_at_target() {
        assert_eq!(
            sequence(&[3_u32, 2, 1], false),
            vec![
                Dispatch::capture(1),
                Dispatch::capture(2),
                Dispatch::target(3),
            ]
        );
    }

    #[test]
    fn single_node_path_is_target_only() {
        assert_eq!(sequence(&[7_u32], true), vec![Dispatch::target(7)]);
        assert!(sequence::<u32>(&[], true).is_empty());
    }

    #[test]
    fn continue_through_all() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node));
            Outcome::Continue
        });
        assert!(!stopped);
        assert_eq!(seen.len(), seq.len());
    }

    #[test]
    fn stop_in_capture_skips_target_and_bubble() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node));
            Outcome::Stop
        });
        assert!(stopped);
        assert_eq!(seen, vec![(Phase::Capture, 1)]);
    }

    #[test]
    fn stop_in_target_aborts_bubble_phase() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node));
            if matches!(d.phase, Phase::Target) {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert!(stopped);
        assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Target, 2)]);
    }
}
