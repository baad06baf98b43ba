// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Media: small helpers for media element bindings.
//!
//! [`format_time`] renders a playback position for display next to a video
//! element: `m:ss`, with minutes growing without an hour rollover.
//!
//! ```rust
//! use tether_media::format_time;
//!
//! assert_eq!(format_time(0.0), "0:00");
//! assert_eq!(format_time(90.0), "1:30");
//! assert_eq!(format_time(3661.0), "61:01");
//! assert_eq!(format_time(f64::NAN), "0:00");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;

/// Formats a position in seconds as `m:ss`.
///
/// Fractional seconds are truncated. NaN, infinities and negative values
/// format as `"0:00"`.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{}:{:02}", total / 60, total % 60)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "finite, positive, and saturating by `as` semantics"
)]
fn whole_seconds(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    seconds as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(format_time(0.0), "0:00");
    }

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_time(90.0), "1:30");
        assert_eq!(format_time(59.999), "0:59");
        assert_eq!(format_time(600.0), "10:00");
    }

    #[test]
    fn no_hour_rollover() {
        assert_eq!(format_time(3661.0), "61:01");
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(format_time(1e30), "307445734561825860:15");
    }

    #[test]
    fn invalid_inputs_format_as_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(f64::NEG_INFINITY), "0:00");
        assert_eq!(format_time(-5.0), "0:00");
    }
}
