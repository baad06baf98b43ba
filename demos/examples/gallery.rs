// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A photo gallery tile: long press to select, a caption tooltip, and
//! duration labels for video tiles.
//!
//! Run:
//! - `RUST_LOG=tether_action=trace cargo run -p tether_demos --example gallery`

use tether_action::long_press::{LongPress, LongPressConfig};
use tether_action::tooltip::{
    Placement, Tooltip, TooltipBackend, TooltipConfig, TooltipError, TooltipInstance,
};
use tether_action::{Action, ActionHandle, AttachmentSet};
use tether_demos::{init_tracing, mount, pointer};
use tether_dom::{Document, EventDetail, EventType, ListenerOptions, NodeId, PointerEvent};
use tether_media::format_time;

/// Prints tooltip lifecycle instead of drawing anything.
#[derive(Clone, Copy, Default)]
struct ConsoleTips;

struct ConsoleTip {
    content: String,
}

impl TooltipInstance for ConsoleTip {
    fn destroy(self) {
        println!("  [tooltip] hide {:?}", self.content);
    }
}

impl TooltipBackend for ConsoleTips {
    type Instance = ConsoleTip;

    fn create(&self, _: NodeId, config: &TooltipConfig) -> Result<ConsoleTip, TooltipError> {
        if config.content.is_empty() {
            return Err(TooltipError::new("empty caption"));
        }
        println!("  [tooltip] show {:?} at {}", config.content, config.placement);
        Ok(ConsoleTip {
            content: config.content.clone(),
        })
    }
}

fn main() {
    init_tracing("info");

    let doc = Document::new();
    let tile = mount(&doc, doc.body());

    doc.add_listener(tile, EventType::LongPress, ListenerOptions::empty(), |doc, ev| {
        if let Some(EventDetail::LongPress { pointer_type }) = ev.detail() {
            println!("  selected at t={}ms via {pointer_type:?}", doc.now());
        }
    })
    .unwrap();

    let mut attachments = AttachmentSet::new();
    attachments.attach(&LongPress, &doc, tile, LongPressConfig::new(500));
    let mut tip = Tooltip::new(ConsoleTips).attach(&doc, tile, TooltipConfig::new("Beach, 3:12"));

    println!("== Long press ==");
    for hold_ms in [200, 800] {
        let touch = PointerEvent::touch();
        pointer(&doc, tile, EventType::PointerDown, touch);
        doc.advance_by(hold_ms);
        pointer(&doc, tile, EventType::PointerUp, touch);
        println!("  released after {hold_ms}ms");
    }

    println!("== Tooltip updates ==");
    tip.update(TooltipConfig::new("Beach at dusk").with_placement(Placement::BottomStart));
    tip.update(TooltipConfig::new(""));
    if let Some(err) = tip.last_error() {
        println!("  tooltip unavailable: {err}");
    }
    tip.update(TooltipConfig::new("Beach, edited"));
    attachments.push(tip);

    println!("== Durations ==");
    for seconds in [0.0, 90.0, 192.4, 3661.0, f64::NAN] {
        println!("  {seconds:>8} -> {}", format_time(seconds));
    }

    drop(attachments);
    println!("listeners left on tile: {}", doc.listener_count(tile));
}
