// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A dropdown menu that closes on outside clicks.
//!
//! The menu renders one of its items into a shadow root, so the click on it
//! is not a light-DOM descendant of the menu but still counts as inside.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p tether_demos --example dropdown`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Point;
use tether_action::outside_click::{self, OutsideClick};
use tether_action::{Action, Teardown};
use tether_demos::{init_tracing, mount, pointer};
use tether_dom::{Document, EventDetail, EventType, ListenerOptions, NodeId, PointerEvent};

fn main() {
    init_tracing("debug");

    let doc = Document::new();
    let toolbar = mount(&doc, doc.body());
    let menu = mount(&doc, doc.body());
    let shadow = doc.attach_shadow(menu).unwrap();
    let item = mount(&doc, shadow);

    // The toolbar swallows its own clicks.
    doc.add_listener(toolbar, EventType::PointerDown, ListenerOptions::empty(), |_, ev| {
        ev.stop_propagation();
    })
    .unwrap();

    let open = Rc::new(Cell::new(true));
    let o = open.clone();
    doc.add_listener(menu, EventType::ClickOutside, ListenerOptions::empty(), move |_, ev| {
        if let Some(EventDetail::ClickOutside { original_event }) = ev.detail() {
            let at = original_event.pointer_data().map(|p| p.position);
            println!("  closing menu, click on {:?} at {at:?}", original_event.target());
        }
        o.set(false);
    })
    .unwrap();

    let mut handle = OutsideClick.attach(&doc, menu, ());

    let click = |target: NodeId, label: &str, x: f64| {
        open.set(true);
        let down = PointerEvent::mouse().at(Point::new(x, 10.0));
        pointer(&doc, target, EventType::PointerDown, down);
        println!("{label:<20} menu open: {}", open.get());
    };

    println!("== Dropdown ==");
    click(item, "click shadow item", 120.0);
    click(toolbar, "click toolbar", 10.0);
    click(doc.body(), "click page", 400.0);

    handle.destroy();
    click(doc.body(), "after destroy", 400.0);

    let _again = outside_click::attach(&doc, menu);
    click(doc.body(), "reattached", 400.0);
}
