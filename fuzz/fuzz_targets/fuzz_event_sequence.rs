#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reorder::testing::{MockHost, Recorded, RecordingListener};
use reorder::{Phase, SortConfig, SortableItem, Sorter, TransitionProperty, TransitionTarget};
use reorder_core::event::{
    InputEvent, KeyCode, KeyEvent, KeyEventKind, MouseButton, PointerEvent, PointerEventKind,
    TouchEvent, TouchEventKind, TouchId, WheelEvent,
};
use reorder_core::geometry::{Point, Size, Vec2};
use reorder_core::target::{ElementId, EventTarget};
use web_time::Instant;

const ITEMS: u64 = 8;

#[derive(Debug, Arbitrary)]
enum Op {
    Down { x: i16, y: i16, item: u8 },
    Move { x: i16, y: i16 },
    Up,
    Touch { kind: u8, id: u8, x: i16, y: i16, item: u8 },
    Key { code: u8, repeat: bool, item: u8 },
    Wheel,
    Tick { ms: u8 },
    TransitionEnd,
    Cancel,
    Unregister { item: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    press_delay_ms: u8,
    scrollable: bool,
    ops: Vec<Op>,
}

fn point(x: i16, y: i16) -> Point {
    Point::new(f32::from(x) / 64.0, f32::from(y) / 64.0)
}

fn target(item: u8) -> EventTarget {
    EventTarget::element(ElementId(u64::from(item) % (ITEMS + 1)))
}

fn event(op: &Op) -> Option<InputEvent> {
    let event = match *op {
        Op::Down { x, y, item } => InputEvent::Pointer(
            PointerEvent::new(PointerEventKind::Down(MouseButton::Left), point(x, y))
                .with_target(target(item)),
        ),
        Op::Move { x, y } => {
            InputEvent::Pointer(PointerEvent::new(PointerEventKind::Move, point(x, y)))
        }
        Op::Up => InputEvent::Pointer(PointerEvent::new(
            PointerEventKind::Up(MouseButton::Left),
            Point::ZERO,
        )),
        Op::Touch { kind, id, x, y, item } => {
            let kind = match kind % 4 {
                0 => TouchEventKind::Start,
                1 => TouchEventKind::Move,
                2 => TouchEventKind::End,
                _ => TouchEventKind::Cancel,
            };
            InputEvent::Touch(
                TouchEvent::new(kind, TouchId(u64::from(id % 3)), point(x, y))
                    .with_target(target(item)),
            )
        }
        Op::Key { code, repeat, item } => {
            let code = match code % 4 {
                0 => KeyCode::Space,
                1 => KeyCode::Escape,
                2 => KeyCode::Up,
                _ => KeyCode::Down,
            };
            let kind = if repeat {
                KeyEventKind::Repeat
            } else {
                KeyEventKind::Press
            };
            InputEvent::Key(KeyEvent::new(code).with_kind(kind).with_target(target(item)))
        }
        Op::Wheel => InputEvent::Wheel(WheelEvent::new(Vec2::new(0.0, 10.0), Point::ZERO)),
        _ => return None,
    };
    Some(event)
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }

    let config = SortConfig::default().with_press_delay(reorder::PressDelay::new(
        Duration::from_millis(u64::from(input.press_delay_ms)),
        5.0,
    ));
    let mut host = MockHost::vertical_list(ITEMS, 100.0, 40.0);
    if input.scrollable {
        host = host.with_viewport(Size::new(100.0, 120.0));
    }
    let Ok(mut sorter) = Sorter::new(config, host, RecordingListener::default()) else {
        return;
    };
    for i in 0..ITEMS {
        sorter.register(SortableItem::new(ElementId(i), i as usize));
    }

    let mut now = Instant::now();
    for op in &input.ops {
        // Engine errors are fine; broken invariants are not.
        let _ = match op {
            Op::Tick { ms } => {
                now += Duration::from_millis(u64::from(*ms));
                sorter.tick(now)
            }
            Op::TransitionEnd => {
                sorter.transition_end(TransitionTarget::Proxy, TransitionProperty::Transform, now)
            }
            Op::Cancel => sorter.cancel(now),
            Op::Unregister { item } => {
                match sorter.registry().handle_for(ElementId(u64::from(*item) % ITEMS)) {
                    Some(handle) => sorter.unregister(handle),
                    None => Ok(()),
                }
            }
            other => match event(other) {
                Some(event) => sorter.handle_event(&event, now).map(|_| ()),
                None => Ok(()),
            },
        };

        let len = sorter.registry().len();
        match sorter.phase() {
            Phase::Dragging | Phase::Dropping => {
                assert!(sorter.registry().active().is_some());
                let (from, to) = sorter.engine().session_indices().expect("session indices");
                assert!(from <= len && to <= len, "({from}, {to}) outside {len} items");
            }
            Phase::Idle | Phase::PendingLift | Phase::AwaitingStart => {
                assert!(sorter.registry().active().is_none());
                assert!(sorter.registry().pending_target().is_none());
            }
        }
    }

    // Wind down: every started session must end exactly once.
    let _ = sorter.cancel(now);
    let _ = sorter.tick(now + Duration::from_secs(5));
    assert_eq!(sorter.phase(), Phase::Idle);
    assert!(sorter.registry().active().is_none());

    let mut open = false;
    for event in &sorter.listener().events {
        match event {
            Recorded::Start(_) => {
                assert!(!open, "start inside a running session");
                open = true;
            }
            Recorded::Move(_) | Recorded::Over(_) => assert!(open, "notification outside a session"),
            Recorded::End(_) => {
                assert!(open, "end without start");
                open = false;
            }
        }
    }
    assert!(!open, "session never ended");
});
