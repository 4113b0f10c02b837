#![allow(dead_code)]

use reorder::reorder_core::event::{
    InputEvent, KeyCode, KeyEvent, KeyEventKind, MouseButton, PointerEvent, PointerEventKind,
    TouchEvent, TouchEventKind, TouchId, WheelEvent,
};
use reorder::reorder_core::geometry::{Point, Vec2};
use reorder::reorder_core::target::{ElementId, EventTarget};
use reorder::testing::{MockHost, RecordingListener};
use reorder::{ItemHandle, SortConfig, SortableItem, Sorter};

pub type TestSorter = Sorter<MockHost, RecordingListener>;

/// Items are 100 wide and 40 tall.
pub const ITEM_HEIGHT: f32 = 40.0;

pub fn sorter(count: u64) -> TestSorter {
    sorter_with(
        SortConfig::default(),
        MockHost::vertical_list(count, 100.0, ITEM_HEIGHT),
        RecordingListener::default(),
    )
}

/// Registers every element the host has a rect for, indexed by its id.
pub fn sorter_with(config: SortConfig, host: MockHost, listener: RecordingListener) -> TestSorter {
    let mut elements: Vec<ElementId> = host.rects.keys().copied().collect();
    elements.sort();
    let mut sorter = Sorter::new(config, host, listener).expect("valid config");
    for element in elements {
        sorter.register(SortableItem::new(element, element.0 as usize));
    }
    sorter
}

pub fn handle(sorter: &TestSorter, element: u64) -> ItemHandle {
    sorter
        .registry()
        .handle_for(ElementId(element))
        .expect("registered")
}

pub fn down(x: f32, y: f32, element: u64) -> InputEvent {
    InputEvent::Pointer(
        PointerEvent::new(PointerEventKind::Down(MouseButton::Left), Point::new(x, y))
            .with_target(EventTarget::element(ElementId(element))),
    )
}

pub fn pointer_move(x: f32, y: f32) -> InputEvent {
    InputEvent::Pointer(PointerEvent::new(PointerEventKind::Move, Point::new(x, y)))
}

pub fn up(x: f32, y: f32) -> InputEvent {
    InputEvent::Pointer(PointerEvent::new(
        PointerEventKind::Up(MouseButton::Left),
        Point::new(x, y),
    ))
}

pub fn key(code: KeyCode, element: u64) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code).with_target(EventTarget::element(ElementId(element))))
}

pub fn key_repeat(code: KeyCode, element: u64) -> InputEvent {
    InputEvent::Key(
        KeyEvent::new(code)
            .with_kind(KeyEventKind::Repeat)
            .with_target(EventTarget::element(ElementId(element))),
    )
}

pub fn touch(kind: TouchEventKind, id: u64, x: f32, y: f32, element: u64) -> InputEvent {
    InputEvent::Touch(
        TouchEvent::new(kind, TouchId(id), Point::new(x, y))
            .with_target(EventTarget::element(ElementId(element))),
    )
}

pub fn wheel(dy: f32) -> InputEvent {
    InputEvent::Wheel(WheelEvent::new(Vec2::new(0.0, dy), Point::ZERO))
}
